use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::fmt::money_with;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const FOCUS_STYLE: Style = Style::new().fg(Color::Cyan);
pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);

/// Format an amount as a colored Span (green for income, red for expense).
/// Shows absolute value; color conveys the sign.
pub fn money_span(amount: f64, symbol: &str) -> Span<'static> {
    let style = if amount < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(money_with(amount.abs(), symbol), style)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Full-width `━` rule.
pub fn separator(frame: &mut Frame, area: Rect) {
    let line = "━".repeat(area.width as usize);
    frame.render_widget(Paragraph::new(line).style(BORDER_STYLE), area);
}

/// Bold section title with a blank line above it.
pub fn section_title(title: &str) -> [Line<'static>; 2] {
    [
        Line::from(""),
        Line::from(Span::styled(format!(" {title}"), TITLE_STYLE)),
    ]
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    fn style(&self) -> Style {
        match self {
            ToastKind::Success => Style::new().fg(Color::Green),
            ToastKind::Info => Style::new().fg(Color::Yellow),
            ToastKind::Error => ERROR_STYLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
}

/// Key presses a notification survives.
const TOAST_TTL: u8 = 3;

/// Transient notification shown in the footer line. It disappears after a
/// few key presses rather than on a timer, so nothing runs between events.
#[derive(Debug, Default)]
pub struct Toast {
    current: Option<ToastMessage>,
    ttl: u8,
    /// Total shown this session; the header badge reads this.
    shown: usize,
}

impl Toast {
    pub fn show(&mut self, kind: ToastKind, title: &str, body: impl Into<String>) {
        let body = body.into();
        tracing::debug!(title, body = body.as_str(), "toast");
        self.current = Some(ToastMessage {
            title: title.to_string(),
            body,
            kind,
        });
        self.ttl = TOAST_TTL;
        self.shown += 1;
    }

    pub fn success(&mut self, title: &str, body: impl Into<String>) {
        self.show(ToastKind::Success, title, body);
    }

    pub fn info(&mut self, title: &str, body: impl Into<String>) {
        self.show(ToastKind::Info, title, body);
    }

    pub fn error(&mut self, title: &str, body: impl Into<String>) {
        self.show(ToastKind::Error, title, body);
    }

    /// Called once per key press, before the key is dispatched.
    pub fn tick(&mut self) {
        if self.ttl > 0 {
            self.ttl -= 1;
            if self.ttl == 0 {
                self.current = None;
            }
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn line(&self) -> Option<Line<'static>> {
        self.current.as_ref().map(|msg| {
            Line::from(vec![
                Span::styled(format!(" {}: ", msg.title), msg.kind.style().add_modifier(Modifier::BOLD)),
                Span::styled(msg.body.clone(), msg.kind.style()),
            ])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_ttl() {
        let mut toast = Toast::default();
        toast.success("Saved", "Profile updated");
        assert!(toast.current().is_some());
        toast.tick();
        toast.tick();
        assert!(toast.current().is_some());
        toast.tick();
        assert!(toast.current().is_none());
        assert_eq!(toast.shown(), 1);
    }

    #[test]
    fn test_toast_replaced_resets_ttl() {
        let mut toast = Toast::default();
        toast.info("One", "first");
        toast.tick();
        toast.tick();
        toast.error("Two", "second");
        toast.tick();
        let current = toast.current().unwrap();
        assert_eq!(current.title, "Two");
        assert_eq!(current.kind, ToastKind::Error);
        assert_eq!(toast.shown(), 2);
    }

    #[test]
    fn test_money_span_uses_absolute_value() {
        let span = money_span(-1250.45, "$");
        assert_eq!(span.content, "$1,250.45");
        assert_eq!(span.style, AMOUNT_NEG_STYLE);
        assert_eq!(money_span(3.0, "€").content, "€3.00");
    }

    #[test]
    fn test_wrap_text_counts_lines() {
        let (wrapped, lines) = wrap_text("one two three four", 13);
        assert_eq!(lines, 2);
        assert!(wrapped.contains('\n'));
        assert_eq!(wrap_text("abc", 0), ("abc".to_string(), 1));
    }
}
