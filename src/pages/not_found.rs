use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{Page, PageAction, PageContext};
use crate::error::Result;
use crate::router::{NavPayload, NavRequest, Route};
use crate::tui::FOOTER_STYLE;

/// Catch-all screen for paths no route matches.
pub struct NotFoundPage {
    path: String,
}

impl NotFoundPage {
    pub fn new() -> Self {
        Self {
            path: String::new(),
        }
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
    }
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for NotFoundPage {
    fn enter(&mut self, _payload: Option<NavPayload>, _ctx: &mut PageContext) -> Result<()> {
        tracing::warn!(path = self.path.as_str(), "no route for path");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let top = area.height.saturating_sub(6) / 2;
        let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
        lines.extend([
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Page not found"),
            Line::from(""),
            Line::from(Span::styled(
                format!("Nothing lives at {}.", self.path),
                FOOTER_STYLE,
            )),
            Line::from(""),
            Line::from(Span::styled("Enter=return to the dashboard", FOOTER_STYLE)),
        ]);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn handle_key(&mut self, code: KeyCode, _ctx: &mut PageContext) -> Result<PageAction> {
        Ok(match code {
            KeyCode::Enter | KeyCode::Char('h') => {
                PageAction::Navigate(NavRequest::to(Route::Overview))
            }
            _ => PageAction::Unhandled,
        })
    }

    fn hints(&self) -> &'static str {
        "Enter=dashboard"
    }
}
