use crossterm::event::KeyCode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use zeroize::Zeroize;

use crate::tui::{ERROR_STYLE, FOCUS_STYLE};
use crate::validate::FieldError;

const LABEL_WIDTH: usize = 18;

pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    /// Options whose label is the value itself.
    pub fn plain(values: &[&str]) -> Vec<Self> {
        values.iter().map(|v| Self::new(v, v)).collect()
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    /// Rendered masked; zeroized on reset and drop.
    Secret,
    Toggle(bool),
    Selector {
        options: Vec<SelectOption>,
        selected: Option<usize>,
        placeholder: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub error: Option<FieldError>,
    /// Dimmed text after an empty text field.
    pub hint: Option<&'static str>,
}

impl FormField {
    fn base(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            kind,
            error: None,
            hint: None,
        }
    }

    pub fn text(key: &'static str, label: &'static str, value: &str) -> Self {
        let mut field = Self::base(key, label, FieldKind::Text);
        field.value = value.to_string();
        field
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self::base(key, label, FieldKind::Secret)
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self::base(key, label, FieldKind::Toggle(on))
    }

    pub fn selector(
        key: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
        selected: Option<usize>,
        placeholder: &'static str,
    ) -> Self {
        Self::base(
            key,
            label,
            FieldKind::Selector {
                options,
                selected,
                placeholder,
            },
        )
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    fn takes_text(&self) -> bool {
        matches!(self.kind, FieldKind::Text | FieldKind::Secret)
    }

    fn cycle(&mut self, forward: bool) {
        match &mut self.kind {
            FieldKind::Toggle(on) => *on = !*on,
            FieldKind::Selector {
                options, selected, ..
            } => {
                if options.is_empty() {
                    return;
                }
                let last = options.len() - 1;
                *selected = Some(match (*selected, forward) {
                    (None, true) => 0,
                    (None, false) => last,
                    (Some(i), true) => if i >= last { 0 } else { i + 1 },
                    (Some(i), false) => if i == 0 { last } else { i - 1 },
                });
            }
            FieldKind::Text | FieldKind::Secret => {}
        }
    }

    fn line(&self, focused: bool) -> Line<'static> {
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let value_style = if focused { FOCUS_STYLE } else { Style::default() };
        let marker = if focused { " > " } else { "   " };
        let mut spans = vec![Span::styled(
            format!("{marker}{:<width$} ", self.label, width = LABEL_WIDTH),
            label_style,
        )];

        match &self.kind {
            FieldKind::Text | FieldKind::Secret => {
                let shown = if matches!(self.kind, FieldKind::Secret) {
                    "\u{2022}".repeat(self.value.chars().count())
                } else {
                    self.value.clone()
                };
                let cursor = if focused { "_" } else { "" };
                spans.push(Span::styled(format!("{shown}{cursor}"), value_style));
                if self.value.is_empty() {
                    if let Some(hint) = self.hint {
                        spans.push(Span::styled(
                            format!(" {hint}"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }
            FieldKind::Toggle(on) => {
                let mark = if *on { "[x] On" } else { "[ ] Off" };
                spans.push(Span::styled(mark, value_style));
            }
            FieldKind::Selector {
                options,
                selected,
                placeholder,
            } => {
                let arrows = if focused { ("< ", " >") } else { ("  ", "  ") };
                match selected.and_then(|i| options.get(i)) {
                    Some(opt) => spans.push(Span::styled(
                        format!("{}{}{}", arrows.0, opt.label, arrows.1),
                        value_style,
                    )),
                    None => spans.push(Span::styled(
                        format!("{}{placeholder}{}", arrows.0, arrows.1),
                        Style::default().fg(Color::DarkGray),
                    )),
                }
            }
        }
        Line::from(spans)
    }

    fn wipe(&mut self) {
        if matches!(self.kind, FieldKind::Secret) {
            self.value.zeroize();
        }
    }
}

/// Keyboard-driven form: one focused field at a time, per-field inline
/// errors, and a snapshot of the values it was loaded with so `reset` can
/// restore them.
#[derive(Debug)]
pub struct Form {
    fields: Vec<FormField>,
    defaults: Vec<FormField>,
    focused: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let defaults = fields.clone();
        Self {
            fields,
            defaults,
            focused: 0,
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[cfg(test)]
    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focused).map(|f| f.key)
    }

    pub fn focus(&mut self, key: &str) {
        if let Some(i) = self.index(key) {
            self.focused = i;
        }
    }

    fn index(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Raw text of a text or secret field. Empty for unknown keys.
    pub fn text(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.as_str()).unwrap_or("")
    }

    #[cfg(test)]
    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(field) = self.field_mut(key) {
            if field.takes_text() {
                field.wipe();
                field.value = value.to_string();
            }
        }
    }

    pub fn toggle(&self, key: &str) -> bool {
        matches!(self.field(key).map(|f| &f.kind), Some(FieldKind::Toggle(true)))
    }

    /// Value of the selected option, if any.
    pub fn choice(&self, key: &str) -> Option<&str> {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Selector {
                options, selected, ..
            }) => selected
                .and_then(|i| options.get(i))
                .map(|o| o.value.as_str()),
            _ => None,
        }
    }

    /// Select the option carrying `value`; returns false when no option has it.
    pub fn select(&mut self, key: &str, value: &str) -> bool {
        if let Some(FormField {
            kind: FieldKind::Selector {
                options, selected, ..
            },
            ..
        }) = self.field_mut(key)
        {
            if let Some(i) = options.iter().position(|o| o.value == value) {
                *selected = Some(i);
                return true;
            }
        }
        false
    }

    /// Replace a selector's options, keeping the selection if its value
    /// survives.
    pub fn set_options(&mut self, key: &str, new_options: Vec<SelectOption>) {
        let keep = self.choice(key).map(str::to_string);
        if let Some(FormField {
            kind: FieldKind::Selector {
                options, selected, ..
            },
            ..
        }) = self.field_mut(key)
        {
            *selected = keep.and_then(|v| new_options.iter().position(|o| o.value == v));
            *options = new_options;
        }
    }

    #[cfg(test)]
    pub fn error(&self, key: &str) -> Option<&FieldError> {
        self.field(key).and_then(|f| f.error.as_ref())
    }

    pub fn set_error(&mut self, key: &str, error: FieldError) {
        if let Some(field) = self.field_mut(key) {
            field.error = Some(error);
        }
    }

    /// Record a validation outcome against a field, passing the value through.
    pub fn check<T>(&mut self, key: &str, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.set_error(key, e);
                None
            }
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Move focus to the first field with an error.
    pub fn focus_first_error(&mut self) {
        if let Some(i) = self.fields.iter().position(|f| f.error.is_some()) {
            self.focused = i;
        }
    }

    /// Restore the values the form was created with.
    pub fn reset(&mut self) {
        self.reset_except(&[]);
    }

    /// Restore defaults for every field except those in `keep`.
    pub fn reset_except(&mut self, keep: &[&str]) {
        for (field, default) in self.fields.iter_mut().zip(&self.defaults) {
            field.error = None;
            if keep.contains(&field.key) {
                continue;
            }
            field.wipe();
            field.value = default.value.clone();
            field.kind = match (&field.kind, &default.kind) {
                // options may have been replaced since construction
                (
                    FieldKind::Selector { options, .. },
                    FieldKind::Selector {
                        options: default_options,
                        selected,
                        placeholder,
                    },
                ) => FieldKind::Selector {
                    options: options.clone(),
                    selected: selected
                        .and_then(|i| default_options.get(i))
                        .and_then(|d| options.iter().position(|o| o.value == d.value)),
                    placeholder: *placeholder,
                },
                _ => default.kind.clone(),
            };
        }
        self.focused = 0;
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormAction {
        if self.fields.is_empty() {
            return match code {
                KeyCode::Esc => FormAction::Cancel,
                _ => FormAction::Continue,
            };
        }
        let len = self.fields.len();
        match code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % len;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 {
                    len - 1
                } else {
                    self.focused - 1
                };
            }
            KeyCode::Left => self.fields[self.focused].cycle(false),
            KeyCode::Right => self.fields[self.focused].cycle(true),
            KeyCode::Char(c) => {
                let field = &mut self.fields[self.focused];
                if field.takes_text() {
                    field.value.push(c);
                    field.error = None;
                } else if c == ' ' {
                    field.cycle(true);
                }
            }
            KeyCode::Backspace => {
                let field = &mut self.fields[self.focused];
                if field.takes_text() {
                    field.value.pop();
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    /// One line per field, plus an error line under any invalid field.
    /// `active` controls whether the focus marker is drawn.
    pub fn lines(&self, active: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            lines.push(field.line(active && i == self.focused));
            if let Some(err) = &field.error {
                lines.push(Line::from(Span::styled(
                    format!("   {:<width$} {err}", "", width = LABEL_WIDTH),
                    ERROR_STYLE,
                )));
            }
        }
        lines
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        for field in self.fields.iter_mut().chain(self.defaults.iter_mut()) {
            field.wipe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Form {
        Form::new(vec![
            FormField::text("name", "Name", "John Doe"),
            FormField::secret("password", "Password"),
            FormField::toggle("sms", "SMS", false),
            FormField::selector(
                "theme",
                "Theme",
                SelectOption::plain(&["light", "dark", "system"]),
                Some(2),
                "Select a theme",
            ),
            FormField::selector(
                "payee",
                "Payee",
                SelectOption::plain(&["a", "b"]),
                None,
                "Select a payee",
            ),
        ])
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_focus() {
        let mut form = sample();
        type_str(&mut form, "!");
        assert_eq!(form.text("name"), "John Doe!");
        form.handle_key(KeyCode::Backspace);
        form.handle_key(KeyCode::Tab);
        type_str(&mut form, "hunter22");
        assert_eq!(form.text("password"), "hunter22");
        form.handle_key(KeyCode::BackTab);
        assert_eq!(form.focused_key(), Some("name"));
        form.handle_key(KeyCode::Up);
        assert_eq!(form.focused_key(), Some("payee"));
    }

    #[test]
    fn test_toggle_and_selector_cycle() {
        let mut form = sample();
        form.focus("sms");
        form.handle_key(KeyCode::Char(' '));
        assert!(form.toggle("sms"));
        form.focus("theme");
        form.handle_key(KeyCode::Right);
        assert_eq!(form.choice("theme"), Some("light"));
        form.handle_key(KeyCode::Left);
        assert_eq!(form.choice("theme"), Some("system"));
        form.focus("payee");
        assert_eq!(form.choice("payee"), None);
        form.handle_key(KeyCode::Left);
        assert_eq!(form.choice("payee"), Some("b"));
    }

    #[test]
    fn test_enter_and_esc() {
        let mut form = sample();
        assert!(matches!(form.handle_key(KeyCode::Enter), FormAction::Submit));
        assert!(matches!(form.handle_key(KeyCode::Esc), FormAction::Cancel));
        assert!(matches!(form.handle_key(KeyCode::Tab), FormAction::Continue));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = sample();
        form.set_text("name", "Jane");
        form.set_text("password", "secret123");
        form.focus("sms");
        form.handle_key(KeyCode::Char(' '));
        form.select("theme", "dark");
        form.set_error("name", FieldError::BadEmail);

        form.reset();
        assert_eq!(form.text("name"), "John Doe");
        assert_eq!(form.text("password"), "");
        assert!(!form.toggle("sms"));
        assert_eq!(form.choice("theme"), Some("system"));
        assert!(!form.has_errors());
        assert_eq!(form.focused_key(), Some("name"));
    }

    #[test]
    fn test_reset_except_keeps_listed_fields() {
        let mut form = sample();
        form.set_text("password", "secret123");
        form.focus("sms");
        form.handle_key(KeyCode::Char(' '));
        form.reset_except(&["sms"]);
        assert_eq!(form.text("password"), "");
        assert!(form.toggle("sms"));
    }

    #[test]
    fn test_set_options_keeps_surviving_selection() {
        let mut form = sample();
        form.select("payee", "b");
        form.set_options("payee", SelectOption::plain(&["b", "c"]));
        assert_eq!(form.choice("payee"), Some("b"));
        form.set_options("payee", SelectOption::plain(&["c"]));
        assert_eq!(form.choice("payee"), None);
    }

    #[test]
    fn test_check_records_error() {
        let mut form = sample();
        let ok: Option<u8> = form.check("name", Ok(1));
        assert_eq!(ok, Some(1));
        let bad: Option<u8> = form.check("payee", Err(FieldError::UnknownPayee));
        assert!(bad.is_none());
        assert_eq!(form.error("payee"), Some(&FieldError::UnknownPayee));
        form.focus_first_error();
        assert_eq!(form.focused_key(), Some("payee"));
        form.clear_errors();
        assert!(!form.has_errors());
    }

    #[test]
    fn test_lines_mask_secrets_and_show_errors() {
        let mut form = sample();
        form.set_text("password", "abc");
        form.set_error("name", FieldError::TooShort { label: "Name", min: 2 });
        let text: Vec<String> = form
            .lines(true)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("\u{2022}\u{2022}\u{2022}")));
        assert!(!text.iter().any(|l| l.contains("abc")));
        assert!(text.iter().any(|l| l.contains("Name must be at least 2 characters.")));
        assert!(text.iter().any(|l| l.contains("Select a payee")));
    }
}
