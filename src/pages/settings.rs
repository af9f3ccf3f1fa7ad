//! Settings screen: four independent forms. Submitting one only logs the
//! values and confirms; nothing is persisted or shared with other pages.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{Focus, Page, PageAction, PageContext};
use crate::error::Result;
use crate::form::{Form, FormAction, FormField, SelectOption};
use crate::router::NavPayload;
use crate::tui::{BORDER_STYLE, FOCUS_STYLE, FOOTER_STYLE, TITLE_STYLE};
use crate::validate;

const PASSWORD_MIN: usize = 8;
const BIO_MAX: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
    Profile,
    Notifications,
    Security,
    Preferences,
}

impl SettingsTab {
    const ALL: [SettingsTab; 4] = [
        SettingsTab::Profile,
        SettingsTab::Notifications,
        SettingsTab::Security,
        SettingsTab::Preferences,
    ];

    fn title(&self) -> &'static str {
        match self {
            SettingsTab::Profile => "Profile",
            SettingsTab::Notifications => "Notifications",
            SettingsTab::Security => "Security",
            SettingsTab::Preferences => "Preferences",
        }
    }

    fn blurb(&self) -> &'static str {
        match self {
            SettingsTab::Profile => "Manage your personal information.",
            SettingsTab::Notifications => "Choose how you want to be notified.",
            SettingsTab::Security => "Update your password and security settings.",
            SettingsTab::Preferences => "Customize your application experience.",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

fn profile_form() -> Form {
    Form::new(vec![
        FormField::text("name", "Full Name", "John Doe"),
        FormField::text("email", "Email", "john.doe@example.com"),
        FormField::text("phone", "Phone", "").hint("optional"),
        FormField::text("bio", "Bio", "Banking enthusiast."),
    ])
}

fn notifications_form() -> Form {
    Form::new(vec![
        FormField::toggle("email", "Email alerts", true),
        FormField::toggle("sms", "SMS alerts", false),
        FormField::toggle("push", "Push notifications", true),
        FormField::toggle("promotional", "Promotional emails", false),
    ])
}

fn security_form() -> Form {
    Form::new(vec![
        FormField::secret("current", "Current Password"),
        FormField::secret("new", "New Password"),
        FormField::secret("confirm", "Confirm Password"),
        FormField::toggle("two_factor", "Two-factor auth", true),
    ])
}

fn preferences_form() -> Form {
    Form::new(vec![
        FormField::selector(
            "theme",
            "Theme",
            vec![
                SelectOption::new("light", "Light"),
                SelectOption::new("dark", "Dark"),
                SelectOption::new("system", "System"),
            ],
            Some(2),
            "Select a theme",
        ),
        FormField::selector(
            "language",
            "Language",
            vec![
                SelectOption::new("en-US", "English (US)"),
                SelectOption::new("es-ES", "Espa\u{f1}ol"),
                SelectOption::new("fr-FR", "Fran\u{e7}ais"),
            ],
            Some(0),
            "Select a language",
        ),
        FormField::selector(
            "date_format",
            "Date Format",
            SelectOption::plain(&["MM/DD/YYYY", "DD/MM/YYYY", "YYYY-MM-DD"]),
            Some(0),
            "Select a date format",
        ),
    ])
}

pub struct SettingsPage {
    tab: SettingsTab,
    focus: Focus,
    profile: Form,
    notifications: Form,
    security: Form,
    preferences: Form,
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsPage {
    pub fn new() -> Self {
        Self {
            tab: SettingsTab::Profile,
            focus: Focus::Browse,
            profile: profile_form(),
            notifications: notifications_form(),
            security: security_form(),
            preferences: preferences_form(),
        }
    }

    #[cfg(test)]
    pub fn tab(&self) -> SettingsTab {
        self.tab
    }

    #[cfg(test)]
    pub fn set_tab(&mut self, tab: SettingsTab) {
        self.tab = tab;
    }

    pub fn form(&self, tab: SettingsTab) -> &Form {
        match tab {
            SettingsTab::Profile => &self.profile,
            SettingsTab::Notifications => &self.notifications,
            SettingsTab::Security => &self.security,
            SettingsTab::Preferences => &self.preferences,
        }
    }

    pub fn form_mut(&mut self, tab: SettingsTab) -> &mut Form {
        match tab {
            SettingsTab::Profile => &mut self.profile,
            SettingsTab::Notifications => &mut self.notifications,
            SettingsTab::Security => &mut self.security,
            SettingsTab::Preferences => &mut self.preferences,
        }
    }

    /// Restore the current tab's form to the values it was loaded with.
    pub fn reset(&mut self) {
        self.form_mut(self.tab).reset();
    }

    /// Validate and "save" the current tab. Returns whether it passed.
    pub fn submit(&mut self, ctx: &mut PageContext) -> bool {
        let saved = match self.tab {
            SettingsTab::Profile => self.submit_profile(),
            SettingsTab::Notifications => self.submit_notifications(),
            SettingsTab::Security => self.submit_security(),
            SettingsTab::Preferences => self.submit_preferences(),
        };
        if !saved {
            self.form_mut(self.tab).focus_first_error();
            tracing::warn!(tab = self.tab.title(), "settings rejected by validation");
            return false;
        }
        let (title, body) = match self.tab {
            SettingsTab::Profile => ("Profile Updated", "Your profile settings have been saved."),
            SettingsTab::Notifications => (
                "Notifications Updated",
                "Your notification preferences have been saved.",
            ),
            SettingsTab::Security => (
                "Security Settings Updated",
                "Your security settings have been changed.",
            ),
            SettingsTab::Preferences => (
                "Preferences Updated",
                "Your application preferences have been saved.",
            ),
        };
        ctx.toast.success(title, body);
        true
    }

    fn submit_profile(&mut self) -> bool {
        let form = &mut self.profile;
        form.clear_errors();
        form.check("name", validate::min_len(form.text("name").trim(), "Name", 2));
        form.check("email", validate::email(form.text("email")));
        form.check("bio", validate::max_len(form.text("bio"), "Bio", BIO_MAX));
        if form.has_errors() {
            return false;
        }
        tracing::info!(
            name = form.text("name"),
            email = form.text("email"),
            phone = form.text("phone"),
            bio = form.text("bio"),
            "profile submitted"
        );
        true
    }

    fn submit_notifications(&mut self) -> bool {
        let form = &self.notifications;
        tracing::info!(
            email = form.toggle("email"),
            sms = form.toggle("sms"),
            push = form.toggle("push"),
            promotional = form.toggle("promotional"),
            "notification preferences submitted"
        );
        true
    }

    fn submit_security(&mut self) -> bool {
        let form = &mut self.security;
        form.clear_errors();
        form.check(
            "current",
            validate::min_len(form.text("current"), "Password", PASSWORD_MIN),
        );
        let new_ok = form
            .check("new", validate::min_len(form.text("new"), "New password", PASSWORD_MIN))
            .is_some();
        let confirm_ok = form
            .check(
                "confirm",
                validate::min_len(form.text("confirm"), "New password", PASSWORD_MIN),
            )
            .is_some();
        if new_ok && confirm_ok {
            form.check(
                "confirm",
                validate::passwords_match(form.text("new"), form.text("confirm")),
            );
        }
        if form.has_errors() {
            return false;
        }
        tracing::info!(
            two_factor = form.toggle("two_factor"),
            "security settings submitted"
        );
        form.reset_except(&["two_factor"]);
        true
    }

    fn submit_preferences(&mut self) -> bool {
        let form = &self.preferences;
        tracing::info!(
            theme = form.choice("theme").unwrap_or_default(),
            language = form.choice("language").unwrap_or_default(),
            date_format = form.choice("date_format").unwrap_or_default(),
            "preferences submitted"
        );
        true
    }
}

impl Page for SettingsPage {
    fn enter(&mut self, _payload: Option<NavPayload>, _ctx: &mut PageContext) -> Result<()> {
        self.focus = Focus::Browse;
        tracing::info!(tab = self.tab.title(), "settings opened");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [heading_area, tabs_area, body_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(" Settings", TITLE_STYLE)),
                Line::from(Span::styled(
                    " Manage your account settings and preferences.",
                    FOOTER_STYLE,
                )),
            ]),
            heading_area,
        );

        let titles: Vec<&str> = SettingsTab::ALL.iter().map(|t| t.title()).collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(self.tab.position())
                .highlight_style(FOCUS_STYLE.add_modifier(Modifier::BOLD))
                .divider(" | "),
            tabs_area,
        );

        let active = self.focus == Focus::Edit;
        let mut lines = vec![
            Line::from(Span::styled(format!(" {}", self.tab.blurb()), FOOTER_STYLE)),
            Line::from(""),
        ];
        lines.extend(self.form(self.tab).lines(active));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if active {
                "   Enter=Save  Space=toggle  Esc=done"
            } else {
                "   Enter=edit  r=reset"
            },
            if active { FOCUS_STYLE } else { FOOTER_STYLE },
        )));
        let border = if active {
            Style::default().fg(Color::Cyan)
        } else {
            BORDER_STYLE
        };
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Span::styled(format!(" {} ", self.tab.title()), TITLE_STYLE)),
            ),
            body_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        if self.focus == Focus::Browse {
            match code {
                KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
                KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
                KeyCode::Enter | KeyCode::Char('e') => self.focus = Focus::Edit,
                KeyCode::Char('r') => {
                    self.reset();
                    ctx.toast
                        .info("Form Reset", format!("{} restored.", self.tab.title()));
                }
                _ => return Ok(PageAction::Unhandled),
            }
            return Ok(PageAction::Continue);
        }
        match self.form_mut(self.tab).handle_key(code) {
            FormAction::Continue => {}
            FormAction::Cancel => self.focus = Focus::Browse,
            FormAction::Submit => {
                if self.submit(ctx) {
                    self.focus = Focus::Browse;
                }
            }
        }
        Ok(PageAction::Continue)
    }

    fn hints(&self) -> &'static str {
        match self.focus {
            Focus::Browse => "Tab=next tab  Enter=edit  r=reset",
            Focus::Edit => "Tab=next field  Space=toggle  Enter=save  Esc=done",
        }
    }
}
