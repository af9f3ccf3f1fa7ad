//! Frame around every screen: header, sidebar, footer.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::router::{Route, NAV_ROUTES};
use crate::tui::{separator, Toast, BORDER_STYLE, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE};

pub const SIDEBAR_WIDTH: u16 = 20;
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 5;

pub struct Shell<'a> {
    pub greeting: &'a str,
    pub route: &'a Route,
    pub collapsed: bool,
    pub toast: &'a Toast,
    /// Page-specific key hints; global hints are appended.
    pub hints: &'a str,
    pub year: i32,
}

impl Shell<'_> {
    /// Draw the chrome and return the area left for the page.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        let [header_area, sep1, body_area, sep2, status_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header_area);
        separator(frame, sep1);
        separator(frame, sep2);

        let sidebar_width = if self.collapsed {
            SIDEBAR_COLLAPSED_WIDTH
        } else {
            SIDEBAR_WIDTH
        };
        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Fill(1)])
                .areas(body_area);
        self.render_sidebar(frame, sidebar_area);

        match self.toast.line() {
            Some(line) => frame.render_widget(Paragraph::new(line), status_area),
            None => frame.render_widget(
                Paragraph::new(format!(" {}  1-5=pages  [=sidebar  q=quit", self.hints))
                    .style(FOOTER_STYLE),
                status_area,
            ),
        }

        frame.render_widget(
            Paragraph::new(format!(
                " \u{a9} {} BankDash Inc. All rights reserved.",
                self.year
            ))
            .style(FOOTER_STYLE),
            footer_area,
        );

        content_area
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let badge = match self.toast.shown() {
            0 => String::new(),
            n => format!("\u{25cf} {n} "),
        };
        let [left, right] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(badge.chars().count() as u16 + 1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" BankDash", HEADER_STYLE),
                Span::raw("  "),
                Span::raw(self.greeting.to_string()),
            ])),
            left,
        );
        frame.render_widget(
            Paragraph::new(badge).style(Style::default().fg(Color::Yellow)),
            right,
        );
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = NAV_ROUTES
            .iter()
            .map(|route| {
                let active = route == self.route;
                let text = if self.collapsed {
                    format!(" {} ", route.glyph())
                } else {
                    let key = route.hotkey().unwrap_or(' ');
                    format!(" {key} {} {}", route.glyph(), route.label())
                };
                let style = if active { SELECTED_STYLE } else { Style::default() };
                Line::from(Span::styled(text, style))
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(BORDER_STYLE),
            ),
            area,
        );
    }
}
