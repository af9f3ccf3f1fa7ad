use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fmt::{mask_account_number, money_with};
use crate::models::{Account, AccountKind};
use crate::tui::{BORDER_STYLE, FOOTER_STYLE};

/// Rows a card needs including its border.
pub const CARD_HEIGHT: u16 = 7;

fn accent(kind: AccountKind) -> Color {
    match kind {
        AccountKind::Checking => Color::Blue,
        AccountKind::Savings => Color::Green,
        AccountKind::Credit => Color::Magenta,
    }
}

/// Summary card: name, masked number, available balance. `actions` is the
/// hint line at the bottom ("Enter=view  t=transfer" on the overview).
pub fn render_account_card(
    frame: &mut Frame,
    area: Rect,
    account: &Account,
    symbol: &str,
    selected: bool,
    actions: Option<&str>,
) {
    let border = if selected {
        Style::default().fg(accent(account.kind)).add_modifier(Modifier::BOLD)
    } else {
        BORDER_STYLE
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {} ", account.name),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Account No: {}", mask_account_number(&account.number)),
            FOOTER_STYLE,
        )),
        Line::from(Span::styled(" Available Balance", FOOTER_STYLE)),
        Line::from(Span::styled(
            format!(" {}", money_with(account.balance, symbol)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(actions) = actions {
        let style = if selected {
            Style::default().fg(Color::Cyan)
        } else {
            FOOTER_STYLE
        };
        lines.push(Line::from(Span::styled(format!(" {actions}"), style)));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
