use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::fmt::{money_with, signed_money};
use crate::models::{ActivityItem, Flow, Transaction, TxnStatus};
use crate::tui::{AMOUNT_NEG_STYLE, AMOUNT_POS_STYLE, FOOTER_STYLE, SELECTED_STYLE};

fn status_span(status: TxnStatus) -> Span<'static> {
    let (icon, color) = match status {
        TxnStatus::Pending => ("\u{25f7}", Color::Yellow),
        TxnStatus::Cleared => ("\u{2713}", Color::Green),
        TxnStatus::Failed => ("\u{2717}", Color::Red),
        TxnStatus::Processing => ("\u{21bb}", Color::Blue),
    };
    Span::styled(format!("{icon} {}", status.label()), Style::default().fg(color))
}

pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

/// Overview feed row: direction icon, description, date, amount, status.
pub fn activity_line(item: &ActivityItem, symbol: &str, width: usize) -> Line<'static> {
    let (icon, style, signed) = match item.flow {
        Flow::Income => ("\u{25b2}", AMOUNT_POS_STYLE, item.amount),
        Flow::Expense => ("\u{25bc}", AMOUNT_NEG_STYLE, -item.amount),
    };
    let desc_width = width.saturating_sub(45).max(12);
    Line::from(vec![
        Span::styled(format!(" {icon} "), style),
        Span::raw(format!("{:<desc_width$} ", truncate(&item.description, desc_width))),
        Span::styled(format!("{:<13}", item.date), FOOTER_STYLE),
        Span::styled(format!("{:>12}  ", money_with(signed, symbol)), style),
        status_span(item.status),
    ])
}

/// Account detail table row.
pub fn transaction_line(txn: &Transaction, symbol: &str, selected: bool) -> Line<'static> {
    let amount_style = if txn.amount < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    let marker = if selected { " > " } else { "   " };
    let mut spans = vec![
        Span::raw(format!("{marker}{:<12}", txn.date)),
        Span::raw(format!("{:<38}", truncate(&txn.description, 36))),
        Span::styled(
            format!("{:<14}", txn.category.as_deref().unwrap_or("")),
            FOOTER_STYLE,
        ),
        Span::styled(format!("{:>12}  ", signed_money(txn.amount, symbol)), amount_style),
        status_span(txn.status),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.patch(SELECTED_STYLE);
        }
    }
    Line::from(spans)
}

/// Column header matching [`transaction_line`].
pub fn transaction_header() -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "   {:<12}{:<38}{:<14}{:>12}  {}",
            "Date", "Description", "Category", "Amount", "Status"
        ),
        FOOTER_STYLE,
    ))
}
