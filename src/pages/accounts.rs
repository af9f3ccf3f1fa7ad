use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{spending_pie, Page, PageAction, PageContext};
use crate::chart::{self, ChartConfig, ChartCursor, ChartSpec};
use crate::error::{BankDashError, Result};
use crate::fmt::{capitalize, mask_account_number, money_with};
use crate::models::{Account, Transaction};
use crate::router::NavPayload;
use crate::tui::{BORDER_STYLE, FOCUS_STYLE, FOOTER_STYLE, TITLE_STYLE};
use crate::widgets::account_card::{render_account_card, CARD_HEIGHT};
use crate::widgets::transaction_row::{transaction_header, transaction_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Transactions,
    Analysis,
    Details,
}

impl DetailTab {
    const ALL: [DetailTab; 3] = [DetailTab::Transactions, DetailTab::Analysis, DetailTab::Details];

    fn title(&self) -> &'static str {
        match self {
            DetailTab::Transactions => "Transactions",
            DetailTab::Analysis => "Spending Analysis",
            DetailTab::Details => "Details & Settings",
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

struct Detail {
    account: Account,
    tab: DetailTab,
    filter: String,
    editing_filter: bool,
    row: usize,
    analysis: ChartSpec,
    cursor: ChartCursor,
}

enum View {
    List,
    Detail(Box<Detail>),
}

pub struct AccountsPage {
    holder: String,
    symbol: String,
    accounts: Vec<Account>,
    selection: usize,
    view: View,
}

impl AccountsPage {
    pub fn new(holder: &str, symbol: &str) -> Self {
        Self {
            holder: holder.to_string(),
            symbol: symbol.to_string(),
            accounts: Vec::new(),
            selection: 0,
            view: View::List,
        }
    }

    #[cfg(test)]
    pub fn is_detail(&self) -> bool {
        matches!(self.view, View::Detail(_))
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<&Account> {
        match &self.view {
            View::Detail(d) => Some(&d.account),
            View::List => None,
        }
    }

    /// List to detail. Unknown ids leave the page where it was.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(pos) = self.accounts.iter().position(|a| a.id == id) else {
            return false;
        };
        self.selection = pos;
        let account = self.accounts[pos].clone();
        tracing::info!(account = account.id.as_str(), "account selected");
        let analysis = spending_pie("Spending by Category", &account.spending, ChartConfig::new());
        self.view = View::Detail(Box::new(Detail {
            account,
            tab: DetailTab::Transactions,
            filter: String::new(),
            editing_filter: false,
            row: 0,
            analysis,
            cursor: ChartCursor::default(),
        }));
        true
    }

    pub fn back(&mut self) {
        self.view = View::List;
    }

    #[cfg(test)]
    pub fn tab(&self) -> Option<DetailTab> {
        match &self.view {
            View::Detail(d) => Some(d.tab),
            View::List => None,
        }
    }

    #[cfg(test)]
    pub fn set_filter(&mut self, text: &str) {
        if let View::Detail(d) = &mut self.view {
            d.filter = text.to_string();
            d.row = 0;
        }
    }

    #[cfg(test)]
    /// Transactions of the selected account whose description contains the
    /// filter text, ignoring case. Empty filter shows everything.
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        match &self.view {
            View::Detail(d) => filter_transactions(&d.account.transactions, &d.filter),
            View::List => Vec::new(),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> PageAction {
        match code {
            KeyCode::Up | KeyCode::Left => {
                self.selection = self.selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Right => {
                if !self.accounts.is_empty() {
                    self.selection = (self.selection + 1).min(self.accounts.len() - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.accounts.get(self.selection).map(|a| a.id.clone()) {
                    self.select(&id);
                }
            }
            _ => return PageAction::Unhandled,
        }
        PageAction::Continue
    }

    fn handle_detail_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> PageAction {
        let View::Detail(detail) = &mut self.view else {
            return PageAction::Unhandled;
        };

        if detail.editing_filter {
            match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => detail.editing_filter = false,
                KeyCode::Backspace => {
                    detail.filter.pop();
                    detail.row = 0;
                }
                KeyCode::Char(c) => {
                    detail.filter.push(c);
                    detail.row = 0;
                }
                _ => {}
            }
            return PageAction::Continue;
        }

        match code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.back();
                return PageAction::Continue;
            }
            KeyCode::Tab | KeyCode::Right => detail.tab = detail.tab.next(),
            KeyCode::BackTab | KeyCode::Left => detail.tab = detail.tab.prev(),
            _ => match detail.tab {
                DetailTab::Transactions => match code {
                    KeyCode::Char('/') => detail.editing_filter = true,
                    KeyCode::Up => detail.row = detail.row.saturating_sub(1),
                    KeyCode::Down => {
                        let visible = filter_transactions(&detail.account.transactions, &detail.filter).len();
                        if visible > 0 {
                            detail.row = (detail.row + 1).min(visible - 1);
                        }
                    }
                    _ => return PageAction::Unhandled,
                },
                DetailTab::Analysis => match code {
                    KeyCode::Down => detail.cursor.next_row(&detail.analysis),
                    KeyCode::Up => detail.cursor.prev_row(&detail.analysis),
                    KeyCode::Enter => {
                        if let Some(sel) = detail
                            .cursor
                            .event(&detail.analysis)
                            .and_then(|e| detail.analysis.resolve(e))
                        {
                            tracing::debug!(index = sel.index, "analysis slice selected");
                            ctx.toast.info(
                                "Spending Analysis",
                                format!(
                                    "{}: {}",
                                    sel.row.label("category"),
                                    money_with(sel.row.value("value"), &self.symbol)
                                ),
                            );
                        }
                    }
                    _ => return PageAction::Unhandled,
                },
                DetailTab::Details => return PageAction::Unhandled,
            },
        }
        PageAction::Continue
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let [title_area, cards_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(" Your Accounts", TITLE_STYLE)),
                Line::from(Span::styled(
                    " Select an account to view details, transactions, and manage settings.",
                    FOOTER_STYLE,
                )),
            ]),
            title_area,
        );

        if self.accounts.is_empty() {
            frame.render_widget(Paragraph::new("   No accounts to display."), cards_area);
            return;
        }
        let rows = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); self.accounts.len()])
            .split(cards_area);
        for (i, (account, row)) in self.accounts.iter().zip(rows.iter()).enumerate() {
            let [card, _] =
                Layout::horizontal([Constraint::Max(60), Constraint::Fill(1)]).areas(*row);
            let selected = i == self.selection;
            let limit = account
                .credit_limit
                .map(|l| format!("Limit: {}", money_with(l, &self.symbol)));
            let actions = match (&limit, selected) {
                (Some(l), true) => Some(format!("{l}   Enter=View Details")),
                (Some(l), false) => Some(l.clone()),
                (None, true) => Some("Enter=View Details".to_string()),
                (None, false) => None,
            };
            render_account_card(frame, card, account, &self.symbol, selected, actions.as_deref());
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &Detail) {
        let account = &detail.account;
        let [back_area, header_area, tabs_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(" \u{2190} Back to All Accounts (Esc)").style(FOOTER_STYLE),
            back_area,
        );

        let mut header = vec![
            Line::from(vec![
                Span::styled(format!(" {}", account.name), TITLE_STYLE),
                Span::styled(
                    format!(
                        "   {} \u{2022} {}",
                        capitalize(account.kind.as_str()),
                        mask_account_number(&account.number)
                    ),
                    FOOTER_STYLE,
                ),
            ]),
            Line::from(Span::styled(" Available Balance", FOOTER_STYLE)),
            Line::from(Span::styled(
                format!(" {}", money_with(account.balance, &self.symbol)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(limit) = account.credit_limit {
            header.push(Line::from(Span::styled(
                format!(" Credit Limit: {}", money_with(limit, &self.symbol)),
                FOOTER_STYLE,
            )));
        }
        frame.render_widget(
            Paragraph::new(header).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(BORDER_STYLE),
            ),
            header_area,
        );

        let titles: Vec<&str> = DetailTab::ALL.iter().map(|t| t.title()).collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(detail.tab.position())
                .highlight_style(FOCUS_STYLE.add_modifier(Modifier::BOLD))
                .divider(" | "),
            tabs_area,
        );

        match detail.tab {
            DetailTab::Transactions => self.draw_transactions(frame, body_area, detail),
            DetailTab::Analysis => {
                if account.spending.is_empty() {
                    frame.render_widget(
                        Paragraph::new("\n No spending data available for analysis.")
                            .style(FOOTER_STYLE),
                        body_area,
                    );
                } else {
                    chart::render(frame, body_area, &detail.analysis, Some(&detail.cursor));
                }
            }
            DetailTab::Details => {
                let opened = detail.account.opened_on.format("%B %-d, %Y").to_string();
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(" Account Information", TITLE_STYLE)),
                    Line::from(format!(" Account Holder:  {}", self.holder)),
                    Line::from(format!(" Account Type:    {}", capitalize(account.kind.as_str()))),
                    Line::from(format!(" Opened On:       {opened}")),
                ];
                frame.render_widget(Paragraph::new(lines), body_area);
            }
        }
    }

    fn draw_transactions(&self, frame: &mut Frame, area: Rect, detail: &Detail) {
        let cursor = if detail.editing_filter { "_" } else { "" };
        let search_style = if detail.editing_filter {
            FOCUS_STYLE
        } else {
            Style::default()
        };
        let placeholder = if detail.filter.is_empty() && !detail.editing_filter {
            Span::styled("Search transactions... (/)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw("")
        };
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw(" Search: "),
                Span::styled(format!("{}{cursor}", detail.filter), search_style),
                placeholder,
            ]),
            Line::from(""),
            transaction_header(),
        ];

        let visible = filter_transactions(&detail.account.transactions, &detail.filter);
        if visible.is_empty() {
            let suffix = if detail.filter.is_empty() {
                ""
            } else {
                " matching your search"
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("   No transactions found{suffix}."),
                FOOTER_STYLE,
            )));
        } else {
            for (i, txn) in visible.iter().enumerate() {
                lines.push(transaction_line(
                    txn,
                    &self.symbol,
                    !detail.editing_filter && i == detail.row,
                ));
            }
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn filter_transactions<'a>(txns: &'a [Transaction], filter: &str) -> Vec<&'a Transaction> {
    let needle = filter.to_lowercase();
    txns.iter()
        .filter(|t| needle.is_empty() || t.description.to_lowercase().contains(&needle))
        .collect()
}

impl Page for AccountsPage {
    fn enter(&mut self, payload: Option<NavPayload>, ctx: &mut PageContext) -> Result<()> {
        self.accounts = ctx.store.accounts()?;
        self.selection = self.selection.min(self.accounts.len().saturating_sub(1));
        self.view = View::List;
        if let Some(NavPayload::ShowAccount(id)) = payload {
            match ctx.store.account(&id) {
                Ok(account) => {
                    self.select(&account.id);
                }
                Err(e @ BankDashError::UnknownAccount(_)) => {
                    tracing::warn!(account = id.as_str(), "navigation to unknown account");
                    ctx.toast.error("Account not found", e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        match &self.view {
            View::List => self.draw_list(frame, area),
            View::Detail(detail) => self.draw_detail(frame, area, detail),
        }
    }

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        Ok(match self.view {
            View::List => self.handle_list_key(code),
            View::Detail(_) => self.handle_detail_key(code, ctx),
        })
    }

    fn hints(&self) -> &'static str {
        match &self.view {
            View::List => "Up/Down=select  Enter=view details",
            View::Detail(d) if d.editing_filter => "type to filter  Enter=done",
            View::Detail(d) => match d.tab {
                DetailTab::Transactions => "Tab=next tab  /=search  Esc=back",
                DetailTab::Analysis => "Tab=next tab  Up/Down=slice  Enter=select  Esc=back",
                DetailTab::Details => "Tab=next tab  Esc=back",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_store;
    use crate::store::{BankStore, MemoryStore};
    use crate::test_utils::TestTerminal;
    use crate::tui::Toast;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn enter(page: &mut AccountsPage, store: &mut MemoryStore, payload: Option<NavPayload>) -> Toast {
        let mut toast = Toast::default();
        let mut ctx = PageContext {
            store,
            toast: &mut toast,
            today: today(),
        };
        page.enter(payload, &mut ctx).unwrap();
        toast
    }

    fn press(page: &mut AccountsPage, store: &mut MemoryStore, code: KeyCode) -> PageAction {
        let mut toast = Toast::default();
        let mut ctx = PageContext {
            store,
            toast: &mut toast,
            today: today(),
        };
        page.handle_key(code, &mut ctx).unwrap()
    }

    fn render(page: &mut AccountsPage) -> TestTerminal {
        let mut term = TestTerminal::with_size(110, 36);
        term.draw_with(|frame| page.draw(frame, frame.area()));
        term
    }

    #[test]
    fn test_select_every_account_shows_two_decimal_balance() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        for account in store.accounts().unwrap() {
            page.back();
            assert!(!page.is_detail());
            assert!(page.select(&account.id));
            assert!(page.is_detail());
            assert_eq!(page.selected().unwrap().balance, account.balance);
            let term = render(&mut page);
            assert!(term.buffer_contains(&money_with(account.balance, "$")));
        }
    }

    #[test]
    fn test_credit_balance_keeps_sign() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        page.select("acc_cc_001");
        let term = render(&mut page);
        assert!(term.buffer_contains("-$1,250.45"));
        assert!(term.buffer_contains("Credit Limit: $15,000.00"));
    }

    #[test]
    fn test_configured_symbol_used_for_list_and_detail() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "€");
        enter(&mut page, &mut store, None);
        let term = render(&mut page);
        assert!(term.buffer_contains("Limit: €15,000.00"));
        assert!(!term.buffer_contains("$"));

        page.select("acc_cc_001");
        let term = render(&mut page);
        assert!(term.buffer_contains("-€1,250.45"));
        assert!(term.buffer_contains("Credit Limit: €15,000.00"));
        assert!(!term.buffer_contains("$"));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        page.select("acc_chk_001");
        assert_eq!(page.visible_transactions().len(), 5);
        page.set_filter("COFFEE");
        let visible = page.visible_transactions();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "txn_c003");
        page.set_filter("");
        assert_eq!(page.visible_transactions().len(), 5);
    }

    #[test]
    fn test_filter_without_match_shows_indicator() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        page.select("acc_chk_001");
        press(&mut page, &mut store, KeyCode::Char('/'));
        for c in "zzqx".chars() {
            press(&mut page, &mut store, KeyCode::Char(c));
        }
        press(&mut page, &mut store, KeyCode::Enter);
        assert!(page.visible_transactions().is_empty());
        let term = render(&mut page);
        assert!(term.buffer_contains("No transactions found matching your search."));
    }

    #[test]
    fn test_navigation_payload_consumed_once() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(
            &mut page,
            &mut store,
            Some(NavPayload::ShowAccount("acc_sav_001".into())),
        );
        assert_eq!(page.selected().unwrap().id, "acc_sav_001");

        // coming back without a payload lands on the list
        enter(&mut page, &mut store, None);
        assert!(!page.is_detail());
    }

    #[test]
    fn test_unknown_account_payload_stays_on_list() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        let toast = enter(
            &mut page,
            &mut store,
            Some(NavPayload::ShowAccount("acc_nope".into())),
        );
        assert!(!page.is_detail());
        let msg = toast.current().unwrap();
        assert_eq!(msg.title, "Account not found");
        assert_eq!(msg.body, "Unknown account: acc_nope");
    }

    #[test]
    fn test_keys_drive_list_detail_and_tabs() {
        let mut store = sample_store(today());
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        press(&mut page, &mut store, KeyCode::Down);
        press(&mut page, &mut store, KeyCode::Enter);
        assert_eq!(page.selected().unwrap().id, "acc_sav_001");
        press(&mut page, &mut store, KeyCode::Tab);
        assert_eq!(page.tab(), Some(DetailTab::Analysis));
        press(&mut page, &mut store, KeyCode::Tab);
        assert_eq!(page.tab(), Some(DetailTab::Details));
        let term = render(&mut page);
        assert!(term.buffer_contains("Account Holder:  John Doe"));
        assert!(term.buffer_contains("Opened On:       January 15, 2020"));
        press(&mut page, &mut store, KeyCode::Esc);
        assert!(!page.is_detail());
        assert!(matches!(
            press(&mut page, &mut store, KeyCode::Char('q')),
            PageAction::Unhandled
        ));
    }

    #[test]
    fn test_analysis_empty_state() {
        let mut store = sample_store(today());
        store.accounts[0].spending.clear();
        let mut page = AccountsPage::new("John Doe", "$");
        enter(&mut page, &mut store, None);
        page.select("acc_chk_001");
        press(&mut page, &mut store, KeyCode::Tab);
        let term = render(&mut page);
        assert!(term.buffer_contains("No spending data available for analysis."));
    }
}
