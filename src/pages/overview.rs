use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{next_chart_kind, spending_chart, Page, PageAction, PageContext};
use crate::chart::{self, ChartConfig, ChartCursor, ChartKind, ChartSpec, PALETTE};
use crate::error::Result;
use crate::fmt::money_with;
use crate::models::{Account, ActivityItem, SpendingCategory};
use crate::router::{NavPayload, NavRequest, Route};
use crate::tui::{section_title, BORDER_STYLE, FOOTER_STYLE, TITLE_STYLE};
use crate::widgets::account_card::{render_account_card, CARD_HEIGHT};
use crate::widgets::transaction_row::activity_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Cards,
    Chart,
}

pub struct OverviewPage {
    symbol: String,
    accounts: Vec<Account>,
    activity: Vec<ActivityItem>,
    spending_data: Vec<SpendingCategory>,
    chart_kind: ChartKind,
    spending: ChartSpec,
    pane: Pane,
    card: usize,
    cursor: ChartCursor,
}

fn spending_config() -> ChartConfig {
    ChartConfig::new()
        .entry("value", "Spending", None)
        .entry("Groceries", "Groceries", Some(PALETTE[0]))
        .entry("Utilities", "Utilities", Some(PALETTE[1]))
        .entry("Dining Out", "Dining Out", Some(PALETTE[2]))
        .entry("Transport", "Transport", Some(PALETTE[3]))
        .entry("Shopping", "Shopping", Some(PALETTE[4]))
        .entry("Entertainment", "Entertainment", Some(PALETTE[5]))
}

impl OverviewPage {
    /// `chart_kind` is how the spending breakdown is first drawn; the chart
    /// pane's `c` key cycles it.
    pub fn new(symbol: &str, chart_kind: ChartKind) -> Self {
        Self {
            symbol: symbol.to_string(),
            accounts: Vec::new(),
            activity: Vec::new(),
            spending_data: Vec::new(),
            spending: spending_chart(chart_kind.clone(), "Spending Overview", &[], spending_config()),
            chart_kind,
            pane: Pane::Cards,
            card: 0,
            cursor: ChartCursor::default(),
        }
    }

    fn rebuild_chart(&mut self) {
        self.spending = spending_chart(
            self.chart_kind.clone(),
            "Spending Overview",
            &self.spending_data,
            spending_config(),
        );
    }

    fn selected_account(&self) -> Option<&Account> {
        self.accounts.get(self.card)
    }

    /// Report the focused slice the way a click would.
    fn click_slice(&self, ctx: &mut PageContext) {
        let Some(event) = self.cursor.event(&self.spending) else {
            return;
        };
        let Some(selection) = self.spending.resolve(event) else {
            return;
        };
        let category = selection.row.label("category");
        let value = selection.row.value("value");
        tracing::debug!(index = selection.index, category = category.as_str(), "spending slice selected");
        ctx.toast.info(
            "Spending Overview",
            format!(
                "{category}: {} ({:.0}% of spending)",
                money_with(value, &self.symbol),
                self.spending.slice_percent(selection.index)
            ),
        );
    }

    fn handle_cards_key(&mut self, code: KeyCode) -> PageAction {
        match code {
            KeyCode::Left => {
                self.card = self.card.saturating_sub(1);
            }
            KeyCode::Right => {
                if !self.accounts.is_empty() {
                    self.card = (self.card + 1).min(self.accounts.len() - 1);
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if let Some(account) = self.selected_account() {
                    return PageAction::Navigate(NavRequest::show_account(&account.id));
                }
            }
            KeyCode::Char('t') => {
                if let Some(account) = self.selected_account() {
                    return PageAction::Navigate(NavRequest::transfer_from(&account.id));
                }
            }
            _ => return PageAction::Unhandled,
        }
        PageAction::Continue
    }

    fn handle_chart_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> PageAction {
        match code {
            KeyCode::Down | KeyCode::Right => self.cursor.next_row(&self.spending),
            KeyCode::Up | KeyCode::Left => self.cursor.prev_row(&self.spending),
            KeyCode::Enter => self.click_slice(ctx),
            KeyCode::Char('c') => {
                self.chart_kind = next_chart_kind(&self.chart_kind);
                self.rebuild_chart();
                tracing::debug!(kind = %self.chart_kind, "spending chart style changed");
            }
            _ => return PageAction::Unhandled,
        }
        PageAction::Continue
    }

    fn draw_banner(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                " Welcome Back!",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(" Here's your financial overview for today."),
            Line::from(Span::styled(
                " m=Make a Transfer   p=Pay a Bill   a=View All Accounts",
                FOOTER_STYLE,
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect) {
        if self.accounts.is_empty() {
            frame.render_widget(Paragraph::new("   No accounts to display."), area);
            return;
        }
        let constraints = vec![Constraint::Fill(1); self.accounts.len()];
        let cells = Layout::horizontal(constraints).split(area);
        for (i, (account, cell)) in self.accounts.iter().zip(cells.iter()).enumerate() {
            let selected = self.pane == Pane::Cards && i == self.card;
            let actions = selected.then_some("Enter=View Transactions  t=Transfer");
            render_account_card(frame, *cell, account, &self.symbol, selected, actions);
        }
    }

    fn draw_activity(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(BORDER_STYLE)
            .title(Span::styled(" Recent Transactions ", TITLE_STYLE));
        let inner_width = area.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = if self.activity.is_empty() {
            vec![Line::from(Span::styled(
                " No recent transactions to display.",
                FOOTER_STYLE,
            ))]
        } else {
            self.activity
                .iter()
                .map(|item| activity_line(item, &self.symbol, inner_width))
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let border = if self.pane == Pane::Chart {
            Style::default().fg(Color::Cyan)
        } else {
            BORDER_STYLE
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let cursor = (self.pane == Pane::Chart).then_some(&self.cursor);
        chart::render(frame, inner, &self.spending, cursor);
    }
}

impl Page for OverviewPage {
    fn enter(&mut self, _payload: Option<NavPayload>, ctx: &mut PageContext) -> Result<()> {
        self.accounts = ctx.store.accounts()?;
        self.activity = ctx.store.recent_activity()?;
        self.spending_data = ctx.store.spending_overview()?;
        self.rebuild_chart();
        self.card = self.card.min(self.accounts.len().saturating_sub(1));
        tracing::info!(accounts = self.accounts.len(), "overview loaded");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [banner_area, title_area, cards_area, bottom_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.draw_banner(frame, banner_area);
        frame.render_widget(
            Paragraph::new(section_title("Account Summaries").to_vec()),
            title_area,
        );
        self.draw_cards(frame, cards_area);

        let [activity_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(bottom_area);
        self.draw_activity(frame, activity_area);
        self.draw_chart(frame, chart_area);
    }

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        let action = match code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.pane = match self.pane {
                    Pane::Cards => Pane::Chart,
                    Pane::Chart => Pane::Cards,
                };
                PageAction::Continue
            }
            KeyCode::Char('m') => PageAction::Navigate(NavRequest::to(Route::Transfers)),
            KeyCode::Char('p') => PageAction::Navigate(NavRequest::to(Route::BillPay)),
            KeyCode::Char('a') => PageAction::Navigate(NavRequest::to(Route::Accounts)),
            _ => match self.pane {
                Pane::Cards => self.handle_cards_key(code),
                Pane::Chart => self.handle_chart_key(code, ctx),
            },
        };
        Ok(action)
    }

    fn hints(&self) -> &'static str {
        match self.pane {
            Pane::Cards => "Left/Right=card  Enter=view  t=transfer  Tab=chart",
            Pane::Chart => "Up/Down=point  Enter=select  c=chart style  Tab=cards",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_store;
    use crate::store::MemoryStore;
    use crate::test_utils::TestTerminal;
    use crate::tui::Toast;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn setup() -> (OverviewPage, MemoryStore, Toast) {
        let mut store = sample_store(today());
        let mut toast = Toast::default();
        let mut page = OverviewPage::new("$", ChartKind::Pie);
        let mut ctx = PageContext {
            store: &mut store,
            toast: &mut toast,
            today: today(),
        };
        page.enter(None, &mut ctx).unwrap();
        (page, store, toast)
    }

    fn press(
        page: &mut OverviewPage,
        store: &mut MemoryStore,
        toast: &mut Toast,
        code: KeyCode,
    ) -> PageAction {
        let mut ctx = PageContext {
            store,
            toast,
            today: today(),
        };
        page.handle_key(code, &mut ctx).unwrap()
    }

    #[test]
    fn test_card_actions_carry_payloads() {
        let (mut page, mut store, mut toast) = setup();
        press(&mut page, &mut store, &mut toast, KeyCode::Right);
        match press(&mut page, &mut store, &mut toast, KeyCode::Enter) {
            PageAction::Navigate(req) => {
                assert_eq!(req.route, Route::Accounts);
                assert_eq!(req.payload, Some(NavPayload::ShowAccount("acc_sav_001".into())));
            }
            _ => panic!("expected navigation"),
        }
        match press(&mut page, &mut store, &mut toast, KeyCode::Char('t')) {
            PageAction::Navigate(req) => {
                assert_eq!(req.route, Route::Transfers);
                assert_eq!(req.payload, Some(NavPayload::TransferFrom("acc_sav_001".into())));
            }
            _ => panic!("expected navigation"),
        }
    }

    #[test]
    fn test_quick_actions() {
        let (mut page, mut store, mut toast) = setup();
        assert!(matches!(
            press(&mut page, &mut store, &mut toast, KeyCode::Char('p')),
            PageAction::Navigate(NavRequest { route: Route::BillPay, payload: None })
        ));
        assert!(matches!(
            press(&mut page, &mut store, &mut toast, KeyCode::Char('q')),
            PageAction::Unhandled
        ));
    }

    #[test]
    fn test_slice_click_reports_row() {
        let (mut page, mut store, mut toast) = setup();
        press(&mut page, &mut store, &mut toast, KeyCode::Tab);
        press(&mut page, &mut store, &mut toast, KeyCode::Down);
        press(&mut page, &mut store, &mut toast, KeyCode::Enter);
        let msg = toast.current().unwrap();
        assert_eq!(msg.title, "Spending Overview");
        assert!(msg.body.starts_with("Utilities: $180.00"));
    }

    #[test]
    fn test_chart_style_cycles_and_still_resolves_rows() {
        let (mut page, mut store, mut toast) = setup();
        press(&mut page, &mut store, &mut toast, KeyCode::Tab);
        press(&mut page, &mut store, &mut toast, KeyCode::Char('c'));
        assert_eq!(page.spending.kind, ChartKind::Bar);
        press(&mut page, &mut store, &mut toast, KeyCode::Down);
        press(&mut page, &mut store, &mut toast, KeyCode::Enter);
        assert!(toast.current().unwrap().body.starts_with("Utilities: $180.00"));

        press(&mut page, &mut store, &mut toast, KeyCode::Char('c'));
        assert_eq!(page.spending.kind, ChartKind::Line);
        press(&mut page, &mut store, &mut toast, KeyCode::Char('c'));
        assert_eq!(page.spending.kind, ChartKind::Pie);
        assert_eq!(page.spending.rows.len(), 6);
    }

    #[test]
    fn test_unsupported_start_style_degrades() {
        let mut store = sample_store(today());
        let mut toast = Toast::default();
        let mut page = OverviewPage::new("$", ChartKind::parse("radar"));
        let mut ctx = PageContext {
            store: &mut store,
            toast: &mut toast,
            today: today(),
        };
        page.enter(None, &mut ctx).unwrap();
        let mut term = TestTerminal::with_size(160, 40);
        term.draw_with(|frame| page.draw(frame, frame.area()));
        assert!(term.buffer_contains("Unsupported chart type: radar"));
    }

    #[test]
    fn test_overview_config_colours_slices_by_category() {
        let (page, _, _) = setup();
        assert_eq!(page.spending.slice_color(0), PALETTE[0]);
        assert_eq!(page.spending.slice_color(5), PALETTE[5]);
    }

    #[test]
    fn test_render_overview() {
        let (mut page, _, _) = setup();
        let mut term = TestTerminal::with_size(160, 40);
        term.draw_with(|frame| page.draw(frame, frame.area()));
        assert!(term.buffer_contains("Welcome Back!"));
        assert!(term.buffer_contains("Primary Checking"));
        assert!(term.buffer_contains("$10,530.75"));
        assert!(term.buffer_contains("Netflix Subscription Renewal"));
        assert!(term.buffer_contains("Spending Overview"));
    }
}
