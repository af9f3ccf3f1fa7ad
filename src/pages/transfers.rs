use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Focus, Page, PageAction, PageContext};
use crate::error::{BankDashError, Result};
use crate::fmt::money_with;
use crate::form::{Form, FormAction, FormField, SelectOption};
use crate::models::{Account, TransferRecord, TransferStatus};
use crate::router::NavPayload;
use crate::tui::{BORDER_STYLE, FOCUS_STYLE, FOOTER_STYLE, TITLE_STYLE};
use crate::validate;
use crate::widgets::transaction_row::truncate;

const MEMO_MAX: usize = 100;
const DEFAULT_MEMO: &str = "User Transfer";

fn status_color(status: TransferStatus) -> Color {
    match status {
        TransferStatus::Completed => Color::Green,
        TransferStatus::Pending | TransferStatus::Processing => Color::Yellow,
        TransferStatus::Scheduled => Color::Blue,
        TransferStatus::Failed => Color::Red,
    }
}

fn transfer_form() -> Form {
    Form::new(vec![
        FormField::selector("from", "From Account", Vec::new(), None, "Select source account"),
        FormField::selector("to", "To Account", Vec::new(), None, "Select destination account"),
        FormField::text("amount", "Amount", "").hint("0.00"),
        FormField::text("date", "Transfer Date", "").hint("YYYY-MM-DD, blank = now"),
        FormField::text("memo", "Memo", DEFAULT_MEMO),
    ])
}

pub struct TransfersPage {
    symbol: String,
    accounts: Vec<Account>,
    history: Vec<TransferRecord>,
    form: Form,
    focus: Focus,
}

impl TransfersPage {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            accounts: Vec::new(),
            history: Vec::new(),
            form: transfer_form(),
            focus: Focus::Browse,
        }
    }

    #[cfg(test)]
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    #[cfg(test)]
    pub fn history(&self) -> &[TransferRecord] {
        &self.history
    }

    fn reload(&mut self, ctx: &PageContext) -> Result<()> {
        self.accounts = ctx.store.accounts()?;
        self.history = ctx.store.transfers()?;
        let from = self
            .accounts
            .iter()
            .map(|a| {
                SelectOption::new(
                    &a.id,
                    &format!("{} ({})", a.name, money_with(a.balance, &self.symbol)),
                )
            })
            .collect();
        let to = self
            .accounts
            .iter()
            .map(|a| SelectOption::new(&a.id, &a.name))
            .collect();
        self.form.set_options("from", from);
        self.form.set_options("to", to);
        Ok(())
    }

    fn account_name(&self, id: &str) -> String {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Validate the form and record the transfer at the head of history.
    /// Balances are never touched.
    pub fn submit(&mut self, ctx: &mut PageContext) -> Result<bool> {
        self.form.clear_errors();

        let from = validate::selected(self.form.choice("from"), "Please select a source account.")
            .map(str::to_string);
        let from = self.form.check("from", from);
        let to = validate::selected(self.form.choice("to"), "Please select a destination account.")
            .map(str::to_string);
        let to = self.form.check("to", to);
        if let (Some(from), Some(to)) = (&from, &to) {
            self.form
                .check("to", validate::different_accounts(from, to));
        }
        let amount = self
            .form
            .check("amount", validate::positive_amount(self.form.text("amount")));
        let date = self
            .form
            .check("date", validate::optional_date(self.form.text("date"), ctx.today));
        let memo = self.form.text("memo").trim().to_string();
        self.form
            .check("memo", validate::max_len(&memo, "Memo", MEMO_MAX));

        let (Some(from), Some(to), Some(amount), Some(date), false) =
            (from, to, amount, date, self.form.has_errors())
        else {
            self.form.focus_first_error();
            tracing::warn!("transfer rejected by validation");
            return Ok(false);
        };

        let (status, when) = match date {
            Some(d) => (TransferStatus::Scheduled, d),
            None => (TransferStatus::Processing, ctx.today),
        };
        let record = TransferRecord {
            id: ctx.store.next_id("xfer"),
            date: when,
            from: self.account_name(&from),
            to: self.account_name(&to),
            amount,
            status,
            memo: if memo.is_empty() {
                DEFAULT_MEMO.to_string()
            } else {
                memo
            },
        };
        tracing::info!(
            transfer = record.id.as_str(),
            from = from.as_str(),
            to = to.as_str(),
            amount,
            status = status.label(),
            "transfer recorded"
        );

        let timing = match date {
            Some(d) => format!("on {}", d.format("%Y-%m-%d")),
            None => "immediately".to_string(),
        };
        ctx.toast.success(
            "Transfer Initiated",
            format!(
                "Transferring {} from {} to {} {timing}.",
                money_with(amount, &self.symbol),
                record.from,
                record.to
            ),
        );
        ctx.store.record_transfer(record)?;
        self.form.reset();
        self.reload(ctx)?;
        Ok(true)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let active = self.focus == Focus::Edit;
        let border = if active {
            Style::default().fg(Color::Cyan)
        } else {
            BORDER_STYLE
        };
        let mut lines = vec![
            Line::from(Span::styled(
                " Move money between your accounts.",
                FOOTER_STYLE,
            )),
            Line::from(""),
        ];
        lines.extend(self.form.lines(active));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if active {
                "   Enter=Submit Transfer  Esc=done"
            } else {
                "   Enter=fill in the form"
            },
            if active { FOCUS_STYLE } else { FOOTER_STYLE },
        )));
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(Span::styled(" Make a Transfer ", TITLE_STYLE)),
            ),
            area,
        );
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(" Transfer History", TITLE_STYLE)),
            Line::from(Span::styled(
                format!(
                    "   {:<12}{:<22}{:<24}{:>12}  {:<11}{}",
                    "Date", "From", "To", "Amount", "Status", "Memo"
                ),
                FOOTER_STYLE,
            )),
        ];
        if self.history.is_empty() {
            lines.push(Line::from(Span::styled(
                "   No transfer history found.",
                FOOTER_STYLE,
            )));
        }
        for t in &self.history {
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "   {:<12}{:<22}{:<24}{:>12}  ",
                    t.date.format("%Y-%m-%d"),
                    truncate(&t.from, 20),
                    truncate(&t.to, 22),
                    money_with(t.amount, &self.symbol)
                )),
                Span::styled(
                    format!("{:<11}", t.status.label()),
                    Style::default().fg(status_color(t.status)),
                ),
                Span::styled(t.memo.clone(), FOOTER_STYLE),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Page for TransfersPage {
    fn enter(&mut self, payload: Option<NavPayload>, ctx: &mut PageContext) -> Result<()> {
        self.form.reset();
        self.reload(ctx)?;
        self.focus = Focus::Browse;
        if let Some(NavPayload::TransferFrom(id)) = payload {
            match ctx.store.account(&id) {
                Ok(account) => {
                    self.form.select("from", &account.id);
                    self.form.focus("to");
                    self.focus = Focus::Edit;
                }
                Err(e @ BankDashError::UnknownAccount(_)) => {
                    tracing::warn!(account = id.as_str(), "transfer from unknown account");
                    ctx.toast.error("Account not found", e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(history = self.history.len(), "transfers loaded");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [form_area, history_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);
        self.draw_form(frame, form_area);
        self.draw_history(frame, history_area);
    }

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        if self.focus == Focus::Browse {
            return Ok(match code {
                KeyCode::Enter | KeyCode::Char('n') => {
                    self.focus = Focus::Edit;
                    PageAction::Continue
                }
                _ => PageAction::Unhandled,
            });
        }
        match self.form.handle_key(code) {
            FormAction::Continue => {}
            FormAction::Cancel => self.focus = Focus::Browse,
            FormAction::Submit => {
                if self.submit(ctx)? {
                    self.focus = Focus::Browse;
                }
            }
        }
        Ok(PageAction::Continue)
    }

    fn hints(&self) -> &'static str {
        match self.focus {
            Focus::Browse => "Enter=new transfer",
            Focus::Edit => "Tab=next field  Left/Right=choose  Enter=submit  Esc=done",
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
    use crate::validate::FieldError;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    struct Harness {
        page: TransfersPage,
        store: MemoryStore,
        toast: Toast,
    }

    impl Harness {
        fn new(payload: Option<NavPayload>) -> Self {
            let mut h = Self {
                page: TransfersPage::new("$"),
                store: sample_store(today()),
                toast: Toast::default(),
            };
            let mut ctx = PageContext {
                store: &mut h.store,
                toast: &mut h.toast,
                today: today(),
            };
            h.page.enter(payload, &mut ctx).unwrap();
            h
        }

        fn submit(&mut self) -> bool {
            let mut ctx = PageContext {
                store: &mut self.store,
                toast: &mut self.toast,
                today: today(),
            };
            self.page.submit(&mut ctx).unwrap()
        }

        fn fill(&mut self, from: &str, to: &str, amount: &str, date: &str) {
            let form = self.page.form_mut();
            assert!(form.select("from", from));
            assert!(form.select("to", to));
            form.set_text("amount", amount);
            form.set_text("date", date);
        }
    }

    #[test]
    fn test_same_account_rejected_before_history_changes() {
        let mut h = Harness::new(None);
        let before = h.store.transfers().unwrap();
        h.fill("acc_chk_001", "acc_chk_001", "50", "");
        assert!(!h.submit());
        assert_eq!(h.store.transfers().unwrap(), before);
        assert_eq!(
            h.page.form_mut().error("to").map(|e| e.to_string()).as_deref(),
            Some("Source and destination accounts cannot be the same.")
        );
        assert!(h.page.form_mut().error("from").is_none());
    }

    #[test]
    fn test_immediate_transfer_records_processing() {
        let mut h = Harness::new(None);
        let before = h.store.transfers().unwrap().len();
        let balances: Vec<f64> = h.store.accounts().unwrap().iter().map(|a| a.balance).collect();
        h.fill("acc_chk_001", "acc_sav_001", "250", "");
        assert!(h.submit());

        let history = h.store.transfers().unwrap();
        assert_eq!(history.len(), before + 1);
        let head = &history[0];
        assert_eq!(head.status, TransferStatus::Processing);
        assert_eq!(head.date, today());
        assert_eq!(head.from, "Primary Checking");
        assert_eq!(head.to, "Rainy Day Savings");
        assert_eq!(head.memo, "User Transfer");
        assert_eq!(h.page.history()[0].id, head.id);

        let after: Vec<f64> = h.store.accounts().unwrap().iter().map(|a| a.balance).collect();
        assert_eq!(balances, after);

        let toast = h.toast.current().unwrap();
        assert_eq!(toast.title, "Transfer Initiated");
        assert_eq!(
            toast.body,
            "Transferring $250.00 from Primary Checking to Rainy Day Savings immediately."
        );
    }

    #[test]
    fn test_dated_transfer_records_scheduled_at_head() {
        let mut h = Harness::new(None);
        let before = h.store.transfers().unwrap().len();
        h.fill("acc_sav_001", "acc_chk_001", "1,000.00", "2026-04-01");
        h.page.form_mut().set_text("memo", "Rent top-up");
        assert!(h.submit());

        let history = h.store.transfers().unwrap();
        assert_eq!(history.len(), before + 1);
        assert_eq!(history[0].status, TransferStatus::Scheduled);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(history[0].amount, 1000.0);
        assert_eq!(history[0].memo, "Rent top-up");
        assert!(h.toast.current().unwrap().body.ends_with("on 2026-04-01."));
    }

    #[test]
    fn test_any_positive_amount_is_accepted() {
        let mut h = Harness::new(None);
        let before = h.store.transfers().unwrap().len();
        h.fill("acc_chk_001", "acc_sav_001", "10.005", "");
        assert!(h.submit());
        h.fill("acc_chk_001", "acc_sav_001", "0.004", "");
        assert!(h.submit());

        let history = h.store.transfers().unwrap();
        assert_eq!(history.len(), before + 2);
        assert_eq!(history[0].amount, 0.004);
        assert_eq!(history[1].amount, 10.005);
    }

    #[test]
    fn test_submit_resets_form() {
        let mut h = Harness::new(None);
        h.fill("acc_chk_001", "acc_sav_001", "10", "");
        assert!(h.submit());
        let form = h.page.form_mut();
        assert_eq!(form.choice("from"), None);
        assert_eq!(form.text("amount"), "");
        assert_eq!(form.text("memo"), "User Transfer");
        let len = h.store.transfers().unwrap().len();
        assert!(!h.submit());
        assert_eq!(h.store.transfers().unwrap().len(), len);
    }

    #[test]
    fn test_missing_fields_and_bad_date() {
        let mut h = Harness::new(None);
        h.page.form_mut().set_text("amount", "-5");
        h.page.form_mut().set_text("date", "2026-03-01");
        assert!(!h.submit());
        let form = h.page.form_mut();
        assert_eq!(
            form.error("from"),
            Some(&FieldError::Required("Please select a source account."))
        );
        assert_eq!(
            form.error("to"),
            Some(&FieldError::Required("Please select a destination account."))
        );
        assert_eq!(form.error("amount"), Some(&FieldError::NotPositive));
        assert_eq!(form.error("date"), Some(&FieldError::PastDate));
        assert_eq!(form.focused_key(), Some("from"));
    }

    #[test]
    fn test_long_memo_rejected() {
        let mut h = Harness::new(None);
        h.fill("acc_chk_001", "acc_sav_001", "10", "");
        h.page.form_mut().set_text("memo", &"m".repeat(101));
        assert!(!h.submit());
        assert_eq!(
            h.page.form_mut().error("memo"),
            Some(&FieldError::TooLong { label: "Memo", max: 100 })
        );
    }

    #[test]
    fn test_payload_preselects_source() {
        let mut h = Harness::new(Some(NavPayload::TransferFrom("acc_sav_001".into())));
        assert_eq!(h.page.form_mut().choice("from"), Some("acc_sav_001"));
        assert_eq!(h.page.form_mut().focused_key(), Some("to"));
        assert_eq!(h.page.hints(), "Tab=next field  Left/Right=choose  Enter=submit  Esc=done");

        // a later visit without payload starts clean
        let mut ctx = PageContext {
            store: &mut h.store,
            toast: &mut h.toast,
            today: today(),
        };
        h.page.enter(None, &mut ctx).unwrap();
        assert_eq!(h.page.form_mut().choice("from"), None);
    }

    #[test]
    fn test_unknown_payload_account() {
        let h = Harness::new(Some(NavPayload::TransferFrom("acc_missing".into())));
        let msg = h.toast.current().unwrap();
        assert_eq!(msg.title, "Account not found");
        assert_eq!(msg.body, "Unknown account: acc_missing");
        assert_eq!(h.page.hints(), "Enter=new transfer");
    }

    #[test]
    fn test_render_shows_balances_and_history() {
        let mut h = Harness::new(None);
        let mut term = TestTerminal::with_size(200, 30);
        term.draw_with(|frame| h.page.draw(frame, frame.area()));
        assert!(term.buffer_contains("Make a Transfer"));
        assert!(term.buffer_contains("Monthly savings"));

        h.page.form_mut().select("from", "acc_chk_001");
        term.draw_with(|frame| h.page.draw(frame, frame.area()));
        assert!(term.buffer_contains("Primary Checking ($10,530.75)"));

        h.store.transfers.clear();
        let mut ctx = PageContext {
            store: &mut h.store,
            toast: &mut h.toast,
            today: today(),
        };
        h.page.enter(None, &mut ctx).unwrap();
        term.draw_with(|frame| h.page.draw(frame, frame.area()));
        assert!(term.buffer_contains("No transfer history found."));
    }
}
