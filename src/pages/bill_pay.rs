use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Focus, Page, PageAction, PageContext};
use crate::error::Result;
use crate::fmt::money_with;
use crate::form::{Form, FormAction, FormField, SelectOption};
use crate::models::{Bill, BillStatus, Payee};
use crate::router::NavPayload;
use crate::tui::{
    money_span, wrap_text, BORDER_STYLE, FOCUS_STYLE, FOOTER_STYLE, SELECTED_STYLE, TITLE_STYLE,
};
use crate::validate::{self, FieldError};

const NOTES_MAX: usize = 100;

fn status_color(status: BillStatus) -> Color {
    match status {
        BillStatus::Scheduled => Color::Blue,
        BillStatus::Pending => Color::Yellow,
        BillStatus::Paid => Color::Green,
        BillStatus::Failed => Color::Red,
        BillStatus::Cancelled => Color::DarkGray,
    }
}

fn payment_form(payees: &[Payee]) -> Form {
    Form::new(vec![
        FormField::selector(
            "payee",
            "Payee",
            payee_options(payees),
            None,
            "Select a payee",
        ),
        FormField::text("amount", "Amount", "").hint("0.00"),
        FormField::text("date", "Payment Date", "").hint("YYYY-MM-DD"),
        FormField::text("notes", "Notes", "").hint("optional"),
    ])
}

fn payee_options(payees: &[Payee]) -> Vec<SelectOption> {
    payees
        .iter()
        .map(|p| SelectOption::new(&p.id, &p.name))
        .collect()
}

pub struct BillPayPage {
    symbol: String,
    payees: Vec<Payee>,
    upcoming: Vec<Bill>,
    history: Vec<Bill>,
    form: Form,
    focus: Focus,
    selection: usize,
}

impl BillPayPage {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            payees: Vec::new(),
            upcoming: Vec::new(),
            history: Vec::new(),
            form: payment_form(&[]),
            focus: Focus::Browse,
            selection: 0,
        }
    }

    #[cfg(test)]
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    #[cfg(test)]
    pub fn upcoming(&self) -> &[Bill] {
        &self.upcoming
    }

    #[cfg(test)]
    pub fn history(&self) -> &[Bill] {
        &self.history
    }

    fn reload(&mut self, ctx: &PageContext) -> Result<()> {
        self.payees = ctx.store.payees()?;
        self.upcoming = ctx.store.upcoming_bills()?;
        self.history = ctx.store.bill_history()?;
        self.form.set_options("payee", payee_options(&self.payees));
        self.selection = self.selection.min(self.upcoming.len().saturating_sub(1));
        Ok(())
    }

    /// Validate the form and, if it passes, add a scheduled bill at the head
    /// of the upcoming list. Returns whether a bill was created.
    pub fn schedule(&mut self, ctx: &mut PageContext) -> Result<bool> {
        self.form.clear_errors();

        let payee_id = validate::selected(self.form.choice("payee"), "Please select a payee.")
            .map(str::to_string);
        let payee_id = self.form.check("payee", payee_id);
        let payee = match payee_id {
            Some(id) => match self.payees.iter().find(|p| p.id == id).cloned() {
                Some(p) => Some(p),
                None => {
                    self.form.set_error("payee", FieldError::UnknownPayee);
                    ctx.toast.error("Error", "Invalid payee selected.");
                    None
                }
            },
            None => None,
        };
        let amount = self
            .form
            .check("amount", validate::amount(self.form.text("amount")));
        let date = self.form.check(
            "date",
            validate::required_date(self.form.text("date"), ctx.today, "A payment date is required."),
        );
        let notes = self.form.text("notes").trim().to_string();
        self.form
            .check("notes", validate::max_len(&notes, "Notes", NOTES_MAX));

        let (Some(payee), Some(amount), Some(date), false) =
            (payee, amount, date, self.form.has_errors())
        else {
            self.form.focus_first_error();
            tracing::warn!("bill payment rejected by validation");
            return Ok(false);
        };

        let bill = Bill {
            id: ctx.store.next_id("bill"),
            payee_id: payee.id.clone(),
            payee_name: payee.name.clone(),
            due_date: date,
            amount,
            status: BillStatus::Scheduled,
            notes: (!notes.is_empty()).then_some(notes),
        };
        tracing::info!(
            bill = bill.id.as_str(),
            payee = bill.payee_name.as_str(),
            amount,
            due = %bill.due_date,
            "bill scheduled"
        );
        ctx.store.schedule_bill(bill)?;
        ctx.toast.success(
            "Payment Scheduled",
            format!(
                "Payment of {} to {} on {} has been scheduled.",
                money_with(amount, &self.symbol),
                payee.name,
                date.format("%Y-%m-%d")
            ),
        );
        self.form.reset();
        self.reload(ctx)?;
        Ok(true)
    }

    /// Cancel an upcoming bill. Only scheduled bills qualify.
    pub fn cancel(&mut self, id: &str, ctx: &mut PageContext) -> Result<bool> {
        let Some(bill) = self.upcoming.iter().find(|b| b.id == id) else {
            return Ok(false);
        };
        if bill.status != BillStatus::Scheduled {
            tracing::warn!(bill = id, status = bill.status.label(), "cancel refused");
            ctx.toast.error(
                "Cannot Cancel",
                format!("Only scheduled payments can be cancelled ({}).", bill.status.label()),
            );
            return Ok(false);
        }
        let cancelled = ctx.store.cancel_bill(id, ctx.today)?;
        tracing::info!(bill = id, "bill cancelled");
        ctx.toast.success(
            "Payment Cancelled",
            format!("Payment to {} has been cancelled.", cancelled.payee_name),
        );
        self.reload(ctx)?;
        Ok(true)
    }

    fn handle_browse_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        match code {
            KeyCode::Up => self.selection = self.selection.saturating_sub(1),
            KeyCode::Down => {
                if !self.upcoming.is_empty() {
                    self.selection = (self.selection + 1).min(self.upcoming.len() - 1);
                }
            }
            KeyCode::Enter | KeyCode::Char('n') => self.focus = Focus::Edit,
            KeyCode::Char('c') => {
                if let Some(id) = self.upcoming.get(self.selection).map(|b| b.id.clone()) {
                    self.cancel(&id, ctx)?;
                }
            }
            _ => return Ok(PageAction::Unhandled),
        }
        Ok(PageAction::Continue)
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
                " Choose a payee, amount and date.",
                FOOTER_STYLE,
            )),
            Line::from(""),
        ];
        lines.extend(self.form.lines(active));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if active {
                "   Enter=Schedule Payment  Esc=done"
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
                    .title(Span::styled(" Schedule a Payment ", TITLE_STYLE)),
            ),
            area,
        );
    }

    fn bill_line(&self, bill: &Bill, selected: bool) -> Line<'static> {
        let marker = if selected { " > " } else { "   " };
        let mut spans = vec![
            Span::raw(format!("{marker}{:<12}", bill.due_date.format("%Y-%m-%d"))),
            Span::raw(format!("{:<28}", bill.payee_name)),
            {
                // outgoing, so drawn as a debit
                let amount = money_span(-bill.amount, &self.symbol);
                Span::styled(format!("{:>12}  ", amount.content), amount.style)
            },
            Span::styled(
                bill.status.label().to_string(),
                Style::default().fg(status_color(bill.status)),
            ),
        ];
        if selected {
            for span in &mut spans {
                span.style = span.style.patch(SELECTED_STYLE);
            }
        }
        Line::from(spans)
    }

    fn draw_lists(&self, frame: &mut Frame, area: Rect) {
        let header = Line::from(Span::styled(
            format!("   {:<12}{:<28}{:>12}  {}", "Due Date", "Payee", "Amount", "Status"),
            FOOTER_STYLE,
        ));

        let mut lines = vec![
            Line::from(Span::styled(" Upcoming Payments", TITLE_STYLE)),
            header.clone(),
        ];
        if self.upcoming.is_empty() {
            lines.push(Line::from(Span::styled("   No upcoming bills.", FOOTER_STYLE)));
        } else {
            for (i, bill) in self.upcoming.iter().enumerate() {
                let selected = self.focus == Focus::Browse && i == self.selection;
                lines.push(self.bill_line(bill, selected));
            }
            let notes = self
                .upcoming
                .get(self.selection)
                .and_then(|b| b.notes.as_deref());
            if let (Focus::Browse, Some(notes)) = (self.focus, notes) {
                let width = (area.width as usize).saturating_sub(10);
                let (wrapped, _) = wrap_text(notes, width);
                for (i, text) in wrapped.lines().enumerate() {
                    let prefix = if i == 0 { "   Notes: " } else { "          " };
                    lines.push(Line::from(Span::styled(
                        format!("{prefix}{text}"),
                        FOOTER_STYLE,
                    )));
                }
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Payment History", TITLE_STYLE)));
        lines.push(header);
        if self.history.is_empty() {
            lines.push(Line::from(Span::styled(
                "   No payment history found.",
                FOOTER_STYLE,
            )));
        } else {
            for bill in &self.history {
                lines.push(self.bill_line(bill, false));
            }
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Page for BillPayPage {
    fn enter(&mut self, _payload: Option<NavPayload>, ctx: &mut PageContext) -> Result<()> {
        self.reload(ctx)?;
        self.focus = Focus::Browse;
        tracing::info!(upcoming = self.upcoming.len(), "bill pay loaded");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [form_area, lists_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(area);
        self.draw_form(frame, form_area);
        self.draw_lists(frame, lists_area);
    }

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction> {
        if self.focus == Focus::Browse {
            return self.handle_browse_key(code, ctx);
        }
        match self.form.handle_key(code) {
            FormAction::Continue => {}
            FormAction::Cancel => self.focus = Focus::Browse,
            FormAction::Submit => {
                if self.schedule(ctx)? {
                    self.focus = Focus::Browse;
                    self.selection = 0;
                }
            }
        }
        Ok(PageAction::Continue)
    }

    fn hints(&self) -> &'static str {
        match self.focus {
            Focus::Browse => "Up/Down=bill  c=cancel bill  Enter=new payment",
            Focus::Edit => "Tab=next field  Left/Right=choose  Enter=schedule  Esc=done",
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

    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn iso_in_days(today: NaiveDate, days: u64) -> String {
        (today + Days::new(days)).format("%Y-%m-%d").to_string()
    }

    struct Harness {
        page: BillPayPage,
        store: MemoryStore,
        toast: Toast,
    }

    impl Harness {
        fn new() -> Self {
            let mut h = Self {
                page: BillPayPage::new("$"),
                store: sample_store(today()),
                toast: Toast::default(),
            };
            let mut ctx = PageContext {
                store: &mut h.store,
                toast: &mut h.toast,
                today: today(),
            };
            h.page.enter(None, &mut ctx).unwrap();
            h
        }

        fn schedule(&mut self) -> bool {
            let mut ctx = PageContext {
                store: &mut self.store,
                toast: &mut self.toast,
                today: today(),
            };
            self.page.schedule(&mut ctx).unwrap()
        }

        fn cancel(&mut self, id: &str) -> bool {
            let mut ctx = PageContext {
                store: &mut self.store,
                toast: &mut self.toast,
                today: today(),
            };
            self.page.cancel(id, &mut ctx).unwrap()
        }

        fn fill(&mut self, payee: &str, amount: &str, date: &str) {
            let form = self.page.form_mut();
            assert!(form.select("payee", payee));
            form.set_text("amount", amount);
            form.set_text("date", date);
        }
    }

    #[test]
    fn test_schedule_prepends_one_scheduled_bill() {
        let mut h = Harness::new();
        let before = h.store.upcoming_bills().unwrap().len();
        h.fill("payee1", "42.50", &iso_in_days(today(), 3));
        assert!(h.schedule());

        let upcoming = h.store.upcoming_bills().unwrap();
        assert_eq!(upcoming.len(), before + 1);
        let head = &upcoming[0];
        assert_eq!(head.payee_name, "Stark Electric Co.");
        assert_eq!(head.status, BillStatus::Scheduled);
        assert_eq!(head.amount, 42.50);
        assert_eq!(head.due_date, NaiveDate::from_ymd_opt(2026, 3, 18).unwrap());
        assert_eq!(h.page.upcoming()[0].id, head.id);
        assert_eq!(h.toast.current().unwrap().title, "Payment Scheduled");
        assert!(h
            .toast
            .current()
            .unwrap()
            .body
            .contains("Payment of $42.50 to Stark Electric Co."));
    }

    #[test]
    fn test_resubmit_after_success_is_rejected() {
        let mut h = Harness::new();
        h.fill("payee1", "42.50", &iso_in_days(today(), 3));
        assert!(h.schedule());
        let after_first = h.store.upcoming_bills().unwrap().len();
        assert!(!h.schedule());
        assert_eq!(h.store.upcoming_bills().unwrap().len(), after_first);
        assert_eq!(
            h.page.form_mut().error("payee").map(|e| e.to_string()).as_deref(),
            Some("Please select a payee.")
        );
    }

    #[test]
    fn test_validation_errors_are_per_field() {
        let mut h = Harness::new();
        h.fill("payee2", "12.345", "2026-03-14");
        h.page.form_mut().set_text("notes", &"x".repeat(101));
        assert!(!h.schedule());
        let form = h.page.form_mut();
        assert_eq!(form.error("amount"), Some(&FieldError::TooPrecise));
        assert_eq!(form.error("date"), Some(&FieldError::PastDate));
        assert!(form.error("notes").is_some());
        assert!(form.error("payee").is_none());
        assert_eq!(form.focused_key(), Some("amount"));
        assert_eq!(h.store.upcoming_bills().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_date_and_amount() {
        let mut h = Harness::new();
        h.page.form_mut().select("payee", "payee1");
        assert!(!h.schedule());
        let form = h.page.form_mut();
        assert_eq!(
            form.error("date"),
            Some(&FieldError::Required("A payment date is required."))
        );
        assert!(form.error("amount").is_some());
    }

    #[test]
    fn test_unknown_payee_rejected() {
        let mut h = Harness::new();
        h.fill("payee1", "10", &iso_in_days(today(), 1));
        // payee disappears between loading the form and submitting it
        h.page.payees.retain(|p| p.id != "payee1");
        assert!(!h.schedule());
        assert_eq!(h.page.form_mut().error("payee"), Some(&FieldError::UnknownPayee));
        assert_eq!(h.toast.current().unwrap().body, "Invalid payee selected.");
    }

    #[test]
    fn test_cancel_moves_bill_to_history() {
        let mut h = Harness::new();
        let history_before = h.store.bill_history().unwrap().len();
        assert!(h.cancel("bill1"));
        let upcoming = h.store.upcoming_bills().unwrap();
        assert!(upcoming.iter().all(|b| b.id != "bill1"));
        let history = h.store.bill_history().unwrap();
        assert_eq!(history.len(), history_before + 1);
        assert_eq!(history[0].id, "bill1");
        assert_eq!(history[0].status, BillStatus::Cancelled);
        assert_eq!(history[0].due_date, today());
        assert_eq!(h.toast.current().unwrap().title, "Payment Cancelled");
    }

    #[test]
    fn test_cancel_only_scheduled() {
        let mut h = Harness::new();
        h.store.upcoming[0].status = BillStatus::Pending;
        let mut ctx = PageContext {
            store: &mut h.store,
            toast: &mut h.toast,
            today: today(),
        };
        h.page.enter(None, &mut ctx).unwrap();
        assert!(!h.cancel("bill1"));
        assert_eq!(h.store.upcoming_bills().unwrap().len(), 2);
        assert_eq!(h.toast.current().unwrap().title, "Cannot Cancel");
    }

    #[test]
    fn test_keys_schedule_and_cancel() {
        let mut h = Harness::new();
        let press = |h: &mut Harness, code: KeyCode| {
            let mut ctx = PageContext {
                store: &mut h.store,
                toast: &mut h.toast,
                today: today(),
            };
            h.page.handle_key(code, &mut ctx).unwrap()
        };
        assert!(matches!(press(&mut h, KeyCode::Char('1')), PageAction::Unhandled));
        press(&mut h, KeyCode::Char('c'));
        assert_eq!(h.store.upcoming_bills().unwrap().len(), 1);

        press(&mut h, KeyCode::Enter);
        press(&mut h, KeyCode::Right);
        press(&mut h, KeyCode::Tab);
        for c in "9.99".chars() {
            press(&mut h, KeyCode::Char(c));
        }
        press(&mut h, KeyCode::Tab);
        for c in iso_in_days(today(), 2).chars() {
            press(&mut h, KeyCode::Char(c));
        }
        press(&mut h, KeyCode::Enter);
        let upcoming = h.store.upcoming_bills().unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].amount, 9.99);
        assert_eq!(upcoming[0].payee_name, "Stark Electric Co.");
    }

    #[test]
    fn test_notes_shown_for_selected_bill() {
        let mut h = Harness::new();
        h.fill("payee3", "15.99", &iso_in_days(today(), 7));
        h.page.form_mut().set_text("notes", "Annual renewal");
        assert!(h.schedule());
        assert_eq!(h.store.upcoming_bills().unwrap()[0].notes.as_deref(), Some("Annual renewal"));

        let mut term = TestTerminal::with_size(140, 30);
        term.draw_with(|frame| h.page.draw(frame, frame.area()));
        assert!(term.buffer_contains("Notes: Annual renewal"));
        assert!(term.buffer_contains("$15.99"));
    }

    #[test]
    fn test_render_empty_states() {
        let mut h = Harness::new();
        h.store.upcoming.clear();
        h.store.history.clear();
        let mut ctx = PageContext {
            store: &mut h.store,
            toast: &mut h.toast,
            today: today(),
        };
        h.page.enter(None, &mut ctx).unwrap();
        let mut term = TestTerminal::with_size(140, 30);
        term.draw_with(|frame| h.page.draw(frame, frame.area()));
        assert!(term.buffer_contains("No upcoming bills."));
        assert!(term.buffer_contains("No payment history found."));
        assert!(term.buffer_contains("Schedule a Payment"));
    }
}
