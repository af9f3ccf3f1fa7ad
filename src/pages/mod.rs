//! Page controllers, one per route. Each page keeps only UI state (cursor,
//! filter text, form values) and reads everything else from the store.

pub mod accounts;
pub mod bill_pay;
pub mod not_found;
pub mod overview;
pub mod settings;
pub mod transfers;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};

use crate::chart::{BarOrientation, ChartConfig, ChartKind, ChartRow, ChartSpec};
use crate::error::Result;
use crate::models::SpendingCategory;
use crate::router::{NavPayload, NavRequest};
use crate::store::BankStore;
use crate::tui::Toast;

pub enum PageAction {
    Continue,
    Navigate(NavRequest),
    /// The page has no use for this key; the dashboard may treat it as a
    /// global shortcut.
    Unhandled,
}

/// What a page may touch while handling input.
pub struct PageContext<'a> {
    pub store: &'a mut dyn BankStore,
    pub toast: &'a mut Toast,
    pub today: NaiveDate,
}

pub trait Page {
    /// Called each time the route becomes current, with the navigation
    /// payload if one was attached.
    fn enter(&mut self, payload: Option<NavPayload>, ctx: &mut PageContext) -> Result<()>;

    fn draw(&mut self, frame: &mut Frame, area: Rect);

    fn handle_key(&mut self, code: KeyCode, ctx: &mut PageContext) -> Result<PageAction>;

    /// Key hints for the footer.
    fn hints(&self) -> &'static str;
}

/// Which of a form page's two panes has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Arrow keys move through the list; global shortcuts work.
    Browse,
    /// Every key goes to the form.
    Edit,
}

/// Pie of a spending breakdown, one slice per category.
pub(crate) fn spending_pie(
    title: &str,
    spending: &[SpendingCategory],
    config: ChartConfig,
) -> ChartSpec {
    spending_chart(ChartKind::Pie, title, spending, config)
}

/// A spending breakdown drawn as any chart kind. Bars lie horizontally so
/// category names stay readable.
pub(crate) fn spending_chart(
    kind: ChartKind,
    title: &str,
    spending: &[SpendingCategory],
    config: ChartConfig,
) -> ChartSpec {
    let rows = spending
        .iter()
        .map(|s| {
            ChartRow::new()
                .text("category", s.category.as_str())
                .number("value", s.amount)
                .fill(s.fill)
        })
        .collect();
    // a single series needs no legend; slices do
    let legend = kind == ChartKind::Pie;
    ChartSpec::new(kind, "category", &["value"])
        .title(title)
        .rows(rows)
        .config(config)
        .orientation(BarOrientation::Horizontal)
        .show_labels(true)
        .show_legend(legend)
}

/// Pie, then bar, then line, then back to pie.
pub(crate) fn next_chart_kind(kind: &ChartKind) -> ChartKind {
    match kind {
        ChartKind::Pie => ChartKind::Bar,
        ChartKind::Bar => ChartKind::Line,
        ChartKind::Line | ChartKind::Unsupported(_) => ChartKind::Pie,
    }
}
