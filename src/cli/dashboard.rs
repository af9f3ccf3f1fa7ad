use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::seq::SliceRandom;
use ratatui::Frame;

use crate::chart::ChartKind;
use crate::error::Result;
use crate::pages::accounts::AccountsPage;
use crate::pages::bill_pay::BillPayPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::overview::OverviewPage;
use crate::pages::settings::SettingsPage;
use crate::pages::transfers::TransfersPage;
use crate::pages::{Page, PageAction, PageContext};
use crate::router::{NavRequest, Route, Router};
use crate::sample::sample_store;
use crate::settings::{load_settings, Settings};
use crate::store::MemoryStore;
use crate::tui::Toast;
use crate::widgets::shell::Shell;

const GREETINGS: &[&str] = &[
    "Welcome back.",
    "Good to see you again.",
    "Your accounts are all here.",
    "Let's see where things stand.",
    "Nice to have you back.",
    "Everything's where you left it.",
];

const DEFAULT_HOLDER: &str = "John Doe";

struct Pages {
    overview: OverviewPage,
    accounts: AccountsPage,
    transfers: TransfersPage,
    bill_pay: BillPayPage,
    settings: SettingsPage,
    not_found: NotFoundPage,
}

impl Pages {
    fn get(&mut self, route: &Route) -> &mut dyn Page {
        match route {
            Route::Overview => &mut self.overview,
            Route::Accounts => &mut self.accounts,
            Route::Transfers => &mut self.transfers,
            Route::BillPay => &mut self.bill_pay,
            Route::Settings => &mut self.settings,
            Route::NotFound(_) => &mut self.not_found,
        }
    }
}

pub struct Dashboard {
    router: Router,
    pages: Pages,
    store: MemoryStore,
    toast: Toast,
    greeting: String,
    collapsed: bool,
    today: NaiveDate,
}

fn greeting(user_name: &str) -> String {
    let mut rng = rand::thread_rng();
    let random_greeting = GREETINGS.choose(&mut rng).unwrap_or(&"Hello.");
    match user_name.split_whitespace().next() {
        Some(first) => format!("Hello, {first}. {random_greeting}"),
        None => random_greeting.to_string(),
    }
}

impl Dashboard {
    pub fn new(settings: &Settings, start: NavRequest, store: MemoryStore, today: NaiveDate) -> Self {
        let holder = if settings.user_name.trim().is_empty() {
            DEFAULT_HOLDER
        } else {
            settings.user_name.trim()
        };
        let symbol = settings.currency_symbol.as_str();
        let mut dashboard = Self {
            router: Router::new(NavRequest::to(Route::Overview)),
            pages: Pages {
                overview: OverviewPage::new(symbol, ChartKind::parse(&settings.spending_chart)),
                accounts: AccountsPage::new(holder, symbol),
                transfers: TransfersPage::new(symbol),
                bill_pay: BillPayPage::new(symbol),
                settings: SettingsPage::new(),
                not_found: NotFoundPage::new(),
            },
            store,
            toast: Toast::default(),
            greeting: greeting(&settings.user_name),
            collapsed: settings.sidebar_collapsed,
            today,
        };
        dashboard.navigate(start);
        dashboard
    }

    #[cfg(test)]
    fn route(&self) -> &Route {
        self.router.current()
    }

    #[cfg(test)]
    fn toast(&self) -> &Toast {
        &self.toast
    }

    #[cfg(test)]
    fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Switch routes and let the new page load, handing it the payload.
    pub fn navigate(&mut self, request: NavRequest) {
        if let Route::NotFound(path) = &request.route {
            self.pages.not_found.set_path(path);
        }
        self.router.navigate(request);
        let route = self.router.current().clone();
        let payload = self.router.take_payload();
        let mut ctx = PageContext {
            store: &mut self.store,
            toast: &mut self.toast,
            today: self.today,
        };
        if let Err(e) = self.pages.get(&route).enter(payload, &mut ctx) {
            tracing::warn!(route = route.path(), error = %e, "page failed to load");
            self.toast.error("Something went wrong", e.to_string());
        }
    }

    /// Process one key press. Returns `true` when the dashboard should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        self.toast.tick();

        let route = self.router.current().clone();
        let mut ctx = PageContext {
            store: &mut self.store,
            toast: &mut self.toast,
            today: self.today,
        };
        match self.pages.get(&route).handle_key(key.code, &mut ctx) {
            Ok(PageAction::Continue) => false,
            Ok(PageAction::Navigate(request)) => {
                self.navigate(request);
                false
            }
            Ok(PageAction::Unhandled) => self.handle_global_key(key.code),
            Err(e) => {
                tracing::warn!(route = route.path(), error = %e, "key handler failed");
                self.toast.error("Something went wrong", e.to_string());
                false
            }
        }
    }

    fn handle_global_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('[') => {
                self.collapsed = !self.collapsed;
                tracing::debug!(collapsed = self.collapsed, "sidebar toggled");
            }
            KeyCode::Char(c) => {
                if let Some(route) = Route::from_hotkey(c) {
                    if &route != self.router.current() {
                        self.navigate(NavRequest::to(route));
                    }
                }
            }
            _ => {}
        }
        false
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let route = self.router.current().clone();
        let hints = self.pages.get(&route).hints();
        let shell = Shell {
            greeting: &self.greeting,
            route: &route,
            collapsed: self.collapsed,
            toast: &self.toast,
            hints,
            year: self.today.year(),
        };
        let content = shell.render(frame, frame.area());
        self.pages.get(&route).draw(frame, content);
    }
}

/// Run the interactive dashboard. With no `start`, the configured start
/// page opens.
pub fn run(start: Option<NavRequest>) -> Result<()> {
    let settings = load_settings();
    let start = start.unwrap_or_else(|| NavRequest::from_path(&settings.start_page, None));
    let today = Local::now().date_naive();
    let mut dashboard = Dashboard::new(&settings, start, sample_store(today), today);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if dashboard.handle_key(key) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    tracing::info!("dashboard closed");
    result
}
