//! Screen routing. Paths mirror the web-style addresses the dashboard is
//! organised around; payloads ride along with a single navigation and are
//! consumed by the first screen that reads them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Overview,
    Accounts,
    Transfers,
    BillPay,
    Settings,
    NotFound(String),
}

/// Sidebar order.
pub const NAV_ROUTES: [Route; 5] = [
    Route::Overview,
    Route::Accounts,
    Route::Transfers,
    Route::BillPay,
    Route::Settings,
];

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        match normalized {
            "" => Route::Overview,
            "/accounts" => Route::Accounts,
            "/transfers" => Route::Transfers,
            "/bill-pay" => Route::BillPay,
            "/settings" => Route::Settings,
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Overview => "/",
            Route::Accounts => "/accounts",
            Route::Transfers => "/transfers",
            Route::BillPay => "/bill-pay",
            Route::Settings => "/settings",
            Route::NotFound(path) => path,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Overview => "Dashboard",
            Route::Accounts => "Accounts",
            Route::Transfers => "Transfers",
            Route::BillPay => "Bill Pay",
            Route::Settings => "Settings",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Single glyph shown when the sidebar is collapsed.
    pub fn glyph(&self) -> &'static str {
        match self {
            Route::Overview => "\u{25a6}",
            Route::Accounts => "\u{25a4}",
            Route::Transfers => "\u{21c4}",
            Route::BillPay => "\u{2261}",
            Route::Settings => "\u{2699}",
            Route::NotFound(_) => "?",
        }
    }

    /// Key that jumps to this route from any screen not capturing text.
    pub fn hotkey(&self) -> Option<char> {
        NAV_ROUTES
            .iter()
            .position(|r| r == self)
            .and_then(|i| char::from_digit(i as u32 + 1, 10))
    }

    pub fn from_hotkey(c: char) -> Option<Route> {
        let n = c.to_digit(10)? as usize;
        NAV_ROUTES.get(n.checked_sub(1)?).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavPayload {
    /// Open the accounts screen on this account's detail.
    ShowAccount(String),
    /// Pre-select the transfer source account.
    TransferFrom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub route: Route,
    pub payload: Option<NavPayload>,
}

impl NavRequest {
    pub fn to(route: Route) -> Self {
        Self {
            route,
            payload: None,
        }
    }

    pub fn show_account(id: &str) -> Self {
        Self {
            route: Route::Accounts,
            payload: Some(NavPayload::ShowAccount(id.to_string())),
        }
    }

    pub fn transfer_from(id: &str) -> Self {
        Self {
            route: Route::Transfers,
            payload: Some(NavPayload::TransferFrom(id.to_string())),
        }
    }

    /// Build a request from a path plus an optional account id. The account
    /// only means something to the accounts and transfers screens.
    pub fn from_path(path: &str, account: Option<&str>) -> Self {
        let route = Route::parse(path);
        match (&route, account) {
            (Route::Accounts, Some(id)) => Self::show_account(id),
            (Route::Transfers, Some(id)) => Self::transfer_from(id),
            _ => Self::to(route),
        }
    }
}

#[derive(Debug)]
pub struct Router {
    current: Route,
    pending: Option<NavPayload>,
}

impl Router {
    pub fn new(start: NavRequest) -> Self {
        Self {
            current: start.route,
            pending: start.payload,
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn navigate(&mut self, request: NavRequest) {
        tracing::info!(from = self.current.path(), to = request.route.path(), "navigate");
        self.current = request.route;
        self.pending = request.payload;
    }

    /// Hand the pending payload to the screen; a second call returns `None`.
    pub fn take_payload(&mut self) -> Option<NavPayload> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Overview);
        assert_eq!(Route::parse(""), Route::Overview);
        assert_eq!(Route::parse("/accounts"), Route::Accounts);
        assert_eq!(Route::parse("/accounts/"), Route::Accounts);
        assert_eq!(Route::parse("/bill-pay"), Route::BillPay);
        assert_eq!(Route::parse("/transfers"), Route::Transfers);
        assert_eq!(Route::parse("/settings"), Route::Settings);
    }

    #[test]
    fn test_parse_catch_all() {
        assert_eq!(
            Route::parse("/terms-of-service"),
            Route::NotFound("/terms-of-service".to_string())
        );
        assert_eq!(Route::parse("/terms-of-service").path(), "/terms-of-service");
    }

    #[test]
    fn test_hotkeys_roundtrip() {
        for route in NAV_ROUTES.iter() {
            let key = route.hotkey().unwrap();
            assert_eq!(Route::from_hotkey(key).as_ref(), Some(route));
        }
        assert_eq!(Route::from_hotkey('0'), None);
        assert_eq!(Route::from_hotkey('9'), None);
        assert_eq!(Route::NotFound("/x".into()).hotkey(), None);
    }

    #[test]
    fn test_from_path_attaches_payload() {
        assert_eq!(
            NavRequest::from_path("/accounts", Some("acc_1")).payload,
            Some(NavPayload::ShowAccount("acc_1".into()))
        );
        assert_eq!(
            NavRequest::from_path("/transfers", Some("acc_1")).payload,
            Some(NavPayload::TransferFrom("acc_1".into()))
        );
        assert_eq!(NavRequest::from_path("/settings", Some("acc_1")).payload, None);
    }

    #[test]
    fn test_payload_consumed_once() {
        let mut router = Router::new(NavRequest::to(Route::Overview));
        router.navigate(NavRequest::show_account("acc_chk_001"));
        assert_eq!(router.current(), &Route::Accounts);
        assert_eq!(
            router.take_payload(),
            Some(NavPayload::ShowAccount("acc_chk_001".into()))
        );
        assert_eq!(router.take_payload(), None);

        router.navigate(NavRequest::to(Route::Overview));
        router.navigate(NavRequest::to(Route::Accounts));
        assert_eq!(router.take_payload(), None);
    }
}
