use crate::chart::ChartKind;
use crate::error::{BankDashError, Result};
use crate::router::Route;
use crate::settings::{read_settings, save_settings, settings_path, Settings};

/// Overrides from the `config` command. `None` leaves a value as it is.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub user_name: Option<String>,
    pub start_page: Option<String>,
    pub collapse_sidebar: Option<bool>,
    pub spending_chart: Option<String>,
}

/// Apply `update` to `settings`. A start page must name one of the
/// dashboard's routes and a chart style must be one the overview can draw.
/// On error `settings` is left untouched.
pub fn apply(settings: &mut Settings, update: ConfigUpdate) -> Result<()> {
    let start_page = match update.start_page {
        Some(page) => match Route::parse(&page) {
            Route::NotFound(path) => return Err(BankDashError::UnknownRoute(path)),
            route => Some(route.path().to_string()),
        },
        None => None,
    };
    let spending_chart = match update.spending_chart {
        Some(style) => match ChartKind::parse(&style) {
            ChartKind::Unsupported(name) => {
                return Err(BankDashError::Settings(format!(
                    "unsupported chart style '{name}' (expected pie, bar or line)"
                )))
            }
            kind => Some(kind.to_string()),
        },
        None => None,
    };

    if let Some(name) = update.user_name {
        settings.user_name = name.trim().to_string();
    }
    if let Some(page) = start_page {
        settings.start_page = page;
    }
    if let Some(collapsed) = update.collapse_sidebar {
        settings.sidebar_collapsed = collapsed;
    }
    if let Some(style) = spending_chart {
        settings.spending_chart = style;
    }
    Ok(())
}

pub fn run(update: ConfigUpdate) -> Result<()> {
    let path = settings_path();
    let mut settings = read_settings(&path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "settings unreadable, rewriting from defaults");
        eprintln!("Warning: {} could not be read ({e}); starting from defaults", path.display());
        Settings::default()
    });
    apply(&mut settings, update)?;
    save_settings(&settings)?;
    tracing::info!(path = %path.display(), "settings saved");

    println!("Saved {}", path.display());
    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Start page: {}", settings.start_page);
    println!("Sidebar:    {}", if settings.sidebar_collapsed { "collapsed" } else { "expanded" });
    println!("Chart:      {}", settings.spending_chart);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut settings = Settings::default();
        apply(
            &mut settings,
            ConfigUpdate {
                user_name: Some("  Jane Roe ".into()),
                start_page: Some("/bill-pay/".into()),
                collapse_sidebar: Some(true),
                spending_chart: Some("Bar".into()),
            },
        )
        .unwrap();
        assert_eq!(settings.user_name, "Jane Roe");
        assert_eq!(settings.start_page, "/bill-pay");
        assert!(settings.sidebar_collapsed);
        assert_eq!(settings.spending_chart, "bar");
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_apply_rejects_unknown_start_page() {
        let mut settings = Settings::default();
        let update = ConfigUpdate {
            user_name: Some("Jane".into()),
            start_page: Some("/loans".into()),
            ..ConfigUpdate::default()
        };
        let err = apply(&mut settings, update).unwrap_err();
        assert!(matches!(err, BankDashError::UnknownRoute(ref p) if p == "/loans"));
        assert_eq!(settings.start_page, "/");
        assert!(settings.user_name.is_empty());
    }

    #[test]
    fn test_apply_rejects_unknown_chart_style() {
        let mut settings = Settings::default();
        let update = ConfigUpdate {
            spending_chart: Some("radar".into()),
            ..ConfigUpdate::default()
        };
        assert!(apply(&mut settings, update).is_err());
        assert_eq!(settings.spending_chart, "pie");
    }
}
