mod chart;
mod cli;
mod error;
mod fmt;
mod form;
mod logging;
mod models;
mod pages;
mod router;
mod sample;
mod settings;
mod store;
#[cfg(test)]
mod test_utils;
mod tui;
mod validate;
mod widgets;

use clap::Parser;

use cli::config::ConfigUpdate;
use cli::{Cli, Commands};
use router::NavRequest;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled ({e})");
    }

    let result = match cli.command {
        None => cli::dashboard::run(None),
        Some(Commands::Open { route, account }) => {
            cli::dashboard::run(Some(NavRequest::from_path(&route, account.as_deref())))
        }
        Some(Commands::Summary) => cli::summary::run(),
        Some(Commands::Config {
            user_name,
            start_page,
            collapse_sidebar,
            spending_chart,
        }) => cli::config::run(ConfigUpdate {
            user_name,
            start_page,
            collapse_sidebar,
            spending_chart,
        }),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
