pub mod config;
pub mod dashboard;
pub mod summary;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bankdash",
    version,
    about = "Terminal banking dashboard: accounts, transfers, bill pay and settings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the dashboard at a route (/, /accounts, /transfers, /bill-pay, /settings).
    Open {
        /// Route path; unknown paths open the not-found screen
        route: String,
        /// Account id: opens its detail on /accounts, pre-selects the source on /transfers
        #[arg(long)]
        account: Option<String>,
    },
    /// Print a summary of every account and exit.
    Summary,
    /// Update the launch configuration file.
    Config {
        /// Name used in the greeting and account details
        #[arg(long = "user-name")]
        user_name: Option<String>,
        /// Route opened when the dashboard starts
        #[arg(long = "start-page")]
        start_page: Option<String>,
        /// Start with the sidebar collapsed (true/false)
        #[arg(long = "collapse-sidebar")]
        collapse_sidebar: Option<bool>,
        /// Overview spending chart style: pie, bar or line
        #[arg(long = "spending-chart")]
        spending_chart: Option<String>,
    },
}
