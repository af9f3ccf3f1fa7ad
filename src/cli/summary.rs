use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::{capitalize, mask_account_number, money_with};
use crate::models::Account;
use crate::sample::sample_store;
use crate::settings::load_settings;
use crate::store::BankStore;

fn balance_cell(account: &Account, symbol: &str) -> Cell {
    let text = money_with(account.balance, symbol);
    let text = if account.balance < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn summary_table(store: &dyn BankStore, symbol: &str) -> Result<Table> {
    let accounts = store.accounts()?;
    let mut table = Table::new();
    table.set_header(vec!["Account", "Type", "Number", "Balance", "Credit Limit"]);
    for account in &accounts {
        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(capitalize(account.kind.as_str())),
            Cell::new(mask_account_number(&account.number)),
            balance_cell(account, symbol),
            Cell::new(
                account
                    .credit_limit
                    .map(|l| money_with(l, symbol))
                    .unwrap_or_default(),
            )
            .set_alignment(CellAlignment::Right),
        ]);
    }
    Ok(table)
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let store = sample_store(Local::now().date_naive());
    let table = summary_table(&store, &settings.currency_symbol)?;
    let bills = store.upcoming_bills()?;
    println!("Accounts\n{table}");
    println!("{} upcoming bill(s)", bills.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_summary_lists_every_account() {
        colored::control::set_override(false);
        let store = sample_store(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        let rendered = summary_table(&store, "$").unwrap().to_string();
        assert!(rendered.contains("Primary Checking"));
        assert!(rendered.contains("Rainy Day Savings"));
        assert!(rendered.contains("Travel Rewards Card"));
        assert!(rendered.contains("$10,530.75"));
        assert!(rendered.contains("$15,000.00"));
        assert!(rendered.contains("\u{2022}\u{2022}\u{2022}\u{2022} 1234"));
    }
}
