pub mod account_card;
pub mod shell;
pub mod transaction_row;
