use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankDashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Unknown bill: {0}")]
    UnknownBill(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, BankDashError>;
