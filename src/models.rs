use chrono::NaiveDate;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Full number; screens only ever show it through `fmt::mask_account_number`.
    pub number: String,
    pub balance: f64,
    pub kind: AccountKind,
    pub credit_limit: Option<f64>,
    pub opened_on: NaiveDate,
    pub transactions: Vec<Transaction>,
    pub spending: Vec<SpendingCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Pending,
    Cleared,
    Failed,
    Processing,
}

impl TxnStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxnStatus::Pending => "Pending",
            TxnStatus::Cleared => "Cleared",
            TxnStatus::Failed => "Failed",
            TxnStatus::Processing => "Processing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Free-form; never parsed as a calendar date.
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub status: TxnStatus,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingCategory {
    pub category: String,
    pub amount: f64,
    pub fill: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Income,
    Expense,
}

/// One line of the overview's recent activity feed. `amount` is absolute;
/// `flow` carries the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub flow: Flow,
    pub status: TxnStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payee {
    pub id: String,
    pub name: String,
    pub account_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Scheduled,
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Scheduled => "Scheduled",
            BillStatus::Pending => "Pending",
            BillStatus::Paid => "Paid",
            BillStatus::Failed => "Failed",
            BillStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: String,
    pub payee_id: String,
    pub payee_name: String,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: BillStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Completed,
    Pending,
    Processing,
    Scheduled,
    Failed,
}

impl TransferStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransferStatus::Completed => "Completed",
            TransferStatus::Pending => "Pending",
            TransferStatus::Processing => "Processing",
            TransferStatus::Scheduled => "Scheduled",
            TransferStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub id: String,
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub status: TransferStatus,
    pub memo: String,
}
