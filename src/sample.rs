use chrono::{Days, NaiveDate};

use crate::chart::PALETTE;
use crate::models::{
    Account, AccountKind, ActivityItem, Bill, BillStatus, Flow, Payee, SpendingCategory,
    Transaction, TransferRecord, TransferStatus, TxnStatus,
};
use crate::store::MemoryStore;

struct SampleTxn {
    id: &'static str,
    date: &'static str,
    description: &'static str,
    amount: f64,
    status: TxnStatus,
    category: &'static str,
}

const CHECKING_TXNS: &[SampleTxn] = &[
    SampleTxn { id: "txn_c001", date: "2024-07-28", description: "Online Groceries - InstaMart", amount: -75.99, status: TxnStatus::Cleared, category: "Groceries" },
    SampleTxn { id: "txn_c002", date: "2024-07-27", description: "Salary Deposit - Tech Solutions LLC", amount: 3200.00, status: TxnStatus::Cleared, category: "Income" },
    SampleTxn { id: "txn_c003", date: "2024-07-26", description: "Coffee Shop - The Beanery", amount: -5.25, status: TxnStatus::Cleared, category: "Dining" },
    SampleTxn { id: "txn_c004", date: "2024-07-25", description: "ATM Withdrawal", amount: -100.00, status: TxnStatus::Cleared, category: "Cash" },
    SampleTxn { id: "txn_c005", date: "2024-07-24", description: "Utility Bill - Power Co.", amount: -120.50, status: TxnStatus::Pending, category: "Utilities" },
];

const SAVINGS_TXNS: &[SampleTxn] = &[
    SampleTxn { id: "txn_s001", date: "2024-07-15", description: "Interest Earned", amount: 50.20, status: TxnStatus::Cleared, category: "Interest" },
    SampleTxn { id: "txn_s002", date: "2024-07-01", description: "Transfer from Checking", amount: 500.00, status: TxnStatus::Cleared, category: "Transfer" },
];

const CREDIT_TXNS: &[SampleTxn] = &[
    SampleTxn { id: "txn_cr001", date: "2024-07-20", description: "Airline Ticket - SkyHigh Airways", amount: -450.99, status: TxnStatus::Cleared, category: "Travel" },
    SampleTxn { id: "txn_cr002", date: "2024-07-18", description: "Hotel Booking - Comfy Stays", amount: -280.00, status: TxnStatus::Pending, category: "Travel" },
    SampleTxn { id: "txn_cr003", date: "2024-07-10", description: "Payment Received - Thank You", amount: 1000.00, status: TxnStatus::Cleared, category: "Payment" },
];

const CHECKING_SPENDING: &[(&str, f64)] = &[
    ("Groceries", 350.50),
    ("Dining", 220.75),
    ("Utilities", 180.00),
    ("Shopping", 450.00),
    ("Other", 90.25),
];

const SAVINGS_SPENDING: &[(&str, f64)] = &[("Interest", 150.60), ("Transfers In", 1500.00)];

const CREDIT_SPENDING: &[(&str, f64)] = &[("Travel", 1200.50), ("Dining", 300.75), ("Shopping", 250.00)];

/// Overview pie. Colours come from the chart config keyed by category, not the rows.
pub const OVERVIEW_SPENDING: &[(&str, f64)] = &[
    ("Groceries", 350.0),
    ("Utilities", 180.0),
    ("Dining Out", 280.0),
    ("Transport", 120.0),
    ("Shopping", 450.0),
    ("Entertainment", 150.0),
];

const PAYEES: &[(&str, &str, &str)] = &[
    ("payee1", "Stark Electric Co.", "ELEC-12345"),
    ("payee2", "Wayne Water & Power", "WWP-67890"),
    ("payee3", "Daily Bugle Subscriptions", "DBS-11223"),
    ("payee4", "City Gas Company", "GAS-33445"),
];

struct SampleActivity {
    id: &'static str,
    date: &'static str,
    description: &'static str,
    amount: f64,
    flow: Flow,
    status: TxnStatus,
}

const ACTIVITY: &[SampleActivity] = &[
    SampleActivity { id: "act_1", date: "Oct 28, 2023", description: "Netflix Subscription Renewal", amount: 15.99, flow: Flow::Expense, status: TxnStatus::Cleared },
    SampleActivity { id: "act_2", date: "Oct 27, 2023", description: "Salary Deposit - Innovatech Ltd.", amount: 2850.00, flow: Flow::Income, status: TxnStatus::Cleared },
    SampleActivity { id: "act_3", date: "Oct 26, 2023", description: "Groceries at Local Market", amount: 85.40, flow: Flow::Expense, status: TxnStatus::Pending },
    SampleActivity { id: "act_4", date: "Oct 25, 2023", description: "Transfer to Savings Account", amount: 500.00, flow: Flow::Expense, status: TxnStatus::Processing },
    SampleActivity { id: "act_5", date: "Oct 24, 2023", description: "Coffee Shop Meeting", amount: 12.75, flow: Flow::Expense, status: TxnStatus::Cleared },
];

struct SampleTransfer {
    id: &'static str,
    date: (i32, u32, u32),
    from: &'static str,
    to: &'static str,
    amount: f64,
    status: TransferStatus,
    memo: &'static str,
}

const TRANSFERS: &[SampleTransfer] = &[
    SampleTransfer { id: "xfer_a", date: (2024, 7, 20), from: "Primary Checking", to: "Rainy Day Savings", amount: 500.00, status: TransferStatus::Completed, memo: "Monthly savings" },
    SampleTransfer { id: "xfer_b", date: (2024, 7, 15), from: "Rainy Day Savings", to: "External ACME Corp (\u{2022}\u{2022}\u{2022}\u{2022} 1122)", amount: 120.50, status: TransferStatus::Completed, memo: "Utility Bill" },
    SampleTransfer { id: "xfer_c", date: (2024, 7, 28), from: "Primary Checking", to: "John Doe (Zelle)", amount: 75.00, status: TransferStatus::Pending, memo: "Lunch" },
    SampleTransfer { id: "xfer_d", date: (2024, 7, 1), from: "Travel Rewards Card", to: "Primary Checking", amount: 1000.00, status: TransferStatus::Failed, memo: "Dividend Payout" },
];

fn transactions(rows: &[SampleTxn]) -> Vec<Transaction> {
    rows.iter()
        .map(|t| Transaction {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: t.description.to_string(),
            amount: t.amount,
            status: t.status,
            category: Some(t.category.to_string()),
        })
        .collect()
}

/// Per-account breakdowns carry their own fill, cycling through the palette.
fn spending(rows: &[(&str, f64)]) -> Vec<SpendingCategory> {
    rows.iter()
        .enumerate()
        .map(|(i, (category, amount))| SpendingCategory {
            category: category.to_string(),
            amount: *amount,
            fill: Some(PALETTE[i % 5]),
        })
        .collect()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn days_from(today: NaiveDate, offset: i64) -> NaiveDate {
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        today.checked_add_days(days)
    } else {
        today.checked_sub_days(days)
    };
    shifted.unwrap_or(today)
}

fn accounts() -> Vec<Account> {
    vec![
        Account {
            id: "acc_chk_001".to_string(),
            name: "Primary Checking".to_string(),
            number: "1111222233331234".to_string(),
            balance: 10530.75,
            kind: AccountKind::Checking,
            credit_limit: None,
            opened_on: ymd(2020, 1, 15),
            transactions: transactions(CHECKING_TXNS),
            spending: spending(CHECKING_SPENDING),
        },
        Account {
            id: "acc_sav_001".to_string(),
            name: "Rainy Day Savings".to_string(),
            number: "5555666677775678".to_string(),
            balance: 25100.20,
            kind: AccountKind::Savings,
            credit_limit: None,
            opened_on: ymd(2020, 1, 15),
            transactions: transactions(SAVINGS_TXNS),
            spending: spending(SAVINGS_SPENDING),
        },
        Account {
            id: "acc_cc_001".to_string(),
            name: "Travel Rewards Card".to_string(),
            number: "9999000011119012".to_string(),
            balance: -1250.45,
            kind: AccountKind::Credit,
            credit_limit: Some(15000.0),
            opened_on: ymd(2021, 6, 1),
            transactions: transactions(CREDIT_TXNS),
            spending: spending(CREDIT_SPENDING),
        },
    ]
}

/// Build the demo dataset. Bill dates are relative to `today`.
pub fn sample_store(today: NaiveDate) -> MemoryStore {
    let payees: Vec<Payee> = PAYEES
        .iter()
        .map(|(id, name, number)| Payee {
            id: id.to_string(),
            name: name.to_string(),
            account_number: number.to_string(),
        })
        .collect();

    let bill = |id: &str, payee: usize, offset: i64, amount: f64, status: BillStatus| Bill {
        id: id.to_string(),
        payee_id: payees[payee].id.clone(),
        payee_name: payees[payee].name.clone(),
        due_date: days_from(today, offset),
        amount,
        status,
        notes: None,
    };

    let upcoming = vec![
        bill("bill1", 0, 5, 120.50, BillStatus::Scheduled),
        bill("bill2", 1, 10, 75.00, BillStatus::Scheduled),
    ];
    let history = vec![
        bill("hist1", 2, -15, 15.99, BillStatus::Paid),
        bill("hist2", 3, -30, 88.20, BillStatus::Paid),
        bill("hist3", 0, -45, 115.00, BillStatus::Paid),
    ];

    let activity = ACTIVITY
        .iter()
        .map(|a| ActivityItem {
            id: a.id.to_string(),
            date: a.date.to_string(),
            description: a.description.to_string(),
            amount: a.amount,
            flow: a.flow,
            status: a.status,
        })
        .collect();

    let spending_overview = OVERVIEW_SPENDING
        .iter()
        .map(|(category, amount)| SpendingCategory {
            category: category.to_string(),
            amount: *amount,
            fill: None,
        })
        .collect();

    let transfers = TRANSFERS
        .iter()
        .map(|t| TransferRecord {
            id: t.id.to_string(),
            date: ymd(t.date.0, t.date.1, t.date.2),
            from: t.from.to_string(),
            to: t.to.to_string(),
            amount: t.amount,
            status: t.status,
            memo: t.memo.to_string(),
        })
        .collect();

    MemoryStore {
        accounts: accounts(),
        payees,
        activity,
        spending: spending_overview,
        upcoming,
        history,
        transfers,
        id_counter: 0,
    }
}
