use chrono::NaiveDate;

use crate::error::{BankDashError, Result};
use crate::models::{Account, ActivityItem, Bill, BillStatus, Payee, SpendingCategory, TransferRecord};

/// Data access for the page controllers. Pages read through this trait and
/// re-read after every mutation, so a persistent backend can replace
/// [`MemoryStore`] without touching any screen code.
pub trait BankStore {
    fn accounts(&self) -> Result<Vec<Account>>;

    fn account(&self, id: &str) -> Result<Account> {
        self.accounts()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| BankDashError::UnknownAccount(id.to_string()))
    }

    fn payees(&self) -> Result<Vec<Payee>>;
    fn recent_activity(&self) -> Result<Vec<ActivityItem>>;
    fn spending_overview(&self) -> Result<Vec<SpendingCategory>>;

    /// Upcoming bills, newest first.
    fn upcoming_bills(&self) -> Result<Vec<Bill>>;
    /// Paid/cancelled/failed bills, newest first.
    fn bill_history(&self) -> Result<Vec<Bill>>;
    /// Insert at the head of the upcoming list.
    fn schedule_bill(&mut self, bill: Bill) -> Result<()>;
    /// Remove from upcoming and insert a cancelled copy, dated `on`, at the
    /// head of history. Returns the cancelled copy.
    fn cancel_bill(&mut self, id: &str, on: NaiveDate) -> Result<Bill>;

    /// Transfer history, newest first.
    fn transfers(&self) -> Result<Vec<TransferRecord>>;
    fn record_transfer(&mut self, record: TransferRecord) -> Result<()>;

    /// Fresh identifier with the given prefix. Never repeats within a store.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) accounts: Vec<Account>,
    pub(crate) payees: Vec<Payee>,
    pub(crate) activity: Vec<ActivityItem>,
    pub(crate) spending: Vec<SpendingCategory>,
    pub(crate) upcoming: Vec<Bill>,
    pub(crate) history: Vec<Bill>,
    pub(crate) transfers: Vec<TransferRecord>,
    pub(crate) id_counter: u64,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BankStore for MemoryStore {
    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    fn payees(&self) -> Result<Vec<Payee>> {
        Ok(self.payees.clone())
    }

    fn recent_activity(&self) -> Result<Vec<ActivityItem>> {
        Ok(self.activity.clone())
    }

    fn spending_overview(&self) -> Result<Vec<SpendingCategory>> {
        Ok(self.spending.clone())
    }

    fn upcoming_bills(&self) -> Result<Vec<Bill>> {
        Ok(self.upcoming.clone())
    }

    fn bill_history(&self) -> Result<Vec<Bill>> {
        Ok(self.history.clone())
    }

    fn schedule_bill(&mut self, bill: Bill) -> Result<()> {
        self.upcoming.insert(0, bill);
        Ok(())
    }

    fn cancel_bill(&mut self, id: &str, on: NaiveDate) -> Result<Bill> {
        let pos = self
            .upcoming
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BankDashError::UnknownBill(id.to_string()))?;
        let mut bill = self.upcoming.remove(pos);
        bill.status = BillStatus::Cancelled;
        bill.due_date = on;
        self.history.insert(0, bill.clone());
        Ok(bill)
    }

    fn transfers(&self) -> Result<Vec<TransferRecord>> {
        Ok(self.transfers.clone())
    }

    fn record_transfer(&mut self, record: TransferRecord) -> Result<()> {
        self.transfers.insert(0, record);
        Ok(())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{prefix}_{}", self.id_counter)
    }
}
