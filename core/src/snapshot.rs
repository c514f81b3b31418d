//! Snapshot — the complete record set the view works over.
//!
//! A snapshot is built once per successful fetch and never mutated.
//! It is replaced wholesale; there is no incremental update path.

use crate::{
    aggregate::{self, TransactionIndex},
    model::{Customer, RecordSet, Transaction},
    types::{DateKey, RecordId},
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    customers:    Vec<Customer>,
    transactions: Vec<Transaction>,
    index:        TransactionIndex,
    /// When this snapshot was accepted. `None` for the empty initial one.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The empty snapshot a view starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: RecordSet, loaded_at: DateTime<Utc>) -> Self {
        let index = TransactionIndex::build(&records.transactions);
        Self {
            customers:    records.customers,
            transactions: records.transactions,
            index,
            loaded_at:    Some(loaded_at),
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn customer(&self, id: &RecordId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// True when there is something to tabulate: at least one customer
    /// and at least one transaction.
    pub fn has_data(&self) -> bool {
        !self.customers.is_empty() && !self.transactions.is_empty()
    }

    fn matching(&self, customer_id: &RecordId) -> impl Iterator<Item = &Transaction> {
        self.index
            .positions(customer_id)
            .iter()
            .map(move |&i| &self.transactions[i])
    }

    /// Indexed `aggregate::total_for`.
    pub fn total_for(&self, customer_id: &RecordId) -> f64 {
        aggregate::sum_amounts(self.matching(customer_id))
    }

    /// Indexed `aggregate::series_for`.
    pub fn series_for(&self, customer_id: &RecordId) -> Vec<(DateKey, f64)> {
        aggregate::bucket_by_date(self.matching(customer_id))
    }
}
