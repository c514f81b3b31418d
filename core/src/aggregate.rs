//! Aggregation functions over a transaction collection.
//!
//! RULE: every function here is pure. Inputs are borrowed, never mutated,
//! and nothing is cached between calls. The indexed variants on
//! `Snapshot` must agree with these scans for every input.

use crate::{
    model::Transaction,
    types::{DateKey, RecordId},
};
use std::collections::{BTreeMap, HashMap};

/// Sum of `amount` over transactions belonging to `customer_id`.
/// Zero when the customer has no transactions.
pub fn total_for(transactions: &[Transaction], customer_id: &RecordId) -> f64 {
    sum_amounts(
        transactions
            .iter()
            .filter(|t| &t.customer_id == customer_id),
    )
}

/// Per-day totals for `customer_id`, ascending by date string.
pub fn series_for(transactions: &[Transaction], customer_id: &RecordId) -> Vec<(DateKey, f64)> {
    bucket_by_date(
        transactions
            .iter()
            .filter(|t| &t.customer_id == customer_id),
    )
}

pub(crate) fn sum_amounts<'a>(txns: impl Iterator<Item = &'a Transaction>) -> f64 {
    txns.fold(0.0, |total, t| total + t.amount)
}

/// Group by date and sum. BTreeMap keys iterate in lexical order,
/// which is chronological for `YYYY-MM-DD`.
pub(crate) fn bucket_by_date<'a>(
    txns: impl Iterator<Item = &'a Transaction>,
) -> Vec<(DateKey, f64)> {
    let mut buckets: BTreeMap<&str, f64> = BTreeMap::new();
    for t in txns {
        *buckets.entry(t.date.as_str()).or_insert(0.0) += t.amount;
    }
    buckets
        .into_iter()
        .map(|(date, amount)| (date.to_string(), amount))
        .collect()
}

/// `customer_id → positions` into the transaction vector it was built from.
/// Built once per snapshot load.
#[derive(Debug, Clone, Default)]
pub struct TransactionIndex {
    by_customer: HashMap<RecordId, Vec<usize>>,
}

impl TransactionIndex {
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut by_customer: HashMap<RecordId, Vec<usize>> = HashMap::new();
        for (i, t) in transactions.iter().enumerate() {
            by_customer.entry(t.customer_id.clone()).or_default().push(i);
        }
        log::debug!(
            "transaction index built: {} customers, {} transactions",
            by_customer.len(),
            transactions.len()
        );
        Self { by_customer }
    }

    /// Positions of `customer_id`'s transactions, in source order.
    pub fn positions(&self, customer_id: &RecordId) -> &[usize] {
        self.by_customer
            .get(customer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }
}
