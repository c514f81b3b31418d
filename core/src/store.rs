//! Record store — the last good snapshot plus the loading flag.
//!
//! RULE: loads are all-or-nothing. A failed fetch is logged and
//! swallowed; the previous snapshot stays exactly as it was.

use crate::{
    error::DashResult,
    model::RecordSet,
    snapshot::Snapshot,
    source::RecordSource,
};
use chrono::Utc;
use std::sync::Arc;

/// What a load did. For diagnostics only; failures are never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Replaced { customers: usize, transactions: usize },
    Kept,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    snapshot: Arc<Snapshot>,
    loading:  bool,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// An empty store, loading until the first fetch settles.
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(Snapshot::empty()),
            loading:  true,
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark a new fetch as outstanding.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Fetch from `source` and apply the result.
    pub async fn load(&mut self, source: &dyn RecordSource) -> LoadOutcome {
        self.begin_load();
        let result = source.fetch().await;
        self.apply(source.name(), result)
    }

    /// Apply a settled fetch. Always clears the loading flag.
    pub fn apply(&mut self, source_name: &str, result: DashResult<RecordSet>) -> LoadOutcome {
        self.loading = false;
        match result {
            Ok(records) => {
                let customers = records.customers.len();
                let transactions = records.transactions.len();
                self.snapshot = Arc::new(Snapshot::from_records(records, Utc::now()));
                log::info!(
                    "{source_name}: loaded {customers} customers, {transactions} transactions"
                );
                LoadOutcome::Replaced { customers, transactions }
            }
            Err(e) => {
                log::warn!("{source_name}: fetch failed, keeping previous snapshot: {e}");
                LoadOutcome::Kept
            }
        }
    }
}
