//! The view — state value plus the controller that owns it.
//!
//! RULES:
//!   - ViewState is an immutable value. Every transition returns a new one.
//!   - Only the controller replaces its state.
//!   - Exactly one fetch is outstanding at a time, tagged with a generation.
//!   - A result for an old generation, or arriving after unmount, is dropped.

use crate::{
    chart::{ChartData, DETAIL_TITLE},
    command::ViewCommand,
    error::{DashError, DashResult},
    model::{Customer, RecordSet},
    search,
    snapshot::Snapshot,
    source::RecordSource,
    store::RecordStore,
    table::TablePresentation,
    types::{Generation, RecordId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

// ── State ──────────────────────────────────────────────────────────

/// The overlay for one selected customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub customer: Customer,
    pub open:     bool,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    snapshot:    Arc<Snapshot>,
    loading:     bool,
    search_term: String,
    detail:      Option<DetailView>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            snapshot:    Arc::new(Snapshot::empty()),
            loading:     true,
            search_term: String::new(),
            detail:      None,
        }
    }
}

impl ViewState {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail.as_ref().is_some_and(|d| d.open)
    }

    // ── Transitions ────────────────────────────────

    pub fn with_snapshot(self, snapshot: Arc<Snapshot>) -> Self {
        Self { snapshot, ..self }
    }

    pub fn with_loading(self, loading: bool) -> Self {
        Self { loading, ..self }
    }

    pub fn with_search(self, term: impl Into<String>) -> Self {
        Self { search_term: term.into(), ..self }
    }

    /// Show the detail view for `customer`, replacing any previous selection.
    pub fn with_detail_opened(self, customer: Customer) -> Self {
        Self {
            detail: Some(DetailView { customer, open: true }),
            ..self
        }
    }

    /// Hide the detail view. The last selection is kept.
    pub fn with_detail_closed(self) -> Self {
        let detail = self.detail.map(|d| DetailView { open: false, ..d });
        Self { detail, ..self }
    }

    // ── Derived views ──────────────────────────────

    pub fn visible_customers(&self) -> Vec<&Customer> {
        search::filter(self.snapshot.customers(), &self.search_term)
    }

    pub fn table(&self) -> TablePresentation {
        TablePresentation::build(&self.snapshot, self.loading, &self.search_term)
    }

    /// Chart for the open detail view, if any.
    pub fn detail_chart(&self) -> Option<ChartData> {
        self.detail
            .as_ref()
            .filter(|d| d.open)
            .map(|d| ChartData::from_series(self.snapshot.series_for(&d.customer.id)))
    }

    pub fn presentation(&self) -> ViewPresentation {
        let detail = self
            .detail
            .as_ref()
            .filter(|d| d.open)
            .map(|d| DetailPresentation {
                title:    DETAIL_TITLE.to_string(),
                customer: d.customer.clone(),
                chart:    ChartData::from_series(self.snapshot.series_for(&d.customer.id)),
            });
        ViewPresentation {
            loading:     self.loading,
            loaded_at:   self.snapshot.loaded_at,
            search_term: self.search_term.clone(),
            table:       self.table(),
            detail,
        }
    }
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPresentation {
    pub loading:     bool,
    pub loaded_at:   Option<DateTime<Utc>>,
    pub search_term: String,
    pub table:       TablePresentation,
    pub detail:      Option<DetailPresentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPresentation {
    pub title:    String,
    pub customer: Customer,
    pub chart:    ChartData,
}

// ── Controller ─────────────────────────────────────────────────────

struct FetchCompletion {
    generation: Generation,
    result:     DashResult<RecordSet>,
}

enum Woke {
    Completed(FetchCompletion),
    Joined(Result<(), tokio::task::JoinError>),
}

pub struct ViewController {
    state:      ViewState,
    store:      RecordStore,
    source:     Arc<dyn RecordSource>,
    generation: Generation,
    pending:    Option<JoinHandle<()>>,
    tx:         mpsc::UnboundedSender<FetchCompletion>,
    rx:         mpsc::UnboundedReceiver<FetchCompletion>,
    mounted:    bool,
}

impl ViewController {
    /// Mount the view and issue its fetch. Must run inside a tokio runtime.
    pub fn mount(source: Arc<dyn RecordSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            state: ViewState::default(),
            store: RecordStore::new(),
            source,
            generation: 0,
            pending: None,
            tx,
            rx,
            mounted: true,
        };
        log::info!("view mounted (source: {})", controller.source.name());
        controller.start_fetch();
        controller
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    fn start_fetch(&mut self) {
        if let Some(old) = self.pending.take() {
            old.abort();
            log::debug!("aborted fetch generation {}", self.generation);
        }
        self.generation += 1;
        self.store.begin_load();
        self.state = std::mem::take(&mut self.state).with_loading(true);

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            let result = source.fetch().await;
            // The receiver lives as long as the controller; a send error
            // only means the view is gone.
            let _ = tx.send(FetchCompletion { generation, result });
        }));
        log::debug!("fetch generation {generation} started");
    }

    fn complete(&mut self, done: FetchCompletion) -> bool {
        if !self.mounted {
            log::debug!("view unmounted; dropping generation {} result", done.generation);
            return false;
        }
        if done.generation != self.generation {
            log::debug!(
                "dropping stale generation {} result (current {})",
                done.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;
        self.store.apply(self.source.name(), done.result);
        self.state = std::mem::take(&mut self.state)
            .with_snapshot(self.store.snapshot())
            .with_loading(false);
        true
    }

    /// Apply a settled fetch if one is waiting. Never blocks.
    /// Returns true when the state changed.
    pub fn try_settle(&mut self) -> bool {
        // Sample before draining: a task that finished has already sent,
        // so if it is still pending after the drain it panicked.
        let finished = self.pending.as_ref().is_some_and(|h| h.is_finished());
        let mut applied = false;
        while let Ok(done) = self.rx.try_recv() {
            applied |= self.complete(done);
        }
        if finished && self.pending.is_some() {
            self.pending = None;
            applied |= self.complete(FetchCompletion {
                generation: self.generation,
                result:     Err(DashError::TaskAborted),
            });
        }
        applied
    }

    /// Wait for the outstanding fetch to settle, then apply it.
    /// Returns immediately when nothing is pending.
    pub async fn settle(&mut self) {
        while self.mounted && self.state.loading {
            let Some(handle) = self.pending.as_mut() else {
                self.try_settle();
                break;
            };
            let woke = tokio::select! {
                biased;
                Some(done) = self.rx.recv() => Woke::Completed(done),
                joined = handle => Woke::Joined(joined),
            };
            match woke {
                Woke::Completed(done) => {
                    self.complete(done);
                }
                Woke::Joined(Ok(())) => {
                    self.pending = None;
                    self.try_settle();
                }
                Woke::Joined(Err(e)) => {
                    self.pending = None;
                    log::warn!("fetch task ended abnormally: {e}");
                    self.complete(FetchCompletion {
                        generation: self.generation,
                        result:     Err(DashError::TaskAborted),
                    });
                }
            }
        }
    }

    // ── User actions ───────────────────────────────

    pub fn search(&mut self, term: impl Into<String>) {
        self.state = std::mem::take(&mut self.state).with_search(term);
    }

    /// Open the detail view for `customer_id`. Unknown ids are ignored.
    pub fn open_detail(&mut self, customer_id: &RecordId) -> bool {
        let Some(customer) = self.state.snapshot().customer(customer_id).cloned() else {
            log::warn!("open_detail: no customer with id {customer_id}");
            return false;
        };
        self.state = std::mem::take(&mut self.state).with_detail_opened(customer);
        true
    }

    pub fn close_detail(&mut self) {
        self.state = std::mem::take(&mut self.state).with_detail_closed();
    }

    /// Drop the current fetch, if any, and issue a new one.
    pub fn reload(&mut self) {
        if !self.mounted {
            log::warn!("reload ignored: view unmounted");
            return;
        }
        self.start_fetch();
    }

    pub fn apply_command(&mut self, command: ViewCommand) {
        log::debug!("view command: {}", command.name());
        match command {
            ViewCommand::Search { term }          => self.search(term),
            ViewCommand::OpenDetail { customer_id } => {
                self.open_detail(&customer_id);
            }
            ViewCommand::CloseDetail              => self.close_detail(),
            ViewCommand::Reload                   => self.reload(),
        }
    }

    /// Tear the view down. The outstanding fetch is aborted and any
    /// result still in flight is discarded.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        if self.mounted {
            log::info!("view unmounted at generation {}", self.generation);
        }
        self.mounted = false;
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
