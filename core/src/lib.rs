//! dashboard-core: record store, aggregation engine and view controller
//! behind the customer transaction dashboard.
//!
//! Layering, bottom-up:
//!   types, model      — wire records
//!   aggregate, search — pure functions over a record set
//!   snapshot, store   — the atomically replaced record set
//!   chart, table      — display-ready shapes
//!   source            — where records come from
//!   view              — immutable view state and its controller

pub mod aggregate;
pub mod chart;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod table;
pub mod types;
pub mod view;

pub use error::{DashError, DashResult};
