//! The customer table surface.

use crate::{search, snapshot::Snapshot, types::RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id:    RecordId,
    pub name:  String,
    pub total: f64,
}

/// What the table area shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum TablePresentation {
    /// The fetch has not settled yet.
    Loading,
    /// Settled, but customers or transactions came back empty.
    NoData,
    Rows(Vec<TableRow>),
}

impl TablePresentation {
    pub fn build(snapshot: &Snapshot, loading: bool, search_term: &str) -> Self {
        if loading {
            return TablePresentation::Loading;
        }
        if !snapshot.has_data() {
            return TablePresentation::NoData;
        }
        let rows = search::filter(snapshot.customers(), search_term)
            .into_iter()
            .map(|c| TableRow {
                id:    c.id.clone(),
                name:  c.name.clone(),
                total: snapshot.total_for(&c.id),
            })
            .collect();
        TablePresentation::Rows(rows)
    }

    pub fn rows(&self) -> &[TableRow] {
        match self {
            TablePresentation::Rows(rows) => rows,
            _ => &[],
        }
    }
}
