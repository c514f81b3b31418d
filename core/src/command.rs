use serde::{Deserialize, Serialize};
use crate::types::RecordId;

/// All user-issued view commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ViewCommand {
    // ── Table ─────────────────────────────────────
    Search { term: String },

    // ── Detail view ───────────────────────────────
    OpenDetail { customer_id: RecordId },
    CloseDetail,

    // ── Data ──────────────────────────────────────
    Reload,
}

impl ViewCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ViewCommand::Search { .. }     => "search",
            ViewCommand::OpenDetail { .. } => "open_detail",
            ViewCommand::CloseDetail       => "close_detail",
            ViewCommand::Reload            => "reload",
        }
    }
}
