use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Document store answered HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch task ended without a result")]
    TaskAborted,
}

impl DashError {
    /// True for the errors the record store swallows as a FetchFailure:
    /// a failed network call or a body that does not parse.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            DashError::Transport(_)
                | DashError::Status { .. }
                | DashError::Decode(_)
                | DashError::TaskAborted
        )
    }
}

pub type DashResult<T> = Result<T, DashError>;
