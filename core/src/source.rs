//! Record sources — where a snapshot comes from.
//!
//! RULE: a source only fetches and decodes. It never touches the store;
//! the store decides what to do with the result.

use crate::{
    config::DashboardConfig,
    error::{DashError, DashResult},
    model::{RecordDocument, RecordSet},
};
use async_trait::async_trait;

/// The contract every record source fulfils.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short stable name for log lines.
    fn name(&self) -> &'static str;

    /// Fetch one complete record set.
    async fn fetch(&self) -> DashResult<RecordSet>;
}

/// Fetches the document over HTTP GET with a credential header.
pub struct HttpRecordSource {
    client:     reqwest::Client,
    endpoint:   String,
    credential: Option<(String, String)>,
}

impl HttpRecordSource {
    pub fn new(config: &DashboardConfig) -> DashResult<Self> {
        config
            .validate()
            .map_err(|e| DashError::Config(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let credential = config
            .credential()
            .map(|value| (config.credential_header.clone(), value));
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credential,
        })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> DashResult<RecordSet> {
        let mut request = self.client.get(&self.endpoint);
        if let Some((header, value)) = &self.credential {
            request = request.header(header.as_str(), value.as_str());
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Status { status: status.as_u16() });
        }
        let body = response.bytes().await?;
        let records = RecordDocument::from_slice(&body)?;
        log::debug!(
            "http: fetched {} customers, {} transactions from {}",
            records.customers.len(),
            records.transactions.len(),
            self.endpoint
        );
        Ok(records)
    }
}

/// Serves a fixed record set. Used by tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: RecordSet,
}

impl StaticSource {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }

    /// Decode a document body up front, as the HTTP source would.
    pub fn from_json(body: &str) -> DashResult<Self> {
        Ok(Self::new(RecordDocument::from_slice(body.as_bytes())?))
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> DashResult<RecordSet> {
        Ok(self.records.clone())
    }
}

/// Always fails with a FetchFailure-class error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSource {
    pub status: u16,
}

#[async_trait]
impl RecordSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch(&self) -> DashResult<RecordSet> {
        Err(DashError::Status { status: self.status })
    }
}
