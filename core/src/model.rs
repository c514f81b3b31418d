//! Wire records as served by the document store.

use crate::types::{DateKey, RecordId};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id:   RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub customer_id: RecordId,
    pub date:        DateKey,
    pub amount:      f64,
}

/// The two collections inside the document's `record` envelope.
/// A missing or `null` array is an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customers:    Vec<Customer>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<Transaction>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level body: `{ "record": { "customers": [...], "transactions": [...] } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDocument {
    #[serde(default)]
    pub record: RecordSet,
}

impl RecordDocument {
    pub fn from_slice(body: &[u8]) -> Result<RecordSet, serde_json::Error> {
        let doc: RecordDocument = serde_json::from_slice(body)?;
        Ok(doc.record)
    }
}

impl Customer {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl Transaction {
    pub fn new(customer_id: impl Into<RecordId>, date: impl Into<DateKey>, amount: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            date:        date.into(),
            amount,
        }
    }
}
