//! Shared primitive types used across the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record identifier as it appears in the document store.
///
/// The store hands out numbers for some collections and strings for
/// others. The JSON kind is kept: `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n)  => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Num(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

impl RecordId {
    /// Parse a command-line id: digits become `Num`, anything else `Text`.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<i64>()
            .map(RecordId::Num)
            .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
    }
}

/// A calendar date in sortable lexical form (`YYYY-MM-DD`).
pub type DateKey = String;

/// Monotonic tag of a fetch issued by the view controller.
pub type Generation = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_trims_both_kinds() {
        assert_eq!(RecordId::parse_lenient(" 42 "), RecordId::Num(42));
        assert_eq!(RecordId::parse_lenient(" c-2\t"), RecordId::from("c-2"));
        assert_eq!(RecordId::parse_lenient("-7"), RecordId::Num(-7));
        assert_eq!(RecordId::parse_lenient("007x"), RecordId::from("007x"));
    }
}
