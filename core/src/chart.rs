//! Chart-ready series for the detail view.
//!
//! The core generates these; a front-end only renders them.
//! Field names serialise in the charting surface's camelCase shape.

use crate::types::DateKey;
use serde::{Deserialize, Serialize};

pub const DETAIL_TITLE: &str = "Transaction Amount Per Day";
pub const SERIES_LABEL: &str = "Transaction Amount";
pub const SERIES_BORDER_COLOR: &str = "rgba(75,192,192,1)";
pub const SERIES_TENSION: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label:        String,
    pub data:         Vec<f64>,
    pub fill:         bool,
    pub border_color: String,
    pub tension:      f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Dates, ascending.
    pub labels:   Vec<DateKey>,
    /// One line series; `data[i]` is the total on `labels[i]`.
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Split ordered `(date, amount)` pairs into parallel label/value arrays.
    pub fn from_series(series: Vec<(DateKey, f64)>) -> Self {
        let (labels, data): (Vec<_>, Vec<_>) = series.into_iter().unzip();
        Self {
            labels,
            datasets: vec![ChartDataset {
                label:        SERIES_LABEL.to_string(),
                data,
                fill:         false,
                border_color: SERIES_BORDER_COLOR.to_string(),
                tension:      SERIES_TENSION,
            }],
        }
    }

    pub fn values(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
