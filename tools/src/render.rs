//! Plain-text rendering of the table and the detail chart.

use dashboard_core::{
    table::TablePresentation,
    view::DetailPresentation,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

pub fn table(table: &TablePresentation) -> String {
    let mut out = String::new();
    match table {
        TablePresentation::Loading => out.push_str("Loading...\n"),
        TablePresentation::NoData => out.push_str("No data available.\n"),
        TablePresentation::Rows(rows) => {
            let name_width = rows
                .iter()
                .map(|r| r.name.chars().count())
                .max()
                .unwrap_or(0)
                .max("Customer Name".len());
            let _ = writeln!(
                out,
                "{:>11} | {:<name_width$} | {:>25}",
                "Customer ID", "Customer Name", "Total Transactions Amount"
            );
            let _ = writeln!(
                out,
                "{}-+-{}-+-{}",
                "-".repeat(11),
                "-".repeat(name_width),
                "-".repeat(25)
            );
            for row in rows {
                let _ = writeln!(
                    out,
                    "{:>11} | {:<name_width$} | {:>25}",
                    row.id.to_string(),
                    row.name,
                    format_amount(row.total)
                );
            }
        }
    }
    out
}

/// Horizontal bars, one per day, scaled to the largest magnitude.
pub fn detail(detail: &DetailPresentation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} — {} ({})", detail.title, detail.customer.name, detail.customer.id);

    let chart = &detail.chart;
    if chart.is_empty() {
        out.push_str("  (no transactions)\n");
        return out;
    }

    let values = chart.values();
    let peak = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    for (date, value) in chart.labels.iter().zip(values) {
        let len = if peak > 0.0 {
            ((value.abs() / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if *value < 0.0 { "-" } else { "#" };
        let _ = writeln!(
            out,
            "  {date} | {:<BAR_WIDTH$} {}",
            glyph.repeat(len),
            format_amount(*value)
        );
    }
    out
}

/// Whole amounts print without a fraction, like the source data.
fn format_amount(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
