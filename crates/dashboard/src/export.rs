//! CSV export of the loaded buffer
//!
//! Comma separated, a header row of display labels, one line per buffered
//! row, lines joined by `\n`. A value is double-quoted only when it contains
//! a comma or a quote, with embedded quotes doubled. Dates are written
//! `YYYY-MM-DD`; metrics are written unrounded.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use adboard_report::ReportRow;

use crate::columns::{Column, project_columns};
use crate::error::{DashboardError, Result};

/// Quote a value if it contains a comma or a quote
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Columns written by an export
///
/// The current projection without its serial column; every known dimension
/// and metric when nothing has been projected yet.
pub fn export_columns(columns: &[Column]) -> Vec<Column> {
    let mut out: Vec<Column> = columns.iter().filter(|c| !c.is_serial()).cloned().collect();
    if out.is_empty() {
        out = project_columns(&[], &[])
            .into_iter()
            .filter(|c| !c.is_serial())
            .collect();
    }
    out
}

/// Render rows as CSV text
pub fn to_csv(columns: &[Column], rows: &[ReportRow]) -> Result<String> {
    if rows.is_empty() {
        return Err(DashboardError::NoData);
    }

    let columns = export_columns(columns);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| csv_escape(&c.title))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let values: Vec<String> = columns
            .iter()
            .map(|c| c.export_value(row).map(|v| csv_escape(&v)).unwrap_or_default())
            .collect();
        lines.push(values.join(","));
    }
    Ok(lines.join("\n"))
}

/// `dashboard_report_<YYYY-MM-DD_HH-mm-ss>.csv`
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("dashboard_report_{}.csv", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write an export file into `dir`, returning its path
pub fn write_export(
    dir: &Path,
    columns: &[Column],
    rows: &[ReportRow],
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let content = to_csv(columns, rows)?;
    let path = dir.join(export_filename(now));
    std::fs::write(&path, content)?;
    info!(path = %path.display(), records = rows.len(), "CSV exported");
    Ok(path)
}
