//! Column projection
//!
//! The table's column set is a function of the query's selected dimensions
//! and metrics only. It is computed once per fresh fetch and kept across
//! page turns and append fetches.
//!
//! Ordering:
//! 1. nothing selected: every known dimension, then every known metric
//! 2. otherwise exactly the selection (metrics alone are valid)
//! 3. `date` moves to the front of the dimensions
//! 4. a 1-based serial column is prepended

use adboard_report::{Dimension, Metric, ReportRow, humanize_key};

use crate::format::{format_date, format_fixed2, format_plain};

/// Title of the serial column
pub const SERIAL_TITLE: &str = "S.No.";

/// What a column reads from a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    /// Row position across pages, 1-based
    Serial,
    Dimension(Dimension),
    Metric(Metric),
}

impl ColumnKey {
    /// Field key, `serialNumber` for the serial column
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serial => "serialNumber",
            Self::Dimension(d) => d.key(),
            Self::Metric(m) => m.key(),
        }
    }
}

/// A display column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub key: ColumnKey,
}

impl Column {
    fn serial() -> Self {
        Self {
            title: SERIAL_TITLE.to_string(),
            key: ColumnKey::Serial,
        }
    }

    fn dimension(dimension: Dimension) -> Self {
        Self {
            title: dimension.label().to_string(),
            key: ColumnKey::Dimension(dimension),
        }
    }

    fn metric(metric: Metric) -> Self {
        Self {
            title: metric.label().to_string(),
            key: ColumnKey::Metric(metric),
        }
    }

    /// Whether this is the synthetic serial column
    pub fn is_serial(&self) -> bool {
        self.key == ColumnKey::Serial
    }

    /// Table cell text
    ///
    /// `index` is the row's position within the current page (0-based).
    /// Dates render `YYYY-MM-DD`; fractional metrics get two decimals.
    pub fn render(&self, row: &ReportRow, page: usize, page_size: usize, index: usize) -> String {
        match self.key {
            ColumnKey::Serial => serial_number(page, page_size, index).to_string(),
            ColumnKey::Dimension(Dimension::Date) => {
                row.dimension(Dimension::Date).map(format_date).unwrap_or_default()
            }
            ColumnKey::Dimension(d) => row.dimension(d).unwrap_or_default().to_string(),
            ColumnKey::Metric(m) => match row.metric(m) {
                Some(v) if m.is_fractional() => format_fixed2(v),
                Some(v) => format_plain(v),
                None => String::new(),
            },
        }
    }

    /// Raw export value: dates normalized, metrics unrounded
    pub fn export_value(&self, row: &ReportRow) -> Option<String> {
        match self.key {
            ColumnKey::Serial => None,
            ColumnKey::Dimension(Dimension::Date) => row.dimension(Dimension::Date).map(format_date),
            ColumnKey::Dimension(d) => row.dimension(d).map(str::to_string),
            ColumnKey::Metric(m) => row.metric(m).map(format_plain),
        }
    }
}

/// 1-based serial number of the `index`-th row on `page`
pub fn serial_number(page: usize, page_size: usize, index: usize) -> usize {
    page.saturating_sub(1) * page_size + index + 1
}

/// Display columns for a dimension and metric selection
pub fn project_columns(dimensions: &[Dimension], metrics: &[Metric]) -> Vec<Column> {
    let (mut dims, mets): (Vec<Dimension>, Vec<Metric>) =
        if dimensions.is_empty() && metrics.is_empty() {
            (Dimension::ALL.to_vec(), Metric::ALL.to_vec())
        } else {
            (dimensions.to_vec(), metrics.to_vec())
        };

    if let Some(pos) = dims.iter().position(|d| *d == Dimension::Date)
        && pos > 0
    {
        let date = dims.remove(pos);
        dims.insert(0, date);
    }

    let mut columns = Vec::with_capacity(dims.len() + mets.len() + 1);
    columns.push(Column::serial());
    columns.extend(dims.into_iter().map(Column::dimension));
    columns.extend(mets.into_iter().map(Column::metric));
    columns
}

/// Display title for an arbitrary field key
///
/// Known dimension and metric keys get their label; anything else is
/// title-cased.
pub fn title_for_key(key: &str) -> String {
    if let Ok(d) = Dimension::parse(key) {
        return d.label().to_string();
    }
    if let Ok(m) = Metric::parse(key) {
        return m.label().to_string();
    }
    humanize_key(key)
}
