//! Report model error types

use thiserror::Error;

/// Errors raised while building or parsing a report query
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Invalid date range
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Unknown dimension key or label
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// Unknown metric key or label
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Unknown categorical filter field
    #[error("unknown filter field: {0}")]
    UnknownFilter(String),

    /// Sort order other than asc/desc
    #[error("invalid sort order: {0} (use asc or desc)")]
    InvalidSortOrder(String),
}

/// Result type for report model operations
pub type Result<T> = std::result::Result<T, ReportError>;
