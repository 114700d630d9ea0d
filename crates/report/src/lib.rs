//! adboard report model
//!
//! Everything the dashboard sends to, and receives from, the reporting
//! backend.
//!
//! # Overview
//!
//! - **Schema**: the fixed [`Dimension`] and [`Metric`] enums with their wire
//!   keys and display labels
//! - **Date ranges**: inclusive calendar windows with the trailing-week default
//! - **Queries**: [`ReportQuery`] plus the request bodies derived from it
//! - **Rows**: [`ReportRow`], [`AggregateTotals`], [`FilterSet`] and
//!   [`ImportProgress`] as returned by the backend
//!
//! # Usage
//!
//! ```
//! use adboard_report::{ChunkWindow, DateRange, Dimension, Metric, ReportQuery};
//!
//! let query = ReportQuery::new(DateRange::parse("7d").unwrap())
//!     .with_dimension(Dimension::AppName)
//!     .with_metric(Metric::Payout);
//!
//! let body = query.rows_body(ChunkWindow::first());
//! assert_eq!(body.limit, Some(20_000));
//! ```

pub mod daterange;
pub mod error;
pub mod query;
pub mod row;
pub mod schema;

#[cfg(test)]
mod daterange_test;

pub use daterange::DateRange;
pub use error::{ReportError, Result};
pub use query::{
    CHUNK_SIZE, ChunkWindow, FilterField, FilterSet, QueryBody, ReportQuery, Sort, SortOrder,
};
pub use row::{AggregateTotals, FilterOptions, ImportProgress, ReportRow, COMPLETED_PHASE};
pub use schema::{Dimension, Metric, humanize_key};
