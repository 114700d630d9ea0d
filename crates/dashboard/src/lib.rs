//! adboard dashboard - client-side report browsing
//!
//! # Components
//!
//! - **[`ChunkPager`]**: buffers rows fetched in 20,000-row chunks and serves
//!   table pages out of the buffer, appending the next chunk on demand
//! - **[`project_columns`]**: display columns for a dimension/metric selection
//! - **[`Debouncer`]**: trailing-edge coalescing of fetch triggers
//! - **[`import`]**: import file checks and the polling job tracker
//! - **[`export`]**: CSV export of the loaded buffer
//! - **[`Session`]**: sequential driver used by the CLI
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use adboard_dashboard::Session;
//! use adboard_remote::{HttpReportSource, DEFAULT_TIMEOUT};
//! use adboard_report::{ReportQuery, daterange::today};
//!
//! let source = Arc::new(HttpReportSource::new("http://localhost:8080/api", DEFAULT_TIMEOUT)?);
//! let mut session = Session::new(source, ReportQuery::default_for(today()), 100);
//! session.submit().await?;
//! let rows = session.goto_page(3, 100).await?;
//! ```

pub mod columns;
pub mod debounce;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod pager;
pub mod session;
pub mod summary;

#[cfg(test)]
mod columns_test;
#[cfg(test)]
mod pager_test;

pub use columns::{Column, ColumnKey, project_columns, serial_number, title_for_key};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use error::{DashboardError, Result};
pub use format::{format_date, format_number};
pub use pager::{
    Applied, ChunkKind, ChunkPager, ChunkRequest, ChunkResponse, DEFAULT_PAGE_SIZE, fetch_chunk,
};
pub use session::Session;
pub use summary::SummaryMetrics;
