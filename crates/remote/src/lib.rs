//! adboard remote - reporting backend client
//!
//! The dashboard talks to the backend only through [`ReportSource`]:
//! - **[`HttpReportSource`]**: reqwest client for the real backend
//! - **[`test_utils::MemorySource`]**: scripted in-memory source for tests
//!
//! # Usage
//!
//! ```ignore
//! use adboard_remote::{HttpReportSource, ReportSource, DEFAULT_TIMEOUT};
//! use adboard_report::{ChunkWindow, DateRange, ReportQuery};
//!
//! let source = HttpReportSource::new("http://localhost:8080/api", DEFAULT_TIMEOUT)?;
//! let query = ReportQuery::new(DateRange::parse("7d")?);
//! let rows = source.fetch_rows(&query.rows_body(ChunkWindow::first())).await?;
//! ```

pub mod error;
pub mod http;
pub mod source;
pub mod test_utils;

pub use error::{RemoteError, Result};
pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpReportSource};
pub use source::ReportSource;
