//! The report source seam

use async_trait::async_trait;

use adboard_report::{
    AggregateTotals, DateRange, FilterOptions, ImportProgress, QueryBody, ReportRow,
};

use crate::error::Result;

/// Reporting backend operations
///
/// Implemented by [`HttpReportSource`](crate::HttpReportSource) and, for
/// tests, [`MemorySource`](crate::test_utils::MemorySource).
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch one chunk of rows; a full chunk means more may exist
    async fn fetch_rows(&self, body: &QueryBody) -> Result<Vec<ReportRow>>;

    /// Fetch totals across the filtered dataset (body has no window)
    async fn fetch_aggregate(&self, body: &QueryBody) -> Result<AggregateTotals>;

    /// Distinct filter values observed in a date window
    async fn fetch_filter_options(&self, window: &DateRange) -> Result<FilterOptions>;

    /// Upload a CSV file; returns the confirmation text
    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String>;

    /// Status of an import job
    async fn fetch_job_progress(&self, job_id: &str) -> Result<ImportProgress>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
