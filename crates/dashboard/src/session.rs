//! Sequential dashboard session
//!
//! Owns a query, the pagination engine, the summary totals and the filter
//! options, and runs every fetch to completion before returning. The CLI
//! drives the dashboard through this; the interactive dashboard drives the
//! engine directly so fetches can overlap.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use adboard_remote::ReportSource;
use adboard_report::{DateRange, FilterOptions, ReportQuery, ReportRow};

use crate::columns::Column;
use crate::error::{DashboardError, Result};
use crate::export::write_export;
use crate::pager::{Applied, ChunkPager, fetch_chunk};
use crate::summary::SummaryMetrics;

pub struct Session {
    source: Arc<dyn ReportSource>,
    query: ReportQuery,
    pager: ChunkPager,
    default_page_size: usize,
    summary: SummaryMetrics,
    filter_options: FilterOptions,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("source", &self.source.name())
            .field("query", &self.query)
            .field("pager", &self.pager)
            .finish()
    }
}

impl Session {
    /// Session over `source` starting from `query`
    pub fn new(source: Arc<dyn ReportSource>, query: ReportQuery, page_size: usize) -> Self {
        Self {
            source,
            query,
            pager: ChunkPager::new(page_size),
            default_page_size: page_size.max(1),
            summary: SummaryMetrics::default(),
            filter_options: FilterOptions::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_pager(
        source: Arc<dyn ReportSource>,
        query: ReportQuery,
        pager: ChunkPager,
    ) -> Self {
        let default_page_size = pager.page_size();
        Self {
            source,
            query,
            pager,
            default_page_size,
            summary: SummaryMetrics::default(),
            filter_options: FilterOptions::default(),
        }
    }

    pub fn query(&self) -> &ReportQuery {
        &self.query
    }

    /// Replace the edited query; takes effect on the next submit
    pub fn set_query(&mut self, query: ReportQuery) {
        self.query = query;
    }

    pub fn pager(&self) -> &ChunkPager {
        &self.pager
    }

    pub fn summary(&self) -> SummaryMetrics {
        self.summary
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn columns(&self) -> &[Column] {
        self.pager.columns()
    }

    /// Change the date range and refresh the filter options for it
    ///
    /// A fully cleared range becomes the trailing week ending at `today`. A
    /// half-set range is stored but leaves the options alone.
    pub async fn set_date_range(&mut self, range: DateRange, today: NaiveDate) -> Result<()> {
        let range = range.or_trailing_week(today);
        self.query.date_range = range;
        if range.is_complete() {
            self.load_filter_options().await?;
        }
        Ok(())
    }

    /// Fetch the filter options for the current date range
    pub async fn load_filter_options(&mut self) -> Result<&FilterOptions> {
        match self.source.fetch_filter_options(&self.query.date_range).await {
            Ok(options) => {
                self.filter_options = options;
                Ok(&self.filter_options)
            }
            Err(e) => {
                warn!(error = %e, "filter options fetch failed");
                Err(e.into())
            }
        }
    }

    /// Run the query from scratch: chunk zero replaces the buffer
    ///
    /// On failure the buffer is left empty.
    pub async fn submit(&mut self) -> Result<usize> {
        let request = self.pager.reset(self.query.clone());
        let response = fetch_chunk(self.source.as_ref(), request).await;
        match self.pager.apply(response) {
            Applied::Loaded { rows, .. } => {
                info!(rows, has_more = self.pager.has_more(), "report loaded");
                Ok(rows)
            }
            Applied::Failed { error, .. } => Err(error.into()),
            Applied::Stale => Ok(0),
        }
    }

    /// Refresh the summary totals; zeroed on failure
    pub async fn refresh_summary(&mut self) -> Result<SummaryMetrics> {
        match self.source.fetch_aggregate(&self.query.aggregate_body()).await {
            Ok(totals) => {
                self.summary = totals.into();
                Ok(self.summary)
            }
            Err(e) => {
                warn!(error = %e, "summary fetch failed");
                self.summary = SummaryMetrics::default();
                Err(e.into())
            }
        }
    }

    /// Submit and refresh the summary, as after a finished import
    pub async fn refresh(&mut self) -> Result<()> {
        let rows = self.submit().await;
        let summary = self.refresh_summary().await;
        rows?;
        summary?;
        Ok(())
    }

    /// Move to a page, waiting for the append fetch it needs, if any
    ///
    /// A failed append keeps the rows already buffered; the page may then
    /// come back short.
    pub async fn goto_page(&mut self, page: usize, size: usize) -> Result<Vec<ReportRow>> {
        let (_, fetch) = self.pager.request_page(page, size);
        if let Some(request) = fetch {
            let response = fetch_chunk(self.source.as_ref(), request).await;
            if let Applied::Failed { error, .. } = self.pager.apply(response) {
                return Err(error.into());
            }
        }
        Ok(self.pager.page_rows().to_vec())
    }

    /// Append chunks until the source is exhausted
    pub async fn load_all(&mut self) -> Result<usize> {
        while self.pager.has_more() {
            let size = self.pager.page_size();
            let next_page = self.pager.rows().len() / size + 1;
            let before = self.pager.rows().len();
            self.goto_page(next_page, size).await?;
            if self.pager.rows().len() == before {
                break;
            }
            debug!(rows = self.pager.rows().len(), "loaded another chunk");
        }
        Ok(self.pager.rows().len())
    }

    /// Back to the default query, page 1 and the default page size
    ///
    /// Nothing is fetched.
    pub fn reset_filters(&mut self, today: NaiveDate) {
        self.query = ReportQuery::default_for(today);
        self.pager.rewind(self.default_page_size);
    }

    /// Write the buffer as CSV into `dir`
    pub fn export(&self, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
        if self.pager.rows().is_empty() {
            return Err(DashboardError::NoData);
        }
        write_export(dir, self.pager.columns(), self.pager.rows(), now)
    }
}
