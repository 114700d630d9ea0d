//! In-memory report source for tests
//!
//! Serves rows out of a fixed dataset using each request's offset/limit, and
//! records every call so tests can assert on what was requested. Failures
//! and import progress are scripted per call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use adboard_report::{
    AggregateTotals, DateRange, FilterOptions, ImportProgress, QueryBody, ReportRow,
};

use crate::error::{RemoteError, Result};
use crate::source::ReportSource;

/// A call recorded by [`MemorySource`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Rows(QueryBody),
    Aggregate(QueryBody),
    FilterOptions(DateRange),
    Upload { file_name: String, size: usize },
    Progress(String),
}

#[derive(Debug, Default)]
struct State {
    rows: Vec<ReportRow>,
    totals: AggregateTotals,
    filter_options: FilterOptions,
    upload_reply: String,
    progress: VecDeque<Result<ImportProgress>>,
    row_failures: VecDeque<RemoteError>,
    aggregate_failures: VecDeque<RemoteError>,
    filter_failures: VecDeque<RemoteError>,
    upload_failures: VecDeque<RemoteError>,
    calls: Vec<Call>,
}

/// Scriptable in-memory [`ReportSource`]
#[derive(Debug, Default)]
pub struct MemorySource {
    state: Mutex<State>,
}

/// `n` rows with ids `0..n`
pub fn numbered_rows(n: usize) -> Vec<ReportRow> {
    (0..n as i64).map(ReportRow::with_id).collect()
}

impl MemorySource {
    /// Source serving `rows`
    pub fn with_rows(rows: Vec<ReportRow>) -> Self {
        let source = Self::default();
        source.lock().rows = rows;
        source
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_rows(&self, rows: Vec<ReportRow>) {
        self.lock().rows = rows;
    }

    pub fn set_totals(&self, totals: AggregateTotals) {
        self.lock().totals = totals;
    }

    pub fn set_filter_options(&self, options: FilterOptions) {
        self.lock().filter_options = options;
    }

    /// Text returned by the next uploads
    pub fn set_upload_reply(&self, reply: impl Into<String>) {
        self.lock().upload_reply = reply.into();
    }

    /// Queue a progress reply; the last one repeats once the queue drains
    pub fn push_progress(&self, progress: ImportProgress) {
        self.lock().progress.push_back(Ok(progress));
    }

    /// Queue a failing progress reply
    pub fn push_progress_failure(&self, err: RemoteError) {
        self.lock().progress.push_back(Err(err));
    }

    /// Fail the next row fetch
    pub fn fail_next_rows(&self, err: RemoteError) {
        self.lock().row_failures.push_back(err);
    }

    /// Fail the next aggregate fetch
    pub fn fail_next_aggregate(&self, err: RemoteError) {
        self.lock().aggregate_failures.push_back(err);
    }

    /// Fail the next filter options fetch
    pub fn fail_next_filter_options(&self, err: RemoteError) {
        self.lock().filter_failures.push_back(err);
    }

    /// Fail the next upload
    pub fn fail_next_upload(&self, err: RemoteError) {
        self.lock().upload_failures.push_back(err);
    }

    /// Every call so far
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Bodies of every row fetch so far
    pub fn row_requests(&self) -> Vec<QueryBody> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Rows(body) => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of progress polls so far
    pub fn progress_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Progress(_)))
            .count()
    }
}

#[async_trait]
impl ReportSource for MemorySource {
    async fn fetch_rows(&self, body: &QueryBody) -> Result<Vec<ReportRow>> {
        let mut state = self.lock();
        state.calls.push(Call::Rows(body.clone()));
        if let Some(err) = state.row_failures.pop_front() {
            return Err(err);
        }

        let offset = body.offset.unwrap_or(0).min(state.rows.len());
        let end = match body.limit {
            Some(limit) => offset.saturating_add(limit).min(state.rows.len()),
            None => state.rows.len(),
        };
        Ok(state.rows[offset..end].to_vec())
    }

    async fn fetch_aggregate(&self, body: &QueryBody) -> Result<AggregateTotals> {
        let mut state = self.lock();
        state.calls.push(Call::Aggregate(body.clone()));
        match state.aggregate_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state.totals),
        }
    }

    async fn fetch_filter_options(&self, window: &DateRange) -> Result<FilterOptions> {
        let mut state = self.lock();
        state.calls.push(Call::FilterOptions(*window));
        match state.filter_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state.filter_options.clone()),
        }
    }

    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(Call::Upload {
            file_name: file_name.to_string(),
            size: contents.len(),
        });
        match state.upload_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state.upload_reply.clone()),
        }
    }

    async fn fetch_job_progress(&self, job_id: &str) -> Result<ImportProgress> {
        let mut state = self.lock();
        state.calls.push(Call::Progress(job_id.to_string()));
        let reply = if state.progress.len() > 1 {
            state.progress.pop_front()
        } else {
            state.progress.front().cloned()
        };
        reply.unwrap_or_else(|| Err(RemoteError::Transport("no progress scripted".into())))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
