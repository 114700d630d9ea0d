//! Chunked pagination engine
//!
//! Rows are fetched from the backend in chunks of [`CHUNK_SIZE`], buffered,
//! and served as table pages out of the buffer. A page past the end of the
//! buffer triggers an append fetch for the next chunk.
//!
//! The engine performs no I/O. [`ChunkPager::reset`] and
//! [`ChunkPager::request_page`] hand out [`ChunkRequest`]s; the caller runs
//! them (see [`fetch_chunk`]) and feeds the outcome back through
//! [`ChunkPager::apply`]. Every request carries the generation it was issued
//! under, and responses from an older generation are dropped, so the most
//! recent query always wins.

use adboard_remote::{RemoteError, ReportSource};
use adboard_report::{CHUNK_SIZE, ChunkWindow, QueryBody, ReportQuery, ReportRow};
use tracing::{debug, warn};

use crate::columns::{Column, project_columns};

/// Default table page size
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Why a chunk is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Chunk zero of a new query; replaces the buffer
    Reset,
    /// Next chunk of the current query; extends the buffer
    Append,
}

/// A chunk fetch to run against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRequest {
    pub generation: u64,
    pub kind: ChunkKind,
    pub window: ChunkWindow,
    pub body: QueryBody,
}

/// Outcome of a [`ChunkRequest`]
#[derive(Debug)]
pub struct ChunkResponse {
    pub request: ChunkRequest,
    pub result: Result<Vec<ReportRow>, RemoteError>,
}

/// What [`ChunkPager::apply`] did with a response
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Rows stored; `rows` is the chunk length
    Loaded { kind: ChunkKind, rows: usize },
    /// The fetch failed; buffer reset or kept per `kind`
    Failed { kind: ChunkKind, error: RemoteError },
    /// Issued under an older generation, ignored
    Stale,
}

/// Run a chunk request against a source
pub async fn fetch_chunk(source: &dyn ReportSource, request: ChunkRequest) -> ChunkResponse {
    let result = source.fetch_rows(&request.body).await;
    ChunkResponse { request, result }
}

/// Client-side pagination over chunked fetches
#[derive(Debug)]
pub struct ChunkPager {
    rows: Vec<ReportRow>,
    has_more: bool,
    current_page: usize,
    page_size: usize,
    chunk_size: usize,
    /// Query the buffer belongs to
    query: ReportQuery,
    columns: Vec<Column>,
    generation: u64,
    /// Offset of the append fetch in flight, if any
    pending_append: Option<usize>,
    loading: bool,
}

impl Default for ChunkPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ChunkPager {
    /// Empty pager with the given page size
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            has_more: false,
            current_page: 1,
            page_size: page_size.max(1),
            chunk_size: CHUNK_SIZE,
            query: ReportQuery::default(),
            columns: Vec::new(),
            generation: 0,
            pending_append: None,
            loading: false,
        }
    }

    /// Pager fetching chunks of `chunk_size` rows
    #[cfg(test)]
    pub(crate) fn with_chunk_size(page_size: usize, chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..Self::new(page_size)
        }
    }

    /// Start over with a new query
    ///
    /// Clears the buffer and returns the request for chunk zero. Any response
    /// still in flight for an earlier request becomes stale.
    pub fn reset(&mut self, query: ReportQuery) -> ChunkRequest {
        self.generation += 1;
        self.rows.clear();
        self.has_more = false;
        self.pending_append = None;
        self.loading = true;
        self.query = query;

        let window = self.window(0);
        debug!(generation = self.generation, "pager reset");
        ChunkRequest {
            generation: self.generation,
            kind: ChunkKind::Reset,
            window,
            body: self.query.rows_body(window),
        }
    }

    /// Move to a page, returning its rows and an append fetch if one is due
    ///
    /// Both arguments are clamped to at least 1. The slice reflects the
    /// buffer as it is now and may be short, or empty, while the append
    /// fetch is outstanding. At most one append is issued per chunk
    /// boundary, and never while the buffer ends mid-chunk.
    pub fn request_page(
        &mut self,
        page: usize,
        size: usize,
    ) -> (&[ReportRow], Option<ChunkRequest>) {
        self.current_page = page.max(1);
        self.page_size = size.max(1);

        let wanted = self.current_page.saturating_mul(self.page_size);
        let len = self.rows.len();
        let fetch = if wanted > len
            && self.has_more
            && len % self.chunk_size == 0
            && self.pending_append != Some(len)
        {
            self.pending_append = Some(len);
            let window = self.window(len);
            debug!(generation = self.generation, offset = len, "pager append");
            Some(ChunkRequest {
                generation: self.generation,
                kind: ChunkKind::Append,
                window,
                body: self.query.rows_body(window),
            })
        } else {
            None
        };

        (self.page_rows(), fetch)
    }

    /// Fold a fetch outcome into the buffer
    pub fn apply(&mut self, response: ChunkResponse) -> Applied {
        let ChunkResponse { request, result } = response;
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                current = self.generation,
                "discarding stale chunk"
            );
            return Applied::Stale;
        }

        match (request.kind, result) {
            (ChunkKind::Reset, Ok(rows)) => {
                let count = rows.len();
                self.has_more = count == request.window.limit;
                self.rows = rows;
                self.current_page = 1;
                self.loading = false;
                self.columns = project_columns(&self.query.dimensions, &self.query.metrics);
                debug!(rows = count, has_more = self.has_more, "chunk zero loaded");
                Applied::Loaded {
                    kind: ChunkKind::Reset,
                    rows: count,
                }
            }
            (ChunkKind::Reset, Err(error)) => {
                warn!(error = %error, "chunk zero failed");
                self.rows.clear();
                self.columns.clear();
                self.has_more = false;
                self.loading = false;
                Applied::Failed {
                    kind: ChunkKind::Reset,
                    error,
                }
            }
            (ChunkKind::Append, result) => {
                if self.pending_append != Some(request.window.offset) {
                    return Applied::Stale;
                }
                self.pending_append = None;
                match result {
                    Ok(rows) => {
                        let count = rows.len();
                        self.has_more = count == request.window.limit;
                        self.rows.extend(rows);
                        debug!(
                            rows = count,
                            total = self.rows.len(),
                            has_more = self.has_more,
                            "chunk appended"
                        );
                        Applied::Loaded {
                            kind: ChunkKind::Append,
                            rows: count,
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, offset = request.window.offset, "append failed");
                        Applied::Failed {
                            kind: ChunkKind::Append,
                            error,
                        }
                    }
                }
            }
        }
    }

    /// Back to page 1 at `page_size` without touching the buffer
    pub fn rewind(&mut self, page_size: usize) {
        self.current_page = 1;
        self.page_size = page_size.max(1);
    }

    /// Rows of the current page
    pub fn page_rows(&self) -> &[ReportRow] {
        let len = self.rows.len();
        let start = (self.current_page - 1).saturating_mul(self.page_size).min(len);
        let end = self.current_page.saturating_mul(self.page_size).min(len);
        &self.rows[start..end]
    }

    /// Total for a pagination control: one past the buffer while more exist
    pub fn reported_total(&self) -> usize {
        if self.has_more {
            self.rows.len() + 1
        } else {
            self.rows.len()
        }
    }

    /// Number of pages implied by [`reported_total`](Self::reported_total)
    pub fn page_count(&self) -> usize {
        self.reported_total().div_ceil(self.page_size).max(1)
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Columns of the last successful fresh fetch
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The query the buffer belongs to
    pub fn query(&self) -> &ReportQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A fresh fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// An append fetch is outstanding
    pub fn is_appending(&self) -> bool {
        self.pending_append.is_some()
    }

    fn window(&self, offset: usize) -> ChunkWindow {
        ChunkWindow {
            offset,
            limit: self.chunk_size,
        }
    }
}
