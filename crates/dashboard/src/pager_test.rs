//! Tests for the chunked pagination engine

use adboard_remote::RemoteError;
use adboard_remote::test_utils::{MemorySource, numbered_rows};
use adboard_report::{CHUNK_SIZE, DateRange, Dimension, Metric, ReportQuery, ReportRow};

use crate::columns::ColumnKey;
use crate::pager::{Applied, ChunkKind, ChunkPager, ChunkRequest, ChunkResponse, fetch_chunk};

fn query() -> ReportQuery {
    ReportQuery::new(DateRange::parse("2024-03-03,2024-03-10").unwrap())
}

fn ok(request: ChunkRequest, rows: Vec<ReportRow>) -> ChunkResponse {
    ChunkResponse {
        request,
        result: Ok(rows),
    }
}

fn failed(request: ChunkRequest) -> ChunkResponse {
    ChunkResponse {
        request,
        result: Err(RemoteError::Transport("connection reset".into())),
    }
}

/// Pager with small chunks and chunk zero loaded from `source`
async fn loaded(source: &MemorySource, page_size: usize, chunk: usize) -> ChunkPager {
    let mut pager = ChunkPager::with_chunk_size(page_size, chunk);
    let request = pager.reset(query());
    let response = fetch_chunk(source, request).await;
    assert!(matches!(pager.apply(response), Applied::Loaded { .. }));
    pager
}

#[test]
fn test_reset_request_is_chunk_zero() {
    let mut pager = ChunkPager::new(100);
    let request = pager.reset(query());
    assert_eq!(request.kind, ChunkKind::Reset);
    assert_eq!(request.window.offset, 0);
    assert_eq!(request.window.limit, CHUNK_SIZE);
    assert_eq!(request.body.offset, Some(0));
    assert_eq!(request.body.limit, Some(CHUNK_SIZE));
    assert!(pager.is_loading());
}

#[test]
fn test_reset_success_sets_buffer_and_page_one() {
    let mut pager = ChunkPager::with_chunk_size(10, 5);
    let request = pager.reset(query());
    pager.request_page(3, 10);

    assert_eq!(
        pager.apply(ok(request, numbered_rows(5))),
        Applied::Loaded {
            kind: ChunkKind::Reset,
            rows: 5
        }
    );
    assert_eq!(pager.rows().len(), 5);
    assert!(pager.has_more());
    assert_eq!(pager.current_page(), 1);
    assert!(!pager.is_loading());
    assert_eq!(pager.reported_total(), 6);
}

#[test]
fn test_short_chunk_means_no_more() {
    let mut pager = ChunkPager::with_chunk_size(10, 5);
    let request = pager.reset(query());
    pager.apply(ok(request, numbered_rows(3)));
    assert!(!pager.has_more());
    assert_eq!(pager.reported_total(), 3);
    assert_eq!(pager.page_count(), 1);
}

#[test]
fn test_reset_failure_empties_buffer() {
    let mut pager = ChunkPager::with_chunk_size(10, 5);
    let request = pager.reset(query());
    pager.apply(ok(request, numbered_rows(5)));
    assert!(!pager.columns().is_empty());

    let request = pager.reset(query());
    let applied = pager.apply(failed(request));
    assert!(matches!(
        applied,
        Applied::Failed {
            kind: ChunkKind::Reset,
            ..
        }
    ));
    assert!(pager.rows().is_empty());
    assert!(!pager.has_more());
    assert!(pager.columns().is_empty());
    assert_eq!(pager.reported_total(), 0);
}

#[tokio::test]
async fn test_buffer_length_after_appends() {
    // 4 full chunks of 5 then a final chunk of 2
    let source = MemorySource::with_rows(numbered_rows(22));
    let mut pager = loaded(&source, 5, 5).await;

    let mut appends = 0;
    while pager.has_more() {
        let page = pager.rows().len() / 5 + 1;
        let (_, fetch) = pager.request_page(page, 5);
        let request = fetch.expect("append expected while more rows exist");
        assert_eq!(request.window.offset % 5, 0);
        let response = fetch_chunk(&source, request).await;
        pager.apply(response);
        appends += 1;
    }

    assert_eq!(appends, 4);
    assert_eq!(pager.rows().len(), 5 * 4 + 2);
    assert!(!pager.has_more());
    let ids: Vec<i64> = pager.rows().iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..22).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_exact_multiple_ends_with_empty_chunk() {
    let source = MemorySource::with_rows(numbered_rows(10));
    let mut pager = loaded(&source, 5, 5).await;

    let (_, fetch) = pager.request_page(1, 5);
    assert!(fetch.is_none());
    let (_, fetch) = pager.request_page(2, 5);
    let response = fetch_chunk(&source, fetch.unwrap()).await;
    pager.apply(response);
    assert_eq!(pager.rows().len(), 10);
    assert!(pager.has_more());

    let (rows, fetch) = pager.request_page(3, 5);
    assert!(rows.is_empty());
    let response = fetch_chunk(&source, fetch.unwrap()).await;
    assert_eq!(
        pager.apply(response),
        Applied::Loaded {
            kind: ChunkKind::Append,
            rows: 0
        }
    );
    assert_eq!(pager.rows().len(), 10);
    assert!(!pager.has_more());
    assert_eq!(pager.reported_total(), 10);
}

#[tokio::test]
async fn test_no_fetch_when_page_is_buffered() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 10, 20).await;

    for (page, size) in [(1, 10), (2, 10), (1, 20), (4, 5), (20, 1)] {
        let (rows, fetch) = pager.request_page(page, size);
        assert_eq!(rows.len(), size);
        assert!(fetch.is_none(), "page {page} size {size} is buffered");
    }
    assert_eq!(source.row_requests().len(), 1);
}

#[tokio::test]
async fn test_one_append_per_boundary_under_reentry() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 10, 20).await;

    let (rows, first) = pager.request_page(3, 10);
    assert!(rows.is_empty());
    let first = first.expect("append for rows 20..30");
    assert!(pager.is_appending());

    for page in [3, 4, 3, 5] {
        let (_, again) = pager.request_page(page, 10);
        assert!(again.is_none());
    }

    let response = fetch_chunk(&source, first).await;
    pager.apply(response);
    assert!(!pager.is_appending());
    assert_eq!(pager.rows().len(), 40);
    assert_eq!(source.row_requests().len(), 2);
}

#[tokio::test]
async fn test_slice_is_short_while_append_pending() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 15, 20).await;

    let (rows, fetch) = pager.request_page(2, 15);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].id, 15);
    let response = fetch_chunk(&source, fetch.unwrap()).await;
    pager.apply(response);
    assert_eq!(pager.page_rows().len(), 15);
}

#[tokio::test]
async fn test_no_append_mid_chunk() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 10, 20).await;

    // A short append leaves the buffer mid-chunk and ends the source
    let (_, fetch) = pager.request_page(3, 10);
    pager.apply(ok(fetch.unwrap(), numbered_rows(7)));
    assert_eq!(pager.rows().len(), 27);
    assert!(!pager.has_more());

    let (_, fetch) = pager.request_page(4, 10);
    assert!(fetch.is_none());
}

#[tokio::test]
async fn test_append_failure_keeps_buffer_and_allows_retry() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 10, 20).await;

    let (_, fetch) = pager.request_page(3, 10);
    let applied = pager.apply(failed(fetch.unwrap()));
    assert!(matches!(
        applied,
        Applied::Failed {
            kind: ChunkKind::Append,
            ..
        }
    ));
    assert_eq!(pager.rows().len(), 20);
    assert!(pager.has_more());

    let (_, retry) = pager.request_page(3, 10);
    assert_eq!(retry.map(|r| r.window.offset), Some(20));
}

#[tokio::test]
async fn test_stale_reset_is_discarded() {
    let source = MemorySource::with_rows(numbered_rows(30));
    let mut pager = ChunkPager::with_chunk_size(10, 20);

    let old = pager.reset(query().with_dimension(Dimension::Domain));
    let new = pager.reset(query().with_metric(Metric::Payout));

    let new_response = fetch_chunk(&source, new).await;
    let old_response = fetch_chunk(&source, old).await;

    assert!(matches!(pager.apply(new_response), Applied::Loaded { .. }));
    assert_eq!(pager.apply(old_response), Applied::Stale);

    assert_eq!(pager.rows().len(), 20);
    assert_eq!(pager.query().metrics, vec![Metric::Payout]);
    assert_eq!(
        pager.columns().iter().map(|c| c.key).collect::<Vec<_>>(),
        vec![ColumnKey::Serial, ColumnKey::Metric(Metric::Payout)]
    );
}

#[tokio::test]
async fn test_append_from_previous_query_is_discarded() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = loaded(&source, 10, 20).await;

    let (_, fetch) = pager.request_page(3, 10);
    let append = fetch.unwrap();

    let reset = pager.reset(query());
    assert!(!pager.is_appending());
    assert_eq!(pager.apply(ok(append, numbered_rows(20))), Applied::Stale);
    assert!(pager.rows().is_empty());

    let response = fetch_chunk(&source, reset).await;
    pager.apply(response);
    assert_eq!(pager.rows().len(), 20);
}

#[tokio::test]
async fn test_columns_kept_across_appends() {
    let source = MemorySource::with_rows(numbered_rows(50));
    let mut pager = ChunkPager::with_chunk_size(10, 20);
    let request = pager.reset(query().with_dimension(Dimension::AppName));
    let response = fetch_chunk(&source, request).await;
    pager.apply(response);
    let before = pager.columns().to_vec();

    let (_, fetch) = pager.request_page(3, 10);
    let response = fetch_chunk(&source, fetch.unwrap()).await;
    pager.apply(response);
    assert_eq!(pager.columns(), before.as_slice());
}

#[test]
fn test_page_arguments_are_clamped() {
    let mut pager = ChunkPager::new(0);
    assert_eq!(pager.page_size(), 1);

    let (rows, fetch) = pager.request_page(0, 0);
    assert!(rows.is_empty());
    assert!(fetch.is_none());
    assert_eq!(pager.current_page(), 1);
    assert_eq!(pager.page_size(), 1);
}

#[tokio::test]
async fn test_page_past_chunk_boundary_fetches_exactly_once() {
    let source = MemorySource::with_rows(numbered_rows(25_001));
    let mut pager = ChunkPager::new(20);
    let request = pager.reset(ReportQuery::new(DateRange::parse("7d").unwrap()));
    let response = fetch_chunk(&source, request).await;
    pager.apply(response);

    assert_eq!(pager.rows().len(), CHUNK_SIZE);
    assert!(pager.has_more());
    assert_eq!(pager.reported_total(), 20_001);

    let (rows, fetch) = pager.request_page(1001, 20);
    assert!(rows.is_empty());
    let fetch = fetch.expect("append at the chunk boundary");
    assert_eq!(fetch.kind, ChunkKind::Append);
    assert_eq!(fetch.body.offset, Some(20_000));
    assert_eq!(fetch.body.limit, Some(20_000));
    assert!(pager.request_page(1001, 20).1.is_none());

    let response = fetch_chunk(&source, fetch).await;
    pager.apply(response);
    assert_eq!(source.row_requests().len(), 2);
    assert_eq!(pager.rows().len(), 25_001);
    assert!(!pager.has_more());
    assert_eq!(pager.page_rows()[0].id, 20_000);
}
