//! Tests for the import job tracker

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use adboard_remote::RemoteError;
use adboard_remote::test_utils::MemorySource;
use adboard_report::ImportProgress;

use crate::error::DashboardError;
use crate::import::tracker::{
    ImportEvent, ImportState, ImportTracker, POLL_FAILED_MESSAGE, TrackerSettings, extract_job_id,
};
use crate::import::validate::{MAX_FILE_SIZE, UploadFile};

const HEADER: &str = "timestamp,mobile_app_resolved_id,mobile_app_name,domain,ad_unit_name,\
ad_unit_id,inventory_format_name,operating_system_version_name";

fn fast() -> TrackerSettings {
    TrackerSettings {
        poll_interval: Duration::from_millis(10),
        start_delay: Duration::from_millis(20),
    }
}

fn file() -> Option<UploadFile> {
    Some(UploadFile::new("report.csv", HEADER.as_bytes().to_vec(), MAX_FILE_SIZE).unwrap())
}

fn progress(phase: &str, pct: f64) -> ImportProgress {
    ImportProgress {
        total_records: 10,
        processed_records: (pct / 10.0) as u64,
        current_phase: phase.to_string(),
        progress_percentage: pct,
        ..Default::default()
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ImportEvent>) -> ImportEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for import event")
        .expect("event channel closed")
}

fn source_with_reply() -> Arc<MemorySource> {
    let source = Arc::new(MemorySource::default());
    source.set_upload_reply("CSV import started successfully with job ID: 4821");
    source
}

#[test]
fn test_extract_job_id() {
    assert_eq!(
        extract_job_id("CSV import started successfully with job ID: 4821"),
        Some("4821".to_string())
    );
    assert_eq!(extract_job_id("job ID: 7 queued"), Some("7".to_string()));
    assert_eq!(extract_job_id("job id: 7"), None);
    assert_eq!(extract_job_id("job ID: abc"), None);
}

#[tokio::test]
async fn test_submit_without_file_stays_idle() {
    let source = Arc::new(MemorySource::default());
    let (tracker, _rx) = ImportTracker::new(source.clone(), fast());

    let err = tracker.submit(None).await.unwrap_err();
    assert!(matches!(err, DashboardError::NoFileSelected));
    assert_eq!(tracker.state(), ImportState::Idle);
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_job_id_then_polling_after_delay() {
    let source = source_with_reply();
    source.push_progress(progress("Processing records...", 40.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    let job_id = tracker.submit(file()).await.unwrap();
    assert_eq!(job_id, "4821");
    assert_eq!(tracker.snapshot().job_id.as_deref(), Some("4821"));
    // Still inside the start delay
    assert_eq!(tracker.state(), ImportState::Uploading);
    assert_eq!(source.progress_calls(), 0);

    assert_eq!(
        next_event(&mut rx).await,
        ImportEvent::Started {
            job_id: "4821".into()
        }
    );
    let event = next_event(&mut rx).await;
    assert!(matches!(event, ImportEvent::Progress(ref p) if p.progress_percentage == 40.0));
    assert_eq!(tracker.state(), ImportState::Polling);
    assert!(tracker.is_polling());

    assert!(tracker.stop_polling());
}

#[tokio::test]
async fn test_completed_stops_polling_and_fires_once() {
    let source = source_with_reply();
    source.push_progress(progress("Saving to database...", 90.0));
    source.push_progress(progress("Completed", 100.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();

    let mut completed = 0;
    loop {
        match next_event(&mut rx).await {
            ImportEvent::Completed(p) => {
                assert_eq!(p.progress_percentage, 100.0);
                completed += 1;
                break;
            }
            ImportEvent::Failed(m) => panic!("unexpected failure: {m}"),
            _ => {}
        }
    }
    assert_eq!(completed, 1);
    assert_eq!(tracker.state(), ImportState::Completed);

    let polls = source.progress_calls();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(source.progress_calls(), polls);
    assert!(rx.try_recv().is_err());

    assert!(!tracker.is_polling());
    assert!(!tracker.stop_polling());
    assert!(!tracker.stop_polling());
}

#[tokio::test]
async fn test_upload_failure() {
    let source = source_with_reply();
    source.fail_next_upload(RemoteError::Server {
        status: 400,
        message: Some("Invalid CSV format".into()),
    });
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    let err = tracker.submit(file()).await.unwrap_err();
    assert!(matches!(err, DashboardError::Remote(_)));
    assert_eq!(tracker.state(), ImportState::Failed);
    assert_eq!(
        next_event(&mut rx).await,
        ImportEvent::Failed("Invalid CSV format".into())
    );
    assert!(!tracker.is_polling());
}

#[tokio::test]
async fn test_reply_without_job_id_never_polls() {
    let source = Arc::new(MemorySource::default());
    source.set_upload_reply("upload accepted");
    let (tracker, _rx) = ImportTracker::new(source.clone(), fast());

    let err = tracker.submit(file()).await.unwrap_err();
    assert!(matches!(err, DashboardError::MissingJobId(_)));
    assert_eq!(tracker.state(), ImportState::Failed);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(source.progress_calls(), 0);
}

#[tokio::test]
async fn test_poll_failure_is_terminal() {
    let source = source_with_reply();
    source.push_progress_failure(RemoteError::Transport("reset".into()));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Started { .. }));
    assert_eq!(
        next_event(&mut rx).await,
        ImportEvent::Failed(POLL_FAILED_MESSAGE.into())
    );
    assert_eq!(tracker.state(), ImportState::Failed);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(source.progress_calls(), 1);
}

#[tokio::test]
async fn test_close_keeps_running_job_and_resume_continues() {
    let source = source_with_reply();
    source.push_progress(progress("Processing records...", 50.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Started { .. }));
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Progress(_)));

    tracker.close();
    assert!(!tracker.is_polling());
    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.state, ImportState::Polling);
    assert_eq!(snapshot.job_id.as_deref(), Some("4821"));
    assert!(snapshot.progress.is_some());

    let polls = source.progress_calls();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.progress_calls(), polls);

    assert!(tracker.resume());
    assert!(!tracker.resume());
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Progress(_)));
    tracker.stop_polling();
}

#[tokio::test]
async fn test_close_after_completion_resets() {
    let source = source_with_reply();
    source.push_progress(progress("Completed", 100.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();
    while !matches!(next_event(&mut rx).await, ImportEvent::Completed(_)) {}

    tracker.close();
    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.state, ImportState::Idle);
    assert!(snapshot.job_id.is_none());
    assert!(snapshot.progress.is_none());
    assert!(!tracker.resume());
}

#[tokio::test]
async fn test_resubmit_replaces_poll_task() {
    let source = source_with_reply();
    source.push_progress(progress("Processing records...", 40.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Started { .. }));
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Progress(_)));

    tracker.submit(file()).await.unwrap();
    assert!(tracker.is_polling());
    tracker.stop_polling();
    assert!(!tracker.is_polling());
}

#[tokio::test]
async fn test_dropping_tracker_stops_polling() {
    let source = source_with_reply();
    source.push_progress(progress("Processing records...", 40.0));
    let (tracker, mut rx) = ImportTracker::new(source.clone(), fast());

    tracker.submit(file()).await.unwrap();
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Started { .. }));
    assert!(matches!(next_event(&mut rx).await, ImportEvent::Progress(_)));
    drop(tracker);

    tokio::time::sleep(Duration::from_millis(30)).await;
    let polls = source.progress_calls();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(source.progress_calls(), polls);
}
