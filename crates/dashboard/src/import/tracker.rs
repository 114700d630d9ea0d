//! Bulk import job tracker
//!
//! `Idle -> Uploading -> Polling -> Completed | Failed`
//!
//! A submit uploads the file and pulls the job id out of the confirmation
//! text. After a short start delay the job is polled at a fixed interval
//! until it reports `Completed` or a poll fails. Only one poll task exists
//! at a time: starting always stops the previous one first, stopping is
//! idempotent, and dropping the last tracker handle stops it too.
//!
//! Closing the host view stops polling but keeps the job and its progress
//! unless the job finished, so a reopened view can [`resume`] it.
//!
//! [`resume`]: ImportTracker::resume

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::Duration;

use regex::Regex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use adboard_remote::ReportSource;
use adboard_report::ImportProgress;

use crate::error::{DashboardError, Result};
use crate::import::validate::UploadFile;

/// Default delay between upload and first poll
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(1);

/// Default poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Notification raised when a poll fails
pub const POLL_FAILED_MESSAGE: &str = "Failed to track progress. Import may still be running.";

static JOB_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"job ID: (\d+)").ok());

/// Pull the job id out of an upload confirmation
///
/// `"CSV import started successfully with job ID: 4821"` yields `4821`.
pub fn extract_job_id(reply: &str) -> Option<String> {
    JOB_ID
        .as_ref()?
        .captures(reply)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Idle,
    Uploading,
    Polling,
    Completed,
    Failed,
}

/// Published by the tracker as the job advances
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    /// Upload accepted, polling will start after the delay
    Started { job_id: String },
    Progress(ImportProgress),
    /// Sent exactly once per job
    Completed(ImportProgress),
    /// Upload or poll failed; the text is user facing
    Failed(String),
}

/// Timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub poll_interval: Duration,
    pub start_delay: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_delay: DEFAULT_START_DELAY,
        }
    }
}

/// Point-in-time view of the tracker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSnapshot {
    pub state: ImportState,
    pub job_id: Option<String>,
    pub progress: Option<ImportProgress>,
}

/// Cancels its poll task when dropped
#[derive(Debug)]
struct PollGuard {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollGuard {
    fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Inner {
    source: Arc<dyn ReportSource>,
    settings: TrackerSettings,
    /// Shared with the poll task
    status: Arc<Mutex<ImportSnapshot>>,
    poll: Mutex<Option<PollGuard>>,
    events: mpsc::UnboundedSender<ImportEvent>,
}

/// Drives one import job at a time
///
/// Cheap to clone; clones share the job.
#[derive(Clone)]
pub struct ImportTracker {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ImportTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportTracker")
            .field("source", &self.inner.source.name())
            .field("settings", &self.inner.settings)
            .field("status", &self.snapshot())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ImportTracker {
    /// Create a tracker and the receiver its events are published on
    pub fn new(
        source: Arc<dyn ReportSource>,
        settings: TrackerSettings,
    ) -> (Self, mpsc::UnboundedReceiver<ImportEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            source,
            settings,
            status: Arc::new(Mutex::new(ImportSnapshot::default())),
            poll: Mutex::new(None),
            events,
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            rx,
        )
    }

    pub fn snapshot(&self) -> ImportSnapshot {
        lock(&self.inner.status).clone()
    }

    pub fn state(&self) -> ImportState {
        lock(&self.inner.status).state
    }

    /// Upload `file` and start tracking the job it creates
    ///
    /// With no file the tracker stays `Idle`. Returns the job id.
    pub async fn submit(&self, file: Option<UploadFile>) -> Result<String> {
        let Some(file) = file else {
            return Err(DashboardError::NoFileSelected);
        };

        self.stop_polling();
        {
            let mut status = lock(&self.inner.status);
            *status = ImportSnapshot {
                state: ImportState::Uploading,
                job_id: None,
                progress: None,
            };
        }

        let name = file.name().to_string();
        info!(file = %name, size = file.size(), "uploading import file");
        let reply = match self.inner.source.upload_file(&name, file.into_contents()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "upload failed");
                let text = match &e {
                    adboard_remote::RemoteError::Server {
                        message: Some(m), ..
                    } => m.clone(),
                    _ => "File upload failed. Please try again.".to_string(),
                };
                self.fail(text);
                return Err(e.into());
            }
        };

        let Some(job_id) = extract_job_id(&reply) else {
            warn!(reply = %reply, "no job id in upload reply");
            let err = DashboardError::MissingJobId(reply);
            self.fail(err.to_string());
            return Err(err);
        };

        info!(job_id = %job_id, "import job started");
        lock(&self.inner.status).job_id = Some(job_id.clone());
        let _ = self.inner.events.send(ImportEvent::Started {
            job_id: job_id.clone(),
        });
        self.start_polling(job_id.clone(), self.inner.settings.start_delay);
        Ok(job_id)
    }

    /// Restart polling a job left running by [`close`](Self::close)
    ///
    /// Returns whether polling was restarted.
    pub fn resume(&self) -> bool {
        let (state, job_id) = {
            let status = lock(&self.inner.status);
            (status.state, status.job_id.clone())
        };
        if self.is_polling() {
            return false;
        }
        match (state, job_id) {
            (ImportState::Uploading | ImportState::Polling, Some(job_id)) => {
                debug!(job_id = %job_id, "resuming import polling");
                self.start_polling(job_id, Duration::ZERO);
                true
            }
            _ => false,
        }
    }

    /// Close the host view
    ///
    /// Polling stops. Job and progress are kept while the job is still
    /// running, and cleared once it completed or never got going.
    pub fn close(&self) {
        self.stop_polling();

        let mut status = lock(&self.inner.status);
        let in_flight = matches!(status.state, ImportState::Uploading | ImportState::Polling)
            || status.progress.as_ref().is_some_and(|p| !p.is_completed());
        if !in_flight {
            *status = ImportSnapshot::default();
        }
    }

    /// Stop the poll task; returns whether one was running
    pub fn stop_polling(&self) -> bool {
        let guard = lock(&self.inner.poll).take();
        match guard {
            Some(guard) => {
                let was_active = guard.is_active();
                if was_active {
                    debug!("import polling stopped");
                }
                drop(guard);
                was_active
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.inner.poll).as_ref().is_some_and(PollGuard::is_active)
    }

    fn fail(&self, message: String) {
        lock(&self.inner.status).state = ImportState::Failed;
        let _ = self.inner.events.send(ImportEvent::Failed(message));
    }

    fn start_polling(&self, job_id: String, delay: Duration) {
        self.stop_polling();

        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_job(
            self.inner.source.clone(),
            self.inner.status.clone(),
            self.inner.events.clone(),
            job_id,
            delay,
            self.inner.settings.poll_interval,
            cancel.clone(),
        ));
        *lock(&self.inner.poll) = Some(PollGuard { cancel, task });
    }
}

async fn poll_job(
    source: Arc<dyn ReportSource>,
    status: Arc<Mutex<ImportSnapshot>>,
    events: mpsc::UnboundedSender<ImportEvent>,
    job_id: String,
    delay: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }
    lock(&status).state = ImportState::Polling;
    debug!(job_id = %job_id, interval_ms = every.as_millis() as u64, "import polling started");

    let mut interval = tokio::time::interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = source.fetch_job_progress(&job_id) => result,
        };

        match result {
            Ok(progress) => {
                let completed = progress.is_completed();
                {
                    let mut status = lock(&status);
                    status.progress = Some(progress.clone());
                    if completed {
                        status.state = ImportState::Completed;
                    }
                }
                if completed {
                    info!(job_id = %job_id, saved = progress.saved_records, "import completed");
                    let _ = events.send(ImportEvent::Completed(progress));
                    return;
                }
                let _ = events.send(ImportEvent::Progress(progress));
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "progress poll failed");
                lock(&status).state = ImportState::Failed;
                let _ = events.send(ImportEvent::Failed(POLL_FAILED_MESSAGE.to_string()));
                return;
            }
        }
    }
}
