//! Dashboard state and its reactions to keys and actions.
//!
//! Kept apart from the terminal so it can be driven in tests. Fetches run as
//! spawned tasks and come back as [`Action`]s; row chunks pass through the
//! pager's generation check, so a response for a superseded query is dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use adboard_dashboard::export::write_export;
use adboard_dashboard::import::{ImportEvent, ImportSnapshot, ImportTracker, UploadFile};
use adboard_dashboard::{
    Applied, ChunkKind, ChunkPager, ChunkRequest, DashboardError, Debouncer, SummaryMetrics,
    fetch_chunk,
};
use adboard_remote::ReportSource;
use adboard_report::daterange::today;
use adboard_report::{DateRange, FilterField, FilterOptions, ReportQuery};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::action::Action;
use super::picker::{Picker, PickerKind};

/// Page sizes offered by `+` / `-`
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [10, 20, 50, 100, 200, 500];

/// Trailing windows cycled by `t`, in days
pub const RANGE_PRESETS: [i64; 4] = [7, 14, 30, 90];

/// How long a notice stays on the status line
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// A transient status line message
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// Import job observed by the dashboard
#[derive(Debug)]
pub struct ImportPanel {
    tracker: ImportTracker,
    pub open: bool,
}

impl ImportPanel {
    pub fn snapshot(&self) -> ImportSnapshot {
        self.tracker.snapshot()
    }
}

pub struct DashboardState {
    source: Arc<dyn ReportSource>,
    query: ReportQuery,
    pager: ChunkPager,
    default_page_size: usize,
    summary: SummaryMetrics,
    filter_options: FilterOptions,
    /// Bumped per filter options request; older replies are dropped
    options_generation: u64,
    picker: Option<Picker>,
    notice: Option<Notice>,
    import: Option<ImportPanel>,
    debouncer: Debouncer<Action>,
    action_tx: UnboundedSender<Action>,
    export_dir: PathBuf,
    should_quit: bool,
}

impl DashboardState {
    pub fn new(
        source: Arc<dyn ReportSource>,
        query: ReportQuery,
        page_size: usize,
        debounce: Duration,
        export_dir: PathBuf,
        action_tx: UnboundedSender<Action>,
    ) -> Self {
        Self {
            source,
            query,
            pager: ChunkPager::new(page_size),
            default_page_size: page_size.max(1),
            summary: SummaryMetrics::default(),
            filter_options: FilterOptions::default(),
            options_generation: 0,
            picker: None,
            notice: None,
            import: None,
            debouncer: Debouncer::new(debounce, action_tx.clone()),
            action_tx,
            export_dir,
            should_quit: false,
        }
    }

    pub fn query(&self) -> &ReportQuery {
        &self.query
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

    pub fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn import(&self) -> Option<&ImportPanel> {
        self.import.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Initial load: filter options now, rows and summary after the quiet
    /// period
    pub fn start(&mut self) {
        self.load_filter_options();
        self.debouncer.trigger(Action::Submit);
    }

    /// Upload `file` and observe the job it creates
    ///
    /// A finished job re-runs the current query.
    pub fn start_import(
        &mut self,
        tracker: ImportTracker,
        mut events: UnboundedReceiver<ImportEvent>,
        file: UploadFile,
    ) {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if tx.send(Action::Import(event)).is_err() {
                    break;
                }
            }
        });

        let uploader = tracker.clone();
        tokio::spawn(async move {
            // Failures reach the dashboard as ImportEvent::Failed
            if let Err(e) = uploader.submit(Some(file)).await {
                debug!(error = %e, "import submit failed");
            }
        });

        self.import = Some(ImportPanel {
            tracker,
            open: true,
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.picker.is_some() {
            self.picker_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => self.next_page(),
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => self.prev_page(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_page_size(true),
            KeyCode::Char('-') => self.step_page_size(false),
            KeyCode::Char('r') => self.debouncer.trigger(Action::Submit),
            KeyCode::Char('R') => self.reset_filters(),
            KeyCode::Char('t') => self.cycle_range(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('i') => self.toggle_import(),
            KeyCode::Char('d') => self.picker = Some(Picker::new(PickerKind::Dimensions)),
            KeyCode::Char('m') => self.picker = Some(Picker::new(PickerKind::Metrics)),
            KeyCode::Char('f') => {
                self.picker = Some(Picker::new(PickerKind::Filter(FilterField::ALL[0])));
            }
            _ => {}
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Tick => self.expire_notice(Instant::now()),
            Action::Submit => self.submit_now(),
            Action::Chunk(response) => match self.pager.apply(response) {
                Applied::Loaded {
                    kind: ChunkKind::Reset,
                    rows,
                } => debug!(rows, "report loaded"),
                Applied::Loaded { .. } | Applied::Stale => {}
                Applied::Failed { error, .. } => {
                    self.notify_error(error.user_message("report data"));
                }
            },
            Action::Summary { generation, result } => {
                if generation != self.pager.generation() {
                    debug!(generation, "stale summary dropped");
                    return;
                }
                match result {
                    Ok(totals) => self.summary = totals.into(),
                    Err(e) => {
                        self.summary = SummaryMetrics::default();
                        self.notify_error(e.user_message("summary metrics"));
                    }
                }
            }
            Action::FilterOptions { generation, result } => {
                if generation != self.options_generation {
                    debug!(generation, "stale filter options dropped");
                    return;
                }
                match result {
                    Ok(options) => self.filter_options = options,
                    Err(e) => self.notify_error(e.user_message("filter options")),
                }
            }
            Action::Import(event) => self.on_import(event),
        }
    }

    /// Reset the pager to the current query and fetch chunk zero and totals
    fn submit_now(&mut self) {
        self.debouncer.cancel();
        let request = self.pager.reset(self.query.clone());
        let generation = request.generation;
        self.spawn_chunk(request);

        let source = self.source.clone();
        let body = self.query.aggregate_body();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_aggregate(&body).await;
            let _ = tx.send(Action::Summary { generation, result });
        });
    }

    fn spawn_chunk(&self, request: ChunkRequest) {
        let source = self.source.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let response = fetch_chunk(source.as_ref(), request).await;
            let _ = tx.send(Action::Chunk(response));
        });
    }

    fn load_filter_options(&mut self) {
        let range = self.query.date_range;
        if !range.is_complete() {
            return;
        }
        self.options_generation += 1;
        let generation = self.options_generation;
        let source = self.source.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_filter_options(&range).await;
            let _ = tx.send(Action::FilterOptions { generation, result });
        });
    }

    /// Keys while the query builder is open
    fn picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let changed = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('d') | KeyCode::Char('m')
            | KeyCode::Char('f') => {
                self.picker = None;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                picker.up();
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = picker.items(&self.query, &self.filter_options).len();
                picker.down(len);
                false
            }
            KeyCode::Tab | KeyCode::Right => {
                picker.cycle_field(true);
                false
            }
            KeyCode::BackTab | KeyCode::Left => {
                picker.cycle_field(false);
                false
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                picker.toggle(&mut self.query, &self.filter_options)
            }
            KeyCode::Char('c') => picker.clear(&mut self.query),
            _ => false,
        };
        if changed {
            self.debouncer.trigger(Action::Submit);
        }
    }

    fn goto_page(&mut self, page: usize, size: usize) {
        let (_, fetch) = self.pager.request_page(page, size);
        if let Some(request) = fetch {
            self.spawn_chunk(request);
        }
    }

    fn next_page(&mut self) {
        let page = self.pager.current_page();
        if page < self.pager.page_count() {
            self.goto_page(page + 1, self.pager.page_size());
        }
    }

    fn prev_page(&mut self) {
        let page = self.pager.current_page();
        if page > 1 {
            self.goto_page(page - 1, self.pager.page_size());
        }
    }

    /// Next larger or smaller offered size, keeping the top row on screen
    fn step_page_size(&mut self, larger: bool) {
        let size = self.pager.page_size();
        let next = if larger {
            PAGE_SIZE_OPTIONS.iter().copied().find(|&s| s > size)
        } else {
            PAGE_SIZE_OPTIONS.iter().rev().copied().find(|&s| s < size)
        };
        let Some(next) = next else {
            return;
        };
        let first_row = (self.pager.current_page() - 1) * size;
        self.goto_page(first_row / next + 1, next);
    }

    /// Cycle the trailing window and refresh options and rows
    fn cycle_range(&mut self) {
        let current = self.query.date_range.days().map(|d| d - 1);
        let days = RANGE_PRESETS
            .iter()
            .copied()
            .find(|&d| current.is_some_and(|c| d > c))
            .unwrap_or(RANGE_PRESETS[0]);
        let today = today();
        self.set_date_range(DateRange {
            start: Some(today - chrono::Duration::days(days)),
            end: Some(today),
        });
    }

    /// Cleared ranges fall back to the trailing week; options follow
    /// complete ranges only
    pub fn set_date_range(&mut self, range: DateRange) {
        self.query.date_range = range.or_trailing_week(today());
        self.load_filter_options();
        self.debouncer.trigger(Action::Submit);
    }

    /// Default query, page 1 and default size; nothing is fetched
    fn reset_filters(&mut self) {
        self.debouncer.cancel();
        self.picker = None;
        self.query = ReportQuery::default_for(today());
        self.pager.rewind(self.default_page_size);
        self.notify("Filters reset");
    }

    fn export(&mut self) {
        if self.pager.rows().is_empty() {
            self.notify_error(DashboardError::NoData.to_string());
            return;
        }
        let now = Local::now().naive_local();
        match write_export(&self.export_dir, self.pager.columns(), self.pager.rows(), now) {
            Ok(path) => self.notify(format!(
                "Exported {} rows to {}",
                self.pager.rows().len(),
                path.display()
            )),
            Err(e) => self.notify_error(format!("Export failed: {}", e)),
        }
    }

    /// Close the import panel, or reopen it and resume polling
    fn toggle_import(&mut self) {
        let Some(panel) = self.import.as_mut() else {
            return;
        };
        if panel.open {
            panel.tracker.close();
            panel.open = false;
        } else {
            panel.tracker.resume();
            panel.open = true;
        }
    }

    fn on_import(&mut self, event: ImportEvent) {
        match event {
            ImportEvent::Started { job_id } => {
                self.notify(format!("Import started, job ID: {}", job_id));
            }
            ImportEvent::Progress(_) => {}
            ImportEvent::Completed(progress) => {
                self.notify(format!(
                    "Import completed: {} records saved",
                    progress.saved_records
                ));
                self.debouncer.trigger(Action::Submit);
            }
            ImportEvent::Failed(message) => self.notify_error(message),
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    fn expire_notice(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }
}
