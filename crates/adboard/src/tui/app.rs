//! Main TUI application.
//!
//! Owns the terminal and runs the event loop around [`DashboardState`].

use std::io::{self, Stderr};
use std::panic::{set_hook, take_hook};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use adboard_remote::ReportSource;
use adboard_report::ReportQuery;
use anyhow::{Context, Result};
use crossterm::cursor;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::action::Action;
use super::event::{Event, EventHandler};
use super::state::DashboardState;
use super::ui;

/// Dashboard settings taken from config and flags
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub page_size: usize,
    pub debounce: Duration,
    pub export_dir: PathBuf,
}

pub struct App {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    events: EventHandler,
    action_rx: UnboundedReceiver<Action>,
    state: DashboardState,
}

impl App {
    /// Create a new App instance.
    pub fn new(
        source: Arc<dyn ReportSource>,
        query: ReportQuery,
        options: AppOptions,
    ) -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stderr()))
            .context("failed to create terminal")?;

        let events = EventHandler::new(Duration::from_millis(250));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let state = DashboardState::new(
            source,
            query,
            options.page_size,
            options.debounce,
            options.export_dir,
            action_tx,
        );

        Ok(Self {
            terminal,
            events,
            action_rx,
            state,
        })
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> Result<()> {
        self.enter()?;
        self.state.start();

        let result = self.event_loop().await;
        self.exit()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            tokio::select! {
                Some(event) = self.events.next() => match event {
                    Event::Key(key) => self.state.handle_key(key),
                    Event::Tick => self.state.handle_action(Action::Tick),
                    Event::Resize(_, _) => {}
                },
                Some(action) = self.action_rx.recv() => {
                    self.state.handle_action(action);
                }
            }

            if self.state.should_quit() {
                return Ok(());
            }
        }
    }

    /// Enter TUI mode.
    fn enter(&mut self) -> Result<()> {
        Self::init_panic_hook();
        enable_raw_mode().context("failed to enable raw mode")?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;
        self.terminal.clear().context("failed to clear terminal")?;
        Ok(())
    }

    /// Exit TUI mode.
    fn exit(&mut self) -> Result<()> {
        Self::restore_terminal().context("failed to restore terminal")
    }

    /// Set up panic hook to restore terminal on panic.
    fn init_panic_hook() {
        let original_hook = take_hook();
        set_hook(Box::new(move |panic_info| {
            let _ = Self::restore_terminal();
            original_hook(panic_info);
        }));
    }

    fn restore_terminal() -> Result<()> {
        if crossterm::terminal::is_raw_mode_enabled()? {
            disable_raw_mode()?;
            crossterm::execute!(io::stderr(), LeaveAlternateScreen, cursor::Show)?;
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal
            .draw(|frame| ui::render(frame, state))
            .context("failed to draw")?;
        Ok(())
    }
}
