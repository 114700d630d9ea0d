//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::mpsc;

/// TUI events.
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Event handler that polls for terminal events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let event = tokio::select! {
                    _ = tick_interval.tick() => Event::Tick,
                    maybe_event = poll_event() => {
                        match maybe_event {
                            Some(e) => e,
                            None => continue,
                        }
                    }
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Poll for a crossterm event (non-blocking).
async fn poll_event() -> Option<Event> {
    let result = tokio::task::spawn_blocking(|| {
        if event::poll(Duration::from_millis(10)).ok()? {
            event::read().ok()
        } else {
            None
        }
    })
    .await
    .ok()?;

    match result? {
        // Only key presses (not release on Windows)
        CrosstermEvent::Key(key) if key.kind == event::KeyEventKind::Press => {
            Some(Event::Key(key))
        }
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
