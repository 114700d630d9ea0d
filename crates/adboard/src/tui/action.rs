//! Actions for TUI state management.
//!
//! Background fetches, the debouncer and the import tracker report back to
//! the event loop through these messages.

use adboard_dashboard::ChunkResponse;
use adboard_dashboard::import::ImportEvent;
use adboard_remote::RemoteError;
use adboard_report::{AggregateTotals, FilterOptions};

/// Actions that can be dispatched in the TUI.
#[derive(Debug)]
pub enum Action {
    /// Periodic update (notice expiry, import progress redraw)
    Tick,

    /// Run the current query from chunk zero
    Submit,
    /// A row chunk fetch finished
    Chunk(ChunkResponse),
    /// Summary totals fetched for the query of `generation`
    Summary {
        generation: u64,
        result: Result<AggregateTotals, RemoteError>,
    },
    /// Filter options fetched for the date range of request `generation`
    FilterOptions {
        generation: u64,
        result: Result<FilterOptions, RemoteError>,
    },

    /// Import job progress
    Import(ImportEvent),
}
