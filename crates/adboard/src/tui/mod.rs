//! Interactive terminal dashboard.
//!
//! Summary cards, the query line, the report table for the current page, an
//! optional import panel and a status line. `d`, `m` and `f` open the query
//! builder over the table. Fetches run in the background and report back as
//! actions.

mod action;
mod app;
mod event;
mod picker;
mod state;
mod ui;


pub use app::{App, AppOptions};
