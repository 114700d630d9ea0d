//! Dashboard command - the interactive terminal dashboard

use std::path::PathBuf;

use adboard_config::Config;
use adboard_dashboard::import::{ImportTracker, TrackerSettings, UploadFile};
use adboard_report::daterange::today;
use anyhow::Result;
use clap::Args;

use super::{QueryArgs, connect};
use crate::tui::{App, AppOptions};

/// Dashboard command arguments
#[derive(Args, Debug, Default)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Directory CSV exports are written to
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Upload this CSV file and show the import job alongside the report
    #[arg(long)]
    pub import: Option<PathBuf>,
}

/// Run the interactive dashboard.
pub async fn run(args: DashboardArgs, config: &Config) -> Result<()> {
    let query = args.query.to_query(today())?;
    let source = connect(config)?;

    // Validate before the screen is taken over so errors stay readable
    let upload = match &args.import {
        Some(path) => Some(UploadFile::load(path, config.import.max_file_size).await?),
        None => None,
    };

    let options = AppOptions {
        page_size: args.page_size.unwrap_or(config.dashboard.page_size),
        debounce: config.dashboard.debounce,
        export_dir: args.out,
    };
    let mut app = App::new(source.clone(), query, options)?;

    if let Some(file) = upload {
        let settings = TrackerSettings {
            poll_interval: config.import.poll_interval,
            start_delay: config.import.start_delay,
        };
        let (tracker, events) = ImportTracker::new(source, settings);
        app.state_mut().start_import(tracker, events, file);
    }

    app.run().await
}
