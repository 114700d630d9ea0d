//! Export command - write report rows to a CSV file
//!
//! # Usage
//!
//! ```bash
//! # First chunk (up to 20,000 rows) into the current directory
//! adboard export --range 30d -d domain -m clicks
//!
//! # Every row, into reports/
//! adboard export --all --out reports/
//! ```

use std::path::PathBuf;

use adboard_config::Config;
use adboard_dashboard::Session;
use adboard_report::daterange::today;
use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use super::{QueryArgs, connect, explain};

/// Export command arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Directory the CSV file is written to
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Load every chunk before exporting, not just the first
    #[arg(long)]
    pub all: bool,
}

/// Run the export command
pub async fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let query = args.query.to_query(today())?;
    let mut session = Session::new(connect(config)?, query, config.dashboard.page_size);

    session
        .submit()
        .await
        .map_err(|e| explain(e, "report data"))?;
    if args.all {
        session
            .load_all()
            .await
            .map_err(|e| explain(e, "report data"))?;
    } else if session.pager().has_more() {
        eprintln!("more rows are available; pass --all to export every chunk");
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let path = session
        .export(&args.out, Local::now().naive_local())
        .map_err(|e| explain(e, "report data"))?;

    println!(
        "exported {} rows to {}",
        session.pager().rows().len(),
        path.display()
    );
    Ok(())
}
