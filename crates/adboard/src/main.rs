//! adboard - advertising report dashboard client
//!
//! # Usage
//!
//! ```bash
//! # Interactive dashboard (default)
//! adboard
//! adboard dashboard --range 30d -d mobile_app_name -m payout
//!
//! # One-shot commands
//! adboard report --range 2024-01-01,2024-01-31 -d domain -m clicks --page 2
//! adboard summary --range 7d
//! adboard filters --from 2024-01-01 --to 2024-01-31
//! adboard export --all --out reports/
//! adboard import data.csv
//! ```

mod cmd;
mod tui;

use std::path::{Path, PathBuf};

use adboard_config::{Config, LogFormat};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// adboard - advertising report dashboard client
#[derive(Parser, Debug)]
#[command(name = "adboard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Report backend base URL. Overrides config file and ADBOARD_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of report rows
    Report(cmd::report::ReportArgs),

    /// Print the summary totals
    Summary(cmd::summary::SummaryArgs),

    /// List the filter values available in a date window
    Filters(cmd::filters::FiltersArgs),

    /// Write the loaded report rows to a CSV file
    Export(cmd::export::ExportArgs),

    /// Upload a CSV file and follow the import job
    Import(cmd::import::ImportArgs),

    /// Interactive terminal dashboard
    #[command(alias = "i")]
    Dashboard(cmd::dashboard::DashboardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.api_url)?;

    match cli.command {
        Some(Command::Report(args)) => {
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::report::run(args, &config).await
        }
        Some(Command::Summary(args)) => {
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::summary::run(args, &config).await
        }
        Some(Command::Filters(args)) => {
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::filters::run(args, &config).await
        }
        Some(Command::Export(args)) => {
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::export::run(args, &config).await
        }
        Some(Command::Import(args)) => {
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::import::run(args, &config).await
        }
        // Dashboard doesn't log (uses alternate screen)
        Some(Command::Dashboard(args)) => cmd::dashboard::run(args, &config).await,
        None => cmd::dashboard::run(cmd::dashboard::DashboardArgs::default(), &config).await,
    }
}

/// Config file (or defaults), then the environment, then `--api-url`
fn load_config(path: Option<&Path>, api_url: Option<String>) -> Result<Config> {
    let mut config = Config::load(path).context("failed to load configuration")?;
    config
        .override_api_url(api_url)
        .context("invalid --api-url")?;
    Ok(config)
}

/// Initialize the tracing subscriber for logging
///
/// Level: `--log-level`, then `[log] level`, then info. Logs go to stderr
/// so command output on stdout stays clean.
fn init_logging(config: &Config, cli_level: Option<&str>) -> Result<()> {
    let level = config
        .log
        .effective_level(cli_level)
        .context("invalid --log-level")?;
    let filter = EnvFilter::try_new(level.filter_directive())
        .map_err(|e| anyhow::anyhow!("invalid log filter: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
