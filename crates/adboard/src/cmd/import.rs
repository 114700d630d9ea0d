//! Import command - upload a CSV file and follow the import job
//!
//! # Usage
//!
//! ```bash
//! adboard import reports.csv
//! adboard import reports.csv --no-wait
//! ```

use std::path::PathBuf;

use adboard_config::Config;
use adboard_dashboard::import::{
    ImportEvent, ImportTracker, StepStatus, TrackerSettings, UploadFile, phase_steps,
};
use adboard_report::ImportProgress;
use anyhow::{Result, bail};
use clap::Args;
use tracing::debug;

use super::connect;

/// Import command arguments
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file to upload
    pub file: PathBuf,

    /// Print the job id and exit without waiting for the job
    #[arg(long)]
    pub no_wait: bool,
}

/// Run the import command
pub async fn run(args: ImportArgs, config: &Config) -> Result<()> {
    let file = UploadFile::load(&args.file, config.import.max_file_size).await?;
    let settings = TrackerSettings {
        poll_interval: config.import.poll_interval,
        start_delay: config.import.start_delay,
    };
    let (tracker, mut events) = ImportTracker::new(connect(config)?, settings);

    let job_id = match tracker.submit(Some(file)).await {
        Ok(job_id) => job_id,
        Err(e) => {
            // The tracker publishes the user-facing reason
            if let Ok(ImportEvent::Failed(message)) = events.try_recv() {
                bail!(message);
            }
            return Err(e.into());
        }
    };
    println!("import started, job ID: {}", job_id);

    if args.no_wait {
        tracker.close();
        return Ok(());
    }

    let mut last_phase = String::new();
    while let Some(event) = events.recv().await {
        match event {
            ImportEvent::Started { .. } => {}
            ImportEvent::Progress(progress) => {
                if progress.current_phase != last_phase {
                    println!("{}", progress_line(&progress));
                    last_phase = progress.current_phase.clone();
                } else {
                    debug!(processed = progress.processed_records, "import progress");
                }
            }
            ImportEvent::Completed(progress) => {
                println!("{}", progress_line(&progress));
                print!("{}", ladder(&progress));
                println!(
                    "import completed: {} saved, {} errors",
                    progress.saved_records, progress.error_records
                );
                return Ok(());
            }
            ImportEvent::Failed(message) => bail!(message),
        }
    }

    bail!("import tracking stopped unexpectedly")
}

/// `[ 40%] Processing records... (1200/5000)`
fn progress_line(progress: &ImportProgress) -> String {
    format!(
        "[{:>3.0}%] {} ({}/{})",
        progress.progress_percentage,
        progress.current_phase,
        progress.processed_records,
        progress.total_records
    )
}

fn ladder(progress: &ImportProgress) -> String {
    phase_steps(progress)
        .into_iter()
        .map(|step| {
            let mark = match step.status {
                StepStatus::Done => "x",
                StepStatus::Current => ">",
                StepStatus::Pending => " ",
            };
            format!("  [{}] {}\n", mark, step.phase)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(phase: &str, pct: f64) -> ImportProgress {
        ImportProgress {
            total_records: 5000,
            processed_records: 1200,
            current_phase: phase.to_string(),
            progress_percentage: pct,
            ..Default::default()
        }
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(
            progress_line(&progress("Processing records...", 40.0)),
            "[ 40%] Processing records... (1200/5000)"
        );
    }

    #[test]
    fn test_ladder_marks() {
        let text = ladder(&progress("Processing records...", 40.0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "  [x] File uploaded, starting processing...");
        assert_eq!(lines[3], "  [>] Processing records...");
        assert_eq!(lines[5], "  [ ] Completed");
    }
}
