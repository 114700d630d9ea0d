//! Summary command - headline totals for a query

use adboard_config::Config;
use adboard_dashboard::{Session, SummaryMetrics};
use adboard_report::daterange::today;
use anyhow::Result;
use clap::Args;

use super::{QueryArgs, connect, explain};

/// Summary command arguments
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the summary command
pub async fn run(args: SummaryArgs, config: &Config) -> Result<()> {
    let query = args.query.to_query(today())?;
    let mut session = Session::new(connect(config)?, query, config.dashboard.page_size);

    let summary = session
        .refresh_summary()
        .await
        .map_err(|e| explain(e, "summary metrics"))?;

    match args.format.as_str() {
        "json" => println!("{}", summary_json(&summary)),
        _ => {
            for (label, value) in summary.cards() {
                println!("{:<16} {:>12}", label, value);
            }
        }
    }
    Ok(())
}

fn summary_json(summary: &SummaryMetrics) -> String {
    let value = serde_json::json!({
        "total_requests": summary.total_requests,
        "total_impressions": summary.total_impressions,
        "total_clicks": summary.total_clicks,
        "total_payout": summary.total_payout,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
