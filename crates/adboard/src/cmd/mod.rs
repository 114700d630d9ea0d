//! Command implementations for the adboard CLI

pub mod dashboard;
pub mod export;
pub mod filters;
pub mod import;
pub mod report;
pub mod summary;

use std::sync::Arc;

use adboard_config::Config;
use adboard_dashboard::DashboardError;
use adboard_remote::{HttpReportSource, ReportSource};
use adboard_report::daterange::parse_date;
use adboard_report::{DateRange, Dimension, FilterField, Metric, ReportQuery, SortOrder};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

/// Query flags shared by report, summary, export and dashboard
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Date range (e.g., 7d, 2w, today, yesterday, 2024-01-01,2024-01-31)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub range: Option<String>,

    /// First day (YYYY-MM-DD), used with --to
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD), used with --from
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Group-by dimension, key or label (repeatable)
    #[arg(short = 'd', long = "dimension")]
    pub dimensions: Vec<String>,

    /// Metric, key or label (repeatable)
    #[arg(short = 'm', long = "metric")]
    pub metrics: Vec<String>,

    /// Only these mobile app ids (repeatable)
    #[arg(long)]
    pub app_id: Vec<String>,

    /// Only these app names (repeatable)
    #[arg(long)]
    pub app_name: Vec<String>,

    /// Only these domains (repeatable)
    #[arg(long)]
    pub domain: Vec<String>,

    /// Only these ad unit names (repeatable)
    #[arg(long)]
    pub ad_unit_name: Vec<String>,

    /// Only these ad unit ids (repeatable)
    #[arg(long)]
    pub ad_unit_id: Vec<String>,

    /// Only these inventory formats (repeatable)
    #[arg(long)]
    pub inventory_format: Vec<String>,

    /// Only these OS versions (repeatable)
    #[arg(long)]
    pub os_version: Vec<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort column key, passed to the backend as is
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long, requires = "sort_by")]
    pub sort_order: Option<String>,
}

impl QueryArgs {
    /// Build the report query; no range flags means the trailing week
    pub fn to_query(&self, today: NaiveDate) -> Result<ReportQuery> {
        let mut query = ReportQuery::new(self.date_range(today)?);

        for d in &self.dimensions {
            query.add_dimension(Dimension::parse(d)?);
        }
        for m in &self.metrics {
            query.add_metric(Metric::parse(m)?);
        }

        for (field, values) in [
            (FilterField::AppIds, &self.app_id),
            (FilterField::AppNames, &self.app_name),
            (FilterField::Domains, &self.domain),
            (FilterField::AdUnitNames, &self.ad_unit_name),
            (FilterField::AdUnitIds, &self.ad_unit_id),
            (FilterField::InventoryFormats, &self.inventory_format),
            (FilterField::OsVersions, &self.os_version),
        ] {
            if !values.is_empty() {
                query.filters.set(field, values.clone());
            }
        }

        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }

        if let Some(by) = &self.sort_by {
            let order = match &self.sort_order {
                Some(order) => order.parse::<SortOrder>()?,
                None => SortOrder::default(),
            };
            query = query.with_sort(by.clone(), order);
        }

        Ok(query)
    }

    fn date_range(&self, today: NaiveDate) -> Result<DateRange> {
        if let Some(range) = &self.range {
            return Ok(DateRange::parse_relative_to(range, today)?);
        }
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Ok(DateRange::new(parse_date(from)?, parse_date(to)?)?),
            (None, None) => Ok(DateRange::trailing_week(today)),
            _ => bail!("--from and --to must be given together"),
        }
    }
}

/// HTTP report source for the configured backend
pub fn connect(config: &Config) -> Result<Arc<dyn ReportSource>> {
    let source = HttpReportSource::new(&config.api.url, config.api.timeout)
        .with_context(|| format!("failed to create client for {}", config.api.url))?;
    Ok(Arc::new(source))
}

/// Turn a dashboard error into the message shown to the user
///
/// Backend failures read as "Error fetching ..." or "Failed to fetch ...";
/// everything else keeps its own message.
pub fn explain(err: DashboardError, what: &str) -> anyhow::Error {
    match err {
        DashboardError::Remote(e) => anyhow::anyhow!(e.user_message(what)),
        other => other.into(),
    }
}

/// Print rows as an aligned text table
pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(no data)");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count()).min(40); // Cap at 40 chars
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| fit(c, widths.get(i).copied().unwrap_or(10)))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let rule = "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2);
    println!("{}", line(headers));
    println!("{}", rule);
    for row in rows {
        println!("{}", line(row));
    }
    println!("{}", rule);
}

/// Pad or truncate to exactly `width` characters
fn fit(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        format!("{:width$}", s, width = width)
    }
}
