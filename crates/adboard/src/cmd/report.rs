//! Report command - print one page of report rows
//!
//! # Usage
//!
//! ```bash
//! adboard report --range 7d
//! adboard report -d mobile_app_name -d date -m payout --page 3 --page-size 50
//! adboard report --domain example.com --format csv
//! ```

use adboard_config::Config;
use adboard_dashboard::export::to_csv;
use adboard_dashboard::{Column, Session};
use adboard_report::ReportRow;
use adboard_report::daterange::today;
use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{QueryArgs, connect, explain, print_table};

/// Report command arguments
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Page to print (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Run the report command
pub async fn run(args: ReportArgs, config: &Config) -> Result<()> {
    let query = args.query.to_query(today())?;
    let page_size = args.page_size.unwrap_or(config.dashboard.page_size);
    let mut session = Session::new(connect(config)?, query, page_size);

    session
        .submit()
        .await
        .map_err(|e| explain(e, "report data"))?;
    let rows = session
        .goto_page(args.page, page_size)
        .await
        .map_err(|e| explain(e, "report data"))?;
    debug!(page = args.page, rows = rows.len(), "page served");

    let pager = session.pager();
    output_rows(
        session.columns(),
        &rows,
        pager.current_page(),
        pager.page_size(),
        &args.format,
    )?;

    eprintln!(
        "\npage {} of {}{}  ({} rows loaded)",
        pager.current_page(),
        pager.page_count(),
        if pager.has_more() { "+" } else { "" },
        pager.rows().len()
    );
    Ok(())
}

fn output_rows(
    columns: &[Column],
    rows: &[ReportRow],
    page: usize,
    page_size: usize,
    format: &str,
) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        "csv" => {
            if rows.is_empty() {
                println!("(no data)");
            } else {
                println!("{}", to_csv(columns, rows)?);
            }
        }
        _ => {
            let (headers, cells) = table_cells(columns, rows, page, page_size);
            print_table(&headers, &cells);
        }
    }
    Ok(())
}

/// Header titles and rendered cells for a page
pub fn table_cells(
    columns: &[Column],
    rows: &[ReportRow],
    page: usize,
    page_size: usize,
) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = columns.iter().map(|c| c.title.clone()).collect();
    let cells = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            columns
                .iter()
                .map(|c| c.render(row, page, page_size, i))
                .collect()
        })
        .collect();
    (headers, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adboard_dashboard::project_columns;
    use adboard_report::{Dimension, Metric};

    #[test]
    fn test_table_cells_number_rows_by_page() {
        let columns = project_columns(&[Dimension::Domain], &[Metric::Payout]);
        let mut row = ReportRow::with_id(7);
        row.set_dimension(Dimension::Domain, "a.com");
        row.set_metric(Metric::Payout, 3.14159);

        let (headers, cells) = table_cells(&columns, &[row.clone(), row], 2, 10);
        assert_eq!(headers, vec!["S.No.", "Domain", "Payout"]);
        assert_eq!(cells[0], vec!["11", "a.com", "3.14"]);
        assert_eq!(cells[1][0], "12");
    }
}
