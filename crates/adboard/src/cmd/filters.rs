//! Filters command - the categorical values seen in a date window

use adboard_config::Config;
use adboard_report::daterange::today;
use adboard_report::{DateRange, FilterField, FilterOptions};
use anyhow::Result;
use clap::Args;

use super::{QueryArgs, connect};

/// Filters command arguments
#[derive(Args, Debug)]
pub struct FiltersArgs {
    /// Date range (e.g., 7d, 2024-01-01,2024-01-31)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub range: Option<String>,

    /// First day (YYYY-MM-DD), used with --to
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD), used with --from
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

impl FiltersArgs {
    fn date_range(&self) -> Result<DateRange> {
        let query = QueryArgs {
            range: self.range.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            ..Default::default()
        };
        Ok(query.to_query(today())?.date_range)
    }
}

/// Run the filters command
pub async fn run(args: FiltersArgs, config: &Config) -> Result<()> {
    let range = args.date_range()?;
    let options = connect(config)?
        .fetch_filter_options(&range)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("filter options")))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&options)?),
        _ => print!("{}", render_options(&options)),
    }
    Ok(())
}

fn render_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    for field in FilterField::ALL {
        let values = options.get(field);
        out.push_str(&format!("{} ({})\n", field.label(), values.len()));
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_field() {
        let mut options = FilterOptions::default();
        options.set(FilterField::Domains, vec!["a.com".into(), "b.com".into()]);
        let text = render_options(&options);
        assert!(text.contains("Domain (2)\n  a.com\n  b.com\n"));
        assert!(text.contains("OS Version (0)\n"));
        assert_eq!(text.lines().filter(|l| !l.starts_with(' ')).count(), 7);
    }
}
