//! Cell and summary value formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Compact number: `1.5K`, `2.3M`, `1.0B`
///
/// Counts get one decimal after scaling, floats two. Below 1000 counts print
/// as is and floats with two decimals.
pub fn format_number(value: f64, is_float: bool) -> String {
    let precision = if is_float { 2 } else { 1 };
    if value >= 1_000_000_000.0 {
        format!("{:.*}B", precision, value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.*}M", precision, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.*}K", precision, value / 1_000.0)
    } else if is_float {
        format!("{:.2}", value)
    } else {
        value.to_string()
    }
}

/// Render a backend date or timestamp as `YYYY-MM-DD`
///
/// Accepts plain dates, ISO timestamps with or without offset. Anything
/// unparsable is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return ts.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Metric value rendered as is (`1200`, `0.5`)
pub fn format_plain(value: f64) -> String {
    value.to_string()
}

/// Metric value with exactly two decimals
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}
