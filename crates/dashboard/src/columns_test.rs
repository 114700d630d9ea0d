//! Tests for column projection

use adboard_report::{Dimension, Metric, ReportRow};

use crate::columns::{ColumnKey, SERIAL_TITLE, project_columns, serial_number, title_for_key};

fn keys(dimensions: &[Dimension], metrics: &[Metric]) -> Vec<ColumnKey> {
    project_columns(dimensions, metrics)
        .into_iter()
        .map(|c| c.key)
        .collect()
}

#[test]
fn test_default_projection_is_everything_date_first() {
    let columns = project_columns(&[], &[]);
    assert_eq!(columns.len(), 1 + Dimension::ALL.len() + Metric::ALL.len());
    assert_eq!(columns[0].title, SERIAL_TITLE);
    assert_eq!(columns[1].key, ColumnKey::Dimension(Dimension::Date));
    assert_eq!(columns[2].key, ColumnKey::Dimension(Dimension::AppId));
    assert_eq!(
        columns.last().map(|c| c.key),
        Some(ColumnKey::Metric(Metric::Payout))
    );
}

#[test]
fn test_selection_order_with_date_forced_first() {
    assert_eq!(
        keys(
            &[Dimension::Domain, Dimension::AppName, Dimension::Date],
            &[Metric::Clicks, Metric::Impressions]
        ),
        vec![
            ColumnKey::Serial,
            ColumnKey::Dimension(Dimension::Date),
            ColumnKey::Dimension(Dimension::Domain),
            ColumnKey::Dimension(Dimension::AppName),
            ColumnKey::Metric(Metric::Clicks),
            ColumnKey::Metric(Metric::Impressions),
        ]
    );
}

#[test]
fn test_metrics_only() {
    assert_eq!(
        keys(&[], &[Metric::Payout]),
        vec![ColumnKey::Serial, ColumnKey::Metric(Metric::Payout)]
    );
}

#[test]
fn test_projection_is_pure() {
    let dims = [Dimension::OsVersion, Dimension::Date];
    let mets = [Metric::Ctr];
    assert_eq!(project_columns(&dims, &mets), project_columns(&dims, &mets));
}

#[test]
fn test_serial_number_offsets_by_page() {
    assert_eq!(serial_number(1, 100, 0), 1);
    assert_eq!(serial_number(3, 20, 4), 45);
    assert_eq!(serial_number(0, 20, 0), 1);
}

#[test]
fn test_render_cells() {
    let mut row = ReportRow::with_id(1);
    row.set_dimension(Dimension::Date, "2024-03-05T00:00:00");
    row.set_dimension(Dimension::AppName, "Weather");
    row.set_metric(Metric::Ecpm, 1.456);
    row.set_metric(Metric::MatchRate, 0.5);
    row.set_metric(Metric::Impressions, 1200.0);

    let columns = project_columns(
        &[Dimension::AppName, Dimension::Date, Dimension::Domain],
        &[Metric::Ecpm, Metric::MatchRate, Metric::Impressions, Metric::Clicks],
    );
    let cells: Vec<String> = columns.iter().map(|c| c.render(&row, 2, 10, 3)).collect();
    assert_eq!(
        cells,
        vec!["14", "2024-03-05", "Weather", "", "1.46", "0.50", "1200", ""]
    );
}

#[test]
fn test_title_for_key() {
    assert_eq!(title_for_key("mobile_app_name"), "App Name");
    assert_eq!(title_for_key("average_ecpm"), "eCPM");
    assert_eq!(title_for_key("adUnitName"), "Ad Unit Name");
}
