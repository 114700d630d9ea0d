//! Tests for date range parsing

use chrono::NaiveDate;

use crate::daterange::{DateRange, parse_date};
use crate::error::ReportError;

fn day(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

#[test]
fn test_trailing_week_spans_eight_calendar_days() {
    let range = DateRange::trailing_week(day("2024-03-10"));
    assert_eq!(range.start, Some(day("2024-03-03")));
    assert_eq!(range.end, Some(day("2024-03-10")));
    assert_eq!(range.days(), Some(8));
}

#[test]
fn test_parse_relative_days() {
    let today = day("2024-03-10");
    let range = DateRange::parse_relative_to("7d", today).unwrap();
    assert_eq!(range, DateRange::trailing_week(today));

    let range = DateRange::parse_relative_to("30d", today).unwrap();
    assert_eq!(range.start, Some(day("2024-02-09")));
}

#[test]
fn test_parse_relative_weeks() {
    let today = day("2024-03-10");
    let range = DateRange::parse_relative_to("2w", today).unwrap();
    assert_eq!(range.start, Some(day("2024-02-25")));
    assert_eq!(range.end, Some(today));
}

#[test]
fn test_parse_predefined() {
    let today = day("2024-03-10");
    let range = DateRange::parse_relative_to("today", today).unwrap();
    assert_eq!(range.days(), Some(1));

    let range = DateRange::parse_relative_to("Yesterday", today).unwrap();
    assert_eq!(range.start, Some(day("2024-03-09")));
    assert_eq!(range.end, Some(day("2024-03-09")));
}

#[test]
fn test_parse_custom() {
    let range = DateRange::parse("2024-01-01, 2024-01-31").unwrap();
    assert_eq!(range.start, Some(day("2024-01-01")));
    assert_eq!(range.end, Some(day("2024-01-31")));
    assert_eq!(range.days(), Some(31));
}

#[test]
fn test_parse_rejects_inverted_range() {
    assert!(DateRange::parse("2024-02-01,2024-01-01").is_err());
}

#[test]
fn test_parse_invalid() {
    assert!(DateRange::parse("").is_err());
    assert!(DateRange::parse("0d").is_err());
    assert!(DateRange::parse("7x").is_err());
    assert!(DateRange::parse("2024-13-01,2024-13-02").is_err());
}

#[test]
fn test_parse_relative_out_of_range() {
    let today = day("2024-03-10");
    for input in ["999999999999999d", "1000000000d", "99999999999999w"] {
        assert!(
            matches!(
                DateRange::parse_relative_to(input, today),
                Err(ReportError::InvalidDateRange(_))
            ),
            "{}",
            input
        );
    }

    let range = DateRange::parse_relative_to("1000000d", today).unwrap();
    assert_eq!(range.end, Some(today));
}

#[test]
fn test_cleared_range_falls_back_to_trailing_week() {
    let today = day("2024-03-10");
    let range = DateRange::cleared().or_trailing_week(today);
    assert_eq!(range, DateRange::trailing_week(today));
}

#[test]
fn test_half_set_range_is_kept() {
    let today = day("2024-03-10");
    let half = DateRange {
        start: Some(day("2024-01-01")),
        end: None,
    };
    assert_eq!(half.or_trailing_week(today), half);
    assert!(!half.is_complete());
    assert!(!half.is_cleared());
    assert_eq!(half.days(), None);
}
