//! Report date ranges
//!
//! A report window is a pair of inclusive calendar dates. Either end may be
//! cleared while the user edits it; a window with both ends cleared falls
//! back to the trailing week `[today - 7 days, today]`.
//!
//! Supported text formats for [`DateRange::parse`]:
//! - Relative: `7d`, `30d`, `2w` (ending today)
//! - Predefined: `today`, `yesterday`
//! - Custom: `2024-01-01,2024-01-31`

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Days covered by the default window before today
pub const DEFAULT_TRAILING_DAYS: i64 = 7;

/// An inclusive calendar date range with optional ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive)
    pub start: Option<NaiveDate>,
    /// Last day (inclusive)
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range with both ends set
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ReportError::InvalidDateRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// A range with both ends cleared
    pub fn cleared() -> Self {
        Self::default()
    }

    /// The default window ending at `today`
    pub fn trailing_week(today: NaiveDate) -> Self {
        Self {
            start: Some(today - Duration::days(DEFAULT_TRAILING_DAYS)),
            end: Some(today),
        }
    }

    /// The default window ending at the local current date
    pub fn default_window() -> Self {
        Self::trailing_week(today())
    }

    /// Whether both ends are set
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether both ends are cleared
    pub fn is_cleared(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Replace a fully cleared range with the trailing week ending at `today`
    ///
    /// A half-set range is returned unchanged.
    pub fn or_trailing_week(self, today: NaiveDate) -> Self {
        if self.is_cleared() {
            Self::trailing_week(today)
        } else {
            self
        }
    }

    /// Number of calendar days covered (inclusive), if both ends are set
    pub fn days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            _ => None,
        }
    }

    /// Parse a date range relative to the local current date
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_relative_to(s, today())
    }

    /// Parse a date range relative to `today`
    pub fn parse_relative_to(s: &str, today: NaiveDate) -> Result<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "today" => return Self::new(today, today),
            "yesterday" => {
                let day = today - Duration::days(1);
                return Self::new(day, day);
            }
            _ => {}
        }

        if let Some(range) = Self::parse_relative(&s, today) {
            return range;
        }

        if let Some((start, end)) = s.split_once(',') {
            let start = parse_date(start.trim())?;
            let end = parse_date(end.trim())?;
            return Self::new(start, end);
        }

        Err(ReportError::InvalidDateRange(format!(
            "unknown date range format: {}",
            s
        )))
    }

    /// `Nd` / `Nw` ending at `today`; `None` when `s` is not in that form
    fn parse_relative(s: &str, today: NaiveDate) -> Option<Result<Self>> {
        let unit = s.chars().last()?;
        let num: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
        if num <= 0 {
            return None;
        }

        let back = match unit {
            'd' => Duration::try_days(num),
            'w' => Duration::try_weeks(num),
            _ => return None,
        };

        let start = back.and_then(|back| today.checked_sub_signed(back));
        Some(match start {
            Some(start) => Ok(Self {
                start: Some(start),
                end: Some(today),
            }),
            None => Err(ReportError::InvalidDateRange(format!(
                "{} reaches past the earliest supported date",
                s
            ))),
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        ReportError::InvalidDateRange(format!("invalid date: {} (use YYYY-MM-DD)", s))
    })
}

/// Local current date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
