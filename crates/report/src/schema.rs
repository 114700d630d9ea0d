//! Report schema: the fixed dimension and metric keys
//!
//! The backend speaks snake_case keys (`mobile_app_name`, `average_ecpm`);
//! the dashboard shows display labels (`App Name`, `eCPM`). Both directions
//! live here so the table, the CSV export and the import validator agree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A categorical grouping key for report rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "mobile_app_resolved_id")]
    AppId,
    #[serde(rename = "mobile_app_name")]
    AppName,
    #[serde(rename = "domain")]
    Domain,
    #[serde(rename = "ad_unit_name")]
    AdUnitName,
    #[serde(rename = "ad_unit_id")]
    AdUnitId,
    #[serde(rename = "inventory_format_name")]
    InventoryFormat,
    #[serde(rename = "operating_system_version_name")]
    OsVersion,
    #[serde(rename = "date")]
    Date,
}

impl Dimension {
    /// All dimensions in default display order
    pub const ALL: [Dimension; 8] = [
        Dimension::AppId,
        Dimension::AppName,
        Dimension::Domain,
        Dimension::AdUnitName,
        Dimension::AdUnitId,
        Dimension::InventoryFormat,
        Dimension::OsVersion,
        Dimension::Date,
    ];

    /// Wire key sent in `groupByDimensions`
    pub fn key(&self) -> &'static str {
        match self {
            Self::AppId => "mobile_app_resolved_id",
            Self::AppName => "mobile_app_name",
            Self::Domain => "domain",
            Self::AdUnitName => "ad_unit_name",
            Self::AdUnitId => "ad_unit_id",
            Self::InventoryFormat => "inventory_format_name",
            Self::OsVersion => "operating_system_version_name",
            Self::Date => "date",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::AppId => "Mobile ID",
            Self::AppName => "App Name",
            Self::Domain => "Domain",
            Self::AdUnitName => "Ad Unit Name",
            Self::AdUnitId => "Ad Unit ID",
            Self::InventoryFormat => "Format",
            Self::OsVersion => "OS Version",
            Self::Date => "Date",
        }
    }

    /// Column header expected in bulk-import CSV files
    ///
    /// Matches the key except for `date`, which the import format calls
    /// `timestamp`.
    pub fn import_header(&self) -> &'static str {
        match self {
            Self::Date => "timestamp",
            other => other.key(),
        }
    }

    /// Parse a dimension from its key or display label (case-insensitive)
    pub fn parse(s: &str) -> Result<Self, ReportError> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                d.key().eq_ignore_ascii_case(needle) || d.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ReportError::UnknownDimension(s.to_string()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A numeric measure reported per row or group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "ad_exchange_total_requests")]
    TotalRequests,
    #[serde(rename = "ad_exchange_responses_served")]
    ResponsesServed,
    #[serde(rename = "ad_exchange_match_rate")]
    MatchRate,
    #[serde(rename = "ad_exchange_line_item_level_impressions")]
    Impressions,
    #[serde(rename = "ad_exchange_line_item_level_clicks")]
    Clicks,
    #[serde(rename = "ad_exchange_line_item_level_ctr")]
    Ctr,
    #[serde(rename = "average_ecpm")]
    Ecpm,
    #[serde(rename = "payout")]
    Payout,
}

impl Metric {
    /// All metrics in default display order
    pub const ALL: [Metric; 8] = [
        Metric::TotalRequests,
        Metric::ResponsesServed,
        Metric::MatchRate,
        Metric::Impressions,
        Metric::Clicks,
        Metric::Ctr,
        Metric::Ecpm,
        Metric::Payout,
    ];

    /// Wire key sent in `metrics`
    pub fn key(&self) -> &'static str {
        match self {
            Self::TotalRequests => "ad_exchange_total_requests",
            Self::ResponsesServed => "ad_exchange_responses_served",
            Self::MatchRate => "ad_exchange_match_rate",
            Self::Impressions => "ad_exchange_line_item_level_impressions",
            Self::Clicks => "ad_exchange_line_item_level_clicks",
            Self::Ctr => "ad_exchange_line_item_level_ctr",
            Self::Ecpm => "average_ecpm",
            Self::Payout => "payout",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalRequests => "Total Requests",
            Self::ResponsesServed => "Responses Served",
            Self::MatchRate => "Match Rate",
            Self::Impressions => "Impressions",
            Self::Clicks => "Clicks",
            Self::Ctr => "CTR",
            Self::Ecpm => "eCPM",
            Self::Payout => "Payout",
        }
    }

    /// Whether values render with exactly two decimals
    ///
    /// True for every key containing `ecpm`, `payout`, `ctr` or `rate`.
    pub fn is_fractional(&self) -> bool {
        let key = self.key().to_ascii_lowercase();
        ["ecpm", "payout", "ctr", "rate"]
            .iter()
            .any(|term| key.contains(term))
    }

    /// Parse a metric from its key or display label (case-insensitive)
    pub fn parse(s: &str) -> Result<Self, ReportError> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| {
                m.key().eq_ignore_ascii_case(needle) || m.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ReportError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Title-case a field key that has no display label
///
/// `camelCase` keys are split before each capital and the first letter is
/// upper-cased: `mobileAppName` becomes `Mobile App Name`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
