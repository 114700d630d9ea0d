//! Response records returned by the reporting backend

use serde::{Deserialize, Deserializer, Serialize};

use crate::query::FilterSet;
use crate::schema::{Dimension, Metric};

/// Phase reported by a finished import job
pub const COMPLETED_PHASE: &str = "Completed";

/// Distinct filter values observed in a date window
pub type FilterOptions = FilterSet;

/// One report record
///
/// Grouped queries leave the ungrouped dimensions and unselected metrics
/// absent, so every field except `id` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRow {
    pub id: i64,
    pub mobile_app_resolved_id: Option<String>,
    pub mobile_app_name: Option<String>,
    pub domain: Option<String>,
    pub ad_unit_name: Option<String>,
    pub ad_unit_id: Option<String>,
    pub inventory_format_name: Option<String>,
    pub operating_system_version_name: Option<String>,
    pub date: Option<String>,
    pub ad_exchange_total_requests: Option<f64>,
    pub ad_exchange_responses_served: Option<f64>,
    pub ad_exchange_match_rate: Option<f64>,
    pub ad_exchange_line_item_level_impressions: Option<f64>,
    pub ad_exchange_line_item_level_clicks: Option<f64>,
    pub ad_exchange_line_item_level_ctr: Option<f64>,
    pub average_ecpm: Option<f64>,
    pub payout: Option<f64>,
}

impl ReportRow {
    /// Row with only an id, for building fixtures
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Raw value of a dimension field
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::AppId => &self.mobile_app_resolved_id,
            Dimension::AppName => &self.mobile_app_name,
            Dimension::Domain => &self.domain,
            Dimension::AdUnitName => &self.ad_unit_name,
            Dimension::AdUnitId => &self.ad_unit_id,
            Dimension::InventoryFormat => &self.inventory_format_name,
            Dimension::OsVersion => &self.operating_system_version_name,
            Dimension::Date => &self.date,
        };
        value.as_deref()
    }

    /// Raw value of a metric field
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TotalRequests => self.ad_exchange_total_requests,
            Metric::ResponsesServed => self.ad_exchange_responses_served,
            Metric::MatchRate => self.ad_exchange_match_rate,
            Metric::Impressions => self.ad_exchange_line_item_level_impressions,
            Metric::Clicks => self.ad_exchange_line_item_level_clicks,
            Metric::Ctr => self.ad_exchange_line_item_level_ctr,
            Metric::Ecpm => self.average_ecpm,
            Metric::Payout => self.payout,
        }
    }

    /// Set a dimension field
    pub fn set_dimension(&mut self, dimension: Dimension, value: impl Into<String>) {
        let slot = match dimension {
            Dimension::AppId => &mut self.mobile_app_resolved_id,
            Dimension::AppName => &mut self.mobile_app_name,
            Dimension::Domain => &mut self.domain,
            Dimension::AdUnitName => &mut self.ad_unit_name,
            Dimension::AdUnitId => &mut self.ad_unit_id,
            Dimension::InventoryFormat => &mut self.inventory_format_name,
            Dimension::OsVersion => &mut self.operating_system_version_name,
            Dimension::Date => &mut self.date,
        };
        *slot = Some(value.into());
    }

    /// Set a metric field
    pub fn set_metric(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::TotalRequests => &mut self.ad_exchange_total_requests,
            Metric::ResponsesServed => &mut self.ad_exchange_responses_served,
            Metric::MatchRate => &mut self.ad_exchange_match_rate,
            Metric::Impressions => &mut self.ad_exchange_line_item_level_impressions,
            Metric::Clicks => &mut self.ad_exchange_line_item_level_clicks,
            Metric::Ctr => &mut self.ad_exchange_line_item_level_ctr,
            Metric::Ecpm => &mut self.average_ecpm,
            Metric::Payout => &mut self.payout,
        };
        *slot = Some(value);
    }
}

/// Totals across the full filtered dataset
///
/// Missing or null totals read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateTotals {
    #[serde(deserialize_with = "zero_if_null")]
    pub total_requests: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_impressions: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_clicks: f64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_payout: f64,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Status of a bulk import job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportProgress {
    pub total_records: u64,
    pub processed_records: u64,
    pub saved_records: u64,
    pub error_records: u64,
    pub current_phase: String,
    pub progress_percentage: f64,
}

impl ImportProgress {
    /// Whether the job reached its terminal phase
    pub fn is_completed(&self) -> bool {
        self.current_phase == COMPLETED_PHASE
    }
}
