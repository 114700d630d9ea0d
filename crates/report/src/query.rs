//! Report queries
//!
//! [`ReportQuery`] is what the user edits: date range, group-by dimensions,
//! metrics, categorical filters, free-text search and sort. It is turned into
//! a [`QueryBody`] for every request; row requests carry a [`ChunkWindow`],
//! aggregate requests do not.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::error::{ReportError, Result};
use crate::schema::{Dimension, Metric};

/// Rows per chunk fetch
pub const CHUNK_SIZE: usize = 20_000;

/// Offset/limit cursor into the remote source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    pub offset: usize,
    pub limit: usize,
}

impl ChunkWindow {
    /// The chunk starting at `offset`
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            limit: CHUNK_SIZE,
        }
    }

    /// Chunk zero
    pub fn first() -> Self {
        Self::at(0)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ReportError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Pass-through sort instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Column key, forwarded as is
    pub by: String,
    pub order: SortOrder,
}

/// The seven categorical filter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    AppIds,
    AppNames,
    Domains,
    AdUnitNames,
    AdUnitIds,
    InventoryFormats,
    OsVersions,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::AppIds,
        FilterField::AppNames,
        FilterField::Domains,
        FilterField::AdUnitNames,
        FilterField::AdUnitIds,
        FilterField::InventoryFormats,
        FilterField::OsVersions,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::AppIds => "Mobile App Resolved ID",
            Self::AppNames => "Mobile App Name",
            Self::Domains => "Domain",
            Self::AdUnitNames => "Ad Unit Name",
            Self::AdUnitIds => "Ad Unit ID",
            Self::InventoryFormats => "Inventory Format",
            Self::OsVersions => "OS Version",
        }
    }

    /// The dimension this field restricts
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::AppIds => Dimension::AppId,
            Self::AppNames => Dimension::AppName,
            Self::Domains => Dimension::Domain,
            Self::AdUnitNames => Dimension::AdUnitName,
            Self::AdUnitIds => Dimension::AdUnitId,
            Self::InventoryFormats => Dimension::InventoryFormat,
            Self::OsVersions => Dimension::OsVersion,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterField {
    type Err = ReportError;

    /// Accepts the label or the key of the restricted dimension
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| {
                f.label().eq_ignore_ascii_case(needle)
                    || f.dimension().key().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ReportError::UnknownFilter(s.to_string()))
    }
}

/// Values per categorical filter field
///
/// Used both for the user's selection (empty list = no restriction) and for
/// the options the backend reports for a date window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    pub mobile_app_resolved_ids: Vec<String>,
    pub mobile_app_names: Vec<String>,
    pub domains: Vec<String>,
    pub ad_unit_names: Vec<String>,
    pub ad_unit_ids: Vec<String>,
    pub inventory_format_names: Vec<String>,
    pub operating_system_version_names: Vec<String>,
}

impl FilterSet {
    /// Values for one field
    pub fn get(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::AppIds => &self.mobile_app_resolved_ids,
            FilterField::AppNames => &self.mobile_app_names,
            FilterField::Domains => &self.domains,
            FilterField::AdUnitNames => &self.ad_unit_names,
            FilterField::AdUnitIds => &self.ad_unit_ids,
            FilterField::InventoryFormats => &self.inventory_format_names,
            FilterField::OsVersions => &self.operating_system_version_names,
        }
    }

    /// Mutable values for one field
    pub fn get_mut(&mut self, field: FilterField) -> &mut Vec<String> {
        match field {
            FilterField::AppIds => &mut self.mobile_app_resolved_ids,
            FilterField::AppNames => &mut self.mobile_app_names,
            FilterField::Domains => &mut self.domains,
            FilterField::AdUnitNames => &mut self.ad_unit_names,
            FilterField::AdUnitIds => &mut self.ad_unit_ids,
            FilterField::InventoryFormats => &mut self.inventory_format_names,
            FilterField::OsVersions => &mut self.operating_system_version_names,
        }
    }

    /// Replace the values of one field
    pub fn set(&mut self, field: FilterField, values: Vec<String>) {
        *self.get_mut(field) = values;
    }

    /// True when no field restricts anything
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// The user's report query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportQuery {
    pub date_range: DateRange,
    /// Group-by dimensions in insertion order, no duplicates
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub filters: FilterSet,
    pub search: Option<String>,
    pub sort: Option<Sort>,
}

impl ReportQuery {
    /// Create a query over a date range with nothing selected
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            ..Default::default()
        }
    }

    /// The query a fresh dashboard starts with: trailing week, no selection
    pub fn default_for(today: NaiveDate) -> Self {
        Self::new(DateRange::trailing_week(today))
    }

    /// Add a group-by dimension (ignored if already selected)
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.add_dimension(dimension);
        self
    }

    /// Add a metric (ignored if already selected)
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.add_metric(metric);
        self
    }

    /// Restrict a categorical field
    pub fn with_filter(mut self, field: FilterField, values: Vec<String>) -> Self {
        self.filters.set(field, values);
        self
    }

    /// Set the free-text search
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    /// Set the pass-through sort
    pub fn with_sort(mut self, by: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            by: by.into(),
            order,
        });
        self
    }

    pub fn add_dimension(&mut self, dimension: Dimension) {
        if !self.dimensions.contains(&dimension) {
            self.dimensions.push(dimension);
        }
    }

    pub fn add_metric(&mut self, metric: Metric) {
        if !self.metrics.contains(&metric) {
            self.metrics.push(metric);
        }
    }

    /// Select `dimension`, or drop it if already selected
    ///
    /// Returns whether it is selected afterwards.
    pub fn toggle_dimension(&mut self, dimension: Dimension) -> bool {
        if let Some(i) = self.dimensions.iter().position(|d| *d == dimension) {
            self.dimensions.remove(i);
            false
        } else {
            self.dimensions.push(dimension);
            true
        }
    }

    /// Select `metric`, or drop it if already selected
    pub fn toggle_metric(&mut self, metric: Metric) -> bool {
        if let Some(i) = self.metrics.iter().position(|m| *m == metric) {
            self.metrics.remove(i);
            false
        } else {
            self.metrics.push(metric);
            true
        }
    }

    /// Add `value` to a filter field, or remove it if present
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &str) -> bool {
        let values = self.filters.get_mut(field);
        if let Some(i) = values.iter().position(|v| v == value) {
            values.remove(i);
            false
        } else {
            values.push(value.to_string());
            true
        }
    }

    /// True when neither dimensions nor metrics are selected
    pub fn has_default_projection(&self) -> bool {
        self.dimensions.is_empty() && self.metrics.is_empty()
    }

    /// True when nothing beyond the date range is set
    ///
    /// Such queries are sent as a minimal body (dates and window only).
    pub fn is_unfiltered(&self) -> bool {
        self.has_default_projection()
            && self.filters.is_empty()
            && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }

    /// Request body for a row chunk
    pub fn rows_body(&self, window: ChunkWindow) -> QueryBody {
        let mut body = self.body();
        body.offset = Some(window.offset);
        body.limit = Some(window.limit);
        body
    }

    /// Request body for the aggregate totals (no offset/limit)
    pub fn aggregate_body(&self) -> QueryBody {
        self.body()
    }

    fn body(&self) -> QueryBody {
        let mut body = QueryBody {
            start_date: self.date_range.start,
            end_date: self.date_range.end,
            ..Default::default()
        };

        if self.is_unfiltered() {
            return body;
        }

        let filters = &self.filters;
        body.mobile_app_resolved_ids = Some(filters.mobile_app_resolved_ids.clone());
        body.mobile_app_names = Some(filters.mobile_app_names.clone());
        body.domains = Some(filters.domains.clone());
        body.ad_unit_names = Some(filters.ad_unit_names.clone());
        body.ad_unit_ids = Some(filters.ad_unit_ids.clone());
        body.inventory_format_names = Some(filters.inventory_format_names.clone());
        body.operating_system_version_names =
            Some(filters.operating_system_version_names.clone());
        body.search_query = self.search.clone();
        body.group_by_dimensions = Some(self.dimensions.clone());
        body.metrics = Some(self.metrics.clone());
        if let Some(sort) = &self.sort {
            body.sort_by = Some(sort.by.clone());
            body.sort_order = Some(sort.order);
        }
        body
    }
}

/// JSON body of `/reports/getreport` and `/reports/aggregate`
///
/// Absent fields are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_app_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_format_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_version_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_app_resolved_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_unit_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_unit_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by_dimensions: Option<Vec<Dimension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<Metric>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}
