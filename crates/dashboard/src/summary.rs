//! Summary metrics panel

use adboard_report::AggregateTotals;

use crate::format::format_number;

/// The four headline totals
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryMetrics {
    pub total_requests: f64,
    pub total_impressions: f64,
    pub total_clicks: f64,
    pub total_payout: f64,
}

impl From<AggregateTotals> for SummaryMetrics {
    fn from(totals: AggregateTotals) -> Self {
        Self {
            total_requests: totals.total_requests,
            total_impressions: totals.total_impressions,
            total_clicks: totals.total_clicks,
            total_payout: totals.total_payout,
        }
    }
}

impl SummaryMetrics {
    /// `(label, compact value)` pairs in panel order
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Total Requests", format_number(self.total_requests, false)),
            ("Impressions", format_number(self.total_impressions, false)),
            ("Clicks", format_number(self.total_clicks, false)),
            ("Payout", format_number(self.total_payout, true)),
        ]
    }
}
