//! HTTP report source
//!
//! JSON over HTTP against the reporting backend:
//!
//! | operation | request |
//! |-----------|---------|
//! | rows | `POST {base}/reports/getreport` |
//! | aggregate | `POST {base}/reports/aggregate` |
//! | filter options | `GET {base}/reports/filters?startDate=..&endDate=..` |
//! | upload | `POST {base}/reports/upload` (multipart, field `file`) |
//! | job progress | `GET {base}/reports/upload/progress/{job_id}` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use adboard_report::{
    AggregateTotals, DateRange, FilterOptions, ImportProgress, QueryBody, ReportRow,
};

use crate::error::{RemoteError, Result};
use crate::source::ReportSource;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Reporting backend reached over HTTP
#[derive(Clone)]
pub struct HttpReportSource {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReportSource")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpReportSource {
    /// Create a source for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed");
            RemoteError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "backend returned error status");
            return Err(RemoteError::from_status(status.as_u16(), &body));
        }

        response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("failed to read response: {}", e)))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T> {
        let body = self.send(request, path).await?;
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::Decode(format!("{} returned unexpected body: {}", path, e)))
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_rows(&self, body: &QueryBody) -> Result<Vec<ReportRow>> {
        let path = "/reports/getreport";
        debug!(offset = ?body.offset, limit = ?body.limit, "fetching report rows");
        let rows: Vec<ReportRow> = self
            .send_json(self.client.post(self.url(path)).json(body), path)
            .await?;
        debug!(rows = rows.len(), "report rows received");
        Ok(rows)
    }

    async fn fetch_aggregate(&self, body: &QueryBody) -> Result<AggregateTotals> {
        let path = "/reports/aggregate";
        debug!("fetching aggregate totals");
        self.send_json(self.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn fetch_filter_options(&self, window: &DateRange) -> Result<FilterOptions> {
        let path = "/reports/filters";
        let mut params = Vec::with_capacity(2);
        if let Some(start) = window.start {
            params.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = window.end {
            params.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        debug!(?window, "fetching filter options");
        self.send_json(self.client.get(self.url(path)).query(&params), path)
            .await
    }

    async fn upload_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String> {
        let path = "/reports/upload";
        let size = contents.len();
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| RemoteError::Transport(format!("invalid upload part: {}", e)))?;
        let form = Form::new().part("file", part);

        debug!(file_name, size, "uploading file");
        self.send(self.client.post(self.url(path)).multipart(form), path)
            .await
    }

    async fn fetch_job_progress(&self, job_id: &str) -> Result<ImportProgress> {
        let path = format!("/reports/upload/progress/{}", job_id);
        self.send_json(self.client.get(self.url(&path)), &path)
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
