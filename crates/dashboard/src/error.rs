//! Dashboard error types

use adboard_remote::RemoteError;

/// Errors surfaced by dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Upload requested with no file selected
    #[error("Please select a CSV file to upload first.")]
    NoFileSelected,

    /// Upload file above the size cap
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// Upload file has no header line
    #[error("file is empty")]
    EmptyFile,

    /// Upload file lacks required headers
    #[error("Invalid file headers. Missing: {}", missing.join(", "))]
    MissingHeaders { missing: Vec<String> },

    /// Upload reply without a job id
    #[error("Could not extract job ID from response")]
    MissingJobId(String),

    /// Export requested with an empty buffer
    #[error("No data available to download")]
    NoData,

    /// Backend call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
