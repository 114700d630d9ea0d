//! Bulk import configuration

use serde::Deserialize;
use std::time::Duration;

/// Upload limits and job polling cadence
///
/// ```toml
/// [import]
/// poll_interval = "1s"
/// start_delay = "1s"
/// max_file_size = 10485760
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Time between progress requests
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Wait between the upload reply and the first progress request
    #[serde(with = "humantime_serde")]
    pub start_delay: Duration,

    /// Largest accepted file in bytes
    pub max_file_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            start_delay: Duration::from_secs(1),
            max_file_size: 10 * 1024 * 1024,
        }
    }
}
