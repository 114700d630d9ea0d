//! Configuration validation
//!
//! Rejects values that would leave the client unable to work:
//! - Empty or non-http API URL
//! - Zero request timeout
//! - Zero page size
//! - Zero poll interval
//! - Zero maximum import size

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_api(config)?;
    validate_dashboard(config)?;
    validate_import(config)?;
    Ok(())
}

fn validate_api(config: &Config) -> Result<()> {
    let url = config.api.url.trim();
    if url.is_empty() {
        return Err(ConfigError::invalid_value("api", "url", "must not be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::invalid_value(
            "api",
            "url",
            format!("'{url}' must start with http:// or https://"),
        ));
    }
    if config.api.timeout.is_zero() {
        return Err(ConfigError::invalid_value("api", "timeout", "must be positive"));
    }
    Ok(())
}

fn validate_dashboard(config: &Config) -> Result<()> {
    if config.dashboard.page_size == 0 {
        return Err(ConfigError::invalid_value(
            "dashboard",
            "page_size",
            "must be at least 1",
        ));
    }
    Ok(())
}

fn validate_import(config: &Config) -> Result<()> {
    if config.import.poll_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "import",
            "poll_interval",
            "must be positive",
        ));
    }
    if config.import.max_file_size == 0 {
        return Err(ConfigError::invalid_value(
            "import",
            "max_file_size",
            "must be at least 1 byte",
        ));
    }
    Ok(())
}
