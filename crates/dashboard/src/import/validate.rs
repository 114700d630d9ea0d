//! Client-side checks on an import file
//!
//! Run before anything is sent: a file over the size cap, with no header
//! line, or lacking a required dimension header never reaches the backend.

use std::path::Path;

use tracing::debug;

use adboard_report::Dimension;

use crate::error::{DashboardError, Result};

/// Upload size cap, 10 MiB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Header names a file must carry, one per dimension
pub fn required_headers() -> Vec<&'static str> {
    Dimension::ALL.iter().map(Dimension::import_header).collect()
}

/// Check the header line of an import file
///
/// The line is comma split and trimmed. A dimension is present when a
/// header equals its import header, key or display label, ignoring case.
/// Metric headers are optional.
pub fn validate_headers(first_line: &str) -> Result<()> {
    let headers: Vec<String> = first_line
        .trim()
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<String> = Dimension::ALL
        .iter()
        .filter(|d| {
            let accepted = [
                d.import_header().to_lowercase(),
                d.key().to_lowercase(),
                d.label().to_lowercase(),
            ];
            !headers.iter().any(|h| accepted.contains(h))
        })
        .map(|d| d.import_header().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::MissingHeaders { missing })
    }
}

/// A validated file ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    contents: Vec<u8>,
}

impl UploadFile {
    /// Validate in-memory contents against `limit` and the header contract
    pub fn new(name: impl Into<String>, contents: Vec<u8>, limit: u64) -> Result<Self> {
        let size = contents.len() as u64;
        if size > limit {
            return Err(DashboardError::FileTooLarge { size, limit });
        }

        let text = String::from_utf8_lossy(&contents);
        let first_line = text.split('\n').next().unwrap_or_default();
        if first_line.trim().is_empty() {
            return Err(DashboardError::EmptyFile);
        }
        validate_headers(first_line)?;

        Ok(Self {
            name: name.into(),
            contents,
        })
    }

    /// Read and validate a file from disk
    ///
    /// The size is checked from metadata before the file is read.
    pub async fn load(path: &Path, limit: u64) -> Result<Self> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > limit {
            return Err(DashboardError::FileTooLarge { size, limit });
        }

        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        debug!(file = %name, size, "import file loaded");
        Self::new(name, contents, limit)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }
}
