//! Remote call error types

/// Errors from the reporting backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No response reached us (connect, timeout, broken body)
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        /// `message` field of the error body, when present
        message: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("decode error: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Server error from a status code and raw body
    ///
    /// The message is taken from the body's JSON `message` field; a
    /// non-JSON body is kept as is unless empty.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            Err(_) => {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        };
        Self::Server { status, message }
    }

    /// Whether the backend answered at all
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// One-line notification text for a failed `what` fetch
    ///
    /// Server errors carry the backend's message; everything else reads as a
    /// network problem.
    pub fn user_message(&self, what: &str) -> String {
        match self {
            Self::Server { message, .. } => format!(
                "Error fetching {}: {}",
                what,
                message.as_deref().unwrap_or("Unknown error")
            ),
            Self::Transport(_) | Self::Decode(_) => {
                format!("Failed to fetch {}. Please check network.", what)
            }
        }
    }
}

/// Result type for remote calls
pub type Result<T> = std::result::Result<T, RemoteError>;
