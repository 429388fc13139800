use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend round-trip
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {}{}", .status, message_suffix(.message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// Message the server attached to an error status, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// User-facing text for a failed mutation.
    ///
    /// Server message wins. A bare error status gets the generic text alone,
    /// anything else gets the generic text with the cause appended.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Status { message: None, .. } => generic.to_string(),
            other => format!("{}: {}", generic, other),
        }
    }
}
