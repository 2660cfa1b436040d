use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx reply. `message` is whatever text the server put in its JSON body.
    #[error("HTTP {}: {reason}", .status.as_u16())]
    Status {
        status: StatusCode,
        reason: String,
        message: Option<String>,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Invalid API base URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(status: StatusCode, message: Option<String>) -> Self {
        ApiError::Status {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// Text the server supplied alongside a failed status, for diagnostics.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
