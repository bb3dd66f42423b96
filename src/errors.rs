use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-success responses, when it sends one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Over capacity: {0}")]
    OverCapacity(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("{message}")]
    ActionFailed {
        message: String,
        #[source]
        source: Box<ServiceError>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl ServiceError {
    /// Wraps a backend failure with the text shown to the user for the action that failed.
    /// Local rejections and expired sessions keep their own message.
    pub fn action_failed(self, message: impl Into<String>) -> Self {
        match self {
            err if err.is_local() => err,
            err @ Self::Unauthorized(_) => err,
            err @ Self::ActionFailed { .. } => err,
            err => Self::ActionFailed {
                message: message.into(),
                source: Box::new(err),
            },
        }
    }

    /// Maps a non-success backend response onto the error variants the dashboard reacts to.
    /// This is the single source of truth for status-to-error mapping.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| body.clone());

        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(message),
            _ => Self::Status { status, body },
        }
    }

    /// HTTP status associated with the error, if it came from the backend.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Conflict(_) => Some(StatusCode::CONFLICT),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::ActionFailed { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Local rejections never reached the backend; everything else did or tried to.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::OverCapacity(_)
                | Self::InsufficientStock(_)
                | Self::NotLoggedIn
        )
    }

    /// Returns the message suitable for a toast.
    /// Transport and internal errors return generic text to avoid leaking details.
    pub fn toast_message(&self) -> String {
        match self {
            Self::ValidationError(msg) | Self::OverCapacity(msg) | Self::InsufficientStock(msg) => {
                msg.clone()
            }
            Self::NotLoggedIn => "Please log in first.".to_string(),
            Self::Unauthorized(_) => "Your session has expired. Please log in again.".to_string(),
            Self::Conflict(msg) | Self::NotFound(msg) => msg.clone(),
            Self::ActionFailed { message, .. } => message.clone(),
            Self::Http(_) => "Could not reach the server.".to_string(),
            _ => "Something went wrong.".to_string(),
        }
    }
}
