//! Error type for API calls and their preconditions.

use thiserror::Error;

/// What the user has to do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing keys or empty required input; nothing was sent.
    Precondition,
    /// Malformed user input (URLs, schedule); nothing was sent.
    Validation,
    /// Network or non-success server response.
    Transport,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please configure your keys first")]
    MissingCredentials,

    /// An empty required field (job ID, URL list, bucket).
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Invalid URL: {}", .0.join(", "))]
    InvalidUrls(Vec<String>),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("sign request: {0}")]
    Signing(String),

    #[error("credential store: {0}")]
    Credentials(String),

    /// Non-2xx response; `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    Http { status: u32, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] curl::Error),

    #[error("{what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("background request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::MissingCredentials
            | ApiError::MissingInput(_)
            | ApiError::Credentials(_)
            | ApiError::Signing(_) => ErrorClass::Precondition,
            ApiError::InvalidUrls(_) | ApiError::InvalidSchedule(_) => ErrorClass::Validation,
            ApiError::Http { .. }
            | ApiError::Transport(_)
            | ApiError::Json { .. }
            | ApiError::Join(_) => ErrorClass::Transport,
        }
    }

    /// Message shown to the user: the raw body for server errors, Display otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { body, .. } if !body.trim().is_empty() => body.trim().to_string(),
            other => other.to_string(),
        }
    }
}
