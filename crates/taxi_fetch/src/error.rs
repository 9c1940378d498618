use thiserror::Error;

/// Why one fetch attempt failed. Every variant is recoverable with a retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("request cancelled")]
    Cancelled,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded {code} {reason}")]
    Status { code: u16, reason: String },
    #[error("failed to build request: {0}")]
    Request(String),
}

impl FetchError {
    /// Message shown in the error banner next to the retry affordance.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Timeout { .. } => {
                "Request timed out. The server is taking too long to respond. Please try again."
                    .to_string()
            }
            FetchError::Cancelled => "Request was cancelled. Please try again.".to_string(),
            FetchError::Transport(_) => "Unable to reach the server. Please check your internet \
                                         connection and try again."
                .to_string(),
            FetchError::Status { code, reason } => format!("Server error: {code} - {reason}"),
            FetchError::Request(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
        }
        if err.is_builder() {
            FetchError::Request(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Invalid environment configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}
