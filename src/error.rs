use thiserror::Error;

/// Failure of one backend call. The controller treats every variant the same
/// way: the affected result group is left unset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            BackendError::InvalidResponse(value.to_string())
        } else {
            BackendError::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(value: serde_json::Error) -> Self {
        BackendError::InvalidResponse(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{0:?} is not a token of the current sentence")]
    UnknownToken(String),
    #[error("empty tokens cannot be selected")]
    EmptyToken,
    #[error("token index {index} is out of range ({len} tokens)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?} (expected `basic` or `extended`)")]
pub struct ParseStrategyError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
    #[error("base URL cannot be empty")]
    EmptyBaseUrl,
}
