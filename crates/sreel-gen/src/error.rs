//! Generation client error types.

use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Unauthorized: invalid API key (status {0})")]
    Unauthorized(u16),

    #[error("Content policy violation: {0}")]
    ContentPolicy(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job timed out after {polls} status checks")]
    JobTimeout { polls: u32 },

    #[error("Missing expected output: {0}")]
    MissingOutput(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    pub fn missing_output(msg: impl Into<String>) -> Self {
        Self::MissingOutput(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map an unsuccessful HTTP response status to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(status),
            _ => Self::ApiStatus { status, body },
        }
    }
}
