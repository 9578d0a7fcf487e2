//! Situation-feed client error types.

use std::fmt;

/// Errors from the situation-feed HTTP client.
///
/// These never escape the client's public surface; they exist so the fetch
/// path can use `?` internally and log one coherent failure.
#[derive(Debug)]
pub enum SituationError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json { message: String },

    /// Feed returned an error status code
    ApiError { status: u16, message: String },
}

impl fmt::Display for SituationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SituationError::Http(e) => write!(f, "HTTP error: {e}"),
            SituationError::Json { message } => write!(f, "JSON parse error: {message}"),
            SituationError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
        }
    }
}

impl std::error::Error for SituationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SituationError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SituationError {
    fn from(err: reqwest::Error) -> Self {
        SituationError::Http(err)
    }
}
