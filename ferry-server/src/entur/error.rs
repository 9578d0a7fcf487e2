//! Journey-planner client error types.

use std::fmt;

/// Errors from the journey-planner HTTP client.
#[derive(Debug)]
pub enum EnturError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },
}

impl fmt::Display for EnturError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnturError::Http(e) => write!(f, "HTTP error: {e}"),
            EnturError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            EnturError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
        }
    }
}

impl std::error::Error for EnturError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnturError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EnturError {
    fn from(err: reqwest::Error) -> Self {
        EnturError::Http(err)
    }
}
