//! API client errors.

use thiserror::Error;

/// Errors raised by the scheduler API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The scheduler rejected the request.
    #[error("scheduler returned {status} for {operation}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// A unit file could not be parsed into submission options.
    #[error("invalid unit file at line {line}: {reason}")]
    InvalidUnitFile { line: usize, reason: String },
}

impl ApiError {
    pub(crate) fn status(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            operation,
            status,
            message: message.into(),
        }
    }
}
