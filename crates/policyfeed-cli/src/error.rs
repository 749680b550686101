//! Application error types.
//!
//! Everything here is fatal for the run. Per-source failures never reach this
//! type; they are logged and the source is skipped.

use std::fmt;

use policyfeed_core::TracingError;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that abort a run.
#[derive(Debug)]
pub enum AppError {
    /// Configuration file missing, unreadable, malformed or invalid.
    Config(String),
    /// Report directory or file could not be written.
    Io(std::io::Error),
    /// Tracing could not be initialized.
    Logging(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Logging(msg) => write!(f, "logging error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<TracingError> for AppError {
    fn from(err: TracingError) -> Self {
        Self::Logging(err.to_string())
    }
}
