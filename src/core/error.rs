//! Error types for the range-dl library
//!
//! Provides comprehensive error handling for range-request stepping.

use std::fmt;

/// Main error type for range-dl operations
#[derive(Debug)]
pub enum Error {
    /// A computed or supplied byte range violated ordering or non-negativity.
    /// Carries the offending bounds for diagnostics.
    InvalidRange {
        start: i64,
        end: i64,
        reason: String,
    },

    /// Invalid configuration or parameters
    InvalidInput(String),

    /// HTTP-specific error
    HttpError(String),

    /// Network connectivity issues
    NetworkError(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRange { start, end, reason } => {
                write!(f, "Invalid range {}-{}: {}", start, end, reason)
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for range-dl operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_carries_bounds() {
        let err = Error::InvalidRange {
            start: 10,
            end: 5,
            reason: "range start must be less or equal to range end".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("10-5"), "bounds missing from: {rendered}");
        assert!(rendered.contains("less or equal"));
    }

    #[test]
    fn test_io_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from(io);

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("pipe closed"));
    }
}
