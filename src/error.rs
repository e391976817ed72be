//! # Error Types
//!
//! This module defines error types used throughout the centauri library.
//!
//! Every failure a caller might want to react to differently has its own
//! variant, so a CLI or other front-end can choose to retry, abort or prompt.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to load a JSON source (configuration or command catalog) from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist
    #[error("File '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not valid JSON for the expected shape
    #[error("The file '{}' contains invalid JSON: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },

    /// A required field is absent or empty
    #[error("{field} not found in '{}'", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// Any other read failure (permissions, is a directory, ...)
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::Io { path, source }
        }
    }
}

/// Main error type for centauri operations
#[derive(Debug, Error)]
pub enum CentauriError {
    /// Command catalog missing or malformed
    #[error("Command catalog: {0}")]
    CatalogLoad(LoadError),

    /// Session configuration missing or malformed
    #[error("Configuration: {0}")]
    ConfigLoad(LoadError),

    /// Command key not present in the catalog
    #[error("Command '{0}' not found in the command catalog")]
    UnknownCommand(String),

    /// The printer actively refused the connection
    #[error("Connection refused. Is the printer on at {address}?")]
    ConnectionRefused { address: String },

    /// Any other failure while opening or using the connection
    #[error("Connection to {address} failed: {message}")]
    ConnectionFailed { address: String, message: String },

    /// The printer closed the session before replying
    #[error("Connection closed by the printer before a reply arrived")]
    ConnectionClosed,

    /// No reply within the configured timeout
    #[error("No reply from the printer within {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The reply was not valid JSON
    #[error("Malformed response from printer: {0}")]
    MalformedResponse(String),

    /// The reply belongs to a different request
    #[error("Response RequestID '{actual}' does not match request '{expected}'")]
    ResponseMismatch { expected: String, actual: String },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = LoadError::from_io(
            PathBuf::from("config.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(err.to_string(), "File 'config.json' not found");
    }

    #[test]
    fn test_from_io_other() {
        let err = LoadError::from_io(
            PathBuf::from("config.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_messages_are_distinct() {
        let refused = CentauriError::ConnectionRefused {
            address: "10.0.0.5".into(),
        };
        let closed = CentauriError::ConnectionClosed;
        let timeout = CentauriError::Timeout(Duration::from_secs(5));
        assert_eq!(
            refused.to_string(),
            "Connection refused. Is the printer on at 10.0.0.5?"
        );
        assert_ne!(closed.to_string(), timeout.to_string());
        assert_eq!(timeout.to_string(), "No reply from the printer within 5s");
    }
}
