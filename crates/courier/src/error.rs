//! Error types for message building and delivery.

use std::io;
use std::path::PathBuf;

use crate::transport::TransportError;

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Builder error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An address argument failed the email validity check.
    #[error("{operation}(): parameter '{parameter}' is not a valid email address: {value:?}")]
    InvalidAddress {
        /// Builder operation that rejected the address (e.g., "cc").
        operation: &'static str,
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Priority level outside 1-5.
    #[error("{operation}(): priority level {level} is out of range 1-5")]
    InvalidPriority {
        /// Builder operation that rejected the level.
        operation: &'static str,
        /// The rejected level.
        level: i64,
    },

    /// An attachment file could not be opened or read.
    #[error("{operation}(): file '{}' is not readable: {source}", path.display())]
    UnreadableFile {
        /// Operation that touched the file.
        operation: &'static str,
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Delivery was refused or failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for errors caused by a bad argument (address or priority).
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. } | Self::InvalidPriority { .. }
        )
    }

    /// Returns true for runtime failures such as an unreadable attachment.
    #[must_use]
    pub const fn is_runtime(&self) -> bool {
        matches!(self, Self::UnreadableFile { .. } | Self::Io(_))
    }
}
