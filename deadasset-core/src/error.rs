//! Typed error handling for deadasset.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadasset operations.
///
/// Automaton misuse (empty patterns, scanning before `build`) is reported
/// at the call that caused it. "No matches" is never an error.
#[derive(Error, Debug)]
pub enum DeadassetError {
    /// A zero-length pattern was registered
    #[error("Empty pattern rejected (registration #{ordinal})")]
    EmptyPattern {
        /// Zero-based position of the offending `register` call
        ordinal: usize,
    },

    /// Scan attempted through a matcher whose automaton was never built
    #[error("Automaton has not been built; call build() before scanning")]
    BuildNotInvoked,

    /// Registration attempted after the automaton was built
    #[error("Automaton already built; patterns cannot be added to a built automaton")]
    AlreadyBuilt,

    /// More patterns than `PatternId` can address
    #[error("Pattern limit of {limit} exceeded")]
    PatternLimit { limit: usize },

    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeadassetError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (analysis can continue).
    ///
    /// An unreadable file or a bad config entry only loses part of the
    /// corpus; automaton misuse is a programming error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Config { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadasset results.
pub type DeadassetResult<T> = Result<T, DeadassetError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadassetResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadassetResult<T> {
        self.map_err(|e| DeadassetError::io(path, e))
    }
}
