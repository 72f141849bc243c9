//! Error types for saw persistence.

use std::io;
use thiserror::Error;

/// Result type for saw persistence operations.
pub type SawResult<T> = Result<T, SawError>;

/// Errors that can occur while saving or reading a table.
#[derive(Debug, Error)]
pub enum SawError {
    /// A caller-supplied argument was unusable.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// An underlying filesystem or stream operation failed.
    #[error("saw I/O error: {source}")]
    Io {
        /// The originating I/O error.
        #[from]
        source: io::Error,
    },

    /// On-disk data was structurally unreadable.
    #[error("corrupt saw data: {reason}")]
    Corrupt {
        /// What made the data unreadable.
        reason: String,
    },

    /// The driver was interrupted before all column tasks completed.
    #[error("interrupted before all column tasks completed")]
    Interrupted,

    /// A column task failed outside of I/O (for example, it panicked).
    #[error("internal error: {reason}")]
    Internal {
        /// What the task reported.
        reason: String,
    },
}

impl SawError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a corrupt-data error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Returns true if this error indicates unreadable on-disk data.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
