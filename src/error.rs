//! # Error Types
//!
//! This module defines the error type shared by every part of the selector.
//! The variants follow the failure classes of the selector protocol: resource
//! exhaustion, malformed shared files, invalid identities, failed selections
//! and protocol state violations.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use femo::error::{Result, SelectorError};
//!
//! fn pick() -> Result<usize> {
//!     Err(SelectorError::SelectionFailed("population is empty".to_string()))
//! }
//!
//! assert!(pick().is_err());
//! ```
//!
//! Attaching the offending path to an I/O error:
//!
//! ```rust
//! use femo::error::{IoResultExt, SelectorError};
//! use std::path::Path;
//!
//! let path = Path::new("/definitely/not/here/sta");
//! let err = std::fs::read_to_string(path).with_path(path).unwrap_err();
//! assert!(matches!(err, SelectorError::FileAccess { .. }));
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use femo::error::{OptionExt, SelectorError};
//!
//! fn lowest(counters: &[u32]) -> femo::error::Result<u32> {
//!     counters.iter().min().copied().ok_or_else_selector(||
//!         SelectorError::SelectionFailed("no candidates".to_string())
//!     )
//! }
//!
//! assert_eq!(lowest(&[3, 1, 2]).unwrap(), 1);
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::candidate::Identity;
use crate::protocol::ProtocolState;

/// Represents errors that can occur while running the selector.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// Memory for the population could not be reserved.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// A shared file exists but its content does not follow the exchange format.
    #[error("Format error in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// A shared file is well formed but carries a value outside the expected range.
    #[error("Value out of range in {}: {reason}", path.display())]
    OutOfRange { path: PathBuf, reason: String },

    /// A shared file is missing or could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The identity is out of range or refers to an empty slot.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(Identity),

    /// The identity is already occupied by a live candidate.
    #[error("Duplicate identity: {0} is already live")]
    DuplicateIdentity(Identity),

    /// The population ran empty before enough parents were chosen.
    #[error("Selection failed: {0}")]
    SelectionFailed(String),

    /// The persisted state marker or a phase result violates the protocol.
    #[error("Protocol state error: {0}")]
    ProtocolState(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A hard failure raised while handling the given protocol state.
    #[error("Hard failure in state {state}: {source}")]
    Phase {
        state: ProtocolState,
        #[source]
        source: Box<SelectorError>,
    },
}

impl SelectorError {
    /// Returns true when the failure means "the counterpart is not done yet".
    ///
    /// Only malformed or out-of-range file content qualifies. Everything else
    /// is a hard failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SelectorError::Format { .. } | SelectorError::OutOfRange { .. }
        )
    }

    pub(crate) fn format(path: &Path, reason: impl Into<String>) -> Self {
        SelectorError::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(path: &Path, reason: impl Into<String>) -> Self {
        SelectorError::OutOfRange {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for selector operations.
pub type Result<T> = std::result::Result<T, SelectorError>;

/// Extension trait for I/O results that records which file failed.
pub trait IoResultExt<T> {
    /// Converts an `io::Error` into [`SelectorError::FileAccess`] for `path`.
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| SelectorError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, SelectorError>` using
    /// a closure to generate the error.
    fn ok_or_else_selector<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SelectorError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_selector<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SelectorError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let path = Path::new("run.var");
        assert!(SelectorError::format(path, "missing END").is_retryable());
        assert!(SelectorError::out_of_range(path, "bad count").is_retryable());
        assert!(!SelectorError::InvalidIdentity(4).is_retryable());
        assert!(!SelectorError::SelectionFailed("empty".to_string()).is_retryable());
        assert!(!SelectorError::FileAccess {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_name_the_file() {
        let err = SelectorError::format(Path::new("run.ini"), "missing END");
        assert_eq!(err.to_string(), "Format error in run.ini: missing END");
    }

    #[test]
    fn test_phase_wraps_source() {
        let err = SelectorError::Phase {
            state: ProtocolState::SelectReady,
            source: Box::new(SelectorError::InvalidIdentity(7)),
        };
        let message = err.to_string();
        assert!(message.contains("SELECT_READY"));
        assert!(message.contains("Invalid identity: 7"));
    }
}
