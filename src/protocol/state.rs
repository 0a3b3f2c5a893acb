//! # Protocol state
//!
//! The state marker file holds one integer that says whose turn it is. Values
//! `0..=11` make up the protocol range shared with the variator; only the
//! values listed in [`ProtocolState`] concern the selector. A marker that is
//! missing, empty, not an integer, or holds another in-range value means
//! "not the selector's turn". A value outside the range is a protocol
//! violation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IoResultExt, Result, SelectorError};

/// Highest value the state marker may legally hold.
pub const MAX_STATE_VALUE: i64 = 11;

/// States of the selector/variator protocol seen from the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    /// The variator wrote the initial population.
    InitReady,
    /// The selector handed its results over and waits for the variator.
    Waiting,
    /// The variator wrote offspring.
    SelectReady,
    /// The variator finished.
    VariatorDone,
    /// The selector should shut down.
    Terminate,
    /// The selector has shut down.
    Terminated,
    /// The variator asks for a reset.
    ResetRequested,
    /// The selector acknowledged the reset request.
    ResetReady,
    /// The selector dropped its population.
    ResetDone,
}

impl ProtocolState {
    /// Integer written to the state marker.
    pub fn value(self) -> i64 {
        match self {
            ProtocolState::InitReady => 1,
            ProtocolState::Waiting => 2,
            ProtocolState::SelectReady => 3,
            ProtocolState::VariatorDone => 5,
            ProtocolState::Terminate => 6,
            ProtocolState::Terminated => 7,
            ProtocolState::ResetRequested => 9,
            ProtocolState::ResetReady => 10,
            ProtocolState::ResetDone => 11,
        }
    }

    /// Maps a marker value back to a state. Returns `None` for values that
    /// do not concern the selector.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(ProtocolState::InitReady),
            2 => Some(ProtocolState::Waiting),
            3 => Some(ProtocolState::SelectReady),
            5 => Some(ProtocolState::VariatorDone),
            6 => Some(ProtocolState::Terminate),
            7 => Some(ProtocolState::Terminated),
            9 => Some(ProtocolState::ResetRequested),
            10 => Some(ProtocolState::ResetReady),
            11 => Some(ProtocolState::ResetDone),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProtocolState::InitReady => "INIT_READY",
            ProtocolState::Waiting => "WAITING",
            ProtocolState::SelectReady => "SELECT_READY",
            ProtocolState::VariatorDone => "VARIATOR_DONE",
            ProtocolState::Terminate => "TERMINATE",
            ProtocolState::Terminated => "TERMINATED",
            ProtocolState::ResetRequested => "RESET_REQUESTED",
            ProtocolState::ResetReady => "RESET_READY",
            ProtocolState::ResetDone => "RESET_DONE",
        }
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.value())
    }
}

/// Reader and writer for the state marker file.
#[derive(Debug, Clone)]
pub struct StateMarker {
    path: PathBuf,
}

impl StateMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current state.
    ///
    /// Returns `Ok(None)` when the marker cannot be read, does not start with
    /// an integer, or holds an in-range value that is not a selector state.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::ProtocolState`] for a value outside `0..=11`.
    pub fn read(&self) -> Result<Option<ProtocolState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "state marker unreadable");
                return Ok(None);
            }
        };

        let Some(value) = content
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i64>().ok())
        else {
            debug!(path = %self.path.display(), "state marker holds no integer");
            return Ok(None);
        };

        if !(0..=MAX_STATE_VALUE).contains(&value) {
            return Err(SelectorError::ProtocolState(format!(
                "invalid state {} read from {}",
                value,
                self.path.display()
            )));
        }

        Ok(ProtocolState::from_value(value))
    }

    /// Overwrites the marker with `state`.
    pub fn write(&self, state: ProtocolState) -> Result<()> {
        fs::write(&self.path, state.value().to_string()).with_path(&self.path)
    }
}
