//! # Protocol
//!
//! The selector and the variator never talk directly. They take turns through
//! a handful of plain-text files that share a common prefix:
//!
//! | Suffix | Content | Written by |
//! |---|---|---|
//! | `cfg` | run parameters `alpha`, `mu`, `lambda`, `dim` | operator |
//! | `ini` | initial population | variator |
//! | `var` | offspring | variator |
//! | `sel` | selected parents | selector |
//! | `arc` | archive (live identities) | selector |
//! | `sta` | state marker | both, by turn |
//!
//! A data file holding a lone `0` has been consumed by its reader; a writer
//! only writes into a consumed file.

pub mod exchange;
pub mod files;
pub mod parameters;
pub mod state;

pub use exchange::{
    emit_archive, emit_parents, ingest, ingest_initial, ingest_into, ingest_offspring,
    is_consumed, read_identities,
};
pub use files::SharedFiles;
pub use parameters::{LocalParameters, RunParameters, RunParametersBuilder};
pub use state::{ProtocolState, StateMarker};
