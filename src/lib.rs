pub mod candidate;
pub mod coordination;
pub mod error;
pub mod population;
pub mod protocol;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use candidate::{Candidate, Identity};
pub use coordination::{Selector, SelectorBuilder};
pub use error::{IoResultExt, OptionExt, Result, SelectorError};
pub use population::Population;
pub use protocol::{ProtocolState, RunParameters, SharedFiles};
pub use selection::{FemoSelection, SelectionStrategy};
