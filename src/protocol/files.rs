use std::path::{Path, PathBuf};

use crate::protocol::state::StateMarker;

/// Paths of the shared files, derived from one filename prefix.
///
/// ```
/// use femo::protocol::SharedFiles;
/// use std::path::Path;
///
/// let files = SharedFiles::from_prefix("runs/knapsack_");
/// assert_eq!(files.sel, Path::new("runs/knapsack_sel"));
/// assert_eq!(files.sta, Path::new("runs/knapsack_sta"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFiles {
    /// Run parameters.
    pub cfg: PathBuf,
    /// Initial population, written by the variator.
    pub ini: PathBuf,
    /// Selected parents, written by the selector.
    pub sel: PathBuf,
    /// Archive of live identities, written by the selector.
    pub arc: PathBuf,
    /// Offspring, written by the variator.
    pub var: PathBuf,
    /// State marker.
    pub sta: PathBuf,
}

impl SharedFiles {
    /// Appends the fixed suffixes to `prefix`. The prefix is used verbatim,
    /// so `"dir/run."` yields `dir/run.cfg` and so on.
    pub fn from_prefix(prefix: &str) -> Self {
        let with_suffix = |suffix: &str| PathBuf::from(format!("{}{}", prefix, suffix));
        Self {
            cfg: with_suffix("cfg"),
            ini: with_suffix("ini"),
            sel: with_suffix("sel"),
            arc: with_suffix("arc"),
            var: with_suffix("var"),
            sta: with_suffix("sta"),
        }
    }

    /// Same as [`SharedFiles::from_prefix`] with the prefix placed inside `dir`.
    pub fn in_dir(dir: &Path, prefix: &str) -> Self {
        Self::from_prefix(&dir.join(prefix).to_string_lossy())
    }

    pub fn state_marker(&self) -> StateMarker {
        StateMarker::new(self.sta.clone())
    }
}
