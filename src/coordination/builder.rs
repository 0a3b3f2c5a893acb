use std::path::PathBuf;
use std::time::Duration;

use crate::{
    error::{Result, SelectorError},
    population::{Population, DEFAULT_CAPACITY},
    protocol::SharedFiles,
    selection::{FemoSelection, SelectionStrategy},
};

use super::{
    hooks::{NoHooks, PhaseHooks},
    schedule::{PollSchedule, Sleeper, ThreadSleeper},
    Selector,
};

/// Poll interval used when none is given.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Fluent construction of a [`Selector`].
///
/// Shared files and the local parameter file are required. Everything else
/// has a default: FEMO selection, no hooks, one second polls on the current
/// thread.
///
/// ```
/// use femo::coordination::SelectorBuilder;
/// use std::time::Duration;
///
/// let selector = SelectorBuilder::new()
///     .with_prefix("run_")
///     .with_local_parameters("femo_param.txt")
///     .with_poll_interval(Duration::from_millis(200))
///     .build()
///     .unwrap();
///
/// assert_eq!(selector.schedule().interval(), Duration::from_millis(200));
/// ```
pub struct SelectorBuilder<S = FemoSelection, H = NoHooks, Z = ThreadSleeper> {
    files: Option<SharedFiles>,
    local_parameters: Option<PathBuf>,
    poll_interval: Duration,
    initial_capacity: usize,
    strategy: S,
    hooks: H,
    sleeper: Z,
}

impl SelectorBuilder {
    pub fn new() -> Self {
        Self {
            files: None,
            local_parameters: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_capacity: DEFAULT_CAPACITY,
            strategy: FemoSelection::new(),
            hooks: NoHooks,
            sleeper: ThreadSleeper,
        }
    }
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, H, Z> SelectorBuilder<S, H, Z> {
    pub fn with_files(mut self, files: SharedFiles) -> Self {
        self.files = Some(files);
        self
    }

    /// Derives the shared files from a filename prefix.
    pub fn with_prefix(self, prefix: &str) -> Self {
        self.with_files(SharedFiles::from_prefix(prefix))
    }

    pub fn with_local_parameters(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_parameters = Some(path.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Slots allocated by the population on first use.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_strategy<S2>(self, strategy: S2) -> SelectorBuilder<S2, H, Z> {
        SelectorBuilder {
            files: self.files,
            local_parameters: self.local_parameters,
            poll_interval: self.poll_interval,
            initial_capacity: self.initial_capacity,
            strategy,
            hooks: self.hooks,
            sleeper: self.sleeper,
        }
    }

    pub fn with_hooks<H2>(self, hooks: H2) -> SelectorBuilder<S, H2, Z> {
        SelectorBuilder {
            files: self.files,
            local_parameters: self.local_parameters,
            poll_interval: self.poll_interval,
            initial_capacity: self.initial_capacity,
            strategy: self.strategy,
            hooks,
            sleeper: self.sleeper,
        }
    }

    pub fn with_sleeper<Z2>(self, sleeper: Z2) -> SelectorBuilder<S, H, Z2> {
        SelectorBuilder {
            files: self.files,
            local_parameters: self.local_parameters,
            poll_interval: self.poll_interval,
            initial_capacity: self.initial_capacity,
            strategy: self.strategy,
            hooks: self.hooks,
            sleeper,
        }
    }
}

impl<S, H, Z> SelectorBuilder<S, H, Z>
where
    S: SelectionStrategy,
    H: PhaseHooks,
    Z: Sleeper,
{
    /// # Errors
    ///
    /// Returns [`SelectorError::Configuration`] if the shared files or the
    /// local parameter file were not given, or if the poll interval is too
    /// short.
    pub fn build(self) -> Result<Selector<S, H, Z>> {
        let files = self.files.ok_or_else(|| {
            SelectorError::Configuration("shared files not specified".to_string())
        })?;

        let local_parameters = self.local_parameters.ok_or_else(|| {
            SelectorError::Configuration("local parameter file not specified".to_string())
        })?;

        let schedule = PollSchedule::new(self.poll_interval, self.sleeper)?;

        Ok(Selector::new(
            files,
            local_parameters,
            self.strategy,
            self.hooks,
            schedule,
        )
        .with_population(Population::with_capacity(self.initial_capacity)))
    }
}
