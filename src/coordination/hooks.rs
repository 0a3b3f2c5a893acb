use crate::error::Result;
use crate::population::Population;

/// Result of a phase hook that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// The phase is complete and the state may advance.
    Done,
    /// Not ready yet. The selector keeps the state and polls again.
    NotReady,
}

/// Callbacks for the phases that carry no selection work.
///
/// Every hook defaults to [`HookStatus::Done`]. Returning an error is a hard
/// failure and stops the selector.
pub trait PhaseHooks {
    /// The variator finished. Runs before the selector moves to TERMINATE.
    fn on_variator_done(&mut self, _population: &Population) -> Result<HookStatus> {
        Ok(HookStatus::Done)
    }

    /// The variator asks for a reset.
    fn on_reset_requested(&mut self, _population: &Population) -> Result<HookStatus> {
        Ok(HookStatus::Done)
    }

    /// Runs before the population is dropped for a reset.
    fn on_reset(&mut self, _population: &Population) -> Result<HookStatus> {
        Ok(HookStatus::Done)
    }

    /// Runs before the population is dropped at shutdown.
    fn on_terminate(&mut self, _population: &Population) -> Result<()> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl PhaseHooks for NoHooks {}
