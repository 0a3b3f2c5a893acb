use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::{
    hooks::{HookStatus, PhaseHooks},
    schedule::{PollSchedule, Sleeper},
};
use crate::{
    candidate::Identity,
    error::{OptionExt, Result, SelectorError},
    population::Population,
    protocol::{
        emit_archive, emit_parents, ingest_initial, ingest_into, is_consumed,
        LocalParameters, ProtocolState, RunParameters, SharedFiles, StateMarker,
    },
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};

/// How a phase handler ended, short of a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The phase completed; the state marker advances.
    Success,
    /// Not ready yet; the state marker is left alone and polled again.
    SoftFail,
}

impl From<HookStatus> for PhaseOutcome {
    fn from(status: HookStatus) -> Self {
        match status {
            HookStatus::Done => PhaseOutcome::Success,
            HookStatus::NotReady => PhaseOutcome::SoftFail,
        }
    }
}

/// What one poll of the state marker led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Not the selector's turn.
    Idle,
    /// A phase succeeded and the marker now holds the given state.
    Advanced(ProtocolState),
    /// The phase for the given state soft-failed.
    Retry(ProtocolState),
    /// The marker asks the selector to shut down.
    Terminate,
}

/// The selector side of the protocol.
///
/// Owns the population and runs the state machine against the shared files.
/// Hard failures are logged with the state they occurred in and returned as
/// [`SelectorError::Phase`]; the caller is expected to exit.
pub struct Selector<S, H, Z> {
    files: SharedFiles,
    marker: StateMarker,
    local_parameters: PathBuf,
    population: Population,
    strategy: S,
    hooks: H,
    schedule: PollSchedule<Z>,
    params: Option<RunParameters>,
    rng: RandomNumberGenerator,
}

impl<S, H, Z> Selector<S, H, Z>
where
    S: SelectionStrategy,
    H: PhaseHooks,
    Z: Sleeper,
{
    /// Creates a selector with an empty population.
    ///
    /// # Arguments
    ///
    /// * `files` - The shared files used to talk to the variator.
    /// * `local_parameters` - Path of the file holding the `seed` entry.
    /// * `strategy` - The parent selection strategy.
    /// * `hooks` - Callbacks for the reset and termination phases.
    /// * `schedule` - Poll interval and sleeper used when it is not our turn.
    pub fn new(
        files: SharedFiles,
        local_parameters: impl Into<PathBuf>,
        strategy: S,
        hooks: H,
        schedule: PollSchedule<Z>,
    ) -> Self {
        Self {
            marker: files.state_marker(),
            files,
            local_parameters: local_parameters.into(),
            population: Population::new(),
            strategy,
            hooks,
            schedule,
            params: None,
            rng: RandomNumberGenerator::new(),
        }
    }

    /// Replaces the (empty) population, e.g. to use a smaller initial capacity.
    pub fn with_population(mut self, population: Population) -> Self {
        self.population = population;
        self
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Parameters read in the last INIT_READY phase, if any.
    pub fn run_parameters(&self) -> Option<&RunParameters> {
        self.params.as_ref()
    }

    pub fn files(&self) -> &SharedFiles {
        &self.files
    }

    pub fn local_parameters(&self) -> &Path {
        &self.local_parameters
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn schedule(&self) -> &PollSchedule<Z> {
        &self.schedule
    }

    /// Polls until the marker reads TERMINATE, then drops the population and
    /// writes TERMINATED.
    ///
    /// There is no other way out of the loop: a marker that never becomes
    /// readable keeps the selector polling forever.
    ///
    /// # Errors
    ///
    /// Returns the first hard failure.
    pub fn run(&mut self) -> Result<()> {
        info!(state_file = %self.marker.path().display(), "selector started");
        loop {
            match self.poll_once()? {
                Cycle::Terminate => break,
                Cycle::Advanced(_) => {}
                Cycle::Idle | Cycle::Retry(_) => self.schedule.wait(),
            }
        }
        self.terminate()
    }

    /// Reads the marker once and runs the matching phase.
    ///
    /// Never sleeps. TERMINATE is reported but not acted upon; see
    /// [`Selector::terminate`].
    pub fn poll_once(&mut self) -> Result<Cycle> {
        let observed = self.marker.read().inspect_err(|e| {
            error!(error = %e, "cannot interpret state marker");
        })?;
        let Some(state) = observed else {
            return Ok(Cycle::Idle);
        };

        let outcome = match state {
            ProtocolState::Terminate => return Ok(Cycle::Terminate),
            ProtocolState::InitReady => self.initialize(),
            ProtocolState::SelectReady => self.select_round(),
            ProtocolState::VariatorDone => self
                .hooks
                .on_variator_done(&self.population)
                .map(PhaseOutcome::from),
            ProtocolState::ResetRequested => self
                .hooks
                .on_reset_requested(&self.population)
                .map(PhaseOutcome::from),
            ProtocolState::ResetReady => self.reset(),
            ProtocolState::Waiting | ProtocolState::Terminated | ProtocolState::ResetDone => {
                return Ok(Cycle::Idle)
            }
        };

        match outcome {
            Ok(PhaseOutcome::Success) => {
                let next = successor(state).ok_or_else_selector(|| {
                    SelectorError::ProtocolState(format!("no transition out of {}", state))
                });
                let next = next
                    .and_then(|next| self.marker.write(next).map(|()| next))
                    .map_err(|e| hard_failure(state, e))?;
                info!(from = %state, to = %next, "state advanced");
                Ok(Cycle::Advanced(next))
            }
            Ok(PhaseOutcome::SoftFail) => {
                debug!(state = %state, "phase not ready, polling again");
                Ok(Cycle::Retry(state))
            }
            Err(e) => Err(hard_failure(state, e)),
        }
    }

    /// Runs the termination hook, drops the population and writes TERMINATED.
    pub fn terminate(&mut self) -> Result<()> {
        self.hooks
            .on_terminate(&self.population)
            .and_then(|()| {
                self.population.clear();
                self.params = None;
                self.marker.write(ProtocolState::Terminated)
            })
            .map_err(|e| hard_failure(ProtocolState::Terminate, e))?;
        info!("selector terminated");
        Ok(())
    }

    fn initialize(&mut self) -> Result<PhaseOutcome> {
        let params = RunParameters::from_file(&self.files.cfg)?;
        let local = LocalParameters::from_file(&self.local_parameters)?;
        info!(
            alpha = params.alpha(),
            mu = params.mu(),
            lambda = params.lambda(),
            dim = params.dimension(),
            seed = local.seed,
            "run parameters read"
        );
        self.params = Some(params);
        self.rng = RandomNumberGenerator::from_seed(local.seed);

        let initial = ingest_initial(&self.files.ini, &params, &mut self.population)?;
        if initial.is_empty() {
            return Err(SelectorError::format(
                &self.files.ini,
                "initial population was already consumed",
            ));
        }

        self.select_and_emit(&params, &initial)?;
        Ok(PhaseOutcome::Success)
    }

    fn select_round(&mut self) -> Result<PhaseOutcome> {
        if !is_consumed(&self.files.sel)? || !is_consumed(&self.files.arc)? {
            debug!("previous parents or archive not consumed yet");
            return Ok(PhaseOutcome::SoftFail);
        }

        let params = self.params.ok_or_else_selector(|| {
            SelectorError::ProtocolState(
                "offspring announced before the initial population".to_string(),
            )
        })?;

        let mut offspring = Vec::with_capacity(params.lambda());
        let ingested = ingest_into(
            &self.files.var,
            params.lambda(),
            params.dimension(),
            &mut self.population,
            &mut offspring,
        );
        match ingested {
            Ok(()) if offspring.is_empty() => {
                debug!("offspring file holds no fresh data");
                return Ok(PhaseOutcome::SoftFail);
            }
            Ok(()) => {}
            Err(e) if e.is_retryable() => {
                // The file is read again in full on the next poll
                for identity in offspring.drain(..) {
                    self.population.remove(identity)?;
                }
                warn!(error = %e, "offspring not readable yet");
                return Ok(PhaseOutcome::SoftFail);
            }
            Err(e) => return Err(e),
        }

        self.select_and_emit(&params, &offspring)?;
        Ok(PhaseOutcome::Success)
    }

    fn select_and_emit(&mut self, params: &RunParameters, new: &[Identity]) -> Result<()> {
        let parents = self
            .strategy
            .select(&mut self.population, new, params.mu(), &mut self.rng)?;
        emit_parents(&self.files.sel, &parents, &self.population)?;
        emit_archive(&self.files.arc, &self.population)?;
        info!(
            parents = parents.len(),
            archive = self.population.size(),
            "parents selected"
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<PhaseOutcome> {
        let status = self.hooks.on_reset(&self.population)?;
        if status == HookStatus::Done {
            self.population.clear();
            self.params = None;
            info!("population dropped for reset");
        }
        Ok(status.into())
    }
}

/// State written after the phase for `state` succeeds.
fn successor(state: ProtocolState) -> Option<ProtocolState> {
    match state {
        ProtocolState::InitReady | ProtocolState::SelectReady => Some(ProtocolState::Waiting),
        ProtocolState::VariatorDone => Some(ProtocolState::Terminate),
        ProtocolState::ResetRequested => Some(ProtocolState::ResetReady),
        ProtocolState::ResetReady => Some(ProtocolState::ResetDone),
        _ => None,
    }
}

fn hard_failure(state: ProtocolState, source: SelectorError) -> SelectorError {
    error!(phase = %state, error = %source, "hard failure");
    SelectorError::Phase {
        state,
        source: Box::new(source),
    }
}
