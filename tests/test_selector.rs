use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use femo::{
    coordination::{HookStatus, PhaseHooks, Sleeper},
    error::Result,
    population::Population,
    protocol::{is_consumed, read_identities, ProtocolState, SharedFiles, StateMarker},
    rng::RandomNumberGenerator,
    SelectorBuilder, SelectorError,
};
use tempfile::{tempdir, TempDir};

const ALPHA: usize = 6;
const MU: usize = 4;
const LAMBDA: usize = 5;
const DIM: usize = 2;

/// Plays the variator every time the selector goes to sleep.
struct ScriptedVariator {
    files: SharedFiles,
    marker: StateMarker,
    rng: RandomNumberGenerator,
    next_identity: usize,
    rounds_left: usize,
    reset_after: Option<usize>,
    rounds_done: usize,
    sleeps: usize,
    resets_seen: usize,
}

impl ScriptedVariator {
    fn new(files: SharedFiles, rounds: usize) -> Self {
        Self {
            marker: files.state_marker(),
            files,
            rng: RandomNumberGenerator::from_seed(2024),
            next_identity: 0,
            rounds_left: rounds,
            reset_after: None,
            rounds_done: 0,
            sleeps: 0,
            resets_seen: 0,
        }
    }

    fn population_file(&mut self, records: usize) -> String {
        let mut content = format!("{}\n", (DIM + 1) * records);
        for _ in 0..records {
            let a = self.rng.pick_index(20).unwrap() as f64;
            let b = self.rng.pick_index(20).unwrap() as f64;
            content.push_str(&format!("{} {} {}\n", self.next_identity, a, b));
            self.next_identity += 1;
        }
        content.push_str("END");
        content
    }

    fn start(&mut self) {
        let ini = self.population_file(ALPHA);
        fs::write(&self.files.ini, ini).unwrap();
        self.marker.write(ProtocolState::InitReady).unwrap();
    }

    fn consume_selection(&mut self) {
        let archive: HashSet<_> = read_identities(&self.files.arc).unwrap().into_iter().collect();
        let parents = read_identities(&self.files.sel).unwrap();
        assert_eq!(parents.len(), MU);
        for parent in &parents {
            assert!(archive.contains(parent), "parent {} not in archive", parent);
        }
        fs::write(&self.files.sel, "0").unwrap();
        fs::write(&self.files.arc, "0").unwrap();
        self.rounds_done += 1;
    }
}

impl Sleeper for ScriptedVariator {
    fn sleep(&mut self, _duration: Duration) {
        self.sleeps += 1;
        match self.marker.read().unwrap() {
            Some(ProtocolState::Waiting) => {
                self.consume_selection();
                if self.reset_after == Some(self.rounds_done) {
                    self.reset_after = None;
                    self.marker.write(ProtocolState::ResetRequested).unwrap();
                } else if self.rounds_left > 0 {
                    self.rounds_left -= 1;
                    let var = self.population_file(LAMBDA);
                    fs::write(&self.files.var, var).unwrap();
                    self.marker.write(ProtocolState::SelectReady).unwrap();
                } else {
                    self.marker.write(ProtocolState::VariatorDone).unwrap();
                }
            }
            Some(ProtocolState::ResetDone) => {
                self.resets_seen += 1;
                self.start();
            }
            _ => {}
        }
    }
}

fn workspace() -> (TempDir, SharedFiles) {
    let dir = tempdir().unwrap();
    let files = SharedFiles::in_dir(dir.path(), "PISA_");
    fs::write(
        &files.cfg,
        format!("alpha {}\nmu {}\nlambda {}\ndim {}\n", ALPHA, MU, LAMBDA, DIM),
    )
    .unwrap();
    fs::write(dir.path().join("femo_param.txt"), "seed 1\n").unwrap();
    for path in [&files.sel, &files.arc, &files.var] {
        fs::write(path, "0").unwrap();
    }
    (dir, files)
}

#[test]
fn test_full_run_until_terminated() {
    let (dir, files) = workspace();
    let mut variator = ScriptedVariator::new(files.clone(), 10);
    variator.start();

    let mut selector = SelectorBuilder::new()
        .with_files(files.clone())
        .with_local_parameters(dir.path().join("femo_param.txt"))
        .with_poll_interval(Duration::from_millis(10))
        .with_initial_capacity(16)
        .with_sleeper(variator)
        .build()
        .unwrap();

    selector.run().unwrap();

    assert_eq!(
        files.state_marker().read().unwrap(),
        Some(ProtocolState::Terminated)
    );
    assert!(selector.population().is_empty());

    let variator = selector.schedule().sleeper();
    // Initial selection plus ten offspring rounds
    assert_eq!(variator.rounds_done, 11);
    assert_eq!(variator.next_identity, ALPHA + 10 * LAMBDA);
    assert!(variator.sleeps >= variator.rounds_done);
}

#[test]
fn test_reset_then_restart() {
    let (dir, files) = workspace();
    let mut variator = ScriptedVariator::new(files.clone(), 4);
    variator.reset_after = Some(2);
    variator.start();

    let mut selector = SelectorBuilder::new()
        .with_files(files.clone())
        .with_local_parameters(dir.path().join("femo_param.txt"))
        .with_initial_capacity(4)
        .with_poll_interval(Duration::from_millis(10))
        .with_sleeper(variator)
        .build()
        .unwrap();

    selector.run().unwrap();

    let variator = selector.schedule().sleeper();
    assert_eq!(variator.resets_seen, 1);
    // Initial plus one offspring round before the reset, initial plus three after it
    assert_eq!(variator.rounds_done, 2 + 4);
    assert_eq!(
        files.state_marker().read().unwrap(),
        Some(ProtocolState::Terminated)
    );
}

#[test]
fn test_waits_for_missing_marker() {
    let (dir, files) = workspace();
    let marker = files.state_marker();
    let ini = files.ini.clone();
    let mut polls = 0;

    let sleeper = |_: Duration| {
        polls += 1;
        if polls == 3 {
            fs::write(&ini, "6\n0 1 2\n1 2 1\nEND").unwrap();
            marker.write(ProtocolState::InitReady).unwrap();
        }
        if polls == 4 {
            marker.write(ProtocolState::VariatorDone).unwrap();
        }
    };

    fs::write(&files.cfg, "alpha 2\nmu 1\nlambda 1\ndim 2\n").unwrap();
    let mut selector = SelectorBuilder::new()
        .with_files(files.clone())
        .with_local_parameters(dir.path().join("femo_param.txt"))
        .with_initial_capacity(4)
        .with_sleeper(sleeper)
        .build()
        .unwrap();

    selector.run().unwrap();
    drop(selector);

    assert_eq!(polls, 4);
    assert_eq!(
        files.state_marker().read().unwrap(),
        Some(ProtocolState::Terminated)
    );
}

#[derive(Default)]
struct SlowShutdown {
    refusals: usize,
    archive_at_shutdown: Option<usize>,
}

impl PhaseHooks for SlowShutdown {
    fn on_variator_done(&mut self, _population: &Population) -> Result<HookStatus> {
        if self.refusals < 2 {
            self.refusals += 1;
            return Ok(HookStatus::NotReady);
        }
        Ok(HookStatus::Done)
    }

    fn on_terminate(&mut self, population: &Population) -> Result<()> {
        self.archive_at_shutdown = Some(population.size());
        Ok(())
    }
}

#[test]
fn test_hooks_can_delay_termination() {
    let (dir, files) = workspace();
    let mut variator = ScriptedVariator::new(files.clone(), 1);
    variator.start();

    let mut selector = SelectorBuilder::new()
        .with_files(files.clone())
        .with_local_parameters(dir.path().join("femo_param.txt"))
        .with_initial_capacity(16)
        .with_hooks(SlowShutdown::default())
        .with_sleeper(variator)
        .build()
        .unwrap();

    selector.run().unwrap();

    assert_eq!(selector.hooks().refusals, 2);
    assert!(selector.hooks().archive_at_shutdown.unwrap() >= 1);
    assert!(is_consumed(&files.sel).unwrap());
}

fn never_sleep(_: Duration) {
    panic!("selector should not wait");
}

#[test]
fn test_hard_failure_leaves_files_for_inspection() {
    let (dir, files) = workspace();
    // Header does not match alpha = 6, dim = 2
    fs::write(&files.ini, "3\n0 1 1\nEND").unwrap();
    files.state_marker().write(ProtocolState::InitReady).unwrap();

    let mut selector = SelectorBuilder::new()
        .with_files(files.clone())
        .with_local_parameters(dir.path().join("femo_param.txt"))
        .with_sleeper(never_sleep)
        .build()
        .unwrap();

    let err = selector.run().unwrap_err();
    assert!(matches!(
        err,
        SelectorError::Phase {
            state: ProtocolState::InitReady,
            ..
        }
    ));
    assert_eq!(
        files.state_marker().read().unwrap(),
        Some(ProtocolState::InitReady)
    );
    assert_eq!(fs::read_to_string(&files.ini).unwrap(), "3\n0 1 1\nEND");
}
