//! # PollSchedule
//!
//! The selector only sleeps when it is not its turn. How it sleeps is
//! injected through the [`Sleeper`] trait so tests can replace real time with
//! a scripted counterpart.
//!
//! ## Example
//!
//! ```rust
//! use femo::coordination::PollSchedule;
//! use std::time::Duration;
//!
//! let mut slept = Vec::new();
//! let mut schedule =
//!     PollSchedule::new(Duration::from_millis(250), |d: Duration| slept.push(d)).unwrap();
//! schedule.wait();
//! schedule.wait();
//! drop(schedule);
//!
//! assert_eq!(slept, vec![Duration::from_millis(250); 2]);
//! ```

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SelectorError};

/// Shortest accepted poll interval. Anything below hammers the shared
/// filesystem.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can suspend the selector between polls.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<F> Sleeper for F
where
    F: FnMut(Duration),
{
    fn sleep(&mut self, duration: Duration) {
        self(duration)
    }
}

/// A fixed poll interval and the sleeper that waits it out.
pub struct PollSchedule<Z = ThreadSleeper> {
    interval: Duration,
    sleeper: Z,
}

impl<Z: Sleeper> PollSchedule<Z> {
    /// # Errors
    ///
    /// Returns [`SelectorError::Configuration`] if `interval` is below
    /// [`MIN_POLL_INTERVAL`].
    pub fn new(interval: Duration, sleeper: Z) -> Result<Self> {
        if interval < MIN_POLL_INTERVAL {
            return Err(SelectorError::Configuration(format!(
                "poll interval {:?} is below the minimum of {:?}",
                interval, MIN_POLL_INTERVAL
            )));
        }
        Ok(Self { interval, sleeper })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps for one interval.
    pub fn wait(&mut self) {
        self.sleeper.sleep(self.interval);
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }
}

impl<Z> fmt::Debug for PollSchedule<Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollSchedule")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
