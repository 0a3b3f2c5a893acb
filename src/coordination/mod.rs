pub mod builder;
pub mod hooks;
pub mod schedule;
pub mod selector;

pub use builder::{SelectorBuilder, DEFAULT_POLL_INTERVAL};
pub use hooks::{HookStatus, NoHooks, PhaseHooks};
pub use schedule::{PollSchedule, Sleeper, ThreadSleeper, MIN_POLL_INTERVAL};
pub use selector::{Cycle, PhaseOutcome, Selector};
