//! Scheduler Module - Timer scheduling behind a trait.
//!
//! The machine in [`crate::engine`] emits timer commands; a [`Scheduler`]
//! carries them out. Two implementations:
//!
//! - [`ThreadScheduler`] - real time, background sleeper threads feeding a
//!   channel (the shared-clock pattern from spark-tui's blink animation).
//! - [`ManualScheduler`] - virtual time for tests and host-driven loops;
//!   `advance()` moves the clock, nothing sleeps.
//!
//! Firings are never delivered behind the caller's back: they queue inside
//! the scheduler until [`Scheduler::drain`] is called on the owning thread.
//! Arming or cancelling a timer kind discards any undelivered firing of
//! that kind, which is what makes a manual navigation that races a dwell
//! fire safe - the stale firing is simply never seen.

use std::time::Duration;

pub mod manual;
pub mod thread;

pub use manual::ManualScheduler;
pub use thread::ThreadScheduler;

// =============================================================================
// TYPES
// =============================================================================

/// The two timers a carousel owns. At most one of each is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One-shot auto-advance timer.
    Dwell,
    /// Repeating progress ticker.
    ProgressTick,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub kind: TimerKind,
    /// Time this firing represents: the armed duration for a dwell fire,
    /// the tick period for a ticker fire.
    pub delta: Duration,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Timer scheduling seam between the engine and the host's clock.
///
/// Semantics both implementations must uphold:
///
/// - `arm` replaces an outstanding timer of the same kind and discards its
///   undelivered firings. `Dwell` is one-shot, `ProgressTick` repeats at
///   the given period until cancelled.
/// - `cancel` discards the outstanding timer *and* any firing of that kind
///   already queued but not yet drained.
/// - `drain` returns due firings in the order they came due, on the
///   caller's thread. Scheduling never mutates carousel state itself.
pub trait Scheduler {
    /// Arm a timer to fire after (and for the ticker, every) `after`.
    fn arm(&mut self, kind: TimerKind, after: Duration);

    /// Cancel the timer and purge its undelivered firings.
    fn cancel(&mut self, kind: TimerKind);

    /// Take every firing that has come due since the last drain.
    fn drain(&mut self) -> Vec<Firing>;

    /// True while a timer of this kind is outstanding.
    fn is_armed(&self, kind: TimerKind) -> bool;
}
