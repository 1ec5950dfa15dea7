//! Carousel state machine - pure transitions, no clock.
//!
//! The machine never touches a timer itself. Every transition is
//! `(state, event) -> state` plus a list of [`Command`]s telling the caller
//! which timers to arm or cancel. That keeps the whole engine testable
//! without a real clock: tests feed events and inspect commands.
//!
//! The coarse play state is derived, never stored:
//!
//! - `Playing` iff auto-play is on, there is more than one slide, and the
//!   pause-reason set is empty
//! - `Paused` iff auto-play is on, more than one slide, and some reason holds
//! - `Idle` otherwise (empty/single-slide carousel, or auto-play off)
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::engine::{Machine, Event};
//! use spark_carousel::CarouselConfig;
//!
//! let (mut machine, initial) = Machine::new(4, CarouselConfig::default());
//! // initial commands arm the dwell timer and the progress ticker
//! let commands = machine.apply(Event::Next);
//! assert_eq!(machine.active_index(), 1);
//! ```

use std::time::Duration;

use crate::types::{CarouselConfig, Direction, PauseReasons, PlayState, Snapshot};

// =============================================================================
// EVENTS
// =============================================================================

/// Everything that can happen to a mounted carousel.
///
/// Touch gestures are resolved by [`super::SwipeTracker`] before they reach
/// the machine: an accepted swipe arrives as `Next`/`Previous`, gesture
/// start/end arrive as `Pause(TOUCH)`/`Resume(TOUCH)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The dwell timer fired: auto-advance.
    DwellElapsed,
    /// The progress ticker fired; `delta` is time elapsed since the last tick.
    ProgressTick { delta: Duration },
    /// Manual navigation to the following slide.
    Next,
    /// Manual navigation to the preceding slide.
    Previous,
    /// Manual navigation to a specific slide (dot click). The mount layer
    /// validates the index first; an out-of-range index is ignored here.
    GoTo(usize),
    /// Add reasons to the pause set.
    Pause(PauseReasons),
    /// Remove reasons from the pause set.
    Resume(PauseReasons),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Timer side effects requested by a transition.
///
/// Arming replaces any outstanding timer of the same kind, which is what
/// structurally keeps the at-most-one-dwell / at-most-one-ticker invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Arm the one-shot dwell timer to fire after the given duration.
    ArmDwell(Duration),
    /// Cancel the outstanding dwell timer, if any.
    CancelDwell,
    /// Arm the repeating progress ticker at the given period.
    ArmTicker(Duration),
    /// Cancel the progress ticker, if any.
    CancelTicker,
}

// =============================================================================
// MACHINE
// =============================================================================

/// The carousel state machine. One per mounted carousel.
#[derive(Debug, Clone)]
pub struct Machine {
    config: CarouselConfig,
    slide_count: usize,
    active_index: usize,
    direction: Direction,
    /// Time spent in the current dwell interval. Frozen while paused,
    /// reset to zero on every accepted transition.
    elapsed: Duration,
    pause_reasons: PauseReasons,
}

impl Machine {
    /// Create a machine and the commands that start it.
    ///
    /// With more than one slide, auto-play on, and no initial pause reason,
    /// the returned commands arm the dwell timer and the progress ticker.
    /// Otherwise they are empty and the machine sits in `Idle`.
    pub fn new(slide_count: usize, config: CarouselConfig) -> (Self, Vec<Command>) {
        let machine = Self {
            config,
            slide_count,
            active_index: 0,
            direction: Direction::Forward,
            elapsed: Duration::ZERO,
            pause_reasons: PauseReasons::empty(),
        };
        let commands = if machine.is_playing() {
            machine.start_commands()
        } else {
            Vec::new()
        };
        (machine, commands)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Number of slides, fixed at mount.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Index of the active slide.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Direction of the most recent transition.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fraction of the dwell interval elapsed, clamped to `[0.0, 1.0]`.
    pub fn progress(&self) -> f32 {
        let dwell = self.config.dwell_interval.as_secs_f32();
        if dwell <= 0.0 {
            return 0.0;
        }
        (self.elapsed.as_secs_f32() / dwell).min(1.0)
    }

    /// The pause-reason set currently held.
    pub fn pause_reasons(&self) -> PauseReasons {
        self.pause_reasons
    }

    /// Derived coarse state. See the module docs for the rules.
    pub fn play_state(&self) -> PlayState {
        if !self.config.auto_play || self.slide_count <= 1 {
            PlayState::Idle
        } else if self.pause_reasons.is_empty() {
            PlayState::Playing
        } else {
            PlayState::Paused
        }
    }

    /// Render data for the current frame.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active_index: self.active_index,
            direction: self.direction,
            progress: self.progress(),
            paused: !self.pause_reasons.is_empty(),
        }
    }

    fn is_playing(&self) -> bool {
        self.play_state() == PlayState::Playing
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Apply one event, returning the timer commands it produced.
    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::DwellElapsed => self.auto_advance(),
            Event::ProgressTick { delta } => self.tick(delta),
            Event::Next => self.step(Direction::Forward),
            Event::Previous => self.step(Direction::Backward),
            Event::GoTo(index) => self.go_to(index),
            Event::Pause(reasons) => self.pause(reasons),
            Event::Resume(reasons) => self.resume(reasons),
        }
    }

    /// Dwell timer fired. Self-transition: advance forward, reset progress,
    /// re-arm. Without wrap the index holds at the end and the interval
    /// keeps cycling in place. Ignored when not `Playing` (a stale firing
    /// that raced a pause; the scheduler already dropped its generation,
    /// this is the second line of defense).
    fn auto_advance(&mut self) -> Vec<Command> {
        if !self.is_playing() {
            return Vec::new();
        }
        self.direction = Direction::Forward;
        if self.config.wrap {
            self.active_index = (self.active_index + 1) % self.slide_count;
        } else if self.active_index + 1 < self.slide_count {
            self.active_index += 1;
        }
        self.elapsed = Duration::ZERO;
        vec![Command::ArmDwell(self.config.dwell_interval)]
    }

    /// Progress ticker fired. Accumulate elapsed time, clamped so the
    /// fraction never overshoots 1.0 before the dwell fire resets it.
    fn tick(&mut self, delta: Duration) -> Vec<Command> {
        if !self.is_playing() {
            return Vec::new();
        }
        self.elapsed = (self.elapsed + delta).min(self.config.dwell_interval);
        Vec::new()
    }

    /// `next()` / `previous()`: wrap or clamp. A clamped boundary call is a
    /// complete no-op: no direction change, no progress reset, no timer
    /// commands.
    fn step(&mut self, direction: Direction) -> Vec<Command> {
        if self.slide_count <= 1 {
            return Vec::new();
        }
        let n = self.slide_count;
        let target = match (direction, self.config.wrap) {
            (Direction::Forward, true) => (self.active_index + 1) % n,
            (Direction::Forward, false) => {
                if self.active_index + 1 >= n {
                    return Vec::new();
                }
                self.active_index + 1
            }
            (Direction::Backward, true) => (self.active_index + n - 1) % n,
            (Direction::Backward, false) => {
                if self.active_index == 0 {
                    return Vec::new();
                }
                self.active_index - 1
            }
        };
        self.commit(target, direction)
    }

    /// Dot navigation. Same-index calls leave progress and timers untouched;
    /// otherwise direction follows the shorter wrap distance (ties forward).
    fn go_to(&mut self, index: usize) -> Vec<Command> {
        if index >= self.slide_count || index == self.active_index {
            return Vec::new();
        }
        let direction = if self.config.wrap {
            let n = self.slide_count;
            let forward = (index + n - self.active_index) % n;
            let backward = (self.active_index + n - index) % n;
            if forward <= backward {
                Direction::Forward
            } else {
                Direction::Backward
            }
        } else if index > self.active_index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.commit(index, direction)
    }

    /// Accepted manual transition: new index and direction now, progress to
    /// zero, dwell restarted from scratch when playing. While a pause reason
    /// holds, the index still moves but no timer is armed; timers come back
    /// when the last reason clears.
    fn commit(&mut self, index: usize, direction: Direction) -> Vec<Command> {
        self.active_index = index;
        self.direction = direction;
        self.elapsed = Duration::ZERO;
        if self.is_playing() {
            self.start_commands()
        } else {
            Vec::new()
        }
    }

    /// Add pause reasons. The transition into `Paused` cancels both timers;
    /// adding a second reason while already paused changes nothing.
    fn pause(&mut self, reasons: PauseReasons) -> Vec<Command> {
        let was_playing = self.is_playing();
        self.pause_reasons.insert(reasons);
        if was_playing && !self.is_playing() {
            vec![Command::CancelDwell, Command::CancelTicker]
        } else {
            Vec::new()
        }
    }

    /// Remove pause reasons. Only the removal that empties the set resumes,
    /// and the dwell timer comes back with the *remaining* time - progress
    /// was frozen, not reset.
    fn resume(&mut self, reasons: PauseReasons) -> Vec<Command> {
        let was_playing = self.is_playing();
        self.pause_reasons.remove(reasons);
        if !was_playing && self.is_playing() {
            let remaining = self.config.dwell_interval.saturating_sub(self.elapsed);
            vec![
                Command::ArmDwell(remaining),
                Command::ArmTicker(self.config.tick_interval),
            ]
        } else {
            Vec::new()
        }
    }

    /// Fresh dwell + ticker, used at mount and on accepted navigation.
    fn start_commands(&self) -> Vec<Command> {
        vec![
            Command::ArmDwell(self.config.dwell_interval),
            Command::ArmTicker(self.config.tick_interval),
        ]
    }
}

// =============================================================================
// TESTS
// =============================================================================
