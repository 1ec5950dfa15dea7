//! Mount API - Carousel lifecycle and reactive outputs.
//!
//! [`mount`] creates a [`Carousel`]: the state machine wired to a scheduler
//! and to output signals. All mutation happens on the owning thread - host
//! event handlers call the navigation/pause operations directly, and timer
//! firings are applied when the host calls [`Carousel::pump`] from its own
//! loop (the same tick-in-your-own-loop pattern as spark-tui's mount).
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::{mount, CarouselConfig};
//!
//! let mut carousel = mount(5, CarouselConfig::default())?;
//!
//! loop {
//!     carousel.pump(); // apply due timer firings
//!     let snapshot = carousel.snapshot();
//!     draw_slides(snapshot.active_index, snapshot.progress);
//! }
//!
//! carousel.unmount();
//! ```
//!
//! The output signals (`active_index_signal`, `progress_signal`, ...) let a
//! reactive host subscribe with `spark_signals::effect` instead of polling
//! snapshots.

use spark_signals::{signal, Signal};

use crate::engine::{Command, Event, Machine, Swipe, SwipeTracker};
use crate::scheduler::{Firing, ManualScheduler, Scheduler, ThreadScheduler, TimerKind};
use crate::types::{CarouselConfig, CarouselError, Direction, PauseReasons, PlayState, Snapshot};

// =============================================================================
// MOUNT
// =============================================================================

/// Mount a carousel on the wall clock.
///
/// With more than one slide and `auto_play` on, the dwell timer and the
/// progress ticker start immediately. `slide_count` of zero or one is not
/// an error: the carousel sits in `Idle` and navigation is a no-op.
pub fn mount(
    slide_count: usize,
    config: CarouselConfig,
) -> Result<Carousel<ThreadScheduler>, CarouselError> {
    mount_with(ThreadScheduler::new(), slide_count, config)
}

/// Mount a carousel on virtual time, for tests and host-driven loops.
pub fn mount_manual(
    slide_count: usize,
    config: CarouselConfig,
) -> Result<Carousel<ManualScheduler>, CarouselError> {
    mount_with(ManualScheduler::new(), slide_count, config)
}

/// Mount onto any scheduler.
pub fn mount_with<S: Scheduler>(
    scheduler: S,
    slide_count: usize,
    config: CarouselConfig,
) -> Result<Carousel<S>, CarouselError> {
    if config.dwell_interval.is_zero() {
        return Err(CarouselError::InvalidConfig("dwell interval must be > 0"));
    }
    if config.tick_interval.is_zero() {
        return Err(CarouselError::InvalidConfig("tick interval must be > 0"));
    }

    let (machine, commands) = Machine::new(slide_count, config);
    let snapshot = machine.snapshot();
    let tracker = SwipeTracker::new(config.swipe_threshold_px);

    let mut carousel = Carousel {
        machine,
        scheduler,
        tracker,
        mounted: true,
        active_index: signal(snapshot.active_index),
        direction: signal(snapshot.direction),
        progress: signal(snapshot.progress),
        paused: signal(snapshot.paused),
    };
    carousel.run_commands(commands);
    Ok(carousel)
}

// =============================================================================
// CAROUSEL
// =============================================================================

/// A mounted carousel: machine + scheduler + output signals.
///
/// Not `Send`: like every spark-signals consumer, a carousel lives on the
/// thread that created it. A multi-threaded host keeps one instance per
/// thread or funnels events through its own queue.
pub struct Carousel<S: Scheduler = ThreadScheduler> {
    machine: Machine,
    scheduler: S,
    tracker: SwipeTracker,
    mounted: bool,
    active_index: Signal<usize>,
    direction: Signal<Direction>,
    progress: Signal<f32>,
    paused: Signal<bool>,
}

impl<S: Scheduler> Carousel<S> {
    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Render data for the current frame. Pure read.
    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// Coarse engine state (`Idle` / `Playing` / `Paused`).
    pub fn play_state(&self) -> PlayState {
        self.machine.play_state()
    }

    /// Number of slides, fixed at mount.
    pub fn slide_count(&self) -> usize {
        self.machine.slide_count()
    }

    /// False after [`unmount`](Self::unmount).
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Reactive active-slide index.
    pub fn active_index_signal(&self) -> Signal<usize> {
        self.active_index.clone()
    }

    /// Reactive transition direction.
    pub fn direction_signal(&self) -> Signal<Direction> {
        self.direction.clone()
    }

    /// Reactive progress fraction for the indicator fill.
    pub fn progress_signal(&self) -> Signal<f32> {
        self.progress.clone()
    }

    /// Reactive paused flag.
    pub fn paused_signal(&self) -> Signal<bool> {
        self.paused.clone()
    }

    /// The scheduler, for hosts that drive virtual time.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable scheduler access (`ManualScheduler::advance` in tests).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Advance to the following slide (arrow click). Wraps or clamps per
    /// config; a clamped boundary call is a complete no-op.
    pub fn next(&mut self) {
        self.process(Event::Next);
    }

    /// Go back to the preceding slide (arrow click).
    pub fn previous(&mut self) {
        self.process(Event::Previous);
    }

    /// Jump to a slide (dot click). Same-index calls leave progress and the
    /// dwell timer untouched; an out-of-range index is rejected with no
    /// state change.
    pub fn go_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.machine.slide_count() {
            return Err(CarouselError::IndexOutOfRange {
                index,
                slide_count: self.machine.slide_count(),
            });
        }
        self.process(Event::GoTo(index));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pause / resume
    // -------------------------------------------------------------------------

    /// Add reasons to the pause set. Auto-advance stays suspended until
    /// every reason is cleared again.
    pub fn pause(&mut self, reasons: PauseReasons) {
        self.process(Event::Pause(reasons));
    }

    /// Remove reasons from the pause set.
    pub fn resume(&mut self, reasons: PauseReasons) {
        self.process(Event::Resume(reasons));
    }

    /// Pointer entered the carousel region.
    pub fn pointer_enter(&mut self) {
        self.pause(PauseReasons::HOVER);
    }

    /// Pointer left the carousel region.
    pub fn pointer_leave(&mut self) {
        self.resume(PauseReasons::HOVER);
    }

    /// Host tab/window visibility changed. Becoming visible clears only
    /// the HIDDEN reason - an active hover or touch keeps the engine
    /// paused.
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.resume(PauseReasons::HIDDEN);
        } else {
            self.pause(PauseReasons::HIDDEN);
        }
    }

    // -------------------------------------------------------------------------
    // Touch gestures
    // -------------------------------------------------------------------------

    /// Touch-start: pause immediately and record the gesture origin.
    pub fn touch_start(&mut self, x: f32, _y: f32) {
        self.tracker.start(x);
        self.pause(PauseReasons::TOUCH);
    }

    /// Touch-move: track displacement only.
    pub fn touch_move(&mut self, x: f32, _y: f32) {
        self.tracker.track(x);
    }

    /// Touch-end: a swipe past the threshold navigates; anything less
    /// resumes as if the gesture never happened.
    pub fn touch_end(&mut self) {
        match self.tracker.finish() {
            Some(Swipe::Left) => self.next(),
            Some(Swipe::Right) => self.previous(),
            None => {}
        }
        self.resume(PauseReasons::TOUCH);
    }

    // -------------------------------------------------------------------------
    // Pump / lifecycle
    // -------------------------------------------------------------------------

    /// Apply every timer firing that has come due. Call from the host's
    /// frame loop. No-op after unmount - a late firing mutates nothing.
    pub fn pump(&mut self) {
        if !self.mounted {
            return;
        }
        for Firing { kind, delta } in self.scheduler.drain() {
            let event = match kind {
                TimerKind::Dwell => Event::DwellElapsed,
                TimerKind::ProgressTick => Event::ProgressTick { delta },
            };
            let commands = self.machine.apply(event);
            self.run_commands(commands);
        }
        self.publish();
    }

    /// Cancel all timers and stop accepting events. Idempotent; reads
    /// (`snapshot`, signals) keep returning the final state.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.cancel(TimerKind::Dwell);
        self.scheduler.cancel(TimerKind::ProgressTick);
        self.mounted = false;
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn process(&mut self, event: Event) {
        if !self.mounted {
            return;
        }
        let commands = self.machine.apply(event);
        self.run_commands(commands);
        self.publish();
    }

    fn run_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ArmDwell(after) => self.scheduler.arm(TimerKind::Dwell, after),
                Command::CancelDwell => self.scheduler.cancel(TimerKind::Dwell),
                Command::ArmTicker(period) => self.scheduler.arm(TimerKind::ProgressTick, period),
                Command::CancelTicker => self.scheduler.cancel(TimerKind::ProgressTick),
            }
        }
    }

    /// Push machine state into the output signals, skipping no-op writes
    /// so effects only rerun on real changes.
    fn publish(&mut self) {
        let snapshot = self.machine.snapshot();
        if self.active_index.get() != snapshot.active_index {
            self.active_index.set(snapshot.active_index);
        }
        if self.direction.get() != snapshot.direction {
            self.direction.set(snapshot.direction);
        }
        if self.progress.get() != snapshot.progress {
            self.progress.set(snapshot.progress);
        }
        if self.paused.get() != snapshot.paused {
            self.paused.set(snapshot.paused);
        }
    }
}

impl<S: Scheduler> Drop for Carousel<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn config() -> CarouselConfig {
        CarouselConfig {
            dwell_interval: ms(3000),
            wrap: true,
            auto_play: true,
            swipe_threshold_px: 100.0,
            tick_interval: ms(30),
        }
    }

    fn mounted(slide_count: usize) -> Carousel<ManualScheduler> {
        mount_manual(slide_count, config()).unwrap()
    }

    /// Drive virtual time in tick-sized frames, pumping each frame.
    fn run_for(carousel: &mut Carousel<ManualScheduler>, total: Duration) {
        let step = ms(30);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            carousel.scheduler_mut().advance(step);
            carousel.pump();
            elapsed += step;
        }
    }

    #[test]
    fn test_mount_rejects_zero_intervals() {
        let mut bad = config();
        bad.dwell_interval = Duration::ZERO;
        assert!(matches!(
            mount_manual(3, bad),
            Err(CarouselError::InvalidConfig(_))
        ));

        let mut bad = config();
        bad.tick_interval = Duration::ZERO;
        assert!(matches!(
            mount_manual(3, bad),
            Err(CarouselError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mount_arms_both_timers() {
        let carousel = mounted(3);
        assert!(carousel.scheduler().is_armed(TimerKind::Dwell));
        assert!(carousel.scheduler().is_armed(TimerKind::ProgressTick));
        assert_eq!(carousel.play_state(), PlayState::Playing);
    }

    #[test]
    fn test_single_slide_never_arms() {
        let carousel = mounted(1);
        assert!(!carousel.scheduler().is_armed(TimerKind::Dwell));
        assert!(!carousel.scheduler().is_armed(TimerKind::ProgressTick));
        assert_eq!(carousel.play_state(), PlayState::Idle);
    }

    #[test]
    fn test_full_auto_cycle() {
        // 3 slides, 3 s dwell. One interval advances 0 -> 1
        // with progress back near zero; three intervals loop back to 0.
        let mut carousel = mounted(3);

        run_for(&mut carousel, ms(3000));
        let snapshot = carousel.snapshot();
        assert_eq!(snapshot.active_index, 1);
        assert!(snapshot.progress < 0.05, "progress {}", snapshot.progress);

        run_for(&mut carousel, ms(6000));
        assert_eq!(carousel.snapshot().active_index, 0);
    }

    #[test]
    fn test_progress_grows_linearly() {
        let mut carousel = mounted(3);
        run_for(&mut carousel, ms(1500));
        let progress = carousel.snapshot().progress;
        assert!((progress - 0.5).abs() < 0.05, "progress {progress}");
    }

    #[test]
    fn test_go_to_same_index_leaves_dwell_untouched() {
        let mut carousel = mounted(3);
        run_for(&mut carousel, ms(900));
        let remaining_before = carousel.scheduler().remaining(TimerKind::Dwell);
        let progress_before = carousel.snapshot().progress;

        carousel.go_to(0).unwrap();

        assert_eq!(
            carousel.scheduler().remaining(TimerKind::Dwell),
            remaining_before
        );
        assert_eq!(carousel.snapshot().progress, progress_before);
    }

    #[test]
    fn test_go_to_out_of_range_rejected() {
        let mut carousel = mounted(3);
        let err = carousel.go_to(3).unwrap_err();
        assert_eq!(
            err,
            CarouselError::IndexOutOfRange {
                index: 3,
                slide_count: 3
            }
        );
        assert_eq!(carousel.snapshot().active_index, 0);
    }

    #[test]
    fn test_navigation_restarts_dwell_from_scratch() {
        let mut carousel = mounted(4);
        run_for(&mut carousel, ms(2100));

        carousel.next();
        assert_eq!(carousel.snapshot().active_index, 1);
        assert_eq!(carousel.snapshot().progress, 0.0);
        assert_eq!(
            carousel.scheduler().remaining(TimerKind::Dwell),
            Some(ms(3000))
        );
    }

    #[test]
    fn test_manual_nav_wins_over_queued_dwell_fire() {
        // Dwell comes due but the host has not pumped yet; the user clicks
        // next in the same frame. Exactly one advance happens.
        let mut carousel = mounted(4);
        carousel.scheduler_mut().advance(ms(3000));

        carousel.next();
        carousel.pump();

        assert_eq!(carousel.snapshot().active_index, 1);
    }

    #[test]
    fn test_hover_pauses_and_freezes_progress() {
        let mut carousel = mounted(3);
        run_for(&mut carousel, ms(1200));
        carousel.pointer_enter();

        let frozen = carousel.snapshot().progress;
        assert!(frozen > 0.3);
        assert!(!carousel.scheduler().is_armed(TimerKind::Dwell));
        assert!(!carousel.scheduler().is_armed(TimerKind::ProgressTick));

        // Time passing while paused changes nothing.
        run_for(&mut carousel, ms(2000));
        assert_eq!(carousel.snapshot().progress, frozen);
        assert_eq!(carousel.snapshot().active_index, 0);

        // Resume picks up where it left off: the rest of the dwell, not a
        // fresh one.
        carousel.pointer_leave();
        assert_eq!(carousel.play_state(), PlayState::Playing);
        let remaining = carousel.scheduler().remaining(TimerKind::Dwell).unwrap();
        assert!(remaining < ms(3000));
    }

    #[test]
    fn test_visibility_resume_does_not_override_hover() {
        let mut carousel = mounted(3);
        carousel.pointer_enter();
        carousel.set_visible(false);
        carousel.set_visible(true);

        assert_eq!(carousel.play_state(), PlayState::Paused);
        assert!(carousel.snapshot().paused);

        carousel.pointer_leave();
        assert_eq!(carousel.play_state(), PlayState::Playing);
    }

    #[test]
    fn test_swipe_left_advances() {
        let mut carousel = mounted(3);
        carousel.touch_start(300.0, 40.0);
        assert!(carousel.snapshot().paused);

        carousel.touch_move(250.0, 42.0);
        carousel.touch_move(150.0, 45.0);
        carousel.touch_end();

        let snapshot = carousel.snapshot();
        assert_eq!(snapshot.active_index, 1);
        assert_eq!(snapshot.direction, Direction::Forward);
        assert!(!snapshot.paused);
        assert_eq!(carousel.play_state(), PlayState::Playing);
    }

    #[test]
    fn test_swipe_right_goes_back() {
        let mut carousel = mounted(3);
        carousel.touch_start(100.0, 40.0);
        carousel.touch_move(260.0, 40.0);
        carousel.touch_end();

        let snapshot = carousel.snapshot();
        assert_eq!(snapshot.active_index, 2); // wrapped backward from 0
        assert_eq!(snapshot.direction, Direction::Backward);
    }

    #[test]
    fn test_inconclusive_swipe_resumes() {
        // A sub-threshold gesture must never leave the carousel
        // permanently paused.
        let mut carousel = mounted(3);
        carousel.touch_start(200.0, 40.0);
        carousel.touch_move(170.0, 40.0);
        carousel.touch_end();

        assert_eq!(carousel.snapshot().active_index, 0);
        assert_eq!(carousel.play_state(), PlayState::Playing);
        assert!(carousel.scheduler().is_armed(TimerKind::Dwell));
    }

    #[test]
    fn test_unmount_stops_everything() {
        let mut carousel = mounted(3);
        // A dwell firing is already queued when unmount happens.
        carousel.scheduler_mut().advance(ms(3000));
        let before = carousel.snapshot();

        carousel.unmount();
        carousel.pump();
        carousel.next();
        let _ = carousel.go_to(1);

        assert_eq!(carousel.snapshot().active_index, before.active_index);
        assert!(!carousel.is_mounted());
        assert!(!carousel.scheduler().is_armed(TimerKind::Dwell));
        assert!(!carousel.scheduler().is_armed(TimerKind::ProgressTick));

        // Idempotent.
        carousel.unmount();
    }

    #[test]
    fn test_signals_track_state() {
        let mut carousel = mounted(3);
        let index_signal = carousel.active_index_signal();
        let paused_signal = carousel.paused_signal();

        carousel.next();
        assert_eq!(index_signal.get(), 1);

        carousel.pointer_enter();
        assert!(paused_signal.get());

        carousel.pointer_leave();
        assert!(!paused_signal.get());
    }

    #[test]
    fn test_progress_signal_follows_ticks() {
        let mut carousel = mounted(3);
        let progress_signal = carousel.progress_signal();
        run_for(&mut carousel, ms(600));
        let progress = progress_signal.get();
        assert!(progress > 0.15 && progress < 0.25, "progress {progress}");
    }

    #[test]
    fn test_clamp_mode_stops_at_last_slide() {
        let mut cfg = config();
        cfg.wrap = false;
        let mut carousel = mount_manual(3, cfg).unwrap();

        carousel.next();
        carousel.next();
        let remaining_before = carousel.scheduler().remaining(TimerKind::Dwell);

        // Boundary no-op: index, progress and the dwell timer untouched.
        carousel.next();
        assert_eq!(carousel.snapshot().active_index, 2);
        assert_eq!(
            carousel.scheduler().remaining(TimerKind::Dwell),
            remaining_before
        );
    }
}
