//! Core types for spark-carousel.
//!
//! These types define the engine's vocabulary: navigation direction, the
//! pause-reason set, configuration, the render snapshot, and the error
//! taxonomy. Everything else builds on them.

use std::time::Duration;

// =============================================================================
// Direction
// =============================================================================

/// Direction of the most recent slide transition.
///
/// Presentation-only: the renderer uses it to pick enter/exit animation
/// vectors. It is never load-bearing for index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Moving toward higher indices (or wrapping past the end).
    #[default]
    Forward,
    /// Moving toward lower indices (or wrapping past the start).
    Backward,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// =============================================================================
// Pause Reasons (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Independent causes that suspend auto-advance.
    ///
    /// Each reason pauses on its own; the engine resumes only once the set
    /// is empty again. Combine with bitwise OR: `PauseReasons::HOVER |
    /// PauseReasons::HIDDEN`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PauseReasons: u8 {
        /// Pointer is hovering the carousel region.
        const HOVER = 1 << 0;
        /// A touch gesture is in progress.
        const TOUCH = 1 << 1;
        /// The host tab/window is not visible.
        const HIDDEN = 1 << 2;
    }
}

// =============================================================================
// Play State
// =============================================================================

/// Coarse engine state.
///
/// `Idle` covers the degenerate cases (zero or one slide, auto-play
/// disabled) in which no timer is ever armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// No timers, nothing scheduled. Manual navigation may still work.
    Idle,
    /// Dwell timer armed, progress ticking.
    Playing,
    /// Timers cancelled, progress frozen at its last value.
    Paused,
}

// =============================================================================
// Configuration
// =============================================================================

/// Carousel configuration, fixed at mount.
///
/// Dwell interval and swipe threshold vary a lot between carousels in the
/// wild (3 s feature rotators, 5 s testimonial decks, ~100 px thresholds),
/// so nothing here is a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    /// How long a slide stays active before auto-advancing.
    pub dwell_interval: Duration,
    /// Wrap past the ends instead of clamping.
    pub wrap: bool,
    /// Arm the dwell timer at all.
    pub auto_play: bool,
    /// Minimum horizontal displacement (device-independent pixels) for a
    /// touch gesture to count as a swipe.
    pub swipe_threshold_px: f32,
    /// Progress update granularity. Must keep visual progress continuous;
    /// the default gives ~33 updates/second.
    pub tick_interval: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            dwell_interval: Duration::from_millis(5000),
            wrap: true,
            auto_play: true,
            swipe_threshold_px: 100.0,
            tick_interval: Duration::from_millis(30),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Render data for one frame. Pure read, no side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Index of the active slide. 0 when the carousel is empty.
    pub active_index: usize,
    /// Direction of the most recent transition.
    pub direction: Direction,
    /// Fraction of the dwell interval elapsed, in `[0.0, 1.0]`.
    pub progress: f32,
    /// True while any pause reason is held.
    pub paused: bool,
}

// =============================================================================
// Errors
// =============================================================================

/// Everything that can go wrong. All failures are local, recoverable,
/// caller-visible rejections; state is never left half-changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    /// `go_to` with an index past the end. Never silently clamped, so
    /// caller bugs stay visible.
    #[error("slide index {index} out of range (slide count {slide_count})")]
    IndexOutOfRange { index: usize, slide_count: usize },

    /// Rejected configuration at mount (zero dwell or tick interval).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
