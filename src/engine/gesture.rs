//! Touch gesture tracking for swipe navigation.
//!
//! Tracks one touch gesture at a time: start coordinate on touch-start,
//! displacement on touch-move, and a verdict on touch-end. Only horizontal
//! displacement at or beyond the configured threshold counts as a swipe; anything
//! else is inconclusive and the caller resumes as if the gesture never
//! happened.
//!
//! Coordinates are device-independent pixels, whatever the host's input
//! layer reports.

// =============================================================================
// SWIPE VERDICT
// =============================================================================

/// Direction the finger travelled, once the threshold is met.
///
/// A leftward swipe pulls the next slide in; a rightward swipe pulls the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left (negative x displacement).
    Left,
    /// Finger moved right (positive x displacement).
    Right,
}

// =============================================================================
// SWIPE TRACKER
// =============================================================================

/// Per-carousel gesture state. One gesture at a time; a new touch-start
/// while one is in flight simply restarts tracking from the new origin.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold_px: f32,
    origin_x: Option<f32>,
    last_x: f32,
}

impl SwipeTracker {
    /// Create a tracker with the given horizontal threshold in pixels.
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold_px,
            origin_x: None,
            last_x: 0.0,
        }
    }

    /// Touch-start: record the gesture origin.
    pub fn start(&mut self, x: f32) {
        self.origin_x = Some(x);
        self.last_x = x;
    }

    /// Touch-move: track displacement only, no verdict yet.
    pub fn track(&mut self, x: f32) {
        if self.origin_x.is_some() {
            self.last_x = x;
        }
    }

    /// Touch-end: resolve the gesture. Returns `None` when no gesture was
    /// in flight or the displacement stayed under the threshold.
    pub fn finish(&mut self) -> Option<Swipe> {
        let origin = self.origin_x.take()?;
        let dx = self.last_x - origin;
        if dx.abs() < self.threshold_px {
            return None;
        }
        Some(if dx < 0.0 { Swipe::Left } else { Swipe::Right })
    }

    /// True between touch-start and touch-end.
    pub fn in_progress(&self) -> bool {
        self.origin_x.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
