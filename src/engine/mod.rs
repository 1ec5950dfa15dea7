//! Engine Module - The carousel state machine and gesture tracking.
//!
//! - **Machine** - Pure transitions `(state, event) -> state` plus timer
//!   commands; no clock, no I/O. See [`machine`].
//! - **Gesture** - Swipe threshold arbitration for touch input. See
//!   [`gesture`].
//!
//! The mounted layer in [`crate::mount`] wires these to a scheduler and to
//! reactive output signals.

pub mod gesture;
pub mod machine;

pub use gesture::{Swipe, SwipeTracker};
pub use machine::{Command, Event, Machine};
