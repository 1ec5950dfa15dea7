//! # spark-carousel
//!
//! Reactive carousel engine for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The engine is a pure state machine plus a timer seam:
//!
//! ```text
//! host events ─▶ Machine (pure transitions) ─▶ timer commands ─▶ Scheduler
//!                      │                                            │
//!                      ▼                                            ▼
//!              snapshot / signals  ◀───────── pump() ◀───────── firings
//! ```
//!
//! The machine owns active index, direction, progress fraction, and the
//! pause-reason set; it never touches a clock. Timer firings queue in the
//! scheduler until the host pumps them on its own thread, so every
//! mutation happens on one logical timeline and a manual navigation always
//! beats a racing auto-advance.
//!
//! Rendering is the host's job: poll [`Carousel::snapshot`] or subscribe
//! to the output signals, then position slides with the variant table in
//! [`animation`].
//!
//! ## Modules
//!
//! - [`types`] - Core types (Direction, PauseReasons, CarouselConfig, ...)
//! - [`engine`] - The pure state machine and swipe-gesture tracking
//! - [`scheduler`] - Timer scheduling (real threads or virtual time)
//! - [`mount`] - Mount/unmount lifecycle and reactive outputs
//! - [`animation`] - Closed enter/center/exit animation variant table
//! - [`theme`] - Process-wide tri-state theme preference

pub mod animation;
pub mod engine;
pub mod mount;
pub mod scheduler;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{Command, Event, Machine, Swipe, SwipeTracker};

pub use scheduler::{Firing, ManualScheduler, Scheduler, ThreadScheduler, TimerKind};

pub use mount::{mount, mount_manual, mount_with, Carousel};

pub use animation::{animation_spec, AnimationKind, AnimationSpec, Keyframe, Transition};

pub use theme::{
    init as init_theme, preference, preference_signal, resolved, resolved_theme,
    set_preference, set_system_scheme, system_scheme, reset_theme_state,
    MemoryStore, PreferenceStore, ResolvedTheme, ThemePreference,
};
