//! Animation variants for slide transitions.
//!
//! A closed set of transition styles (slide, fade, zoom, scale), each
//! mapping to concrete enter/center/exit keyframes. The renderer picks a
//! kind, feeds it the [`Direction`] from the snapshot, and gets back the
//! parameters to drive whatever animation system it uses. Exhaustive
//! `match` everywhere - no string-keyed variant objects.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::animation::{AnimationKind, animation_spec};
//! use spark_carousel::Direction;
//!
//! let spec = animation_spec(AnimationKind::Slide, Direction::Forward);
//! // spec.enter.offset_x == 1.0: the new slide enters from the right
//! ```

use crate::types::Direction;

// =============================================================================
// Animation Kind
// =============================================================================

/// Transition style for the active slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationKind {
    /// Horizontal slide; enter/exit vectors follow the navigation direction.
    #[default]
    Slide,
    /// Plain crossfade.
    Fade,
    /// Fade combined with growth from slightly small.
    Zoom,
    /// Fade combined with shrink from slightly large.
    Scale,
}

impl AnimationKind {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slide" => Some(Self::Slide),
            "fade" => Some(Self::Fade),
            "zoom" => Some(Self::Zoom),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::Zoom => "zoom",
            Self::Scale => "scale",
        }
    }
}

// =============================================================================
// Parameter records
// =============================================================================

/// How a property travels between keyframes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Spring physics (stiffness, damping).
    Spring { stiffness: f32, damping: f32 },
    /// Plain eased tween over a duration in seconds.
    Ease { duration: f32 },
}

/// One keyframe of the slide element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Horizontal offset as a fraction of the slide width
    /// (1.0 = fully off-screen right, -1.0 = fully off-screen left).
    pub offset_x: f32,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Keyframe {
    /// The resting keyframe: centered, opaque, unscaled.
    pub const CENTER: Self = Self {
        offset_x: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    const fn new(offset_x: f32, opacity: f32, scale: f32) -> Self {
        Self {
            offset_x,
            opacity,
            scale,
        }
    }
}

/// Full parameter record for one transition: where the entering slide
/// comes from, where it rests, where the exiting slide goes, and how
/// movement and fade travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub enter: Keyframe,
    pub center: Keyframe,
    pub exit: Keyframe,
    /// Transition for position/scale.
    pub movement: Transition,
    /// Transition for opacity.
    pub fade: Transition,
}

// =============================================================================
// The variant table
// =============================================================================

/// Parameters for a transition of the given kind in the given direction.
///
/// Only `Slide` is direction-sensitive: moving forward, the new slide
/// enters from the right while the old one exits left, and mirrored when
/// moving backward. The other kinds animate in place.
pub fn animation_spec(kind: AnimationKind, direction: Direction) -> AnimationSpec {
    match kind {
        AnimationKind::Slide => {
            let from = match direction {
                Direction::Forward => 1.0,
                Direction::Backward => -1.0,
            };
            AnimationSpec {
                enter: Keyframe::new(from, 0.0, 1.0),
                center: Keyframe::CENTER,
                exit: Keyframe::new(-from, 0.0, 1.0),
                movement: Transition::Spring {
                    stiffness: 300.0,
                    damping: 30.0,
                },
                fade: Transition::Ease { duration: 0.2 },
            }
        }
        AnimationKind::Fade => AnimationSpec {
            enter: Keyframe::new(0.0, 0.0, 1.0),
            center: Keyframe::CENTER,
            exit: Keyframe::new(0.0, 0.0, 1.0),
            movement: Transition::Ease { duration: 0.5 },
            fade: Transition::Ease { duration: 0.5 },
        },
        AnimationKind::Zoom => AnimationSpec {
            enter: Keyframe::new(0.0, 0.0, 0.8),
            center: Keyframe::CENTER,
            exit: Keyframe::new(0.0, 0.0, 0.8),
            movement: Transition::Spring {
                stiffness: 300.0,
                damping: 30.0,
            },
            fade: Transition::Ease { duration: 0.3 },
        },
        AnimationKind::Scale => AnimationSpec {
            enter: Keyframe::new(0.0, 0.0, 1.2),
            center: Keyframe::CENTER,
            exit: Keyframe::new(0.0, 0.0, 0.8),
            movement: Transition::Spring {
                stiffness: 300.0,
                damping: 30.0,
            },
            fade: Transition::Ease { duration: 0.3 },
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
