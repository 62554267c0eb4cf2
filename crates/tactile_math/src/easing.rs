//! Easing curves for timed transitions
//!
//! Every curve maps `[0, 1]` onto a shaped progress value and is pinned so
//! that `apply(0.0) == 0.0` and `apply(1.0) == 1.0` exactly. Curves with
//! overshoot (`BackOut`) may leave `[0, 1]` strictly between the endpoints.

use serde::{Serialize, Deserialize};

/// Overshoot constant of the back-out curve
pub const BACK_C1: f32 = 1.70158;
/// `BACK_C1 + 1`
pub const BACK_C3: f32 = BACK_C1 + 1.0;

/// Easing curve applied to transition progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Identity curve
    #[default]
    Linear,
    /// `1 - (1 - x)^2`
    QuadOut,
    /// `1 - (1 - x)^3`
    CubicOut,
    /// Symmetric cubic acceleration then deceleration
    CubicInOut,
    /// `1 - (1 - x)^5`
    QuintOut,
    /// `1 + c3 (x - 1)^3 + c1 (x - 1)^2`, settles with an overshoot
    BackOut,
}

impl Easing {
    /// All supported curves
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuintOut,
        Easing::BackOut,
    ];

    /// Evaluate the curve at `x`, clamped to `[0, 1]`
    pub fn apply(self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => x,
            Easing::QuadOut => 1.0 - (1.0 - x).powi(2),
            Easing::CubicOut => 1.0 - (1.0 - x).powi(3),
            Easing::CubicInOut => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuintOut => 1.0 - (1.0 - x).powi(5),
            Easing::BackOut => 1.0 + BACK_C3 * (x - 1.0).powi(3) + BACK_C1 * (x - 1.0).powi(2),
        }
    }
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Eased interpolation from `current` to `target` at `progress`
///
/// Progress outside `[0, 1]` is clamped, so the result never runs past the
/// curve's own range.
#[inline]
pub fn interpolate(current: f32, target: f32, progress: f32, easing: Easing) -> f32 {
    lerp(current, target, easing.apply(progress.clamp(0.0, 1.0)))
}
