//! Scalar transitions
//!
//! A [`Transition`] drives one scalar (an object's vertical offset) from a
//! start value toward a target. Progress advances by a fixed per-frame step
//! or by a rate scaled with elapsed time, is clamped to `[0, 1]`, and the
//! value is shaped by an [`Easing`] curve. On completion the value snaps to
//! the target exactly.

use serde::{Serialize, Deserialize};
use tactile_math::{interpolate, Easing};

/// How far progress advances on each update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionStep {
    /// Fixed increment per update call, independent of elapsed time
    PerFrame(f32),
    /// Increment per second of elapsed time
    PerSecond(f32),
}

impl TransitionStep {
    /// Progress increment for an update of `dt` seconds
    #[inline]
    pub fn increment(self, dt: f32) -> f32 {
        match self {
            TransitionStep::PerFrame(step) => step,
            TransitionStep::PerSecond(rate) => rate * dt.max(0.0),
        }
    }

    /// Whether progress actually advances, so a transition can finish
    pub fn is_valid(self) -> bool {
        match self {
            TransitionStep::PerFrame(step) | TransitionStep::PerSecond(step) => step.is_finite() && step > 0.0,
        }
    }
}

impl Default for TransitionStep {
    fn default() -> Self {
        TransitionStep::PerFrame(0.03)
    }
}

/// Step and curve shared by the objects of a scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    pub step: TransitionStep,
    pub easing: Easing,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            step: TransitionStep::default(),
            easing: Easing::CubicOut,
        }
    }
}

impl TransitionSettings {
    /// These settings, with a step that never completes replaced by the default
    pub fn validated(self) -> Self {
        if self.step.is_valid() {
            return self;
        }
        let step = TransitionStep::default();
        log::warn!("Transition step {:?} never completes, using {:?}", self.step, step);
        Self { step, ..self }
    }
}

/// An eased interpolation of a single scalar
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Value the running transition started from
    current: f32,
    /// Value the transition settles on
    target: f32,
    /// Progress from 0.0 (start) to 1.0 (complete)
    progress: f32,
    /// Last computed value
    value: f32,
    active: bool,
    settings: TransitionSettings,
}

impl Transition {
    /// Create a settled transition resting at `value`
    ///
    /// A step that could never finish is replaced by the default step.
    pub fn at_rest(value: f32, settings: TransitionSettings) -> Self {
        Self {
            current: value,
            target: value,
            progress: 1.0,
            value,
            active: false,
            settings: settings.validated(),
        }
    }

    /// Start moving from the present value toward `target`
    ///
    /// A transition already in flight is retargeted from wherever it is now.
    pub fn start(&mut self, target: f32) {
        self.current = self.value;
        self.target = target;
        self.progress = 0.0;
        self.active = true;
    }

    /// Advance by `dt` seconds
    ///
    /// Returns true on the update that completes the transition.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }

        let increment = self.settings.step.increment(dt);
        self.progress = (self.progress + increment).clamp(0.0, 1.0);

        if self.progress >= 1.0 {
            self.value = self.target;
            self.current = self.target;
            self.active = false;
            return true;
        }

        self.value = interpolate(self.current, self.target, self.progress, self.settings.easing);
        false
    }

    /// Move the resting value without animating
    ///
    /// Ignored while a transition is running.
    pub fn set_value(&mut self, value: f32) {
        if !self.active {
            self.current = value;
            self.target = value;
            self.value = value;
        }
    }

    /// Current eased value
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the transition is heading to
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Progress in `[0, 1]`
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Check if a transition is running
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(step: TransitionStep, easing: Easing) -> TransitionSettings {
        TransitionSettings { step, easing }
    }

    #[test]
    fn test_at_rest_is_inactive() {
        let t = Transition::at_rest(-1.0, TransitionSettings::default());
        assert!(!t.is_active());
        assert_eq!(t.value(), -1.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_snaps_exactly_to_target() {
        // 0.03 does not divide 1.0 evenly in f32
        let mut t = Transition::at_rest(-1.0, settings(TransitionStep::PerFrame(0.03), Easing::BackOut));
        t.start(-4.0);
        let mut frames = 0;
        while t.is_active() {
            t.update(1.0 / 60.0);
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(frames, 34);
        assert_eq!(t.value(), -4.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_non_positive_steps_fall_back_to_default() {
        let steps = [
            TransitionStep::PerFrame(0.0),
            TransitionStep::PerFrame(-0.03),
            TransitionStep::PerSecond(0.0),
            TransitionStep::PerSecond(f32::NAN),
        ];
        for step in steps {
            assert!(!step.is_valid());
            let mut t = Transition::at_rest(-1.0, settings(step, Easing::QuadOut));
            assert_eq!(t.settings().step, TransitionStep::default());
            assert_eq!(t.settings().easing, Easing::QuadOut);

            t.start(-4.0);
            let mut frames = 0;
            while t.is_active() {
                t.update(1.0 / 60.0);
                frames += 1;
                assert!(frames < 1000, "{:?} never finished", step);
            }
            assert_eq!(t.value(), -4.0);
        }
    }

    #[test]
    fn test_valid_settings_unchanged() {
        let s = settings(TransitionStep::PerSecond(20.0), Easing::Linear);
        assert_eq!(s.validated(), s);
        assert!(TransitionStep::default().is_valid());
    }

    #[test]
    fn test_per_second_step_scales_with_dt() {
        let mut t = Transition::at_rest(0.3, settings(TransitionStep::PerSecond(20.0), Easing::Linear));
        t.start(-0.2);
        assert!(!t.update(0.025));
        assert!((t.progress() - 0.5).abs() < 1e-6);
        assert!((t.value() - 0.05).abs() < 1e-6);
        assert!(t.update(0.025));
        assert_eq!(t.value(), -0.2);
    }

    #[test]
    fn test_value_follows_easing() {
        let mut t = Transition::at_rest(0.0, settings(TransitionStep::PerFrame(0.5), Easing::CubicOut));
        t.start(10.0);
        t.update(0.0);
        let expected = interpolate(0.0, 10.0, 0.5, Easing::CubicOut);
        assert_eq!(t.value(), expected);
    }

    #[test]
    fn test_retarget_midway_starts_from_present_value() {
        let mut t = Transition::at_rest(0.0, settings(TransitionStep::PerFrame(0.5), Easing::Linear));
        t.start(10.0);
        t.update(0.0);
        assert_eq!(t.value(), 5.0);
        t.start(0.0);
        t.update(0.0);
        assert_eq!(t.value(), 2.5);
        t.update(0.0);
        assert_eq!(t.value(), 0.0);
        assert!(!t.is_active());
    }

    #[test]
    fn test_update_when_inactive_is_noop() {
        let mut t = Transition::at_rest(2.0, TransitionSettings::default());
        assert!(!t.update(1.0));
        assert_eq!(t.value(), 2.0);
    }

    #[test]
    fn test_set_value_ignored_while_active() {
        let mut t = Transition::at_rest(0.0, TransitionSettings::default());
        t.set_value(1.5);
        assert_eq!(t.value(), 1.5);
        t.start(3.0);
        t.set_value(-7.0);
        assert_ne!(t.value(), -7.0);
    }

    #[test]
    fn test_settings_from_ron() {
        let s: TransitionSettings = ron::from_str("(step: PerSecond(20.0), easing: quad_out)").unwrap();
        assert_eq!(s.step, TransitionStep::PerSecond(20.0));
        assert_eq!(s.easing, Easing::QuadOut);
    }
}
