//! Placed, non-interactive models and the rigs grouping them
//!
//! A [`Prop`] is a loaded model in the world with an animation mixer (empty
//! for static geometry) and an optional one-shot rotation tween. A
//! [`ModelRig`] groups props under one transform and starts all their
//! animations together.

use tactile_math::{Easing, Mat4, Vec3};

use crate::animation::AnimationMixer;
use crate::descriptor::{ModelKind, RotationTween};
use crate::loader::LoadedModel;
use crate::transform::Transform3D;
use crate::visual::VisualNode;

/// Running state of a rotation tween
#[derive(Clone, Copy, Debug, PartialEq)]
struct TweenState {
    from: Vec3,
    to: Vec3,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl TweenState {
    /// Advance; returns the rotation and whether the tween finished
    fn advance(&mut self, dt: f32) -> (Vec3, bool) {
        self.elapsed += dt;
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return (self.to, true);
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        (self.from.lerp(self.to, t), false)
    }
}

/// A placed model with optional animation
#[derive(Clone, Debug)]
pub struct Prop {
    pub id: String,
    pub node: VisualNode,
    mixer: AnimationMixer,
    rotation: Option<RotationTween>,
    tween: Option<TweenState>,
}

impl Prop {
    /// Place a loaded model; clips are bound only for animated kinds
    pub fn from_loaded(model: &LoadedModel, transform: Transform3D) -> Self {
        let node = VisualNode::new(model.visual.clone(), transform);
        let mut mixer = AnimationMixer::new();
        let mut rotation = None;
        if let ModelKind::AnimatedProp { rotation: tween } = &model.descriptor.kind {
            for clip in &model.visual.clips {
                mixer.clip_action(clip.clone());
            }
            rotation = *tween;
        }
        Self {
            id: model.descriptor.id.clone(),
            node,
            mixer,
            rotation,
            tween: None,
        }
    }

    /// Wrap an already placed node
    pub fn from_node(id: impl Into<String>, node: VisualNode) -> Self {
        Self {
            id: id.into(),
            node,
            mixer: AnimationMixer::new(),
            rotation: None,
            tween: None,
        }
    }

    /// Start every clip and the rotation tween
    pub fn play(&mut self) {
        self.mixer.play_all();
        if let Some(tween) = self.rotation {
            self.tween = Some(TweenState {
                from: self.node.transform.rotation,
                to: tween.to,
                elapsed: 0.0,
                duration: tween.duration,
                easing: tween.easing,
            });
        }
    }

    /// Advance clips and the rotation tween by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.mixer.is_playing() {
            self.mixer.update(dt);
            let pose = self.mixer.pose(&self.node.visual().rest_pose());
            self.node.set_pose(pose);
        }
        if let Some(tween) = &mut self.tween {
            let (rotation, finished) = tween.advance(dt);
            self.node.set_rotation(rotation);
            if finished {
                self.tween = None;
            }
        }
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Whether the prop has clips or a tween to play
    pub fn is_animated(&self) -> bool {
        !self.mixer.actions().is_empty() || self.rotation.is_some()
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }
}

/// Models placed and animated as one group
#[derive(Clone, Debug)]
pub struct ModelRig {
    pub id: String,
    transform: Transform3D,
    props: Vec<Prop>,
    started: bool,
}

impl ModelRig {
    pub fn new(id: impl Into<String>, transform: Transform3D) -> Self {
        Self {
            id: id.into(),
            transform,
            props: Vec::new(),
            started: false,
        }
    }

    /// Matrix of the group node
    pub fn group_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// Add a prop; it is reparented under the group
    pub fn add(&mut self, mut prop: Prop) {
        prop.node.parent = self.group_matrix();
        self.props.push(prop);
    }

    /// Start every element's clips and rotation tweens
    ///
    /// Only the first call has an effect.
    pub fn start_animation(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!("Starting rig '{}' ({} elements)", self.id, self.props.len());
        for prop in &mut self.props {
            prop.play();
        }
    }

    /// Advance every element by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for prop in &mut self.props {
            prop.update(dt);
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut [Prop] {
        &mut self.props
    }
}
