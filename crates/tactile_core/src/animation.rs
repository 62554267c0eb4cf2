//! Keyframe animation clips and mixers
//!
//! Clips come from model files: each channel animates the translation,
//! rotation or scale of one hierarchy node with linearly interpolated
//! keyframes. A mixer owns the actions playing clips on one visual and
//! produces the pose for the current time.

use tactile_math::{Quat, Vec3};

use crate::visual::NodePose;

/// Keyframe values of one channel
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl ChannelValues {
    fn len(&self) -> usize {
        match self {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        }
    }
}

/// One animated property of one node
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationChannel {
    /// Index of the animated node
    pub node: usize,
    /// Keyframe times in seconds, ascending
    pub times: Vec<f32>,
    pub values: ChannelValues,
}

impl AnimationChannel {
    /// Keyframe pair and blend factor for `time`, clamped to the key range
    fn locate(&self, time: f32) -> Option<(usize, usize, f32)> {
        let count = self.times.len().min(self.values.len());
        if count == 0 {
            return None;
        }
        if count == 1 || time <= self.times[0] {
            return Some((0, 0, 0.0));
        }
        if time >= self.times[count - 1] {
            return Some((count - 1, count - 1, 0.0));
        }
        let next = self.times[..count].partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let t = if span > 0.0 { (time - self.times[prev]) / span } else { 0.0 };
        Some((prev, next, t))
    }

    /// Write the sampled value into `pose`
    pub fn apply(&self, time: f32, pose: &mut [NodePose]) {
        let Some(target) = pose.get_mut(self.node) else {
            return;
        };
        let Some((a, b, t)) = self.locate(time) else {
            return;
        };
        match &self.values {
            ChannelValues::Translation(v) => target.translation = v[a].lerp(v[b], t),
            ChannelValues::Rotation(v) => target.rotation = v[a].slerp(v[b], t),
            ChannelValues::Scale(v) => target.scale = v[a].lerp(v[b], t),
        }
    }
}

/// A named set of channels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Length in seconds, the last keyframe time across channels
    pub duration: f32,
    pub channels: Vec<AnimationChannel>,
}

impl AnimationClip {
    /// Create a clip; the duration is taken from the channels
    pub fn new(name: impl Into<String>, channels: Vec<AnimationChannel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }

    /// Sample every channel at `time` into `pose`
    pub fn sample(&self, time: f32, pose: &mut [NodePose]) {
        for channel in &self.channels {
            channel.apply(time, pose);
        }
    }
}

/// Playback state of one clip
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationAction {
    clip: AnimationClip,
    time: f32,
    playing: bool,
    looping: bool,
}

impl AnimationAction {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            playing: false,
            looping: true,
        }
    }

    /// Play once and hold the last frame
    pub fn with_once(mut self) -> Self {
        self.looping = false;
        self
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.time += dt;
        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
        } else if self.time > duration {
            if self.looping {
                self.time %= duration;
            } else {
                self.time = duration;
                self.playing = false;
            }
        }
    }
}

/// Drives the actions of one visual
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action for `clip`, returning its index
    pub fn clip_action(&mut self, clip: AnimationClip) -> usize {
        self.actions.push(AnimationAction::new(clip));
        self.actions.len() - 1
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    /// Start every action
    pub fn play_all(&mut self) {
        for action in &mut self.actions {
            action.play();
        }
    }

    /// Check if any action is running
    pub fn is_playing(&self) -> bool {
        self.actions.iter().any(AnimationAction::is_playing)
    }

    /// Advance playing actions by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.advance(dt);
        }
    }

    /// Pose produced by the actions on top of `rest`
    ///
    /// Actions that have never started leave the rest pose untouched.
    pub fn pose(&self, rest: &[NodePose]) -> Vec<NodePose> {
        let mut pose = rest.to_vec();
        for action in &self.actions {
            if action.playing || action.time > 0.0 {
                action.clip.sample(action.time, &mut pose);
            }
        }
        pose
    }
}
