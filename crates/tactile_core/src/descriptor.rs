//! Declarative model descriptors
//!
//! A [`ModelDescriptor`] says where a model lives, how it is placed, and what
//! *kind* of thing it is. The kind is a tagged variant resolved once when the
//! scene file is read; each variant carries only the fields it needs.

use serde::{Deserialize, Serialize};
use tactile_math::{Easing, Vec3};

use crate::ron_text;
use crate::transform::{Axis, Transform3D};
use crate::transition::TransitionStep;

/// Geometry container format of a model file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Gltf,
    Glb,
    Obj,
    Fbx,
}

impl ModelFormat {
    /// Guess the format from a file extension
    pub fn from_extension(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            _ => None,
        }
    }
}

/// Heights an interactive object moves between
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressProfile {
    /// Vertical offset at rest (released)
    pub rest: f32,
    /// Vertical offset while pressed
    pub pressed: f32,
}

impl PressProfile {
    pub fn new(rest: f32, pressed: f32) -> Self {
        Self { rest, pressed }
    }

    /// Target offset for a pressed state
    #[inline]
    pub fn target(&self, pressed: bool) -> f32 {
        if pressed {
            self.pressed
        } else {
            self.rest
        }
    }
}

impl Default for PressProfile {
    fn default() -> Self {
        // Model buttons sink from 0.3 to -0.2
        Self::new(0.3, -0.2)
    }
}

/// Parameters of a spiral fire particle emitter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmitterSettings {
    /// Number of particles in the field
    #[serde(default = "default_particle_count")]
    pub particle_count: u32,
    /// Offset of the emitter from the model origin
    #[serde(default)]
    pub offset: Vec3,
    /// Emitter scale; its mean drives the particle size uniform
    #[serde(default = "default_emitter_scale")]
    pub scale: Vec3,
}

fn default_particle_count() -> u32 {
    20_000
}

fn default_emitter_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            offset: Vec3::ZERO,
            scale: default_emitter_scale(),
        }
    }
}

/// One-shot rotation tween started together with a rig's clips
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationTween {
    /// Final Euler rotation in radians
    pub to: Vec3,
    /// Duration in seconds
    #[serde(default = "default_tween_duration")]
    pub duration: f32,
    #[serde(default = "default_tween_easing")]
    pub easing: Easing,
}

fn default_tween_duration() -> f32 {
    0.5
}

fn default_tween_easing() -> Easing {
    Easing::QuadOut
}

/// What a model is, resolved once at load time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Placed geometry with no behavior
    StaticProp,
    /// Geometry with animation clips and an optional rotation tween
    AnimatedProp {
        #[serde(default)]
        rotation: Option<RotationTween>,
    },
    /// A pressable model publishing its state to `target`
    ClickableButton {
        /// Peer identity the press is addressed to
        target: String,
        /// Display name
        #[serde(default)]
        name: String,
        #[serde(default)]
        press: PressProfile,
        #[serde(default = "default_button_step")]
        step: TransitionStep,
        #[serde(default = "default_tween_easing")]
        easing: Easing,
        /// Place an accent marker this far above the button
        #[serde(default)]
        accent_lift: Option<f32>,
    },
    /// Geometry with a fire particle emitter attached
    ParticleEmitterProp {
        #[serde(default)]
        emitter: EmitterSettings,
    },
    /// Geometry placed twice, once reflected across `axis`
    MirroredProp { axis: Axis },
}

fn default_button_step() -> TransitionStep {
    // 0.05 s tween
    TransitionStep::PerSecond(20.0)
}

/// Static declaration of a model to load and place
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Semantic id, unique within a scene
    pub id: String,
    /// Path of the model file, relative to the asset root
    pub source: String,
    /// Container format; guessed from the extension when absent
    #[serde(default)]
    pub format: Option<ModelFormat>,
    #[serde(default)]
    pub transform: Transform3D,
    pub kind: ModelKind,
}

impl ModelDescriptor {
    /// Create a static prop descriptor
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            format: None,
            transform: Transform3D::identity(),
            kind: ModelKind::StaticProp,
        }
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: ModelKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declared format, or the one implied by the file extension
    pub fn resolved_format(&self) -> Option<ModelFormat> {
        self.format.or_else(|| ModelFormat::from_extension(&self.source))
    }

    /// Whether this model carries animation clips worth mixing
    pub fn is_animated(&self) -> bool {
        matches!(self.kind, ModelKind::AnimatedProp { .. })
    }
}

/// A group of models placed and animated together
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigDescriptor {
    pub id: String,
    /// Transform of the group node
    #[serde(default)]
    pub transform: Transform3D,
    /// Elements, placed relative to the group
    pub elements: Vec<ModelDescriptor>,
}

impl RigDescriptor {
    /// Parse a rig from RON, skipping elements that don't parse
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        match prune_rig(text) {
            Some(pruned) => ron::from_str(&pruned),
            None => ron::from_str(text),
        }
    }
}

/// The RON list `list` without the model entries that don't parse
pub(crate) fn prune_models(list: &str) -> Option<String> {
    ron_text::retain_entries(list, |index, entry| match ron::from_str::<ModelDescriptor>(entry) {
        Ok(_) => Some(entry.to_string()),
        Err(e) => {
            log::warn!("Skipping malformed model #{}: {}", index, e);
            None
        }
    })
}

/// The RON rig `text` without the elements that don't parse
pub(crate) fn prune_rig(text: &str) -> Option<String> {
    ron_text::edit_field(text, "elements", prune_models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ModelFormat::from_extension("models/bowl/model.OBJ"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_extension("scene.gltf"), Some(ModelFormat::Gltf));
        assert_eq!(ModelFormat::from_extension("scene.glb"), Some(ModelFormat::Glb));
        assert_eq!(ModelFormat::from_extension("scene.fbx"), Some(ModelFormat::Fbx));
        assert_eq!(ModelFormat::from_extension("readme"), None);
    }

    #[test]
    fn test_resolved_format_prefers_declared() {
        let mut d = ModelDescriptor::new("cloud", "models/cloud/scene.gltf");
        assert_eq!(d.resolved_format(), Some(ModelFormat::Gltf));
        d.format = Some(ModelFormat::Glb);
        assert_eq!(d.resolved_format(), Some(ModelFormat::Glb));
    }

    #[test]
    fn test_press_profile_target() {
        let p = PressProfile::new(-1.0, -4.0);
        assert_eq!(p.target(true), -4.0);
        assert_eq!(p.target(false), -1.0);
    }

    #[test]
    fn test_rig_skips_malformed_elements() {
        let rig = RigDescriptor::from_ron(
            r#"(
                id: "fruits",
                elements: [
                    (id: "apple", source: "models/fruit.obj", kind: AnimatedProp(rotation: None)),
                    (id: "plum", source: "models/fruit.obj", kind: Juggled),
                    (id: "pear", kind: StaticProp),
                    (id: "lemon", source: "models/fruit.obj", kind: StaticProp),
                ],
            )"#,
        )
        .unwrap();
        let ids: Vec<&str> = rig.elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["apple", "lemon"]);
    }

    #[test]
    fn test_kind_from_ron() {
        let d: ModelDescriptor = ron::from_str(
            r#"(
                id: "orange_button",
                source: "models/button.glb",
                kind: ClickableButton(target: "peer-b"),
            )"#,
        )
        .unwrap();
        match d.kind {
            ModelKind::ClickableButton { target, press, step, .. } => {
                assert_eq!(target, "peer-b");
                assert_eq!(press, PressProfile::default());
                assert_eq!(step, TransitionStep::PerSecond(20.0));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_is_animated() {
        let d = ModelDescriptor::new("mango", "m.gltf")
            .with_kind(ModelKind::AnimatedProp { rotation: None });
        assert!(d.is_animated());
        assert!(!ModelDescriptor::new("bowl", "b.obj").is_animated());
    }
}
