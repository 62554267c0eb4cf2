//! Core types for Tactile scenes
//!
//! This crate provides everything between a scene file and a drawable world:
//!
//! - [`ModelDescriptor`] / [`ModelKind`] - Declarative model list entries
//! - [`ModelLoader`] - Asset loading contract, with [`FileModelLoader`]
//! - [`InteractiveObject`] - Pressable buttons and remote mirrors
//! - [`Transition`] - Eased scalar transitions
//! - [`SyncEvent`] / [`EventSink`] - Press events published to peers
//! - [`SessionContext`] - Local identity and peers
//! - [`SceneFile`] / [`SceneProfile`] - Loadable scene description
//! - [`compose_scene`] - Builds a [`World`] from a scene and its assets
//! - [`ModelRig`], [`FireEmitter`], [`WaveAnimator`] - Scene animation

mod transform;
mod descriptor;
mod ron_text;
mod asset_error;
mod visual;
mod animation;
mod loader;
mod transition;
mod sync_event;
mod interactive;
mod prop;
mod fire;
mod wave;
mod session;
mod pattern;
mod scene;
mod world;
mod composer;

pub use transform::{Axis, Transform3D};
pub use descriptor::{
    EmitterSettings, ModelDescriptor, ModelFormat, ModelKind, PressProfile, RigDescriptor, RotationTween,
};
pub use asset_error::AssetError;
pub use visual::{DirtyFlags, LoadedVisual, Material, MeshId, MeshPart, ModelNode, NodePose, VisualNode};
pub use animation::{AnimationAction, AnimationChannel, AnimationClip, AnimationMixer, ChannelValues};
pub use loader::{
    load_gltf, load_obj, load_scene_assets, parse_obj, FileModelLoader, LoadedModel, LoadedRig, ModelLoader,
    SceneAssets,
};
pub use transition::{Transition, TransitionSettings, TransitionStep};
pub use sync_event::{EventSink, PressPosition, SyncEvent};
pub use interactive::{Accent, InteractiveObject, ObjectIdentity, Role};
pub use prop::{ModelRig, Prop};
pub use fire::{FireEmitter, FireParticle};
pub use wave::{WaveAnimator, WaveSettings};
pub use session::{Peer, SessionContext, SessionError};
pub use pattern::{CellKind, GridPattern, PatternError};
pub use scene::{
    CameraFraming, GridProfile, LightingProfile, ProjectionKind, SceneFile, SceneLoadError, SceneProfile,
    SceneSaveError,
};
pub use world::{ObjectKey, World};
pub use composer::{compose_grid, compose_model, compose_scene, ComposeOptions};

// Re-export commonly used types from tactile_math for convenience
pub use tactile_math::{Aabb, Easing, Mat4, Quat, Ray, Vec3};
