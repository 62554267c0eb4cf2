//! Rendering for Tactile scenes
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera3D`] - Orbitable look-at camera, also used for picking rays
//! - [`pipeline::MeshPipeline`] - Instanced box rendering with Lambert lighting
//! - [`renderable::RenderableInstances`] - Converts World nodes and particles to instances

pub mod context;
pub mod camera;
pub mod error;
pub mod pipeline;
pub mod renderable;

pub use camera::Camera3D;
pub use context::RenderContext;
pub use error::RenderError;
pub use renderable::{RenderableInstances, PARTICLE_WORLD_SCALE};
