//! Rendering pipeline components

pub mod types;
pub mod mesh_pipeline;

pub use types::{unit_cube, InstanceRaw, SceneUniforms, Vertex};
pub use mesh_pipeline::{MeshPipeline, DEPTH_FORMAT};
