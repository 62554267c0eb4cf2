//! GPU-compatible data types for the mesh pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use tactile_math::{mat4, Mat4};

/// A vertex of the shared unit cube
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Per-instance data: one box or one particle
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Maps the unit cube into the world (64 bytes)
    pub model: Mat4,
    /// RGBA color (16 bytes)
    pub color: [f32; 4],
    /// Emissive intensity, 1.0 is fully unlit (4 bytes)
    pub emissive: f32,
    pub _padding: [f32; 3],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 4], emissive: f32) -> Self {
        Self {
            model,
            color,
            emissive,
            _padding: [0.0; 3],
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.color[3] < 1.0
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::new(mat4::IDENTITY, [1.0; 4], 0.0)
    }
}

/// Scene uniforms for the mesh pass
/// Layout: 112 bytes total (must match mesh.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection * view (64 bytes)
    pub view_projection: Mat4,
    /// Direction toward the light + padding (16 bytes)
    pub light_dir: [f32; 3],
    pub _padding: f32,
    /// Lighting parameters (16 bytes)
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
    pub _padding2: [f32; 2],
    /// Camera position for view-dependent effects + padding (16 bytes)
    pub camera_position: [f32; 3],
    pub _padding3: f32,
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_projection: mat4::IDENTITY,
            light_dir: [0.4, 1.0, 0.6],
            _padding: 0.0,
            ambient_strength: 0.35,
            diffuse_strength: 0.9,
            _padding2: [0.0; 2],
            camera_position: [0.0; 3],
            _padding3: 0.0,
        }
    }
}

/// Unit cube centered on the origin, 4 vertices per face
pub fn unit_cube() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, tangent u, tangent v) with u x v == normal
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = [
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            vertices.push(Vertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}
