//! Renderable instances - bridges World nodes to GPU instance buffers
//!
//! Each mesh part becomes one oriented box spanning its bounds; each fire
//! particle becomes one small unlit cube.

use tactile_core::{FireEmitter, VisualNode, World};
use tactile_math::{mat4, Vec3};

use crate::pipeline::InstanceRaw;

/// World units per unit of fire particle size
pub const PARTICLE_WORLD_SCALE: f32 = 0.004;

/// GPU-ready instances collected from a world
#[derive(Debug, Default)]
pub struct RenderableInstances {
    pub opaque: Vec<InstanceRaw>,
    pub transparent: Vec<InstanceRaw>,
}

impl RenderableInstances {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every visible node and particle of a world
    pub fn from_world(world: &World) -> Self {
        let mut result = Self::new();
        result.rebuild(world);
        result
    }

    /// Replace the contents with the current state of `world`
    pub fn rebuild(&mut self, world: &World) {
        self.clear();
        for node in world.nodes() {
            self.add_node(node);
        }
        for emitter in world.emitters() {
            self.add_emitter(emitter);
        }
    }

    /// Add one box per mesh part of a node
    pub fn add_node(&mut self, node: &VisualNode) {
        if !node.visible {
            return;
        }
        let material = node.material;
        for (_, matrix, bounds) in node.part_matrices() {
            let model = mat4::mul(matrix, bounds.unit_cube_matrix());
            let instance = InstanceRaw::new(model, material.base_color, material.emissive);
            if instance.is_transparent() {
                self.transparent.push(instance);
            } else {
                self.opaque.push(instance);
            }
        }
    }

    /// Add one unlit cube per particle
    pub fn add_emitter(&mut self, emitter: &FireEmitter) {
        self.opaque.reserve(emitter.len());
        for (position, size, [r, g, b]) in emitter.world_particles() {
            if size <= 0.0 {
                continue;
            }
            let model = mat4::mul(
                mat4::translation(position),
                mat4::scale(Vec3::splat(size * PARTICLE_WORLD_SCALE)),
            );
            self.opaque.push(InstanceRaw::new(model, [r, g, b, 1.0], 1.0));
        }
    }

    /// Order translucent instances back to front as seen from `eye`
    pub fn sort_transparent(&mut self, eye: Vec3) {
        let distance = |instance: &InstanceRaw| {
            let m = instance.model;
            (Vec3::new(m[3][0], m[3][1], m[3][2]) - eye).length_squared()
        };
        self.transparent
            .sort_by(|a, b| distance(b).total_cmp(&distance(a)));
    }

    /// Clear all instances
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactile_core::{Material, Transform3D};

    fn cube_at(x: f32, material: Material) -> VisualNode {
        VisualNode::cube("cube", Vec3::splat(2.0), Transform3D::from_position(Vec3::new(x, 0.0, 0.0)))
            .with_material(material)
    }

    #[test]
    fn test_node_becomes_box_instance() {
        let mut instances = RenderableInstances::new();
        instances.add_node(&cube_at(3.0, Material::WHITE));
        assert_eq!(instances.opaque.len(), 1);

        let m = instances.opaque[0].model;
        // Unit cube scaled to the 2-unit bounds and moved to x = 3
        assert_eq!(m[0][0], 2.0);
        assert_eq!(m[3][0], 3.0);
    }

    #[test]
    fn test_translucent_nodes_split() {
        let mut instances = RenderableInstances::new();
        instances.add_node(&cube_at(0.0, Material::WHITE));
        instances.add_node(&cube_at(1.0, Material::GLASS));
        assert_eq!(instances.opaque.len(), 1);
        assert_eq!(instances.transparent.len(), 1);
        assert_eq!(instances.len(), 2);
    }

    #[test]
    fn test_hidden_nodes_skipped() {
        let mut node = cube_at(0.0, Material::WHITE);
        node.visible = false;
        let mut instances = RenderableInstances::new();
        instances.add_node(&node);
        assert!(instances.is_empty());
    }

    #[test]
    fn test_sort_back_to_front() {
        let mut instances = RenderableInstances::new();
        instances.add_node(&cube_at(1.0, Material::GLASS));
        instances.add_node(&cube_at(9.0, Material::GLASS));
        instances.add_node(&cube_at(5.0, Material::GLASS));
        instances.sort_transparent(Vec3::ZERO);
        let xs: Vec<f32> = instances.transparent.iter().map(|i| i.model[3][0]).collect();
        assert_eq!(xs, vec![9.0, 5.0, 1.0]);
    }

    #[test]
    fn test_emitter_particles_are_unlit() {
        let emitter = FireEmitter::with_seed(16, 3);
        let mut instances = RenderableInstances::new();
        instances.add_emitter(&emitter);
        assert!(!instances.is_empty());
        assert!(instances.len() <= 16);
        assert!(instances.opaque.iter().all(|i| i.emissive == 1.0));
    }

    #[test]
    fn test_world_rebuild() {
        let mut world = World::new();
        world.add_emitter(FireEmitter::with_seed(8, 1));
        let first = RenderableInstances::from_world(&world);

        let mut instances = RenderableInstances::new();
        instances.rebuild(&world);
        instances.rebuild(&world);
        assert_eq!(instances.len(), first.len());
    }
}
