//! Visual geometry: loaded node hierarchies, mesh parts, and placed nodes
//!
//! A [`LoadedVisual`] is what the asset loader hands back: a node hierarchy
//! with rest poses, the mesh parts hanging off those nodes (each reduced to
//! its local bounds), and the animation clips. A [`VisualNode`] places a
//! shared visual in the world and carries its current pose.

use std::sync::Arc;

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use tactile_math::{mat4, Aabb, Mat4, Quat, Vec3};

use crate::animation::AnimationClip;
use crate::transform::Transform3D;

bitflags! {
    /// Flags indicating which parts of a node have changed since the last draw
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform or pose has changed
        const TRANSFORM = 1 << 0;
        /// Material has changed
        const MATERIAL = 1 << 1;
        /// Everything needs rebuilding
        const ALL = Self::TRANSFORM.bits() | Self::MATERIAL.bits();
    }
}

/// A flat-shaded material
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
    /// Emissive intensity added on top of lighting
    #[serde(default)]
    pub emissive: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    /// Create a new material with the given RGBA color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            base_color: [r, g, b, a],
            emissive: 0.0,
        }
    }

    /// Create a new opaque material with the given RGB color
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse `#rrggbb` or `0xrrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex
            .strip_prefix('#')
            .or_else(|| hex.strip_prefix("0x"))
            .unwrap_or(hex);
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let channel = |shift: u32| ((value >> shift) & 0xff) as f32 / 255.0;
        Some(Self::from_rgb(channel(16), channel(8), channel(0)))
    }

    /// Same color with a different alpha
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha;
        self
    }

    /// Same color with an emissive intensity
    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    /// White material
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);

    /// Near-black material of solid grid buttons
    pub const BUTTON: Self = Self::from_rgb(0.05, 0.05, 0.05);

    /// Translucent material of remote mirror cells
    pub const GLASS: Self = Self::new(0.85, 0.9, 0.95, 0.35);

    /// Warm accent used on model buttons
    pub const ACCENT: Self = Self::from_rgb(1.0, 0.55, 0.1);
}

/// Identity of one drawable leaf mesh, unique within a world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// A leaf mesh reduced to its local-space bounds
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart {
    /// Assigned when the owning node is registered with a world
    pub id: MeshId,
    pub name: String,
    /// Node the mesh hangs off, `None` for the model root
    pub node: Option<usize>,
    /// Bounds in the owning node's space
    pub bounds: Aabb,
}

impl MeshPart {
    pub fn new(name: impl Into<String>, node: Option<usize>, bounds: Aabb) -> Self {
        Self {
            id: MeshId::default(),
            name: name.into(),
            node,
            bounds,
        }
    }
}

/// Translation, rotation and scale of one hierarchy node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodePose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodePose {
    pub fn to_matrix(&self) -> Mat4 {
        mat4::mul(
            mat4::translation(self.translation),
            mat4::mul(self.rotation.to_mat4(), mat4::scale(self.scale)),
        )
    }
}

/// A node of a loaded model hierarchy
#[derive(Clone, Debug, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub parent: Option<usize>,
    pub rest: NodePose,
}

/// Geometry, hierarchy and clips resolved from one model file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedVisual {
    pub nodes: Vec<ModelNode>,
    pub parts: Vec<MeshPart>,
    pub clips: Vec<AnimationClip>,
}

impl LoadedVisual {
    /// A visual made of one box part with the given bounds
    pub fn single_box(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            nodes: Vec::new(),
            parts: vec![MeshPart::new(name, None, bounds)],
            clips: Vec::new(),
        }
    }

    /// Rest pose of every node
    pub fn rest_pose(&self) -> Vec<NodePose> {
        self.nodes.iter().map(|n| n.rest).collect()
    }

    /// Model-space matrix of every node under `pose`
    ///
    /// Parents are resolved recursively, so node order does not matter.
    pub fn node_matrices(&self, pose: &[NodePose]) -> Vec<Mat4> {
        let mut resolved: Vec<Option<Mat4>> = vec![None; self.nodes.len()];
        for index in 0..self.nodes.len() {
            self.resolve_node(index, pose, &mut resolved, 0);
        }
        resolved.into_iter().map(|m| m.unwrap_or(mat4::IDENTITY)).collect()
    }

    fn resolve_node(
        &self,
        index: usize,
        pose: &[NodePose],
        resolved: &mut [Option<Mat4>],
        depth: usize,
    ) -> Mat4 {
        if let Some(m) = resolved[index] {
            return m;
        }
        let local = pose
            .get(index)
            .copied()
            .unwrap_or(self.nodes[index].rest)
            .to_matrix();
        // Depth guard against malformed cyclic hierarchies
        let global = match self.nodes[index].parent {
            Some(parent) if parent < self.nodes.len() && depth < self.nodes.len() => {
                mat4::mul(self.resolve_node(parent, pose, resolved, depth + 1), local)
            }
            _ => local,
        };
        resolved[index] = Some(global);
        global
    }

    /// Model-space bounds of all parts in the rest pose
    pub fn bounds(&self) -> Option<Aabb> {
        let matrices = self.node_matrices(&self.rest_pose());
        self.parts
            .iter()
            .map(|part| part_bounds(part, &matrices, mat4::IDENTITY))
            .reduce(|a, b| a.union(&b))
    }

    /// Whether this visual has animation clips
    pub fn is_animated(&self) -> bool {
        !self.clips.is_empty()
    }
}

fn part_matrix(part: &MeshPart, node_matrices: &[Mat4], world: Mat4) -> Mat4 {
    match part.node.and_then(|i| node_matrices.get(i)) {
        Some(node) => mat4::mul(world, *node),
        None => world,
    }
}

fn part_bounds(part: &MeshPart, node_matrices: &[Mat4], world: Mat4) -> Aabb {
    part.bounds.transformed(part_matrix(part, node_matrices, world))
}

/// A loaded visual placed in the world
#[derive(Clone, Debug)]
pub struct VisualNode {
    /// Local transform of the node
    pub transform: Transform3D,
    /// Matrix of the group the node belongs to
    pub parent: Mat4,
    pub material: Material,
    pub visible: bool,
    visual: Arc<LoadedVisual>,
    /// Own copy of the parts so mesh ids can be assigned per placement
    parts: Vec<MeshPart>,
    pose: Vec<NodePose>,
    dirty: DirtyFlags,
}

impl VisualNode {
    /// Place a shared visual
    pub fn new(visual: Arc<LoadedVisual>, transform: Transform3D) -> Self {
        let parts = visual.parts.clone();
        let pose = visual.rest_pose();
        Self {
            transform,
            parent: mat4::IDENTITY,
            material: Material::default(),
            visible: true,
            visual,
            parts,
            pose,
            dirty: DirtyFlags::ALL,
        }
    }

    /// Place a single box of the given size centered on the node origin
    pub fn cube(name: &str, size: Vec3, transform: Transform3D) -> Self {
        let bounds = Aabb::from_center_size(Vec3::ZERO, size);
        Self::new(Arc::new(LoadedVisual::single_box(name, bounds)), transform)
    }

    /// Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Attach the node under a group matrix
    pub fn with_parent(mut self, parent: Mat4) -> Self {
        self.parent = parent;
        self
    }

    /// The shared loaded visual
    pub fn visual(&self) -> &Arc<LoadedVisual> {
        &self.visual
    }

    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [MeshPart] {
        &mut self.parts
    }

    /// Current pose, one entry per hierarchy node
    pub fn pose(&self) -> &[NodePose] {
        &self.pose
    }

    /// Replace the current pose
    pub fn set_pose(&mut self, pose: Vec<NodePose>) {
        self.pose = pose;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Set the vertical position of the node
    pub fn set_height(&mut self, y: f32) {
        if self.transform.position.y != y {
            self.transform.position.y = y;
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }

    /// Set the Euler rotation of the node
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.rotation = rotation;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// World matrix of the node origin
    pub fn world_matrix(&self) -> Mat4 {
        mat4::mul(self.parent, self.transform.to_matrix())
    }

    /// World matrix of every part, mapping its local bounds into the world
    pub fn part_matrices(&self) -> Vec<(MeshId, Mat4, Aabb)> {
        let nodes = self.visual.node_matrices(&self.pose);
        let world = self.world_matrix();
        self.parts
            .iter()
            .map(|part| (part.id, part_matrix(part, &nodes, world), part.bounds))
            .collect()
    }

    /// World-space bounds of every part, keyed by mesh id
    pub fn world_bounds(&self) -> Vec<(MeshId, Aabb)> {
        let nodes = self.visual.node_matrices(&self.pose);
        let world = self.world_matrix();
        self.parts
            .iter()
            .map(|part| (part.id, part_bounds(part, &nodes, world)))
            .collect()
    }

    /// Check if the node has changes since the last draw
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark the material as changed
    pub fn mark_material_dirty(&mut self) {
        self.dirty |= DirtyFlags::MATERIAL;
    }

    /// Clear all dirty flags after a draw
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_visual() -> LoadedVisual {
        LoadedVisual {
            nodes: vec![
                ModelNode {
                    name: "root".to_string(),
                    parent: None,
                    rest: NodePose {
                        translation: Vec3::new(0.0, 2.0, 0.0),
                        ..NodePose::default()
                    },
                },
                ModelNode {
                    name: "leaf".to_string(),
                    parent: Some(0),
                    rest: NodePose {
                        translation: Vec3::new(1.0, 0.0, 0.0),
                        scale: Vec3::splat(2.0),
                        ..NodePose::default()
                    },
                },
            ],
            parts: vec![MeshPart::new("leaf_mesh", Some(1), Aabb::from_center_size(Vec3::ZERO, Vec3::ONE))],
            clips: Vec::new(),
        }
    }

    #[test]
    fn test_material_from_hex() {
        let m = Material::from_hex("#ff8000").unwrap();
        assert_eq!(m.base_color[0], 1.0);
        assert!((m.base_color[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(m.base_color[2], 0.0);
        assert!(Material::from_hex("0x00ff00").is_some());
        assert!(Material::from_hex("#fff").is_none());
        assert!(Material::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_material_transparency() {
        assert!(Material::GLASS.is_transparent());
        assert!(!Material::BUTTON.is_transparent());
        assert!(Material::WHITE.with_alpha(0.5).is_transparent());
    }

    #[test]
    fn test_node_matrices_follow_parents() {
        let visual = two_level_visual();
        let matrices = visual.node_matrices(&visual.rest_pose());
        let origin = mat4::transform_point(matrices[1], Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_bounds_include_node_transforms() {
        let bounds = two_level_visual().bounds().unwrap();
        assert!((bounds.center() - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
        assert!((bounds.size() - Vec3::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let mut visual = two_level_visual();
        visual.nodes[0].parent = Some(1);
        let matrices = visual.node_matrices(&visual.rest_pose());
        assert_eq!(matrices.len(), 2);
    }

    #[test]
    fn test_world_bounds_follow_node_transform() {
        let mut node = VisualNode::cube("cube", Vec3::splat(4.0), Transform3D::from_position(Vec3::new(6.0, -1.0, 0.0)));
        let (_, b) = node.world_bounds()[0];
        assert!((b.center() - Vec3::new(6.0, -1.0, 0.0)).length() < 1e-6);

        node.set_height(-4.0);
        let (_, b) = node.world_bounds()[0];
        assert!((b.min.y - -6.0).abs() < 1e-6);
    }

    #[test]
    fn test_parent_matrix_applies() {
        let node = VisualNode::cube("cube", Vec3::ONE, Transform3D::identity())
            .with_parent(mat4::translation(Vec3::new(0.0, 0.0, 5.0)));
        let (_, b) = node.world_bounds()[0];
        assert!((b.center().z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut node = VisualNode::cube("cube", Vec3::ONE, Transform3D::identity());
        assert_eq!(node.dirty_flags(), DirtyFlags::ALL);
        node.clear_dirty();
        assert!(!node.is_dirty());
        node.set_height(0.0);
        assert!(!node.is_dirty());
        node.set_height(1.0);
        assert!(node.dirty_flags().contains(DirtyFlags::TRANSFORM));
        node.mark_material_dirty();
        assert!(node.dirty_flags().contains(DirtyFlags::MATERIAL));
    }
}
