//! World container
//!
//! The World owns everything a composed scene contains: interactive objects
//! (keyed by [`ObjectKey`]), props, rigs and fire emitters. It assigns a
//! [`MeshId`] to every leaf mesh of an interactive object so a picked mesh
//! can be resolved back to its owner.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};
use tactile_math::Aabb;

use crate::fire::FireEmitter;
use crate::interactive::InteractiveObject;
use crate::prop::{ModelRig, Prop};
use crate::visual::{MeshId, VisualNode};

new_key_type! {
    /// Handle to an interactive object in the world
    pub struct ObjectKey;
}

/// Rotation added per update by prop sway, scaled by a sine
const SWAY_RATE: f32 = 0.001;

/// The composed scene
#[derive(Default)]
pub struct World {
    objects: SlotMap<ObjectKey, InteractiveObject>,
    props: Vec<Prop>,
    rigs: Vec<ModelRig>,
    emitters: Vec<FireEmitter>,
    mesh_owners: HashMap<MeshId, ObjectKey>,
    next_mesh: u32,
    sway: bool,
    clock: f32,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable prop sway
    pub fn with_sway(mut self, sway: bool) -> Self {
        self.sway = sway;
        self
    }

    /// Add an interactive object, assigning ids to its meshes
    pub fn add_object(&mut self, mut object: InteractiveObject) -> ObjectKey {
        let mut ids = Vec::new();
        for node in object.nodes_mut() {
            for part in node.parts_mut() {
                self.next_mesh += 1;
                part.id = MeshId(self.next_mesh);
                ids.push(part.id);
            }
        }
        let key = self.objects.insert(object);
        for id in ids {
            self.mesh_owners.insert(id, key);
        }
        key
    }

    pub fn add_prop(&mut self, prop: Prop) {
        self.props.push(prop);
    }

    pub fn add_rig(&mut self, rig: ModelRig) {
        self.rigs.push(rig);
    }

    pub fn add_emitter(&mut self, emitter: FireEmitter) {
        self.emitters.push(emitter);
    }

    pub fn get(&self, key: ObjectKey) -> Option<&InteractiveObject> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut InteractiveObject> {
        self.objects.get_mut(key)
    }

    /// Iterate over interactive objects with their keys
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &InteractiveObject)> {
        self.objects.iter()
    }

    /// Iterate mutably over interactive objects
    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut InteractiveObject> {
        self.objects.values_mut()
    }

    /// Keys of every object with the given uid
    pub fn objects_with_uid(&self, uid: &str) -> Vec<ObjectKey> {
        self.objects
            .iter()
            .filter(|(_, object)| object.uid() == uid)
            .map(|(key, _)| key)
            .collect()
    }

    /// Owner of a leaf mesh
    pub fn owner_of(&self, mesh: MeshId) -> Option<ObjectKey> {
        self.mesh_owners.get(&mesh).copied()
    }

    /// World-space bounds of every leaf mesh of every interactive object
    pub fn pick_candidates(&self) -> Vec<(MeshId, Aabb)> {
        self.objects
            .values()
            .flat_map(|object| object.pick_bounds())
            .collect()
    }

    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn rigs(&self) -> &[ModelRig] {
        &self.rigs
    }

    pub fn emitters(&self) -> &[FireEmitter] {
        &self.emitters
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.props.is_empty() && self.rigs.is_empty() && self.emitters.is_empty()
    }

    /// Start the animations of every rig
    pub fn start_rigs(&mut self) {
        for rig in &mut self.rigs {
            rig.start_animation();
        }
    }

    /// Advance every interactive object's transition
    ///
    /// Returns how many transitions completed.
    pub fn update_transitions(&mut self, dt: f32) -> usize {
        self.objects
            .values_mut()
            .map(|object| object.update(dt))
            .filter(|finished| *finished)
            .count()
    }

    /// Advance animation mixers and tweens of props and rigs
    pub fn update_animations(&mut self, dt: f32) {
        self.clock += dt;
        for (index, prop) in self.props.iter_mut().enumerate() {
            prop.update(dt);
            if self.sway {
                let mut rotation = prop.node.transform.rotation;
                rotation.y += (self.clock + index as f32 * 10.0).sin() * SWAY_RATE;
                prop.node.set_rotation(rotation);
            }
        }
        for rig in &mut self.rigs {
            rig.tick(dt);
        }
    }

    /// Set the `time` uniform of every fire emitter
    pub fn update_emitters(&mut self, time: f32) {
        for emitter in &mut self.emitters {
            emitter.update(time);
        }
    }

    /// Every visual node, in draw order
    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.objects
            .values()
            .flat_map(|object| object.nodes())
            .chain(self.props.iter().map(|prop| &prop.node))
            .chain(self.rigs.iter().flat_map(|rig| rig.props().iter().map(|prop| &prop.node)))
    }

    /// Clear dirty flags of every node after a draw
    pub fn clear_dirty(&mut self) {
        for object in self.objects.values_mut() {
            for node in object.nodes_mut() {
                node.clear_dirty();
            }
        }
        for prop in &mut self.props {
            prop.node.clear_dirty();
        }
        for rig in &mut self.rigs {
            for prop in rig.props_mut() {
                prop.node.clear_dirty();
            }
        }
    }

    /// Check if any node changed since the last draw
    pub fn is_dirty(&self) -> bool {
        self.nodes().any(VisualNode::is_dirty)
    }

    /// Clear everything
    pub fn clear(&mut self) {
        self.objects.clear();
        self.props.clear();
        self.rigs.clear();
        self.emitters.clear();
        self.mesh_owners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PressProfile;
    use crate::interactive::{ObjectIdentity, Role};
    use crate::transform::Transform3D;
    use crate::transition::TransitionSettings;
    use tactile_math::Vec3;

    fn cube(uid: &str, role: Role, x: f32) -> InteractiveObject {
        InteractiveObject::new(
            ObjectIdentity::new(uid, uid),
            role,
            VisualNode::cube("cube", Vec3::splat(4.0), Transform3D::from_position(Vec3::new(x, 0.0, 0.0))),
            PressProfile::new(-1.0, -4.0),
            TransitionSettings::default(),
        )
    }

    #[test]
    fn test_world_new() {
        let world = World::new();
        assert!(world.is_empty());
        assert_eq!(world.object_count(), 0);
    }

    #[test]
    fn test_add_object_assigns_unique_mesh_ids() {
        let mut world = World::new();
        let a = world.add_object(cube("a", Role::RemoteMirror, 0.0));
        let b = world.add_object(cube("b", Role::RemoteMirror, 6.0));

        let candidates = world.pick_candidates();
        assert_eq!(candidates.len(), 2);
        assert_ne!(candidates[0].0, candidates[1].0);
        assert_eq!(world.owner_of(candidates[0].0), Some(a));
        assert_eq!(world.owner_of(candidates[1].0), Some(b));
        assert_eq!(world.owner_of(MeshId(999)), None);
    }

    #[test]
    fn test_objects_with_uid() {
        let mut world = World::new();
        let a = world.add_object(cube("peer", Role::RemoteMirror, 0.0));
        world.add_object(cube("me", Role::Button { target: "peer".into() }, 6.0));
        let b = world.add_object(cube("peer", Role::RemoteMirror, 12.0));
        assert_eq!(world.objects_with_uid("peer"), vec![a, b]);
        assert!(world.objects_with_uid("nobody").is_empty());
    }

    #[test]
    fn test_update_transitions_counts_completions() {
        let mut world = World::new();
        let key = world.add_object(cube("a", Role::RemoteMirror, 0.0));
        world.add_object(cube("b", Role::RemoteMirror, 6.0));
        world.get_mut(key).unwrap().activate();

        let mut finished = 0;
        for _ in 0..100 {
            finished += world.update_transitions(1.0 / 60.0);
        }
        assert_eq!(finished, 1);
        assert_eq!(world.get(key).unwrap().visual_offset(), -4.0);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut world = World::new();
        let key = world.add_object(cube("a", Role::RemoteMirror, 0.0));
        assert!(world.is_dirty());
        world.clear_dirty();
        assert!(!world.is_dirty());
        world.get_mut(key).unwrap().activate();
        world.update_transitions(1.0 / 60.0);
        assert!(world.is_dirty());
    }

    #[test]
    fn test_nodes_include_props() {
        let mut world = World::new();
        world.add_object(cube("a", Role::RemoteMirror, 0.0));
        world.add_prop(Prop::from_node(
            "floor",
            VisualNode::cube("floor", Vec3::new(30.0, 1.0, 20.0), Transform3D::identity()),
        ));
        assert_eq!(world.nodes().count(), 2);
        // Props are not pickable
        assert_eq!(world.pick_candidates().len(), 1);
    }

    #[test]
    fn test_sway_rotates_props() {
        let mut world = World::new().with_sway(true);
        world.add_prop(Prop::from_node(
            "cloud",
            VisualNode::cube("cloud", Vec3::ONE, Transform3D::identity()),
        ));
        world.update_animations(0.5);
        assert_ne!(world.props()[0].node.transform.rotation.y, 0.0);
    }

    #[test]
    fn test_clear() {
        let mut world = World::new();
        world.add_object(cube("a", Role::RemoteMirror, 0.0));
        world.add_emitter(FireEmitter::with_seed(4, 1));
        world.clear();
        assert!(world.is_empty());
        assert!(world.pick_candidates().is_empty());
    }
}
