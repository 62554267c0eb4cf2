//! Interactive objects
//!
//! An [`InteractiveObject`] is anything that can be pressed: a solid grid
//! button, a translucent remote mirror cell, or a clickable model. It owns
//! its visual node, a pressed flag and a [`Transition`] driving the node's
//! vertical offset between the rest and pressed heights of its
//! [`PressProfile`].
//!
//! Buttons are clickable and publish a [`SyncEvent`] on every toggle.
//! Remote mirrors ignore clicks and are driven by the synchronization
//! listener through [`InteractiveObject::activate`], which never publishes.

use crate::descriptor::PressProfile;
use crate::sync_event::{EventSink, PressPosition, SyncEvent};
use crate::transition::{Transition, TransitionSettings};
use crate::visual::{MeshId, VisualNode};
use tactile_math::Aabb;

/// What an interactive object does when pressed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Clickable; each toggle is published to `target`
    Button { target: String },
    /// Not clickable; mirrors a peer's button through the channel
    RemoteMirror,
}

/// Display identity of an interactive object
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectIdentity {
    /// Identity used to match channel entries
    pub uid: String,
    /// Display name
    pub name: String,
    /// Optional title shown next to the name
    pub title: String,
}

impl ObjectIdentity {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            title: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Secondary node lifted above the main node by a fixed amount
#[derive(Clone, Debug)]
pub struct Accent {
    pub node: VisualNode,
    /// Height of the accent above the main node's offset
    pub lift: f32,
}

/// A clickable or remotely triggered object with an animated press state
#[derive(Clone, Debug)]
pub struct InteractiveObject {
    identity: ObjectIdentity,
    role: Role,
    node: VisualNode,
    accent: Option<Accent>,
    profile: PressProfile,
    pressed: bool,
    transition: Transition,
    /// Grid cell `(row, col)` for grid-composed objects
    cell: Option<(usize, usize)>,
}

impl InteractiveObject {
    /// Create an object resting, unpressed, at the profile's rest height
    pub fn new(
        identity: ObjectIdentity,
        role: Role,
        mut node: VisualNode,
        profile: PressProfile,
        settings: TransitionSettings,
    ) -> Self {
        node.set_height(profile.rest);
        Self {
            identity,
            role,
            node,
            accent: None,
            profile,
            pressed: false,
            transition: Transition::at_rest(profile.rest, settings),
            cell: None,
        }
    }

    /// Attach an accent node that follows the main node
    pub fn with_accent(mut self, node: VisualNode, lift: f32) -> Self {
        let mut accent = Accent { node, lift };
        accent.node.set_height(self.transition.value() + lift);
        self.accent = Some(accent);
        self
    }

    /// Record the grid cell this object occupies
    pub fn with_cell(mut self, row: usize, col: usize) -> Self {
        self.cell = Some((row, col));
        self
    }

    /// Flip the pressed state and publish the new position
    ///
    /// Does nothing for objects that are not clickable. Returns whether the
    /// toggle happened.
    pub fn toggle_press(&mut self, sink: &mut dyn EventSink) -> bool {
        let Role::Button { target } = &self.role else {
            return false;
        };
        let event = SyncEvent::new(
            self.identity.uid.clone(),
            target.clone(),
            PressPosition::from_pressed(!self.pressed),
        );
        self.flip();
        log::debug!("'{}' toggled {:?} for '{}'", self.identity.uid, event.position, event.target);
        sink.publish(event);
        true
    }

    /// Flip the pressed state without publishing
    pub fn activate(&mut self) {
        self.flip();
        log::debug!("'{}' activated, pressed = {}", self.identity.uid, self.pressed);
    }

    fn flip(&mut self) {
        self.pressed = !self.pressed;
        self.transition.start(self.profile.target(self.pressed));
    }

    /// Advance the transition by `dt` seconds and move the visual nodes
    ///
    /// Returns true on the update that completes a transition.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.transition.is_active() {
            return false;
        }
        let finished = self.transition.update(dt);
        self.apply_offset();
        finished
    }

    /// Move an idle object to `offset`
    ///
    /// Ignored while pressed or transitioning.
    pub fn set_idle_offset(&mut self, offset: f32) {
        if self.pressed || self.transition.is_active() {
            return;
        }
        self.transition.set_value(offset);
        self.apply_offset();
    }

    fn apply_offset(&mut self) {
        let y = self.transition.value();
        self.node.set_height(y);
        if let Some(accent) = &mut self.accent {
            accent.node.set_height(y + accent.lift);
        }
    }

    /// Current vertical offset of the visual
    #[inline]
    pub fn visual_offset(&self) -> f32 {
        self.transition.value()
    }

    /// Offset the running or last transition heads to
    #[inline]
    pub fn target_offset(&self) -> f32 {
        self.transition.target()
    }

    /// World-space bounds of every leaf mesh, accent included
    pub fn pick_bounds(&self) -> Vec<(MeshId, Aabb)> {
        let mut bounds = self.node.world_bounds();
        if let Some(accent) = &self.accent {
            bounds.extend(accent.node.world_bounds());
        }
        bounds
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    #[inline]
    pub fn is_clickable(&self) -> bool {
        matches!(self.role, Role::Button { .. })
    }

    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    pub fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn profile(&self) -> &PressProfile {
        &self.profile
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn cell(&self) -> Option<(usize, usize)> {
        self.cell
    }

    pub fn node(&self) -> &VisualNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut VisualNode {
        &mut self.node
    }

    pub fn accent(&self) -> Option<&Accent> {
        self.accent.as_ref()
    }

    /// Mutable access to every visual node of the object
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut VisualNode> {
        std::iter::once(&mut self.node).chain(self.accent.as_mut().map(|a| &mut a.node))
    }

    /// Every visual node of the object
    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        std::iter::once(&self.node).chain(self.accent.as_ref().map(|a| &a.node))
    }
}
