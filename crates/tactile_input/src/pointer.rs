//! Pointer picking
//!
//! A pointer press is resolved in the same frame it arrives: the cursor is
//! converted to normalized device coordinates, a ray is cast from the active
//! camera, and the owner of the strictly nearest hit mesh is toggled.

use tactile_core::{EventSink, MeshId, ObjectKey, World};
use tactile_math::{Aabb, Ray};

/// Anything that can turn a point in NDC into a world-space ray
pub trait PickCamera {
    fn ray_from_ndc(&self, x: f32, y: f32) -> Ray;
}

/// Convert a window position in physical pixels to NDC (+Y up)
pub fn screen_to_ndc(px: f64, py: f64, width: u32, height: u32) -> (f32, f32) {
    let x = px / width as f64 * 2.0 - 1.0;
    let y = -(py / height as f64) * 2.0 + 1.0;
    (x as f32, y as f32)
}

/// The strictly nearest candidate hit by `ray`
///
/// Ties keep the earlier candidate.
pub fn pick_nearest(ray: &Ray, candidates: &[(MeshId, Aabb)]) -> Option<(MeshId, f32)> {
    let mut best: Option<(MeshId, f32)> = None;
    for (mesh, bounds) in candidates {
        let Some(distance) = ray.intersect_aabb(bounds) else {
            continue;
        };
        match best {
            Some((_, nearest)) if distance >= nearest => {}
            _ => best = Some((*mesh, distance)),
        }
    }
    best
}

/// Pointer state machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerState {
    Idle,
    /// A press waiting for its ray cast, in NDC
    RayCastPending { x: f32, y: f32 },
}

/// Tracks the cursor and turns presses into picks
#[derive(Debug)]
pub struct PointerInteraction {
    state: PointerState,
    cursor: Option<(f64, f64)>,
    viewport: (u32, u32),
}

impl PointerInteraction {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: PointerState::Idle,
            cursor: None,
            viewport: (width, height),
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Register a press at the last cursor position
    ///
    /// Returns false when the cursor position or viewport is unknown.
    pub fn pointer_down(&mut self) -> bool {
        let (width, height) = self.viewport;
        let Some((px, py)) = self.cursor else {
            return false;
        };
        if width == 0 || height == 0 {
            return false;
        }
        let (x, y) = screen_to_ndc(px, py, width, height);
        self.state = PointerState::RayCastPending { x, y };
        true
    }

    /// Resolve a pending press against the world and toggle the hit object
    pub fn resolve(&mut self, camera: &dyn PickCamera, world: &mut World, sink: &mut dyn EventSink) -> Option<ObjectKey> {
        let PointerState::RayCastPending { x, y } = self.state else {
            return None;
        };
        self.state = PointerState::Idle;

        let ray = camera.ray_from_ndc(x, y);
        let (mesh, distance) = pick_nearest(&ray, &world.pick_candidates())?;
        let key = world.owner_of(mesh)?;
        let object = world.get_mut(key)?;
        log::debug!("Picked '{}' at distance {:.2}", object.identity().name, distance);
        object.toggle_press(sink);
        Some(key)
    }
}
