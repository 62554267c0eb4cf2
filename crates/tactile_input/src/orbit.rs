//! Orbit camera controller
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target in the view plane
//! - Scroll: dolly in/out (zoom for orthographic cameras)
//!
//! Motion is damped: each update applies a fraction of the accumulated
//! delta and decays the rest, so the camera glides to a stop.

use std::f32::consts::PI;

use tactile_math::Vec3;
use winit::event::{ElementState, MouseButton};

/// Smallest polar angle, keeping the camera off the poles
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit controller for handling pointer input
pub struct OrbitController {
    // Mouse state
    rotating: bool,
    panning: bool,
    pending_rotate: (f32, f32),
    pending_pan: (f32, f32),
    pending_scroll: f32,

    // Damped motion carried between frames
    delta_azimuth: f32,
    delta_polar: f32,
    pan_offset: Vec3,

    // Configuration
    pub rotate_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_speed: f32,
    pub damping_enabled: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,
            pending_rotate: (0.0, 0.0),
            pending_pan: (0.0, 0.0),
            pending_scroll: 0.0,

            delta_azimuth: 0.0,
            delta_polar: 0.0,
            pan_offset: Vec3::ZERO,

            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.001,
            zoom_speed: 0.95,
            damping_enabled: true,
            damping_factor: 0.05,
            min_distance: 10.0,
            max_distance: 50.0,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Process mouse movement in pixels
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.rotating {
            self.pending_rotate.0 += delta_x as f32;
            self.pending_rotate.1 += delta_y as f32;
        } else if self.panning {
            self.pending_pan.0 += delta_x as f32;
            self.pending_pan.1 += delta_y as f32;
        }
    }

    /// Process scroll in lines; positive scrolls in
    pub fn process_scroll(&mut self, lines: f32) {
        self.pending_scroll += lines;
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Whether the camera is still gliding
    pub fn is_moving(&self) -> bool {
        self.delta_azimuth.abs() > 1e-6 || self.delta_polar.abs() > 1e-6 || self.pan_offset.length() > 1e-6
    }

    /// Drop accumulated input and motion
    pub fn reset(&mut self) {
        self.pending_rotate = (0.0, 0.0);
        self.pending_pan = (0.0, 0.0);
        self.pending_scroll = 0.0;
        self.delta_azimuth = 0.0;
        self.delta_polar = 0.0;
        self.pan_offset = Vec3::ZERO;
    }

    /// Update the camera based on accumulated input
    ///
    /// Returns the new eye position.
    pub fn update<C: OrbitCamera>(&mut self, camera: &mut C) -> Vec3 {
        let mut target = camera.target();
        let offset = camera.eye() - target;
        let mut radius = offset.length().max(f32::EPSILON);

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        // Dragging left turns the view left
        self.delta_azimuth -= self.pending_rotate.0 * self.rotate_sensitivity;
        self.delta_polar -= self.pending_rotate.1 * self.rotate_sensitivity;

        let (pan_x, pan_y) = self.pending_pan;
        if pan_x != 0.0 || pan_y != 0.0 {
            let forward = (target - camera.eye()).normalized();
            let right = forward.cross(Vec3::Y).normalized();
            let up = right.cross(forward);
            self.pan_offset += (right * -pan_x + up * pan_y) * (radius * self.pan_sensitivity);
        }

        let apply = if self.damping_enabled { self.damping_factor } else { 1.0 };
        azimuth += self.delta_azimuth * apply;
        polar = (polar + self.delta_polar * apply).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        target += self.pan_offset * apply;

        if self.pending_scroll != 0.0 {
            let scale = self.zoom_speed.powf(self.pending_scroll);
            if !camera.zoom_by(scale) {
                radius *= scale;
            }
        }
        radius = radius.clamp(self.min_distance, self.max_distance);

        let eye = target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
        camera.set_view(eye, target);

        if self.damping_enabled {
            let decay = 1.0 - self.damping_factor;
            self.delta_azimuth *= decay;
            self.delta_polar *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_azimuth = 0.0;
            self.delta_polar = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.pending_rotate = (0.0, 0.0);
        self.pending_pan = (0.0, 0.0);
        self.pending_scroll = 0.0;

        eye
    }

    /// Builder: set the distance limits
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self
    }

    /// Builder: set damping (0 disables it)
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_enabled = factor > 0.0;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Builder: set rotation sensitivity in radians per pixel
    pub fn with_rotate_sensitivity(mut self, sensitivity: f32) -> Self {
        self.rotate_sensitivity = sensitivity;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitCamera {
    fn eye(&self) -> Vec3;
    fn target(&self) -> Vec3;
    fn set_view(&mut self, eye: Vec3, target: Vec3);

    /// Zoom without moving; returns false if the camera dollies by distance instead
    fn zoom_by(&mut self, _scale: f32) -> bool {
        false
    }
}
