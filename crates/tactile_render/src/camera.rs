//! Scene camera
//!
//! [`Camera3D`] looks from `eye` at `target` through either an orthographic
//! or a perspective projection. It is driven by the orbit controller and
//! casts the rays used for pointer picking.

use tactile_core::{CameraFraming, ProjectionKind};
use tactile_input::{OrbitCamera, PickCamera};
use tactile_math::{mat4, Mat4, Ray, Vec3};

/// Range of the orthographic zoom factor
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// A look-at camera
#[derive(Clone, Debug, PartialEq)]
pub struct Camera3D {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: ProjectionKind,
    pub near: f32,
    pub far: f32,
    /// Orthographic zoom; larger shows less of the scene
    pub zoom: f32,
    aspect: f32,
}

impl Camera3D {
    /// Create a camera from a scene's framing
    pub fn from_framing(framing: &CameraFraming, aspect: f32) -> Self {
        Self {
            eye: framing.eye,
            target: framing.target,
            up: Vec3::Y,
            projection: framing.projection,
            near: framing.near,
            far: framing.far,
            zoom: 1.0,
            aspect: aspect.max(f32::EPSILON),
        }
    }

    /// Return to a framing, keeping the aspect ratio
    pub fn reset(&mut self, framing: &CameraFraming) {
        *self = Self::from_framing(framing, self.aspect);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(f32::EPSILON);
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalized()
    }

    /// Screen-right and screen-up unit vectors
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalized();
        (right, right.cross(forward))
    }

    /// Half extents of the view at unit distance (perspective) or of the view volume (orthographic)
    fn half_extents(&self) -> (f32, f32) {
        let half_height = match self.projection {
            ProjectionKind::Orthographic { view_size } => view_size / self.zoom,
            ProjectionKind::Perspective { fov_degrees } => (fov_degrees.to_radians() / 2.0).tan(),
        };
        (half_height * self.aspect, half_height)
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionKind::Orthographic { .. } => {
                let (half_w, half_h) = self.half_extents();
                mat4::orthographic(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
            ProjectionKind::Perspective { fov_degrees } => {
                mat4::perspective(fov_degrees.to_radians(), self.aspect, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }
}

impl PickCamera for Camera3D {
    fn ray_from_ndc(&self, x: f32, y: f32) -> Ray {
        let forward = self.forward();
        let (right, up) = self.basis();
        let (half_w, half_h) = self.half_extents();
        match self.projection {
            ProjectionKind::Orthographic { .. } => {
                let origin = self.eye + right * (x * half_w) + up * (y * half_h);
                Ray::new(origin, forward)
            }
            ProjectionKind::Perspective { .. } => {
                let direction = forward + right * (x * half_w) + up * (y * half_h);
                Ray::new(self.eye, direction)
            }
        }
    }
}

impl OrbitCamera for Camera3D {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_view(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    fn zoom_by(&mut self, scale: f32) -> bool {
        match self.projection {
            ProjectionKind::Orthographic { .. } => {
                self.zoom = (self.zoom / scale).clamp(MIN_ZOOM, MAX_ZOOM);
                true
            }
            ProjectionKind::Perspective { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framing(projection: ProjectionKind) -> CameraFraming {
        CameraFraming {
            projection,
            near: 0.1,
            far: 100.0,
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
        }
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_center_ray_points_at_target() {
        for projection in [
            ProjectionKind::Orthographic { view_size: 10.0 },
            ProjectionKind::Perspective { fov_degrees: 60.0 },
        ] {
            let camera = Camera3D::from_framing(&framing(projection), 1.5);
            let ray = camera.ray_from_ndc(0.0, 0.0);
            assert!(approx(ray.origin, Vec3::new(0.0, 0.0, 10.0)));
            assert!(approx(ray.direction, Vec3::new(0.0, 0.0, -1.0)));
        }
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = Camera3D::from_framing(&framing(ProjectionKind::Orthographic { view_size: 10.0 }), 2.0);
        let ray = camera.ray_from_ndc(1.0, -1.0);
        assert!(approx(ray.direction, Vec3::new(0.0, 0.0, -1.0)));
        assert!(approx(ray.origin, Vec3::new(20.0, -10.0, 10.0)));
    }

    #[test]
    fn test_perspective_corner_ray() {
        let camera = Camera3D::from_framing(&framing(ProjectionKind::Perspective { fov_degrees: 90.0 }), 1.0);
        let ray = camera.ray_from_ndc(0.0, 1.0);
        // 45 degrees up
        assert!(approx(ray.direction, Vec3::new(0.0, 1.0, -1.0).normalized()));
    }

    #[test]
    fn test_ray_lands_where_projected() {
        let camera = Camera3D::from_framing(&framing(ProjectionKind::Perspective { fov_degrees: 60.0 }), 1.0);
        let point = Vec3::new(1.0, 2.0, 0.0);
        let m = camera.view_projection();
        let clip = mat4::transform_point(m, point);
        let w = m[0][3] * point.x + m[1][3] * point.y + m[2][3] * point.z + m[3][3];
        let ray = camera.ray_from_ndc(clip.x / w, clip.y / w);
        let t = (point.z - ray.origin.z) / ray.direction.z;
        assert!(approx(ray.at(t), point));
    }

    #[test]
    fn test_orthographic_zoom() {
        let mut camera = Camera3D::from_framing(&framing(ProjectionKind::Orthographic { view_size: 10.0 }), 1.0);
        assert!(camera.zoom_by(0.5));
        assert_eq!(camera.zoom, 2.0);
        let ray = camera.ray_from_ndc(1.0, 0.0);
        assert!(approx(ray.origin, Vec3::new(5.0, 0.0, 10.0)));

        let mut perspective = Camera3D::from_framing(&framing(ProjectionKind::Perspective { fov_degrees: 60.0 }), 1.0);
        assert!(!perspective.zoom_by(0.5));
    }

    #[test]
    fn test_reset_restores_framing() {
        let framing = framing(ProjectionKind::Orthographic { view_size: 10.0 });
        let mut camera = Camera3D::from_framing(&framing, 1.5);
        camera.set_view(Vec3::new(5.0, 5.0, 5.0), Vec3::ONE);
        camera.zoom_by(0.5);
        camera.reset(&framing);
        assert_eq!(camera.eye, framing.eye);
        assert_eq!(camera.zoom, 1.0);
        assert_eq!(camera.aspect(), 1.5);
    }
}
