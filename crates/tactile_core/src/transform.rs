//! 3D Transform (position, rotation, scale)
//!
//! A Transform3D places a model or node in world space. Rotation is stored as
//! Euler angles in radians (XYZ order), the form scene files declare.

use serde::{Serialize, Deserialize};
use tactile_math::{mat4, Mat4, Vec3};

/// Coordinate axis, used for mirroring
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A 3D transform with position, Euler rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position in world space
    #[serde(default)]
    pub position: Vec3,
    /// Euler rotation in radians, applied X then Y then Z
    #[serde(default)]
    pub rotation: Vec3,
    /// Scale along each axis
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local-to-world matrix (`T * R * S`)
    pub fn to_matrix(&self) -> Mat4 {
        mat4::from_trs(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        mat4::transform_point(self.to_matrix(), p)
    }

    /// Mirror image of this transform across the plane normal to `axis`
    ///
    /// The position component and the scale along `axis` flip sign; the two
    /// rotation components around the other axes flip too so the geometry
    /// is reflected rather than rotated.
    pub fn mirrored(&self, axis: Axis) -> Self {
        let mut t = *self;
        match axis {
            Axis::X => {
                t.position.x = -t.position.x;
                t.scale.x = -t.scale.x;
                t.rotation.y = -t.rotation.y;
                t.rotation.z = -t.rotation.z;
            }
            Axis::Y => {
                t.position.y = -t.position.y;
                t.scale.y = -t.scale.y;
                t.rotation.x = -t.rotation.x;
                t.rotation.z = -t.rotation.z;
            }
            Axis::Z => {
                t.position.z = -t.position.z;
                t.scale.z = -t.scale.z;
                t.rotation.x = -t.rotation.x;
                t.rotation.y = -t.rotation.y;
            }
        }
        t
    }
}
