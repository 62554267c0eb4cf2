//! Rays and axis-aligned bounding boxes for pointer picking

use serde::{Serialize, Deserialize};

use crate::mat4::{self, Mat4};
use crate::Vec3;

/// A half-line starting at `origin` heading along unit `direction`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the first intersection with `aabb`, if any
    ///
    /// Uses the slab method. A ray starting inside the box reports the exit
    /// distance, so the result is never negative.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let origin = self.origin.to_array();
        let dir = self.direction.to_array();
        let min = aabb.min.to_array();
        let max = aabb.max.to_array();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            if dir[axis].abs() < f32::EPSILON {
                // Parallel to the slab: miss unless the origin lies within it
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir[axis];
            let mut t0 = (min[axis] - origin[axis]) * inv;
            let mut t1 = (max[axis] - origin[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            None
        } else if t_near >= 0.0 {
            Some(t_near)
        } else {
            Some(t_far)
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min_components(max),
            max: min.max_components(max),
        }
    }

    /// Box centered on `center` with full extents `size`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (min.min_components(p), max.max_components(p))
        });
        Some(Self { min, max })
    }

    /// Center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Union of two boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    /// Bounding box of this box after transformation by `m`
    pub fn transformed(&self, m: Mat4) -> Self {
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        });
        // Eight corners always yield a box
        Self::from_points(corners.map(|c| mat4::transform_point(m, c))).unwrap_or(*self)
    }

    /// Matrix mapping the unit cube `[-0.5, 0.5]^3` onto this box
    pub fn unit_cube_matrix(&self) -> Mat4 {
        mat4::mul(mat4::translation(self.center()), mat4::scale(self.size()))
    }
}
