// Transform utilities for instance wrappers
//
// Extends glam::DMat3 with the bounding-box transform the renderer needs,
// and wraps the rotation about +Y used by rotated instances.

use crate::{Aabb, DMat3, Point3, Vec3};

/// Extension trait for DMat3 to provide additional transform utilities
pub trait Mat3Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for DMat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (lo, hi) = (aabb.min(), aabb.max());

        let mut result_min = Point3::splat(f64::INFINITY);
        let mut result_max = Point3::splat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Point3::new(
                        if i == 0 { lo.x } else { hi.x },
                        if j == 0 { lo.y } else { hi.y },
                        if k == 0 { lo.z } else { hi.z },
                    );
                    let transformed = *self * corner;
                    result_min = result_min.min(transformed);
                    result_max = result_max.max(transformed);
                }
            }
        }

        Aabb::from_points(result_min, result_max)
    }
}

/// A rotation about the +Y axis, stored with its inverse.
///
/// `to_world` maps object space into world space, `to_object` undoes it.
/// A positive angle turns +X toward -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRotation {
    forward: DMat3,
    inverse: DMat3,
}

impl YRotation {
    /// Rotation by `degrees` about +Y.
    pub fn from_degrees(degrees: f64) -> Self {
        let forward = DMat3::from_rotation_y(degrees.to_radians());
        Self {
            forward,
            inverse: forward.transpose(),
        }
    }

    /// Object space to world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.forward * v
    }

    /// World space to object space.
    #[inline]
    pub fn to_object(&self, v: Vec3) -> Vec3 {
        self.inverse * v
    }

    /// World-space box enclosing an object-space box.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        self.forward.transform_aabb(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = DMat3::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 1e-9);
        assert!((transformed.max() - aabb.max()).length() < 1e-9);
    }

    #[test]
    fn test_y_rotation_quarter_turn() {
        let rot = YRotation::from_degrees(90.0);

        // +X turns toward -Z
        let v = rot.to_world(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);

        // Y is untouched
        assert!((rot.to_world(Vec3::Y) - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_y_rotation_round_trip() {
        let rot = YRotation::from_degrees(-18.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let back = rot.to_object(rot.to_world(p));

        assert!((back - p).length() < 1e-9);
    }

    #[test]
    fn test_y_rotation_aabb_encloses_rotated_corners() {
        let rot = YRotation::from_degrees(45.0);
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0));
        let rotated = rot.transform_aabb(&aabb);

        // x extent grows to the footprint diagonal, y untouched
        let diagonal = 2.0 * std::f64::consts::SQRT_2;
        assert!((rotated.x.size() - diagonal).abs() < 1e-9);
        assert!((rotated.y.size() - 1.0).abs() < 1e-9);

        let corner = rot.to_world(Vec3::new(2.0, 1.0, 0.0));
        assert!(rotated.x.contains(corner.x));
        assert!(rotated.z.contains(corner.z));
    }
}
