//! Lumen math - the geometric vocabulary shared by the renderer.
//!
//! Everything is double precision. `Vec3`, `Point3` and `Color` are all
//! `glam::DVec3`; the aliases only document intent.

pub use glam::DMat3;

/// A 3-component double precision vector.
pub type Vec3 = glam::DVec3;

/// A position in world or object space.
pub type Point3 = glam::DVec3;

/// Linear RGB color, components nominally in `[0, 1]` (lights go higher).
pub type Color = glam::DVec3;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Mat3Ext, YRotation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_axis_indexing() {
        let v = Point3::new(7.0, 8.0, 9.0);
        assert_eq!(v[0], 7.0);
        assert_eq!(v[1], 8.0);
        assert_eq!(v[2], 9.0);
    }
}
