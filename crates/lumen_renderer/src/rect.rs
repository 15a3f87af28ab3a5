//! Axis-aligned rectangles.

use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::material::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Half-thickness of a rectangle's box along its fixed axis.
const PLANE_PADDING: f64 = 0.0001;

/// The plane a [`Rect`] lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Fixed z, bounded in x and y.
    Xy,
    /// Fixed y, bounded in x and z.
    Xz,
    /// Fixed x, bounded in y and z.
    Yz,
}

impl Plane {
    /// Axis indices as (first in-plane, second in-plane, fixed).
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// Rectangle in an axis-aligned plane at coordinate `k`, bounded by two
/// intervals on the in-plane axes. The outward normal is the +axis
/// direction of the fixed axis.
#[derive(Debug, Clone)]
pub struct Rect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f64,
    material: Arc<Material>,
}

impl Rect {
    pub fn new(plane: Plane, a: Interval, b: Interval, k: f64, material: Arc<Material>) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    /// Rectangle with fixed z, spanning `x` and `y`.
    pub fn xy(x: Interval, y: Interval, k: f64, material: Arc<Material>) -> Self {
        Self::new(Plane::Xy, x, y, k, material)
    }

    /// Rectangle with fixed y, spanning `x` and `z`.
    pub fn xz(x: Interval, z: Interval, k: f64, material: Arc<Material>) -> Self {
        Self::new(Plane::Xz, x, z, k, material)
    }

    /// Rectangle with fixed x, spanning `y` and `z`.
    pub fn yz(y: Interval, z: Interval, k: f64, material: Arc<Material>) -> Self {
        Self::new(Plane::Yz, y, z, k, material)
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (a_axis, b_axis, k_axis) = self.plane.axes();

        let t = (self.k - ray.origin[k_axis]) / ray.direction[k_axis];
        if !ray_t.contains(t) {
            return None;
        }

        let a = ray.origin[a_axis] + t * ray.direction[a_axis];
        let b = ray.origin[b_axis] + t * ray.direction[b_axis];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let u = (a - self.a.min) / self.a.size();
        let v = (b - self.b.min) / self.b.size();

        let mut outward_normal = Vec3::ZERO;
        outward_normal[k_axis] = 1.0;

        Some(HitRecord::new(ray, t, outward_normal, (u, v), &self.material))
    }

    /// Box of the rectangle, padded along the fixed axis.
    pub fn bounding_box(&self) -> Aabb {
        let (a_axis, b_axis, k_axis) = self.plane.axes();

        let mut slabs = [Interval::EMPTY; 3];
        slabs[a_axis] = self.a;
        slabs[b_axis] = self.b;
        slabs[k_axis] = Interval::new(self.k - PLANE_PADDING, self.k + PLANE_PADDING);

        Aabb::new(slabs[0], slabs[1], slabs[2])
    }
}
