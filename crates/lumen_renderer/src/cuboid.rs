//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::material::Material;
use crate::rect::Rect;
use lumen_math::{Aabb, Interval, Point3, Ray};

#[derive(Debug, Clone)]
pub struct Cuboid {
    bbox: Aabb,
    sides: [Rect; 6],
}

impl Cuboid {
    /// Box spanning the two corners, every face sharing `material`.
    pub fn new(a: Point3, b: Point3, material: Arc<Material>) -> Self {
        let (p0, p1) = (a.min(b), a.max(b));
        let x = Interval::new(p0.x, p1.x);
        let y = Interval::new(p0.y, p1.y);
        let z = Interval::new(p0.z, p1.z);

        let sides = [
            Rect::xy(x, y, p1.z, material.clone()),
            Rect::xy(x, y, p0.z, material.clone()),
            Rect::xz(x, z, p1.y, material.clone()),
            Rect::xz(x, z, p0.y, material.clone()),
            Rect::yz(y, z, p1.x, material.clone()),
            Rect::yz(y, z, p0.x, material),
        ];

        Self {
            bbox: Aabb::from_points(p0, p1),
            sides,
        }
    }

    /// Nearest face hit.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for side in &self.sides {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = side.hit(ray, ray_t.with_max(max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
