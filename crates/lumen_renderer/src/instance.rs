//! Instance wrappers that move a single inner hittable.
//!
//! Both wrappers transform the ray into object space, delegate, and carry
//! the hit point and normal back out. The inner `front_face` is kept as-is:
//! rigid motions do not change which side of a surface a ray came from.

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray, Vec3, YRotation};
use rand::RngCore;

/// Shutter interval used to size the inner box of a rotated instance.
const ROTATE_BOX_TIME: (f64, f64) = (0.0, 1.0);

/// An object displaced by a fixed offset.
#[derive(Debug, Clone)]
pub struct Translate {
    object: Box<Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: impl Into<Hittable>, offset: Vec3) -> Self {
        Self {
            object: Box::new(object.into()),
            offset,
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        let mut rec = self.object.hit(&moved, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    pub fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        self.object.bounding_box(time0, time1).translate(self.offset)
    }
}

/// An object rotated about the world +Y axis through the origin.
#[derive(Debug, Clone)]
pub struct RotateY {
    object: Box<Hittable>,
    rotation: YRotation,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: impl Into<Hittable>, degrees: f64) -> Self {
        let object = Box::new(object.into());
        let rotation = YRotation::from_degrees(degrees);

        let (time0, time1) = ROTATE_BOX_TIME;
        let bbox = rotation.transform_aabb(&object.bounding_box(time0, time1));

        Self {
            object,
            rotation,
            bbox,
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let rotated = Ray::new(
            self.rotation.to_object(ray.origin),
            self.rotation.to_object(ray.direction),
            ray.time,
        );

        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.rotation.to_world(rec.p);
        rec.normal = self.rotation.to_world(rec.normal);
        Some(rec)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
