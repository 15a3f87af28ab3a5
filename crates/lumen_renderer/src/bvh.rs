//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once per render over the scene's top-level objects.
//! Each node splits its span at the median along the longest axis of the
//! span's bounding box.

use crate::hittable::{HitRecord, Hittable, HittableList};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// BVH node with one or two children.
///
/// A node with no right child is a leaf wrapping a single object. Children
/// are either primitives or nested [`BvhNode`]s held in `Hittable::Bvh`.
#[derive(Debug, Clone)]
pub struct BvhNode {
    bbox: Aabb,
    left: Box<Hittable>,
    right: Option<Box<Hittable>>,
}

impl BvhNode {
    /// Build a BVH from a list of hittable objects.
    ///
    /// Boxes are taken over the shutter interval `[time0, time1]`. Returns
    /// `None` for an empty list.
    pub fn new(list: HittableList, time0: f64, time1: f64) -> Option<Self> {
        Self::build(list.into_objects(), time0, time1)
    }

    /// Recursive median split.
    fn build(mut objects: Vec<Hittable>, time0: f64, time1: f64) -> Option<Self> {
        if objects.is_empty() {
            return None;
        }

        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box(time0, time1))
        });
        let axis = bbox.longest_axis();

        if objects.len() == 1 {
            let only = objects.pop()?;
            return Some(Self {
                bbox,
                left: Box::new(only),
                right: None,
            });
        }

        // Order by box minimum on the chosen axis
        objects.sort_by(|a, b| {
            let a_min = a.bounding_box(time0, time1).axis_interval(axis).min;
            let b_min = b.bounding_box(time0, time1).axis_interval(axis).min;
            a_min.total_cmp(&b_min)
        });

        let (left, right) = if objects.len() == 2 {
            let right = objects.pop()?;
            let left = objects.pop()?;
            (left, right)
        } else {
            let mid = objects.len() / 2;
            let right_objects = objects.split_off(mid);
            let left = Self::build(objects, time0, time1)?;
            let right = Self::build(right_objects, time0, time1)?;
            (Hittable::Bvh(left), Hittable::Bvh(right))
        };

        Some(Self {
            bbox,
            left: Box::new(left),
            right: Some(Box::new(right)),
        })
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t, rng);

        let Some(right) = &self.right else {
            return hit_left;
        };

        // Only check right up to closest hit
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = right.hit(ray, ray_t.with_max(right_max), rng);

        hit_right.or(hit_left)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Number of primitives under this node.
    pub fn object_count(&self) -> usize {
        let count = |child: &Hittable| match child {
            Hittable::Bvh(node) => node.object_count(),
            _ => 1,
        };
        count(self.left.as_ref()) + self.right.as_deref().map_or(0, count)
    }
}
