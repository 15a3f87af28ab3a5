//! Hittable enum and HitRecord for ray-object intersection.

use crate::bvh::BvhNode;
use crate::cuboid::Cuboid;
use crate::instance::{RotateY, Translate};
use crate::material::Material;
use crate::medium::ConstantMedium;
use crate::rect::Rect;
use crate::sphere::{MovingSphere, Sphere};
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Debug, Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting the normal against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            u,
            v,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction.dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can be tested against.
///
/// Wrappers (`Translate`, `RotateY`, `ConstantMedium`) own exactly one
/// inner hittable, so a scene is always a tree.
#[derive(Debug, Clone)]
pub enum Hittable {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(Rect),
    Cuboid(Cuboid),
    Translate(Translate),
    RotateY(RotateY),
    ConstantMedium(ConstantMedium),
    List(HittableList),
    Bvh(BvhNode),
}

impl Hittable {
    /// Closest intersection with `t` inside `ray_t`, if any.
    ///
    /// `rng` is only consumed by participating media.
    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::MovingSphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Rect(rect) => rect.hit(ray, ray_t),
            Hittable::Cuboid(cuboid) => cuboid.hit(ray, ray_t),
            Hittable::Translate(translate) => translate.hit(ray, ray_t, rng),
            Hittable::RotateY(rotate) => rotate.hit(ray, ray_t, rng),
            Hittable::ConstantMedium(medium) => medium.hit(ray, ray_t, rng),
            Hittable::List(list) => list.hit(ray, ray_t, rng),
            Hittable::Bvh(bvh) => bvh.hit(ray, ray_t, rng),
        }
    }

    /// Box enclosing the object over the shutter interval `[time0, time1]`.
    pub fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        match self {
            Hittable::Sphere(sphere) => sphere.bounding_box(),
            Hittable::MovingSphere(sphere) => sphere.bounding_box(time0, time1),
            Hittable::Rect(rect) => rect.bounding_box(),
            Hittable::Cuboid(cuboid) => cuboid.bounding_box(),
            Hittable::Translate(translate) => translate.bounding_box(time0, time1),
            Hittable::RotateY(rotate) => rotate.bounding_box(),
            Hittable::ConstantMedium(medium) => medium.bounding_box(time0, time1),
            Hittable::List(list) => list.bounding_box(time0, time1),
            Hittable::Bvh(bvh) => bvh.bounding_box(),
        }
    }
}

macro_rules! impl_from_for_hittable {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Hittable {
                fn from(object: $variant) -> Self {
                    Hittable::$variant(object)
                }
            }
        )*
    };
}

impl_from_for_hittable!(Sphere, MovingSphere, Rect, Cuboid, Translate, RotateY, ConstantMedium);

impl From<HittableList> for Hittable {
    fn from(list: HittableList) -> Self {
        Hittable::List(list)
    }
}

impl From<BvhNode> for Hittable {
    fn from(bvh: BvhNode) -> Self {
        Hittable::Bvh(bvh)
    }
}

/// A list of hittable objects.
#[derive(Debug, Clone, Default)]
pub struct HittableList {
    objects: Vec<Hittable>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Hittable>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Hittable] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Hittable> {
        self.objects
    }

    /// Closest hit across all objects.
    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    /// Union of every object's box; `Aabb::EMPTY` for an empty list.
    pub fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        self.objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box(time0, time1))
        })
    }
}

impl From<Vec<Hittable>> for HittableList {
    fn from(objects: Vec<Hittable>) -> Self {
        Self { objects }
    }
}

impl FromIterator<Hittable> for HittableList {
    fn from_iter<I: IntoIterator<Item = Hittable>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
