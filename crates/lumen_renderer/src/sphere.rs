//! Sphere primitives, static and moving.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::material::Material;
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};

/// A sphere defined by center and radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Point3, radius: f64, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let t = hit_sphere(self.center, self.radius, ray, ray_t)?;
        let outward_normal = (ray.at(t) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            sphere_uv(outward_normal),
            &self.material,
        ))
    }

    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius.abs());
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
#[derive(Debug, Clone)]
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        (center0, center1): (Point3, Point3),
        (time0, time1): (f64, f64),
        radius: f64,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center at the given time. Extrapolates outside `[time0, time1]`.
    pub fn center(&self, time: f64) -> Point3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center(ray.time);
        let t = hit_sphere(center, self.radius, ray, ray_t)?;
        let outward_normal = (ray.at(t) - center) / self.radius;
        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            sphere_uv(outward_normal),
            &self.material,
        ))
    }

    /// Union of the boxes at the two ends of the queried shutter interval.
    pub fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        let rvec = Vec3::splat(self.radius.abs());
        let (c0, c1) = (self.center(time0), self.center(time1));
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Aabb::surrounding(&box0, &box1)
    }
}

/// Nearest root of the ray/sphere quadratic strictly inside `ray_t`.
fn hit_sphere(center: Point3, radius: f64, ray: &Ray, ray_t: Interval) -> Option<f64> {
    let oc = ray.origin - center;
    let a = ray.direction.length_squared();
    let half_b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Find the nearest root that lies in the acceptable range
    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }
    Some(root)
}

/// (u, v) on the unit sphere.
///
/// `u` is the angle around Y from X = -1, `v` the angle from Y = -1 to
/// Y = +1, both normalized to `[0, 1]`.
fn sphere_uv(p: Vec3) -> (f64, f64) {
    let theta = (-p.y).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Color;

    fn grey() -> Arc<Material> {
        Arc::new(Material::lambertian(Color::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing at sphere
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = sphere.hit(&ray, Interval::new(0.0, f64::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.0, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Point3::ZERO, 2.0, grey());
        let ray = Ray::new(Point3::ZERO, Vec3::X, 0.0);

        let rec = sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_root_on_interval_boundary_is_rejected() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -2.0), 1.0, grey());
        let ray = Ray::new(Point3::ZERO, -Vec3::Z, 0.0);

        // Near root at t = 1 sits exactly on the max bound
        assert!(sphere.hit(&ray, Interval::new(0.001, 1.0)).is_none());
    }

    #[test]
    fn test_normal_faces_the_camera() {
        let top = Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0, grey());

        let origin = Point3::new(13.0, 2.0, 3.0);
        let ray = Ray::new(origin, Point3::new(0.0, 10.0, 0.0) - origin, 0.0);
        let interval = Interval::new(0.001, f64::INFINITY);

        let rec = top.hit(&ray, interval).unwrap();
        assert!(rec.t > 0.0);
        assert!(rec.front_face);
        assert!(rec.normal.dot(ray.direction) < 0.0);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.5).abs() < 1e-12);

        let (_, v) = sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-12);

        let (u, _) = sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_bounding_box() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5, grey());
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.min(), Point3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max(), Point3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_moving_sphere_center_and_box() {
        let sphere = MovingSphere::new(
            (Point3::ZERO, Point3::new(0.0, 2.0, 0.0)),
            (0.0, 1.0),
            0.5,
            grey(),
        );

        assert_eq!(sphere.center(0.5), Point3::new(0.0, 1.0, 0.0));

        let bbox = sphere.bounding_box(0.0, 1.0);
        assert_eq!(bbox.min(), Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max(), Point3::new(0.5, 2.5, 0.5));

        // The hit follows the ray's time
        let ray = Ray::new(Point3::new(0.0, 2.0, 5.0), -Vec3::Z, 1.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_some());
        let ray = Ray::new(Point3::new(0.0, 2.0, 5.0), -Vec3::Z, 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }
}
