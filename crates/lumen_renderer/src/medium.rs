//! Constant-density participating medium (smoke, fog).

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::gen_f64;
use crate::texture::Texture;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f64 = 0.0001;

/// A volume of uniform density bounded by a convex hittable.
///
/// A ray entering the boundary travels a random free-flight distance before
/// scattering off the isotropic phase function, or passes straight through
/// when that distance exceeds the path length inside.
#[derive(Debug, Clone)]
pub struct ConstantMedium {
    boundary: Box<Hittable>,
    neg_inv_density: f64,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Hittable>, density: f64, albedo: impl Into<Texture>) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Material::isotropic(albedo),
        }
    }

    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f64::INFINITY), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f64(rng).ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;

        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores it
            normal: Vec3::X,
            material: &self.phase_function,
            t,
            u: 0.0,
            v: 0.0,
            front_face: true,
        })
    }

    pub fn bounding_box(&self, time0: f64, time1: f64) -> Aabb {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid::Cuboid;
    use crate::sphere::Sphere;
    use lumen_math::{Color, Point3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn boundary() -> Sphere {
        Sphere::new(Point3::ZERO, 1.0, Arc::new(Material::dielectric(1.5)))
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        let medium = ConstantMedium::new(boundary(), 1e6, Color::new(0.2, 0.4, 0.9));
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(21);

        let rec = medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!(rec.t >= 4.0 && rec.t <= 6.0);
        assert!((rec.t - 4.0).abs() < 1e-3);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::X);
        assert!(matches!(rec.material, Material::Isotropic(_)));
    }

    #[test]
    fn test_thin_medium_is_mostly_transparent() {
        let medium = ConstantMedium::new(boundary(), 1e-6, Color::ONE);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let hits = (0..100)
            .filter(|_| medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).is_some())
            .count();
        assert!(hits < 5);
    }

    #[test]
    fn test_medium_missed_boundary() {
        let medium = ConstantMedium::new(boundary(), 1.0, Color::ONE);
        let ray = Ray::new(Point3::new(5.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).is_none());
    }

    #[test]
    fn test_medium_from_inside_starts_at_origin() {
        let cube = Cuboid::new(Point3::splat(-1.0), Point3::splat(1.0), Arc::new(Material::lambertian(Color::ONE)));
        let medium = ConstantMedium::new(cube, 1e6, Color::ONE);
        let ray = Ray::new(Point3::ZERO, Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        let rec = medium.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!(rec.t >= 0.001 && rec.t < 0.01);
        assert_eq!(medium.bounding_box(0.0, 1.0), Aabb::from_points(Point3::splat(-1.0), Point3::splat(1.0)));
    }
}
