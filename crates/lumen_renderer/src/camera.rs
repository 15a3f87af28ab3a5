//! Thin-lens camera for ray generation.

use crate::sampling::{gen_range, random_in_unit_disk};
use lumen_math::{Point3, Ray, Vec3};
use rand::RngCore;

/// Scene-dependent camera parameters.
///
/// The aspect ratio is not part of the settings; it comes from the image
/// configuration when the [`Camera`] is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Lens diameter; 0 disables defocus blur
    pub aperture: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_distance: f64,
    pub time_start: f64,
    pub time_end: f64,
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_distance: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    /// Set the shutter interval.
    pub fn with_shutter(mut self, time_start: f64, time_end: f64) -> Self {
        self.time_start = time_start;
        self.time_end = time_end;
        self
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Point3::new(0.0, 1.0, 0.0),
            look_at: Point3::new(1.0, 1.0, 1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_distance: 10.0,
            time_start: 0.0,
            time_end: 0.0,
        }
    }
}

/// Camera for generating rays into the scene.
///
/// Everything is derived once at construction; generating rays never
/// mutates the camera, so one instance serves every render thread.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
    time_start: f64,
    time_end: f64,
}

impl Camera {
    pub fn new(settings: &CameraSettings, aspect_ratio: f64) -> Self {
        let theta = settings.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = settings.look_from;
        let horizontal = settings.focus_distance * viewport_width * u;
        let vertical = settings.focus_distance * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - settings.focus_distance * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: settings.aperture / 2.0,
            time_start: settings.time_start,
            time_end: settings.time_end,
        }
    }

    /// Ray through viewport coordinates (s, t), both in `[0, 1]` from the
    /// lower-left corner.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let origin = self.origin + offset;
        let direction =
            self.lower_left_corner + s * self.horizontal + t * self.vertical - origin;

        Ray::new(origin, direction, self.sample_time(rng))
    }

    /// Uniform time in the shutter interval.
    fn sample_time(&self, rng: &mut dyn RngCore) -> f64 {
        if self.time_end <= self.time_start {
            return self.time_start;
        }
        gen_range(rng, self.time_start, self.time_end)
    }

    /// Shutter interval as (start, end).
    pub fn shutter(&self) -> (f64, f64) {
        (self.time_start, self.time_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings() -> CameraSettings {
        CameraSettings::default()
            .with_position(Point3::new(0.0, 0.0, 5.0), Point3::ZERO, Vec3::Y)
            .with_lens(90.0, 0.0, 5.0)
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(&settings(), 2.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin, Point3::new(0.0, 0.0, 5.0));
        assert!((ray.direction.normalize() - -Vec3::Z).length() < 1e-12);
        assert!((ray.at(1.0) - Point3::ZERO).length() < 1e-12);
    }

    #[test]
    fn test_viewport_corners() {
        // vfov 90: half height = focus distance
        let camera = Camera::new(&settings(), 2.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((ray.at(1.0) - Point3::new(-10.0, -5.0, 0.0)).length() < 1e-9);

        let ray = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((ray.at(1.0) - Point3::new(10.0, 5.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_defocus_offsets_origin_within_lens() {
        let camera = Camera::new(&settings().with_lens(90.0, 2.0, 5.0), 1.0);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            let offset = ray.origin - Point3::new(0.0, 0.0, 5.0);
            assert!(offset.length() < 1.0);
            assert_eq!(offset.z, 0.0);
            // Every lens sample still converges on the focus plane
            assert!((ray.at(1.0) - Point3::ZERO).length() < 1e-9);
        }
    }

    #[test]
    fn test_shutter_time_sampling() {
        let mut rng = StdRng::seed_from_u64(5);

        let camera = Camera::new(&settings().with_shutter(0.0, 1.0), 1.0);
        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.7, &mut rng).time;
            assert!((0.0..1.0).contains(&time));
        }

        // Empty interval: always the start time
        let camera = Camera::new(&settings().with_shutter(0.25, 0.25), 1.0);
        assert_eq!(camera.get_ray(0.3, 0.7, &mut rng).time, 0.25);
    }
}
