//! Materials: how light interacts with surfaces and volumes.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f64, random_in_unit_sphere, random_unit_vector};
use crate::texture::Texture;
use lumen_math::{Color, Ray, Vec3};
use rand::RngCore;

/// Outgoing ray and its color weight, produced when a material scatters.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Surface (or phase) response of a hittable.
///
/// Materials are built once during scene assembly and shared between
/// objects through `Arc<Material>`.
#[derive(Debug, Clone)]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian(Texture),
    /// Mirror with optional roughness.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear glass-like refractor.
    Dielectric { ior: f64 },
    /// Emitter that never scatters.
    DiffuseLight(Color),
    /// Debug material: emits the shading normal as a color.
    Normals(Color),
    /// Uniform phase function for participating media.
    Isotropic(Texture),
}

impl Material {
    pub fn lambertian(texture: impl Into<Texture>) -> Self {
        Material::Lambertian(texture.into())
    }

    /// Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, clamped to at most 1.0
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }

    /// Dielectric with the given index of refraction (1.5 = glass).
    pub fn dielectric(ior: f64) -> Self {
        Material::Dielectric { ior }
    }

    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight(emit)
    }

    pub fn normals(tint: Color) -> Self {
        Material::Normals(tint)
    }

    pub fn isotropic(texture: impl Into<Texture>) -> Self {
        Material::Isotropic(texture.into())
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the ray is absorbed. The scattered ray keeps the
    /// incoming ray's time sample.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match self {
            Material::Lambertian(albedo) => {
                let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

                // Catch degenerate scatter direction
                if near_zero(scatter_direction) {
                    scatter_direction = rec.normal;
                }

                Some(Scatter {
                    attenuation: albedo.value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, scatter_direction, ray_in.time),
                })
            }

            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction.normalize(), rec.normal);
                let direction = reflected + *fuzz * random_in_unit_sphere(rng);

                // Fuzzed below the surface: absorbed
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(Scatter {
                    attenuation: *albedo,
                    scattered: Ray::new(rec.p, direction, ray_in.time),
                })
            }

            Material::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { *ior };

                let unit_direction = ray_in.direction.normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction = if cannot_refract
                    || reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction, ray_in.time),
                })
            }

            Material::DiffuseLight(_) | Material::Normals(_) => None,

            Material::Isotropic(albedo) => Some(Scatter {
                attenuation: albedo.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time),
            }),
        }
    }

    /// Light emitted at the hit point. Black for everything but emitters.
    pub fn emitted(&self, rec: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight(emit) => *emit,
            Material::Normals(tint) => 0.5 * (rec.normal + Vec3::ONE) + *tint,
            _ => Color::ZERO,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// True when every component is within 1e-8 of zero.
#[inline]
fn near_zero(v: Vec3) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
