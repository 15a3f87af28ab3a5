//! Gradient (Perlin) noise with turbulence, for procedural textures.

use crate::sampling::random_unit_vector;
use lumen_math::{Point3, Vec3};
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default octave count for [`Perlin::turb`].
pub const TURBULENCE_DEPTH: usize = 7;

/// Lattice of random unit gradients addressed through three permutation
/// tables. Built once from a caller-supplied RNG, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Smoothed noise value in roughly `[-1, 1]`.
    pub fn noise(&self, p: Point3) -> f64 {
        let f = p.floor();
        let (u, v, w) = (p.x - f.x, p.y - f.y, p.z - f.z);
        let (i, j, k) = (f.x as i64, f.y as i64, f.z as i64);

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)];
                    *corner = self.gradients[index];
                }
            }
        }

        Self::interpolate(&corners, u, v, w)
    }

    /// Sum of `depth` noise octaves, each at double frequency and half weight.
    pub fn turb(&self, p: Point3, depth: usize) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    #[inline]
    fn wrap(n: i64) -> usize {
        (n & (POINT_COUNT as i64 - 1)) as usize
    }

    /// Trilinear blend of corner gradients with Hermite smoothing.
    fn interpolate(corners: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        let mut accum = 0.0;
        for (i, plane) in corners.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f64, j as f64, k as f64);
                    let weight = Vec3::new(u - fi, v - fj, w - fk);
                    accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                        * (fj * vv + (1.0 - fj) * (1.0 - vv))
                        * (fk * ww + (1.0 - fk) * (1.0 - ww))
                        * gradient.dot(weight);
                }
            }
        }
        accum
    }
}
