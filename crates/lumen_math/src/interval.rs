/// Closed range `[min, max]` of reals.
///
/// Two jobs in the renderer: the span of ray parameters a hit may fall in,
/// which shrinks as closer hits are found, and one slab of an
/// [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Merging identity; contains nothing.
    pub const EMPTY: Interval = Interval::new(f64::INFINITY, f64::NEG_INFINITY);

    /// Every `t` along a ray, in both directions.
    pub const UNIVERSE: Interval = Interval::new(f64::NEG_INFINITY, f64::INFINITY);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Endpoints included. Planar hits accept a `t` on the boundary.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Endpoints excluded. Sphere roots must lie strictly inside.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Grown by `total / 2` at each end.
    pub fn padded(&self, total: f64) -> Interval {
        let half = total / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// Both ends moved by `offset`.
    pub fn shifted(&self, offset: f64) -> Interval {
        Interval::new(self.min + offset, self.max + offset)
    }

    /// Same lower bound, new upper bound. Used to stop a search at the
    /// closest hit found so far.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// Smallest interval covering both.
    pub fn merge(&self, other: &Interval) -> Interval {
        Interval::new(self.min.min(other.min), self.max.max(other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_range_boundaries() {
        let ray_t = Interval::new(0.001, 50.0);

        // A plane exactly at the far limit is still a hit, a sphere root is not
        assert!(ray_t.contains(50.0));
        assert!(!ray_t.surrounds(50.0));
        assert!(ray_t.surrounds(25.0));

        // Self-intersection guard
        assert!(!ray_t.contains(0.0));
        assert!(!ray_t.surrounds(0.001));
    }

    #[test]
    fn test_closest_hit_narrowing() {
        let ray_t = Interval::new(0.001, f64::INFINITY);
        let narrowed = ray_t.with_max(4.0);

        assert_eq!(narrowed.min, 0.001);
        assert!(!narrowed.contains(4.5));
        assert!(ray_t.contains(4.5));
    }

    #[test]
    fn test_color_channel_clamp() {
        let intensity = Interval::new(0.0, 0.999);

        assert_eq!(intensity.clamp(-0.3), 0.0);
        assert_eq!(intensity.clamp(0.5), 0.5);
        assert_eq!(intensity.clamp(7.0), 0.999);
        assert_eq!(intensity.clamp(intensity.clamp(7.0)), 0.999);
    }

    #[test]
    fn test_slab_padding_and_shift() {
        // A flat slab at z = 5 gains thickness around its plane
        let slab = Interval::new(5.0, 5.0).padded(0.0002);
        assert!(slab.surrounds(5.0));
        assert!((slab.size() - 0.0002).abs() < 1e-12);

        assert_eq!(Interval::new(0.0, 1.0).shifted(265.0), Interval::new(265.0, 266.0));
    }

    #[test]
    fn test_merge() {
        let merged = Interval::new(1.0, 3.0).merge(&Interval::new(-2.0, 2.0));
        assert_eq!(merged, Interval::new(-2.0, 3.0));

        assert_eq!(Interval::EMPTY.merge(&Interval::new(1.0, 3.0)), Interval::new(1.0, 3.0));
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(-1e300));
    }
}
