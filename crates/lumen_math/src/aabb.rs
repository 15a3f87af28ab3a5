use crate::{Interval, Point3, Ray};

/// Minimum slab thickness; thinner axes are padded so flat geometry
/// (rectangles) still produces a box the slab test can hit.
const MIN_THICKNESS: f64 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// [`Aabb::EMPTY`] is the identity for [`Aabb::surrounding`] and is never
/// hit-tested on its own.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self::new(x, y, z)
    }

    /// Create an AABB that surrounds two other AABBs.
    ///
    /// The result is the tightest box containing both.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: box0.x.merge(&box1.x),
            y: box0.y.merge(&box1.y),
            z: box0.z.merge(&box1.z),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Point3 {
        Point3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3 {
        Point3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. A zero direction component gives an infinite
    /// inverse, which IEEE-754 turns into the right answer: rays parallel to
    /// a slab hit only if the origin lies inside it.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];

            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_THICKNESS {
            self.x = self.x.padded(MIN_THICKNESS);
        }
        if self.y.size() < MIN_THICKNESS {
            self.y = self.y.padded(MIN_THICKNESS);
        }
        if self.z.size() < MIN_THICKNESS {
            self.z = self.z.padded(MIN_THICKNESS);
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Point3) -> Aabb {
        Aabb::new(
            self.x.shifted(offset.x),
            self.y.shifted(offset.y),
            self.z.shifted(offset.z),
        )
    }

    /// Total surface area of the box.
    pub fn area(&self) -> f64 {
        let a = self.x.size();
        let b = self.y.size();
        let c = self.z.size();
        2.0 * (a * b + b * c + c * a)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// X wins only when strictly longest; ties go to the later axis.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    fn encloses(outer: &Aabb, inner: &Aabb) -> bool {
        (0..3).all(|axis| {
            let o = outer.axis_interval(axis);
            let i = inner.axis_interval(axis);
            o.min <= i.min && i.max <= o.max
        })
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 5.0));

        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.contains(5.0));

        // A ray along -z must still register the flat box
        let ray = Ray::new(Vec3::new(0.5, 0.5, 10.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.001, f64::INFINITY)));
    }

    #[test]
    fn test_aabb_surrounding_is_tight() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 2.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, -1.0, 3.0), Vec3::new(10.0, 1.0, 4.0));
        let merged = Aabb::surrounding(&box1, &box2);

        assert!(encloses(&merged, &box1));
        assert!(encloses(&merged, &box2));
        for axis in 0..3 {
            let m = merged.axis_interval(axis);
            let a = box1.axis_interval(axis);
            let b = box2.axis_interval(axis);
            assert!(m.min == a.min || m.min == b.min);
            assert!(m.max == a.max || m.max == b.max);
        }
        assert_eq!(merged.min(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(merged.max(), Vec3::new(10.0, 2.0, 5.0));
    }

    #[test]
    fn test_aabb_surrounding_empty_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &aabb), aabb);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_parallel_ray_outside_slab_misses() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Parallel to the x slab, origin strictly outside it: both signs of zero
        for dir_x in [0.0, -0.0] {
            let ray = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::new(dir_x, 0.0, 1.0), 0.0);
            assert!(!aabb.hit(&ray, Interval::new(0.0, f64::INFINITY)));
            let ray = Ray::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(dir_x, 0.0, 1.0), 0.0);
            assert!(!aabb.hit(&ray, Interval::new(0.0, f64::INFINITY)));
        }

        // Parallel but inside the slab still hits
        let ray = Ray::new(Vec3::new(0.5, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f64::INFINITY)));
    }

    #[test]
    fn test_aabb_area() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert!((aabb.area() - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), 0);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }

    #[test]
    fn test_aabb_longest_axis_ties() {
        // x == y > z: y wins
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 4.0, 1.0));
        assert_eq!(aabb.longest_axis(), 1);

        // y == z > x: z wins
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 4.0, 4.0));
        assert_eq!(aabb.longest_axis(), 2);

        // cube: z wins
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.longest_axis(), 2);
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x.min, 5.0);
        assert_eq!(translated.x.max, 6.0);
        assert_eq!(translated.y.min, 0.0);
        assert_eq!(translated.z.min, 0.0);
    }
}
