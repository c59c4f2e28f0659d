use crate::math::{Point3, Ray};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Creates an empty (inverted) bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Creates a bounding box from min and max corners.
    #[must_use]
    pub fn from_min_max(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Creates the tightest box around a set of points.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_point(p);
        }
        bbox
    }

    /// Expands this bounding box to include another.
    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Expands this bounding box to include a point.
    pub fn expand_point(&mut self, point: &Point3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Returns `true` unless the box is still inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Slab test against a ray restricted to `t >= 0`.
    ///
    /// `inv_dir` is the component-wise reciprocal of the ray direction.
    /// Returns the entry and exit parameters when the ray touches the box.
    #[must_use]
    pub fn ray_intersect(&self, ray: &Ray, inv_dir: &nalgebra::Vector3<f64>) -> Option<(f64, f64)> {
        let origin = ray.origin();
        let mut t_near = 0.0_f64;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            // A zero direction component yields inf or NaN; `min`/`max` drop NaN,
            // which is right for a ray lying exactly on a slab plane.
            let t1 = (self.min[axis] - origin[axis]) * inv_dir[axis];
            let t2 = (self.max[axis] - origin[axis]) * inv_dir[axis];
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        (t_near <= t_far).then_some((t_near, t_far))
    }
}
