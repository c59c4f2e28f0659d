use super::{Point3, Vector3};

/// A half-line `origin + t * direction` for `t >= 0`.
///
/// The direction is not normalized, so hit distances are measured in units
/// of `direction`'s length. Distances along the same ray are comparable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Creates a ray starting at `origin` and passing through `target`.
    #[must_use]
    pub fn through(origin: Point3, target: Point3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Returns the ray origin.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the ray direction.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Returns the point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Component-wise reciprocal of the direction, for slab tests.
    #[must_use]
    pub fn inverse_direction(&self) -> Vector3 {
        self.direction.map(f64::recip)
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of the hit, or `None` when the ray misses, runs
/// parallel to the triangle, or the hit lies at or behind `epsilon`.
///
/// The parallel test is relative: `epsilon` bounds the sine of the angle
/// between the ray and the triangle plane, so it holds at any mesh scale.
#[must_use]
pub fn ray_triangle_intersect(
    ray: &Ray,
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel, or a zero-area triangle
    let scale = ray.direction.norm() * edge1.norm() * edge2.norm();
    if a.abs() <= epsilon * scale {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > epsilon).then_some(t)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn ray_hits_triangle_from_above() {
        let ray = Ray::new(p(0.25, 0.25, 5.0), v(0.0, 0.0, -1.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            1e-9,
        );
        assert_relative_eq!(t.unwrap_or_default(), 5.0);
    }

    #[test]
    fn ray_hits_back_face_too() {
        let ray = Ray::new(p(0.25, 0.25, -2.0), v(0.0, 0.0, 1.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            1e-9,
        );
        assert!(t.is_some());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(p(0.25, 0.25, 5.0), v(0.0, 0.0, 1.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            1e-9,
        );
        assert!(t.is_none());
    }

    #[test]
    fn ray_outside_triangle_misses() {
        let ray = Ray::new(p(2.0, 2.0, 5.0), v(0.0, 0.0, -1.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            1e-9,
        );
        assert!(t.is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(p(-1.0, 0.25, 0.0), v(1.0, 0.0, 0.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            1e-9,
        );
        assert!(t.is_none());
    }

    #[test]
    fn tiny_triangle_is_hit_through_its_centroid() {
        for side in [1e-3, 1e-5, 1e-7] {
            let c = side / 3.0;
            let ray = Ray::new(p(c, c, 1.0), v(0.0, 0.0, -1.0));
            let t = ray_triangle_intersect(
                &ray,
                &p(0.0, 0.0, 0.0),
                &p(side, 0.0, 0.0),
                &p(0.0, side, 0.0),
                1e-9,
            );
            assert_relative_eq!(t.unwrap_or_default(), 1.0);
        }
    }

    #[test]
    fn zero_area_triangle_misses() {
        let ray = Ray::new(p(0.5, 0.0, 1.0), v(0.0, 0.0, -1.0));
        let t = ray_triangle_intersect(
            &ray,
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(2.0, 0.0, 0.0),
            1e-9,
        );
        assert!(t.is_none());
    }

    #[test]
    fn through_points_at_target() {
        let ray = Ray::through(p(1.0, 1.0, 1.0), p(3.0, 1.0, 1.0));
        let end = ray.at(1.0);
        assert_relative_eq!(end.x, 3.0);
        assert_relative_eq!(end.y, 1.0);
    }
}
