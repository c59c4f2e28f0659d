use crate::math::{Point3, Vector3};

/// Index into the [`ColorPalette`](crate::color::ColorPalette).
pub type ColorIndex = usize;

/// A triangle of the soup: three fixed corners and a paintable color.
///
/// Triangles never share vertex storage, so each one can carry its own
/// color. The corners are immutable once the triangle is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3; 3],
    color: ColorIndex,
}

impl Triangle {
    /// Creates a triangle from three corners and a color index.
    #[must_use]
    pub fn new(a: Point3, b: Point3, c: Point3, color: ColorIndex) -> Self {
        Self {
            vertices: [a, b, c],
            color,
        }
    }

    /// Returns the three corners in winding order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3; 3] {
        &self.vertices
    }

    /// Returns the `i`-th corner.
    ///
    /// # Panics
    ///
    /// Panics if `i >= 3`.
    #[must_use]
    pub fn vertex(&self, i: usize) -> &Point3 {
        &self.vertices[i]
    }

    /// Returns the color index.
    #[must_use]
    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: ColorIndex) {
        self.color = color;
    }

    /// Unit flat normal, `(b - a) × (c - a)` normalized.
    ///
    /// Only exactly zero-area triangles lack a normal and return the zero
    /// vector; tiny triangles still get a unit normal.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        let [a, b, c] = &self.vertices;
        (b - a)
            .cross(&(c - a))
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Surface area of the triangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a)).norm() * 0.5
    }

    /// Arithmetic mean of the three corners.
    #[must_use]
    pub fn centroid(&self) -> Point3 {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }

    /// Returns `true` if both triangles have identical corners, ignoring color.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}
