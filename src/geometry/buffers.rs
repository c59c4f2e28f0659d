use crate::math::{Point3, Vector3};

use super::triangle::{ColorIndex, Triangle};

/// Flat, unshared render buffers derived from the triangle soup.
///
/// All four buffers have length `3 * triangle_count` and are aligned:
/// slots `3t`, `3t + 1` and `3t + 2` belong to triangle `t`. Vertices are
/// never shared, so every triangle's three slots always hold the same color
/// and the same flat normal.
#[derive(Debug, Clone, Default)]
pub struct RenderBuffers {
    vertices: Vec<Point3>,
    indices: Vec<u32>,
    colors: Vec<ColorIndex>,
    normals: Vec<Vector3>,
}

impl RenderBuffers {
    /// Builds all buffers from the triangles, in triangle order.
    ///
    /// # Panics
    ///
    /// Panics if `3 * triangles.len()` does not fit the `u32` index buffer.
    #[must_use]
    pub fn build(triangles: &[Triangle]) -> Self {
        let len = triangles.len() * 3;
        let mut vertices = Vec::with_capacity(len);
        let mut colors = Vec::with_capacity(len);
        let mut normals = Vec::with_capacity(len);

        for tri in triangles {
            vertices.extend_from_slice(tri.vertices());
            let normal = tri.normal();
            for _ in 0..3 {
                colors.push(tri.color());
                normals.push(normal);
            }
        }

        let indices = identity_indices(len);

        Self {
            vertices,
            indices,
            colors,
            normals,
        }
    }

    /// Overwrites the three color slots of one triangle.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` is out of range.
    pub fn set_triangle_color(&mut self, triangle: usize, color: ColorIndex) {
        let start = triangle * 3;
        self.colors[start..start + 3].fill(color);
    }

    /// Vertex positions, three per triangle.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// The identity index sequence `0..3N`.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-vertex color indices.
    #[must_use]
    pub fn colors(&self) -> &[ColorIndex] {
        &self.colors
    }

    /// Per-vertex flat normals.
    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Number of vertex slots (equal in every buffer).
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

fn identity_indices(len: usize) -> Vec<u32> {
    let count = u32::try_from(len)
        .unwrap_or_else(|_| panic!("{len} render vertices exceed the u32 index range"));
    (0..count).collect()
}
