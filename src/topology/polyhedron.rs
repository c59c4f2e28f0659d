use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::TopologyError;
use crate::geometry::Triangle;
use crate::math::Point3;
use crate::traversal::Adjacency;

use super::{FaceId, HalfEdgeBuilder, HalfEdgeStore};

/// Connectivity view of the triangle soup.
///
/// Holds the welded vertices, one welded index triple per soup triangle, the
/// half-edge structure built from them and one face handle per triangle.
/// When the half-edge build fails the structure is absent and adjacency is
/// reported as unavailable instead of running on partial data.
#[derive(Debug, Clone, Default)]
pub struct PolyhedronData {
    vertices: Vec<Point3>,
    indices: Vec<[usize; 3]>,
    mesh: Option<HalfEdgeStore>,
    face_handles: Vec<FaceId>,
    closed: bool,
    failure: Option<TopologyError>,
}

impl PolyhedronData {
    /// Welds the soup and builds its half-edge structure.
    ///
    /// Construction never fails outright: a non-manifold or degenerate mesh
    /// yields a polyhedron with no structure, `is_closed() == false` and the
    /// cause available through [`failure`](Self::failure).
    #[must_use]
    pub fn build(triangles: &[Triangle]) -> Self {
        let (vertices, indices) = weld_vertices(triangles);
        debug!(
            triangles = triangles.len(),
            welded_vertices = vertices.len(),
            "Welded triangle soup"
        );

        match HalfEdgeBuilder::new(&vertices, &indices).execute() {
            Ok((mesh, face_handles)) => {
                let closed = mesh.is_closed();
                if closed {
                    info!(faces = mesh.face_count(), "Built closed polyhedron");
                } else {
                    warn!(
                        boundary_halfedges = mesh.boundary_halfedge_count(),
                        "Polyhedron is open, connectivity features disabled"
                    );
                }
                Self {
                    vertices,
                    indices,
                    mesh: Some(mesh),
                    face_handles,
                    closed,
                    failure: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "Polyhedron construction failed");
                Self {
                    vertices,
                    indices,
                    mesh: None,
                    face_handles: Vec::new(),
                    closed: false,
                    failure: Some(err),
                }
            }
        }
    }

    /// Returns `true` if connectivity-dependent features may be used: the
    /// half-edge structure was built and has no boundary.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.mesh.is_some() && self.closed
    }

    /// Returns `true` if the built structure has no boundary edges.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Why the half-edge build failed, if it did.
    #[must_use]
    pub fn failure(&self) -> Option<&TopologyError> {
        self.failure.as_ref()
    }

    /// Welded vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Welded index triple of every soup triangle, in soup order.
    #[must_use]
    pub fn indices(&self) -> &[[usize; 3]] {
        &self.indices
    }

    /// The half-edge structure, if it could be built.
    #[must_use]
    pub fn mesh(&self) -> Option<&HalfEdgeStore> {
        self.mesh.as_ref()
    }

    /// Face handle of a soup triangle, if the structure was built.
    #[must_use]
    pub fn face_handle(&self, triangle: usize) -> Option<FaceId> {
        self.face_handles.get(triangle).copied()
    }

    /// Triangles across edges 0-1, 1-2 and 2-0 of `triangle`.
    ///
    /// Boundary edges, and every edge when the structure could not be built,
    /// report `None`.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` is out of range.
    #[must_use]
    pub fn neighbors_of(&self, triangle: usize) -> [Option<usize>; 3] {
        assert!(
            triangle < self.indices.len(),
            "triangle {triangle} out of range ({})",
            self.indices.len()
        );

        let (Some(mesh), Some(&face)) = (&self.mesh, self.face_handles.get(triangle)) else {
            return [None; 3];
        };
        let Ok(faces) = mesh.face_neighbors(face) else {
            return [None; 3];
        };
        faces.map(|neighbor| {
            neighbor
                .and_then(|id| mesh.face(id).ok())
                .map(|data| data.triangle)
        })
    }
}

impl Adjacency for PolyhedronData {
    fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    fn neighbors(&self, triangle: usize) -> [Option<usize>; 3] {
        self.neighbors_of(triangle)
    }
}

/// Merges soup vertices with identical positions.
///
/// Returns the welded positions, in order of first appearance, and one
/// index triple per triangle. Positions must match exactly; `-0.0` and
/// `0.0` are treated as the same coordinate.
#[must_use]
pub fn weld_vertices(triangles: &[Triangle]) -> (Vec<Point3>, Vec<[usize; 3]>) {
    let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
    let mut vertices = Vec::new();

    let indices = triangles
        .iter()
        .map(|tri| {
            tri.vertices().map(|p| {
                *lookup.entry(position_key(&p)).or_insert_with(|| {
                    vertices.push(p);
                    vertices.len() - 1
                })
            })
        })
        .collect();

    (vertices, indices)
}

fn position_key(p: &Point3) -> [u64; 3] {
    // Adding 0.0 turns -0.0 into +0.0
    [p.x, p.y, p.z].map(|c| (c + 0.0).to_bits())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tri(a: Point3, b: Point3, c: Point3) -> Triangle {
        Triangle::new(a, b, c, 0)
    }

    /// Closed tetrahedron as a soup, outward winding.
    fn tetrahedron() -> Vec<Triangle> {
        let v = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]
            .iter()
            .map(|&[a, b, c]| tri(v[a], v[b], v[c]))
            .collect()
    }

    #[test]
    fn welding_merges_identical_positions() {
        let (vertices, indices) = weld_vertices(&tetrahedron());
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], [0, 1, 2]);
    }

    #[test]
    fn welding_treats_signed_zero_as_equal() {
        let soup = vec![
            tri(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            tri(p(-0.0, 0.0, -0.0), p(0.0, 1.0, 0.0), p(-1.0, 0.0, 0.0)),
        ];
        let (vertices, _) = weld_vertices(&soup);
        assert_eq!(vertices.len(), 4);
    }

    #[test]
    fn tetrahedron_neighbors_are_symmetric() {
        let poly = PolyhedronData::build(&tetrahedron());
        assert!(poly.is_valid());
        for t in 0..4 {
            let neighbors = poly.neighbors_of(t);
            assert!(neighbors.iter().all(Option::is_some));
            for n in neighbors.into_iter().flatten() {
                assert_ne!(n, t);
                assert!(poly.neighbors_of(n).contains(&Some(t)));
            }
        }
    }

    #[test]
    fn neighbor_order_follows_edges() {
        let poly = PolyhedronData::build(&tetrahedron());
        let indices = poly.indices();
        for t in 0..4 {
            for (k, n) in poly.neighbors_of(t).into_iter().enumerate() {
                let n = n.unwrap();
                let a = indices[t][k];
                let b = indices[t][(k + 1) % 3];
                assert!(indices[n].contains(&a) && indices[n].contains(&b));
            }
        }
    }

    #[test]
    fn open_mesh_is_not_valid() {
        let mut soup = tetrahedron();
        soup.pop();
        let poly = PolyhedronData::build(&soup);
        assert!(poly.mesh().is_some());
        assert!(!poly.is_closed());
        assert!(!poly.is_valid());
        // Boundary edges report no neighbor
        assert!(poly.neighbors_of(0).contains(&None));
    }

    #[test]
    fn failed_build_disables_adjacency() {
        let mut soup = tetrahedron();
        // Flip one face so a directed edge repeats
        let [a, b, c] = *soup[0].vertices();
        soup[0] = tri(a, c, b);
        let poly = PolyhedronData::build(&soup);
        assert!(poly.mesh().is_none());
        assert!(!poly.is_valid());
        assert!(matches!(
            poly.failure(),
            Some(TopologyError::NonManifoldEdge { .. })
        ));
        assert_eq!(poly.neighbors_of(2), [None; 3]);
        assert_eq!(poly.indices().len(), 4);
    }

    #[test]
    fn cloned_failure_keeps_its_cause() {
        let mut soup = tetrahedron();
        soup.push(soup[0].clone());
        let poly = PolyhedronData::build(&soup);
        let copy = poly.clone();
        assert!(!copy.is_valid());
        assert_eq!(copy.failure(), poly.failure());
        assert!(matches!(
            copy.failure(),
            Some(TopologyError::NonManifoldEdge { triangle: 4, .. })
        ));
    }

    #[test]
    fn empty_soup_is_not_valid() {
        let poly = PolyhedronData::build(&[]);
        assert!(!poly.is_valid());
        assert_eq!(poly.failure(), Some(&TopologyError::EmptyMesh));
    }
}
