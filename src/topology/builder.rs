//! Incremental construction of a [`HalfEdgeStore`] from indexed triangles.

use std::collections::HashMap;

use crate::error::TopologyError;
use crate::math::Point3;

use super::{FaceId, HalfEdgeId, HalfEdgeStore, VertexData, VertexId};

/// Builds a half-edge structure from welded vertices and index triples.
///
/// Triangles keep the winding they are given. The build fails on anything
/// that cannot be an oriented 2-manifold: repeated corners, a directed edge
/// used twice (an edge shared by more than two faces, or two neighbors with
/// opposite winding), or a vertex whose faces do not form a single fan.
pub struct HalfEdgeBuilder<'a> {
    vertices: &'a [Point3],
    indices: &'a [[usize; 3]],
}

impl<'a> HalfEdgeBuilder<'a> {
    /// Creates a new builder over welded vertices and per-triangle indices.
    #[must_use]
    pub fn new(vertices: &'a [Point3], indices: &'a [[usize; 3]]) -> Self {
        Self { vertices, indices }
    }

    /// Executes the build, returning the store and one face per triangle,
    /// in triangle order.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the input is empty or not manifold.
    ///
    /// # Panics
    ///
    /// Panics if an index triple refers past the end of the vertex list.
    pub fn execute(&self) -> Result<(HalfEdgeStore, Vec<FaceId>), TopologyError> {
        if self.indices.is_empty() {
            return Err(TopologyError::EmptyMesh);
        }

        let mut store = HalfEdgeStore::new();
        let vertex_ids: Vec<VertexId> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &p)| store.add_vertex(VertexData::new(p, i)))
            .collect();

        let mut directed: HashMap<(usize, usize), HalfEdgeId> =
            HashMap::with_capacity(self.indices.len() * 3);
        let mut faces = Vec::with_capacity(self.indices.len());
        let mut outgoing = vec![0usize; self.vertices.len()];

        for (triangle, &[a, b, c]) in self.indices.iter().enumerate() {
            if a == b || b == c || c == a {
                return Err(TopologyError::DegenerateTriangle { triangle });
            }

            let edges = [(a, b), (b, c), (c, a)];
            if let Some(&(from, to)) = edges.iter().find(|e| directed.contains_key(*e)) {
                return Err(TopologyError::NonManifoldEdge { triangle, from, to });
            }

            let face = store.add_triangle([vertex_ids[a], vertex_ids[b], vertex_ids[c]], triangle);
            for (edge, he) in edges.into_iter().zip(store.face_halfedges(face)?) {
                directed.insert(edge, he);
            }
            for v in [a, b, c] {
                outgoing[v] += 1;
            }
            faces.push(face);
        }

        for (&(from, to), &he) in &directed {
            if let Some(&twin) = directed.get(&(to, from)) {
                store.halfedge_mut(he)?.twin = Some(twin);
            }
        }

        for (index, &id) in vertex_ids.iter().enumerate() {
            if outgoing[index] > 0 && fan_size(&store, id)? != outgoing[index] {
                return Err(TopologyError::NonManifoldVertex { vertex: index });
            }
        }

        Ok((store, faces))
    }
}

/// Counts the outgoing half-edges reachable by rotating around a vertex.
///
/// On a manifold vertex this visits every outgoing half-edge; a vertex
/// where two fans touch (a "bow-tie") reaches only one of them.
fn fan_size(store: &HalfEdgeStore, vertex: VertexId) -> Result<usize, TopologyError> {
    let Some(start) = store.vertex(vertex)?.halfedge else {
        return Ok(0);
    };

    let mut count = 1;

    // Rotate one way: the twin of the incoming edge leaves the same vertex.
    let mut current = start;
    loop {
        let incoming = store.halfedge(current)?.prev;
        match store.halfedge(incoming)?.twin {
            Some(next) if next == start => return Ok(count),
            Some(next) => {
                count += 1;
                current = next;
            }
            None => break,
        }
    }

    // Hit a boundary: rotate the other way from the start.
    let mut current = start;
    while let Some(twin) = store.halfedge(current)?.twin {
        current = store.halfedge(twin)?.next;
        count += 1;
    }

    Ok(count)
}
