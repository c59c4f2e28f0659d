use crate::math::Point3;

use super::halfedge::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a welded vertex in the half-edge store.
    pub struct VertexId;
}

/// Data associated with a welded vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Index of this vertex in the welded vertex list.
    pub index: usize,
    /// One outgoing half-edge, if the vertex is used by any face.
    pub halfedge: Option<HalfEdgeId>,
}

impl VertexData {
    /// Creates an isolated vertex at the given point.
    #[must_use]
    pub fn new(point: Point3, index: usize) -> Self {
        Self {
            point,
            index,
            halfedge: None,
        }
    }
}
