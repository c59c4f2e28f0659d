use super::halfedge::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the half-edge store.
    pub struct FaceId;
}

/// Data associated with a triangular face.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Half-edge running from the triangle's first corner to its second.
    pub halfedge: HalfEdgeId,
    /// Index of the soup triangle this face was built from.
    pub triangle: usize,
}
