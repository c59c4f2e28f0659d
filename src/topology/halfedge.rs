use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in the half-edge store.
    pub struct HalfEdgeId;
}

/// One directed side of an edge, owned by exactly one face.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    /// Vertex this half-edge starts at.
    pub origin: VertexId,
    /// Opposite half-edge in the neighboring face; `None` on a boundary.
    pub twin: Option<HalfEdgeId>,
    /// Next half-edge around the owning face.
    pub next: HalfEdgeId,
    /// Previous half-edge around the owning face.
    pub prev: HalfEdgeId,
    /// The owning face.
    pub face: FaceId,
}
