pub mod builder;
pub mod face;
pub mod halfedge;
pub mod polyhedron;
pub mod vertex;

pub use builder::HalfEdgeBuilder;
pub use face::{FaceData, FaceId};
pub use halfedge::{HalfEdgeData, HalfEdgeId};
pub use polyhedron::{weld_vertices, PolyhedronData};
pub use vertex::{VertexData, VertexId};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns the half-edge structure of a triangle mesh.
///
/// Faces, half-edges and vertices reference each other via typed IDs
/// (generational indices), so the cyclic face/edge graph needs no shared
/// ownership.
#[derive(Debug, Default, Clone)]
pub struct HalfEdgeStore {
    vertices: SlotMap<VertexId, VertexData>,
    halfedges: SlotMap<HalfEdgeId, HalfEdgeData>,
    faces: SlotMap<FaceId, FaceData>,
}

impl HalfEdgeStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Half-edge operations ---

    /// Returns a reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn halfedge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData, TopologyError> {
        self.halfedges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()))
    }

    /// Returns a mutable reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> Result<&mut HalfEdgeData, TopologyError> {
        self.halfedges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()))
    }

    /// Number of half-edges.
    #[must_use]
    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of half-edges without a twin.
    #[must_use]
    pub fn boundary_halfedge_count(&self) -> usize {
        self.halfedges.values().filter(|he| he.twin.is_none()).count()
    }

    /// Returns `true` if every half-edge has a twin, i.e. the surface has no boundary.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.halfedges.values().all(|he| he.twin.is_some())
    }

    // --- Face operations ---

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Inserts a triangular face over three vertices, wiring its three
    /// half-edges into a loop. Twins are left unset.
    ///
    /// The face's first half-edge runs `corners[0] -> corners[1]`.
    pub fn add_triangle(&mut self, corners: [VertexId; 3], triangle: usize) -> FaceId {
        let face = self.faces.insert(FaceData {
            halfedge: HalfEdgeId::default(),
            triangle,
        });

        let ids = corners.map(|origin| {
            self.halfedges.insert(HalfEdgeData {
                origin,
                twin: None,
                next: HalfEdgeId::default(),
                prev: HalfEdgeId::default(),
                face,
            })
        });

        for k in 0..3 {
            let he = &mut self.halfedges[ids[k]];
            he.next = ids[(k + 1) % 3];
            he.prev = ids[(k + 2) % 3];
            self.vertices[corners[k]].halfedge = Some(ids[k]);
        }
        self.faces[face].halfedge = ids[0];

        face
    }

    /// The three half-edges of a face, starting at its first corner.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or its half-edges are not in the store.
    pub fn face_halfedges(&self, id: FaceId) -> Result<[HalfEdgeId; 3], TopologyError> {
        let first = self.face(id)?.halfedge;
        let second = self.halfedge(first)?.next;
        let third = self.halfedge(second)?.next;
        Ok([first, second, third])
    }

    /// Faces across each of the three edges of a face, `None` on boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or its half-edges are not in the store.
    pub fn face_neighbors(&self, id: FaceId) -> Result<[Option<FaceId>; 3], TopologyError> {
        let mut neighbors = [None; 3];
        for (slot, he) in neighbors.iter_mut().zip(self.face_halfedges(id)?) {
            if let Some(twin) = self.halfedge(he)?.twin {
                *slot = Some(self.halfedge(twin)?.face);
            }
        }
        Ok(neighbors)
    }
}
