use thiserror::Error;

/// Top-level error type for the meshpaint geometry engine.
#[derive(Debug, Error)]
pub enum MeshPaintError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),
}

/// Errors related to the triangle soup itself.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("triangle {triangle} has a non-finite vertex coordinate")]
    NonFiniteVertex { triangle: usize },
}

/// Errors raised while building the half-edge structure.
///
/// These never leave [`Geometry`](crate::geometry::Geometry); a failed build
/// only marks adjacency as unavailable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("triangle {triangle} is degenerate after vertex welding")]
    DegenerateTriangle { triangle: usize },

    #[error("triangle {triangle} repeats directed edge ({from}, {to})")]
    NonManifoldEdge {
        triangle: usize,
        from: usize,
        to: usize,
    },

    #[error("vertex {vertex} is not manifold")]
    NonManifoldVertex { vertex: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to the color palette.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette is full ({max} colors)")]
    Full { max: usize },

    #[error("color index {index} is out of range (palette size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot remove the last palette color")]
    LastColor,
}

/// Errors related to segmentation coloring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("adjacency is unavailable for this mesh")]
    AdjacencyUnavailable,

    #[error("segment map covers {actual} triangles, mesh has {expected}")]
    TriangleCountMismatch { expected: usize, actual: usize },

    #[error("segment {0} does not exist")]
    UnknownSegment(usize),

    #[error("segment {0} has no palette color assigned")]
    UnassignedSegment(usize),
}

/// Convenience type alias for results using [`MeshPaintError`].
pub type Result<T> = std::result::Result<T, MeshPaintError>;
