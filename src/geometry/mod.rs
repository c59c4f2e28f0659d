mod buffers;
mod model;
mod state;
mod triangle;

pub use buffers::RenderBuffers;
pub use model::Geometry;
pub use state::{GeometryState, Snapshot};
pub use triangle::{ColorIndex, Triangle};

/// Parameters controlling how a [`Geometry`] builds its derived data.
#[derive(Debug, Clone, Copy)]
pub struct GeometryParams {
    /// Maximum number of triangles in a BVH leaf.
    pub bvh_max_leaf_size: usize,
    /// Minimum ray parameter (and parallelism threshold) for ray hits.
    pub ray_epsilon: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            bvh_max_leaf_size: 4,
            ray_epsilon: 1e-9,
        }
    }
}
