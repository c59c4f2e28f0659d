pub mod color;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod segmentation;
pub mod spatial;
pub mod topology;
pub mod traversal;

pub use error::{MeshPaintError, Result};
pub use geometry::{ColorIndex, Geometry, GeometryParams, GeometryState, Snapshot, Triangle};
