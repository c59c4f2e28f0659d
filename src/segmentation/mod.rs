//! Coloring a mesh by segments produced by an external clustering procedure.

mod coloring;
mod segment_map;

pub use coloring::SegmentColoring;
pub use segment_map::SegmentMap;

use tracing::info;

use crate::error::{Result, SegmentationError};
use crate::geometry::Geometry;

/// Largest number of clusters a segmentation may ask for.
pub const MAX_CLUSTERS: usize = 15;

/// Parameters handed to a [`Segmenter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParams {
    /// Requested number of clusters.
    pub cluster_count: usize,
    /// Smoothing weight between neighboring triangles, in `(0, 1]`.
    pub smoothing_lambda: f64,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            smoothing_lambda: 0.3,
        }
    }
}

impl SegmentationParams {
    /// Clamps both parameters into the ranges a segmentation accepts.
    ///
    /// `cluster_count` ends up in `[2, MAX_CLUSTERS]` and no larger than
    /// `triangle_count - 2` unless that would go below 2.
    /// `smoothing_lambda` ends up in `[0.01, 1.0]`.
    #[must_use]
    pub fn clamped(self, triangle_count: usize) -> Self {
        let cluster_count = self
            .cluster_count
            .min(MAX_CLUSTERS)
            .min(triangle_count.saturating_sub(2))
            .max(2);
        Self {
            cluster_count,
            smoothing_lambda: self.smoothing_lambda.clamp(0.01, 1.0),
        }
    }
}

/// External clustering procedure assigning a segment id to every triangle.
pub trait Segmenter {
    /// Returns one segment id per triangle, in triangle order.
    fn segment(&self, geometry: &Geometry, params: &SegmentationParams) -> Vec<usize>;
}

/// Runs `segmenter` on a geometry with clamped parameters and indexes the
/// result.
///
/// # Errors
///
/// Returns an error if adjacency is not valid for the geometry or the
/// segmenter does not label every triangle.
pub fn segment<S>(geometry: &Geometry, segmenter: &S, params: SegmentationParams) -> Result<SegmentMap>
where
    S: Segmenter + ?Sized,
{
    if !geometry.is_adjacency_valid() {
        return Err(SegmentationError::AdjacencyUnavailable.into());
    }

    let params = params.clamped(geometry.triangle_count());
    let labels = segmenter.segment(geometry, &params);
    let map = SegmentMap::from_labels(&labels, geometry.triangle_count())?;

    info!(
        clusters = params.cluster_count,
        segments = map.segment_count(),
        "Segmented geometry"
    );
    Ok(map)
}
