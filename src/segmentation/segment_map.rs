use std::collections::BTreeMap;

use crate::error::SegmentationError;

/// Two-way index between segment ids and the triangles they contain.
///
/// Segment ids are whatever the segmenter produced; they need not be dense.
/// Triangle lists are kept in ascending triangle order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMap {
    segments: BTreeMap<usize, Vec<usize>>,
    labels: Vec<usize>,
}

impl SegmentMap {
    /// Builds the index from one segment id per triangle.
    ///
    /// # Errors
    ///
    /// Returns an error if `labels` does not have exactly `triangle_count`
    /// entries.
    pub fn from_labels(labels: &[usize], triangle_count: usize) -> Result<Self, SegmentationError> {
        if labels.len() != triangle_count {
            return Err(SegmentationError::TriangleCountMismatch {
                expected: triangle_count,
                actual: labels.len(),
            });
        }

        let mut segments: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (triangle, &segment) in labels.iter().enumerate() {
            segments.entry(segment).or_default().push(triangle);
        }

        Ok(Self {
            segments,
            labels: labels.to_vec(),
        })
    }

    /// Number of distinct segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of triangles the map labels.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.labels.len()
    }

    /// Segment ids in ascending order.
    pub fn segment_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.keys().copied()
    }

    /// Triangles of a segment, or `None` for an unknown id.
    #[must_use]
    pub fn triangles(&self, segment: usize) -> Option<&[usize]> {
        self.segments.get(&segment).map(Vec::as_slice)
    }

    /// Iterates `(segment id, triangles)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.segments.iter().map(|(&id, tris)| (id, tris.as_slice()))
    }

    /// Segment id of a triangle.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` is out of range.
    #[must_use]
    pub fn segment_of(&self, triangle: usize) -> usize {
        assert!(
            triangle < self.labels.len(),
            "triangle {triangle} out of range ({})",
            self.labels.len()
        );
        self.labels[triangle]
    }

    /// Flood-fill predicate that never crosses a segment border.
    pub fn same_segment(&self) -> impl Fn(usize, usize) -> bool + '_ {
        move |candidate, from| self.labels[candidate] == self.labels[from]
    }
}
