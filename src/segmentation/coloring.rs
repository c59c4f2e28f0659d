use std::collections::BTreeMap;

use tracing::info;

use crate::color::{generate_colors, ColorPalette, Rgba};
use crate::error::{PaletteError, Result, SegmentationError};
use crate::geometry::{ColorIndex, Geometry};

use super::SegmentMap;

/// Interactive color assignment for a segmented mesh.
///
/// Each segment starts with a generated preview color. Assigning a palette
/// color to a segment updates the override color buffer, which a renderer
/// draws instead of the mesh's own colors. Nothing touches the mesh until
/// [`apply`](Self::apply).
#[derive(Debug, Clone)]
pub struct SegmentColoring {
    map: SegmentMap,
    preview: BTreeMap<usize, Rgba>,
    assigned: BTreeMap<usize, ColorIndex>,
    override_colors: Vec<Rgba>,
}

impl SegmentColoring {
    /// Starts a coloring session with generated preview colors.
    #[must_use]
    pub fn new(map: SegmentMap) -> Self {
        let preview: BTreeMap<usize, Rgba> = map
            .segment_ids()
            .zip(generate_colors(map.segment_count()))
            .collect();

        let mut override_colors = vec![Rgba::BLACK; map.triangle_count() * 3];
        for (segment, triangles) in map.iter() {
            fill(&mut override_colors, triangles, preview[&segment]);
        }

        Self {
            map,
            preview,
            assigned: BTreeMap::new(),
            override_colors,
        }
    }

    /// The segment index this session colors.
    #[must_use]
    pub fn segment_map(&self) -> &SegmentMap {
        &self.map
    }

    /// Per-vertex colors to draw while the session is active, three per
    /// triangle like the render buffers.
    #[must_use]
    pub fn override_colors(&self) -> &[Rgba] {
        &self.override_colors
    }

    /// Segment containing `triangle`.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` is out of range.
    #[must_use]
    pub fn segment_of(&self, triangle: usize) -> usize {
        self.map.segment_of(triangle)
    }

    /// Generated preview color of a segment.
    #[must_use]
    pub fn preview_color(&self, segment: usize) -> Option<Rgba> {
        self.preview.get(&segment).copied()
    }

    /// Palette color assigned to a segment so far.
    #[must_use]
    pub fn assignment(&self, segment: usize) -> Option<ColorIndex> {
        self.assigned.get(&segment).copied()
    }

    /// Assigns a palette color to a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment does not exist or the color is not
    /// in the palette.
    pub fn assign(&mut self, segment: usize, color: ColorIndex, palette: &ColorPalette) -> Result<()> {
        let rgba = palette.color(color)?;
        let triangles = self
            .map
            .triangles(segment)
            .ok_or(SegmentationError::UnknownSegment(segment))?;

        fill(&mut self.override_colors, triangles, rgba);
        self.assigned.insert(segment, color);
        Ok(())
    }

    /// Assigns the palette's active color to the segment containing
    /// `triangle` and returns that segment's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the active color cannot be read from the palette.
    ///
    /// # Panics
    ///
    /// Panics if `triangle` is out of range.
    pub fn assign_at(&mut self, triangle: usize, palette: &ColorPalette) -> Result<usize> {
        let segment = self.segment_of(triangle);
        self.assign(segment, palette.active_index(), palette)?;
        Ok(segment)
    }

    /// Paints every segment with its assigned color.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the geometry untouched, if the map was made
    /// for a different mesh, a segment has no assignment or an assigned color
    /// is no longer in the palette.
    pub fn apply(&self, geometry: &mut Geometry) -> Result<()> {
        if self.map.triangle_count() != geometry.triangle_count() {
            return Err(SegmentationError::TriangleCountMismatch {
                expected: geometry.triangle_count(),
                actual: self.map.triangle_count(),
            }
            .into());
        }

        let palette_len = geometry.palette().len();
        for segment in self.map.segment_ids() {
            let color = self
                .assignment(segment)
                .ok_or(SegmentationError::UnassignedSegment(segment))?;
            if color >= palette_len {
                return Err(PaletteError::IndexOutOfRange {
                    index: color,
                    len: palette_len,
                }
                .into());
            }
        }

        for (segment, triangles) in self.map.iter() {
            geometry.paint_triangles(triangles, self.assigned[&segment]);
        }

        info!(segments = self.map.segment_count(), "Segmentation applied");
        Ok(())
    }
}

fn fill(colors: &mut [Rgba], triangles: &[usize], color: Rgba) {
    for &t in triangles {
        colors[3 * t..3 * t + 3].fill(color);
    }
}
