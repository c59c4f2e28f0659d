use crate::error::PaletteError;
use crate::geometry::ColorIndex;

use super::Rgba;

/// Maximum number of colors a palette can hold.
pub const MAX_PALETTE_COLORS: usize = 16;

/// Ordered palette of colors addressed by [`ColorIndex`].
///
/// Triangles store indices into the palette, so editing a palette entry
/// recolors every triangle that uses it without touching the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Rgba>,
    active: ColorIndex,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgba::opaque(0.9, 0.9, 0.9),
                Rgba::opaque(0.85, 0.2, 0.2),
                Rgba::opaque(0.2, 0.6, 0.9),
                Rgba::opaque(0.95, 0.8, 0.2),
            ],
            active: 0,
        }
    }
}

impl ColorPalette {
    /// Creates a palette from explicit colors, with the first one active.
    ///
    /// # Errors
    ///
    /// Returns an error if `colors` is empty or longer than
    /// [`MAX_PALETTE_COLORS`].
    pub fn from_colors(colors: Vec<Rgba>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::LastColor);
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(PaletteError::Full {
                max: MAX_PALETTE_COLORS,
            });
        }
        Ok(Self { colors, active: 0 })
    }

    /// Number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette holds at least one color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors, in index order.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Returns the color at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in the palette.
    pub fn color(&self, index: ColorIndex) -> Result<Rgba, PaletteError> {
        self.colors
            .get(index)
            .copied()
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                len: self.colors.len(),
            })
    }

    /// Index of the color new paint operations use.
    #[must_use]
    pub fn active_index(&self) -> ColorIndex {
        self.active
    }

    /// The color new paint operations use.
    #[must_use]
    pub fn active_color(&self) -> Rgba {
        self.colors[self.active]
    }

    /// Selects the active color.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in the palette.
    pub fn set_active_index(&mut self, index: ColorIndex) -> Result<(), PaletteError> {
        self.check(index)?;
        self.active = index;
        Ok(())
    }

    /// Appends a color and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette already holds
    /// [`MAX_PALETTE_COLORS`] colors.
    pub fn add_color(&mut self, color: Rgba) -> Result<ColorIndex, PaletteError> {
        if self.colors.len() >= MAX_PALETTE_COLORS {
            return Err(PaletteError::Full {
                max: MAX_PALETTE_COLORS,
            });
        }
        self.colors.push(color);
        Ok(self.colors.len() - 1)
    }

    /// Replaces the color at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in the palette.
    pub fn replace_color(&mut self, index: ColorIndex, color: Rgba) -> Result<(), PaletteError> {
        self.check(index)?;
        self.colors[index] = color;
        Ok(())
    }

    /// Removes the color at `index`, shifting later colors down by one.
    ///
    /// Triangles referencing removed or shifted indices are the caller's
    /// concern. The active index is clamped into the new range.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not in the palette or it is the last
    /// remaining color.
    pub fn remove_color(&mut self, index: ColorIndex) -> Result<Rgba, PaletteError> {
        self.check(index)?;
        if self.colors.len() == 1 {
            return Err(PaletteError::LastColor);
        }
        let removed = self.colors.remove(index);
        if self.active > index || self.active >= self.colors.len() {
            self.active -= 1;
        }
        Ok(removed)
    }

    fn check(&self, index: ColorIndex) -> Result<(), PaletteError> {
        if index < self.colors.len() {
            Ok(())
        } else {
            Err(PaletteError::IndexOutOfRange {
                index,
                len: self.colors.len(),
            })
        }
    }
}

/// Generates `count` visually distinct opaque colors with evenly spaced hues.
#[must_use]
pub fn generate_colors(count: usize) -> Vec<Rgba> {
    #[allow(clippy::cast_precision_loss)]
    let step = 1.0 / count.max(1) as f32;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let hue = i as f32 * step;
            Rgba::from_hsv(hue, 0.75, 0.95)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_has_active_first_color() {
        let palette = ColorPalette::default();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.active_index(), 0);
        assert_eq!(palette.active_color(), palette.color(0).unwrap());
    }

    #[test]
    fn add_until_full() {
        let mut palette = ColorPalette::default();
        while palette.len() < MAX_PALETTE_COLORS {
            palette.add_color(Rgba::BLACK).unwrap();
        }
        assert_eq!(
            palette.add_color(Rgba::WHITE),
            Err(PaletteError::Full {
                max: MAX_PALETTE_COLORS
            })
        );
    }

    #[test]
    fn out_of_range_lookups_fail() {
        let mut palette = ColorPalette::default();
        assert_eq!(
            palette.color(9),
            Err(PaletteError::IndexOutOfRange { index: 9, len: 4 })
        );
        assert!(palette.set_active_index(4).is_err());
        assert!(palette.replace_color(4, Rgba::BLACK).is_err());
    }

    #[test]
    fn replace_keeps_indices() {
        let mut palette = ColorPalette::default();
        palette.replace_color(2, Rgba::BLACK).unwrap();
        assert_eq!(palette.color(2).unwrap(), Rgba::BLACK);
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn removing_shifts_active_index() {
        let mut palette = ColorPalette::default();
        palette.set_active_index(3).unwrap();
        let third = palette.color(3).unwrap();
        palette.remove_color(1).unwrap();
        assert_eq!(palette.active_index(), 2);
        assert_eq!(palette.active_color(), third);
    }

    #[test]
    fn removing_active_last_color_clamps() {
        let mut palette = ColorPalette::default();
        palette.set_active_index(3).unwrap();
        palette.remove_color(3).unwrap();
        assert_eq!(palette.active_index(), 2);
    }

    #[test]
    fn last_color_cannot_be_removed() {
        let mut palette = ColorPalette::from_colors(vec![Rgba::WHITE]).unwrap();
        assert_eq!(palette.remove_color(0), Err(PaletteError::LastColor));
    }

    #[test]
    fn generated_colors_are_distinct() {
        let colors = generate_colors(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
