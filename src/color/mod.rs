mod palette;
mod rgba;

pub use palette::{generate_colors, ColorPalette, MAX_PALETTE_COLORS};
pub use rgba::Rgba;
