use crate::color::ColorPalette;

use super::Triangle;

/// Self-contained copy of a [`Geometry`](super::Geometry)'s mutable data.
///
/// Holds no handle to live buffers or indices; restoring it rebuilds every
/// derived structure.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryState {
    pub(super) triangles: Vec<Triangle>,
    pub(super) palette: ColorPalette,
}

impl GeometryState {
    /// Triangles captured in this state.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Palette captured in this state.
    #[must_use]
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }
}

/// Save/restore contract consumed by an undo/redo command stack.
///
/// A command stack saves the target's state before running a command and
/// restores earlier states to undo or replay it.
pub trait Snapshot {
    type State;

    /// Captures the current state.
    fn save_state(&self) -> Self::State;

    /// Replaces the current state, rebuilding anything derived from it.
    fn restore_state(&mut self, state: &Self::State);
}
