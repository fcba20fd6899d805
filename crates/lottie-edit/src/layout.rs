use crate::matcher::NameMatcher;
use crate::transform::for_each_match;
use glam::DVec2;
use lottie_data::{Document, VectorEdit};
use tracing::{debug, info};

/// Row-major grid of tree positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// How many trees to place.
    pub count: usize,
    /// Cells per row. Zero is treated as one.
    pub columns: usize,
    /// Position of the first cell.
    pub origin: DVec2,
    /// Distance between neighbouring cells.
    pub spacing: DVec2,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            count: 6,
            columns: 3,
            origin: DVec2::new(300.0, 400.0),
            spacing: DVec2::new(400.0, 300.0),
        }
    }
}

impl GridLayout {
    pub fn cell(&self, index: usize) -> DVec2 {
        let columns = self.columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        self.origin + DVec2::new(col, row) * self.spacing
    }

    pub fn cells(&self) -> impl Iterator<Item = DVec2> + '_ {
        (0..self.count).map(|i| self.cell(i))
    }
}

/// Moves the first `grid.count` matching layers onto the grid. Trees past the
/// count keep their position. Returns the number of layers placed.
pub fn arrange_grid(doc: &mut Document, matcher: &NameMatcher, grid: &GridLayout) -> usize {
    let placed = for_each_match(doc, matcher, |ordinal, layer| {
        if ordinal >= grid.count {
            return false;
        }
        let cell = grid.cell(ordinal);
        let touched = layer.edit_position(VectorEdit::set(cell.x, cell.y));
        debug!(ordinal, x = cell.x, y = cell.y, touched, "placed tree");
        touched > 0
    });
    info!(count = grid.count, columns = grid.columns, placed, "arranged trees on grid");
    placed
}
