use crate::components::grid::{Grid, GridLayout};
use crate::renderer::instance::{CellBuffer, CellInstance};
use crate::systems::palette::Tint;

/// Fraction of the layout cell covered by the drawn cell; the rest is the gap.
pub const CELL_FILL: f32 = 0.9;

/// Build the cell buffer from the grid, one instance per built cell in row-major order.
pub fn build_cell_buffer(grid: &Grid, layout: &GridLayout, buffer: &mut CellBuffer) {
    buffer.clear();

    for (cell, row, col, tint) in grid.iter() {
        let centre = layout.cell_center(row, col);
        let ([r, g, b], alpha) = match tint {
            Tint::Neutral => ([0.0; 3], 0.0),
            Tint::Colour(colour) => (colour.to_f32(), 1.0),
        };
        buffer.push(CellInstance {
            x: centre.x,
            y: centre.y,
            size: layout.cell_size * CELL_FILL,
            r,
            g,
            b,
            alpha,
            cell: cell.0 as f32,
        });
    }
}
