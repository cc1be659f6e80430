//! Grid of tintable cells.
//!
//! The grid owns cell identities: a `CellId` is the row-major index of a cell
//! in the currently built grid, so identities are only stable between two
//! rebuilds (`build`, `grow`, `resize`). Cells are stored in row-major order:
//! index = row * cols + col.

use glam::Vec2;

use crate::api::types::CellId;
use crate::systems::palette::Tint;
use crate::systems::rng::Rng;

/// Rows x cols grid of cells, each carrying a visual tint.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u32,
    cols: u32,
    /// Empty until `build` is called.
    tints: Vec<Tint>,
    rng: Rng,
}

impl Grid {
    /// Create an unbuilt grid. Call `build` before drawing cells from it.
    pub fn new(rows: u32, cols: u32, seed: u64) -> Self {
        Self {
            rows,
            cols,
            tints: Vec::new(),
            rng: Rng::new(seed),
        }
    }

    /// (Re)create every cell, all neutral.
    pub fn build(&mut self) {
        self.tints = vec![Tint::Neutral; Self::cell_count_for(self.rows, self.cols)];
    }

    /// Cells in a `rows x cols` grid, without overflowing on huge sides.
    pub fn cell_count_for(rows: u32, cols: u32) -> usize {
        (rows as usize).saturating_mul(cols as usize)
    }

    /// Clear every cell back to neutral, keeping identities.
    pub fn refresh(&mut self) {
        self.tints.fill(Tint::Neutral);
    }

    /// Add `rows` rows and `cols` columns, then rebuild.
    pub fn grow(&mut self, rows: u32, cols: u32) {
        self.rows = self.rows.saturating_add(rows);
        self.cols = self.cols.saturating_add(cols);
        self.build();
    }

    /// Set new dimensions and rebuild.
    pub fn resize(&mut self, rows: u32, cols: u32) {
        self.rows = rows;
        self.cols = cols;
        self.build();
    }

    /// A uniformly random cell of the built grid.
    ///
    /// The grid must be built and non-empty.
    pub fn random_cell(&mut self) -> CellId {
        debug_assert!(!self.tints.is_empty(), "random_cell on an unbuilt grid");
        CellId(self.rng.next_int(self.tints.len() as u32))
    }

    pub fn cell_at(&self, row: u32, col: u32) -> Option<CellId> {
        if row < self.rows && col < self.cols && !self.tints.is_empty() {
            Some(CellId(row * self.cols + col))
        } else {
            None
        }
    }

    /// (row, col) of a cell, if it exists in the built grid.
    pub fn coords(&self, cell: CellId) -> Option<(u32, u32)> {
        if cell.index() < self.tints.len() {
            Some((cell.0 / self.cols, cell.0 % self.cols))
        } else {
            None
        }
    }

    pub fn tint(&self, cell: CellId) -> Option<Tint> {
        self.tints.get(cell.index()).copied()
    }

    /// Apply a tint to a cell. Returns false for unknown cells.
    pub fn set_tint(&mut self, cell: CellId, tint: Tint) -> bool {
        match self.tints.get_mut(cell.index()) {
            Some(slot) => {
                *slot = tint;
                true
            }
            None => false,
        }
    }

    /// Iterate over built cells as (id, row, col, tint).
    pub fn iter(&self) -> impl Iterator<Item = (CellId, u32, u32, Tint)> + '_ {
        let cols = self.cols;
        self.tints
            .iter()
            .enumerate()
            .map(move |(i, tint)| {
                let i = i as u32;
                (CellId(i), i / cols, i % cols, *tint)
            })
    }

    /// Number of cells currently carrying a colour.
    pub fn lit_count(&self) -> usize {
        self.tints.iter().filter(|t| !t.is_neutral()).count()
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of built cells.
    pub fn len(&self) -> usize {
        self.tints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tints.is_empty()
    }

    /// Lay the grid out, centred, inside a world of the given size.
    pub fn layout(&self, world_width: f32, world_height: f32, margin: f32) -> GridLayout {
        GridLayout::fit(self.rows, self.cols, world_width, world_height, margin)
    }
}

/// Placement of a grid in world space: square cells, centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// World position of the top-left corner of cell (0, 0).
    pub origin: Vec2,
    /// Side length of one cell.
    pub cell_size: f32,
    pub rows: u32,
    pub cols: u32,
}

impl GridLayout {
    /// Largest square cells that fit `rows x cols` inside the world minus `margin` on each side.
    pub fn fit(rows: u32, cols: u32, world_width: f32, world_height: f32, margin: f32) -> Self {
        let avail_w = (world_width - 2.0 * margin).max(0.0);
        let avail_h = (world_height - 2.0 * margin).max(0.0);
        let cell_size = if rows == 0 || cols == 0 {
            0.0
        } else {
            (avail_w / cols as f32).min(avail_h / rows as f32)
        };
        let size = Vec2::new(cols as f32 * cell_size, rows as f32 * cell_size);
        let origin = (Vec2::new(world_width, world_height) - size) * 0.5;
        Self {
            origin,
            cell_size,
            rows,
            cols,
        }
    }

    /// Convert a world position to (row, col).
    pub fn world_to_cell(&self, pos: Vec2) -> Option<(u32, u32)> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = (pos - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (col, row) = (local.x.floor() as u32, local.y.floor() as u32);
        if row < self.rows && col < self.cols {
            Some((row, col))
        } else {
            None
        }
    }

    /// World-space centre of a cell.
    pub fn cell_center(&self, row: u32, col: u32) -> Vec2 {
        self.origin
            + Vec2::new(
                (col as f32 + 0.5) * self.cell_size,
                (row as f32 + 0.5) * self.cell_size,
            )
    }
}
