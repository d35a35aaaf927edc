//! Grid geometry: cell classification, flat-index and world-space conversion.

use serde::Serialize;

use crate::config::GridConfig;
use crate::types::{Cell, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClassifiedCell {
    pub cell: Cell,
    pub side: Side,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    geometry: GridConfig,
}

impl Grid {
    pub fn new(cols: usize, rows: usize, geometry: GridConfig) -> Self {
        Self { cols, rows, geometry }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        in_bounds(self.cols, self.rows, cell)
    }

    pub fn side_of(&self, cell: Cell) -> Option<Side> {
        self.in_bounds(cell).then(|| side_of(self.cols, self.rows, cell))
    }

    pub fn classify_cells(&self) -> Vec<ClassifiedCell> {
        classify_cells(self.cols, self.rows)
    }

    pub fn perimeter_cells(&self) -> Vec<ClassifiedCell> {
        self.classify_cells().into_iter().filter(|cell| cell.side.is_perimeter()).collect()
    }

    pub fn inner_cells(&self) -> Vec<Cell> {
        self.classify_cells()
            .into_iter()
            .filter(|cell| cell.side == Side::Inner)
            .map(|cell| cell.cell)
            .collect()
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell).then(|| cell.row as usize * self.cols + cell.col as usize)
    }

    pub fn cell_at_index(&self, index: usize) -> Option<Cell> {
        (index < self.cell_count())
            .then(|| Cell::new((index % self.cols) as i32, (index / self.cols) as i32))
    }

    /// Center of a cell in world space, with the grid centred on the origin.
    pub fn grid_to_world(&self, col: i32, row: i32, height_offset: f32) -> WorldPos {
        let step = self.geometry.cell_size + self.geometry.gap;
        let half_w = (self.cols as f32 * step) / 2.0;
        let half_h = (self.rows as f32 * step) / 2.0;
        WorldPos {
            x: col as f32 * step - half_w + step / 2.0,
            y: self.geometry.base_height + height_offset,
            z: row as f32 * step - half_h + step / 2.0,
        }
    }
}

/// All cells in row-major order, tagged with their side.
pub fn classify_cells(cols: usize, rows: usize) -> Vec<ClassifiedCell> {
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let cell = Cell::new(col as i32, row as i32);
            cells.push(ClassifiedCell { cell, side: side_of(cols, rows, cell) });
        }
    }
    cells
}

fn side_of(cols: usize, rows: usize, cell: Cell) -> Side {
    let top = cell.row == 0;
    let bottom = cell.row as usize == rows - 1;
    let left = cell.col == 0;
    let right = cell.col as usize == cols - 1;

    if (top || bottom) && (left || right) {
        Side::Corner
    } else if right {
        Side::Right
    } else if left {
        Side::Left
    } else if bottom {
        Side::Bottom
    } else if top {
        Side::Top
    } else {
        Side::Inner
    }
}

pub fn in_bounds(cols: usize, rows: usize, cell: Cell) -> bool {
    cell.col >= 0 && cell.row >= 0 && (cell.col as usize) < cols && (cell.row as usize) < rows
}

/// The four orthogonal neighbours in top, right, bottom, left order. No bounds
/// filtering.
pub fn candidate_cells(cell: Cell) -> [Cell; 4] {
    [
        Cell::new(cell.col, cell.row - 1),
        Cell::new(cell.col + 1, cell.row),
        Cell::new(cell.col, cell.row + 1),
        Cell::new(cell.col - 1, cell.row),
    ]
}

pub fn manhattan(a: Cell, b: Cell) -> u32 {
    a.col.abs_diff(b.col) + a.row.abs_diff(b.row)
}

pub fn chebyshev(a: Cell, b: Cell) -> u32 {
    a.col.abs_diff(b.col).max(a.row.abs_diff(b.row))
}
