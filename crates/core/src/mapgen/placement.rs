//! Exclusion-aware random placement for obstacles, loot and traps.

use std::collections::BTreeSet;

use log::warn;

use crate::random::{RandomSource, take_random};
use crate::types::Cell;

use super::grid::in_bounds;

/// The skip cells plus their Chebyshev ring of radius 1, clipped to the grid.
pub fn expand_exclusion(cols: usize, rows: usize, skip: &[Cell]) -> BTreeSet<Cell> {
    let mut excluded = BTreeSet::new();
    for cell in skip {
        for dr in -1..=1 {
            for dc in -1..=1 {
                let near = Cell::new(cell.col + dc, cell.row + dr);
                if in_bounds(cols, rows, near) {
                    excluded.insert(near);
                }
            }
        }
    }
    excluded
}

/// Draws up to `count` cells without replacement from `cells` minus the
/// expanded skip set. A pool smaller than `count` yields fewer cells.
pub fn place_exclusion_aware(
    cols: usize,
    rows: usize,
    cells: &[Cell],
    skip: &[Cell],
    count: usize,
    rng: &mut dyn RandomSource,
) -> Vec<Cell> {
    let excluded = expand_exclusion(cols, rows, skip);
    let mut allowed: Vec<Cell> =
        cells.iter().copied().filter(|cell| !excluded.contains(cell)).collect();

    let mut placed = Vec::with_capacity(count.min(allowed.len()));
    while placed.len() < count {
        let Some(cell) = take_random(rng, &mut allowed) else {
            warn!("placement pool exhausted: placed {} of {count}", placed.len());
            break;
        };
        placed.push(cell);
    }
    placed
}
