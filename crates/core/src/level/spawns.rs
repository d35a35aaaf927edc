//! Player and enemy spawn cell selection.

use log::warn;

use crate::mapgen::grid::{candidate_cells, manhattan};
use crate::random::{RandomSource, take_random};
use crate::types::{Cell, Side};

use super::Level;

const FALLBACK_SPAWN: Cell = Cell::new(1, 1);

impl Level {
    /// One step inward from the entry door, else a free neighbour of that
    /// cell, else any free inner cell, else `(1, 1)`.
    pub fn spawn_cell(&self) -> Cell {
        let Some(door) = self.in_door() else {
            return self.first_free_inner().unwrap_or(FALLBACK_SPAWN);
        };

        let (dc, dr) = match door.side {
            Side::Top => (0, 1),
            Side::Bottom => (0, -1),
            Side::Left => (1, 0),
            Side::Right => (-1, 0),
            Side::Corner | Side::Inner => (0, 0),
        };
        let inward = Cell::new(door.cell.col + dc, door.cell.row + dr);
        if self.is_spawnable(inward) {
            return inward;
        }
        if let Some(near) = candidate_cells(inward).into_iter().find(|cell| self.is_spawnable(*cell))
        {
            return near;
        }
        self.first_free_inner().unwrap_or(FALLBACK_SPAWN)
    }

    fn is_spawnable(&self, cell: Cell) -> bool {
        self.grid.side_of(cell) == Some(Side::Inner)
            && self.is_cell_walkable(cell)
            && !self.occupancy.is_occupied(cell, None)
    }

    fn first_free_inner(&self) -> Option<Cell> {
        self.grid.inner_cells().into_iter().find(|cell| self.is_free_inner(*cell))
    }

    /// Up to `count` distinct free inner cells. The strict pool keeps cells at
    /// least `min_distance` from `avoid` and farther than `exit_min_distance`
    /// from every exit door; shortfalls are topped up from free cells not
    /// directly next to `avoid`.
    pub fn enemy_spawn_cells(
        &self,
        count: usize,
        avoid: Cell,
        min_distance: u32,
        exit_min_distance: u32,
        rng: &mut dyn RandomSource,
    ) -> Vec<Cell> {
        let free: Vec<Cell> = self
            .grid
            .inner_cells()
            .into_iter()
            .filter(|cell| self.is_free_inner(*cell) && *cell != avoid)
            .collect();
        let exits: Vec<Cell> = self.out_doors().map(|door| door.cell).collect();

        let mut strict: Vec<Cell> = free
            .iter()
            .copied()
            .filter(|cell| manhattan(*cell, avoid) >= min_distance)
            .filter(|cell| exits.iter().all(|exit| manhattan(*cell, *exit) > exit_min_distance))
            .collect();

        let mut chosen = Vec::with_capacity(count);
        while chosen.len() < count {
            let Some(cell) = take_random(rng, &mut strict) else { break };
            chosen.push(cell);
        }

        if chosen.len() < count {
            let mut relaxed: Vec<Cell> = free
                .iter()
                .copied()
                .filter(|cell| manhattan(*cell, avoid) > 1 && !chosen.contains(cell))
                .collect();
            while chosen.len() < count {
                let Some(cell) = take_random(rng, &mut relaxed) else {
                    warn!("enemy spawn pool exhausted: {} of {count}", chosen.len());
                    break;
                };
                chosen.push(cell);
            }
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;
    use slotmap::SlotMap;

    use super::*;
    use crate::config::GridConfig;
    use crate::level::CellSink;
    use crate::mapgen::grid::Grid;
    use crate::types::{CellContent, DoorEffect, DoorType, EntityId};

    fn level_with_in_door(door: Cell) -> Level {
        let mut level = Level::new(Grid::new(8, 8, GridConfig::default()));
        level.set_cell(
            door,
            CellContent::Door { door_type: DoorType::In, effect: DoorEffect::Normal },
        );
        level
    }

    #[test]
    fn spawn_steps_inward_from_entry_door() {
        assert_eq!(level_with_in_door(Cell::new(3, 0)).spawn_cell(), Cell::new(3, 1));
        assert_eq!(level_with_in_door(Cell::new(7, 4)).spawn_cell(), Cell::new(6, 4));
        assert_eq!(level_with_in_door(Cell::new(2, 7)).spawn_cell(), Cell::new(2, 6));
    }

    #[test]
    fn blocked_inward_cell_probes_neighbours() {
        let mut level = level_with_in_door(Cell::new(0, 4));
        level.set_cell(Cell::new(1, 4), CellContent::Obstacle);
        // Top neighbour comes first.
        assert_eq!(level.spawn_cell(), Cell::new(1, 3));

        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        let blocker = arena.insert(());
        level.occupancy_mut().register(blocker, Cell::new(1, 3));
        assert_eq!(level.spawn_cell(), Cell::new(2, 4));
    }

    #[test]
    fn strict_pool_respects_distances() {
        let mut level = level_with_in_door(Cell::new(0, 4));
        level.set_cell(
            Cell::new(7, 3),
            CellContent::Door { door_type: DoorType::Out, effect: DoorEffect::Normal },
        );
        let avoid = Cell::new(1, 4);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let cells = level.enemy_spawn_cells(3, avoid, 5, 2, &mut rng);
            assert_eq!(cells.len(), 3);
            for cell in &cells {
                assert!(manhattan(*cell, avoid) >= 5);
                assert!(manhattan(*cell, Cell::new(7, 3)) > 2);
            }
        }
    }

    #[test]
    fn relaxed_pool_fills_the_gap() {
        let level = Level::new(Grid::new(5, 5, GridConfig::default()));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // A 3x3 interior has nothing 5 away from its centre.
        let cells = level.enemy_spawn_cells(4, Cell::new(2, 2), 5, 2, &mut rng);
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|cell| manhattan(*cell, Cell::new(2, 2)) > 1));
    }
}
