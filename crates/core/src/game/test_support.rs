//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating level and actor setup across many tests.
//! It does not own production simulation logic.

use super::actor::Actor;
use super::player::Inventory;
use super::world::World;
use crate::config::{EnemyConfig, GridConfig, PlayerConfig, SimConfig, TrapConfig};
use crate::level::{CellSink, Level};
use crate::mapgen::grid::Grid;
use crate::types::{Archetype, Cell, CellContent, EntityId};

/// 7x7 room: perimeter walls, empty 5x5 interior, default player.
pub(super) fn open_world(player_pos: Cell) -> World {
    let grid = Grid::new(7, 7, GridConfig::default());
    let mut level = Level::new(grid);
    for classified in grid.perimeter_cells() {
        level.set_cell(classified.cell, CellContent::Wall);
    }
    let player = Actor::player(&PlayerConfig::default(), player_pos);
    let mut world = World::new(level, player, Inventory::default(), TrapConfig::default().damage);
    world.refresh_legal();
    world
}

/// Unscaled enemy with default tuning.
pub(super) fn enemy_at(world: &mut World, archetype: Archetype, cell: Cell) -> EntityId {
    enemy_with(world, archetype, cell, &EnemyConfig::default())
}

pub(super) fn enemy_with(
    world: &mut World,
    archetype: Archetype,
    cell: Cell,
    config: &EnemyConfig,
) -> EntityId {
    let id = world.spawn_enemy(Actor::enemy(archetype, cell, 1, 1, config));
    world.refresh_legal();
    id
}

pub(super) fn place(world: &mut World, cell: Cell, content: CellContent) {
    world.level.set_cell(cell, content);
}

/// Short run on small grids so tests reach the end quickly.
pub(super) fn short_config(levels: usize) -> SimConfig {
    let mut config = SimConfig::default();
    config.levels.truncate(levels.max(1));
    config
}
