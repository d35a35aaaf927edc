//! Renderer-facing view of the active level.
//! Everything here is a copy; nothing in the simulation reads it back.

use std::iter;

use serde::Serialize;

use super::Run;
use super::player::{Inventory, LegalCells};
use super::world::World;
use crate::level::Shortfall;
use crate::types::{Archetype, Cell, CellContent, Door, LootItem};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelSnapshot {
    pub level_index: usize,
    pub cols: usize,
    pub rows: usize,
    pub floor: Vec<Cell>,
    pub walls: Vec<Cell>,
    pub obstacles: Vec<Cell>,
    pub doors: Vec<Door>,
    pub loot: Vec<LootCell>,
    pub traps: Vec<Cell>,
    pub actors: Vec<ActorSnapshot>,
    pub legal: LegalCells,
    pub inventory: Inventory,
    pub shortfalls: Vec<Shortfall>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LootCell {
    pub cell: Cell,
    pub item: LootItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActorSnapshot {
    pub pos: Cell,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// `None` for the player.
    pub archetype: Option<Archetype>,
}

impl World {
    pub fn snapshot(&self, level_index: usize) -> LevelSnapshot {
        let level = self.level();
        let loot = level
            .loot_cells()
            .iter()
            .filter_map(|cell| match level.content_at(*cell) {
                Some(CellContent::Loot { item }) => Some(LootCell { cell: *cell, item }),
                _ => None,
            })
            .collect();
        let actors = iter::once(self.player())
            .chain(self.enemies())
            .map(|actor| ActorSnapshot {
                pos: actor.pos,
                hp: actor.hp,
                max_hp: actor.max_hp,
                attack: actor.attack_damage(),
                defense: actor.defense,
                archetype: actor.archetype(),
            })
            .collect();

        LevelSnapshot {
            level_index,
            cols: level.cols(),
            rows: level.rows(),
            floor: level.floor_cells(),
            walls: level.walls(),
            obstacles: level.obstacles().to_vec(),
            doors: level.doors().to_vec(),
            loot,
            traps: level.traps().to_vec(),
            actors,
            legal: self.legal_cells().clone(),
            inventory: self.inventory().clone(),
            shortfalls: level.shortfalls().to_vec(),
        }
    }
}

impl Run {
    /// `None` before the run starts.
    pub fn snapshot(&self) -> Option<LevelSnapshot> {
        self.world().map(|world| world.snapshot(self.level_index()))
    }
}
