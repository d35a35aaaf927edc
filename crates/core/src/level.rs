//! One generated level: static cell content, doors, and the occupancy registry
//! of the actors currently standing on it.

pub mod occupancy;

mod spawns;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mapgen::grid::{Grid, WorldPos};
use crate::types::{Cell, CellContent, Door, DoorType, LootItem, Side};

pub use occupancy::Occupancy;

/// Receives cell content from the generator stages.
pub trait CellSink {
    fn set_cell(&mut self, cell: Cell, content: CellContent);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStage {
    Obstacles,
    Loot,
    Traps,
}

/// A placement stage that ran out of eligible cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub stage: PlacementStage,
    pub requested: usize,
    pub placed: usize,
}

/// A cell resolved from a flat index, with its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub cell: Cell,
    pub content: CellContent,
}

#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    contents: BTreeMap<Cell, CellContent>,
    doors: Vec<Door>,
    obstacles: Vec<Cell>,
    loot: Vec<Cell>,
    traps: Vec<Cell>,
    shortfalls: Vec<Shortfall>,
    occupancy: Occupancy,
}

impl CellSink for Level {
    fn set_cell(&mut self, cell: Cell, content: CellContent) {
        match content {
            CellContent::Floor => {
                self.contents.remove(&cell);
                return;
            }
            CellContent::Door { door_type, effect } => {
                if let Some(side) = self.grid.side_of(cell) {
                    self.doors.push(Door { cell, side, door_type, effect });
                }
            }
            CellContent::Obstacle => self.obstacles.push(cell),
            CellContent::Loot { .. } => self.loot.push(cell),
            CellContent::Trap => self.traps.push(cell),
            CellContent::Wall => {}
        }
        self.contents.insert(cell, content);
    }
}

impl Level {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            contents: BTreeMap::new(),
            doors: Vec::new(),
            obstacles: Vec::new(),
            loot: Vec::new(),
            traps: Vec::new(),
            shortfalls: Vec::new(),
            occupancy: Occupancy::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.grid.in_bounds(cell)
    }

    /// `None` outside the grid; cells without a record are floor.
    pub fn content_at(&self, cell: Cell) -> Option<CellContent> {
        self.in_bounds(cell)
            .then(|| self.contents.get(&cell).copied().unwrap_or(CellContent::Floor))
    }

    pub fn is_cell_walkable(&self, cell: Cell) -> bool {
        self.content_at(cell).is_some_and(|content| content.is_walkable())
    }

    pub fn id_to_grid(&self, index: usize) -> Option<GridCell> {
        let cell = self.grid.cell_at_index(index)?;
        let content = self.content_at(cell)?;
        Some(GridCell { cell, content })
    }

    pub fn grid_to_world(&self, col: i32, row: i32, height_offset: f32) -> WorldPos {
        self.grid.grid_to_world(col, row, height_offset)
    }

    /// Doors in pick order; the first is the entry door.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn in_door(&self) -> Option<&Door> {
        self.doors.iter().find(|door| door.door_type == DoorType::In)
    }

    pub fn out_doors(&self) -> impl Iterator<Item = &Door> + '_ {
        self.doors.iter().filter(|door| door.door_type == DoorType::Out)
    }

    pub fn obstacles(&self) -> &[Cell] {
        &self.obstacles
    }

    pub fn loot_cells(&self) -> &[Cell] {
        &self.loot
    }

    pub fn traps(&self) -> &[Cell] {
        &self.traps
    }

    pub fn walls(&self) -> Vec<Cell> {
        self.contents
            .iter()
            .filter(|(_, content)| matches!(content, CellContent::Wall))
            .map(|(cell, _)| *cell)
            .collect()
    }

    /// Every cell of the level, row-major.
    pub fn floor_cells(&self) -> Vec<Cell> {
        self.grid.classify_cells().into_iter().map(|classified| classified.cell).collect()
    }

    pub fn shortfalls(&self) -> &[Shortfall] {
        &self.shortfalls
    }

    pub(crate) fn record_shortfall(&mut self, shortfall: Shortfall) {
        self.shortfalls.push(shortfall);
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn occupancy_mut(&mut self) -> &mut Occupancy {
        &mut self.occupancy
    }

    /// Removes the loot on `cell`, leaving floor behind.
    pub fn take_loot(&mut self, cell: Cell) -> Option<LootItem> {
        let CellContent::Loot { item } = self.contents.get(&cell).copied()? else {
            return None;
        };
        self.contents.remove(&cell);
        self.loot.retain(|loot_cell| *loot_cell != cell);
        Some(item)
    }

    /// Turns a trap cell back into floor. Returns whether a trap was there.
    pub fn disarm_trap(&mut self, cell: Cell) -> bool {
        if self.contents.get(&cell) != Some(&CellContent::Trap) {
            return false;
        }
        self.contents.remove(&cell);
        self.traps.retain(|trap| *trap != cell);
        true
    }

    /// Inner cell with no content record and nobody on it.
    pub fn is_free_inner(&self, cell: Cell) -> bool {
        self.grid.side_of(cell) == Some(Side::Inner)
            && !self.contents.contains_key(&cell)
            && !self.occupancy.is_occupied(cell, None)
    }
}
