//! Level construction: floor, doors, walls, obstacles, loot, traps. Each later
//! stage excludes the cells of the earlier ones plus their ring.

use log::{debug, warn};

use crate::config::GridConfig;
use crate::error::{SimError, SimResult};
use crate::level::{CellSink, Level, PlacementStage, Shortfall};
use crate::progression::{DoorEffectManager, LevelParams};
use crate::random::RandomSource;
use crate::types::{Cell, CellContent, Door, DoorType};

use super::doors::pick_doors;
use super::grid::Grid;
use super::placement::place_exclusion_aware;

#[derive(Clone, Copy, Debug, Default)]
pub struct LevelGenerator {
    geometry: GridConfig,
}

impl LevelGenerator {
    pub fn new(geometry: GridConfig) -> Self {
        Self { geometry }
    }

    pub fn generate(
        &self,
        params: &LevelParams,
        level_index: usize,
        effects: &mut DoorEffectManager,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Level> {
        let grid = self.grid_for(params)?;
        let mut level = Level::new(grid);
        let shortfalls = self.build(params, level_index, effects, rng, &mut level)?;
        for shortfall in shortfalls {
            level.record_shortfall(shortfall);
        }
        Ok(level)
    }

    fn grid_for(&self, params: &LevelParams) -> SimResult<Grid> {
        if params.cols < 3 || params.rows < 3 {
            return Err(SimError::InvalidConfiguration(format!(
                "level grid {}x{} is smaller than 3x3",
                params.cols, params.rows
            )));
        }
        Ok(Grid::new(params.cols, params.rows, self.geometry))
    }

    /// Writes every stage into `sink` and returns the stages that placed
    /// fewer cells than planned.
    pub fn build(
        &self,
        params: &LevelParams,
        level_index: usize,
        effects: &mut DoorEffectManager,
        rng: &mut dyn RandomSource,
        sink: &mut dyn CellSink,
    ) -> SimResult<Vec<Shortfall>> {
        let grid = self.grid_for(params)?;
        let (cols, rows) = (grid.cols(), grid.rows());
        let perimeter = grid.perimeter_cells();
        let inner = grid.inner_cells();

        for classified in grid.classify_cells() {
            sink.set_cell(classified.cell, CellContent::Floor);
        }

        let mut doors = pick_doors(&perimeter, params.level_plan.door_total + 1, rng)?;
        assign_out_effects(&mut doors, level_index, effects, rng);
        for door in &doors {
            sink.set_cell(
                door.cell,
                CellContent::Door { door_type: door.door_type, effect: door.effect },
            );
        }
        let door_cells: Vec<Cell> = doors.iter().map(|door| door.cell).collect();

        for classified in &perimeter {
            if !door_cells.contains(&classified.cell) {
                sink.set_cell(classified.cell, CellContent::Wall);
            }
        }

        let mut shortfalls = Vec::new();
        let mut skip = door_cells;

        let obstacle_count = params.level_plan.obstacle_count;
        let obstacles = place_exclusion_aware(cols, rows, &inner, &skip, obstacle_count, rng);
        for cell in &obstacles {
            sink.set_cell(*cell, CellContent::Obstacle);
        }
        note_shortfall(&mut shortfalls, PlacementStage::Obstacles, obstacle_count, obstacles.len());
        skip.extend(&obstacles);

        let items = &params.loot_plan.items;
        let pool = without(&inner, &skip);
        let loot = place_exclusion_aware(cols, rows, &pool, &skip, items.len(), rng);
        for (cell, item) in loot.iter().zip(items) {
            sink.set_cell(*cell, CellContent::Loot { item: *item });
        }
        note_shortfall(&mut shortfalls, PlacementStage::Loot, items.len(), loot.len());
        skip.extend(&loot);

        let trap_count = params.level_plan.trap_count;
        let pool = without(&inner, &skip);
        let traps = place_exclusion_aware(cols, rows, &pool, &skip, trap_count, rng);
        for cell in &traps {
            sink.set_cell(*cell, CellContent::Trap);
        }
        note_shortfall(&mut shortfalls, PlacementStage::Traps, trap_count, traps.len());

        debug!(
            "built level {level_index} ({cols}x{rows}): {} doors, {} obstacles, {} loot, {} traps",
            doors.len(),
            obstacles.len(),
            loot.len(),
            traps.len()
        );
        Ok(shortfalls)
    }
}

fn assign_out_effects(
    doors: &mut [Door],
    level_index: usize,
    effects: &mut DoorEffectManager,
    rng: &mut dyn RandomSource,
) {
    let out_count = doors.iter().filter(|door| door.door_type == DoorType::Out).count();
    let picked = effects.generate_out_door_effects(level_index, out_count, rng);
    let outs = doors.iter_mut().filter(|door| door.door_type == DoorType::Out);
    for (door, effect) in outs.zip(picked) {
        door.effect = effect;
    }
}

fn without(cells: &[Cell], excluded: &[Cell]) -> Vec<Cell> {
    cells.iter().copied().filter(|cell| !excluded.contains(cell)).collect()
}

fn note_shortfall(
    shortfalls: &mut Vec<Shortfall>,
    stage: PlacementStage,
    requested: usize,
    placed: usize,
) {
    if placed < requested {
        warn!("{stage:?} stage placed {placed} of {requested}");
        shortfalls.push(Shortfall { stage, requested, placed });
    }
}
