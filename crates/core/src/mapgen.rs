//! Procedural level construction split into geometry, door picking,
//! exclusion-aware placement and the stage orchestration.

pub mod doors;
pub mod grid;
pub mod placement;

mod generator;

pub use generator::LevelGenerator;
pub use grid::{ClassifiedCell, Grid, WorldPos};

use crate::config::GridConfig;
use crate::error::SimResult;
use crate::level::Level;
use crate::progression::{DoorEffectManager, LevelParams};
use crate::random::RandomSource;

pub fn generate_level(
    params: &LevelParams,
    level_index: usize,
    geometry: GridConfig,
    effects: &mut DoorEffectManager,
    rng: &mut dyn RandomSource,
) -> SimResult<Level> {
    LevelGenerator::new(geometry).generate(params, level_index, effects, rng)
}
