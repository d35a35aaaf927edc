//! Difficulty curves across a run. Every planner is a function of the level's
//! position in the run and its grid size, plus a random source for the
//! probabilistic bonuses.

pub mod door_effects;
pub mod enemies;
pub mod loot;
pub mod structure;

use log::debug;
use serde::Serialize;

use crate::config::LevelSize;
use crate::random::RandomSource;
use crate::types::Archetype;

pub use door_effects::{DoorEffectManager, EffectRule, SAFE_COOLDOWN_LEVELS};
pub use enemies::{EnemyPlan, enemy_plan_for_level};
pub use loot::{LootPlan, LootWeights, NonGoldWeights, build_loot_plan, loot_plan_for_level};
pub use structure::{LevelPlan, MAX_OUT_DOORS, level_plan_for_level};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelContext {
    pub level_index: usize,
    pub total_levels: usize,
    pub cols: usize,
    pub rows: usize,
}

impl LevelContext {
    pub fn progress(&self) -> f64 {
        progress_ratio(self.level_index, self.total_levels)
    }

    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }

    pub fn inner_cells(&self) -> usize {
        (self.cols.saturating_sub(2) * self.rows.saturating_sub(2)).max(1)
    }
}

/// `i / (n - 1)`; a single-level run is at full difficulty.
pub fn progress_ratio(level_index: usize, total_levels: usize) -> f64 {
    if total_levels <= 1 {
        return 1.0;
    }
    (level_index as f64 / (total_levels - 1) as f64).clamp(0.0, 1.0)
}

/// Generation contract for one level. Door effects produce a new record for
/// the following level instead of editing this one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelParams {
    pub cols: usize,
    pub rows: usize,
    pub enemy_count: usize,
    pub enemy_types: Vec<Archetype>,
    pub protection: u32,
    pub strength: u32,
    pub level_plan: LevelPlan,
    pub loot_plan: LootPlan,
}

pub fn plan_level(context: &LevelContext, rng: &mut dyn RandomSource) -> LevelParams {
    let enemy_plan = enemy_plan_for_level(context, rng);
    let level_plan = level_plan_for_level(context);
    let loot_plan = loot_plan_for_level(context, rng);
    debug!(
        "planned level {} of {}: {} enemies ({:?}), {} obstacles, {} traps, {} exits, {} loot",
        context.level_index,
        context.total_levels,
        enemy_plan.enemy_count,
        enemy_plan.enemy_types,
        level_plan.obstacle_count,
        level_plan.trap_count,
        level_plan.door_total,
        loot_plan.items.len()
    );
    LevelParams {
        cols: context.cols,
        rows: context.rows,
        enemy_count: enemy_plan.enemy_count,
        enemy_types: enemy_plan.enemy_types,
        protection: enemy_plan.protection,
        strength: enemy_plan.strength,
        level_plan,
        loot_plan,
    }
}

/// One parameter record per level, in run order.
pub fn plan_run(sizes: &[LevelSize], rng: &mut dyn RandomSource) -> Vec<LevelParams> {
    let total_levels = sizes.len();
    sizes
        .iter()
        .enumerate()
        .map(|(level_index, size)| {
            let context =
                LevelContext { level_index, total_levels, cols: size.cols, rows: size.rows };
            plan_level(&context, rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn progress_spans_zero_to_one() {
        assert_eq!(progress_ratio(0, 1), 1.0);
        assert_eq!(progress_ratio(0, 10), 0.0);
        assert_eq!(progress_ratio(9, 10), 1.0);
        assert!((progress_ratio(3, 7) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn run_plan_has_one_record_per_size_and_keeps_dimensions() {
        let sizes = [LevelSize { cols: 8, rows: 8 }, LevelSize { cols: 12, rows: 10 }];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let plan = plan_run(&sizes, &mut rng);
        assert_eq!(plan.len(), 2);
        assert_eq!((plan[1].cols, plan[1].rows), (12, 10));
        assert!(plan[1].enemy_count >= plan[0].enemy_count);
    }
}
