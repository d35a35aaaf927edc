//! Enemy count, archetype pool and stat multipliers per level.

use serde::Serialize;

use crate::random::RandomSource;
use crate::types::Archetype;

use super::LevelContext;

use Archetype::{Ambusher, Berserker, Bruiser, Chaser, Guard, Skirmisher};

const POOL_BY_STAGE: [&[Archetype]; 5] = [
    &[Skirmisher, Chaser],
    &[Chaser, Skirmisher, Guard],
    &[Chaser, Skirmisher, Guard, Bruiser, Berserker],
    &[Chaser, Skirmisher, Guard, Bruiser, Ambusher],
    &[Chaser, Skirmisher, Guard, Bruiser, Ambusher, Berserker],
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemyPlan {
    pub enemy_count: usize,
    pub enemy_types: Vec<Archetype>,
    pub protection: u32,
    pub strength: u32,
    pub progress: f64,
    pub stage: usize,
}

pub fn stage_for(progress: f64) -> usize {
    match progress {
        p if p < 0.2 => 0,
        p if p < 0.4 => 1,
        p if p < 0.6 => 2,
        p if p < 0.8 => 3,
        _ => 4,
    }
}

pub fn pool_for_stage(stage: usize) -> &'static [Archetype] {
    POOL_BY_STAGE[stage.min(POOL_BY_STAGE.len() - 1)]
}

pub fn enemy_plan_for_level(context: &LevelContext, rng: &mut dyn RandomSource) -> EnemyPlan {
    let progress = context.progress();
    let base_count = ((context.cells() as f64 * 0.03).floor() as usize).max(1);
    let progress_bonus = (progress * 5.0).floor() as usize;
    let random_bonus = usize::from(rng.chance(0.45 + progress * 0.3));

    let stage = stage_for(progress);
    EnemyPlan {
        enemy_count: base_count + progress_bonus + random_bonus,
        enemy_types: pool_for_stage(stage).to_vec(),
        protection: 1 + (progress * 2.5).floor() as u32,
        strength: 1 + (progress * 1.9).floor() as u32,
        progress,
        stage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn context(level_index: usize, total_levels: usize) -> LevelContext {
        LevelContext { level_index, total_levels, cols: 10, rows: 10 }
    }

    #[test]
    fn single_level_run_is_maximal_difficulty() {
        let mut rng = SequenceRandom::new([0.99]);
        let plan = enemy_plan_for_level(&context(0, 1), &mut rng);
        assert_eq!(plan.progress, 1.0);
        assert_eq!(plan.stage, 4);
        assert_eq!(plan.protection, 3);
        assert_eq!(plan.strength, 2);
        // 3 base + 5 progress, the 0.99 roll misses the 0.75 bonus chance.
        assert_eq!(plan.enemy_count, 8);
        assert_eq!(plan.enemy_types.len(), 6);
    }

    #[test]
    fn first_level_of_long_run_uses_lowest_stage_pool() {
        let mut rng = SequenceRandom::new([0.0]);
        let plan = enemy_plan_for_level(&context(0, 10), &mut rng);
        assert_eq!(plan.progress, 0.0);
        assert_eq!(plan.stage, 0);
        assert_eq!(plan.enemy_types, vec![Archetype::Skirmisher, Archetype::Chaser]);
        assert_eq!((plan.protection, plan.strength), (1, 1));
        assert_eq!(plan.enemy_count, 3 + 1);
    }

    #[test]
    fn stage_boundaries() {
        assert_eq!(stage_for(0.19), 0);
        assert_eq!(stage_for(0.2), 1);
        assert_eq!(stage_for(0.59), 2);
        assert_eq!(stage_for(0.6), 3);
        assert_eq!(stage_for(0.8), 4);
    }
}
