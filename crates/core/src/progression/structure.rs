//! Structural counts per level: obstacles, traps and exit doors.

use serde::Serialize;

use super::LevelContext;

/// One door per side and the entry door takes a side of its own.
pub const MAX_OUT_DOORS: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelPlan {
    pub progress: f64,
    pub obstacle_density: f64,
    pub trap_density: f64,
    pub obstacle_count: usize,
    pub trap_count: usize,
    /// Number of `out` doors.
    pub door_total: usize,
}

pub fn level_plan_for_level(context: &LevelContext) -> LevelPlan {
    let progress = context.progress();
    let cells = context.cells() as f64;
    let inner_cells = context.inner_cells() as f64;

    let obstacle_density = (0.035 + progress * 0.03).clamp(0.03, 0.08);
    let trap_density = (0.015 + progress * 0.025).clamp(0.01, 0.05);
    let door_total = (2 + (progress * 3.0).floor() as usize).clamp(2, 4).min(MAX_OUT_DOORS);

    let obstacle_cap = ((inner_cells * 0.2).floor() as usize).max(1);
    let trap_cap = ((inner_cells * 0.12).floor() as usize).max(1);

    LevelPlan {
        progress,
        obstacle_density,
        trap_density,
        obstacle_count: ((cells * obstacle_density).floor() as usize).clamp(1, obstacle_cap),
        trap_count: ((cells * trap_density).floor() as usize).clamp(1, trap_cap),
        door_total,
    }
}
