//! Tunable simulation parameters. Every field has a default so a partial TOML
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub levels: Vec<LevelSize>,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub traps: TrapConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size: f32,
    pub gap: f32,
    pub base_height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSize {
    pub cols: usize,
    pub rows: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_hp: i32,
    pub base_attack: i32,
    pub min_damage: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub aggro_range: u32,
    /// Falls back to `aggro_range` when unset.
    pub guard_range: Option<u32>,
    pub ambush_range: u32,
    pub ambush_speed: usize,
    pub berserk_speed: usize,
    pub min_damage: i32,
    pub spawn_min_distance: u32,
    pub exit_min_distance: u32,
    /// When set, a skirmisher attacks on the turn it reaches the player
    /// instead of spending that turn getting ready.
    pub skirmisher_strikes_on_arrival: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    pub damage: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            levels: default_levels(),
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            traps: TrapConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 1.0, gap: 0.1, base_height: 0.0 }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { max_hp: 20, base_attack: 3, min_damage: 1 }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            aggro_range: 4,
            guard_range: None,
            ambush_range: 3,
            ambush_speed: 2,
            berserk_speed: 2,
            min_damage: 1,
            spawn_min_distance: 5,
            exit_min_distance: 2,
            skirmisher_strikes_on_arrival: false,
        }
    }
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self { damage: 2 }
    }
}

fn default_levels() -> Vec<LevelSize> {
    [(8, 8), (9, 8), (10, 8), (10, 10), (12, 8), (12, 10), (12, 12), (14, 10), (14, 12), (15, 12)]
        .into_iter()
        .map(|(cols, rows)| LevelSize { cols, rows })
        .collect()
}

impl EnemyConfig {
    pub fn effective_guard_range(&self) -> u32 {
        self.guard_range.unwrap_or(self.aggro_range)
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.levels.is_empty() {
            return Err(SimError::InvalidConfiguration("run needs at least one level".into()));
        }
        if let Some(size) = self.levels.iter().find(|size| size.cols < 3 || size.rows < 3) {
            return Err(SimError::InvalidConfiguration(format!(
                "level grid {}x{} is smaller than 3x3",
                size.cols, size.rows
            )));
        }
        if self.grid.cell_size.is_nan() || self.grid.cell_size <= 0.0 || self.grid.gap < 0.0 {
            return Err(SimError::InvalidConfiguration(
                "cell size must be positive and gap non-negative".into(),
            ));
        }
        if self.player.max_hp <= 0 {
            return Err(SimError::InvalidConfiguration("player max hp must be positive".into()));
        }
        if self.player.min_damage < 0 || self.enemies.min_damage < 0 {
            return Err(SimError::InvalidConfiguration("minimum damage must be >= 0".into()));
        }
        Ok(())
    }
}
