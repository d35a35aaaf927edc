//! Level rebuilds. The previous world is discarded wholesale; only the player
//! record and inventory carry over into the new arena.

use log::{debug, warn};

use super::Run;
use super::actor::Actor;
use super::player::Inventory;
use super::world::World;
use crate::error::{SimError, SimResult};
use crate::types::{Cell, SimEvent};

impl Run {
    pub(super) fn enter_level(&mut self, level_index: usize) -> SimResult<()> {
        let Some(params) = self.plan.get(level_index).cloned() else {
            return Err(SimError::InvalidConfiguration(format!(
                "level {level_index} is outside the planned run"
            )));
        };

        let (mut player, inventory) = self.carried_player();
        self.collect_events();
        self.world = None;

        let level =
            self.generator.generate(&params, level_index, &mut self.effects, self.rng.as_mut())?;
        let spawn = level.spawn_cell();
        player.pos = spawn;
        player.fatigue = 0;
        let mut world = World::new(level, player, inventory, self.config.traps.damage);

        let enemies = &self.config.enemies;
        let cells = world.level().enemy_spawn_cells(
            params.enemy_count,
            spawn,
            enemies.spawn_min_distance,
            enemies.exit_min_distance,
            self.rng.as_mut(),
        );
        if cells.len() < params.enemy_count {
            warn!(
                "level {level_index}: spawned {} of {} enemies",
                cells.len(),
                params.enemy_count
            );
        }
        for (slot, cell) in cells.into_iter().enumerate() {
            let Some(archetype) = params.enemy_types.get(slot % params.enemy_types.len().max(1))
            else {
                break;
            };
            let enemy =
                Actor::enemy(*archetype, cell, params.protection, params.strength, enemies);
            world.spawn_enemy(enemy);
        }
        world.refresh_legal();
        debug!(
            "level {level_index} ready: player at {spawn:?}, {} enemies",
            world.enemy_ids().len()
        );

        world.events.push(SimEvent::LevelRebuilt { level_index });
        self.world = Some(world);
        Ok(())
    }

    /// The carried player, or a fresh one on the first level.
    fn carried_player(&self) -> (Actor, Inventory) {
        match self.world.as_ref() {
            Some(world) => (world.player().clone(), world.inventory().clone()),
            None => (Actor::player(&self.config.player, Cell::default()), Inventory::default()),
        }
    }
}
