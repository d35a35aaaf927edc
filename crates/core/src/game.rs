//! Run orchestration: the level sequence, the active world, and the turn
//! protocol that follows every player command with the enemy sweep.

pub mod actor;
pub mod ai;
pub mod autopilot;
pub mod pathfinding;
pub mod player;
pub mod snapshot;
pub mod world;

mod hash;
mod transition;

#[cfg(test)]
mod test_support;

use std::mem;

use log::info;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::journal::{InputJournal, InputPayload};
use crate::mapgen::LevelGenerator;
use crate::progression::{DoorEffectManager, LevelParams, plan_run};
use crate::random::RandomSource;
use crate::types::{Cell, ClickOutcome, RunOutcome, RunPhase, SimEvent};

pub use actor::{Actor, ActorRole, EnemyState};
pub use ai::{EnemyBehavior, behavior_for};
pub use autopilot::{autoplay, suggest_click};
pub use pathfinding::bfs_path;
pub use player::{Inventory, LegalCells};
pub use snapshot::{ActorSnapshot, LevelSnapshot};
pub use world::World;

pub struct Run {
    seed: u64,
    config: SimConfig,
    rng: Box<dyn RandomSource>,
    effects: DoorEffectManager,
    generator: LevelGenerator,
    plan: Vec<LevelParams>,
    level_index: usize,
    phase: RunPhase,
    world: Option<World>,
    journal: InputJournal,
    turn: u64,
    events: Vec<SimEvent>,
}

/// Collects the run's collaborators. A random source is required; `seed`
/// supplies the default ChaCha stream.
#[derive(Default)]
pub struct RunBuilder {
    seed: Option<u64>,
    config: Option<SimConfig>,
    rng: Option<Box<dyn RandomSource>>,
    effects: Option<DoorEffectManager>,
}

impl RunBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the seeded stream, e.g. with a scripted sequence.
    pub fn random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn door_effects(mut self, effects: DoorEffectManager) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn build(self) -> SimResult<Run> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let injected_source = self.rng.is_some();
        let rng: Box<dyn RandomSource> = match (self.rng, self.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            (None, None) => {
                return Err(SimError::InvalidConfiguration(
                    "run needs a seed or a random source".into(),
                ));
            }
        };
        let seed = self.seed.unwrap_or_default();
        let journal = InputJournal { injected_source, ..InputJournal::new(seed) };
        Ok(Run {
            seed,
            generator: LevelGenerator::new(config.grid),
            config,
            rng,
            effects: self.effects.unwrap_or_default(),
            plan: Vec::new(),
            level_index: 0,
            phase: RunPhase::Idle,
            world: None,
            journal,
            turn: 0,
            events: Vec::new(),
        })
    }
}

impl Run {
    pub fn new(seed: u64, config: SimConfig) -> SimResult<Self> {
        RunBuilder::new().seed(seed).config(config).build()
    }

    pub fn builder() -> RunBuilder {
        RunBuilder::new()
    }

    /// Plans every level and enters the first one. A run starts once.
    pub fn start(&mut self) -> SimResult<()> {
        if self.phase != RunPhase::Idle {
            return Err(SimError::AlreadyStarted);
        }
        self.plan = plan_run(&self.config.levels, self.rng.as_mut());
        info!("run {} started with {} levels", self.seed, self.plan.len());
        self.enter_level(0)?;
        self.phase = RunPhase::LevelActive;
        Ok(())
    }

    /// Moves to the following level, or ends the run in victory after the
    /// last one. Does nothing unless a level is active.
    pub fn next(&mut self) -> SimResult<()> {
        if self.phase != RunPhase::LevelActive {
            return Ok(());
        }
        let next_index = self.level_index + 1;
        if next_index >= self.plan.len() {
            self.end(RunOutcome::Victory);
            return Ok(());
        }
        info!("advancing to level {next_index}");
        self.level_index = next_index;
        self.enter_level(next_index)
    }

    /// Manual skip past the active level.
    pub fn advance_run(&mut self) -> SimResult<()> {
        if self.phase != RunPhase::LevelActive {
            return Ok(());
        }
        self.journal.append(InputPayload::AdvanceRun);
        self.next()
    }

    /// Resolves a click as attack, move or no-op. Any action other than
    /// leaving the level is followed by one enemy sweep.
    pub fn player_click_cell(&mut self, cell: Cell) -> SimResult<ClickOutcome> {
        if self.phase != RunPhase::LevelActive {
            return Ok(ClickOutcome::Ignored);
        }
        self.journal.append(InputPayload::Click { cell });
        let Some(world) = self.world.as_mut() else {
            return Ok(ClickOutcome::Ignored);
        };

        let outcome = world.resolve_click(cell);
        match outcome {
            ClickOutcome::Ignored => {}
            ClickOutcome::Exited { effect } => {
                self.collect_events();
                let next_index = self.level_index + 1;
                let next_level_index = (next_index < self.plan.len()).then_some(next_index);
                if let Some(index) = next_level_index {
                    self.plan[index] = self.effects.apply_effect_to_next_level(
                        effect,
                        &self.plan[index],
                        self.level_index,
                        self.rng.as_mut(),
                    );
                }
                info!("took {} door out of level {}", effect.id(), self.level_index);
                self.events.push(SimEvent::DoorTaken { effect, next_level_index });
                self.next()?;
            }
            ClickOutcome::Moved { .. } | ClickOutcome::Attacked { .. } => self.finish_turn(),
        }
        Ok(outcome)
    }

    /// Uses a backpack item. A used item costs the player's turn.
    pub fn use_consumable(&mut self, index: usize) -> SimResult<bool> {
        if self.phase != RunPhase::LevelActive {
            return Ok(false);
        }
        self.journal.append(InputPayload::UseConsumable { index });
        let used = self.world.as_mut().is_some_and(|world| world.use_consumable(index));
        if used {
            self.finish_turn();
        }
        Ok(used)
    }

    fn finish_turn(&mut self) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        world.run_enemy_turns();
        world.refresh_legal();
        self.turn += 1;
        let alive = world.is_player_alive();
        self.collect_events();
        if !alive {
            self.end(RunOutcome::Defeat);
        }
    }

    fn end(&mut self, outcome: RunOutcome) {
        self.collect_events();
        self.phase = RunPhase::Ended(outcome);
        self.events.push(SimEvent::RunEnded { outcome });
        info!("run {} ended at level {} with {outcome:?}", self.seed, self.level_index);
    }

    fn collect_events(&mut self) {
        if let Some(world) = self.world.as_mut() {
            self.events.append(&mut world.events);
        }
    }

    /// Events since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.collect_events();
        mem::take(&mut self.events)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn total_levels(&self) -> usize {
        self.plan.len()
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn plan(&self) -> &[LevelParams] {
        &self.plan
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn door_effects(&self) -> &DoorEffectManager {
        &self.effects
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }
}
