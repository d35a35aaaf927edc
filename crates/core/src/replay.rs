//! Deterministic re-execution of a recorded journal.

use thiserror::Error;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::game::Run;
use crate::journal::{InputJournal, InputPayload};
use crate::types::RunPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The run ended before every recorded input was applied.
    #[error("run ended before input {seq}")]
    InputAfterEnd { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_phase: RunPhase,
    pub final_snapshot_hash: u64,
    pub final_level_index: usize,
    pub final_turn: u64,
}

pub fn replay_to_end(
    config: &SimConfig,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    if !journal.is_replayable() {
        return Err(SimError::InvalidConfiguration(
            "journal was recorded from an injected random source".into(),
        )
        .into());
    }
    let mut run = Run::new(journal.seed, config.clone())?;
    run.start()?;

    for record in &journal.inputs {
        if run.phase() != RunPhase::LevelActive {
            return Err(ReplayError::InputAfterEnd { seq: record.seq });
        }
        match record.payload {
            InputPayload::Click { cell } => {
                run.player_click_cell(cell)?;
            }
            InputPayload::UseConsumable { index } => {
                run.use_consumable(index)?;
            }
            InputPayload::AdvanceRun => run.advance_run()?,
        }
    }

    Ok(ReplayResult {
        final_phase: run.phase(),
        final_snapshot_hash: run.snapshot_hash(),
        final_level_index: run.level_index(),
        final_turn: run.turn(),
    })
}
