//! Build-time failures of the simulation. Gameplay never produces these: an
//! illegal move or attack is a no-op, not an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Fewer distinct perimeter sides than requested doors.
    #[error("not enough perimeter sides for {requested} doors (only {available} available)")]
    Generation { requested: usize, available: usize },

    /// A required collaborator is missing or a configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `start` was called on a run that already left `Idle`.
    #[error("run has already started")]
    AlreadyStarted,
}

pub type SimResult<T> = Result<T, SimError>;
