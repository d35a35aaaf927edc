pub mod config;
pub mod error;
pub mod game;
pub mod journal;
pub mod level;
pub mod mapgen;
pub mod progression;
pub mod random;
pub mod replay;
pub mod types;

pub use config::{EnemyConfig, GridConfig, LevelSize, PlayerConfig, SimConfig, TrapConfig};
pub use error::{SimError, SimResult};
pub use game::{LevelSnapshot, Run, RunBuilder, World, autoplay, suggest_click};
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use level::{CellSink, Level};
pub use mapgen::{LevelGenerator, generate_level};
pub use progression::{DoorEffectManager, LevelParams};
pub use random::{RandomSource, SequenceRandom};
pub use replay::*;
pub use types::*;
