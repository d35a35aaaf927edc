mod loading;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dungeon_core::{Run, autoplay, replay_to_end};
use log::info;

use crate::loading::{load_config, load_journal, save_journal};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML simulation config; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a seeded run with the autopilot
    Simulate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 10_000)]
        max_commands: usize,
        /// Where to write the recorded input journal
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },
    /// Re-run a recorded journal and print the final snapshot hash
    Replay {
        #[arg(short, long)]
        journal: PathBuf,
    },
    /// Print the first level of a seeded run as JSON
    Snapshot {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Simulate { seed, max_commands, journal } => {
            let mut run = Run::new(seed, config).context("failed to build run")?;
            let phase =
                autoplay(&mut run, max_commands).context("simulation failed")?;
            info!("simulation stopped after {} turns", run.turn());

            println!("Simulation complete.");
            println!("Phase: {phase:?}");
            println!("Level: {} of {}", run.level_index() + 1, run.total_levels());
            println!("Turns: {}", run.turn());
            println!("Snapshot Hash: {}", run.snapshot_hash());
            if let Some(path) = journal {
                save_journal(&path, run.journal())?;
                println!("Journal: {}", path.display());
            }
        }
        Command::Replay { journal } => {
            let journal = load_journal(&journal)?;
            let result = replay_to_end(&config, &journal).context("replay failed")?;

            println!("Replay complete.");
            println!("Final Turn: {}", result.final_turn);
            println!("Phase: {:?}", result.final_phase);
            println!("Snapshot Hash: {}", result.final_snapshot_hash);
        }
        Command::Snapshot { seed } => {
            let mut run = Run::new(seed, config).context("failed to build run")?;
            run.start().context("failed to start run")?;
            let snapshot = run.snapshot().context("run has no active level")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
