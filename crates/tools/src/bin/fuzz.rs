use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{Cell, Run, RunPhase, SimConfig, World};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    commands: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> Option<T> {
    if slice.is_empty() {
        return None;
    }
    let p = rng.next_u64() as usize % slice.len();
    Some(slice[p])
}

fn check_invariants(world: &World) -> Result<()> {
    let player = world.player();
    if player.hp < 0 || player.hp > player.max_hp {
        bail!("Invariant failed: player hp {} outside 0..={}", player.hp, player.max_hp);
    }
    for enemy in world.enemies() {
        if !world.level().is_cell_walkable(enemy.pos) {
            bail!("Invariant failed: enemy inside blocked cell {:?}", enemy.pos);
        }
        if world.level().occupancy().cell_of(enemy.id) != Some(enemy.pos) {
            bail!("Invariant failed: occupancy out of sync for {:?}", enemy.id);
        }
        if enemy.fatigue < 0 {
            bail!("Invariant failed: negative fatigue");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for max {} commands...", args.seed, args.commands);
    let mut run = Run::new(args.seed, SimConfig::default())?;
    run.start()?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for step in 0..args.commands {
        if let RunPhase::Ended(outcome) = run.phase() {
            println!("Finished with outcome {outcome:?} after {step} commands");
            break;
        }
        let Some(world) = run.world() else { break };
        let legal = world.legal_cells();
        let options: Vec<Cell> = legal.attacks.iter().chain(&legal.moves).copied().collect();
        // Mostly legal clicks, sometimes an arbitrary cell to exercise the no-op path.
        let cell = match rng.next_u64() % 8 {
            0 => Cell::new((rng.next_u64() % 20) as i32 - 2, (rng.next_u64() % 16) as i32 - 2),
            _ => match choose(&mut rng, &options) {
                Some(cell) => cell,
                None => {
                    run.advance_run()?;
                    continue;
                }
            },
        };
        run.player_click_cell(cell)?;
        if rng.next_u64() % 16 == 0 {
            run.use_consumable(0)?;
        }
        if let Some(world) = run.world() {
            check_invariants(world)?;
        }
    }

    println!("Fuzz complete. Snapshot Hash: {}", run.snapshot_hash());
    Ok(())
}
