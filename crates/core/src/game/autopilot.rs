//! Scripted player for headless runs: fight what is adjacent, grab adjacent
//! loot, otherwise walk the shortest route to an exit door.

use std::collections::BTreeSet;

use log::debug;

use super::Run;
use super::pathfinding::bfs_path;
use super::world::World;
use crate::error::SimResult;
use crate::types::{Cell, CellContent, RunPhase};

/// Next cell to click, or `None` when no exit can be reached.
pub fn suggest_click(world: &World) -> Option<Cell> {
    let legal = world.legal_cells();
    if let Some(target) = legal.attacks.first() {
        return Some(*target);
    }
    if let Some(loot) = legal.loot.first() {
        return Some(*loot);
    }

    let exits: BTreeSet<Cell> = world.level().out_doors().map(|door| door.cell).collect();
    let start = world.player_pos();
    let level = world.level();
    // Enemies are walked through: the step onto one becomes an attack.
    let avoiding_traps = bfs_path(start, &exits, |cell| {
        level.is_cell_walkable(cell) && level.content_at(cell) != Some(CellContent::Trap)
    });
    let path = avoiding_traps
        .or_else(|| bfs_path(start, &exits, |cell| level.is_cell_walkable(cell)));
    path.and_then(|path| path.get(1).copied())
}

/// Plays until the run ends or `max_commands` commands were issued. Starts the
/// run when it is still idle; skips a level with no reachable exit.
pub fn autoplay(run: &mut Run, max_commands: usize) -> SimResult<RunPhase> {
    if run.phase() == RunPhase::Idle {
        run.start()?;
    }
    for _ in 0..max_commands {
        if run.phase() != RunPhase::LevelActive {
            break;
        }
        match run.world().and_then(suggest_click) {
            Some(cell) => {
                run.player_click_cell(cell)?;
            }
            None => {
                debug!("no reachable exit on level {}; skipping", run.level_index());
                run.advance_run()?;
            }
        }
    }
    Ok(run.phase())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{enemy_at, open_world, place, short_config};
    use super::*;
    use crate::types::{Archetype, DoorEffect, DoorType, LootItem, LootKind, Rarity};

    fn exit_at(world: &mut World, cell: Cell) {
        let door = CellContent::Door { door_type: DoorType::Out, effect: DoorEffect::Normal };
        place(world, cell, door);
    }

    #[test]
    fn attacks_before_looting_before_walking() {
        let mut world = open_world(Cell::new(3, 3));
        exit_at(&mut world, Cell::new(6, 3));
        let gold = LootItem { kind: LootKind::Gold, rarity: Rarity::Common, stat: 5 };
        place(&mut world, Cell::new(3, 2), CellContent::Loot { item: gold });
        enemy_at(&mut world, Archetype::Guard, Cell::new(2, 3));
        world.refresh_legal();
        assert_eq!(suggest_click(&world), Some(Cell::new(2, 3)));

        let mut world = open_world(Cell::new(3, 3));
        exit_at(&mut world, Cell::new(6, 3));
        place(&mut world, Cell::new(3, 2), CellContent::Loot { item: gold });
        world.refresh_legal();
        assert_eq!(suggest_click(&world), Some(Cell::new(3, 2)));
    }

    #[test]
    fn walks_toward_exit_around_traps() {
        let mut world = open_world(Cell::new(3, 3));
        exit_at(&mut world, Cell::new(6, 3));
        place(&mut world, Cell::new(4, 3), CellContent::Trap);
        world.refresh_legal();
        let step = suggest_click(&world).expect("step");
        assert_ne!(step, Cell::new(4, 3));
        assert!(world.legal_cells().moves.contains(&step));
    }

    #[test]
    fn no_exit_means_no_suggestion() {
        let world = open_world(Cell::new(3, 3));
        assert_eq!(suggest_click(&world), None);
    }

    #[test]
    fn autoplay_finishes_a_short_run() {
        let mut run = Run::new(99, short_config(2)).expect("run");
        let phase = autoplay(&mut run, 2_000).expect("autoplay");
        assert!(matches!(phase, RunPhase::Ended(_)));
    }
}
