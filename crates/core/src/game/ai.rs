//! Per-archetype enemy turns.
//! Behaviours are stateless strategies; the transient flags they read and
//! write live on the enemy's `EnemyState`.

use std::collections::BTreeSet;

use log::debug;

use super::actor::EnemyState;
use super::pathfinding::bfs_path;
use super::world::World;
use crate::mapgen::grid::{candidate_cells, manhattan};
use crate::types::{Archetype, Cell, EntityId};

pub trait EnemyBehavior {
    /// Resolves one turn for `enemy` against the player. Returns whether the
    /// enemy acted.
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool;
}

pub struct Chaser;
pub struct Bruiser;
pub struct Skirmisher;
pub struct Guard;
pub struct Ambusher;
pub struct Berserker;

pub fn behavior_for(archetype: Archetype) -> &'static dyn EnemyBehavior {
    match archetype {
        Archetype::Chaser => &Chaser,
        Archetype::Bruiser => &Bruiser,
        Archetype::Skirmisher => &Skirmisher,
        Archetype::Guard => &Guard,
        Archetype::Ambusher => &Ambusher,
        Archetype::Berserker => &Berserker,
    }
}

struct TurnView {
    distance: u32,
    state: EnemyState,
}

fn view(world: &World, enemy: EntityId) -> Option<TurnView> {
    if !world.is_player_alive() {
        return None;
    }
    let actor = world.actor(enemy).filter(|actor| actor.is_alive())?;
    let state = *actor.enemy_state()?;
    Some(TurnView { distance: manhattan(actor.pos, world.player_pos()), state })
}

fn update_state(world: &mut World, enemy: EntityId, update: impl FnOnce(&mut EnemyState)) {
    if let Some(state) = world.actor_mut(enemy).and_then(|actor| actor.enemy_state_mut()) {
        update(state);
    }
}

fn strike(world: &mut World, enemy: EntityId) {
    let player = world.player_id();
    world.attack(enemy, player);
}

fn is_alive(world: &World, enemy: EntityId) -> bool {
    world.actor(enemy).is_some_and(|actor| actor.is_alive())
}

impl EnemyBehavior for Chaser {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if turn.distance > turn.state.aggro_range {
            return false;
        }
        if turn.distance == 1 {
            strike(world, enemy);
            return true;
        }
        chase(world, enemy, 1)
    }
}

impl EnemyBehavior for Bruiser {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if turn.distance > turn.state.aggro_range {
            return false;
        }
        if turn.state.wind_up > 0 {
            update_state(world, enemy, |state| state.wind_up -= 1);
            return false;
        }
        let acted = if turn.distance == 1 {
            strike(world, enemy);
            true
        } else {
            chase(world, enemy, 1)
        };
        if acted {
            update_state(world, enemy, |state| state.wind_up = 1);
        }
        acted
    }
}

impl EnemyBehavior for Skirmisher {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if turn.distance > turn.state.aggro_range {
            update_state(world, enemy, |state| state.skirmisher_ready = false);
            return false;
        }
        if turn.distance == 1 {
            return strike_or_ready(world, enemy);
        }

        let moved = chase(world, enemy, 1);
        if !moved || !is_alive(world, enemy) {
            return moved;
        }
        match view(world, enemy) {
            Some(after) if after.distance == 1 => strike_or_ready(world, enemy) || moved,
            _ => moved,
        }
    }
}

/// First adjacency only readies the skirmisher unless it strikes on arrival;
/// a strike is followed by a retreat.
fn strike_or_ready(world: &mut World, enemy: EntityId) -> bool {
    let Some(turn) = view(world, enemy) else { return false };
    if !turn.state.strikes_on_arrival && !turn.state.skirmisher_ready {
        update_state(world, enemy, |state| state.skirmisher_ready = true);
        return false;
    }
    strike(world, enemy);
    if is_alive(world, enemy) {
        retreat_from_player(world, enemy);
    }
    update_state(world, enemy, |state| state.skirmisher_ready = false);
    true
}

impl EnemyBehavior for Guard {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if turn.distance > turn.state.guard_range || turn.distance != 1 {
            return false;
        }
        strike(world, enemy);
        true
    }
}

impl EnemyBehavior for Ambusher {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if !turn.state.ambush_triggered {
            if turn.distance > turn.state.ambush_range {
                return false;
            }
            debug!("ambusher {enemy:?} triggered at distance {}", turn.distance);
            update_state(world, enemy, |state| state.ambush_triggered = true);
        }
        if turn.distance == 1 {
            strike(world, enemy);
            return true;
        }
        chase(world, enemy, turn.state.ambush_speed)
    }
}

impl EnemyBehavior for Berserker {
    fn take_turn(&self, world: &mut World, enemy: EntityId) -> bool {
        let Some(turn) = view(world, enemy) else { return false };
        if turn.distance > turn.state.aggro_range {
            return false;
        }
        if turn.distance == 1 {
            strike(world, enemy);
            return true;
        }
        let enraged = world.actor(enemy).is_some_and(|actor| actor.hp * 2 <= actor.max_hp);
        let speed = if enraged { turn.state.berserk_speed } else { 1 };
        chase(world, enemy, speed)
    }
}

/// Free cells next to the player that the enemy could stand on.
fn approach_targets(world: &World, enemy: EntityId) -> BTreeSet<Cell> {
    candidate_cells(world.player_pos())
        .into_iter()
        .filter(|cell| world.can_enter(enemy, *cell))
        .collect()
}

/// Walks up to `speed` steps along the shortest path to the player's side.
pub(super) fn chase(world: &mut World, enemy: EntityId, speed: usize) -> bool {
    let Some(start) = world.actor(enemy).map(|actor| actor.pos) else {
        return false;
    };
    let targets = approach_targets(world, enemy);
    let Some(path) = bfs_path(start, &targets, |cell| world.can_enter(enemy, cell)) else {
        return false;
    };
    move_along_path(world, enemy, &path, speed)
}

fn move_along_path(world: &mut World, enemy: EntityId, path: &[Cell], speed: usize) -> bool {
    let mut moved = false;
    for step in path.iter().skip(1).take(speed) {
        if !world.move_entity(enemy, *step) {
            break;
        }
        moved = true;
    }
    moved
}

/// Steps to the enterable neighbour that most increases the distance to the
/// player. Stays put when none does.
fn retreat_from_player(world: &mut World, enemy: EntityId) -> bool {
    let Some(pos) = world.actor(enemy).map(|actor| actor.pos) else {
        return false;
    };
    let player = world.player_pos();
    let mut best = None;
    let mut best_distance = manhattan(pos, player);
    for cell in candidate_cells(pos) {
        if !world.can_enter(enemy, cell) {
            continue;
        }
        let distance = manhattan(cell, player);
        if distance > best_distance {
            best_distance = distance;
            best = Some(cell);
        }
    }
    best.is_some_and(|cell| world.move_entity(enemy, cell))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{enemy_at, enemy_with, open_world};
    use super::*;
    use crate::config::EnemyConfig;

    fn take_turn(world: &mut World, enemy: EntityId) -> bool {
        let archetype = world.actor(enemy).and_then(|actor| actor.archetype()).expect("enemy");
        behavior_for(archetype).take_turn(world, enemy)
    }

    fn pos(world: &World, enemy: EntityId) -> Cell {
        world.actor(enemy).expect("alive").pos
    }

    #[test]
    fn chaser_ignores_player_beyond_aggro_range() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Chaser, Cell::new(5, 5));
        assert!(!take_turn(&mut world, enemy));
        assert_eq!(pos(&world, enemy), Cell::new(5, 5));
    }

    #[test]
    fn chaser_advances_then_attacks() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Chaser, Cell::new(3, 2));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(manhattan(pos(&world, enemy), Cell::new(1, 1)), 2);
        assert!(take_turn(&mut world, enemy));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 17);
    }

    #[test]
    fn bruiser_waits_a_turn_after_acting() {
        let mut world = open_world(Cell::new(2, 2));
        let enemy = enemy_at(&mut world, Archetype::Bruiser, Cell::new(3, 2));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 16);
        assert!(!take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 16);
        assert!(take_turn(&mut world, enemy));
        // Second swing is tapered by fatigue.
        assert_eq!(world.player().hp, 13);
    }

    #[test]
    fn skirmisher_readies_then_strikes_and_retreats() {
        let mut world = open_world(Cell::new(3, 3));
        let enemy = enemy_at(&mut world, Archetype::Skirmisher, Cell::new(4, 3));
        assert!(!take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 20);

        assert!(take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 17);
        // Every open neighbour is two away; the first in neighbour order wins.
        assert_eq!(pos(&world, enemy), Cell::new(4, 2));
        let state = world.actor(enemy).and_then(|actor| actor.enemy_state().copied());
        assert_eq!(state.map(|state| state.skirmisher_ready), Some(false));
    }

    #[test]
    fn skirmisher_loses_readiness_out_of_range() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Skirmisher, Cell::new(2, 1));
        take_turn(&mut world, enemy);
        let ready = |world: &World| {
            world.actor(enemy).and_then(|actor| actor.enemy_state()).map(|s| s.skirmisher_ready)
        };
        assert_eq!(ready(&world), Some(true));

        let mut far = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut far, Archetype::Skirmisher, Cell::new(5, 5));
        let state = far.actor_mut(enemy).and_then(|actor| actor.enemy_state_mut());
        state.expect("enemy").skirmisher_ready = true;
        assert!(!take_turn(&mut far, enemy));
        assert_eq!(
            far.actor(enemy).and_then(|actor| actor.enemy_state()).map(|s| s.skirmisher_ready),
            Some(false)
        );
    }

    #[test]
    fn skirmisher_can_strike_on_arrival_when_configured() {
        let config = EnemyConfig { skirmisher_strikes_on_arrival: true, ..EnemyConfig::default() };
        let mut world = open_world(Cell::new(3, 3));
        let enemy = enemy_with(&mut world, Archetype::Skirmisher, Cell::new(5, 3), &config);
        assert!(take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 17);
        assert_eq!(manhattan(pos(&world, enemy), Cell::new(3, 3)), 2);
    }

    #[test]
    fn guard_only_strikes_when_adjacent() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Guard, Cell::new(3, 1));
        assert!(!take_turn(&mut world, enemy));
        assert_eq!(pos(&world, enemy), Cell::new(3, 1));

        world.move_entity(world.player_id(), Cell::new(2, 1));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(world.player().hp, 17);
    }

    #[test]
    fn ambusher_latches_and_bursts() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Ambusher, Cell::new(5, 5));
        assert!(!take_turn(&mut world, enemy));

        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Ambusher, Cell::new(4, 1));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(pos(&world, enemy), Cell::new(2, 1));

        // Triggered ambushers keep acting after the player gets away.
        let player = world.player_id();
        world.move_entity(player, Cell::new(1, 2));
        world.move_entity(player, Cell::new(1, 3));
        world.move_entity(player, Cell::new(1, 4));
        world.move_entity(player, Cell::new(1, 5));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(manhattan(pos(&world, enemy), Cell::new(1, 5)), 3);
    }

    #[test]
    fn berserker_speeds_up_when_wounded() {
        let mut world = open_world(Cell::new(1, 1));
        let enemy = enemy_at(&mut world, Archetype::Berserker, Cell::new(5, 1));
        assert!(take_turn(&mut world, enemy));
        assert_eq!(pos(&world, enemy), Cell::new(4, 1));

        world.actor_mut(enemy).expect("enemy").hp = 2;
        assert!(take_turn(&mut world, enemy));
        assert_eq!(pos(&world, enemy), Cell::new(2, 1));
    }

    #[test]
    fn blocked_enemy_does_not_act() {
        let mut world = open_world(Cell::new(1, 1));
        let blocker_a = enemy_at(&mut world, Archetype::Guard, Cell::new(2, 1));
        let blocker_b = enemy_at(&mut world, Archetype::Guard, Cell::new(1, 2));
        let chaser = enemy_at(&mut world, Archetype::Chaser, Cell::new(3, 3));
        assert!(!take_turn(&mut world, chaser));
        assert_eq!(pos(&world, chaser), Cell::new(3, 3));
        assert!(world.actor(blocker_a).is_some() && world.actor(blocker_b).is_some());
    }
}
