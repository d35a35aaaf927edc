//! Per-level dynamic state: the actor arena, occupancy-backed movement and the
//! shared attack protocol. Rebuilt wholesale on every level change.

use log::debug;
use slotmap::SlotMap;

use super::actor::Actor;
use super::ai::behavior_for;
use super::player::{Inventory, LegalCells};
use crate::level::Level;
use crate::types::{AttackOutcome, Cell, CellContent, EntityId, SimEvent};

#[derive(Clone, Debug)]
pub struct World {
    pub(super) level: Level,
    pub(super) actors: SlotMap<EntityId, Actor>,
    pub(super) player_id: EntityId,
    /// Registration order; the enemy sweep walks it front to back.
    pub(super) enemy_order: Vec<EntityId>,
    pub(super) inventory: Inventory,
    pub(super) legal: LegalCells,
    pub(super) events: Vec<SimEvent>,
    pub(super) trap_damage: i32,
}

impl World {
    pub fn new(level: Level, player: Actor, inventory: Inventory, trap_damage: i32) -> Self {
        let mut actors = SlotMap::with_key();
        let pos = player.pos;
        let player_id = actors.insert(player);
        actors[player_id].id = player_id;

        let mut world = Self {
            level,
            actors,
            player_id,
            enemy_order: Vec::new(),
            inventory,
            legal: LegalCells::default(),
            events: Vec::new(),
            trap_damage,
        };
        world.level.occupancy_mut().register(player_id, pos);
        world
    }

    pub fn spawn_enemy(&mut self, enemy: Actor) -> EntityId {
        let pos = enemy.pos;
        let id = self.actors.insert(enemy);
        self.actors[id].id = id;
        self.level.occupancy_mut().register(id, pos);
        self.enemy_order.push(id);
        id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub(super) fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn player(&self) -> &Actor {
        &self.actors[self.player_id]
    }

    pub fn player_pos(&self) -> Cell {
        self.player().pos
    }

    pub fn is_player_alive(&self) -> bool {
        self.player().is_alive()
    }

    pub fn enemy_ids(&self) -> &[EntityId] {
        &self.enemy_order
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.enemy_order.iter().filter_map(|id| self.actors.get(*id))
    }

    pub fn enemy_at(&self, cell: Cell) -> Option<EntityId> {
        self.level.occupancy().entity_at(cell).filter(|id| *id != self.player_id)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn legal_cells(&self) -> &LegalCells {
        &self.legal
    }

    /// In bounds, walkable, and not held by another actor. Enemies also keep
    /// off traps.
    pub fn can_enter(&self, id: EntityId, cell: Cell) -> bool {
        let Some(content) = self.level.content_at(cell) else {
            return false;
        };
        if !content.is_walkable() || self.level.occupancy().is_occupied(cell, Some(id)) {
            return false;
        }
        id == self.player_id || content != CellContent::Trap
    }

    /// No-op returning `false` when the cell cannot be entered.
    pub fn move_entity(&mut self, id: EntityId, cell: Cell) -> bool {
        if !self.can_enter(id, cell) {
            return false;
        }
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        let from = actor.pos;
        actor.pos = cell;
        actor.fatigue = 0;
        self.level.occupancy_mut().register(id, cell);
        self.events.push(SimEvent::EntityMoved { entity: id, from, to: cell });
        if id == self.player_id {
            self.refresh_legal();
        }
        true
    }

    /// Damage is the attacker's tapered attack less the target's defense,
    /// never below the attacker's floor. Absent or dead targets take nothing.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> AttackOutcome {
        if attacker == target || !self.actors.get(target).is_some_and(Actor::is_alive) {
            return AttackOutcome::NONE;
        }
        let Some(source) = self.actors.get_mut(attacker) else {
            return AttackOutcome::NONE;
        };
        if !source.is_alive() {
            return AttackOutcome::NONE;
        }
        let raw = source.attack_damage();
        let floor = source.min_damage;
        source.fatigue += 1;

        let defense = self.actors[target].defense;
        let outcome = self.take_damage(target, (raw - defense).max(floor));
        debug!("{attacker:?} hit {target:?} for {} (killed: {})", outcome.damage, outcome.killed);
        outcome
    }

    pub fn take_damage(&mut self, id: EntityId, amount: i32) -> AttackOutcome {
        let Some(actor) = self.actors.get_mut(id) else {
            return AttackOutcome::NONE;
        };
        let outcome = actor.take_damage(amount);
        if outcome.damage > 0 {
            let hp = actor.hp;
            self.events.push(SimEvent::EntityDamaged { entity: id, amount: outcome.damage, hp });
        }
        if outcome.killed {
            self.die(id);
        }
        outcome
    }

    /// Drops the actor's occupancy. Enemies leave the arena and the sweep
    /// order; the player record stays for the end-of-run snapshot.
    fn die(&mut self, id: EntityId) {
        let at = self.level.occupancy_mut().remove(id).or_else(|| self.actor(id).map(|a| a.pos));
        if let Some(at) = at {
            self.events.push(SimEvent::EntityDied { entity: id, at });
        }
        if !self.actors.get(id).is_some_and(Actor::is_player) {
            self.enemy_order.retain(|enemy| *enemy != id);
            self.actors.remove(id);
        }
    }

    /// Every enemy takes one turn in registration order. Stops early when the
    /// player dies. Returns how many enemies acted.
    pub fn run_enemy_turns(&mut self) -> usize {
        let mut acted = 0;
        for id in self.enemy_order.clone() {
            if !self.is_player_alive() {
                break;
            }
            let Some(archetype) = self.actor(id).and_then(Actor::archetype) else {
                continue;
            };
            if behavior_for(archetype).take_turn(self, id) {
                acted += 1;
            }
        }
        acted
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{enemy_at, open_world};
    use super::*;
    use crate::level::CellSink;
    use crate::types::Archetype;

    #[test]
    fn can_enter_is_stable_without_mutation() {
        let world = open_world(Cell::new(2, 2));
        let player = world.player_id();
        for cell in [Cell::new(3, 2), Cell::new(0, 0), Cell::new(9, 9), Cell::new(2, 2)] {
            assert_eq!(world.can_enter(player, cell), world.can_enter(player, cell));
        }
    }

    #[test]
    fn move_resets_fatigue_and_updates_occupancy() {
        let mut world = open_world(Cell::new(2, 2));
        let player = world.player_id();
        world.actor_mut(player).expect("player").fatigue = 3;

        assert!(world.move_entity(player, Cell::new(3, 2)));
        assert_eq!(world.player().fatigue, 0);
        assert_eq!(world.level().occupancy().cell_of(player), Some(Cell::new(3, 2)));
        assert_eq!(world.level().occupancy().entity_at(Cell::new(2, 2)), None);
        assert!(!world.move_entity(player, Cell::new(0, 2)));
    }

    #[test]
    fn enemies_cannot_step_onto_each_other_or_traps() {
        let mut world = open_world(Cell::new(1, 1));
        let a = enemy_at(&mut world, Archetype::Guard, Cell::new(3, 3));
        enemy_at(&mut world, Archetype::Guard, Cell::new(4, 3));
        world.level.set_cell(Cell::new(3, 4), CellContent::Trap);
        assert!(!world.can_enter(a, Cell::new(4, 3)));
        assert!(!world.can_enter(a, Cell::new(3, 4)));
        assert!(world.can_enter(world.player_id(), Cell::new(3, 4)));
        assert!(world.can_enter(a, Cell::new(2, 3)));
    }

    #[test]
    fn attack_builds_fatigue_and_kill_clears_registration() {
        let mut world = open_world(Cell::new(2, 2));
        let player = world.player_id();
        let enemy = enemy_at(&mut world, Archetype::Skirmisher, Cell::new(3, 2));

        let first = world.attack(player, enemy);
        assert_eq!(first, AttackOutcome { damage: 3, killed: false });
        assert_eq!(world.player().fatigue, 1);

        let second = world.attack(player, enemy);
        assert_eq!(second, AttackOutcome { damage: 2, killed: true });
        assert!(world.actor(enemy).is_none());
        assert!(world.enemy_ids().is_empty());
        assert_eq!(world.level().occupancy().entity_at(Cell::new(3, 2)), None);

        assert_eq!(world.attack(player, enemy), AttackOutcome::NONE);
        assert_eq!(world.player().fatigue, 2);
    }

    #[test]
    fn defense_reduces_damage_down_to_attacker_floor() {
        let mut world = open_world(Cell::new(2, 2));
        let player = world.player_id();
        let enemy = enemy_at(&mut world, Archetype::Bruiser, Cell::new(3, 2));
        world.actor_mut(player).expect("player").defense = 10;
        let outcome = world.attack(enemy, player);
        assert_eq!(outcome.damage, 1);
        assert_eq!(world.player().hp, 19);
    }
}
