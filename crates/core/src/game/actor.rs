//! Actor records shared by the player and enemies.
//! Archetype-specific transient state lives on the enemy record so behaviours
//! can stay stateless.

use serde::Serialize;

use crate::config::{EnemyConfig, PlayerConfig};
use crate::types::{Archetype, AttackOutcome, Cell, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EnemyState {
    pub archetype: Archetype,
    pub aggro_range: u32,
    pub guard_range: u32,
    pub ambush_range: u32,
    pub ambush_speed: usize,
    pub berserk_speed: usize,
    pub strikes_on_arrival: bool,
    /// Turns a bruiser still has to sit out.
    pub wind_up: u32,
    pub skirmisher_ready: bool,
    pub ambush_triggered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActorRole {
    Player,
    Enemy(EnemyState),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Actor {
    #[serde(skip)]
    pub id: EntityId,
    pub pos: Cell,
    pub max_hp: i32,
    pub hp: i32,
    pub base_attack: i32,
    pub fatigue: i32,
    pub min_damage: i32,
    pub defense: i32,
    pub role: ActorRole,
}

/// Base `(hp, attack)` before the level's protection and strength multipliers.
pub fn base_stats(archetype: Archetype) -> (i32, i32) {
    match archetype {
        Archetype::Chaser => (2, 3),
        Archetype::Bruiser => (6, 4),
        Archetype::Skirmisher => (5, 3),
        Archetype::Guard => (5, 3),
        Archetype::Ambusher => (5, 3),
        Archetype::Berserker => (4, 4),
    }
}

impl Actor {
    pub fn player(config: &PlayerConfig, pos: Cell) -> Self {
        Self {
            id: EntityId::default(),
            pos,
            max_hp: config.max_hp,
            hp: config.max_hp,
            base_attack: config.base_attack,
            fatigue: 0,
            min_damage: config.min_damage,
            defense: 0,
            role: ActorRole::Player,
        }
    }

    pub fn enemy(
        archetype: Archetype,
        pos: Cell,
        protection: u32,
        strength: u32,
        config: &EnemyConfig,
    ) -> Self {
        let (hp, attack) = base_stats(archetype);
        let max_hp = hp * protection.max(1) as i32;
        Self {
            id: EntityId::default(),
            pos,
            max_hp,
            hp: max_hp,
            base_attack: attack * strength.max(1) as i32,
            fatigue: 0,
            min_damage: config.min_damage,
            defense: 0,
            role: ActorRole::Enemy(EnemyState {
                archetype,
                aggro_range: config.aggro_range,
                guard_range: config.effective_guard_range(),
                ambush_range: config.ambush_range,
                ambush_speed: config.ambush_speed,
                berserk_speed: config.berserk_speed,
                strikes_on_arrival: config.skirmisher_strikes_on_arrival,
                wind_up: 0,
                skirmisher_ready: false,
                ambush_triggered: false,
            }),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_player(&self) -> bool {
        self.role == ActorRole::Player
    }

    pub fn enemy_state(&self) -> Option<&EnemyState> {
        match &self.role {
            ActorRole::Enemy(state) => Some(state),
            ActorRole::Player => None,
        }
    }

    pub fn enemy_state_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.role {
            ActorRole::Enemy(state) => Some(state),
            ActorRole::Player => None,
        }
    }

    pub fn archetype(&self) -> Option<Archetype> {
        self.enemy_state().map(|state| state.archetype)
    }

    /// Tapers by one per attack since the last successful move.
    pub fn attack_damage(&self) -> i32 {
        (self.base_attack - self.fatigue).max(self.min_damage)
    }

    /// Clamps hp at zero and reports the hp actually lost. `killed` is set
    /// only on the hit that drops it there.
    pub fn take_damage(&mut self, amount: i32) -> AttackOutcome {
        if !self.is_alive() {
            return AttackOutcome::NONE;
        }
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        AttackOutcome { damage: before - self.hp, killed: self.hp == 0 }
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_damage_tapers_with_fatigue_but_respects_floor() {
        let mut actor = Actor::player(&PlayerConfig::default(), Cell::new(1, 1));
        let mut previous = actor.attack_damage();
        assert_eq!(previous, 3);
        for fatigue in 1..6 {
            actor.fatigue = fatigue;
            let damage = actor.attack_damage();
            assert!(damage <= previous);
            assert!(damage >= actor.min_damage);
            previous = damage;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn enemy_stats_scale_with_protection_and_strength() {
        let config = EnemyConfig::default();
        let bruiser = Actor::enemy(Archetype::Bruiser, Cell::new(2, 2), 2, 3, &config);
        assert_eq!((bruiser.max_hp, bruiser.hp, bruiser.base_attack), (12, 12, 12));
        assert_eq!(bruiser.archetype(), Some(Archetype::Bruiser));

        let chaser = Actor::enemy(Archetype::Chaser, Cell::new(2, 2), 0, 0, &config);
        assert_eq!((chaser.max_hp, chaser.base_attack), (2, 3));
    }

    #[test]
    fn damage_clamps_at_zero_and_kills_once() {
        let mut actor = Actor::enemy(
            Archetype::Chaser,
            Cell::new(1, 1),
            1,
            1,
            &EnemyConfig::default(),
        );
        assert_eq!(actor.take_damage(5), AttackOutcome { damage: 2, killed: true });
        assert_eq!(actor.hp, 0);
        assert_eq!(actor.take_damage(5), AttackOutcome::NONE);
    }

    #[test]
    fn heal_caps_at_max_hp() {
        let mut actor = Actor::player(&PlayerConfig::default(), Cell::new(1, 1));
        actor.hp = 15;
        assert_eq!(actor.heal(10), 5);
        assert_eq!(actor.hp, actor.max_hp);
    }
}
