//! Exit-door modifiers. Each `out` door carries an effect that rewrites the
//! parameters of the level reached through it.

use std::collections::BTreeMap;

use log::debug;

use crate::random::{RandomSource, shuffle, weighted_pick};
use crate::types::DoorEffect;

use super::LevelParams;
use super::loot::{NonGoldWeights, build_loot_plan, non_gold_type_weights};

/// Levels that must pass before `safe` may be offered again.
pub const SAFE_COOLDOWN_LEVELS: usize = 4;

const BLACKSMITH_WEIGHTS: NonGoldWeights =
    NonGoldWeights { weapon: 36.0, armor: 44.0, consumable: 20.0 };

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectRule {
    pub effect: DoorEffect,
    pub weight: f64,
    pub min_level_index: usize,
}

impl EffectRule {
    pub const fn new(effect: DoorEffect, weight: f64, min_level_index: usize) -> Self {
        Self { effect, weight, min_level_index }
    }
}

#[derive(Clone, Debug)]
pub struct DoorEffectManager {
    rules: BTreeMap<DoorEffect, EffectRule>,
    last_safe_offered: Option<usize>,
}

impl Default for DoorEffectManager {
    fn default() -> Self {
        let mut manager = Self { rules: BTreeMap::new(), last_safe_offered: None };
        for rule in [
            EffectRule::new(DoorEffect::Normal, 50.0, 0),
            EffectRule::new(DoorEffect::Greed, 25.0, 0),
            EffectRule::new(DoorEffect::Hazard, 16.0, 0),
            EffectRule::new(DoorEffect::Elite, 12.0, 2),
            EffectRule::new(DoorEffect::Swarm, 14.0, 0),
            EffectRule::new(DoorEffect::Blacksmith, 10.0, 1),
            EffectRule::new(DoorEffect::Safe, 9.0, 2),
        ] {
            manager.register(rule);
        }
        manager
    }
}

impl DoorEffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `rule.effect`.
    pub fn register(&mut self, rule: EffectRule) {
        self.rules.insert(rule.effect, rule);
    }

    pub fn rule(&self, effect: DoorEffect) -> Option<&EffectRule> {
        self.rules.get(&effect)
    }

    pub fn last_safe_offered_level_index(&self) -> Option<usize> {
        self.last_safe_offered
    }

    pub fn can_appear(&self, effect: DoorEffect, level_index: usize) -> bool {
        let Some(rule) = self.rules.get(&effect) else {
            return false;
        };
        if level_index < rule.min_level_index {
            return false;
        }
        match (effect, self.last_safe_offered) {
            (DoorEffect::Safe, Some(last)) => {
                level_index.saturating_sub(last) >= SAFE_COOLDOWN_LEVELS
            }
            _ => true,
        }
    }

    fn eligible(&self, level_index: usize, include_normal: bool) -> Vec<(DoorEffect, f64)> {
        self.rules
            .values()
            .filter(|rule| include_normal || rule.effect != DoorEffect::Normal)
            .filter(|rule| self.can_appear(rule.effect, level_index))
            .map(|rule| (rule.effect, rule.weight))
            .collect()
    }

    pub fn pick_effect_for_level(
        &self,
        level_index: usize,
        rng: &mut dyn RandomSource,
    ) -> DoorEffect {
        weighted_pick(rng, &self.eligible(level_index, true)).unwrap_or(DoorEffect::Normal)
    }

    /// Weighted draw excluding `normal`; falls back to `normal` when nothing
    /// else is eligible.
    pub fn pick_special_effect_for_level(
        &self,
        level_index: usize,
        rng: &mut dyn RandomSource,
    ) -> DoorEffect {
        weighted_pick(rng, &self.eligible(level_index, false)).unwrap_or(DoorEffect::Normal)
    }

    /// One effect per exit door, shuffled. The first slot is always `normal`
    /// and a level with exactly three exits gets one forced special.
    pub fn generate_out_door_effects(
        &mut self,
        level_index: usize,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<DoorEffect> {
        if count == 0 {
            return Vec::new();
        }

        let mut effects = vec![DoorEffect::Normal];
        if count == 3 {
            effects.push(self.pick_special_effect_for_level(level_index, rng));
        }
        while effects.len() < count {
            effects.push(self.pick_effect_for_level(level_index, rng));
        }

        if effects.contains(&DoorEffect::Safe) {
            self.last_safe_offered = Some(level_index);
        }
        shuffle(rng, &mut effects);
        debug!("level {level_index} exit effects: {effects:?}");
        effects
    }

    /// Produces the parameters of the level behind a door with `effect`.
    /// `params` is left untouched; loot is re-rolled from the adjusted counts.
    pub fn apply_effect_to_next_level(
        &self,
        effect: DoorEffect,
        params: &LevelParams,
        level_index: usize,
        rng: &mut dyn RandomSource,
    ) -> LevelParams {
        let mut next = params.clone();
        let progress = params.loot_plan.progress;
        let mut non_gold = next.loot_plan.non_gold_count;
        let mut gold = next.loot_plan.gold_count;
        let mut type_weights = non_gold_type_weights(progress);

        match effect {
            DoorEffect::Normal => return next,
            DoorEffect::Greed => {
                next.enemy_count = scale_at_least(next.enemy_count, 1.35, next.enemy_count + 2);
                gold = scale_at_least(gold, 1.7, gold + 2);
                non_gold = scale_at_least(non_gold, 1.3, non_gold + 1);
            }
            DoorEffect::Hazard => {
                let traps = next.level_plan.trap_count;
                next.level_plan.trap_count = scale_at_least(traps, 2.0, traps + 2);
                next.enemy_count = scale_at_least(next.enemy_count, 1.15, next.enemy_count + 1);
                non_gold = scale_at_least(non_gold, 1.15, 1);
            }
            DoorEffect::Elite => {
                next.enemy_count = scale_at_least(next.enemy_count, 0.75, 1);
                next.protection += 1;
                next.strength += 1;
                non_gold = scale_at_least(non_gold, 1.2, non_gold + 1);
            }
            DoorEffect::Swarm => {
                next.enemy_count = scale_at_least(next.enemy_count, 1.5, next.enemy_count + 3);
                next.protection = next.protection.saturating_sub(1).max(1);
                next.strength = next.strength.saturating_sub(1).max(1);
                gold = scale_at_least(gold, 1.25, gold + 1);
            }
            DoorEffect::Blacksmith => {
                next.enemy_count = scale_at_least(next.enemy_count, 1.1, 1);
                non_gold = scale_at_least(non_gold, 1.35, non_gold + 2);
                gold = scale_at_least(gold, 0.8, 1);
                type_weights = BLACKSMITH_WEIGHTS;
            }
            DoorEffect::Safe => {
                next.enemy_count = 0;
                next.enemy_types.clear();
                next.level_plan.trap_count = 0;
                non_gold = 0;
                gold = (gold + 2).max(1);
            }
        }

        next.loot_plan = build_loot_plan(progress, non_gold, gold, type_weights, rng);
        debug!(
            "{} door from level {level_index}: {} enemies, {} traps, {} loot",
            effect.id(),
            next.enemy_count,
            next.level_plan.trap_count,
            next.loot_plan.count()
        );
        next
    }
}

/// `max(floor, floor(value * factor))`.
fn scale_at_least(value: usize, factor: f64, floor: usize) -> usize {
    ((value as f64 * factor).floor() as usize).max(floor)
}
