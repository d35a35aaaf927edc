//! Loot plan per level: how many items, of which category and rarity, and how
//! strong. Item rolls are redone whenever a door effect changes the counts.

use serde::Serialize;

use crate::random::{RandomSource, choose, weighted_pick};
use crate::types::{ArmorSlot, ConsumableKind, LootItem, LootKind, LootType, Rarity, WeaponKind};

use super::LevelContext;

const WEAPONS: [WeaponKind; 5] =
    [WeaponKind::Sword, WeaponKind::Axe, WeaponKind::Mace, WeaponKind::Spear, WeaponKind::Dagger];
const ARMOR_SLOTS: [ArmorSlot; 5] =
    [ArmorSlot::Helmet, ArmorSlot::Chest, ArmorSlot::Gloves, ArmorSlot::Boots, ArmorSlot::Cloak];
const CONSUMABLES: [ConsumableKind; 2] = [ConsumableKind::HpPotion, ConsumableKind::Bomb];

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RarityWeights {
    pub common: f64,
    pub epic: f64,
    pub legendary: f64,
}

/// Category weights for non-gold items.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NonGoldWeights {
    pub weapon: f64,
    pub armor: f64,
    pub consumable: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LootWeights {
    pub rarity: RarityWeights,
    pub non_gold_type: NonGoldWeights,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LootPlan {
    pub progress: f64,
    pub non_gold_count: usize,
    pub gold_count: usize,
    /// Non-gold items first, then gold.
    pub items: Vec<LootItem>,
    pub weights: LootWeights,
}

impl LootPlan {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

pub fn rarity_weights(progress: f64) -> RarityWeights {
    RarityWeights {
        common: 84.0 - 36.0 * progress,
        epic: 14.0 + 23.0 * progress,
        legendary: 2.0 + 13.0 * progress,
    }
}

pub fn non_gold_type_weights(progress: f64) -> NonGoldWeights {
    NonGoldWeights {
        weapon: 18.0 + 16.0 * progress,
        armor: 22.0 + 20.0 * progress,
        consumable: 30.0 - 8.0 * progress,
    }
}

fn scaled_stat(base: f64, rarity: Rarity) -> u32 {
    ((base * rarity.multiplier()).round() as u32).max(1)
}

/// Rolls the sub-type and stat of one item. `loot_type` picks the table.
pub fn create_item(
    loot_type: LootType,
    rarity: Rarity,
    progress: f64,
    rng: &mut dyn RandomSource,
) -> LootItem {
    let (kind, base) = match loot_type {
        LootType::Weapon => {
            let kind = choose(rng, &WEAPONS).unwrap_or(WeaponKind::Sword);
            (LootKind::Weapon(kind), 2.0 + progress * 4.0)
        }
        LootType::Armor => {
            let slot = choose(rng, &ARMOR_SLOTS).unwrap_or(ArmorSlot::Helmet);
            (LootKind::Armor(slot), 1.0 + progress * 3.0)
        }
        LootType::Consumable => match choose(rng, &CONSUMABLES) {
            Some(ConsumableKind::Bomb) => {
                (LootKind::Consumable(ConsumableKind::Bomb), 3.0 + progress * 6.0)
            }
            _ => (LootKind::Consumable(ConsumableKind::HpPotion), 3.0 + progress * 5.0),
        },
        LootType::Gold => (LootKind::Gold, 8.0 + progress * 18.0),
    };
    LootItem { kind, rarity, stat: scaled_stat(base, rarity) }
}

fn pick_rarity(weights: &RarityWeights, rng: &mut dyn RandomSource) -> Rarity {
    let entries = [
        (Rarity::Common, weights.common),
        (Rarity::Epic, weights.epic),
        (Rarity::Legendary, weights.legendary),
    ];
    weighted_pick(rng, &entries).unwrap_or(Rarity::Common)
}

fn pick_non_gold_type(weights: &NonGoldWeights, rng: &mut dyn RandomSource) -> LootType {
    let entries = [
        (LootType::Weapon, weights.weapon),
        (LootType::Armor, weights.armor),
        (LootType::Consumable, weights.consumable),
    ];
    weighted_pick(rng, &entries).unwrap_or(LootType::Weapon)
}

/// Rolls the item list for fixed counts. Each non-gold item draws its
/// category, then rarity, then sub-type; gold items follow.
pub fn build_loot_plan(
    progress: f64,
    non_gold_count: usize,
    gold_count: usize,
    non_gold_type: NonGoldWeights,
    rng: &mut dyn RandomSource,
) -> LootPlan {
    let weights = LootWeights { rarity: rarity_weights(progress), non_gold_type };

    let mut items = Vec::with_capacity(non_gold_count + gold_count);
    for _ in 0..non_gold_count {
        let loot_type = pick_non_gold_type(&weights.non_gold_type, rng);
        let rarity = pick_rarity(&weights.rarity, rng);
        items.push(create_item(loot_type, rarity, progress, rng));
    }
    for _ in 0..gold_count {
        let rarity = pick_rarity(&weights.rarity, rng);
        items.push(create_item(LootType::Gold, rarity, progress, rng));
    }

    LootPlan { progress, non_gold_count, gold_count, items, weights }
}

pub fn loot_plan_for_level(context: &LevelContext, rng: &mut dyn RandomSource) -> LootPlan {
    let progress = context.progress();
    let cells = context.cells() as f64;

    let non_gold_count = ((cells * 0.009).floor() as usize).max(1)
        + (progress * 2.0).floor() as usize
        + usize::from(rng.chance(0.3 + progress * 0.2));
    let gold_count = ((cells * 0.0035).floor() as usize).max(1)
        + (progress * 4.0).floor() as usize
        + usize::from(rng.chance(0.4 + progress * 0.35));

    build_loot_plan(progress, non_gold_count, gold_count, non_gold_type_weights(progress), rng)
}
