//! Player commands: click resolution, loot pickup, traps and consumables.
//! The legal-cell sets exposed here are for highlighting only; clicks are
//! resolved against them but they never drive enemy logic.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use super::world::World;
use crate::mapgen::grid::{candidate_cells, chebyshev};
use crate::types::{
    ArmorSlot, Cell, CellContent, ClickOutcome, ConsumableKind, DoorType, LootItem, LootKind,
    SimEvent,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LegalCells {
    pub moves: BTreeSet<Cell>,
    pub attacks: BTreeSet<Cell>,
    pub loot: BTreeSet<Cell>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub gold: u32,
    pub weapon: Option<LootItem>,
    pub armor: BTreeMap<ArmorSlot, LootItem>,
    pub backpack: Vec<LootItem>,
}

impl Inventory {
    pub fn weapon_attack(&self) -> i32 {
        self.weapon.map_or(0, |item| item.stat as i32)
    }

    pub fn defense(&self) -> i32 {
        self.armor.values().map(|item| item.stat as i32).sum()
    }
}

impl World {
    pub fn refresh_legal(&mut self) {
        let mut legal = LegalCells::default();
        let player = self.player_id;
        for cell in candidate_cells(self.player_pos()) {
            if self.enemy_at(cell).is_some() {
                legal.attacks.insert(cell);
            } else if self.can_enter(player, cell) {
                legal.moves.insert(cell);
                if matches!(self.level.content_at(cell), Some(CellContent::Loot { .. })) {
                    legal.loot.insert(cell);
                }
            }
        }
        self.legal = legal;
    }

    /// Attack if an enemy stands on `cell`, move if it is a legal step,
    /// otherwise ignore. Entering an exit door reports its effect; the run
    /// performs the level change.
    pub fn resolve_click(&mut self, cell: Cell) -> ClickOutcome {
        if !self.is_player_alive() {
            return ClickOutcome::Ignored;
        }
        if self.legal.attacks.contains(&cell) {
            let Some(target) = self.enemy_at(cell) else {
                return ClickOutcome::Ignored;
            };
            let outcome = self.attack(self.player_id, target);
            self.refresh_legal();
            return ClickOutcome::Attacked { target, outcome };
        }
        if !self.legal.moves.contains(&cell) || !self.move_entity(self.player_id, cell) {
            return ClickOutcome::Ignored;
        }

        match self.level.content_at(cell) {
            Some(CellContent::Loot { .. }) => self.pick_up(cell),
            Some(CellContent::Trap) => self.spring_trap(cell),
            Some(CellContent::Door { door_type: DoorType::Out, effect }) => {
                return ClickOutcome::Exited { effect };
            }
            _ => {}
        }
        ClickOutcome::Moved { to: cell }
    }

    fn pick_up(&mut self, cell: Cell) {
        let Some(item) = self.level.take_loot(cell) else {
            return;
        };
        match item.kind {
            LootKind::Gold => self.inventory.gold += item.stat,
            LootKind::Weapon(_) => {
                if item.stat as i32 > self.inventory.weapon_attack() {
                    let gain = item.stat as i32 - self.inventory.weapon_attack();
                    self.inventory.weapon = Some(item);
                    self.actors[self.player_id].base_attack += gain;
                }
            }
            LootKind::Armor(slot) => {
                let better = self.inventory.armor.get(&slot).is_none_or(|worn| item.stat > worn.stat);
                if better {
                    self.inventory.armor.insert(slot, item);
                    self.actors[self.player_id].defense = self.inventory.defense();
                }
            }
            LootKind::Consumable(_) => self.inventory.backpack.push(item),
        }
        debug!("picked up {:?} at {cell:?}", item.kind);
        self.events.push(SimEvent::LootPickedUp { cell, item });
        self.refresh_legal();
    }

    fn spring_trap(&mut self, cell: Cell) {
        if !self.level.disarm_trap(cell) {
            return;
        }
        let damage = self.trap_damage;
        self.events.push(SimEvent::TrapSprung { cell, damage });
        self.take_damage(self.player_id, damage);
        self.refresh_legal();
    }

    /// Uses the backpack item at `index`. Returns `false` for an empty slot.
    pub fn use_consumable(&mut self, index: usize) -> bool {
        if !self.is_player_alive() || index >= self.inventory.backpack.len() {
            return false;
        }
        let item = self.inventory.backpack.remove(index);
        let LootKind::Consumable(kind) = item.kind else {
            return false;
        };
        self.events.push(SimEvent::ConsumableUsed { kind });
        match kind {
            ConsumableKind::HpPotion => {
                self.actors[self.player_id].heal(item.stat as i32);
            }
            ConsumableKind::Bomb => {
                let centre = self.player_pos();
                let targets: Vec<_> = self
                    .enemies()
                    .filter(|enemy| chebyshev(enemy.pos, centre) <= 1)
                    .map(|enemy| enemy.id)
                    .collect();
                for target in targets {
                    self.take_damage(target, item.stat as i32);
                }
            }
        }
        self.refresh_legal();
        true
    }
}
