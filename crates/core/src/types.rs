use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Perimeter classification of a cell. Corners take priority over edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    Corner,
    Inner,
}

impl Side {
    pub fn is_perimeter(self) -> bool {
        self != Side::Inner
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorType {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorEffect {
    Normal,
    Greed,
    Hazard,
    Elite,
    Swarm,
    Blacksmith,
    Safe,
}

impl DoorEffect {
    pub const ALL: [DoorEffect; 7] = [
        DoorEffect::Normal,
        DoorEffect::Greed,
        DoorEffect::Hazard,
        DoorEffect::Elite,
        DoorEffect::Swarm,
        DoorEffect::Blacksmith,
        DoorEffect::Safe,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DoorEffect::Normal => "normal",
            DoorEffect::Greed => "greed",
            DoorEffect::Hazard => "hazard",
            DoorEffect::Elite => "elite",
            DoorEffect::Swarm => "swarm",
            DoorEffect::Blacksmith => "blacksmith",
            DoorEffect::Safe => "safe",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|effect| effect.id() == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub cell: Cell,
    pub side: Side,
    pub door_type: DoorType,
    pub effect: DoorEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Epic => 1.5,
            Rarity::Legendary => 2.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootType {
    Gold,
    Weapon,
    Armor,
    Consumable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Sword,
    Axe,
    Mace,
    Spear,
    Dagger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    Helmet,
    Chest,
    Gloves,
    Boots,
    Cloak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    HpPotion,
    Bomb,
}

/// Loot category together with its sub-type table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootKind {
    Gold,
    Weapon(WeaponKind),
    Armor(ArmorSlot),
    Consumable(ConsumableKind),
}

impl LootKind {
    pub fn loot_type(self) -> LootType {
        match self {
            LootKind::Gold => LootType::Gold,
            LootKind::Weapon(_) => LootType::Weapon,
            LootKind::Armor(_) => LootType::Armor,
            LootKind::Consumable(_) => LootType::Consumable,
        }
    }

    /// Name of the single stat the item carries.
    pub fn stat_name(self) -> &'static str {
        match self {
            LootKind::Gold => "amount",
            LootKind::Weapon(_) => "attack",
            LootKind::Armor(_) => "defense",
            LootKind::Consumable(ConsumableKind::HpPotion) => "heal",
            LootKind::Consumable(ConsumableKind::Bomb) => "damage",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LootItem {
    pub kind: LootKind,
    pub rarity: Rarity,
    /// Gold amount, attack, defense, heal or damage depending on `kind`.
    pub stat: u32,
}

impl LootItem {
    pub fn loot_type(&self) -> LootType {
        self.kind.loot_type()
    }
}

/// Static content of one cell. A cell without a record is floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellContent {
    Floor,
    Wall,
    Door { door_type: DoorType, effect: DoorEffect },
    Obstacle,
    Loot { item: LootItem },
    Trap,
}

impl CellContent {
    /// Static walkability, ignoring occupancy.
    pub fn is_walkable(&self) -> bool {
        !matches!(self, CellContent::Wall | CellContent::Obstacle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Chaser,
    Bruiser,
    Skirmisher,
    Guard,
    Ambusher,
    Berserker,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Chaser,
        Archetype::Bruiser,
        Archetype::Skirmisher,
        Archetype::Guard,
        Archetype::Ambusher,
        Archetype::Berserker,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    LevelActive,
    Ended(RunOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub killed: bool,
}

impl AttackOutcome {
    pub const NONE: AttackOutcome = AttackOutcome { damage: 0, killed: false };
}

/// How a `player_click_cell` command was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Moved { to: Cell },
    Attacked { target: EntityId, outcome: AttackOutcome },
    Exited { effect: DoorEffect },
    Ignored,
}

/// Lifecycle signals for an external renderer. Plain data, drained by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    LevelRebuilt { level_index: usize },
    EntityMoved { entity: EntityId, from: Cell, to: Cell },
    EntityDamaged { entity: EntityId, amount: i32, hp: i32 },
    EntityDied { entity: EntityId, at: Cell },
    LootPickedUp { cell: Cell, item: LootItem },
    TrapSprung { cell: Cell, damage: i32 },
    ConsumableUsed { kind: ConsumableKind },
    DoorTaken { effect: DoorEffect, next_level_index: Option<usize> },
    RunEnded { outcome: RunOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_effect_ids_round_trip_through_lookup() {
        for effect in DoorEffect::ALL {
            assert_eq!(DoorEffect::from_id(effect.id()), Some(effect));
        }
        assert_eq!(DoorEffect::from_id("special_room"), None);
    }

    #[test]
    fn each_loot_kind_names_exactly_one_stat() {
        assert_eq!(LootKind::Gold.stat_name(), "amount");
        assert_eq!(LootKind::Weapon(WeaponKind::Axe).stat_name(), "attack");
        assert_eq!(LootKind::Armor(ArmorSlot::Cloak).stat_name(), "defense");
        assert_eq!(LootKind::Consumable(ConsumableKind::HpPotion).stat_name(), "heal");
        assert_eq!(LootKind::Consumable(ConsumableKind::Bomb).stat_name(), "damage");
    }

    #[test]
    fn only_walls_and_obstacles_block_statically() {
        assert!(CellContent::Floor.is_walkable());
        assert!(CellContent::Trap.is_walkable());
        assert!(!CellContent::Wall.is_walkable());
        assert!(!CellContent::Obstacle.is_walkable());
    }
}
