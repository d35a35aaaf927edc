//! Cell-to-entity registry for the live actors of one level. Static content is
//! tracked elsewhere; a loot cell can be occupied at the same time.

use std::collections::BTreeMap;

use crate::types::{Cell, EntityId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    by_cell: BTreeMap<Cell, EntityId>,
    by_entity: BTreeMap<EntityId, Cell>,
}

impl Occupancy {
    /// Moves `entity` to `cell`, dropping its previous registration.
    pub fn register(&mut self, entity: EntityId, cell: Cell) {
        self.remove(entity);
        self.by_cell.insert(cell, entity);
        self.by_entity.insert(entity, cell);
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<Cell> {
        let cell = self.by_entity.remove(&entity)?;
        if self.by_cell.get(&cell) == Some(&entity) {
            self.by_cell.remove(&cell);
        }
        Some(cell)
    }

    /// True when someone other than `ignoring` stands on `cell`.
    pub fn is_occupied(&self, cell: Cell, ignoring: Option<EntityId>) -> bool {
        match self.by_cell.get(&cell) {
            Some(occupant) => ignoring != Some(*occupant),
            None => false,
        }
    }

    pub fn entity_at(&self, cell: Cell) -> Option<EntityId> {
        self.by_cell.get(&cell).copied()
    }

    pub fn cell_of(&self, entity: EntityId) -> Option<Cell> {
        self.by_entity.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, EntityId)> + '_ {
        self.by_cell.iter().map(|(cell, entity)| (*cell, *entity))
    }

    pub fn clear(&mut self) {
        self.by_cell.clear();
        self.by_entity.clear();
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(count: usize) -> Vec<EntityId> {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn register_replaces_previous_cell() {
        let [a] = ids(1)[..] else { panic!("one id") };
        let mut occupancy = Occupancy::default();
        occupancy.register(a, Cell::new(1, 1));
        occupancy.register(a, Cell::new(2, 1));
        assert_eq!(occupancy.entity_at(Cell::new(1, 1)), None);
        assert_eq!(occupancy.entity_at(Cell::new(2, 1)), Some(a));
        assert_eq!(occupancy.cell_of(a), Some(Cell::new(2, 1)));
        assert_eq!(occupancy.len(), 1);
    }

    #[test]
    fn occupied_check_can_ignore_self() {
        let ids = ids(2);
        let mut occupancy = Occupancy::default();
        occupancy.register(ids[0], Cell::new(3, 3));
        assert!(occupancy.is_occupied(Cell::new(3, 3), None));
        assert!(!occupancy.is_occupied(Cell::new(3, 3), Some(ids[0])));
        assert!(occupancy.is_occupied(Cell::new(3, 3), Some(ids[1])));
        assert!(!occupancy.is_occupied(Cell::new(4, 3), None));
    }

    #[test]
    fn remove_and_clear_drop_registrations() {
        let ids = ids(2);
        let mut occupancy = Occupancy::default();
        occupancy.register(ids[0], Cell::new(1, 2));
        occupancy.register(ids[1], Cell::new(2, 2));
        assert_eq!(occupancy.remove(ids[0]), Some(Cell::new(1, 2)));
        assert_eq!(occupancy.remove(ids[0]), None);
        assert!(!occupancy.is_occupied(Cell::new(1, 2), None));
        occupancy.clear();
        assert!(occupancy.is_empty());
    }
}
