//! Door selection on the perimeter: one entry door, the rest exits, never two
//! on the same side.

use std::collections::BTreeSet;

use crate::error::{SimError, SimResult};
use crate::random::{RandomSource, choose};
use crate::types::{Door, DoorEffect, DoorType, Side};

use super::grid::ClassifiedCell;

fn is_door_side(side: Side) -> bool {
    matches!(side, Side::Top | Side::Bottom | Side::Left | Side::Right)
}

/// Number of doors a perimeter can hold: one per distinct non-corner side.
pub fn door_capacity(candidates: &[ClassifiedCell]) -> usize {
    candidates
        .iter()
        .filter(|cell| is_door_side(cell.side))
        .map(|cell| cell.side)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Picks `total` doors from the perimeter candidates. The first pick is the
/// `in` door, the remaining ones are `out` doors with the `normal` effect
/// until the effect manager assigns theirs.
pub fn pick_doors(
    candidates: &[ClassifiedCell],
    total: usize,
    rng: &mut dyn RandomSource,
) -> SimResult<Vec<Door>> {
    let eligible: Vec<ClassifiedCell> =
        candidates.iter().copied().filter(|cell| is_door_side(cell.side)).collect();
    let available = door_capacity(&eligible);
    if total == 0 || available < total {
        return Err(SimError::Generation { requested: total, available });
    }

    let mut used_sides = BTreeSet::new();
    let mut doors = Vec::with_capacity(total);
    while doors.len() < total {
        let open: Vec<ClassifiedCell> =
            eligible.iter().copied().filter(|cell| !used_sides.contains(&cell.side)).collect();
        let Some(pick) = choose(rng, &open) else {
            return Err(SimError::Generation { requested: total, available: used_sides.len() });
        };
        used_sides.insert(pick.side);
        let door_type = if doors.is_empty() { DoorType::In } else { DoorType::Out };
        doors.push(Door { cell: pick.cell, side: pick.side, door_type, effect: DoorEffect::Normal });
    }
    Ok(doors)
}
