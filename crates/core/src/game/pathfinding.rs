//! Breadth-first shortest paths over the four-neighbour grid.
//! Frontier order follows the neighbour order, so ties resolve the same way on
//! every run.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::mapgen::grid::candidate_cells;
use crate::types::Cell;

/// Shortest path from `start` to the first target reached, both ends
/// included. `passable` gates every cell except `start`. Returns `[start]`
/// when `start` is already a target.
pub fn bfs_path(
    start: Cell,
    targets: &BTreeSet<Cell>,
    passable: impl Fn(Cell) -> bool,
) -> Option<Vec<Cell>> {
    if targets.contains(&start) {
        return Some(vec![start]);
    }
    if targets.is_empty() {
        return None;
    }

    let mut queue = VecDeque::from([start]);
    let mut came_from: BTreeMap<Cell, Cell> = BTreeMap::new();
    let mut visited = BTreeSet::from([start]);

    while let Some(current) = queue.pop_front() {
        for next in candidate_cells(current) {
            if visited.contains(&next) || !passable(next) {
                continue;
            }
            visited.insert(next);
            came_from.insert(next, current);
            if targets.contains(&next) {
                return Some(rebuild_path(next, &came_from));
            }
            queue.push_back(next);
        }
    }
    None
}

fn rebuild_path(end: Cell, came_from: &BTreeMap<Cell, Cell>) -> Vec<Cell> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from.get(&current) {
        path.push(*previous);
        current = *previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::grid::manhattan;

    fn open_interior(cols: i32, rows: i32) -> impl Fn(Cell) -> bool {
        move |cell| cell.col >= 1 && cell.row >= 1 && cell.col < cols - 1 && cell.row < rows - 1
    }

    #[test]
    fn reaches_adjacency_of_player_on_open_interior() {
        let player = Cell::new(3, 3);
        let targets: BTreeSet<Cell> = candidate_cells(player).into_iter().collect();
        let passable = open_interior(7, 7);
        let path = bfs_path(Cell::new(1, 1), &targets, |cell| cell != player && passable(cell))
            .expect("path");

        // Three steps reach (3, 2), the first target found in top-right-bottom-left order.
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Cell::new(1, 1));
        let last = *path.last().expect("non-empty");
        assert_eq!(manhattan(last, player), 1);
        assert!(path.windows(2).all(|step| manhattan(step[0], step[1]) == 1));
    }

    #[test]
    fn ties_follow_neighbour_order() {
        let targets = BTreeSet::from([Cell::new(3, 1), Cell::new(1, 3)]);
        let path = bfs_path(Cell::new(1, 1), &targets, open_interior(7, 7)).expect("path");
        // Right is expanded before bottom.
        assert_eq!(path, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]);
    }

    #[test]
    fn start_on_target_is_a_single_cell_path() {
        let targets = BTreeSet::from([Cell::new(2, 2)]);
        assert_eq!(bfs_path(Cell::new(2, 2), &targets, |_| false), Some(vec![Cell::new(2, 2)]));
    }

    #[test]
    fn walled_off_target_has_no_path() {
        let targets = BTreeSet::from([Cell::new(5, 5)]);
        let passable = open_interior(7, 7);
        let path = bfs_path(Cell::new(1, 1), &targets, |cell| cell.col != 3 && passable(cell));
        assert_eq!(path, None);
    }
}
