//! Row-major neighbor arithmetic shared by construction and edge restoration.

use serpent_grid_core::{Direction, NodeIndex};

/// Order in which candidate directions are swept for every node.
const SWEEP: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Enumerates the orthogonal neighbors of `index` inside a square grid of
/// the provided side length, skipping directions that fall off the boundary.
pub(crate) fn neighbors(index: NodeIndex, side: u32) -> impl Iterator<Item = NodeIndex> {
    SWEEP
        .into_iter()
        .filter_map(move |direction| neighbor_in(direction, index, side))
}

/// Neighbor of `index` in the given direction, if the grid has one there.
pub(crate) fn neighbor_in(direction: Direction, index: NodeIndex, side: u32) -> Option<NodeIndex> {
    let value = index.get();
    match direction {
        Direction::North => value.checked_sub(side).map(NodeIndex::new),
        Direction::East => {
            if side != 0 && value % side != side - 1 {
                value.checked_add(1).map(NodeIndex::new)
            } else {
                None
            }
        }
        Direction::South => {
            let limit = side.checked_mul(side.saturating_sub(1))?;
            if value < limit {
                value.checked_add(side).map(NodeIndex::new)
            } else {
                None
            }
        }
        Direction::West => {
            if side != 0 && value % side != 0 {
                value.checked_sub(1).map(NodeIndex::new)
            } else {
                None
            }
        }
    }
}
