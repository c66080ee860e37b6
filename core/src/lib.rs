#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Serpent Grid navigation overlay.
//!
//! This crate defines the value types exchanged between the grid authority,
//! the graph crate, and the adapters: node identities and classifications,
//! directed connections, cell-center geometry, and the grid layout the graph
//! is built from. The graph crate owns all mutable state; everything here is
//! a plain value that can be copied, compared, and serialized.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a single graph node, equal to the cell's row-major position
/// in the grid (`row * side + column`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Creates a new node index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates the index of the cell at the provided row and column.
    ///
    /// Callers must ensure both coordinates lie inside a grid of the given
    /// side length; the arithmetic is not bounds-checked here.
    #[must_use]
    pub const fn from_row_major(row: u32, column: u32, side: u32) -> Self {
        Self(row * side + column)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the index widened for addressing a node store.
    #[must_use]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Classification applied to a node by the most recent reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// The cell is free for traversal.
    Normal,
    /// The cell is covered by the moving body.
    Occupied,
    /// The cell holds the current target.
    Target,
}

/// Directed edge between two node identities.
///
/// Adjacency between two cells is expressed as two opposing directed edges;
/// a reversed pair is a distinct edge. At most one `Connection` exists per
/// ordered `(from, to)` pair inside a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    from: NodeIndex,
    to: NodeIndex,
}

impl Connection {
    /// Creates a directed connection between the provided endpoints.
    #[must_use]
    pub const fn new(from: NodeIndex, to: NodeIndex) -> Self {
        Self { from, to }
    }

    /// Node the connection originates from.
    #[must_use]
    pub const fn from(&self) -> NodeIndex {
        self.from
    }

    /// Node the connection points at.
    #[must_use]
    pub const fn to(&self) -> NodeIndex {
        self.to
    }

    /// Reports whether the provided node is one of the two endpoints.
    #[must_use]
    pub const fn touches(&self, node: NodeIndex) -> bool {
        self.from.get() == node.get() || self.to.get() == node.get()
    }
}

/// Neighbor directions enumerated during adjacency construction, in the
/// order the graph sweeps them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Neighbor toward decreasing row indices.
    North,
    /// Neighbor toward increasing column indices.
    East,
    /// Neighbor toward increasing row indices.
    South,
    /// Neighbor toward decreasing column indices.
    West,
}

/// Center of a grid cell expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellCenter {
    x: f32,
    y: f32,
}

impl CellCenter {
    /// Creates a new cell center from world-space coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world-space coordinate of the center.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world-space coordinate of the center.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Grid description supplied by the grid authority: side length, cell size,
/// and one center position per cell in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    side: u32,
    cell_size: f32,
    centers: Vec<CellCenter>,
}

impl GridLayout {
    /// Generates the layout of a square grid with the provided side length
    /// and cell size, centers enumerated row by row.
    pub fn square(side: u32, cell_size: f32) -> Result<Self, GraphError> {
        if side == 0 || !is_positive_length(cell_size) {
            return Err(GraphError::InvalidDimensions);
        }

        let cell_count = checked_cell_count(side).ok_or(GraphError::InvalidDimensions)?;
        let mut centers = Vec::with_capacity(cell_count);
        for row in 0..side {
            for column in 0..side {
                let x = (column as f32 + 0.5) * cell_size;
                let y = (row as f32 + 0.5) * cell_size;
                centers.push(CellCenter::new(x, y));
            }
        }

        Ok(Self {
            side,
            cell_size,
            centers,
        })
    }

    /// Wraps an externally produced center sequence, rejecting sequences
    /// whose length is not a positive perfect square.
    pub fn from_centers(centers: Vec<CellCenter>, cell_size: f32) -> Result<Self, GraphError> {
        if centers.is_empty() || !is_positive_length(cell_size) {
            return Err(GraphError::InvalidDimensions);
        }

        let side = square_side(centers.len()).ok_or(GraphError::NonSquareLayout {
            count: centers.len(),
        })?;

        Ok(Self {
            side,
            cell_size,
            centers,
        })
    }

    /// Number of cells along each edge of the square grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell centers in row-major order, one per cell.
    #[must_use]
    pub fn centers(&self) -> &[CellCenter] {
        &self.centers
    }

    /// Total number of cells described by the layout.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.centers.len()
    }
}

/// Failures surfaced by graph construction and reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum GraphError {
    /// The supplied cell-center sequence length is not a perfect square.
    #[error("cell-center sequence of length {count} does not describe a square grid")]
    NonSquareLayout {
        /// Number of centers the grid authority supplied.
        count: usize,
    },
    /// The grid side length or cell size is not a positive, finite quantity.
    #[error("grid dimensions must be positive")]
    InvalidDimensions,
    /// An occupant or target index lies outside the node collection.
    #[error("index {index} lies outside the {node_count}-node grid")]
    IndexOutOfRange {
        /// The rejected index.
        index: u32,
        /// Number of nodes held by the graph.
        node_count: u32,
    },
    /// A reconciliation step was requested with no occupants at all.
    #[error("occupant sequence is empty")]
    EmptyOccupants,
}

fn is_positive_length(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn checked_cell_count(side: u32) -> Option<usize> {
    let count = u64::from(side).checked_mul(u64::from(side))?;
    if count > u64::from(u32::MAX) {
        return None;
    }
    usize::try_from(count).ok()
}

fn square_side(count: usize) -> Option<u32> {
    let count = u64::try_from(count).ok()?;
    let estimate = (count as f64).sqrt().round() as u64;
    for candidate in estimate.saturating_sub(1)..=estimate.saturating_add(1) {
        if candidate.checked_mul(candidate) == Some(count) {
            return u32::try_from(candidate).ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{CellCenter, Connection, GraphError, GridLayout, NodeClass, NodeIndex};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn node_index_round_trips_through_bincode() {
        assert_round_trip(&NodeIndex::new(42));
    }

    #[test]
    fn node_class_round_trips_through_bincode() {
        assert_round_trip(&NodeClass::Occupied);
    }

    #[test]
    fn connection_round_trips_through_bincode() {
        assert_round_trip(&Connection::new(NodeIndex::new(3), NodeIndex::new(4)));
    }

    #[test]
    fn graph_error_round_trips_through_bincode() {
        assert_round_trip(&GraphError::IndexOutOfRange {
            index: 25,
            node_count: 25,
        });
    }

    #[test]
    fn row_major_identity_matches_formula() {
        let side = 7;
        assert_eq!(NodeIndex::from_row_major(0, 0, side), NodeIndex::new(0));
        assert_eq!(NodeIndex::from_row_major(2, 3, side), NodeIndex::new(17));
        assert_eq!(NodeIndex::from_row_major(6, 6, side), NodeIndex::new(48));
    }

    #[test]
    fn connection_touches_both_endpoints_only() {
        let connection = Connection::new(NodeIndex::new(1), NodeIndex::new(2));
        assert!(connection.touches(NodeIndex::new(1)));
        assert!(connection.touches(NodeIndex::new(2)));
        assert!(!connection.touches(NodeIndex::new(3)));
    }

    #[test]
    fn square_layout_enumerates_centers_row_by_row() {
        let layout = GridLayout::square(3, 10.0).expect("layout");

        assert_eq!(layout.side(), 3);
        assert_eq!(layout.cell_count(), 9);
        assert_eq!(layout.centers()[0], CellCenter::new(5.0, 5.0));
        assert_eq!(layout.centers()[1], CellCenter::new(15.0, 5.0));
        assert_eq!(layout.centers()[3], CellCenter::new(5.0, 15.0));
        assert_eq!(layout.centers()[8], CellCenter::new(25.0, 25.0));
    }

    #[test]
    fn square_layout_rejects_degenerate_dimensions() {
        assert_eq!(
            GridLayout::square(0, 10.0),
            Err(GraphError::InvalidDimensions)
        );
        assert_eq!(
            GridLayout::square(4, 0.0),
            Err(GraphError::InvalidDimensions)
        );
        assert_eq!(
            GridLayout::square(4, f32::NAN),
            Err(GraphError::InvalidDimensions)
        );
    }

    #[test]
    fn from_centers_accepts_perfect_squares() {
        let centers = vec![CellCenter::new(0.0, 0.0); 16];
        let layout = GridLayout::from_centers(centers, 1.0).expect("layout");
        assert_eq!(layout.side(), 4);
    }

    #[test]
    fn from_centers_rejects_non_square_counts() {
        let centers = vec![CellCenter::new(0.0, 0.0); 10];
        assert_eq!(
            GridLayout::from_centers(centers, 1.0),
            Err(GraphError::NonSquareLayout { count: 10 })
        );
    }

    #[test]
    fn from_centers_rejects_empty_sequences() {
        assert_eq!(
            GridLayout::from_centers(Vec::new(), 1.0),
            Err(GraphError::InvalidDimensions)
        );
    }
}
