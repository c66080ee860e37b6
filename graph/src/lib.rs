#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative pathfinding-support graph for the Serpent Grid overlay.
//!
//! The graph mirrors the play grid one node per cell and keeps a directed
//! edge per orthogonal adjacency. Once built, it is reconciled against the
//! occupancy authority every simulation step: previously marked nodes get
//! their classification (and, under the severance policy, their edges) back,
//! the fresh occupant sequence is marked head-first, and the target cell is
//! classified last. Pathfinding consumers read the result through
//! [`GridGraph::incident_connections`]; renderers may iterate
//! [`GridGraph::nodes`] and [`GridGraph::connections`] read-only.

mod adjacency;

use serpent_grid_core::{CellCenter, Connection, GraphError, GridLayout, NodeClass, NodeIndex};

/// Graph vertex representing one grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    index: NodeIndex,
    center: CellCenter,
    class: NodeClass,
}

impl Node {
    const fn new(index: NodeIndex, center: CellCenter) -> Self {
        Self {
            index,
            center,
            class: NodeClass::Normal,
        }
    }

    /// Row-major identity of the node, stable for the graph's lifetime.
    #[must_use]
    pub const fn index(&self) -> NodeIndex {
        self.index
    }

    /// Center of the corresponding grid cell, fixed at construction.
    #[must_use]
    pub const fn center(&self) -> CellCenter {
        self.center
    }

    /// Classification applied by the most recent reconciliation.
    #[must_use]
    pub const fn class(&self) -> NodeClass {
        self.class
    }

    fn set_class(&mut self, class: NodeClass) {
        self.class = class;
    }
}

/// Node-per-cell, edge-per-adjacency directed graph overlaid on the grid.
///
/// The graph exclusively owns its nodes and connections. Construction lays
/// down the full 4-neighbor adjacency once; [`GridGraph::reconcile`] then
/// keeps edge connectivity in sync with the moving body and target without
/// rebuilding, touching only the nodes marked by the previous step.
#[derive(Debug)]
pub struct GridGraph {
    side: u32,
    cell_size: f32,
    sever_occupied: bool,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    occupants: Vec<NodeIndex>,
    target: Option<NodeIndex>,
}

impl GridGraph {
    /// Builds the full adjacency graph over the provided grid layout.
    ///
    /// One node is allocated per cell center, then every node's candidate
    /// neighbors are enumerated with boundary skips and both directed edges
    /// of each valid pair are inserted under the uniqueness probe. When
    /// `sever_occupied` is set, later reconciliation steps remove every edge
    /// touching a non-head occupant.
    pub fn build(layout: &GridLayout, sever_occupied: bool) -> Result<Self, GraphError> {
        let node_count_u64 = u64::from(layout.side()) * u64::from(layout.side());
        let node_count = usize::try_from(node_count_u64).unwrap_or(0);
        if node_count == 0 || node_count != layout.cell_count() {
            return Err(GraphError::NonSquareLayout {
                count: layout.cell_count(),
            });
        }

        let mut graph = Self {
            side: layout.side(),
            cell_size: layout.cell_size(),
            sever_occupied,
            nodes: Vec::with_capacity(node_count),
            connections: Vec::new(),
            occupants: Vec::new(),
            target: None,
        };

        for (offset, center) in layout.centers().iter().enumerate() {
            let value = u32::try_from(offset).map_err(|_| GraphError::InvalidDimensions)?;
            let index = NodeIndex::new(value);
            graph.nodes.push(Node::new(index, *center));
            graph.restore_adjacent_connections(index);
        }

        Ok(graph)
    }

    /// Reconciles classifications and edge connectivity against the fresh
    /// occupant sequence (head first) and target cell.
    ///
    /// All indices are validated up front: a rejected index leaves the graph
    /// exactly as the previous step produced it. The previous step's marks
    /// are then reset, the fresh occupants are applied head-first, and the
    /// target is classified last. The head keeps its edges so a search can
    /// start from it, and the target cell is never severed even when it
    /// coincides with an occupant.
    pub fn reconcile(
        &mut self,
        occupants: &[NodeIndex],
        target: NodeIndex,
    ) -> Result<(), GraphError> {
        if occupants.is_empty() {
            return Err(GraphError::EmptyOccupants);
        }
        for index in occupants.iter().copied().chain([target]) {
            self.check_bounds(index)?;
        }

        self.reset_marked_nodes();

        for (position, index) in occupants.iter().copied().enumerate() {
            self.nodes[index.as_usize()].set_class(NodeClass::Occupied);
            if position != 0 && index != target && self.sever_occupied {
                self.sever_incident_edges(index);
            }
        }

        self.nodes[target.as_usize()].set_class(NodeClass::Target);

        self.occupants.clear();
        self.occupants.extend_from_slice(occupants);
        self.target = Some(target);
        Ok(())
    }

    /// Reports whether a directed edge from `from` to `to` currently exists.
    ///
    /// This is the uniqueness probe run before every insertion; the linear
    /// scan over the connection store is the documented contract.
    #[must_use]
    pub fn has_directed_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.connections
            .iter()
            .any(|connection| connection.from() == from && connection.to() == to)
    }

    /// Iterates every connection with the provided node as either endpoint,
    /// reflecting the graph as of the most recent reconciliation.
    pub fn incident_connections(&self, node: NodeIndex) -> impl Iterator<Item = Connection> + '_ {
        self.connections
            .iter()
            .copied()
            .filter(move |connection| connection.touches(node))
    }

    /// Node stored at the provided index, if it lies within the grid.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    /// All nodes in row-major order, for read-only iteration.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All directed connections currently present, for read-only iteration.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of cells along each edge of the square grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Side length of a single cell, carried for rendering scale only.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total number of nodes owned by the graph (`side²`).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Head of the occupant sequence from the most recent reconciliation.
    #[must_use]
    pub fn head(&self) -> Option<NodeIndex> {
        self.occupants.first().copied()
    }

    /// Target cell from the most recent reconciliation.
    #[must_use]
    pub const fn target(&self) -> Option<NodeIndex> {
        self.target
    }

    /// Whether non-head occupants lose their incident edges each step.
    #[must_use]
    pub const fn severs_occupied(&self) -> bool {
        self.sever_occupied
    }

    fn check_bounds(&self, index: NodeIndex) -> Result<(), GraphError> {
        let node_count = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        if index.get() >= node_count {
            return Err(GraphError::IndexOutOfRange {
                index: index.get(),
                node_count,
            });
        }
        Ok(())
    }

    /// Returns previously marked nodes to their unmarked state.
    ///
    /// Edges come back before reclassification; a cell that stays covered
    /// this step is re-severed by the occupation phase.
    fn reset_marked_nodes(&mut self) {
        let previous = std::mem::take(&mut self.occupants);
        for index in previous {
            if self.sever_occupied {
                self.restore_adjacent_connections(index);
            }
            self.nodes[index.as_usize()].set_class(NodeClass::Normal);
        }
        if let Some(index) = self.target.take() {
            self.nodes[index.as_usize()].set_class(NodeClass::Normal);
        }
    }

    fn restore_adjacent_connections(&mut self, index: NodeIndex) {
        for neighbor in adjacency::neighbors(index, self.side) {
            self.insert_unique(Connection::new(index, neighbor));
            self.insert_unique(Connection::new(neighbor, index));
        }
    }

    fn insert_unique(&mut self, connection: Connection) {
        if self.has_directed_edge(connection.from(), connection.to()) {
            return;
        }
        self.connections.push(connection);
        debug_assert_eq!(
            self.connections
                .iter()
                .filter(|stored| **stored == connection)
                .count(),
            1,
            "duplicate directed edge {connection:?}",
        );
    }

    fn sever_incident_edges(&mut self, index: NodeIndex) {
        self.connections
            .retain(|connection| !connection.touches(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_graph(side: u32) -> GridGraph {
        let layout = GridLayout::square(side, 20.0).expect("layout");
        GridGraph::build(&layout, true).expect("graph")
    }

    #[test]
    fn build_allocates_one_node_per_cell() {
        let graph = build_graph(3);

        assert_eq!(graph.node_count(), 9);
        for (offset, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.index().as_usize(), offset);
            assert_eq!(node.class(), NodeClass::Normal);
        }
    }

    #[test]
    fn build_positions_nodes_at_layout_centers() {
        let layout = GridLayout::square(2, 10.0).expect("layout");
        let graph = GridGraph::build(&layout, false).expect("graph");

        for (node, center) in graph.nodes().iter().zip(layout.centers()) {
            assert_eq!(node.center(), *center);
        }
    }

    #[test]
    fn build_inserts_both_directions_without_duplicates() {
        let graph = build_graph(2);

        assert_eq!(graph.connections().len(), 8);
        for connection in graph.connections() {
            assert!(graph.has_directed_edge(connection.from(), connection.to()));
            assert!(graph.has_directed_edge(connection.to(), connection.from()));
        }

        let mut pairs: Vec<(u32, u32)> = graph
            .connections()
            .iter()
            .map(|connection| (connection.from().get(), connection.to().get()))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), 8);
    }

    #[test]
    fn has_directed_edge_distinguishes_orientation() {
        let graph = build_graph(2);

        assert!(graph.has_directed_edge(NodeIndex::new(0), NodeIndex::new(1)));
        assert!(graph.has_directed_edge(NodeIndex::new(1), NodeIndex::new(0)));
        assert!(!graph.has_directed_edge(NodeIndex::new(0), NodeIndex::new(3)));
    }

    #[test]
    fn node_lookup_rejects_out_of_range_indices() {
        let graph = build_graph(2);

        assert!(graph.node(NodeIndex::new(3)).is_some());
        assert!(graph.node(NodeIndex::new(4)).is_none());
    }

    #[test]
    fn single_cell_grid_builds_without_edges() {
        let layout = GridLayout::square(1, 5.0).expect("layout");
        let graph = GridGraph::build(&layout, true).expect("graph");
        assert_eq!(graph.node_count(), 1);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn accessors_reflect_construction_inputs() {
        let layout = GridLayout::square(4, 12.5).expect("layout");
        let graph = GridGraph::build(&layout, true).expect("graph");

        assert_eq!(graph.side(), 4);
        assert_eq!(graph.cell_size(), 12.5);
        assert!(graph.severs_occupied());
        assert_eq!(graph.head(), None);
        assert_eq!(graph.target(), None);
    }
}
