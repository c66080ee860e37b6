#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Serpent Grid adapters.
//!
//! Drawing backends receive a [`Scene`] composed from a read-only pass over
//! the graph: one marker per node colored by its classification, one line
//! segment per directed connection between the endpoint cell centers. The
//! crate defines data only; actual drawing lives behind [`ScenePresenter`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use serpent_grid_core::{CellCenter, NodeClass, NodeIndex};
use serpent_grid_graph::GridGraph;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors applied to cell markers and edge lines when composing a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassPalette {
    /// Marker color for free cells.
    pub normal: Color,
    /// Marker color for cells covered by the moving body.
    pub occupied: Color,
    /// Marker color for the target cell.
    pub target: Color,
    /// Line color shared by every connection.
    pub edge: Color,
}

impl ClassPalette {
    /// Resolves the marker color for the provided classification.
    #[must_use]
    pub const fn marker_color(&self, class: NodeClass) -> Color {
        match class {
            NodeClass::Normal => self.normal,
            NodeClass::Occupied => self.occupied,
            NodeClass::Target => self.target,
        }
    }
}

impl Default for ClassPalette {
    fn default() -> Self {
        Self {
            normal: Color::from_rgb_u8(0xdd, 0xdd, 0xdd),
            occupied: Color::from_rgb_u8(0x2f, 0x95, 0x32),
            target: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            edge: Color::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Square marker drawn at a cell center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMarker {
    /// World-space center of the marker.
    pub center: Vec2,
    /// Half of the marker's edge length in world units.
    pub half_extent: f32,
    /// Fill color resolved from the node classification.
    pub color: Color,
}

/// Line segment drawn between two connected cell centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    /// World-space start of the segment.
    pub from: Vec2,
    /// World-space end of the segment.
    pub to: Vec2,
    /// Stroke color of the segment.
    pub color: Color,
}

/// Declarative frame contents composed from a graph snapshot.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    markers: Vec<CellMarker>,
    segments: Vec<EdgeSegment>,
}

impl Scene {
    /// Cell markers in row-major node order.
    #[must_use]
    pub fn markers(&self) -> &[CellMarker] {
        &self.markers
    }

    /// Edge segments in connection-store order.
    #[must_use]
    pub fn segments(&self) -> &[EdgeSegment] {
        &self.segments
    }
}

/// Drawing backend capable of presenting a composed scene.
pub trait ScenePresenter {
    /// Presents the provided scene for a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Composes a scene from the graph state as of its latest reconciliation.
#[must_use]
pub fn compose_scene(graph: &GridGraph, palette: &ClassPalette) -> Scene {
    let half_extent = graph.cell_size() * 0.5;

    let markers = graph
        .nodes()
        .iter()
        .map(|node| CellMarker {
            center: to_vec2(node.center()),
            half_extent,
            color: palette.marker_color(node.class()),
        })
        .collect();

    let mut segments = Vec::with_capacity(graph.connections().len());
    for connection in graph.connections() {
        let Some(from) = node_center(graph, connection.from()) else {
            continue;
        };
        let Some(to) = node_center(graph, connection.to()) else {
            continue;
        };
        segments.push(EdgeSegment {
            from,
            to,
            color: palette.edge,
        });
    }

    Scene { markers, segments }
}

fn node_center(graph: &GridGraph, index: NodeIndex) -> Option<Vec2> {
    graph.node(index).map(|node| to_vec2(node.center()))
}

fn to_vec2(center: CellCenter) -> Vec2 {
    Vec2::new(center.x(), center.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpent_grid_core::GridLayout;

    fn build_graph(side: u32) -> GridGraph {
        let layout = GridLayout::square(side, 10.0).expect("layout");
        GridGraph::build(&layout, true).expect("graph")
    }

    #[test]
    fn scene_mirrors_nodes_and_connections() {
        let graph = build_graph(3);
        let scene = compose_scene(&graph, &ClassPalette::default());

        assert_eq!(scene.markers().len(), 9);
        assert_eq!(scene.segments().len(), graph.connections().len());
        for marker in scene.markers() {
            assert_eq!(marker.half_extent, 5.0);
        }
    }

    #[test]
    fn marker_colors_track_classifications() {
        let mut graph = build_graph(3);
        graph
            .reconcile(&[NodeIndex::new(4), NodeIndex::new(1)], NodeIndex::new(8))
            .expect("reconcile");

        let palette = ClassPalette::default();
        let scene = compose_scene(&graph, &palette);

        assert_eq!(scene.markers()[0].color, palette.normal);
        assert_eq!(scene.markers()[4].color, palette.occupied);
        assert_eq!(scene.markers()[8].color, palette.target);
    }

    #[test]
    fn segments_join_endpoint_centers() {
        let graph = build_graph(2);
        let scene = compose_scene(&graph, &ClassPalette::default());

        let connection = graph.connections()[0];
        let from = graph.node(connection.from()).expect("from node").center();
        let segment = scene.segments()[0];
        assert_eq!(segment.from, Vec2::new(from.x(), from.y()));
    }
}
