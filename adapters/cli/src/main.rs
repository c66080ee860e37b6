#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a scripted serpent over the grid graph.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serpent_grid_core::{GridLayout, NodeIndex};
use serpent_grid_graph::GridGraph;
use serpent_grid_rendering::{compose_scene, ClassPalette, Scene, ScenePresenter};

#[derive(Debug, Parser)]
#[command(
    name = "serpent-grid",
    about = "Replays a scripted serpent over the navigation graph"
)]
struct Options {
    /// Number of cells along each edge of the square grid.
    #[arg(long, default_value_t = 5)]
    side: u32,

    /// Side length of a single cell in world units.
    #[arg(long, default_value_t = 20.0)]
    cell_size: f32,

    /// Number of simulation steps to replay.
    #[arg(long, default_value_t = 8)]
    steps: usize,

    /// Length of the serpent body in cells.
    #[arg(long, default_value_t = 3)]
    body: usize,

    /// Keep edges of occupied cells instead of severing them.
    #[arg(long)]
    keep_connections: bool,
}

struct SummaryPresenter;

impl ScenePresenter for SummaryPresenter {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        println!(
            "  scene: {} markers, {} segments",
            scene.markers().len(),
            scene.segments().len()
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let options = Options::parse();
    ensure!(options.body >= 1, "the body needs at least a head");

    let layout = GridLayout::square(options.side, options.cell_size)
        .context("grid authority rejected the requested layout")?;
    let mut graph = GridGraph::build(&layout, !options.keep_connections)
        .context("graph construction failed")?;

    let path = serpentine_path(options.side);
    ensure!(
        path.len() > options.body,
        "a {}x{} grid cannot hold a body of {} cells and a target",
        options.side,
        options.side,
        options.body
    );
    let target = path[path.len() - 1];

    println!(
        "{}x{} grid, {} nodes, {} connections",
        options.side,
        options.side,
        graph.node_count(),
        graph.connections().len()
    );

    let palette = ClassPalette::default();
    let mut presenter = SummaryPresenter;
    let step_count = options.steps.min(path.len() - options.body);
    for step in 0..step_count {
        // The window's last cell is the furthest along the walk: the head.
        let mut occupants: Vec<NodeIndex> = path[step..step + options.body].to_vec();
        occupants.reverse();

        graph
            .reconcile(&occupants, target)
            .context("reconciliation failed")?;
        println!(
            "step {step}: head {}, target {}, {} connections",
            occupants[0].get(),
            target.get(),
            graph.connections().len()
        );
        presenter.present(&compose_scene(&graph, &palette))?;
    }

    Ok(())
}

/// Boustrophedon walk over every cell, row by row, used as the scripted body
/// track.
fn serpentine_path(side: u32) -> Vec<NodeIndex> {
    let mut path = Vec::new();
    for row in 0..side {
        for offset in 0..side {
            let column = if row % 2 == 0 {
                offset
            } else {
                side - 1 - offset
            };
            path.push(NodeIndex::from_row_major(row, column, side));
        }
    }
    path
}
