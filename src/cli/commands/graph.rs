//! Graph command - Inspect the Four Rooms state transition graph

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection},
    envs::{FourRoomsEnv, GridRenderer},
    graphs::{is_acyclic, is_connected, transition_graph, vertex_at},
    types::Xy,
};

#[derive(Parser, Debug)]
#[command(about = "Inspect the state transition graph")]
pub struct GraphArgs {
    /// Render the grid with vertex numbers
    #[arg(long)]
    pub numbers: bool,

    /// Show the neighbours of a cell (e.g. 6,9)
    #[arg(long)]
    pub cell: Option<Xy>,
}

pub fn execute(args: GraphArgs) -> Result<()> {
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);

    print_section("Four Rooms transition graph");
    print_kv("Vertices", &format_number(graph.vertex_count()));
    print_kv("Edges", &format_number(graph.undirected_edges().count()));
    print_kv("Connected", &is_connected(&graph).to_string());
    print_kv("Acyclic", &is_acyclic(&graph).to_string());

    if let Some(cell) = args.cell {
        let v = vertex_at(&graph, cell).ok_or_else(|| anyhow!("{cell} is not a free cell"))?;
        print_subsection(&format!("Vertex {v} at {cell}"));
        print_kv("Degree", &graph.degree(v).to_string());
        let neighbours: Vec<String> = graph
            .neighbors(v)
            .iter()
            .filter_map(|&n| graph.vertex(n).map(|xy| format!("{n} {xy}")))
            .collect();
        print_kv("Neighbours", &neighbours.join(", "));
    }

    println!();
    let renderer = GridRenderer::new(&env);
    let text = if args.numbers {
        renderer.with_vertex_numbers(&graph).render()
    } else {
        renderer.render()
    };
    print!("{text}");
    Ok(())
}
