//! Decompose command - Partition the transition graph into regions

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    agents::RegionBasedAgent,
    app::App,
    cli::{
        config::CommonConfig,
        output::{print_kv, print_section, print_subsection},
    },
    envs::{FourRoomsEnv, GridRenderer, example_regions, render::region_symbol},
    graphs::{ConnectedComponents, decompose, transition_graph},
    types::Xy,
};

#[derive(Parser, Debug)]
#[command(about = "Partition the state graph into regions")]
pub struct DecomposeArgs {
    /// Number of regions of a random decomposition
    #[arg(long, short = 'n', default_value_t = 4)]
    pub regions: usize,

    /// Use the hand-made four-room decomposition instead
    #[arg(long, conflicts_with = "regions")]
    pub example: bool,

    #[command(flatten)]
    pub common: CommonConfig,
}

/// Print the regions of a decomposition and the subgoals they offer.
pub fn describe_regions(env: &FourRoomsEnv, regions: &ConnectedComponents<Xy>) -> Result<()> {
    let graph = regions.graph();
    print!(
        "{}",
        GridRenderer::new(env)
            .without_task()
            .with_regions(graph, regions.labels())
            .render()
    );

    let cells = |vertices: Vec<usize>| -> String {
        vertices
            .into_iter()
            .filter_map(|v| graph.vertex(v).map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(" ")
    };
    for r in 0..regions.num_components() {
        print_subsection(&format!("Region {}", region_symbol(r)));
        print_kv("Cells", &regions.vertex_indices(r).len().to_string());
        print_kv("Entrances", &cells(regions.entrance_states(r)));
        print_kv("Subgoals", &cells(regions.exit_states(r)));
    }

    let agent = RegionBasedAgent::new(regions.clone()).context("building region options")?;
    let choices: usize = (0..graph.vertex_count()).map(|v| agent.choices_at(v)).sum();
    print_subsection("Agent");
    print_kv("Options", &agent.options().options().len().to_string());
    print_kv(
        "Mean choices per state",
        &format!("{:.2}", choices as f64 / graph.vertex_count().max(1) as f64),
    );
    Ok(())
}

pub fn execute(args: DecomposeArgs) -> Result<()> {
    let env = FourRoomsEnv::new();
    let regions = if args.example {
        print_section("Example four-room decomposition");
        example_regions(&env)?
    } else {
        let app = App::new();
        let seed = app.seed(args.common.seed);
        info!(seed, regions = args.regions, "random decomposition");
        print_section(&format!("Random decomposition into {} regions", args.regions));
        print_kv("Seed", &seed.to_string());
        let graph = transition_graph(&env);
        decompose(args.regions, &graph, &mut app.rng(Some(seed)))?
    };
    describe_regions(&env, &regions)
}
