//! Behaviors command - Optimal paths used as the evidence dataset

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    app::App,
    cli::{
        config::CommonConfig,
        output::{create_spinner, format_number, print_kv, print_section, print_subsection},
    },
    envs::{FourRoomsEnv, GridRenderer},
    graphs::{transition_graph, vertex_at},
    planning::{FourRoomsPlanner, generate_optimal_behaviors, sample_tasks, solve_task, solve_tasks},
    types::Xy,
};

#[derive(Parser, Debug)]
#[command(about = "Generate A* behaviours for Four Rooms tasks")]
pub struct BehaviorsArgs {
    /// Solve a random sample of tasks instead of all of them
    #[arg(long)]
    pub sample: Option<usize>,

    /// Show the path of a single task starting here (requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<Xy>,

    /// Goal of the single task
    #[arg(long, requires = "from")]
    pub to: Option<Xy>,

    #[command(flatten)]
    pub common: CommonConfig,
}

pub fn execute(args: BehaviorsArgs) -> Result<()> {
    let mut env = FourRoomsEnv::new();
    let graph = transition_graph(&env);

    if let (Some(from), Some(to)) = (args.from, args.to) {
        let vertex =
            |xy: Xy| vertex_at(&graph, xy).ok_or_else(|| anyhow!("{xy} is not a free cell"));
        let task = (vertex(from)?, vertex(to)?);
        let path = solve_task(task, &FourRoomsPlanner::new(&graph))?;
        env.set_task(from, to)?;

        print_section(&format!("Optimal path {from} -> {to}"));
        print_kv("Steps", &(path.len() - 1).to_string());
        let cells: Vec<Xy> = path.iter().filter_map(|&v| graph.vertex(v).copied()).collect();
        print!("{}", GridRenderer::new(&env).with_path(cells).render());
        return Ok(());
    }

    let spinner = args
        .common
        .progress
        .then(|| create_spinner("Solving tasks with A*..."))
        .transpose()?;
    let behaviors = match args.sample {
        Some(count) => {
            let mut rng = App::new().rng(args.common.seed);
            solve_tasks(&graph, &sample_tasks(&graph, count, &mut rng))?
        }
        None => generate_optimal_behaviors(&graph)?,
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let lengths: Vec<usize> = behaviors.iter().map(|(_, path)| path.len() - 1).collect();
    let total: usize = lengths.iter().sum();
    print_section("Behaviour dataset");
    print_kv("Tasks", &format_number(behaviors.len()));
    print_kv("Total steps", &format_number(total));
    print_kv(
        "Mean path length",
        &format!("{:.2}", total as f64 / lengths.len().max(1) as f64),
    );
    print_kv(
        "Longest path",
        &lengths.iter().max().copied().unwrap_or(0).to_string(),
    );

    print_subsection("First tasks");
    for ((start, goal), path) in behaviors.iter().take(5) {
        let cells: Vec<String> = path
            .iter()
            .filter_map(|&v| graph.vertex(v).map(ToString::to_string))
            .collect();
        println!("  {start} -> {goal}: {}", cells.join(" "));
    }
    Ok(())
}
