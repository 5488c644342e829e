//! oporto CLI - Bayesian model selection for region-based options
//!
//! This CLI provides a unified interface for:
//! - Inspecting the Four Rooms state transition graph
//! - Decomposing it into regions and listing their subgoals
//! - Scoring decompositions by the evidence of optimal behaviour
//! - Searching for the best decomposition
//! - Learning the implied options and comparing learners

use anyhow::Result;
use clap::{Parser, Subcommand};
use oporto::cli::commands::{behaviors, decompose, evidence, graph, learn, results, search};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oporto")]
#[command(version, about = "Bayesian model selection for region-based options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the state transition graph
    Graph(graph::GraphArgs),

    /// Partition the state graph into regions
    Decompose(decompose::DecomposeArgs),

    /// Generate optimal behaviours
    Behaviors(behaviors::BehaviorsArgs),

    /// Score decompositions by log model evidence
    Evidence(evidence::EvidenceArgs),

    /// Search for the decomposition with the highest evidence
    Search(search::SearchArgs),

    /// Inspect saved search results
    Results(results::ResultsArgs),

    /// Learn options and compare learners
    Learn(Box<learn::LearnArgs>),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Decompose(args) => args.common.verbose,
            Commands::Behaviors(args) => args.common.verbose,
            Commands::Evidence(args) => args.common.verbose,
            Commands::Search(args) => args.common.verbose,
            Commands::Learn(args) => args.common.verbose,
            Commands::Graph(_) | Commands::Results(_) => false,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    match cli.command {
        Commands::Graph(args) => graph::execute(args),
        Commands::Decompose(args) => decompose::execute(args),
        Commands::Behaviors(args) => behaviors::execute(args),
        Commands::Evidence(args) => evidence::execute(args),
        Commands::Search(args) => search::execute(args),
        Commands::Results(args) => results::execute(args),
        Commands::Learn(args) => learn::execute(*args),
    }
}
