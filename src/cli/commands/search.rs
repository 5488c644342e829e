//! Search command - Genetic search for the decomposition with the highest evidence

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{App, SearchConfig},
    cli::{
        commands::decompose::describe_regions,
        config::CommonConfig,
        output::{create_progress, format_number, print_kv, print_section},
    },
    envs::FourRoomsEnv,
    export::write_history_csv,
    graphs::transition_graph,
};

#[derive(Parser, Debug)]
#[command(about = "Search for the decomposition with the highest evidence")]
pub struct SearchArgs {
    /// Number of regions of the initial decompositions
    #[arg(long, short = 'n', default_value_t = 4)]
    pub regions: usize,

    #[arg(long, default_value_t = 100)]
    pub population: usize,

    #[arg(long, short = 'g', default_value_t = 50)]
    pub generations: usize,

    /// Parents kept every generation
    #[arg(long, default_value_t = 2)]
    pub parents: usize,

    /// Probability of redrawing each gene
    #[arg(long, default_value_t = 0.1)]
    pub mutation: f64,

    /// Stop after this many generations without improvement (0 disables)
    #[arg(long, default_value_t = 20)]
    pub stall: usize,

    /// Score a random sample of tasks instead of all of them
    #[arg(long)]
    pub tasks: Option<usize>,

    /// Directory for the results file
    #[arg(long, short = 'o', default_value = "results")]
    pub output_dir: PathBuf,

    /// Optional CSV file for the per-generation history
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonConfig,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        let mut config = SearchConfig::new(self.regions)
            .with_population_size(self.population)
            .with_generations(self.generations)
            .with_parents_mating(self.parents)
            .with_mutation_probability(self.mutation)
            .with_stall_generations(Some(self.stall));
        config.task_sample = self.tasks;
        config.seed = self.common.seed;
        config
    }
}

pub fn execute(args: SearchArgs) -> Result<()> {
    let app = App::new();
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);

    let mut search = app
        .create_search(args.config(), graph.clone())
        .context("setting up genetic search")?;

    let progress = args
        .common
        .progress
        .then(|| create_progress(args.generations as u64 + 1, "generations"))
        .transpose()?;
    let results = search.run_with(|stats| {
        if let Some(pb) = &progress {
            pb.set_position(stats.generation as u64 + 1);
            pb.set_message(format!("best LME {:.2}", stats.best_fitness));
        }
    })?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let path = results.save_to_dir(&args.output_dir)?;
    if let Some(history) = &args.history {
        write_history_csv(history, &results.history)
            .with_context(|| format!("writing {}", history.display()))?;
    }

    print_section("Genetic search");
    print_kv("Best LME", &format!("{:.3}", results.lme));
    print_kv("Generations", &results.generations.to_string());
    print_kv("Population", &results.population_size.to_string());
    print_kv("Evaluations", &format_number(search.evaluator().evaluations()));
    print_kv("Elapsed", &format!("{:.1}s", results.elapsed_secs));
    if let Some(seed) = results.config.as_ref().and_then(|c| c.seed) {
        print_kv("Seed", &seed.to_string());
    }
    print_kv("Results", &path.display().to_string());

    let agent = results.decode(&graph)?;
    println!();
    describe_regions(&env, agent.regions())
}
