//! Results command - Inspect saved search results

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    cli::{
        commands::decompose::describe_regions,
        output::{print_kv, print_section},
    },
    envs::FourRoomsEnv,
    graphs::transition_graph,
    search::{SearchResults, find_results},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect saved search results")]
pub struct ResultsArgs {
    /// Result files to read
    pub files: Vec<PathBuf>,

    /// Directory to scan when no files are given
    #[arg(long, default_value = "results")]
    pub dir: PathBuf,

    /// Only files whose names contain this text (e.g. "LME:-40")
    #[arg(long, default_value = "")]
    pub pattern: String,

    /// Render the regions of the best result
    #[arg(long)]
    pub render: bool,
}

pub fn execute(args: ResultsArgs) -> Result<()> {
    let files = if args.files.is_empty() {
        find_results(&args.dir, &args.pattern)?
    } else {
        args.files.clone()
    };
    if files.is_empty() {
        bail!("no result files found in {}", args.dir.display());
    }

    let mut loaded = files
        .iter()
        .map(|path| {
            SearchResults::load(path)
                .with_context(|| format!("reading {}", path.display()))
                .map(|results| (path, results))
        })
        .collect::<Result<Vec<_>>>()?;
    loaded.sort_by(|a, b| b.1.lme.total_cmp(&a.1.lme));

    print_section("Search results");
    println!("  {:>12} {:>6} {:>6}  file", "LME", "gens", "pop");
    for (path, results) in &loaded {
        println!(
            "  {:>12.3} {:>6} {:>6}  {}",
            results.lme,
            results.generations,
            results.population_size,
            path.display()
        );
    }

    if args.render {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        if let Some((path, best)) = loaded.first() {
            let agent = best
                .decode(&graph)
                .with_context(|| format!("decoding {}", path.display()))?;
            print_section("Best decomposition");
            print_kv("Regions", &agent.num_regions().to_string());
            describe_regions(&env, agent.regions())?;
        }
    }
    Ok(())
}
