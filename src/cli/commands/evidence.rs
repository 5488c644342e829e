//! Evidence command - Compare decompositions by log model evidence

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;

use crate::{
    agents::RegionBasedAgent,
    app::{App, SearchConfig},
    cli::{
        config::CommonConfig,
        output::{create_progress, print_kv, print_section, print_subsection},
    },
    envs::{FourRoomsEnv, example_regions},
    evidence::{
        log_bayes_factor, log_evidence_possible_actions, log_model_evidence,
        posterior_model_probabilities,
    },
    graphs::{decompose, transition_graph},
};

#[derive(Parser, Debug)]
#[command(about = "Score decompositions by their log model evidence")]
pub struct EvidenceArgs {
    /// Region counts of random decompositions to score (e.g. 1,2,4,8)
    #[arg(long, value_delimiter = ',', default_value = "1,2,4,8")]
    pub regions: Vec<usize>,

    /// Random decompositions per region count
    #[arg(long, default_value_t = 3)]
    pub samples: usize,

    /// Also score the hand-made four-room decomposition
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub example: bool,

    /// Score a random sample of tasks instead of all of them
    #[arg(long)]
    pub tasks: Option<usize>,

    /// Score with the most committed reading of each path only
    #[arg(long)]
    pub possible_actions: bool,

    #[command(flatten)]
    pub common: CommonConfig,
}

pub fn execute(args: EvidenceArgs) -> Result<()> {
    if args.regions.is_empty() && !args.example {
        bail!("nothing to score: give --regions or --example true");
    }

    let app = App::new();
    let seed = app.seed(args.common.seed);
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);

    let mut sample_config = SearchConfig::new(1).with_seed(seed);
    sample_config.task_sample = args.tasks;
    let behaviors = app.search_behaviors(&graph, &sample_config)?;
    info!(behaviors = behaviors.len(), seed, "scoring decompositions");

    let score = |agent: &RegionBasedAgent| {
        if args.possible_actions {
            log_evidence_possible_actions(agent, &behaviors)
        } else {
            log_model_evidence(agent, &behaviors)
        }
    };

    let total = args.regions.len() * args.samples + usize::from(args.example);
    let progress = args
        .common
        .progress
        .then(|| create_progress(total as u64, "models"))
        .transpose()?;

    let mut models: Vec<(String, f64)> = Vec::new();
    if args.example {
        let agent = RegionBasedAgent::new(example_regions(&env)?)?;
        models.push(("example rooms".to_string(), score(&agent)?));
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    let mut rng = app.rng(Some(seed));
    for &n in &args.regions {
        for sample in 0..args.samples {
            let agent = RegionBasedAgent::new(decompose(n, &graph, &mut rng)?)?;
            models.push((format!("{n} regions #{sample}"), score(&agent)?));
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_section("Log model evidence");
    print_kv("Tasks", &behaviors.len().to_string());
    print_kv("Seed", &seed.to_string());

    let lmes: Vec<f64> = models.iter().map(|(_, lme)| *lme).collect();
    let posterior = posterior_model_probabilities(&lmes);
    let best = lmes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    print_subsection("Models");
    println!("  {:<20} {:>14} {:>14} {:>10}", "model", "LME", "ln BF vs best", "posterior");
    for ((name, lme), p) in models.iter().zip(&posterior) {
        println!(
            "  {name:<20} {lme:>14.2} {:>14.2} {p:>10.4}",
            log_bayes_factor(*lme, best)
        );
    }
    Ok(())
}
