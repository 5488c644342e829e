//! Learn command - Learn region options and compare them with a flat learner
//!
//! Options come from the hand-made four-room decomposition, a saved search
//! result, or a previously saved option set. Their policies are learned with
//! Tree-Backup(λ), then a flat learner and an options learner are trained on
//! the same fixed-goal task.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    agents::RegionBasedAgent,
    app::{App, LearningConfig},
    cli::{
        config::CommonConfig,
        output::{print_kv, print_section, print_subsection},
    },
    envs::{FourRoomsEnv, example_regions},
    export::write_learning_curve_csv,
    graphs::transition_graph,
    learning::{FeatureKind, Features, OneHotFeatures, OptionSet},
    options::DeterministicOption,
    pipeline::{
        FlatLearner, JsonlObserver, Learner, MetricsObserver, MilestoneObserver, OptionsLearner,
        ProgressObserver, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    search::SearchResults,
    types::Xy,
};

#[derive(Parser, Debug)]
#[command(about = "Learn options and compare learners with and without them")]
pub struct LearnArgs {
    /// Take the decomposition from a search results file
    #[arg(long, conflicts_with = "options_in")]
    pub results: Option<PathBuf>,

    /// Load an already learned option set (MessagePack)
    #[arg(long)]
    pub options_in: Option<PathBuf>,

    /// Save the learned option set (MessagePack)
    #[arg(long)]
    pub options_out: Option<PathBuf>,

    /// State features for option learning (onehot, displacement)
    #[arg(long, default_value = "onehot")]
    pub features: FeatureKind,

    /// Episodes of experience per option
    #[arg(long, default_value_t = 100)]
    pub option_episodes: usize,

    #[arg(long, default_value_t = 0.01)]
    pub alpha: f64,

    #[arg(long, default_value_t = 0.99)]
    pub gamma: f64,

    #[arg(long, default_value_t = 0.9)]
    pub lambda: f64,

    /// Training episodes for the learner comparison (0 skips it)
    #[arg(long, short = 'e', default_value_t = 200)]
    pub episodes: usize,

    /// Goal cell of the comparison task
    #[arg(long, default_value = "11,11")]
    pub goal: Xy,

    /// Fixed start cell (random every episode when omitted)
    #[arg(long)]
    pub start: Option<Xy>,

    /// Step limit per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// CSV file for the learning curves
    #[arg(long)]
    pub curve_csv: Option<PathBuf>,

    /// JSONL file recording every episode of the options learner
    #[arg(long)]
    pub observations: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonConfig,
}

impl LearnArgs {
    fn learning_config(&self, seed: u64) -> LearningConfig {
        LearningConfig::new()
            .with_alpha(self.alpha)
            .with_gamma(self.gamma)
            .with_lambda(self.lambda)
            .with_episodes(self.option_episodes)
            .with_seed(seed)
    }

    fn training_config(&self, seed: u64) -> TrainingConfig {
        TrainingConfig {
            num_episodes: self.episodes,
            goal: self.goal,
            start: self.start,
            max_steps: self.max_steps,
            seed: Some(seed),
        }
    }
}

fn option_set(app: &App, args: &LearnArgs, env: &FourRoomsEnv, seed: u64) -> Result<OptionSet> {
    if let Some(path) = &args.options_in {
        return app
            .load_options(path)
            .with_context(|| format!("loading options from {}", path.display()));
    }

    let agent = match &args.results {
        Some(path) => SearchResults::load(path)
            .with_context(|| format!("reading {}", path.display()))?
            .decode(&transition_graph(env))?,
        None => RegionBasedAgent::new(example_regions(env)?)?,
    };
    let config = args.learning_config(seed);
    info!(options = agent.options().options().len(), "learning option policies");
    Ok(app.learn_options(env, &agent, args.features, &config)?)
}

fn train(
    args: &LearnArgs,
    learner: &mut dyn Learner,
    seed: u64,
    record: bool,
) -> Result<TrainingResult> {
    let mut pipeline = TrainingPipeline::new(args.training_config(seed));
    if args.common.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = args.observations.as_ref().filter(|_| record) {
        pipeline = pipeline.with_observer(Box::new(JsonlObserver::new(path)?));
    }
    Ok(pipeline.run(learner)?)
}

fn report(result: &TrainingResult) {
    let metrics = MetricsObserver::from_curve(20, &result.curve);
    let milestones = MilestoneObserver::from_curve(&result.curve);

    print_subsection(&result.learner);
    print_kv("Success rate", &format!("{:.1}%", 100.0 * result.success_rate));
    print_kv("Mean steps", &format!("{:.1}", result.mean_steps));
    print_kv(
        "Mean steps (last 20)",
        &format!("{:.1}", metrics.summary().recent_mean_steps),
    );
    print_kv(
        "First success",
        &milestones
            .first_success()
            .map_or("never".to_string(), |e| format!("episode {}", e + 1)),
    );
    print_kv(
        "Always successful after",
        &milestones
            .converged_after()
            .map_or("never".to_string(), |e| format!("episode {}", e + 1)),
    );
}

pub fn execute(args: LearnArgs) -> Result<()> {
    let app = App::new();
    let seed = app.seed(args.common.seed);
    let env = FourRoomsEnv::new();

    let options = option_set(&app, &args, &env, seed)?;
    print_section("Learned options");
    print_kv("Options", &options.options.len().to_string());
    print_kv("Features", &options.features.to_string());
    print_kv("Seed", &seed.to_string());
    for option in &options.options {
        println!(
            "  {:<28} initiation set {:>3} of {:>3} cells",
            option.name(),
            option.initiation_set().len(),
            option.region().len()
        );
    }

    if let Some(path) = &args.options_out {
        app.save_options(&options, path)
            .with_context(|| format!("saving options to {}", path.display()))?;
        print_kv("Saved to", &path.display().to_string());
    }

    if args.episodes == 0 {
        return Ok(());
    }

    let config = args.learning_config(seed);
    let features = || Features::OneHot(OneHotFeatures::new(&env));
    let mut flat = FlatLearner::new("flat".to_string(), features(), &config);
    let mut hierarchical =
        OptionsLearner::new("options".to_string(), options.options, features(), &config);

    let flat_result = train(&args, &mut flat, seed, false)?;
    let options_result = train(&args, &mut hierarchical, seed, true)?;

    print_section(&format!("Learning to reach {}", args.goal));
    report(&flat_result);
    report(&options_result);

    if let Some(path) = &args.curve_csv {
        write_learning_curve_csv(
            path,
            &[
                (flat_result.learner.as_str(), flat_result.curve.as_slice()),
                (options_result.learner.as_str(), options_result.curve.as_slice()),
            ],
        )
        .with_context(|| format!("writing {}", path.display()))?;
        print_kv("Curves", &path.display().to_string());
    }
    Ok(())
}
