//! Dependency injection container
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for the objects the commands work with.

use std::{path::Path, sync::Arc};

use rand::{SeedableRng, random, rngs::StdRng};
use tracing::info;

use super::config::{LearningConfig, SearchConfig};
use crate::{
    Result,
    adapters::MsgPackRepository,
    agents::RegionBasedAgent,
    envs::FourRoomsEnv,
    graphs::UndirectedGraph,
    learning::{FeatureKind, OptionSet, learn_region_option},
    planning::{Behavior, generate_optimal_behaviors, sample_tasks, solve_tasks},
    ports::OptionRepository,
    search::{FitnessEvaluator, GeneticSearch},
    types::Xy,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use oporto::adapters::InMemoryRepository;
/// use oporto::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// assert_eq!(app.default_seed(), Some(42));
/// ```
pub struct App {
    option_repository: Arc<dyn OptionRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app with production defaults: MessagePack persistence and
    /// no default seed.
    pub fn new() -> Self {
        Self {
            option_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Builder for an app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn option_repository(&self) -> Arc<dyn OptionRepository + Send + Sync> {
        Arc::clone(&self.option_repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Resolve a seed: the explicit one, else the app default, else random.
    pub fn seed(&self, seed: Option<u64>) -> u64 {
        seed.or(self.default_seed).unwrap_or_else(random)
    }

    pub fn rng(&self, seed: Option<u64>) -> StdRng {
        StdRng::seed_from_u64(self.seed(seed))
    }

    /// Optimal behaviours used to score decompositions.
    ///
    /// Uses every task on the graph unless the configuration asks for a
    /// random sample.
    pub fn search_behaviors(
        &self,
        graph: &UndirectedGraph<Xy>,
        config: &SearchConfig,
    ) -> Result<Vec<Behavior>> {
        match config.task_sample {
            Some(count) => {
                let mut rng = self.rng(config.seed);
                solve_tasks(graph, &sample_tasks(graph, count, &mut rng))
            }
            None => generate_optimal_behaviors(graph),
        }
    }

    /// Create a genetic search over decompositions of `graph`.
    pub fn create_search(
        &self,
        mut config: SearchConfig,
        graph: UndirectedGraph<Xy>,
    ) -> Result<GeneticSearch> {
        config.seed = Some(self.seed(config.seed));
        let behaviors = self.search_behaviors(&graph, &config)?;
        let evaluator = FitnessEvaluator::new(graph, behaviors)?;
        GeneticSearch::new(config, evaluator)
    }

    /// Learn the policy of every subgoal option of `agent`.
    pub fn learn_options(
        &self,
        env: &FourRoomsEnv,
        agent: &RegionBasedAgent,
        features: FeatureKind,
        config: &LearningConfig,
    ) -> Result<OptionSet> {
        config.validate()?;
        let mut rng = self.rng(config.seed);
        let options = agent
            .options()
            .options()
            .iter()
            .map(|option| {
                learn_region_option(env, agent.graph(), option, features, config, &mut rng)
                    .map(|(learned, _)| learned)
            })
            .collect::<Result<Vec<_>>>()?;
        info!(count = options.len(), %features, "learned options");

        Ok(OptionSet {
            features,
            config: config.clone(),
            options,
        })
    }

    pub fn load_options(&self, path: &Path) -> Result<OptionSet> {
        self.option_repository.load(path)
    }

    pub fn save_options(&self, options: &OptionSet, path: &Path) -> Result<()> {
        self.option_repository.save(options, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an app with custom dependencies.
pub struct AppBuilder {
    option_repository: Option<Arc<dyn OptionRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            option_repository: None,
            default_seed: None,
        }
    }

    pub fn with_repository<R: OptionRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.option_repository = Some(Arc::new(repo));
        self
    }

    /// Seed used whenever a configuration carries none.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app, falling back to `MsgPackRepository`.
    pub fn build(self) -> App {
        App {
            option_repository: self
                .option_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
