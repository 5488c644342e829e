//! Configuration types for searches and option learning.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for a genetic search over region decompositions.
///
/// # Examples
///
/// ```
/// use oporto::app::SearchConfig;
///
/// let config = SearchConfig::new(4)
///     .with_population_size(20)
///     .with_generations(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of regions in every initial decomposition
    pub num_regions: usize,
    /// Agents per generation
    pub population_size: usize,
    /// Maximum number of generations. Fitness scores are cached per genome,
    /// so long runs are bounded by `FitnessEvaluator`'s cache capacity.
    pub generations: usize,
    /// Parents kept and mated each generation
    pub parents_mating: usize,
    /// Probability that a gene is redrawn during mutation
    pub mutation_probability: f64,
    /// Stop after this many generations without improvement (must be positive)
    pub stall_generations: Option<usize>,
    /// Number of tasks scored per fitness evaluation (None = all tasks)
    pub task_sample: Option<usize>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl SearchConfig {
    pub fn new(num_regions: usize) -> Self {
        Self {
            num_regions,
            population_size: 100,
            generations: 50,
            parents_mating: 2,
            mutation_probability: 0.1,
            stall_generations: Some(20),
            task_sample: None,
            seed: None,
        }
    }

    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_parents_mating(mut self, parents_mating: usize) -> Self {
        self.parents_mating = parents_mating;
        self
    }

    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Set the stall limit; `None` or `Some(0)` always runs every generation.
    pub fn with_stall_generations(mut self, stall: Option<usize>) -> Self {
        self.stall_generations = stall.filter(|&limit| limit > 0);
        self
    }

    pub fn with_task_sample(mut self, tasks: usize) -> Self {
        self.task_sample = Some(tasks);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(Error::InvalidConfiguration {
                message: message.to_string(),
            })
        };
        if self.num_regions == 0 {
            return invalid("number of regions must be at least 1");
        }
        if self.parents_mating < 2 {
            return invalid("at least two parents are needed for crossover");
        }
        if self.population_size < self.parents_mating {
            return invalid("population must be at least as large as the number of parents");
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return invalid("mutation probability must lie in [0, 1]");
        }
        if self.stall_generations == Some(0) {
            return invalid("stall limit must be positive (use None to disable it)");
        }
        if self.task_sample == Some(0) {
            return invalid("task sample must contain at least one task");
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Configuration for learning option policies with Tree-Backup(λ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Step size
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Trace decay
    pub lambda: f64,
    /// An option may start where its greedy value exceeds this threshold
    pub value_threshold: f64,
    /// Episodes per training experience
    pub episodes: usize,
    /// Step limit per episode
    pub max_steps: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl LearningConfig {
    pub fn new() -> Self {
        Self {
            alpha: 0.01,
            gamma: 0.99,
            lambda: 0.9,
            value_threshold: 0.1,
            episodes: 100,
            max_steps: 200,
            seed: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_value_threshold(mut self, threshold: f64) -> Self {
        self.value_threshold = threshold;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        if !(self.alpha > 0.0 && in_unit(self.gamma) && in_unit(self.lambda)) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "alpha must be positive and gamma, lambda in [0, 1] (alpha={}, gamma={}, lambda={})",
                    self.alpha, self.gamma, self.lambda
                ),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_steps must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_validation() {
        assert!(SearchConfig::default().validate().is_ok());
        assert!(SearchConfig::new(0).validate().is_err());
        assert!(
            SearchConfig::new(4)
                .with_population_size(1)
                .validate()
                .is_err()
        );
        assert!(
            SearchConfig::new(4)
                .with_mutation_probability(1.5)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_zero_stall_limit_disables_stall_stop() {
        let config = SearchConfig::new(4).with_stall_generations(Some(0));
        assert_eq!(config.stall_generations, None);
        assert!(config.validate().is_ok());

        let mut config = SearchConfig::new(4);
        config.stall_generations = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_learning_config_defaults() {
        let config = LearningConfig::default();
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.value_threshold, 0.1);
        assert_eq!(config.episodes, 100);
        assert!(config.validate().is_ok());
        assert!(config.with_gamma(2.0).validate().is_err());
    }
}
