//! Steady-state genetic algorithm over agent encodings
//!
//! Each generation keeps the fittest `parents_mating` genomes and refills the
//! population with single-point crossover children of consecutive parent
//! pairs. Every child gene is then redrawn from `{0, 1}` with the configured
//! mutation probability.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng, random, rngs::StdRng};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, info};

use super::{FitnessEvaluator, SearchResults, encoding::encode_agent};
use crate::{
    Error, Result, agents::RegionBasedAgent, app::SearchConfig, graphs::decompose, types::Xy,
};

fn empty_population() -> Error {
    Error::InvalidConfiguration {
        message: "population is empty".to_string(),
    }
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub std_fitness: f64,
    /// Seconds since the search started
    pub elapsed_secs: f64,
}

pub struct GeneticSearch<T = Xy> {
    config: SearchConfig,
    evaluator: FitnessEvaluator<T>,
    rng: StdRng,
    seed: u64,
}

impl<T: Clone> GeneticSearch<T> {
    pub fn new(config: SearchConfig, evaluator: FitnessEvaluator<T>) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(random);
        Ok(Self {
            config,
            evaluator,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<T> {
        &self.evaluator
    }

    /// Initial population of random decompositions.
    fn initial_population(&mut self) -> Result<Vec<Vec<u8>>> {
        let graph = self.evaluator.graph().clone();
        (0..self.config.population_size)
            .map(|_| {
                let regions = decompose(self.config.num_regions, &graph, &mut self.rng)?;
                Ok(encode_agent(&RegionBasedAgent::new(regions)?))
            })
            .collect()
    }

    fn crossover(&mut self, first: &[u8], second: &[u8]) -> Vec<u8> {
        let point = if first.is_empty() {
            0
        } else {
            self.rng.random_range(0..first.len())
        };
        first[..point].iter().chain(&second[point..]).copied().collect()
    }

    fn mutate(&mut self, genes: &mut [u8]) {
        for gene in genes.iter_mut() {
            if self.rng.random_bool(self.config.mutation_probability) {
                *gene = self.rng.random_range(0..=1);
            }
        }
    }

    fn next_generation(&mut self, population: &[Vec<u8>], fitness: &[f64]) -> Vec<Vec<u8>> {
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let parents: Vec<Vec<u8>> = ranked
            .iter()
            .take(self.config.parents_mating)
            .map(|&i| population[i].clone())
            .collect();

        let mut next = parents.clone();
        let mut k = 0;
        while next.len() < self.config.population_size {
            let first = &parents[k % parents.len()];
            let second = &parents[(k + 1) % parents.len()];
            let mut child = self.crossover(first, second);
            self.mutate(&mut child);
            next.push(child);
            k += 1;
        }
        next
    }

    /// Run the search to completion.
    pub fn run(&mut self) -> Result<SearchResults> {
        self.run_with(|_| {})
    }

    /// Run the search, calling `on_generation` after every generation is scored.
    pub fn run_with<F: FnMut(&GenerationStats)>(
        &mut self,
        mut on_generation: F,
    ) -> Result<SearchResults> {
        let start = Instant::now();
        let mut population = self.initial_population()?;
        info!(
            population = population.len(),
            genes = population.first().map_or(0, Vec::len),
            seed = self.seed,
            "starting genetic search"
        );

        let mut best: Option<(Vec<u8>, f64)> = None;
        let mut stalled = 0;
        let mut history = Vec::new();

        for generation in 0..=self.config.generations {
            let fitness = population
                .iter()
                .map(|genes| self.evaluator.fitness(genes))
                .collect::<Result<Vec<f64>>>()?;

            let (leader, &leader_fitness) = fitness
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .ok_or_else(empty_population)?;

            match &best {
                Some((_, best_fitness)) if leader_fitness <= *best_fitness => stalled += 1,
                _ => {
                    best = Some((population[leader].clone(), leader_fitness));
                    stalled = 0;
                }
            }

            let stats = GenerationStats {
                generation,
                best_fitness: best.as_ref().map_or(leader_fitness, |b| b.1),
                mean_fitness: fitness.iter().mean(),
                std_fitness: fitness.iter().population_std_dev(),
                elapsed_secs: start.elapsed().as_secs_f64(),
            };
            debug!(
                generation,
                best = stats.best_fitness,
                mean = stats.mean_fitness,
                "generation scored"
            );
            on_generation(&stats);
            history.push(stats);

            if self
                .config
                .stall_generations
                .is_some_and(|limit| stalled >= limit)
            {
                info!(generation, "stopping: no improvement for {stalled} generations");
                break;
            }
            if generation == self.config.generations {
                break;
            }
            population = self.next_generation(&population, &fitness);
        }

        let (solution, lme) = best.ok_or_else(empty_population)?;
        let generations = history.last().map_or(0, |s| s.generation);
        info!(lme, generations, "genetic search finished");

        Ok(SearchResults {
            solution,
            lme,
            generations,
            population_size: self.config.population_size,
            config: Some(self.config.clone().with_seed(self.seed)),
            history,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs()),
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}
