//! Fitness of genomes as log model evidence

use std::collections::HashMap;

use super::encoding::decode_agent;
use crate::{
    Error, Result, evidence::log_model_evidence, graphs::UndirectedGraph, planning::Behavior,
    types::Xy,
};

/// Default number of genome scores kept in the cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Scores genomes by the log model evidence of the behaviour dataset under
/// the decoded agent.
///
/// Scores are cached per genome. The cache is cleared once it holds
/// `cache_capacity` entries.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<T = Xy> {
    graph: UndirectedGraph<T>,
    behaviors: Vec<Behavior>,
    cache: HashMap<Vec<u8>, f64>,
    cache_capacity: usize,
    evaluations: usize,
}

impl<T: Clone> FitnessEvaluator<T> {
    pub fn new(graph: UndirectedGraph<T>, behaviors: Vec<Behavior>) -> Result<Self> {
        if behaviors.is_empty() {
            return Err(Error::EmptyBehaviors);
        }
        Ok(Self {
            graph,
            behaviors,
            cache: HashMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            evaluations: 0,
        })
    }

    /// Limit the number of cached scores. Zero disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self.cache.clear();
        self
    }

    pub fn graph(&self) -> &UndirectedGraph<T> {
        &self.graph
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Number of times the evidence was computed (cache misses).
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn fitness(&mut self, genes: &[u8]) -> Result<f64> {
        if let Some(&cached) = self.cache.get(genes) {
            return Ok(cached);
        }
        let agent = decode_agent(genes, &self.graph)?;
        let lme = log_model_evidence(&agent, &self.behaviors)?;
        self.evaluations += 1;
        if self.cache_capacity > 0 {
            if self.cache.len() >= self.cache_capacity {
                self.cache.clear();
            }
            self.cache.insert(genes.to_vec(), lme);
        }
        Ok(lme)
    }
}
