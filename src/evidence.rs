//! Model evidence for option sets
//!
//! A region-based agent has no free parameters, so the marginal likelihood of
//! a behaviour dataset under the agent is just the product of the path
//! likelihoods. Everything is kept in log space.

use crate::{Error, Result, agents::RegionBasedAgent, planning::Behavior};

/// Log model evidence of the behaviours under the agent.
///
/// Always `<= 0`.
pub fn log_model_evidence<T>(agent: &RegionBasedAgent<T>, behaviors: &[Behavior]) -> Result<f64> {
    if behaviors.is_empty() {
        return Err(Error::EmptyBehaviors);
    }
    behaviors.iter().try_fold(0.0, |total, (_, path)| {
        Ok(total + agent.path_likelihood(path)?.ln())
    })
}

/// Log evidence from per-step choice counts: `-Σ ln(count)`.
pub fn log_evidence_from_counts(counts: &[usize]) -> f64 {
    -counts.iter().map(|&c| (c as f64).ln()).sum::<f64>()
}

/// Log evidence of the behaviours using the single most committed reading
/// of every path.
pub fn log_evidence_possible_actions<T>(
    agent: &RegionBasedAgent<T>,
    behaviors: &[Behavior],
) -> Result<f64> {
    if behaviors.is_empty() {
        return Err(Error::EmptyBehaviors);
    }
    behaviors.iter().try_fold(0.0, |total, (_, path)| {
        Ok(total + log_evidence_from_counts(&agent.possible_actions(path)?))
    })
}

/// `ln(p(D | a) / p(D | b))`.
pub fn log_bayes_factor(lme_a: f64, lme_b: f64) -> f64 {
    lme_a - lme_b
}

pub fn bayes_factor(lme_a: f64, lme_b: f64) -> f64 {
    log_bayes_factor(lme_a, lme_b).exp()
}

/// Posterior probability of each model under a uniform prior.
pub fn posterior_model_probabilities(lmes: &[f64]) -> Vec<f64> {
    let max = lmes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![1.0 / lmes.len() as f64; lmes.len()];
    }
    let weights: Vec<f64> = lmes.iter().map(|&lme| (lme - max).exp()).collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}
