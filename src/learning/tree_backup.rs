//! Tree-Backup(λ) with linear action values
//!
//! The target policy is greedy with respect to the current action values
//! (ties split uniformly), and the behaviour policy is arbitrary. Traces are
//! decayed by the target probability of the action actually taken, which
//! removes the need for importance sampling.

use serde::{Deserialize, Serialize};

use super::features::FeatureMap;
use crate::{Error, Result, types::Xy};

const TIE_TOLERANCE: f64 = 1e-12;

/// One observed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backup {
    pub state: Xy,
    pub action: usize,
    pub reward: f64,
    /// `None` when the transition ended the episode
    pub next_state: Option<Xy>,
    /// Discount on the next state's value; `γ^k` after `k` primitive steps
    pub discount: f64,
}

/// Action values `Q(s, a) = Σ_i w[a][i]` over the active features `i` of `s`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeBackup<F> {
    features: F,
    num_actions: usize,
    alpha: f64,
    lambda: f64,
    /// Indexed `[action * features.len() + feature]`
    weights: Vec<f64>,
    #[serde(skip)]
    traces: Vec<f64>,
}

impl<F: FeatureMap> TreeBackup<F> {
    pub fn new(features: F, num_actions: usize, alpha: f64, lambda: f64) -> Self {
        let size = num_actions * features.len();
        Self {
            features,
            num_actions,
            alpha,
            lambda,
            weights: vec![0.0; size],
            traces: vec![0.0; size],
        }
    }

    pub fn features(&self) -> &F {
        &self.features
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn value(&self, active: &[usize], action: usize) -> f64 {
        let offset = action * self.features.len();
        active.iter().map(|&i| self.weights[offset + i]).sum()
    }

    pub fn q(&self, state: Xy, action: usize) -> f64 {
        self.value(&self.features.features(state), action)
    }

    pub fn q_values(&self, state: Xy) -> Vec<f64> {
        let active = self.features.features(state);
        (0..self.num_actions)
            .map(|a| self.value(&active, a))
            .collect()
    }

    pub fn max_q(&self, state: Xy) -> f64 {
        self.q_values(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest-indexed action with the highest value.
    pub fn greedy_action(&self, state: Xy) -> usize {
        let values = self.q_values(state);
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        values
            .iter()
            .position(|&v| best - v <= TIE_TOLERANCE)
            .unwrap_or(0)
    }

    /// Greedy target policy, splitting ties uniformly.
    pub fn target_probabilities(&self, state: Xy) -> Vec<f64> {
        let values = self.q_values(state);
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ties = values.iter().filter(|&&v| best - v <= TIE_TOLERANCE).count();
        values
            .iter()
            .map(|&v| {
                if best - v <= TIE_TOLERANCE {
                    1.0 / ties as f64
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Clear eligibility traces at the start of an episode.
    pub fn start_episode(&mut self) {
        self.traces.clear();
        self.traces.resize(self.weights.len(), 0.0);
    }

    /// Apply one Tree-Backup(λ) update and return the TD error.
    pub fn update(&mut self, backup: &Backup) -> Result<f64> {
        if backup.action >= self.num_actions {
            return Err(Error::InvalidAction {
                index: backup.action,
            });
        }
        if self.traces.len() != self.weights.len() {
            self.start_episode();
        }

        let active = self.features.features(backup.state);
        let estimate = self.value(&active, backup.action);
        let bootstrap = backup.next_state.map_or(0.0, |next| {
            let values = self.q_values(next);
            self.target_probabilities(next)
                .iter()
                .zip(&values)
                .map(|(p, q)| p * q)
                .sum()
        });
        let delta = backup.reward + backup.discount * bootstrap - estimate;

        let decay =
            backup.discount * self.lambda * self.target_probabilities(backup.state)[backup.action];
        for trace in &mut self.traces {
            *trace *= decay;
        }
        let offset = backup.action * self.features.len();
        for i in active {
            self.traces[offset + i] += 1.0;
        }

        let step = self.alpha * delta;
        for (weight, trace) in self.weights.iter_mut().zip(&self.traces) {
            *weight += step * trace;
        }
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{envs::FourRoomsEnv, learning::OneHotFeatures};

    fn learner(alpha: f64, lambda: f64) -> TreeBackup<OneHotFeatures> {
        TreeBackup::new(OneHotFeatures::new(&FourRoomsEnv::new()), 9, alpha, lambda)
    }

    #[test]
    fn test_terminal_update_moves_toward_reward() {
        let mut learner = learner(0.5, 0.0);
        let backup = Backup {
            state: Xy::new(1, 1),
            action: 0,
            reward: 1.0,
            next_state: None,
            discount: 1.0,
        };
        learner.start_episode();
        assert_eq!(learner.update(&backup).unwrap(), 1.0);
        assert!((learner.q(Xy::new(1, 1), 0) - 0.5).abs() < 1e-12);
        learner.start_episode();
        learner.update(&backup).unwrap();
        assert!((learner.q(Xy::new(1, 1), 0) - 0.75).abs() < 1e-12);
        assert_eq!(learner.greedy_action(Xy::new(1, 1)), 0);
    }

    #[test]
    fn test_trace_decays_by_target_probability() {
        let mut learner = learner(0.5, 1.0);
        let (s1, s2) = (Xy::new(1, 1), Xy::new(2, 1));
        learner.start_episode();
        learner
            .update(&Backup {
                state: s1,
                action: 0,
                reward: 0.0,
                next_state: Some(s2),
                discount: 1.0,
            })
            .unwrap();
        learner
            .update(&Backup {
                state: s2,
                action: 0,
                reward: 1.0,
                next_state: None,
                discount: 1.0,
            })
            .unwrap();

        assert!((learner.q(s2, 0) - 0.5).abs() < 1e-12);
        // All nine actions tied at s2, so the trace at s1 shrank to 1/9
        assert!((learner.q(s1, 0) - 0.5 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_probabilities_split_ties() {
        let learner = learner(0.1, 0.9);
        let probs = learner.target_probabilities(Xy::new(1, 1));
        assert!(probs.iter().all(|&p| (p - 1.0 / 9.0).abs() < 1e-12));
    }

    #[test]
    fn test_rejects_unknown_action() {
        let mut learner = learner(0.1, 0.9);
        let backup = Backup {
            state: Xy::new(1, 1),
            action: 12,
            reward: 0.0,
            next_state: None,
            discount: 1.0,
        };
        assert!(matches!(
            learner.update(&backup),
            Err(Error::InvalidAction { index: 12 })
        ));
    }
}
