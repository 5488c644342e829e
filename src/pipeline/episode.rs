//! Episode records produced by the training pipeline

use serde::{Deserialize, Serialize};

use crate::types::{Action, Xy};

/// One environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Xy,
    pub action: Action,
    pub reward: f64,
    pub next_state: Xy,
    /// The step reached the goal
    pub terminated: bool,
}

/// Every step of one episode, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub transitions: Vec<Transition>,
    pub terminated: bool,
    pub truncated: bool,
}

impl Episode {
    pub fn steps(&self) -> usize {
        self.transitions.len()
    }

    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().map(|t| t.reward).sum()
    }

    /// Cells visited, starting with the initial state.
    pub fn path(&self) -> Vec<Xy> {
        self.transitions
            .first()
            .map(|t| t.state)
            .into_iter()
            .chain(self.transitions.iter().map(|t| t.next_state))
            .collect()
    }

    pub fn summary(&self, episode: usize) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            steps: self.steps(),
            total_reward: self.total_reward(),
            reached_goal: self.terminated,
        }
    }
}

/// One point of a learning curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reached_goal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_summary_and_path() {
        let episode = Episode {
            transitions: vec![
                Transition {
                    state: Xy::new(1, 1),
                    action: Action::Right,
                    reward: 0.0,
                    next_state: Xy::new(2, 1),
                    terminated: false,
                },
                Transition {
                    state: Xy::new(2, 1),
                    action: Action::Up,
                    reward: 100.0,
                    next_state: Xy::new(2, 2),
                    terminated: true,
                },
            ],
            terminated: true,
            truncated: false,
        };
        assert_eq!(
            episode.path(),
            vec![Xy::new(1, 1), Xy::new(2, 1), Xy::new(2, 2)]
        );
        let summary = episode.summary(4);
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.total_reward, 100.0);
        assert!(summary.reached_goal);
        assert!(Episode::default().path().is_empty());
    }
}
