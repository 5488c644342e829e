//! Training pipeline for gridworld learners

use std::path::Path;

use rand::{SeedableRng, random, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{Episode, EpisodeSummary, Transition};
use crate::{
    Error, Result,
    envs::FourRoomsEnv,
    ports::{Learner, Observer},
    types::Xy,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Goal cell, fixed for the whole run
    pub goal: Xy,

    /// Start cell; sampled uniformly every episode when `None`
    pub start: Option<Xy>,

    /// Step limit per episode (environment default when `None`)
    pub max_steps: Option<usize>,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 200,
            goal: Xy::new(11, 11),
            start: None,
            max_steps: None,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Name of the learner
    pub learner: String,

    /// Episodes run
    pub total_episodes: usize,

    /// Episodes that reached the goal
    pub successes: usize,

    pub success_rate: f64,

    /// Mean episode length
    pub mean_steps: f64,

    /// Mean undiscounted return
    pub mean_return: f64,

    /// Per-episode learning curve
    pub curve: Vec<EpisodeSummary>,
}

impl TrainingResult {
    pub fn from_curve(learner: String, curve: Vec<EpisodeSummary>) -> Self {
        let total_episodes = curve.len();
        let successes = curve.iter().filter(|e| e.reached_goal).count();
        let mean = |values: Vec<f64>| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        Self {
            learner,
            total_episodes,
            successes,
            success_rate: if total_episodes > 0 {
                successes as f64 / total_episodes as f64
            } else {
                0.0
            },
            mean_steps: mean(curve.iter().map(|e| e.steps as f64).collect()),
            mean_return: mean(curve.iter().map(|e| e.total_reward).collect()),
            curve,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs episodes of a fixed-goal Four Rooms task for a single learner
pub struct TrainingPipeline {
    config: TrainingConfig,
    env: FourRoomsEnv,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        let mut env = FourRoomsEnv::new();
        if let Some(max_steps) = config.max_steps {
            env = env.with_max_steps(max_steps);
        }
        Self {
            config,
            env,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn validate(&self) -> Result<Vec<Xy>> {
        let goal = self.config.goal;
        if !self.env.valid_xy(goal) {
            return Err(Error::InvalidLocation {
                x: goal.x,
                y: goal.y,
            });
        }
        let starts: Vec<Xy> = match self.config.start {
            Some(start) => vec![start],
            None => self
                .env
                .valid_cells()
                .into_iter()
                .filter(|&xy| xy != goal)
                .collect(),
        };
        Ok(starts)
    }

    /// Run training with the given learner
    pub fn run(&mut self, learner: &mut dyn Learner) -> Result<TrainingResult> {
        let starts = self.validate()?;
        let seed = self.config.seed.unwrap_or_else(random);
        let mut rng = StdRng::seed_from_u64(seed);
        learner.set_rng_seed(seed.wrapping_add(1))?;

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        let mut curve = Vec::with_capacity(self.config.num_episodes);
        for episode_num in 0..self.config.num_episodes {
            let start = *starts
                .choose(&mut rng)
                .ok_or_else(|| Error::InvalidConfiguration {
                    message: "no start cells available".to_string(),
                })?;
            let episode = self.run_episode(episode_num, start, learner)?;
            learner.learn(&episode)?;

            let summary = episode.summary(episode_num);
            debug!(
                episode = episode_num,
                steps = summary.steps,
                reached_goal = summary.reached_goal,
                "episode finished"
            );
            for observer in &mut self.observers {
                observer.on_episode_end(episode_num, &summary)?;
            }
            curve.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_curve(learner.name().to_string(), curve);
        info!(
            learner = %result.learner,
            success_rate = result.success_rate,
            mean_steps = result.mean_steps,
            "training finished"
        );
        Ok(result)
    }

    fn run_episode(
        &mut self,
        episode_num: usize,
        start: Xy,
        learner: &mut dyn Learner,
    ) -> Result<Episode> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode_num)?;
        }

        let mut observation = self.env.set_task(start, self.config.goal)?;
        let mut episode = Episode::default();

        loop {
            let action = learner.select_action(&observation)?;
            let step = self.env.step(action)?;
            let transition = Transition {
                state: observation.agent_xy,
                action,
                reward: step.reward,
                next_state: step.observation.agent_xy,
                terminated: step.terminated,
            };

            for observer in &mut self.observers {
                observer.on_step(episode_num, episode.steps(), &transition)?;
            }
            episode.transitions.push(transition);

            if step.terminated || step.truncated {
                episode.terminated = step.terminated;
                episode.truncated = step.truncated;
                return Ok(episode);
            }
            observation = step.observation;
        }
    }
}
