//! Observers for training pipelines
//!
//! Observers collect data during training without coupling the training loop
//! to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::episode::{EpisodeSummary, Transition};
use crate::{Error, Result, ports::Observer, types::Xy};

/// Complete record of one training episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reached_goal: bool,
    /// Visited cells, starting with the start cell
    pub path: Vec<Xy>,
}

/// Progress bar observer
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if summary.reached_goal {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("goal reached {}", self.successes));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("goal reached {}", self.successes));
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_steps: f64,
    /// Mean steps over the most recent window of episodes
    pub recent_mean_steps: f64,
}

/// Tracks the learning curve
pub struct MetricsObserver {
    window: usize,
    curve: Vec<EpisodeSummary>,
}

impl MetricsObserver {
    /// Create a metrics observer averaging recent episodes over `window`.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            curve: Vec::new(),
        }
    }

    /// Metrics of an already recorded learning curve.
    pub fn from_curve(window: usize, curve: &[EpisodeSummary]) -> Self {
        Self {
            window: window.max(1),
            curve: curve.to_vec(),
        }
    }

    pub fn curve(&self) -> &[EpisodeSummary] {
        &self.curve
    }

    pub fn success_rate(&self) -> f64 {
        if self.curve.is_empty() {
            0.0
        } else {
            self.curve.iter().filter(|e| e.reached_goal).count() as f64 / self.curve.len() as f64
        }
    }

    pub fn mean_steps(&self) -> f64 {
        mean_steps(&self.curve)
    }

    /// Mean episode length over a trailing window ending at each episode.
    pub fn moving_average_steps(&self) -> Vec<f64> {
        (0..self.curve.len())
            .map(|i| {
                let from = (i + 1).saturating_sub(self.window);
                mean_steps(&self.curve[from..=i])
            })
            .collect()
    }

    pub fn summary(&self) -> MetricsSummary {
        let recent = self.curve.len().saturating_sub(self.window);
        MetricsSummary {
            total_episodes: self.curve.len(),
            successes: self.curve.iter().filter(|e| e.reached_goal).count(),
            success_rate: self.success_rate(),
            mean_steps: self.mean_steps(),
            recent_mean_steps: mean_steps(&self.curve[recent..]),
        }
    }
}

fn mean_steps(curve: &[EpisodeSummary]) -> f64 {
    if curve.is_empty() {
        0.0
    } else {
        curve.iter().map(|e| e.steps).sum::<usize>() as f64 / curve.len() as f64
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Observer for MetricsObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.curve = Vec::with_capacity(total_episodes);
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.curve.push(*summary);
        Ok(())
    }
}

/// Writes one JSON line per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    path: Vec<Xy>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.path.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, step: usize, transition: &Transition) -> Result<()> {
        if step == 0 {
            self.path.push(transition.state);
        }
        self.path.push(transition.next_state);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            steps: summary.steps,
            total_reward: summary.total_reward,
            reached_goal: summary.reached_goal,
            path: std::mem::take(&mut self.path),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Records the first episode that reached the goal and the last one that did not
#[derive(Debug, Default)]
pub struct MilestoneObserver {
    first_success: Option<usize>,
    last_failure: Option<usize>,
    episodes: usize,
}

impl MilestoneObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_curve(curve: &[EpisodeSummary]) -> Self {
        let mut observer = Self::new();
        for summary in curve {
            observer.record(summary);
        }
        observer
    }

    fn record(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        if summary.reached_goal {
            self.first_success.get_or_insert(summary.episode);
        } else {
            self.last_failure = Some(summary.episode);
        }
    }

    pub fn first_success(&self) -> Option<usize> {
        self.first_success
    }

    pub fn last_failure(&self) -> Option<usize> {
        self.last_failure
    }

    /// First episode from which every recorded episode reached the goal.
    pub fn converged_after(&self) -> Option<usize> {
        match self.last_failure {
            None if self.episodes > 0 => Some(0),
            Some(last) if last + 1 < self.episodes => Some(last + 1),
            _ => None,
        }
    }
}

impl Observer for MilestoneObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.record(summary);
        Ok(())
    }
}
