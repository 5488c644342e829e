//! Observer port - abstraction for training observation and data collection
//!
//! Observers collect data during training without coupling the training loop
//! to specific output formats or metrics.

use crate::{
    Result,
    pipeline::{EpisodeSummary, Transition},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - for each environment step
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - once at the end
///
/// All methods default to doing nothing.
///
/// # Examples
///
/// ```no_run
/// use oporto::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> oporto::Result<()> {
///         if summary.reached_goal {
///             self.successes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every environment step.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
