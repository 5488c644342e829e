//! Learner port - abstraction over agents trained in the gridworld
//!
//! The training pipeline drives any learner through this interface:
//! - Baselines (uniform random actions)
//! - Flat learners (Tree-Backup over primitive actions)
//! - Hierarchical learners (Tree-Backup over primitives and options)

use crate::{Result, envs::Observation, pipeline::Episode, types::Action};

/// Learner trait - unified interface for gridworld agents
///
/// This trait represents a **port** in hexagonal architecture. Concrete
/// learning strategies are adapters that implement it.
///
/// # Examples
///
/// ```no_run
/// use oporto::{envs::Observation, pipeline::Episode, ports::Learner, types::Action};
///
/// struct AlwaysRight;
///
/// impl Learner for AlwaysRight {
///     fn select_action(&mut self, _observation: &Observation) -> oporto::Result<Action> {
///         Ok(Action::Right)
///     }
///
///     fn name(&self) -> &str {
///         "always-right"
///     }
///
///     fn as_any(&self) -> &dyn std::any::Any {
///         self
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Select the next primitive action.
    ///
    /// Learners that execute options return the option's action for every
    /// step until it terminates.
    fn select_action(&mut self, observation: &Observation) -> Result<Action>;

    /// Update the learner after an episode completes.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive learners.
    fn learn(&mut self, _episode: &Episode) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name.
    fn name(&self) -> &str;

    /// Reset learner state to initial conditions.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for stateless learners.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this when given a deterministic seed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
