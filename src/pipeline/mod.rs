//! Training pipeline for gridworld learners
//!
//! This module provides:
//! - Episode records and summaries
//! - Learners with and without options
//! - Observers recording data during training
//! - The training loop itself

pub mod episode;
pub mod learners;
pub mod observers;
pub mod training;

pub use episode::{Episode, EpisodeSummary, Transition};
pub use learners::{FlatLearner, OptionsLearner, RandomLearner};
pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver,
    ProgressObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Learner, Observer};
