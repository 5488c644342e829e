//! Bayesian model selection over region-based subgoal options
//!
//! This crate provides:
//! - The Four Rooms gridworld and its state transition graph
//! - Random decompositions of the graph into connected regions
//! - Region subgoal options and the agent built from them
//! - Optimal (A*) behaviours and their log model evidence under an agent
//! - Genetic search for the decomposition with the highest evidence
//! - Tree-Backup(λ) learning of option policies and a training pipeline
//!   comparing learners with and without options

pub mod adapters;
pub mod agents;
pub mod app;
pub mod cli;
pub mod envs;
pub mod error;
pub mod evidence;
pub mod export;
pub mod graphs;
pub mod learning;
pub mod options;
pub mod pipeline;
pub mod planning;
pub mod ports;
pub mod search;
pub mod types;

pub use agents::RegionBasedAgent;
pub use envs::FourRoomsEnv;
pub use error::{Error, Result};
pub use graphs::{ConnectedComponents, UndirectedGraph};
pub use options::{DeterministicOption, RegionSubgoalOption};
pub use types::{Action, Path, Task, VertexId, Xy};
