//! CLI infrastructure for the oporto toolkit
//!
//! Commands inspect the Four Rooms transition graph, score decompositions by
//! their log model evidence, search for the best decomposition, and learn the
//! options it implies.

pub mod commands;
pub mod config;
pub mod output;
