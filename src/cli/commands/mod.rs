//! Subcommands of the `oporto` binary
//!
//! Each module exposes a clap `Args` struct and an `execute` function.

pub mod behaviors;
pub mod decompose;
pub mod evidence;
pub mod graph;
pub mod learn;
pub mod results;
pub mod search;
