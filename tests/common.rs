//! Common test utilities for the oporto test suite.

#![allow(dead_code)]

use oporto::{
    FourRoomsEnv,
    graphs::transition_graph,
    planning::{Behavior, sample_tasks, solve_tasks},
};
use rand::{SeedableRng, rngs::StdRng};

/// Absolute tolerance for comparing log evidences.
pub const TOLERANCE: f64 = 1e-9;

/// Assert that two floats agree within [`TOLERANCE`].
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Optimal behaviours for `count` random Four Rooms tasks.
pub fn sampled_behaviors(count: usize, seed: u64) -> Vec<Behavior> {
    let graph = transition_graph(&FourRoomsEnv::new());
    let mut rng = StdRng::seed_from_u64(seed);
    solve_tasks(&graph, &sample_tasks(&graph, count, &mut rng)).unwrap()
}
