//! Integration tests for region-based agents and their model evidence

mod common;

use common::{TOLERANCE, assert_close, sampled_behaviors as behaviors};
use oporto::{
    FourRoomsEnv, RegionBasedAgent,
    envs::example_regions,
    evidence::{log_evidence_possible_actions, log_model_evidence, posterior_model_probabilities},
    graphs::{decompose, transition_graph},
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn test_single_region_agent_only_moves() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let regions = decompose(1, &graph, &mut StdRng::seed_from_u64(0)).unwrap();
    let agent = RegionBasedAgent::new(regions).unwrap();
    assert!(agent.options().options().is_empty());

    let data = behaviors(30, 1);
    let expected: f64 = data
        .iter()
        .flat_map(|(_, path)| path[..path.len() - 1].iter())
        .map(|&v| -(graph.degree(v) as f64).ln())
        .sum();
    assert_close(log_model_evidence(&agent, &data).unwrap(), expected);
    assert_close(log_evidence_possible_actions(&agent, &data).unwrap(), expected);
}

#[test]
fn test_example_rooms_evidence_is_a_log_probability() {
    let env = FourRoomsEnv::new();
    let agent = RegionBasedAgent::new(example_regions(&env).unwrap()).unwrap();
    let data = behaviors(50, 2);

    let lme = log_model_evidence(&agent, &data).unwrap();
    assert!(lme.is_finite());
    assert!(lme < 0.0);

    // Summing over every reading of a path can only raise its likelihood
    let committed = log_evidence_possible_actions(&agent, &data).unwrap();
    assert!(committed <= lme + TOLERANCE);
}

#[test]
fn test_every_optimal_path_has_positive_likelihood() {
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);
    let mut rng = StdRng::seed_from_u64(21);
    let agent = RegionBasedAgent::new(decompose(6, &graph, &mut rng).unwrap()).unwrap();

    for (_, path) in behaviors(40, 3) {
        let likelihood = agent.path_likelihood(&path).unwrap();
        assert!(likelihood > 0.0 && likelihood <= 1.0);
    }
}

#[test]
fn test_posterior_over_decompositions() {
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);
    let data = behaviors(20, 4);
    let mut rng = StdRng::seed_from_u64(6);

    let lmes: Vec<f64> = [1, 4, 16]
        .into_iter()
        .map(|n| {
            let agent = RegionBasedAgent::new(decompose(n, &graph, &mut rng).unwrap()).unwrap();
            log_model_evidence(&agent, &data).unwrap()
        })
        .collect();
    let posterior = posterior_model_probabilities(&lmes);

    assert_close(posterior.iter().sum::<f64>(), 1.0);
    let best = lmes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    assert!(posterior.iter().all(|&p| p <= posterior[best]));
}

#[test]
fn test_empty_dataset_is_rejected() {
    let env = FourRoomsEnv::new();
    let agent = RegionBasedAgent::new(example_regions(&env).unwrap()).unwrap();
    assert!(log_model_evidence(&agent, &[]).is_err());
}
