//! Integration tests for the genetic search over decompositions

mod common;

use common::{assert_close, sampled_behaviors};
use oporto::{
    FourRoomsEnv,
    app::SearchConfig,
    evidence::log_model_evidence,
    graphs::transition_graph,
    search::{FitnessEvaluator, GeneticSearch, SearchResults, decode_agent, find_results},
};
use tempfile::TempDir;

fn search(seed: u64) -> (GeneticSearch, SearchResults) {
    let graph = transition_graph(&FourRoomsEnv::new());
    let behaviors = sampled_behaviors(15, seed);
    let evaluator = FitnessEvaluator::new(graph, behaviors).unwrap();

    let config = SearchConfig::new(4)
        .with_population_size(6)
        .with_generations(4)
        .with_seed(seed);
    let mut search = GeneticSearch::new(config, evaluator).unwrap();
    let results = search.run().unwrap();
    (search, results)
}

#[test]
fn test_search_reports_best_solution() {
    let (search, results) = search(10);

    assert!(results.lme.is_finite() && results.lme < 0.0);
    assert_eq!(results.population_size, 6);
    assert!(results.generations <= 4);
    assert_eq!(results.history.len(), results.generations + 1);

    // The best fitness never decreases
    for pair in results.history.windows(2) {
        assert!(pair[1].best_fitness >= pair[0].best_fitness);
    }
    assert_eq!(results.history.last().unwrap().best_fitness, results.lme);

    // The stored solution really scores the reported evidence
    let graph = search.evaluator().graph();
    let agent = decode_agent(&results.solution, graph).unwrap();
    let lme = log_model_evidence(&agent, search.evaluator().behaviors()).unwrap();
    assert_close(lme, results.lme);
}

#[test]
fn test_search_is_reproducible() {
    let (_, a) = search(31);
    let (_, b) = search(31);
    assert_eq!(a.solution, b.solution);
    assert_eq!(a.lme, b.lme);
}

#[test]
fn test_results_files_round_trip() {
    let (search, results) = search(12);
    let dir = TempDir::new().unwrap();

    let path = results.save_to_dir(dir.path()).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("results_"));
    assert!(name.contains(&format!("_LME:{}_", results.lme as i64)));
    assert!(name.ends_with("_4gens_6pop.json"));

    let found = find_results(dir.path(), "LME:").unwrap();
    assert_eq!(found, vec![path.clone()]);

    let loaded = SearchResults::load(&path).unwrap();
    assert_eq!(loaded.solution, results.solution);
    assert_eq!(loaded.generations, results.generations);
    assert_eq!(loaded.history.len(), results.history.len());
    assert_close(loaded.lme, results.lme);
    assert_eq!(loaded.config, results.config);
    let agent = loaded.decode(search.evaluator().graph()).unwrap();
    assert!(agent.num_regions() >= 1);
}

#[test]
fn test_result_file_uses_published_keys() {
    let (_, results) = search(14);
    let json = serde_json::to_value(&results).unwrap();
    for key in ["solution", "LME", "generations", "population size"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
}
