//! Integration tests for the training pipeline with and without options

use std::sync::{Arc, Mutex};

use oporto::{
    FourRoomsEnv, RegionBasedAgent, Xy,
    app::{App, LearningConfig},
    envs::example_regions,
    learning::{FeatureKind, Features, OneHotFeatures},
    pipeline::{
        EpisodeRecord, EpisodeSummary, FlatLearner, JsonlObserver, Learner, Observer,
        OptionsLearner, RandomLearner, TrainingConfig, TrainingPipeline, TrainingResult,
    },
};
use tempfile::TempDir;

fn features() -> Features {
    Features::OneHot(OneHotFeatures::new(&FourRoomsEnv::new()))
}

fn config(episodes: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        num_episodes: episodes,
        goal: Xy::new(11, 11),
        start: None,
        max_steps: Some(150),
        seed: Some(seed),
    }
}

/// Observer sharing what it saw with the test
struct Recorder(Arc<Mutex<Vec<EpisodeSummary>>>);

impl Observer for Recorder {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> oporto::Result<()> {
        self.0.lock().unwrap().push(*summary);
        Ok(())
    }
}

#[test]
fn test_observer_sees_every_episode() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline =
        TrainingPipeline::new(config(12, 1)).with_observer(Box::new(Recorder(Arc::clone(&seen))));
    let mut learner = RandomLearner::new("random".to_string());

    let result = pipeline.run(&mut learner).unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 12);
    assert_eq!(*seen, result.curve);
    assert!(seen.iter().all(|e| e.steps <= 150));
}

#[test]
fn test_same_seed_same_curve() {
    let learning = LearningConfig::new().with_alpha(0.1).with_seed(2);
    let run = || {
        let mut learner = FlatLearner::new("flat".to_string(), features(), &learning);
        TrainingPipeline::new(config(15, 9)).run(&mut learner).unwrap()
    };
    assert_eq!(run().curve, run().curve);
}

#[test]
fn test_options_learner_with_learned_room_options() {
    let env = FourRoomsEnv::new();
    let app = App::for_testing().with_default_seed(4).build();
    let agent = RegionBasedAgent::new(example_regions(&env).unwrap()).unwrap();
    let learning = LearningConfig::new()
        .with_alpha(0.5)
        .with_gamma(0.9)
        .with_episodes(60)
        .with_max_steps(60)
        .with_seed(4);
    let options = app
        .learn_options(&env, &agent, FeatureKind::OneHot, &learning)
        .unwrap();
    assert!(
        options.options.iter().any(|o| !o.initiation_set().is_empty()),
        "no learned option can initiate anywhere"
    );

    let mut learner = OptionsLearner::new(
        "options".to_string(),
        options.options,
        features(),
        &learning,
    );
    let result = TrainingPipeline::new(config(20, 5)).run(&mut learner).unwrap();
    assert_eq!(result.total_episodes, 20);
    assert_eq!(result.learner, "options");
    assert!(result.curve.iter().all(|e| e.reached_goal == (e.total_reward > 0.0)));
}

#[test]
fn test_jsonl_and_result_files() {
    let dir = TempDir::new().unwrap();
    let jsonl = dir.path().join("episodes.jsonl");
    let mut pipeline = TrainingPipeline::new(config(5, 3))
        .with_observer(Box::new(JsonlObserver::new(&jsonl).unwrap()));
    let mut learner = RandomLearner::new("random".to_string());
    let result = pipeline.run(&mut learner).unwrap();
    drop(pipeline);

    let records: Vec<EpisodeRecord> = std::fs::read_to_string(&jsonl)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 5);
    for (record, summary) in records.iter().zip(&result.curve) {
        assert_eq!(record.path.len(), summary.steps + 1);
        assert_eq!(record.reached_goal, summary.reached_goal);
        if record.reached_goal {
            assert_eq!(record.path.last(), Some(&Xy::new(11, 11)));
        }
    }

    let saved = dir.path().join("result.json");
    result.save(&saved).unwrap();
    let loaded = TrainingResult::load(&saved).unwrap();
    assert_eq!(loaded.curve, result.curve);
    assert_eq!(loaded.successes, result.successes);
}

#[test]
fn test_reset_forgets_learning() {
    let learning = LearningConfig::new().with_alpha(0.5).with_seed(8);
    let mut learner = FlatLearner::new("flat".to_string(), features(), &learning);
    TrainingPipeline::new(config(10, 8)).run(&mut learner).unwrap();
    learner.reset().unwrap();
    assert!(learner.values().weights().iter().all(|&w| w == 0.0));
}
