//! Learning the policy of a subgoal option from experience

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    features::{FeatureKind, FeatureMap, Features},
    tree_backup::{Backup, TreeBackup},
};
use crate::{
    Error, Result,
    app::LearningConfig,
    envs::FourRoomsEnv,
    graphs::UndirectedGraph,
    options::{DeterministicOption, RegionSubgoalOption},
    pipeline::EpisodeSummary,
    types::{Action, Xy},
};

/// Pseudo-reward for reaching the subgoal.
const SUBGOAL_REWARD: f64 = 1.0;

/// An option whose policy was learned with Tree-Backup(λ).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedOption {
    name: String,
    region: BTreeSet<Xy>,
    subgoal: Xy,
    value_threshold: f64,
    learner: TreeBackup<Features>,
}

impl LearnedOption {
    pub fn subgoal(&self) -> Xy {
        self.subgoal
    }

    pub fn region(&self) -> &BTreeSet<Xy> {
        &self.region
    }

    pub fn learner(&self) -> &TreeBackup<Features> {
        &self.learner
    }

    /// Region cells where the learned value is high enough to start.
    pub fn initiation_set(&self) -> Vec<Xy> {
        self.region
            .iter()
            .copied()
            .filter(|xy| self.can_initiate(xy))
            .collect()
    }

    /// Cells visited when running the option from `start`, excluding
    /// `start`, stopping on termination or after `max_steps`.
    pub fn rollout(&self, env: &FourRoomsEnv, start: Xy, max_steps: usize) -> Vec<Xy> {
        let mut visited = Vec::new();
        let mut current = start;
        while visited.len() < max_steps {
            let Some(action) = self.pi(&current) else {
                break;
            };
            current = env.transition(current, action);
            visited.push(current);
            if self.terminates_at(&current) {
                break;
            }
        }
        visited
    }
}

impl DeterministicOption for LearnedOption {
    type State = Xy;
    type Action = Action;

    fn can_initiate(&self, state: &Xy) -> bool {
        self.region.contains(state) && self.learner.max_q(*state) > self.value_threshold
    }

    fn pi(&self, state: &Xy) -> Option<Action> {
        if !self.region.contains(state) {
            return None;
        }
        Action::from_index(self.learner.greedy_action(*state)).ok()
    }

    fn terminates_at(&self, state: &Xy) -> bool {
        !self.region.contains(state)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// A set of learned options together with the settings that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSet {
    pub features: FeatureKind,
    pub config: LearningConfig,
    pub options: Vec<LearnedOption>,
}

/// Learn a policy that leads from `region` to `subgoal`.
///
/// Episodes start at a random region cell and follow a uniform random
/// behaviour policy. Reaching the subgoal pays 1 and ends the episode;
/// leaving the region any other way ends it with nothing.
pub fn learn_option<R: Rng + ?Sized>(
    env: &FourRoomsEnv,
    name: String,
    region: BTreeSet<Xy>,
    subgoal: Xy,
    features: Features,
    config: &LearningConfig,
    rng: &mut R,
) -> Result<(LearnedOption, Vec<EpisodeSummary>)> {
    config.validate()?;
    let starts: Vec<Xy> = region.iter().copied().collect();
    if starts.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: format!("option '{name}' has an empty region"),
        });
    }
    if features.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: format!("option '{name}' has no features"),
        });
    }

    let mut learner = TreeBackup::new(features, Action::COUNT, config.alpha, config.lambda);
    let mut curve = Vec::with_capacity(config.episodes);

    for episode in 0..config.episodes {
        learner.start_episode();
        let mut state = starts[rng.random_range(0..starts.len())];
        let mut steps = 0;
        let mut reached_goal = false;

        while steps < config.max_steps {
            let action = Action::ALL[rng.random_range(0..Action::COUNT)];
            let next = env.transition(state, action);
            steps += 1;

            reached_goal = next == subgoal;
            let left_region = !region.contains(&next);
            learner.update(&Backup {
                state,
                action: action.index(),
                reward: if reached_goal { SUBGOAL_REWARD } else { 0.0 },
                next_state: (!left_region).then_some(next),
                discount: config.gamma,
            })?;

            if left_region {
                break;
            }
            state = next;
        }

        curve.push(EpisodeSummary {
            episode,
            steps,
            total_reward: if reached_goal { SUBGOAL_REWARD } else { 0.0 },
            reached_goal,
        });
    }

    let successes = curve.iter().filter(|e| e.reached_goal).count();
    debug!(%name, %subgoal, successes, episodes = config.episodes, "learned option");

    let option = LearnedOption {
        name,
        region,
        subgoal,
        value_threshold: config.value_threshold,
        learner,
    };
    Ok((option, curve))
}

/// Learn the policy of a region subgoal option over the transition graph.
pub fn learn_region_option<R: Rng + ?Sized>(
    env: &FourRoomsEnv,
    graph: &UndirectedGraph<Xy>,
    option: &RegionSubgoalOption,
    kind: FeatureKind,
    config: &LearningConfig,
    rng: &mut R,
) -> Result<(LearnedOption, Vec<EpisodeSummary>)> {
    let cell = |v: usize| {
        graph.vertex(v).copied().ok_or(Error::VertexOutOfRange {
            vertex: v,
            size: graph.vertex_count(),
        })
    };
    let region = option
        .members()
        .iter()
        .map(|&v| cell(v))
        .collect::<Result<BTreeSet<Xy>>>()?;
    let subgoal = cell(option.subgoal())?;

    learn_option(
        env,
        option.name(),
        region,
        subgoal,
        kind.build(env, subgoal),
        config,
        rng,
    )
}
