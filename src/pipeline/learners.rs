//! Learner implementations for the training pipeline
//!
//! Both value-based learners act ε-greedily and learn off-policy with
//! Tree-Backup(λ) toward the greedy policy. The options learner treats every
//! option as one extended action and backs up its discounted return over all
//! the steps it ran (SMDP Tree-Backup).

use rand::{Rng, SeedableRng, random, rngs::StdRng, seq::IndexedRandom};

use super::episode::Episode;
use crate::{
    Result,
    app::LearningConfig,
    envs::Observation,
    learning::{Backup, Features, TreeBackup},
    options::DeterministicOption,
    ports::Learner,
    types::{Action, Xy},
};

/// Exploration rate of the behaviour policy.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Uniform random primitive actions
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _observation: &Observation) -> Result<Action> {
        Ok(Action::ALL[self.rng.random_range(0..Action::COUNT)])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Exploration rate clamped to [0, 1]; NaN falls back to the default.
fn exploration_rate(epsilon: f64) -> f64 {
    if epsilon.is_nan() {
        DEFAULT_EPSILON
    } else {
        epsilon.clamp(0.0, 1.0)
    }
}

/// ε-greedy choice among `candidates`, splitting greedy ties uniformly.
fn epsilon_greedy<R: Rng + ?Sized>(
    values: &[f64],
    candidates: &[usize],
    epsilon: f64,
    rng: &mut R,
) -> Option<usize> {
    if rng.random_bool(epsilon) {
        return candidates.choose(rng).copied();
    }
    let best = candidates
        .iter()
        .map(|&c| values[c])
        .fold(f64::NEG_INFINITY, f64::max);
    let greedy: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| values[c] >= best)
        .collect();
    greedy.choose(rng).copied()
}

/// Tree-Backup(λ) over primitive actions
pub struct FlatLearner {
    name: String,
    q: TreeBackup<Features>,
    initial: TreeBackup<Features>,
    gamma: f64,
    epsilon: f64,
    rng: StdRng,
}

impl FlatLearner {
    pub fn new(name: String, features: Features, config: &LearningConfig) -> Self {
        let q = TreeBackup::new(features, Action::COUNT, config.alpha, config.lambda);
        Self {
            name,
            initial: q.clone(),
            q,
            gamma: config.gamma,
            epsilon: DEFAULT_EPSILON,
            rng: StdRng::seed_from_u64(config.seed.unwrap_or_else(random)),
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = exploration_rate(epsilon);
        self
    }

    pub fn values(&self) -> &TreeBackup<Features> {
        &self.q
    }
}

impl Learner for FlatLearner {
    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        let values = self.q.q_values(observation.agent_xy);
        let candidates: Vec<usize> = (0..Action::COUNT).collect();
        let choice = epsilon_greedy(&values, &candidates, self.epsilon, &mut self.rng).unwrap_or(0);
        Action::from_index(choice)
    }

    fn learn(&mut self, episode: &Episode) -> Result<()> {
        self.q.start_episode();
        for t in &episode.transitions {
            self.q.update(&Backup {
                state: t.state,
                action: t.action.index(),
                reward: t.reward,
                next_state: (!t.terminated).then_some(t.next_state),
                discount: self.gamma,
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) -> Result<()> {
        self.q = self.initial.clone();
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// A decision made at a choice point: where it started and what was chosen.
#[derive(Debug, Clone, Copy)]
struct Decision {
    first_step: usize,
    choice: usize,
}

/// Tree-Backup(λ) over primitive actions and options
///
/// Choices `0..9` are the primitive actions and choice `9 + i` runs option
/// `i` until it terminates or has run for `max_option_steps` steps.
pub struct OptionsLearner<O> {
    name: String,
    options: Vec<O>,
    q: TreeBackup<Features>,
    initial: TreeBackup<Features>,
    gamma: f64,
    epsilon: f64,
    max_option_steps: usize,
    rng: StdRng,
    running: Option<(usize, usize)>,
    decisions: Vec<Decision>,
    steps: usize,
}

impl<O> OptionsLearner<O>
where
    O: DeterministicOption<State = Xy, Action = Action> + Send,
{
    pub fn new(name: String, options: Vec<O>, features: Features, config: &LearningConfig) -> Self {
        let q = TreeBackup::new(
            features,
            Action::COUNT + options.len(),
            config.alpha,
            config.lambda,
        );
        Self {
            name,
            options,
            initial: q.clone(),
            q,
            gamma: config.gamma,
            epsilon: DEFAULT_EPSILON,
            max_option_steps: config.max_steps,
            rng: StdRng::seed_from_u64(config.seed.unwrap_or_else(random)),
            running: None,
            decisions: Vec::new(),
            steps: 0,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = exploration_rate(epsilon);
        self
    }

    pub fn options(&self) -> &[O] {
        &self.options
    }

    pub fn values(&self) -> &TreeBackup<Features> {
        &self.q
    }

    /// Next step of the running option, if it continues at `state`.
    fn continue_option(&mut self, state: &Xy) -> Option<Action> {
        let (index, ran) = self.running.take()?;
        let option = &self.options[index];
        if ran >= self.max_option_steps || option.terminates_at(state) {
            return None;
        }
        let action = option.pi(state)?;
        self.running = Some((index, ran + 1));
        Some(action)
    }

    fn choose(&mut self, state: Xy) -> Action {
        let values = self.q.q_values(state);
        let candidates: Vec<usize> = (0..Action::COUNT)
            .chain(
                self.options
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| o.can_initiate(&state) && !o.terminates_at(&state))
                    .map(|(i, _)| Action::COUNT + i),
            )
            .collect();
        let choice =
            epsilon_greedy(&values, &candidates, self.epsilon, &mut self.rng).unwrap_or(0);
        self.decisions.push(Decision {
            first_step: self.steps,
            choice,
        });

        if choice < Action::COUNT {
            return Action::ALL[choice];
        }
        let index = choice - Action::COUNT;
        match self.options[index].pi(&state) {
            Some(action) => {
                self.running = Some((index, 1));
                action
            }
            None => Action::NoOp,
        }
    }
}

impl<O> Learner for OptionsLearner<O>
where
    O: DeterministicOption<State = Xy, Action = Action> + Send + 'static,
{
    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        let state = observation.agent_xy;
        let action = match self.continue_option(&state) {
            Some(action) => action,
            None => self.choose(state),
        };
        self.steps += 1;
        Ok(action)
    }

    fn learn(&mut self, episode: &Episode) -> Result<()> {
        let decisions = std::mem::take(&mut self.decisions);
        self.running = None;
        self.steps = 0;

        let transitions = &episode.transitions;
        self.q.start_episode();
        for (i, decision) in decisions.iter().enumerate() {
            let first = decision.first_step;
            let end = decisions
                .get(i + 1)
                .map_or(transitions.len(), |d| d.first_step)
                .min(transitions.len());
            if first >= end {
                break;
            }

            let segment = &transitions[first..end];
            let mut discount = 1.0;
            let mut reward = 0.0;
            for t in segment {
                reward += discount * t.reward;
                discount *= self.gamma;
            }
            let last = &segment[segment.len() - 1];

            self.q.update(&Backup {
                state: segment[0].state,
                action: decision.choice,
                reward,
                next_state: (!last.terminated).then_some(last.next_state),
                discount,
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) -> Result<()> {
        self.q = self.initial.clone();
        self.running = None;
        self.decisions.clear();
        self.steps = 0;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
