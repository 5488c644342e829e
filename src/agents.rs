//! Agents acting on a state transition graph
//!
//! A region-based agent chooses uniformly among the primitive moves out of
//! its current vertex and the subgoal options it can start there. That
//! choice model is what behaviours are scored against when computing model
//! evidence.

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    graphs::{ConnectedComponents, UndirectedGraph},
    options::{DeterministicOption, RegionSubgoalOption, region_options},
    types::{Action, VertexId, Xy},
};

/// A collection of options.
#[derive(Debug, Clone)]
pub struct OptionsAgent<O> {
    options: Vec<O>,
}

impl<O: DeterministicOption> OptionsAgent<O> {
    pub fn new(options: Vec<O>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[O] {
        &self.options
    }

    /// Options that can start in `state` and would not stop immediately.
    pub fn available_options(&self, state: &O::State) -> Vec<&O> {
        self.options
            .iter()
            .filter(|o| o.can_initiate(state) && !o.terminates_at(state))
            .collect()
    }
}

/// Agent whose options are derived from a decomposition of its state graph.
#[derive(Debug, Clone)]
pub struct RegionBasedAgent<T = Xy> {
    regions: ConnectedComponents<T>,
    options: OptionsAgent<RegionSubgoalOption>,
}

impl<T> RegionBasedAgent<T> {
    pub fn new(regions: ConnectedComponents<T>) -> Result<Self> {
        let options = OptionsAgent::new(region_options(&regions)?);
        Ok(Self { regions, options })
    }

    pub fn graph(&self) -> &UndirectedGraph<T> {
        self.regions.graph()
    }

    pub fn regions(&self) -> &ConnectedComponents<T> {
        &self.regions
    }

    pub fn num_regions(&self) -> usize {
        self.regions.num_components()
    }

    pub fn options(&self) -> &OptionsAgent<RegionSubgoalOption> {
        &self.options
    }

    /// Number of choices at `v`: its primitive moves plus its available options.
    pub fn choices_at(&self, v: VertexId) -> usize {
        self.graph().degree(v) + self.options.available_options(&v).len()
    }

    fn validate(&self, path: &[VertexId]) -> Result<()> {
        let size = self.graph().vertex_count();
        let first = *path.first().ok_or(Error::EmptyPath)?;
        if first >= size {
            return Err(Error::VertexOutOfRange {
                vertex: first,
                size,
            });
        }
        for step in path.windows(2) {
            if !self.graph().has_edge((step[0], step[1])) {
                return Err(Error::InvalidPathStep {
                    from: step[0],
                    to: step[1],
                });
            }
        }
        Ok(())
    }

    /// Position in `path` where `option`, started at `path[from]`, stops if
    /// it reproduces the path until it terminates or the path ends.
    fn option_span(
        option: &RegionSubgoalOption,
        path: &[VertexId],
        from: usize,
    ) -> Option<usize> {
        let last = path.len() - 1;
        let mut at = from;
        loop {
            let next = option.pi(&path[at])?;
            if at == last || next != path[at + 1] {
                return None;
            }
            at += 1;
            if option.terminates_at(&path[at]) || at == last {
                return Some(at);
            }
        }
    }

    /// Probability that the agent, choosing uniformly at every decision
    /// point, produces `path`.
    ///
    /// Sums over every way of splitting the path into primitive moves and
    /// option executions.
    pub fn path_likelihood(&self, path: &[VertexId]) -> Result<f64> {
        self.validate(path)?;

        let mut reach = vec![0.0; path.len()];
        reach[0] = 1.0;
        for i in 0..path.len() - 1 {
            if reach[i] == 0.0 {
                continue;
            }
            let share = reach[i] / self.choices_at(path[i]) as f64;
            reach[i + 1] += share;
            for option in self.options.available_options(&path[i]) {
                if let Some(end) = Self::option_span(option, path, i) {
                    reach[end] += share;
                }
            }
        }
        Ok(reach[path.len() - 1])
    }

    /// Number of choices at every step of `path`, following the longest
    /// matching option wherever one applies. Steps taken inside an option
    /// count as a single choice.
    pub fn possible_actions(&self, path: &[VertexId]) -> Result<Vec<usize>> {
        self.validate(path)?;

        let mut counts = Vec::with_capacity(path.len().saturating_sub(1));
        let mut i = 0;
        while i + 1 < path.len() {
            counts.push(self.choices_at(path[i]));
            let end = self
                .options
                .available_options(&path[i])
                .into_iter()
                .filter_map(|option| Self::option_span(option, path, i))
                .max()
                .unwrap_or(i + 1);
            counts.extend(std::iter::repeat_n(1, end - i - 1));
            i = end;
        }
        Ok(counts)
    }
}

/// Agents are equal when they decompose the state graph the same way.
impl<T> PartialEq for RegionBasedAgent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.regions == other.regions
    }
}

/// Agent that picks primitive actions uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn select_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        *Action::ALL.choose(rng).unwrap_or(&Action::NoOp)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    /// 0 - 1 - 2 - 3 - 4 with regions {0, 1, 2} and {3, 4}
    fn line_agent() -> RegionBasedAgent<usize> {
        let graph = UndirectedGraph::from_edges((0..5).collect(), (1..5).map(|i| (i - 1, i)));
        let regions = ConnectedComponents::from_labels(graph, vec![0, 0, 0, 1, 1]).unwrap();
        RegionBasedAgent::new(regions).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_choices_count_moves_and_options() {
        let agent = line_agent();
        let choices: Vec<_> = (0..5).map(|v| agent.choices_at(v)).collect();
        assert_eq!(choices, vec![2, 3, 3, 3, 2]);
    }

    #[test]
    fn test_likelihood_sums_over_decompositions() {
        let agent = line_agent();
        // 1/2 (option from 0) + 1/6 (option from 1) + 1/9 (primitive or option from 2)
        assert_close(agent.path_likelihood(&[0, 1, 2, 3]).unwrap(), 7.0 / 9.0);
        assert_close(agent.path_likelihood(&[3, 2]).unwrap(), 2.0 / 3.0);
        // The option from 1 heads the other way
        assert_close(agent.path_likelihood(&[1, 0]).unwrap(), 1.0 / 3.0);
        assert_close(agent.path_likelihood(&[4]).unwrap(), 1.0);
    }

    #[test]
    fn test_likelihood_rejects_bad_paths() {
        let agent = line_agent();
        assert!(matches!(agent.path_likelihood(&[]), Err(Error::EmptyPath)));
        assert!(matches!(
            agent.path_likelihood(&[0, 2]),
            Err(Error::InvalidPathStep { from: 0, to: 2 })
        ));
        assert!(agent.path_likelihood(&[9]).is_err());
    }

    #[test]
    fn test_possible_actions_follow_longest_option() {
        let agent = line_agent();
        assert_eq!(agent.possible_actions(&[0, 1, 2, 3]).unwrap(), vec![2, 1, 1]);
        assert_eq!(agent.possible_actions(&[1, 0]).unwrap(), vec![3]);
        assert_eq!(agent.possible_actions(&[0, 1, 2, 3, 4]).unwrap(), vec![2, 1, 1, 3]);
    }

    #[test]
    fn test_equality_compares_regions() {
        assert_eq!(line_agent(), line_agent());

        let graph = UndirectedGraph::from_edges((0..5).collect(), (1..5).map(|i| (i - 1, i)));
        let regions = ConnectedComponents::from_labels(graph, vec![0, 0, 1, 1, 1]).unwrap();
        assert_ne!(line_agent(), RegionBasedAgent::new(regions).unwrap());
    }

    #[test]
    fn test_random_agent_covers_actions() {
        let agent = RandomAgent::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; Action::COUNT];
        for _ in 0..500 {
            seen[agent.select_action(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
