//! Temporally extended actions
//!
//! An option is a closed-loop policy with an initiation set and a termination
//! condition. Options built from a region decomposition take the agent from
//! anywhere in a region to one of the region's exit states (its subgoal).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, graphs::ConnectedComponents, types::VertexId};

/// An option with deterministic termination.
pub trait DeterministicOption {
    type State;
    type Action;

    /// Whether the option may be started in `state`.
    fn can_initiate(&self, state: &Self::State) -> bool;

    /// Action the option takes in `state`, if it defines one there.
    fn pi(&self, state: &Self::State) -> Option<Self::Action>;

    fn terminates_at(&self, state: &Self::State) -> bool;

    fn name(&self) -> String;
}

/// Option that leads from any state of a region to one of its exit states.
///
/// Actions are the next vertex to visit. The policy follows a shortest path
/// that stays inside the region until the final step onto the subgoal; among
/// equally short paths the lowest-numbered next vertex wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSubgoalOption {
    region: usize,
    subgoal: VertexId,
    members: BTreeSet<VertexId>,
    entrances: Vec<VertexId>,
    exits: Vec<VertexId>,
    policy: BTreeMap<VertexId, VertexId>,
}

impl RegionSubgoalOption {
    /// Build the option for `region` whose subgoal is the exit state `subgoal`.
    pub fn new<T>(
        regions: &ConnectedComponents<T>,
        region: usize,
        subgoal: VertexId,
    ) -> Result<Self> {
        if region >= regions.num_components() {
            return Err(Error::UnknownRegion {
                region,
                count: regions.num_components(),
            });
        }
        let exits = regions.exit_states(region);
        if !exits.contains(&subgoal) {
            return Err(Error::InvalidConfiguration {
                message: format!("vertex {subgoal} is not an exit state of region {region}"),
            });
        }

        let members: BTreeSet<VertexId> = regions.vertex_indices(region).into_iter().collect();
        let graph = regions.graph();
        let allowed = |v: VertexId| v == subgoal || members.contains(&v);

        // Hop distance to the subgoal through allowed vertices
        let mut distance: BTreeMap<VertexId, usize> = BTreeMap::new();
        distance.insert(subgoal, 0);
        let mut queue = VecDeque::from([subgoal]);
        while let Some(v) = queue.pop_front() {
            let d = distance[&v];
            for &n in graph.neighbors(v) {
                if allowed(n) && !distance.contains_key(&n) {
                    distance.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }

        let policy = members
            .iter()
            .filter_map(|&v| {
                let d = *distance.get(&v)?;
                graph
                    .neighbors(v)
                    .iter()
                    .find(|&&n| distance.get(&n) == Some(&(d - 1)))
                    .map(|&next| (v, next))
            })
            .collect();

        Ok(Self {
            region,
            subgoal,
            entrances: regions.entrance_states(region),
            exits,
            members,
            policy,
        })
    }

    pub fn region(&self) -> usize {
        self.region
    }

    pub fn subgoal(&self) -> VertexId {
        self.subgoal
    }

    pub fn members(&self) -> &BTreeSet<VertexId> {
        &self.members
    }

    pub fn entrances(&self) -> &[VertexId] {
        &self.entrances
    }

    pub fn exits(&self) -> &[VertexId] {
        &self.exits
    }

    /// Vertices visited when the option runs from `start` to termination,
    /// excluding `start`.
    pub fn trajectory(&self, start: VertexId) -> Vec<VertexId> {
        let mut visited = Vec::new();
        let mut current = start;
        while let Some(next) = self.pi(&current) {
            visited.push(next);
            if self.terminates_at(&next) {
                break;
            }
            current = next;
        }
        visited
    }
}

impl DeterministicOption for RegionSubgoalOption {
    type State = VertexId;
    type Action = VertexId;

    fn can_initiate(&self, state: &VertexId) -> bool {
        self.policy.contains_key(state)
    }

    fn pi(&self, state: &VertexId) -> Option<VertexId> {
        self.policy.get(state).copied()
    }

    fn terminates_at(&self, state: &VertexId) -> bool {
        !self.members.contains(state)
    }

    fn name(&self) -> String {
        format!("region {} -> {}", self.region, self.subgoal)
    }
}

/// One subgoal option per (region, exit state) pair.
pub fn region_options<T>(regions: &ConnectedComponents<T>) -> Result<Vec<RegionSubgoalOption>> {
    let mut options = Vec::new();
    for region in 0..regions.num_components() {
        for exit in regions.exit_states(region) {
            options.push(RegionSubgoalOption::new(regions, region, exit)?);
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::UndirectedGraph;

    /// 0 - 1 - 2 - 3 - 4 with regions {0, 1, 2} and {3, 4}
    fn line_regions() -> ConnectedComponents<usize> {
        let graph = UndirectedGraph::from_edges((0..5).collect(), (1..5).map(|i| (i - 1, i)));
        ConnectedComponents::from_labels(graph, vec![0, 0, 0, 1, 1]).unwrap()
    }

    #[test]
    fn test_policy_walks_to_subgoal() {
        let regions = line_regions();
        let option = RegionSubgoalOption::new(&regions, 0, 3).unwrap();
        assert_eq!(option.entrances(), &[2]);
        assert_eq!(option.pi(&0), Some(1));
        assert_eq!(option.pi(&2), Some(3));
        assert_eq!(option.pi(&3), None);
        assert_eq!(option.trajectory(0), vec![1, 2, 3]);
        assert!(option.can_initiate(&1));
        assert!(!option.can_initiate(&4));
        assert!(option.terminates_at(&3));
        assert!(!option.terminates_at(&0));
    }

    #[test]
    fn test_ties_break_to_lowest_vertex() {
        // Square 0-1-3, 0-2-3 where 3 is outside the region
        let graph = UndirectedGraph::from_edges(vec![(); 4], [(0, 1), (0, 2), (1, 3), (2, 3)]);
        let regions = ConnectedComponents::from_labels(graph, vec![0, 0, 0, 1]).unwrap();
        let option = RegionSubgoalOption::new(&regions, 0, 3).unwrap();
        assert_eq!(option.pi(&0), Some(1));
    }

    #[test]
    fn test_region_options_per_exit() {
        let regions = line_regions();
        let options = region_options(&regions).unwrap();
        let subgoals: Vec<_> = options.iter().map(|o| (o.region(), o.subgoal())).collect();
        assert_eq!(subgoals, vec![(0, 3), (1, 2)]);
        assert_eq!(options[1].name(), "region 1 -> 2");
    }

    #[test]
    fn test_rejects_non_exit_subgoal() {
        let regions = line_regions();
        assert!(RegionSubgoalOption::new(&regions, 0, 4).is_err());
        assert!(matches!(
            RegionSubgoalOption::new(&regions, 5, 3),
            Err(Error::UnknownRegion { .. })
        ));
    }
}
