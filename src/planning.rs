//! Optimal target behaviours via A* search
//!
//! For every ordered pair of distinct states the optimal path is the target
//! behaviour that candidate option sets are scored against.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
    hash::Hash,
};

use rand::{Rng, seq::IndexedRandom};
use tracing::debug;

use crate::{
    Error, Result,
    graphs::UndirectedGraph,
    types::{Path, Task, VertexId, Xy},
};

/// A task paired with the path that solves it.
pub type Behavior = (Task, Path);

/// A state space that A* can search.
pub trait SearchSpace {
    type State: Clone + Eq + Hash;

    fn neighbors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Cost of moving between two adjacent states.
    fn cost(&self, from: &Self::State, to: &Self::State) -> f64;

    /// Admissible estimate of the remaining cost to the nearest goal.
    fn heuristic(&self, state: &Self::State, goals: &[Self::State]) -> f64;

    /// Reject states that do not belong to the space.
    fn check_state(&self, _state: &Self::State) -> Result<()> {
        Ok(())
    }
}

struct Frontier<S> {
    f: f64,
    order: usize,
    state: S,
}

impl<S> PartialEq for Frontier<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Frontier<S> {}

impl<S> PartialOrd for Frontier<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: lowest f first, then earliest insertion.
impl<S> Ord for Frontier<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Find a lowest-cost path from `start` to any of `goals`.
///
/// Returns the states from `start` to the goal reached, inclusive, or `None`
/// when no goal is reachable.
pub fn a_star<S: SearchSpace>(
    space: &S,
    start: S::State,
    goals: &[S::State],
) -> Option<Vec<S::State>> {
    if goals.is_empty() {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<S::State> = HashSet::new();
    let mut best_cost: HashMap<S::State, f64> = HashMap::new();
    let mut parent: HashMap<S::State, S::State> = HashMap::new();
    let mut order = 0;

    best_cost.insert(start.clone(), 0.0);
    open.push(Frontier {
        f: space.heuristic(&start, goals),
        order,
        state: start,
    });

    while let Some(Frontier { state, .. }) = open.pop() {
        if closed.contains(&state) {
            continue;
        }
        if goals.contains(&state) {
            let mut path = vec![state];
            while let Some(prev) = path.last().and_then(|s| parent.get(s)) {
                path.push(prev.clone());
            }
            path.reverse();
            return Some(path);
        }

        let g = best_cost.get(&state).copied().unwrap_or(f64::INFINITY);
        for next in space.neighbors(&state) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + space.cost(&state, &next);
            if tentative < best_cost.get(&next).copied().unwrap_or(f64::INFINITY) {
                best_cost.insert(next.clone(), tentative);
                parent.insert(next.clone(), state.clone());
                order += 1;
                open.push(Frontier {
                    f: tentative + space.heuristic(&next, goals),
                    order,
                    state: next,
                });
            }
        }
        closed.insert(state);
    }
    None
}

/// Path planning over the Four Rooms transition graph with Euclidean costs.
pub struct FourRoomsPlanner<'a> {
    graph: &'a UndirectedGraph<Xy>,
}

impl<'a> FourRoomsPlanner<'a> {
    pub fn new(graph: &'a UndirectedGraph<Xy>) -> Self {
        Self { graph }
    }

    fn xy(&self, v: VertexId) -> Result<Xy> {
        self.graph
            .vertices()
            .get(v)
            .copied()
            .ok_or(Error::VertexOutOfRange {
                vertex: v,
                size: self.graph.vertex_count(),
            })
    }

    fn distance(&self, a: VertexId, b: VertexId) -> f64 {
        match (self.xy(a), self.xy(b)) {
            (Ok(a), Ok(b)) => a.distance(b),
            _ => f64::INFINITY,
        }
    }
}

impl SearchSpace for FourRoomsPlanner<'_> {
    type State = VertexId;

    fn neighbors(&self, state: &VertexId) -> Vec<VertexId> {
        self.graph.neighbors(*state).iter().copied().collect()
    }

    fn cost(&self, from: &VertexId, to: &VertexId) -> f64 {
        self.distance(*from, *to)
    }

    fn heuristic(&self, state: &VertexId, goals: &[VertexId]) -> f64 {
        goals
            .iter()
            .map(|&g| self.distance(*state, g))
            .fold(f64::INFINITY, f64::min)
    }

    fn check_state(&self, state: &VertexId) -> Result<()> {
        self.xy(*state).map(|_| ())
    }
}

/// Every ordered pair of distinct vertices.
pub fn generate_tasks<T>(graph: &UndirectedGraph<T>) -> Vec<Task> {
    let n = graph.vertex_count();
    (0..n)
        .flat_map(|start| (0..n).filter(move |&goal| goal != start).map(move |goal| (start, goal)))
        .collect()
}

/// A random subset of `count` tasks, in a random order.
pub fn sample_tasks<T, R: Rng + ?Sized>(
    graph: &UndirectedGraph<T>,
    count: usize,
    rng: &mut R,
) -> Vec<Task> {
    generate_tasks(graph)
        .choose_multiple(rng, count)
        .copied()
        .collect()
}

/// Optimal path for a single task.
pub fn solve_task<S: SearchSpace<State = VertexId>>(task: Task, planner: &S) -> Result<Path> {
    let (start, goal) = task;
    planner.check_state(&start)?;
    planner.check_state(&goal)?;
    a_star(planner, start, &[goal]).ok_or(Error::Unreachable { start, goal })
}

/// Optimal behaviours for the given tasks.
pub fn solve_tasks(graph: &UndirectedGraph<Xy>, tasks: &[Task]) -> Result<Vec<Behavior>> {
    let planner = FourRoomsPlanner::new(graph);
    tasks
        .iter()
        .map(|&task| solve_task(task, &planner).map(|path| (task, path)))
        .collect()
}

/// Optimal behaviours for every task on the graph.
pub fn generate_optimal_behaviors(graph: &UndirectedGraph<Xy>) -> Result<Vec<Behavior>> {
    let behaviors = solve_tasks(graph, &generate_tasks(graph))?;
    debug!(count = behaviors.len(), "generated optimal behaviors");
    Ok(behaviors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        envs::FourRoomsEnv,
        graphs::{transition_graph, vertex_at},
    };

    #[test]
    fn test_generate_tasks_excludes_trivial() {
        let graph = UndirectedGraph::new(vec![(); 4]);
        let tasks = generate_tasks(&graph);
        assert_eq!(tasks.len(), 12);
        assert!(tasks.iter().all(|(s, g)| s != g));
        assert_eq!(tasks[0], (0, 1));
    }

    #[test]
    fn test_diagonal_path_in_open_room() {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        let planner = FourRoomsPlanner::new(&graph);
        let start = vertex_at(&graph, Xy::new(1, 1)).unwrap();
        let goal = vertex_at(&graph, Xy::new(4, 4)).unwrap();

        let path = solve_task((start, goal), &planner).unwrap();
        let cells: Vec<Xy> = path.iter().map(|&v| graph.vertices()[v]).collect();
        assert_eq!(
            cells,
            vec![Xy::new(1, 1), Xy::new(2, 2), Xy::new(3, 3), Xy::new(4, 4)]
        );
    }

    #[test]
    fn test_unreachable_goal() {
        let graph = UndirectedGraph::from_edges(
            vec![Xy::new(0, 0), Xy::new(1, 0), Xy::new(5, 5)],
            [(0, 1)],
        );
        let planner = FourRoomsPlanner::new(&graph);
        assert!(matches!(
            solve_task((0, 2), &planner),
            Err(Error::Unreachable { start: 0, goal: 2 })
        ));
        assert_eq!(a_star(&planner, 0, &[]), None);
    }

    #[test]
    fn test_out_of_range_task_is_an_error() {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        let planner = FourRoomsPlanner::new(&graph);
        assert!(matches!(
            solve_task((0, 104), &planner),
            Err(Error::VertexOutOfRange {
                vertex: 104,
                size: 104
            })
        ));
        assert!(matches!(
            solve_task((500, 0), &planner),
            Err(Error::VertexOutOfRange { vertex: 500, .. })
        ));
        assert!(solve_tasks(&graph, &[(0, 1), (1, 999)]).is_err());
    }

    #[test]
    fn test_paths_cross_hallway() {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        let start = vertex_at(&graph, Xy::new(1, 1)).unwrap();
        let goal = vertex_at(&graph, Xy::new(11, 1)).unwrap();
        let behaviors = solve_tasks(&graph, &[(start, goal)]).unwrap();
        let path = &behaviors[0].1;
        let hallway = vertex_at(&graph, Xy::new(6, 2)).unwrap();
        assert!(path.contains(&hallway));
        assert!(path.windows(2).all(|w| graph.has_edge((w[0], w[1]))));
    }
}
