//! State transition graph of the Four Rooms domain

use std::collections::HashMap;

use super::UndirectedGraph;
use crate::{
    envs::FourRoomsEnv,
    types::{Action, Xy},
};

/// Graph over every valid cell, with an edge between two cells when a single
/// action moves the agent from one to the other.
///
/// Vertices are ordered by x, then y, matching [`FourRoomsEnv::valid_cells`].
pub fn transition_graph(env: &FourRoomsEnv) -> UndirectedGraph<Xy> {
    let cells = env.valid_cells();
    let index: HashMap<Xy, usize> = cells.iter().enumerate().map(|(i, &xy)| (xy, i)).collect();

    let mut graph = UndirectedGraph::new(cells.clone());
    for (i, &xy) in cells.iter().enumerate() {
        for action in Action::ALL {
            let next = env.transition(xy, action);
            if next == xy {
                continue;
            }
            if let Some(&j) = index.get(&next) {
                graph.add_edge((i, j));
            }
        }
    }
    graph
}

/// Index of the vertex at `xy`, if it is a cell of the graph.
pub fn vertex_at(graph: &UndirectedGraph<Xy>, xy: Xy) -> Option<usize> {
    graph.vertices().iter().position(|&cell| cell == xy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::is_connected;

    #[test]
    fn test_graph_covers_valid_cells() {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        assert_eq!(graph.vertex_count(), 104);
        assert_eq!(graph.vertices()[0], Xy::new(1, 1));
        assert_eq!(graph.vertices()[1], Xy::new(1, 2));
        assert!(is_connected(&graph));
    }

    #[test]
    fn test_corner_cell_degree() {
        let env = FourRoomsEnv::new();
        let graph = transition_graph(&env);
        // (1, 1) reaches (2, 1), (1, 2) and (2, 2)
        assert_eq!(graph.degree(0), 3);
        let hallway = vertex_at(&graph, Xy::new(6, 9)).unwrap();
        // Hallway cells connect to the three cells on each side
        assert_eq!(graph.degree(hallway), 6);
    }

    #[test]
    fn test_no_self_loops() {
        let graph = transition_graph(&FourRoomsEnv::new());
        assert!(graph.directed_edges().all(|(i, j)| i != j));
    }
}
