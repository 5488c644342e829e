//! Connectivity and cycle checks

use super::UndirectedGraph;
use crate::types::VertexId;

/// True when every vertex is reachable from vertex 0. The empty graph is
/// connected.
pub fn is_connected<T>(graph: &UndirectedGraph<T>) -> bool {
    if graph.is_empty() {
        return true;
    }
    let mut visited = vec![false; graph.vertex_count()];
    let mut stack = vec![0];
    visited[0] = true;
    let mut seen = 1;
    while let Some(v) = stack.pop() {
        for &n in graph.neighbors(v) {
            if !visited[n] {
                visited[n] = true;
                seen += 1;
                stack.push(n);
            }
        }
    }
    seen == graph.vertex_count()
}

/// True when the graph contains no undirected cycle. Self-loops are cycles.
pub fn is_acyclic<T>(graph: &UndirectedGraph<T>) -> bool {
    let mut visited = vec![false; graph.vertex_count()];
    for root in 0..graph.vertex_count() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        // (vertex, parent)
        let mut stack: Vec<(VertexId, Option<VertexId>)> = vec![(root, None)];
        while let Some((v, parent)) = stack.pop() {
            for &n in graph.neighbors(v) {
                if Some(n) == parent {
                    continue;
                }
                if visited[n] {
                    return false;
                }
                visited[n] = true;
                stack.push((n, Some(v)));
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single_vertex() {
        let empty: UndirectedGraph<()> = UndirectedGraph::new(vec![]);
        assert!(is_connected(&empty));
        assert!(is_acyclic(&empty));
        assert!(is_connected(&UndirectedGraph::new(vec![()])));
    }

    #[test]
    fn test_triangle_is_cyclic() {
        let triangle = UndirectedGraph::from_edges(vec![0, 1, 2], [(0, 1), (1, 2), (2, 0)]);
        assert!(is_connected(&triangle));
        assert!(!is_acyclic(&triangle));
    }

    #[test]
    fn test_forest_is_acyclic_but_disconnected() {
        let forest = UndirectedGraph::from_edges(vec![0, 1, 2, 3], [(0, 1), (2, 3)]);
        assert!(!is_connected(&forest));
        assert!(is_acyclic(&forest));
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let looped = UndirectedGraph::from_edges(vec![0, 1], [(0, 1), (1, 1)]);
        assert!(!is_acyclic(&looped));
    }
}
