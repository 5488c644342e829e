//! Random decompositions of a state graph into connected regions
//!
//! A uniform spanning tree is drawn with Wilson's algorithm; cutting `n - 1`
//! of its edges leaves exactly `n` connected regions.

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use tracing::debug;

use super::{ConnectedComponents, UndirectedGraph, connectivity::is_connected};
use crate::{Error, Result, types::VertexId};

/// Sample a spanning tree uniformly from all spanning trees of `graph`.
///
/// Wilson's algorithm: starting from a random root, each remaining vertex (in
/// random order) performs a random walk until it hits the tree, and the
/// loop-erased walk is added. Loop erasure comes for free by remembering only
/// the last exit taken from every vertex.
pub fn uniform_spanning_tree<T: Clone, R: Rng + ?Sized>(
    graph: &UndirectedGraph<T>,
    rng: &mut R,
) -> Result<UndirectedGraph<T>> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }
    if !is_connected(graph) {
        return Err(Error::DisconnectedGraph);
    }

    let n = graph.vertex_count();
    let mut tree = graph.without_edges();
    let mut in_tree = vec![false; n];
    let mut next: Vec<Option<VertexId>> = vec![None; n];

    let root = rng.random_range(0..n);
    in_tree[root] = true;

    let mut order: Vec<VertexId> = (0..n).collect();
    order.shuffle(rng);

    for start in order {
        let mut u = start;
        while !in_tree[u] {
            let step = graph.random_neighbor(u, rng)?;
            next[u] = Some(step);
            u = step;
        }

        let mut u = start;
        while !in_tree[u] {
            in_tree[u] = true;
            let Some(step) = next[u] else { break };
            tree.add_edge((u, step));
            u = step;
        }
    }

    Ok(tree)
}

/// Split `graph` into exactly `n` connected regions.
///
/// The regions are the components left after removing `n - 1` random edges
/// from a uniform spanning tree. The returned partition keeps every edge of
/// `graph`, so transitions between regions stay visible.
pub fn decompose<T: Clone, R: Rng + ?Sized>(
    n: usize,
    graph: &UndirectedGraph<T>,
    rng: &mut R,
) -> Result<ConnectedComponents<T>> {
    if n == 0 || n > graph.vertex_count() {
        return Err(Error::InvalidComponentCount {
            requested: n,
            size: graph.vertex_count(),
        });
    }

    let mut tree = uniform_spanning_tree(graph, rng)?;
    let tree_edges: Vec<_> = tree.undirected_edges().collect();
    let cuts: Vec<_> = tree_edges.choose_multiple(rng, n - 1).copied().collect();
    for edge in cuts {
        tree.remove_edge(edge);
    }

    let pieces = ConnectedComponents::new(tree);
    if pieces.num_components() != n {
        return Err(Error::ComponentCountMismatch {
            expected: n,
            got: pieces.num_components(),
        });
    }
    debug!(regions = n, vertices = graph.vertex_count(), "decomposed graph");

    ConnectedComponents::from_labels(graph.clone(), pieces.labels().to_vec())
}

/// The connected components of `graph` as separate, re-indexed graphs.
pub fn separate_components<T: Clone>(graph: &UndirectedGraph<T>) -> Vec<UndirectedGraph<T>> {
    ConnectedComponents::new(graph.clone()).component_subgraphs()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::graphs::is_acyclic;

    fn grid(width: usize, height: usize) -> UndirectedGraph<(usize, usize)> {
        let vertices: Vec<_> = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .collect();
        let mut graph = UndirectedGraph::new(vertices);
        for x in 0..width {
            for y in 0..height {
                let v = x * height + y;
                if y + 1 < height {
                    graph.add_edge((v, v + 1));
                }
                if x + 1 < width {
                    graph.add_edge((v, v + height));
                }
            }
        }
        graph
    }

    #[test]
    fn test_spanning_tree_of_grid() {
        let graph = grid(4, 5);
        let mut rng = StdRng::seed_from_u64(42);
        let tree = uniform_spanning_tree(&graph, &mut rng).unwrap();
        assert_eq!(tree.vertex_count(), 20);
        assert_eq!(tree.edge_count(), 2 * 19);
        assert!(is_connected(&tree));
        assert!(is_acyclic(&tree));
        assert!(tree.directed_edges().all(|e| graph.has_edge(e)));
    }

    #[test]
    fn test_spanning_tree_rejects_disconnected_graph() {
        let graph = UndirectedGraph::from_edges(vec![0, 1, 2], [(0, 1)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            uniform_spanning_tree(&graph, &mut rng),
            Err(Error::DisconnectedGraph)
        ));
    }

    #[test]
    fn test_decompose_yields_requested_regions() {
        let graph = grid(3, 3);
        let mut rng = StdRng::seed_from_u64(9);
        for n in 1..=9 {
            let regions = decompose(n, &graph, &mut rng).unwrap();
            assert_eq!(regions.num_components(), n);
            assert_eq!(regions.graph().edge_count(), graph.edge_count());
            for piece in regions.component_subgraphs() {
                assert!(is_connected(&piece));
            }
        }
    }

    #[test]
    fn test_decompose_rejects_bad_counts() {
        let graph = grid(2, 2);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(decompose(0, &graph, &mut rng).is_err());
        assert!(decompose(5, &graph, &mut rng).is_err());
    }

    #[test]
    fn test_separate_components() {
        let graph = UndirectedGraph::from_edges((0..5).collect(), [(0, 1), (2, 3), (3, 4)]);
        let parts = separate_components(&graph);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].vertices(), &[0, 1]);
        assert_eq!(parts[1].vertex_count(), 3);
    }
}
