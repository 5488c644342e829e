//! Integration tests for spanning trees and random decompositions

use oporto::{
    FourRoomsEnv,
    graphs::{
        decompose, is_acyclic, is_connected, separate_components, transition_graph,
        uniform_spanning_tree,
    },
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn test_spanning_tree_of_four_rooms() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..5 {
        let tree = uniform_spanning_tree(&graph, &mut rng).unwrap();
        assert_eq!(tree.vertex_count(), graph.vertex_count());
        assert_eq!(tree.undirected_edges().count(), graph.vertex_count() - 1);
        assert!(is_connected(&tree));
        assert!(is_acyclic(&tree));
        assert!(tree.undirected_edges().all(|e| graph.has_edge(e)));
    }
}

#[test]
fn test_decompositions_have_connected_regions() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let mut rng = StdRng::seed_from_u64(17);

    for n in [1, 2, 4, 8, 16] {
        let regions = decompose(n, &graph, &mut rng).unwrap();
        assert_eq!(regions.num_components(), n);
        // Decompositions keep the full graph, including edges between regions
        assert_eq!(regions.graph(), &graph);

        let subgraphs = regions.component_subgraphs();
        assert_eq!(subgraphs.len(), n);
        assert_eq!(
            subgraphs.iter().map(|g| g.vertex_count()).sum::<usize>(),
            graph.vertex_count()
        );
        assert!(subgraphs.iter().all(is_connected));
    }
}

#[test]
fn test_every_vertex_can_be_its_own_region() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let mut rng = StdRng::seed_from_u64(5);
    let regions = decompose(graph.vertex_count(), &graph, &mut rng).unwrap();
    assert_eq!(regions.num_components(), graph.vertex_count());
    assert!(decompose(graph.vertex_count() + 1, &graph, &mut rng).is_err());
    assert!(decompose(0, &graph, &mut rng).is_err());
}

#[test]
fn test_same_seed_same_decomposition() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let a = decompose(4, &graph, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = decompose(4, &graph, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_separate_components_of_cut_tree() {
    let graph = transition_graph(&FourRoomsEnv::new());
    let mut rng = StdRng::seed_from_u64(8);
    let mut tree = uniform_spanning_tree(&graph, &mut rng).unwrap();
    let edge = tree.undirected_edges().next().unwrap();
    tree.remove_edge(edge);

    let pieces = separate_components(&tree);
    assert_eq!(pieces.len(), 2);
    assert!(pieces.iter().all(is_acyclic));
}
