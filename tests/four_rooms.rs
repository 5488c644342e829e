//! Integration tests for the Four Rooms environment and its transition graph

use oporto::{
    Action, FourRoomsEnv, Xy,
    envs::{GridRenderer, example_regions},
    graphs::{is_connected, transition_graph, vertex_at},
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn test_transition_graph_matches_environment_dynamics() {
    let env = FourRoomsEnv::new();
    let graph = transition_graph(&env);

    assert_eq!(graph.vertex_count(), env.valid_cells().len());
    assert!(is_connected(&graph));

    for (v, &xy) in graph.vertices().iter().enumerate() {
        let reachable: Vec<usize> = Action::ALL
            .iter()
            .map(|&a| env.transition(xy, a))
            .filter(|&next| next != xy)
            .filter_map(|next| vertex_at(&graph, next))
            .collect();
        for n in &reachable {
            assert!(graph.has_edge((v, *n)), "missing edge {xy} -> {n}");
        }
        assert_eq!(graph.degree(v), reachable.len());
    }
}

#[test]
fn test_random_episode_stays_in_free_cells() {
    let mut env = FourRoomsEnv::new().with_max_steps(300);
    let mut rng = StdRng::seed_from_u64(11);
    env.reset(&mut rng);

    for i in 0.. {
        let action = Action::ALL[i % Action::COUNT];
        let step = env.step(action).unwrap();
        assert!(env.valid_xy(step.observation.agent_xy));
        if step.terminated || step.truncated {
            assert!(step.terminated != step.truncated);
            break;
        }
    }
}

#[test]
fn test_example_regions_cover_every_cell_once() {
    let env = FourRoomsEnv::new();
    let regions = example_regions(&env).unwrap();
    let graph = regions.graph();

    let sizes: Vec<usize> = (0..4).map(|r| regions.vertex_indices(r).len()).collect();
    let mut sorted = sizes.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![22, 26, 26, 30]);

    // Every room is reached from the others only through its hallways
    for r in 0..4 {
        let exits: Vec<Xy> = regions
            .exit_states(r)
            .into_iter()
            .filter_map(|v| graph.vertex(v).copied())
            .collect();
        assert!(!exits.is_empty());
        assert!(exits.len() <= 6, "room {r} has {} exits", exits.len());
    }
}

#[test]
fn test_render_regions_uses_one_symbol_per_room() {
    let env = FourRoomsEnv::new();
    let regions = example_regions(&env).unwrap();
    let text = GridRenderer::new(&env)
        .without_task()
        .with_regions(regions.graph(), regions.labels())
        .render();

    for symbol in ['0', '1', '2', '3'] {
        assert!(text.contains(symbol));
    }
    assert!(!text.contains('4'));
    assert_eq!(text.matches('#').count(), 13 * 13 - 104);
}
