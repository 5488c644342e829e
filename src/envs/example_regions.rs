//! Hand-made decomposition of Four Rooms into its four rooms
//!
//! Each hallway cell is assigned to exactly one neighbouring room.

use super::four_rooms::FourRoomsEnv;
use crate::{
    Error, Result,
    graphs::{ConnectedComponents, transition_graph},
    types::Xy,
};

fn room_of(xy: Xy) -> Option<usize> {
    let Xy { x, y } = xy;
    if x < 6 && y <= 6 {
        Some(0)
    } else if x >= 6 && y <= 5 {
        Some(1)
    } else if x <= 6 && y > 6 {
        Some(2)
    } else if x > 6 && y > 5 {
        Some(3)
    } else {
        None
    }
}

/// Label every cell of the transition graph with its room.
pub fn example_regions(env: &FourRoomsEnv) -> Result<ConnectedComponents<Xy>> {
    let graph = transition_graph(env);
    let labels = graph
        .vertices()
        .iter()
        .enumerate()
        .map(|(vertex, &xy)| {
            room_of(xy).ok_or(Error::UnlabeledVertex {
                vertex,
                x: xy.x,
                y: xy.y,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ConnectedComponents::from_labels(graph, labels)
}
