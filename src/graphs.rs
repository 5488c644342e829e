//! State transition graphs and their decompositions into regions

pub mod connected_components;
pub mod connectivity;
pub mod partition;
pub mod transition_graph;
pub mod undirected_graph;

pub use connected_components::ConnectedComponents;
pub use connectivity::{is_acyclic, is_connected};
pub use partition::{decompose, separate_components, uniform_spanning_tree};
pub use transition_graph::{transition_graph, vertex_at};
pub use undirected_graph::UndirectedGraph;
