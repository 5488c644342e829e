//! Partitions of a graph into labelled regions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::UndirectedGraph;
use crate::{Error, Result, types::VertexId};

/// A graph together with a region label for every vertex.
///
/// Labels run `0..num_components` and are numbered in order of first
/// appearance over increasing vertex index, so two partitions into the same
/// regions always have identical labels.
///
/// Built from the graph's own connectivity ([`ConnectedComponents::new`]) or
/// from externally computed labels ([`ConnectedComponents::from_labels`]). In
/// the second case edges may cross region boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedComponents<T> {
    graph: UndirectedGraph<T>,
    labels: Vec<usize>,
    num_components: usize,
}

impl<T> ConnectedComponents<T> {
    /// Label the connected components of `graph` by depth-first search.
    pub fn new(graph: UndirectedGraph<T>) -> Self {
        let mut labels: Vec<Option<usize>> = vec![None; graph.vertex_count()];
        let mut num_components = 0;

        for root in 0..graph.vertex_count() {
            if labels[root].is_some() {
                continue;
            }
            labels[root] = Some(num_components);
            let mut stack = vec![root];
            while let Some(v) = stack.pop() {
                for &n in graph.neighbors(v) {
                    if labels[n].is_none() {
                        labels[n] = Some(num_components);
                        stack.push(n);
                    }
                }
            }
            num_components += 1;
        }

        Self {
            graph,
            labels: labels.into_iter().flatten().collect(),
            num_components,
        }
    }

    /// Use the given per-vertex labels as regions, renumbering them in order
    /// of first appearance.
    pub fn from_labels(graph: UndirectedGraph<T>, labels: Vec<usize>) -> Result<Self> {
        if labels.len() != graph.vertex_count() {
            return Err(Error::LabelCountMismatch {
                labels: labels.len(),
                size: graph.vertex_count(),
            });
        }

        let mut renumbered: HashMap<usize, usize> = HashMap::new();
        let labels: Vec<usize> = labels
            .into_iter()
            .map(|label| {
                let next = renumbered.len();
                *renumbered.entry(label).or_insert(next)
            })
            .collect();

        Ok(Self {
            graph,
            labels,
            num_components: renumbered.len(),
        })
    }

    pub fn graph(&self) -> &UndirectedGraph<T> {
        &self.graph
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn label_of(&self, v: VertexId) -> Option<usize> {
        self.labels.get(v).copied()
    }

    pub fn share_component(&self, i: VertexId, j: VertexId) -> bool {
        match (self.label_of(i), self.label_of(j)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Vertices of region `c` in increasing order.
    pub fn vertex_indices(&self, c: usize) -> Vec<VertexId> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == c)
            .map(|(v, _)| v)
            .collect()
    }

    /// Vertices of region `r` with a neighbor outside `r`.
    pub fn entrance_states(&self, r: usize) -> Vec<VertexId> {
        self.vertex_indices(r)
            .into_iter()
            .filter(|&v| {
                self.graph
                    .neighbors(v)
                    .iter()
                    .any(|&n| self.labels[n] != r)
            })
            .collect()
    }

    /// Vertices outside region `r` with a neighbor in `r`.
    pub fn exit_states(&self, r: usize) -> Vec<VertexId> {
        (0..self.graph.vertex_count())
            .filter(|&v| self.labels[v] != r)
            .filter(|&v| {
                self.graph
                    .neighbors(v)
                    .iter()
                    .any(|&n| self.labels[n] == r)
            })
            .collect()
    }
}

impl<T: Clone> ConnectedComponents<T> {
    /// One re-indexed subgraph per region, in label order.
    pub fn component_subgraphs(&self) -> Vec<UndirectedGraph<T>> {
        (0..self.num_components)
            .map(|c| self.graph.subgraph(&self.vertex_indices(c)))
            .collect()
    }
}

/// Partitions are equal when they group the vertices identically.
impl<T> PartialEq for ConnectedComponents<T> {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl<T> Eq for ConnectedComponents<T> {}
