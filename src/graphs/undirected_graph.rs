//! Undirected graph with ordered adjacency sets

use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::VertexId};

/// An undirected graph whose vertices carry a payload of type `T`.
///
/// Every undirected edge `{i, j}` is stored as the two directed entries
/// `i -> j` and `j -> i`. Self-loops are stored once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndirectedGraph<T> {
    vertices: Vec<T>,
    adjacency: Vec<BTreeSet<VertexId>>,
}

impl<T> UndirectedGraph<T> {
    /// Create a graph without edges.
    pub fn new(vertices: Vec<T>) -> Self {
        let adjacency = vertices.iter().map(|_| BTreeSet::new()).collect();
        Self {
            vertices,
            adjacency,
        }
    }

    /// Create a graph from a list of edges. Duplicate edges are ignored.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a vertex out of range.
    pub fn from_edges(
        vertices: Vec<T>,
        edges: impl IntoIterator<Item = (VertexId, VertexId)>,
    ) -> Self {
        let mut graph = Self::new(vertices);
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    /// Payload of a vertex.
    pub fn vertex(&self, v: VertexId) -> Option<&T> {
        self.vertices.get(v)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of directed adjacency entries (twice the undirected edge count
    /// for graphs without self-loops).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum()
    }

    /// Neighbors of `v` in increasing order.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    pub fn neighbors(&self, v: VertexId) -> &BTreeSet<VertexId> {
        &self.adjacency[v]
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(v).map_or(0, BTreeSet::len)
    }

    /// Add the undirected edge `{i, j}`.
    ///
    /// Returns how many directed entries were added: 2 for a new edge, 1 for
    /// a new self-loop and 0 when the edge already existed.
    ///
    /// # Panics
    ///
    /// Panics if either vertex is out of range.
    pub fn add_edge(&mut self, (i, j): (VertexId, VertexId)) -> usize {
        let mut added = usize::from(self.adjacency[i].insert(j));
        if i != j {
            added += usize::from(self.adjacency[j].insert(i));
        }
        added
    }

    /// Remove the undirected edge `{i, j}`, returning how many directed
    /// entries were removed.
    pub fn remove_edge(&mut self, (i, j): (VertexId, VertexId)) -> usize {
        if i >= self.vertex_count() || j >= self.vertex_count() {
            return 0;
        }
        let mut removed = usize::from(self.adjacency[i].remove(&j));
        if i != j {
            removed += usize::from(self.adjacency[j].remove(&i));
        }
        removed
    }

    pub fn has_edge(&self, (i, j): (VertexId, VertexId)) -> bool {
        self.adjacency.get(i).is_some_and(|n| n.contains(&j))
    }

    /// All directed entries, ordered by source then target.
    pub fn directed_edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| neighbors.iter().map(move |&j| (i, j)))
    }

    /// Each undirected edge once, as `(i, j)` with `i <= j`.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.directed_edges().filter(|(i, j)| i <= j)
    }

    /// Sample a directed entry uniformly at random.
    pub fn sample_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(VertexId, VertexId)> {
        let count = self.edge_count();
        if count == 0 {
            return Err(Error::NoEdges);
        }
        let pick = rng.random_range(0..count);
        self.directed_edges().nth(pick).ok_or(Error::NoEdges)
    }

    /// Sample a neighbor of `v` uniformly at random.
    pub fn random_neighbor<R: Rng + ?Sized>(&self, v: VertexId, rng: &mut R) -> Result<VertexId> {
        let neighbors = self.adjacency.get(v).ok_or(Error::VertexOutOfRange {
            vertex: v,
            size: self.vertex_count(),
        })?;
        if neighbors.is_empty() {
            return Err(Error::IsolatedVertex { vertex: v });
        }
        let pick = rng.random_range(0..neighbors.len());
        neighbors
            .iter()
            .nth(pick)
            .copied()
            .ok_or(Error::IsolatedVertex { vertex: v })
    }

    /// A copy of this graph with every edge removed.
    pub fn without_edges(&self) -> Self
    where
        T: Clone,
    {
        Self::new(self.vertices.clone())
    }
}

impl<T: Clone> UndirectedGraph<T> {
    /// Induced subgraph on `indices`, re-indexed in the given order.
    pub fn subgraph(&self, indices: &[VertexId]) -> Self {
        let position: HashMap<VertexId, VertexId> = indices
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();
        let vertices = indices.iter().map(|&v| self.vertices[v].clone()).collect();
        let mut graph = Self::new(vertices);
        for (new_i, &old_i) in indices.iter().enumerate() {
            for old_j in &self.adjacency[old_i] {
                if let Some(&new_j) = position.get(old_j) {
                    graph.adjacency[new_i].insert(new_j);
                }
            }
        }
        graph
    }
}
