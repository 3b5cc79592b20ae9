//! AdjacencyList - the graph store.
//!
//! Keeps two relations over the same node set:
//! - `directed`: `from -> {to}` exactly as edges were added, used for edge
//!   enumeration, `children` and `has_edge`
//! - `symmetric`: both orientations of every edge, used for undirected degree
//!   and traversal
//!
//! Both are maps from a node to a set of nodes, so re-adding an edge is a
//! no-op. Index-ordered collections keep enumeration order equal to insertion
//! order, which makes traversal and partitioning deterministic.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use super::edge::Edge;
use super::traverse::Graph;

/// Graph of hashable identities, built purely by adding edges.
///
/// Not synchronized: a single owner mutates it through `&mut self`.
#[derive(Debug, Clone)]
pub struct AdjacencyList<T> {
    /// Every identity that has appeared as an edge endpoint.
    nodes: IndexSet<T>,

    /// Edges as added: from -> set of targets.
    directed: IndexMap<T, IndexSet<T>>,

    /// Edges in both orientations: node -> set of undirected neighbors.
    symmetric: IndexMap<T, IndexSet<T>>,
}

impl<T> AdjacencyList<T>
where
    T: Clone + Eq + Hash,
{
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: IndexSet::new(),
            directed: IndexMap::new(),
            symmetric: IndexMap::new(),
        }
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            nodes: IndexSet::with_capacity(node_capacity),
            directed: IndexMap::with_capacity(node_capacity),
            symmetric: IndexMap::with_capacity(node_capacity),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add the directed edge `from -> to`, registering both endpoints.
    pub fn add_edge(&mut self, from: T, to: T) {
        self.directed
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.symmetric
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.symmetric
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        self.nodes.insert(from);
        self.nodes.insert(to);
    }

    /// Add an owned edge.
    pub fn insert_edge(&mut self, edge: Edge<T>) {
        self.add_edge(edge.from, edge.to);
    }

    /// Register a node without edges.
    ///
    /// Only exploration uses this, so that the start of a walk is part of its
    /// result even when no edge is accepted.
    pub(crate) fn insert_node(&mut self, node: T) {
        self.nodes.insert(node);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.directed.values().map(IndexSet::len).sum()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T> Default for AdjacencyList<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph for AdjacencyList<T>
where
    T: Clone + Eq + Hash,
{
    type Node = T;

    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, node: &T) -> Option<&T> {
        self.nodes.get(node)
    }

    fn nodes(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = Edge<&T>> {
        self.directed
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| Edge::new(from, to)))
    }

    fn children(&self, node: &T) -> impl Iterator<Item = &T> {
        self.directed.get(node).into_iter().flatten()
    }

    fn adjacent(&self, node: &T) -> impl Iterator<Item = &T> {
        self.symmetric.get(node).into_iter().flatten()
    }

    fn neighbors(&self, node: &T) -> usize {
        self.symmetric.get(node).map_or(0, IndexSet::len)
    }

    fn has_edge(&self, from: &T, to: &T) -> bool {
        self.directed
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }
}

impl<T> FromIterator<(T, T)> for AdjacencyList<T>
where
    T: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl<T> Extend<(T, T)> for AdjacencyList<T>
where
    T: Clone + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (T, T)>>(&mut self, iter: I) {
        for (from, to) in iter {
            self.add_edge(from, to);
        }
    }
}
