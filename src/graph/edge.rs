//! Edge type.
//!
//! An edge is an ordered `(from, to)` pair of node identities. Direction is
//! kept for enumeration and `children`, and ignored by connectivity queries.

use std::fmt;

use serde::Serialize;

/// A directed edge between two nodes.
///
/// Graphs hand out `Edge<&N>` borrowing their own storage; an owned
/// `Edge<N>` can be fed back into [`AdjacencyList::insert_edge`].
///
/// [`AdjacencyList::insert_edge`]: super::AdjacencyList::insert_edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge<N> {
    /// Source node.
    pub from: N,
    /// Target node.
    pub to: N,
}

impl<N> Edge<N> {
    /// Create a new edge from `from` to `to`.
    #[inline]
    pub fn new(from: N, to: N) -> Self {
        Self { from, to }
    }

    /// The same pair pointing the other way.
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Map both endpoints through `f`.
    #[inline]
    pub fn map<M>(self, mut f: impl FnMut(N) -> M) -> Edge<M> {
        Edge {
            from: f(self.from),
            to: f(self.to),
        }
    }
}

impl<N: Clone> Edge<&N> {
    /// Clone both endpoints into an owned edge.
    #[inline]
    pub fn cloned(self) -> Edge<N> {
        self.map(Clone::clone)
    }
}

impl<N> From<(N, N)> for Edge<N> {
    #[inline]
    fn from((from, to): (N, N)) -> Self {
        Self { from, to }
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
