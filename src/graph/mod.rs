//! Graph data structures and operations.
//!
//! This module provides the [`Graph`] trait, the [`AdjacencyList`] store that
//! implements it, and the exploration algorithms (`explore`, `vicinity`,
//! `subgraphs`) shared by every implementor, including the force layout.

mod adjacency;
mod edge;
mod traverse;

pub use adjacency::AdjacencyList;
pub use edge::Edge;
pub use traverse::Graph;
