//! The `Graph` trait and the exploration algorithms built on top of it.
//!
//! Any structure that can enumerate its nodes, its directed edges and the
//! undirected neighborhood of a node gets `explore`, `vicinity` and
//! `subgraphs` for free. Exploration uses an explicit FIFO worklist, so
//! deep or cyclic components never grow the call stack.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use tracing::{debug, trace};

use super::adjacency::AdjacencyList;
use super::edge::Edge;

/// Read access to a graph of hashable node identities.
///
/// Edges are directed for enumeration (`edges`, `children`, `has_edge`) and
/// undirected for connectivity (`adjacent`, `neighbors`, `explore`).
pub trait Graph {
    /// Node identity type.
    type Node: Clone + Eq + Hash;

    /// Number of nodes.
    fn size(&self) -> usize;

    /// The stored copy of `node`, or `None` if it is not part of the graph.
    fn node(&self, node: &Self::Node) -> Option<&Self::Node>;

    /// All nodes, each exactly once.
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// All directed edges, each exactly once.
    fn edges(&self) -> impl Iterator<Item = Edge<&Self::Node>>;

    /// Targets of the edges leaving `node`.
    fn children(&self, node: &Self::Node) -> impl Iterator<Item = &Self::Node>;

    /// Nodes connected to `node` by an edge in either direction.
    fn adjacent(&self, node: &Self::Node) -> impl Iterator<Item = &Self::Node>;

    /// Whether the directed edge `from -> to` exists.
    fn has_edge(&self, from: &Self::Node, to: &Self::Node) -> bool;

    /// Undirected degree: distinct nodes adjacent to `node`.
    fn neighbors(&self, node: &Self::Node) -> usize {
        self.adjacent(node).count()
    }

    /// Walk the graph from `start`, copying every edge `accept` lets through
    /// into a new graph.
    ///
    /// `accept` receives the candidate edge oriented away from the node being
    /// expanded, its hop depth (edges leaving `start` are depth 1) and the graph
    /// built so far. An edge and its reverse are visited at most once between
    /// them. A rejected edge is not marked visited and may be offered again
    /// from another node. The result always contains `start`, and is empty if
    /// `start` is not part of this graph.
    fn explore<F>(&self, start: &Self::Node, mut accept: F) -> AdjacencyList<Self::Node>
    where
        F: FnMut(Edge<&Self::Node>, usize, &AdjacencyList<Self::Node>) -> bool,
    {
        let mut explored = AdjacencyList::new();
        let Some(start) = self.node(start) else {
            trace!("explore started from a node outside the graph");
            return explored;
        };
        explored.insert_node(start.clone());

        let mut visited: HashSet<Edge<&Self::Node>> = HashSet::new();
        let mut frontier: VecDeque<(&Self::Node, usize)> = VecDeque::from([(start, 0)]);

        while let Some((current, depth)) = frontier.pop_front() {
            let depth = depth + 1;
            for neighbor in self.adjacent(current) {
                let forth = Edge::new(current, neighbor);
                if !accept(forth, depth, &explored) {
                    continue;
                }
                // Both orientations are inserted together, one lookup covers both.
                if !visited.insert(forth) {
                    continue;
                }
                visited.insert(forth.reversed());

                if self.has_edge(current, neighbor) {
                    explored.add_edge(current.clone(), neighbor.clone());
                }
                if self.has_edge(neighbor, current) {
                    explored.add_edge(neighbor.clone(), current.clone());
                }
                frontier.push_back((neighbor, depth));
            }
        }

        explored
    }

    /// Ego graph of `node`: every edge within `degrees` hops of it.
    fn vicinity(&self, node: &Self::Node, degrees: usize) -> AdjacencyList<Self::Node> {
        self.explore(node, |_, depth, _| depth <= degrees)
    }

    /// Partition the graph into its weakly connected components.
    ///
    /// Components come out in order of their first node in [`Graph::nodes`].
    /// Their node sets are disjoint and cover the whole graph.
    fn subgraphs(&self) -> Vec<AdjacencyList<Self::Node>> {
        let mut assigned: HashSet<&Self::Node> = HashSet::with_capacity(self.size());
        let mut components = Vec::new();

        for node in self.nodes() {
            if assigned.contains(node) {
                continue;
            }
            let component = self.explore(node, |_, _, _| true);
            assigned.extend(component.nodes().filter_map(|member| self.node(member)));
            components.push(component);
        }

        debug!(
            nodes = self.size(),
            components = components.len(),
            "partitioned graph into connected components"
        );
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(length: u32) -> AdjacencyList<u32> {
        (0..length).map(|i| (i, i + 1)).collect()
    }

    fn sorted<'a>(nodes: impl Iterator<Item = &'a &'static str>) -> Vec<&'static str> {
        let mut nodes: Vec<_> = nodes.copied().collect();
        nodes.sort_unstable();
        nodes
    }

    #[test]
    fn test_subgraphs_partition() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("2004", "2008");
        graph.add_edge("2005", "2008");
        graph.add_edge("2008", "2009");
        graph.add_edge("2008", "2010");
        graph.add_edge("2010", "2011");

        graph.add_edge("1000", "1001");
        graph.add_edge("1001", "1002");

        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 2);

        let first = &subgraphs[0];
        assert_eq!(first.size(), 6);
        assert_eq!(first.edges().count(), 5);

        let second = &subgraphs[1];
        assert_eq!(second.size(), 3);
        assert_eq!(second.edges().count(), 2);

        // Disjoint and covering.
        let mut seen = HashSet::new();
        for subgraph in &subgraphs {
            for node in subgraph.nodes() {
                assert!(seen.insert(*node), "{node} appears in two components");
            }
        }
        assert_eq!(seen.len(), graph.size());

        // No edge crosses components.
        for edge in graph.edges() {
            let home = subgraphs
                .iter()
                .position(|s| s.node(edge.from).is_some())
                .unwrap();
            assert!(subgraphs[home].node(edge.to).is_some());
            assert!(subgraphs[home].has_edge(edge.from, edge.to));
        }
    }

    #[test]
    fn test_subgraphs_single_chain() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("1000", "1001");
        graph.add_edge("1001", "1002");

        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(subgraphs[0].size(), 3);
    }

    #[test]
    fn test_subgraphs_two_node_component() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("a", "b");
        graph.add_edge("c", "d");
        graph.add_edge("d", "e");

        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 2);
        assert_eq!(sorted(subgraphs[0].nodes()), vec!["a", "b"]);
        assert_eq!(subgraphs[0].edges().count(), 1);
        assert!(subgraphs[0].has_edge(&"a", &"b"));
        assert!(!subgraphs[0].has_edge(&"b", &"a"));
    }

    #[test]
    fn test_subgraphs_empty_graph() {
        let graph: AdjacencyList<u32> = AdjacencyList::new();
        assert!(graph.subgraphs().is_empty());
    }

    #[test]
    fn test_subgraphs_self_loop() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("solo", "solo");

        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(subgraphs[0].size(), 1);
        assert!(subgraphs[0].has_edge(&"solo", &"solo"));
    }

    #[test]
    fn test_subgraphs_cycle_keeps_both_directions() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_edge("b", "c");
        graph.add_edge("c", "a");

        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(subgraphs[0].edges().count(), 4);
    }

    #[test]
    fn test_explore_deep_chain_does_not_recurse() {
        let graph = chain(200_000);
        let subgraphs = graph.subgraphs();
        assert_eq!(subgraphs.len(), 1);
        assert_eq!(subgraphs[0].size(), 200_001);
        assert_eq!(subgraphs[0].edges().count(), 200_000);
    }

    #[test]
    fn test_explore_unknown_start_is_empty() {
        let graph = chain(3);
        let explored = graph.explore(&42, |_, _, _| true);
        assert!(explored.is_empty());
        assert_eq!(explored.edges().count(), 0);
    }

    #[test]
    fn test_explore_filter_sees_depth_and_progress() {
        let graph = chain(4);
        let mut offered = Vec::new();
        let explored = graph.explore(&0, |edge, depth, built| {
            offered.push((*edge.from, *edge.to, depth, built.edge_count()));
            true
        });

        assert_eq!(explored.edge_count(), 4);
        // Each edge is offered forward once, and once backward from its far end.
        assert!(offered.contains(&(0, 1, 1, 0)));
        assert!(offered.contains(&(1, 2, 2, 1)));
        assert!(offered.contains(&(3, 4, 4, 3)));
        assert!(offered.contains(&(1, 0, 2, 1)));
    }

    #[test]
    fn test_explore_reverse_edges_are_copied() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("leaf", "hub");
        graph.add_edge("hub", "other");

        let explored = graph.explore(&"hub", |_, _, _| true);
        assert!(explored.has_edge(&"leaf", &"hub"));
        assert!(!explored.has_edge(&"hub", &"leaf"));
        assert!(explored.has_edge(&"hub", &"other"));
    }

    #[test]
    fn test_vicinity_zero_is_the_node_alone() {
        let graph = chain(5);
        let vicinity = graph.vicinity(&2, 0);
        assert_eq!(vicinity.size(), 1);
        assert!(vicinity.node(&2).is_some());
        assert_eq!(vicinity.edges().count(), 0);
    }

    #[test]
    fn test_vicinity_one_is_the_star() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("center", "a");
        graph.add_edge("b", "center");
        graph.add_edge("a", "b");
        graph.add_edge("b", "far");

        let vicinity = graph.vicinity(&"center", 1);
        assert_eq!(sorted(vicinity.nodes()), vec!["a", "b", "center"]);
        assert_eq!(vicinity.edges().count(), 2);
        assert!(vicinity.has_edge(&"center", &"a"));
        assert!(vicinity.has_edge(&"b", &"center"));
        assert!(!vicinity.has_edge(&"a", &"b"));
    }

    #[test]
    fn test_vicinity_two_reaches_second_ring() {
        let mut graph = AdjacencyList::new();
        graph.add_edge("center", "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");

        let vicinity = graph.vicinity(&"center", 2);
        assert_eq!(sorted(vicinity.nodes()), vec!["a", "b", "center"]);
        assert_eq!(vicinity.edges().count(), 2);
    }

    #[test]
    fn test_vicinity_uses_shortest_depth() {
        // The long way round reaches "x" at depth 3, the short way at depth 1.
        let mut graph = AdjacencyList::new();
        graph.add_edge("start", "p");
        graph.add_edge("p", "q");
        graph.add_edge("q", "x");
        graph.add_edge("start", "x");
        graph.add_edge("x", "y");

        let vicinity = graph.vicinity(&"start", 2);
        assert!(vicinity.has_edge(&"x", &"y"));
        assert!(vicinity.has_edge(&"p", &"q"));
        assert!(vicinity.has_edge(&"q", &"x"));
    }
}
