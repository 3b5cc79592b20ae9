//! Sprawl Graph - WASM Module
//!
//! A directed graph store plus a force-directed layout engine that turns the
//! graph into 2-D positions. The core types are plain generic Rust; this file
//! adds a JavaScript-friendly façade over `String` identities via
//! wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: the [`Graph`] trait, the [`AdjacencyList`] store and the
//!   exploration algorithms (`explore`, `vicinity`, `subgraphs`)
//! - `layout`: [`Vector`], [`Point`] and the [`ForceLayout`] simulation
//! - `error`: [`LayoutError`]
//!
//! # Example
//!
//! ```
//! use sprawl_graph::{AdjacencyList, ConvergeConfig, ForceLayout, Graph};
//!
//! let graph: AdjacencyList<&str> = [("hello", "world"), ("hello", "panda")]
//!     .into_iter()
//!     .collect();
//!
//! let mut layout = ForceLayout::with_seed(&graph, 7);
//! let report = layout.converge(&ConvergeConfig::default()).unwrap();
//! layout.normalize();
//!
//! assert!(report.iterations > 0);
//! assert_eq!(layout.size(), 3);
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;

pub use error::{LayoutError, Result};
pub use graph::{AdjacencyList, Edge, Graph};
pub use layout::{Bounds, ConvergeConfig, ConvergeReport, ForceLayout, Point, Vector};

type SharedGraph = Rc<AdjacencyList<String>>;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for JavaScript.
///
/// Owns the graph and, once a simulation call needs it, a layout over that
/// graph. Any edge mutation discards the layout; the next layout call
/// rebuilds it with fresh random positions.
#[wasm_bindgen]
pub struct SprawlGraphWasm {
    graph: SharedGraph,
    layout: Option<ForceLayout<SharedGraph>>,
    seed: Option<u64>,
}

#[wasm_bindgen]
impl SprawlGraphWasm {
    /// Create a new empty graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: Rc::new(AdjacencyList::new()),
            layout: None,
            seed: None,
        }
    }

    /// Create a graph with pre-allocated capacity.
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            graph: Rc::new(AdjacencyList::with_capacity(node_capacity)),
            layout: None,
            seed: None,
        }
    }

    // =========================================================================
    // Graph Operations
    // =========================================================================

    /// Add the directed edge `from -> to`.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&mut self, from: String, to: String) {
        self.graph_mut().add_edge(from, to);
    }

    /// Add edges from an array of `[from, to]` pairs.
    ///
    /// Returns the number of pairs read.
    #[wasm_bindgen(js_name = addEdges)]
    pub fn add_edges(&mut self, pairs: JsValue) -> std::result::Result<u32, JsError> {
        let pairs: Vec<(String, String)> = serde_wasm_bindgen::from_value(pairs)?;
        let count = pairs.len() as u32;
        self.graph_mut().extend(pairs);
        Ok(count)
    }

    /// Get the number of nodes in the graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.size() as u32
    }

    /// Get the number of directed edges in the graph.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Check whether the directed edge `from -> to` exists.
    #[wasm_bindgen(js_name = hasEdge)]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.graph.has_edge(&from.to_owned(), &to.to_owned())
    }

    /// Undirected degree of a node; 0 for unknown ids.
    pub fn neighbors(&self, id: &str) -> u32 {
        self.graph.neighbors(&id.to_owned()) as u32
    }

    /// Targets of the edges leaving a node.
    pub fn children(&self, id: &str) -> Vec<String> {
        self.graph.children(&id.to_owned()).cloned().collect()
    }

    /// Weakly connected components, as arrays of ids.
    pub fn subgraphs(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.components())?)
    }

    /// Edges within `degrees` hops of `id`, as `[from, to]` pairs.
    pub fn vicinity(&self, id: &str, degrees: u32) -> std::result::Result<JsValue, JsError> {
        let pairs = self
            .vicinity_pairs(id, degrees as usize)
            .ok_or_else(|| LayoutError::UnknownNode(id.to_owned()))?;
        Ok(serde_wasm_bindgen::to_value(&pairs)?)
    }

    // =========================================================================
    // Layout Operations
    // =========================================================================

    /// Discard the layout; the next call places every node at random.
    pub fn reset(&mut self) {
        self.seed = None;
        self.layout = None;
    }

    /// Discard the layout; the next call places nodes from `seed`.
    #[wasm_bindgen(js_name = resetWithSeed)]
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
        self.layout = None;
    }

    /// Run one simulation step and return its energy.
    #[wasm_bindgen(js_name = convergeOnce)]
    pub fn converge_once(&mut self, damping: f32, spring_constant: f32) -> f64 {
        self.layout().converge_once(damping, spring_constant)
    }

    /// Run the simulation until it settles or hits the iteration cap.
    ///
    /// `config` is a partial `{ damping, springConstant, targetEnergy,
    /// maxIterations }` object, or `undefined` for the defaults. Returns
    /// `{ iterations, energy, converged }`.
    pub fn converge(&mut self, config: JsValue) -> std::result::Result<JsValue, JsError> {
        let config: ConvergeConfig = if config.is_undefined() || config.is_null() {
            ConvergeConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let report = self.layout().converge(&config)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Rescale all points into the unit square.
    pub fn normalize(&mut self) {
        self.layout().normalize();
    }

    /// Positions as `[x0, y0, x1, y1, ...]` in `nodeIds` order.
    pub fn positions(&mut self) -> Float32Array {
        Float32Array::from(self.position_buffer().as_slice())
    }

    /// Node ids in layout order.
    #[wasm_bindgen(js_name = nodeIds)]
    pub fn node_ids(&mut self) -> Vec<String> {
        self.layout()
            .nodes()
            .map(|point| point.value().clone())
            .collect()
    }

    /// Edges as `[from0, to0, from1, to1, ...]` indices into `nodeIds`.
    #[wasm_bindgen(js_name = edgeIndices)]
    pub fn edge_indices(&mut self) -> Vec<u32> {
        let layout = self.layout();
        let slots: HashMap<&String, u32> = layout
            .nodes()
            .enumerate()
            .map(|(slot, point)| (point.value(), slot as u32))
            .collect();

        layout
            .source()
            .edges()
            .filter_map(|edge| Some([*slots.get(edge.from)?, *slots.get(edge.to)?]))
            .flatten()
            .collect()
    }

    /// Bounding box as `[minX, minY, maxX, maxY]`.
    pub fn bounds(&mut self) -> Option<Vec<f32>> {
        self.layout().bounds().map(|bounds| {
            vec![
                bounds.min.x(),
                bounds.min.y(),
                bounds.max.x(),
                bounds.max.y(),
            ]
        })
    }

    /// Distance between the points of two nodes.
    pub fn distance(&mut self, from: &str, to: &str) -> std::result::Result<f32, JsError> {
        let from = from.to_owned();
        let to = to.to_owned();
        let layout = self.layout();
        for id in [&from, &to] {
            if layout.get(id).is_none() {
                return Err(LayoutError::UnknownNode(id.clone()).into());
            }
        }
        Ok(layout.distance(&from, &to).unwrap_or_default())
    }
}

impl SprawlGraphWasm {
    /// Mutable access to the graph. Drops the layout so no stale positions
    /// survive a change and the `Rc` is unique again.
    fn graph_mut(&mut self) -> &mut AdjacencyList<String> {
        self.layout = None;
        Rc::make_mut(&mut self.graph)
    }

    /// The current layout, built on first use.
    fn layout(&mut self) -> &mut ForceLayout<SharedGraph> {
        let graph = &self.graph;
        let seed = self.seed;
        self.layout.get_or_insert_with(|| match seed {
            Some(seed) => ForceLayout::with_seed(Rc::clone(graph), seed),
            None => ForceLayout::new(Rc::clone(graph)),
        })
    }

    fn position_buffer(&mut self) -> Vec<f32> {
        self.layout()
            .nodes()
            .flat_map(|point| [point.x(), point.y()])
            .collect()
    }

    fn components(&self) -> Vec<Vec<String>> {
        self.graph
            .subgraphs()
            .into_iter()
            .map(|component| component.nodes().cloned().collect())
            .collect()
    }

    fn vicinity_pairs(&self, id: &str, degrees: usize) -> Option<Vec<(String, String)>> {
        let id = self.graph.node(&id.to_owned())?;
        let pairs = self
            .graph
            .vicinity(id, degrees)
            .edges()
            .map(|edge| (edge.from.clone(), edge.to.clone()))
            .collect();
        Some(pairs)
    }
}

impl Default for SprawlGraphWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_wasm_graph() -> SprawlGraphWasm {
        let mut graph = SprawlGraphWasm::new();
        graph.add_edge("a".into(), "b".into());
        graph.add_edge("c".into(), "d".into());
        graph.add_edge("a".into(), "e".into());
        graph
    }

    #[test]
    fn test_graph_queries() {
        let graph = make_wasm_graph();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "a"));
        assert_eq!(graph.neighbors("a"), 2);
        assert_eq!(graph.neighbors("zebra"), 0);
        assert_eq!(graph.children("a"), vec!["b".to_string(), "e".to_string()]);
    }

    #[test]
    fn test_buffers_share_node_order() {
        let mut graph = make_wasm_graph();
        graph.reset_with_seed(3);

        let ids = graph.node_ids();
        assert_eq!(ids.len(), 5);
        assert_eq!(graph.position_buffer().len(), 10);

        let indices = graph.edge_indices();
        assert_eq!(indices.len(), 6);
        let pairs: Vec<(&str, &str)> = indices
            .chunks(2)
            .map(|pair| (ids[pair[0] as usize].as_str(), ids[pair[1] as usize].as_str()))
            .collect();
        assert!(pairs.contains(&("a", "b")));
        assert!(pairs.contains(&("a", "e")));
        assert!(pairs.contains(&("c", "d")));
    }

    #[test]
    fn test_seeded_layouts_repeat() {
        let mut first = make_wasm_graph();
        let mut second = make_wasm_graph();
        first.reset_with_seed(99);
        second.reset_with_seed(99);
        first.converge_once(0.15, 0.2);
        second.converge_once(0.15, 0.2);
        assert_eq!(first.position_buffer(), second.position_buffer());
    }

    #[test]
    fn test_mutation_discards_layout() {
        let mut graph = make_wasm_graph();
        graph.converge_once(0.15, 0.2);
        assert!(graph.layout.is_some());

        graph.add_edge("e".into(), "f".into());
        assert!(graph.layout.is_none());
        assert_eq!(graph.node_ids().len(), 6);
        assert_eq!(Rc::strong_count(&graph.graph), 2);
    }

    #[test]
    fn test_normalize_fills_unit_square() {
        let mut graph = make_wasm_graph();
        graph.reset_with_seed(1);
        for _ in 0..10 {
            graph.converge_once(0.15, 0.2);
        }
        graph.normalize();

        let bounds = graph.bounds().unwrap();
        assert!(bounds[0].abs() < 1e-5 && bounds[1].abs() < 1e-5);
        assert!((bounds[2] - 1.0).abs() < 1e-5 && (bounds[3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_between_known_nodes() {
        let mut graph = make_wasm_graph();
        let distance = graph.distance("a", "b").unwrap();
        assert!(distance > 0.0);
    }

    #[test]
    fn test_empty_graph_has_no_bounds() {
        let mut graph = SprawlGraphWasm::default();
        assert!(graph.bounds().is_none());
        assert_eq!(graph.converge_once(0.5, 0.5), 0.0);
        assert!(graph.node_ids().is_empty());
    }

    #[test]
    fn test_components_and_vicinity() {
        let graph = make_wasm_graph();
        let components = graph.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec!["a", "b", "e"]);
        assert_eq!(components[1], vec!["c", "d"]);

        let pairs = graph.vicinity_pairs("b", 1).unwrap();
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string())]);
        assert!(graph.vicinity_pairs("zebra", 1).is_none());
    }
}
