//! ForceLayout - spring/charge simulation over a graph.
//!
//! The layout mirrors every edge of a source graph into its own position
//! graph, a petgraph `StableGraph` whose node weights are [`Point`]s, and
//! keeps one velocity per point in a slot-indexed buffer. Each call to
//! [`ForceLayout::converge_once`] advances the simulation by one step.
//!
//! The source graph is only ever read: it answers `edges()` so that edge
//! direction always matches the caller's graph, while the internal position
//! graph holds both orientations for degree and traversal queries.

use std::collections::HashMap;
use std::ops::Deref;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::config::{ConvergeConfig, ConvergeReport};
use super::point::Point;
use super::vector::Vector;
use crate::error::Result;
use crate::graph::{Edge, Graph};

/// Node identity type of the graph behind a source handle.
type Id<S> = <<S as Deref>::Target as Graph>::Node;

/// Axis-aligned bounding box of the current positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Lower-left corner.
    pub min: Vector,
    /// Upper-right corner.
    pub max: Vector,
}

impl Bounds {
    /// `max - min` per axis.
    pub fn extent(&self) -> Vector {
        self.max - self.min
    }
}

/// Force-directed layout over a read-only source graph.
///
/// `S` is any handle that dereferences to a [`Graph`]: usually `&G`, or an
/// `Rc<G>` when the layout must own its source. Every identity of the source
/// gets exactly one point and one velocity, created together on first sight
/// and never removed.
///
/// Not synchronized; the source must not change while the layout lives,
/// which the shared borrow held in `S` enforces.
pub struct ForceLayout<S>
where
    S: Deref,
    S::Target: Graph,
{
    /// The caller's graph.
    source: S,

    /// Position graph: points as node weights, each source edge in both
    /// directions.
    positions: StableGraph<Point<Id<S>>, (), Directed>,

    /// Map from identity to position graph index.
    index: HashMap<Id<S>, NodeIndex>,

    /// Velocities, indexed by `NodeIndex::index()`.
    velocities: Vec<Vector>,
}

impl<S> ForceLayout<S>
where
    S: Deref,
    S::Target: Graph,
{
    /// Build a layout with random initial positions from the thread RNG.
    pub fn new(source: S) -> Self {
        Self::with_rng(source, &mut rand::rng())
    }

    /// Build a layout whose initial positions are reproducible from `seed`.
    pub fn with_seed(source: S, seed: u64) -> Self {
        Self::with_rng(source, &mut StdRng::seed_from_u64(seed))
    }

    /// Build a layout drawing initial positions from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(source: S, rng: &mut R) -> Self {
        let node_capacity = source.size();
        let mut layout = Self {
            positions: StableGraph::with_capacity(node_capacity, 0),
            index: HashMap::with_capacity(node_capacity),
            velocities: Vec::with_capacity(node_capacity),
            source,
        };

        let edges: Vec<Edge<Id<S>>> = layout.source.edges().map(Edge::cloned).collect();
        for edge in edges {
            let from = layout.register(edge.from, rng);
            let to = layout.register(edge.to, rng);
            layout.positions.update_edge(from, to, ());
            layout.positions.update_edge(to, from, ());
        }

        debug!(
            nodes = layout.positions.node_count(),
            edges = layout.positions.edge_count(),
            "built force layout"
        );
        layout
    }

    fn register<R: Rng + ?Sized>(&mut self, value: Id<S>, rng: &mut R) -> NodeIndex {
        if let Some(&index) = self.index.get(&value) {
            return index;
        }
        let index = self
            .positions
            .add_node(Point::random(value.clone(), rng));
        self.index.insert(value, index);
        self.velocities.push(Vector::ZERO);
        index
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// The graph this layout was built from.
    pub fn source(&self) -> &S::Target {
        &self.source
    }

    /// The point registered for `id`.
    pub fn get(&self, id: &Id<S>) -> Option<&Point<Id<S>>> {
        self.index.get(id).map(|&index| &self.positions[index])
    }

    /// Mutable access to the point registered for `id`.
    pub fn get_mut(&mut self, id: &Id<S>) -> Option<&mut Point<Id<S>>> {
        let index = *self.index.get(id)?;
        Some(&mut self.positions[index])
    }

    /// Current velocity of `id`.
    pub fn velocity(&self, id: &Id<S>) -> Option<Vector> {
        self.index
            .get(id)
            .map(|index| self.velocities[index.index()])
    }

    /// Distance between the points of `from` and `to`.
    pub fn distance(&self, from: &Id<S>, to: &Id<S>) -> Option<f32> {
        Some(self.get(from)?.distance(self.get(to)?))
    }

    /// All points, mutably, in registration order.
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut Point<Id<S>>> {
        self.positions.node_weights_mut()
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation by one step and return its energy.
    ///
    /// Every point's momentum is computed from the positions and velocities
    /// as they stood at the start of the step:
    /// - repulsion from every other point `q`:
    ///   `coulomb_repulsion(p, q, degree(p) * degree(q), 1.0)`
    /// - attraction toward every child `c`: `(c - p) * spring_constant`
    ///
    /// Then `v' = (v + momentum) * damping`, the point moves by `v'`, and the
    /// returned energy is the sum of `|v'|^2`. Damping applies to the sum, so
    /// it both throttles new momentum and decays what is left over.
    ///
    /// The engine never decides when to stop; callers pick an energy
    /// threshold and an iteration cap, or use [`ForceLayout::converge`].
    /// This is O(n^2) in the number of points.
    pub fn converge_once(&mut self, damping: f32, spring_constant: f32) -> f64 {
        let degrees: Vec<f32> = self
            .positions
            .node_indices()
            .map(|index| self.positions.neighbors(index).count() as f32)
            .collect();

        let momenta: Vec<(NodeIndex, Vector)> = self
            .positions
            .node_indices()
            .map(|index| (index, self.momentum(index, &degrees, spring_constant)))
            .collect();

        let mut total_energy = 0.0_f64;
        for (index, momentum) in momenta {
            let slot = index.index();
            let velocity = (self.velocities[slot] + momentum) * damping;
            total_energy += f64::from(velocity.length() * velocity.length());
            self.positions[index].translate(velocity);
            self.velocities[slot] = velocity;
        }

        trace!(total_energy, "converge step");
        total_energy
    }

    fn momentum(&self, index: NodeIndex, degrees: &[f32], spring_constant: f32) -> Vector {
        let point = &self.positions[index];
        let degree = degrees[index.index()];

        let repulsion: Vector = self
            .positions
            .node_indices()
            .filter(|&other| other != index)
            .map(|other| {
                let charge = degrees[other.index()] * degree;
                point.coulomb_repulsion(&self.positions[other], charge, 1.0)
            })
            .sum();

        let attraction: Vector = self
            .positions
            .neighbors(index)
            .map(|child| point.hookes_attraction(&self.positions[child]) * spring_constant)
            .sum();

        repulsion + attraction
    }

    /// Step until the energy drops to `config.target_energy` or
    /// `config.max_iterations` steps have run.
    pub fn converge(&mut self, config: &ConvergeConfig) -> Result<ConvergeReport> {
        config.validate()?;

        let mut iterations = 0;
        let mut energy = 0.0;
        while iterations < config.max_iterations {
            energy = self.converge_once(config.damping, config.spring_constant);
            iterations += 1;
            if energy <= config.target_energy {
                break;
            }
        }

        let converged = energy <= config.target_energy;
        if converged {
            debug!(iterations, energy, "layout converged");
        } else {
            warn!(
                iterations,
                energy,
                target = config.target_energy,
                "layout stopped at the iteration cap"
            );
        }

        Ok(ConvergeReport {
            iterations,
            energy,
            converged,
        })
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Bounding box of all points, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.positions.node_weights();
        let first = points.next()?.position();

        let (mut min_x, mut min_y) = (first.x(), first.y());
        let (mut max_x, mut max_y) = (min_x, min_y);
        for point in points {
            min_x = min_x.min(point.x());
            max_x = max_x.max(point.x());
            min_y = min_y.min(point.y());
            max_y = max_y.max(point.y());
        }

        Some(Bounds {
            min: Vector::new(min_x, min_y),
            max: Vector::new(max_x, max_y),
        })
    }

    /// Lower corner of [`ForceLayout::bounds`].
    pub fn lower_boundary(&self) -> Option<Vector> {
        self.bounds().map(|bounds| bounds.min)
    }

    /// Upper corner of [`ForceLayout::bounds`].
    pub fn upper_boundary(&self) -> Option<Vector> {
        self.bounds().map(|bounds| bounds.max)
    }

    /// Rescale all points into the unit square.
    ///
    /// Translates by `-min` and scales each axis by `1 / extent`
    /// independently, so the aspect ratio is not kept. An axis with no extent
    /// (a single point, or all points aligned) keeps a scale of 1.
    pub fn normalize(&mut self) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let extent = bounds.extent();
        if !has_extent(extent.x()) || !has_extent(extent.y()) {
            warn!(
                width = extent.x(),
                height = extent.y(),
                "degenerate bounding box, leaving flat axis unscaled"
            );
        }

        let scale = Vector::new(axis_scale(extent.x()), axis_scale(extent.y()));
        let centering = -bounds.min;
        for point in self.positions.node_weights_mut() {
            point.translate(centering);
            point.dilate(scale);
        }
    }
}

fn has_extent(extent: f32) -> bool {
    extent > 0.0 && extent.is_finite()
}

fn axis_scale(extent: f32) -> f32 {
    if has_extent(extent) {
        1.0 / extent
    } else {
        1.0
    }
}

impl<S> Graph for ForceLayout<S>
where
    S: Deref,
    S::Target: Graph,
{
    type Node = Point<Id<S>>;

    fn size(&self) -> usize {
        self.positions.node_count()
    }

    fn node(&self, node: &Self::Node) -> Option<&Self::Node> {
        self.get(node.value())
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.positions.node_weights()
    }

    /// Edges of the source graph, expressed over points.
    fn edges(&self) -> impl Iterator<Item = Edge<&Self::Node>> {
        self.source
            .edges()
            .filter_map(|edge| Some(Edge::new(self.get(edge.from)?, self.get(edge.to)?)))
    }

    fn children(&self, node: &Self::Node) -> impl Iterator<Item = &Self::Node> {
        self.index
            .get(node.value())
            .into_iter()
            .flat_map(|&index| self.positions.neighbors(index))
            .map(|child| &self.positions[child])
    }

    fn adjacent(&self, node: &Self::Node) -> impl Iterator<Item = &Self::Node> {
        self.children(node)
    }

    fn has_edge(&self, from: &Self::Node, to: &Self::Node) -> bool {
        match (self.index.get(from.value()), self.index.get(to.value())) {
            (Some(&from), Some(&to)) => self.positions.find_edge(from, to).is_some(),
            _ => false,
        }
    }
}
