//! Force-directed layout.
//!
//! [`ForceLayout`] places every node of a [`Graph`](crate::graph::Graph) as a
//! [`Point`] and moves the points under spring attraction along edges and
//! charge repulsion between all pairs. Positions are plain `f32` pairs ready
//! to be copied into a renderer's buffers.

mod config;
mod force;
mod point;
mod vector;

pub use config::{ConvergeConfig, ConvergeReport};
pub use force::{Bounds, ForceLayout};
pub use point::Point;
pub use vector::Vector;
