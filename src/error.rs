//! Error types for layout operations.

use thiserror::Error;

/// Errors that can occur while driving a layout.
///
/// Lookups on the core types return `Option`; this type is for the layers
/// that need to report *why* (the convergence driver and the WASM module).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An identity that was never added to the graph.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Simulation parameters the driver cannot run with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
