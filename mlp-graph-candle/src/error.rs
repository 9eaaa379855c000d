//! Errors raised while building or running a graph.
use thiserror::Error;

/// Errors of graph construction and forward computation.
///
/// Failures of the descriptor itself are reported as
/// [`DescriptorError`](mlp_graph_core::DescriptorError).
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum MlpGraphError {
    /// The input cannot be flattened into rows of the input width.
    #[error("Cannot reshape {elem_count} elements into rows of width {width}")]
    Reshape {
        /// Number of elements of the input.
        elem_count: usize,
        /// Input width of the graph.
        width: usize,
    },

    /// A variable of a layer is too large to be allocated.
    #[error("Weight of {name} ({in_dim} -> {out_dim}) exceeds the addressable size")]
    LayerTooLarge {
        /// Name of the layer within the scope.
        name: String,
        /// Input width of the layer.
        in_dim: usize,
        /// Output width of the layer.
        out_dim: usize,
    },

    /// A variable expected in the registry was not found.
    #[error("Variable {0} is not registered")]
    MissingVariable(String),

    /// The variable registry is unusable after a panic in another thread.
    #[error("Variable registry lock is poisoned")]
    PoisonedRegistry,
}
