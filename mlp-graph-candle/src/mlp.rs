//! Multilayer perceptron built from a descriptor.
mod base;
mod config;
pub use base::MlpGraph;
pub use config::MlpGraphConfig;

/// Default prefix of the variable names of an [`MlpGraph`].
pub const DEFAULT_SCOPE: &str = "mlp";
