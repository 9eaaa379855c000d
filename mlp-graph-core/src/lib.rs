#![warn(missing_docs)]
//! Parsing of string-encoded network architecture descriptors.
//!
//! This crate does not depend on any tensor library. Graph builders take
//! a [`FunctionSignature`] and a list of parameter tokens, and use
//! [`MlpDescriptor`] to obtain the layer dimensions.
mod config;
pub mod descriptor;
pub mod error;
mod signature;
pub use config::ArchitectureConfig;
pub use descriptor::{separator_position, MlpDescriptor, SEPARATOR};
pub use error::DescriptorError;
pub use signature::FunctionSignature;
