#![warn(missing_docs)]
//! Function approximators built with [candle](https://crates.io/crates/candle-core)
//! from string-encoded architecture descriptors.
pub mod error;
pub mod graph;
pub mod init;
pub mod mlp;
pub use error::MlpGraphError;
pub use graph::{GraphStructure, TensorHandle};
pub use mlp::{MlpGraph, MlpGraphConfig};
pub use mlp_graph_core::{ArchitectureConfig, DescriptorError, FunctionSignature, MlpDescriptor};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Eq)]
/// Data type of the variables of a graph.
///
/// Serializable counterpart of the floating point variants of [`candle_core::DType`].
pub enum DType {
    /// 16-bit brain floating point.
    BF16,

    /// 16-bit floating point.
    F16,

    /// 32-bit floating point.
    F32,

    /// 64-bit floating point.
    F64,
}

impl Default for DType {
    fn default() -> Self {
        Self::F32
    }
}

impl From<DType> for candle_core::DType {
    fn from(dtype: DType) -> Self {
        match dtype {
            DType::BF16 => candle_core::DType::BF16,
            DType::F16 => candle_core::DType::F16,
            DType::F32 => candle_core::DType::F32,
            DType::F64 => candle_core::DType::F64,
        }
    }
}
