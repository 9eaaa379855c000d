use super::DEFAULT_SCOPE;
use crate::{init::OUTPUT_INIT_RANGE, DType, Device};
use anyhow::Result;
use mlp_graph_core::{ArchitectureConfig, FunctionSignature};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn default_output_init_range() -> f64 {
    OUTPUT_INIT_RANGE
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`MlpGraph`](super::MlpGraph).
pub struct MlpGraphConfig {
    pub(super) architecture: ArchitectureConfig,

    #[serde(default)]
    pub(super) dtype: DType,

    #[serde(default)]
    pub(super) device: Device,

    #[serde(default = "default_output_init_range")]
    pub(super) output_init_range: f64,

    #[serde(default = "default_scope")]
    pub(super) scope: String,
}

impl Default for MlpGraphConfig {
    fn default() -> Self {
        Self {
            architecture: ArchitectureConfig::default(),
            dtype: DType::default(),
            device: Device::default(),
            output_init_range: OUTPUT_INIT_RANGE,
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl MlpGraphConfig {
    /// Creates a configuration from descriptor tokens and a signature.
    pub fn new<S: Into<String>>(
        params: impl IntoIterator<Item = S>,
        signature: FunctionSignature,
    ) -> Self {
        Self::default().architecture(
            ArchitectureConfig::default()
                .params(params)
                .signature(signature),
        )
    }

    /// Sets the descriptor tokens and the signature.
    pub fn architecture(mut self, v: ArchitectureConfig) -> Self {
        self.architecture = v;
        self
    }

    /// Sets the data type of the variables.
    pub fn dtype(mut self, v: DType) -> Self {
        self.dtype = v;
        self
    }

    /// Sets the device on which the variables are allocated.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Sets the half-width of the uniform range of output layer parameters.
    pub fn output_init_range(mut self, v: f64) -> Self {
        self.output_init_range = v;
        self
    }

    /// Sets the prefix of variable names.
    pub fn scope(mut self, v: impl Into<String>) -> Self {
        self.scope = v.into();
        self
    }

    /// Constructs [`MlpGraphConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MlpGraphConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
