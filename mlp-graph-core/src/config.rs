//! Configuration of a function approximator architecture.
use crate::{descriptor::MlpDescriptor, error::DescriptorError, signature::FunctionSignature};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Parameter tokens and function signature from which a graph is built.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Default)]
pub struct ArchitectureConfig {
    /// Tokens of the descriptor, e.g. `["4", "2", "/", "64", "64"]`.
    pub params: Vec<String>,

    /// Names of the inputs and outputs.
    pub signature: FunctionSignature,
}

impl ArchitectureConfig {
    /// Sets the descriptor tokens.
    pub fn params<S: Into<String>>(mut self, v: impl IntoIterator<Item = S>) -> Self {
        self.params = v.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the descriptor tokens from a whitespace-separated string.
    pub fn params_str(mut self, v: &str) -> Self {
        self.params = v.split_whitespace().map(String::from).collect();
        self
    }

    /// Sets the function signature.
    pub fn signature(mut self, v: FunctionSignature) -> Self {
        self.signature = v;
        self
    }

    /// Checks the signature and parses the descriptor tokens.
    pub fn descriptor(&self) -> Result<MlpDescriptor, DescriptorError> {
        self.signature.check_single_io()?;
        MlpDescriptor::parse(&self.params)
    }

    /// Constructs [`ArchitectureConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ArchitectureConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
