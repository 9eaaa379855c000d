//! Names of the inputs and outputs of a function approximator.
use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};

/// Function signature given by the caller of a graph builder.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Default)]
pub struct FunctionSignature {
    /// Names of the input placeholders.
    pub input_names: Vec<String>,

    /// Names of the outputs.
    pub output_names: Vec<String>,
}

impl FunctionSignature {
    /// Creates a signature from input and output names.
    pub fn new<I, O, S, T>(input_names: I, output_names: O) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            input_names: input_names.into_iter().map(Into::into).collect(),
            output_names: output_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Signature with a single input and a single output.
    pub fn single(input_name: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            input_names: vec![input_name.into()],
            output_names: vec![output_name.into()],
        }
    }

    /// Fails unless there is exactly one input and one output name.
    pub fn check_single_io(&self) -> Result<(), DescriptorError> {
        if self.input_names.len() == 1 && self.output_names.len() == 1 {
            Ok(())
        } else {
            Err(DescriptorError::SignatureArity {
                inputs: self.input_names.len(),
                outputs: self.output_names.len(),
            })
        }
    }

    /// Name of the single input.
    pub fn input_name(&self) -> Result<&str, DescriptorError> {
        self.check_single_io()?;
        Ok(&self.input_names[0])
    }

    /// Name of the single output.
    pub fn output_name(&self) -> Result<&str, DescriptorError> {
        self.check_single_io()?;
        Ok(&self.output_names[0])
    }
}
