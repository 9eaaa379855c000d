//! Layer dimensions encoded as a list of string tokens.
//!
//! A descriptor looks like `4 2 / 64 64`: the tokens before the separator are
//! the input/output dimensions and the tokens after it are the widths of the
//! hidden layers.
use crate::error::DescriptorError;
use log::trace;
use std::{fmt, str::FromStr};

/// Token splitting input/output dimensions from hidden layer widths.
pub const SEPARATOR: &str = "/";

/// Returns the absolute index of the separator in `tokens`.
///
/// The first token is never taken as a separator. If more than one separator
/// follows it, the last one is returned.
pub fn separator_position<S: AsRef<str>>(tokens: &[S]) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, t)| t.as_ref() == SEPARATOR)
        .map(|(i, _)| i)
        .last()
}

fn parse_dims<S: AsRef<str>>(tokens: &[S], offset: usize) -> Result<Vec<usize>, DescriptorError> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let index = offset + i;
            let token = t.as_ref();
            match token.parse::<usize>() {
                Ok(0) => Err(DescriptorError::ZeroWidth { index }),
                Ok(d) => Ok(d),
                Err(_) => Err(DescriptorError::InvalidToken {
                    index,
                    token: token.to_string(),
                }),
            }
        })
        .collect()
}

/// Dimensions of a multilayer perceptron.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MlpDescriptor {
    io_dim: Vec<usize>,
    hidden_dim: Vec<usize>,
}

impl MlpDescriptor {
    /// Parses a token list.
    ///
    /// `io_dim` is taken from the tokens before the separator and `hidden_dim`
    /// from the tokens after it. An empty `hidden_dim` is accepted; the output
    /// layer is then fed directly from the input.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, DescriptorError> {
        let sep = separator_position(tokens).ok_or_else(|| {
            DescriptorError::MissingSeparator(
                tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            )
        })?;
        let io_dim = parse_dims(&tokens[..sep], 0)?;
        let hidden_dim = parse_dims(&tokens[sep + 1..], sep + 1)?;
        trace!("Parsed descriptor: io_dim = {:?}, hidden_dim = {:?}", io_dim, hidden_dim);

        Ok(Self { io_dim, hidden_dim })
    }

    /// Input and output dimensions.
    pub fn io_dim(&self) -> &[usize] {
        &self.io_dim
    }

    /// Widths of hidden layers in order.
    pub fn hidden_dim(&self) -> &[usize] {
        &self.hidden_dim
    }

    /// Width of the flattened input.
    pub fn input_dim(&self) -> usize {
        self.io_dim[0]
    }

    /// Width of the output.
    pub fn output_dim(&self) -> usize {
        self.io_dim[self.io_dim.len() - 1]
    }

    /// Width feeding the output layer.
    pub fn last_hidden_dim(&self) -> usize {
        self.hidden_dim.last().copied().unwrap_or_else(|| self.input_dim())
    }

    /// Number of weight and bias tensors of the network.
    pub fn n_trainable_params(&self) -> usize {
        2 * (self.hidden_dim.len() + 1)
    }

    /// `(in, out)` pairs of every affine layer, the output layer included.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut in_dim = self.input_dim();
        let mut shapes: Vec<(usize, usize)> = self
            .hidden_dim
            .iter()
            .map(|&out_dim| {
                let pair = (in_dim, out_dim);
                in_dim = out_dim;
                pair
            })
            .collect();
        shapes.push((in_dim, self.output_dim()));
        shapes
    }

    /// Tokens of the descriptor in canonical form.
    pub fn tokens(&self) -> Vec<String> {
        self.io_dim
            .iter()
            .map(|d| d.to_string())
            .chain(std::iter::once(SEPARATOR.to_string()))
            .chain(self.hidden_dim.iter().map(|d| d.to_string()))
            .collect()
    }
}

impl FromStr for MlpDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        Self::parse(&tokens)
    }
}

impl fmt::Display for MlpDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" "))
    }
}
