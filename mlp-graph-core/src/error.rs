//! Errors in parsing network descriptors.
use thiserror::Error;

/// Errors raised before any graph node is created.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DescriptorError {
    /// The function signature does not have exactly one input and one output.
    #[error(
        "The function is not compatible with MLP: expected 1 input and 1 output name, got {inputs} and {outputs}"
    )]
    SignatureArity {
        /// Number of input names.
        inputs: usize,
        /// Number of output names.
        outputs: usize,
    },

    /// No separator token after the first token.
    #[error("Separator \"/\" not found after the first token of {0:?}")]
    MissingSeparator(Vec<String>),

    /// A dimension token is not a non-negative integer.
    #[error("Token {token:?} at index {index} is not a non-negative integer")]
    InvalidToken {
        /// Position in the token list.
        index: usize,
        /// The offending token.
        token: String,
    },

    /// A dimension token is zero.
    #[error("Token at index {index} specifies a zero width")]
    ZeroWidth {
        /// Position in the token list.
        index: usize,
    },
}
