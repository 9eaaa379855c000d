//! Bookkeeping shared by graph structures.
use crate::error::MlpGraphError;
use anyhow::Result;
use candle_core::{DType, Tensor, Var};
use candle_nn::VarMap;
use std::fmt;

/// Named tensor endpoint of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorHandle {
    name: String,
    dims: Vec<Option<usize>>,
    dtype: DType,
}

impl TensorHandle {
    /// Handle of a rank-2 tensor with a dynamic batch dimension.
    pub fn batched(name: impl Into<String>, width: usize, dtype: DType) -> Self {
        Self {
            name: name.into(),
            dims: vec![None, Some(width)],
            dtype,
        }
    }

    /// Name of the tensor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimensions of the tensor; `None` is a dimension known only at run time.
    pub fn dims(&self) -> &[Option<usize>] {
        &self.dims
    }

    /// Size of the last dimension.
    pub fn last_dim(&self) -> Option<usize> {
        self.dims.last().copied().flatten()
    }

    /// Data type of the tensor.
    pub fn dtype(&self) -> DType {
        self.dtype
    }
}

impl fmt::Display for TensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|d| match d {
                Some(d) => d.to_string(),
                None => "-1".to_string(),
            })
            .collect();
        write!(f, "{}[{}]: {:?}", self.name, dims.join(", "), self.dtype)
    }
}

/// A function approximator built on a shared [`VarMap`].
///
/// Variables created by a graph are registered in the [`VarMap`] given at
/// construction, so every graph built on the same map is visible through
/// [`VarMap::all_vars`].
pub trait GraphStructure {
    /// Input endpoint.
    fn input(&self) -> &TensorHandle;

    /// Output endpoint.
    fn output(&self) -> &TensorHandle;

    /// Parameters updated by the learner, in creation order.
    fn l_param_list(&self) -> &[Var];

    /// Parameters of the actor, in creation order.
    fn a_param_list(&self) -> &[Var];

    /// Computes the output for a batch of inputs.
    fn forward(&self, xs: &Tensor) -> Result<Tensor>;
}

/// Returns the first of `base`, `base_1`, `base_2`, ... not yet used as a
/// variable name prefix in `varmap`.
pub fn unique_scope(varmap: &VarMap, base: &str) -> Result<String> {
    let data = varmap
        .data()
        .lock()
        .map_err(|_| MlpGraphError::PoisonedRegistry)?;
    let taken = |scope: &str| {
        let prefix = format!("{}.", scope);
        data.keys().any(|k| k.starts_with(&prefix))
    };

    let mut scope = base.to_string();
    let mut i = 0;
    while taken(&scope) {
        i += 1;
        scope = format!("{}_{}", base, i);
    }
    Ok(scope)
}

/// Returns variables of `varmap` in the order of `names`.
pub fn collect_vars(varmap: &VarMap, names: &[String]) -> Result<Vec<Var>> {
    let data = varmap
        .data()
        .lock()
        .map_err(|_| MlpGraphError::PoisonedRegistry)?;

    names
        .iter()
        .map(|name| {
            data.get(name)
                .cloned()
                .ok_or_else(|| anyhow::Error::from(MlpGraphError::MissingVariable(name.clone())))
        })
        .collect()
}
