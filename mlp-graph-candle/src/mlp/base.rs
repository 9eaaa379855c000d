use super::{MlpGraphConfig, DEFAULT_SCOPE};
use crate::{
    error::MlpGraphError,
    graph::{collect_vars, unique_scope, GraphStructure, TensorHandle},
    init::{small_uniform, xavier_uniform, OUTPUT_INIT_RANGE, ZERO_BIAS},
};
use anyhow::Result;
use candle_core::{DType, Device, Module, Tensor, Var};
use candle_nn::{Linear, VarBuilder, VarMap};
use log::{info, trace};
use mlp_graph_core::{FunctionSignature, MlpDescriptor};
use std::convert::TryInto;

/// Fails if a weight or bias of some layer does not fit in memory addressable by `isize`.
fn check_layer_sizes(descriptor: &MlpDescriptor, dtype: DType) -> Result<(), MlpGraphError> {
    let n_hidden = descriptor.hidden_dim().len();
    for (n, (in_dim, out_dim)) in descriptor.layer_shapes().into_iter().enumerate() {
        let name = if n < n_hidden {
            format!("hidden_layer{}", n)
        } else {
            "output_layer".to_string()
        };
        let fits = in_dim
            .checked_mul(out_dim)
            .and_then(|c| c.checked_mul(dtype.size_in_bytes()))
            .map_or(false, |bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(MlpGraphError::LayerTooLarge {
                name,
                in_dim,
                out_dim,
            });
        }
    }
    Ok(())
}

/// Multilayer perceptron with ReLU hidden layers and an affine output layer.
///
/// Hidden weights are initialized with Xavier uniform and hidden biases with
/// zeros. The weight and bias of the output layer are drawn from a small
/// uniform range. Variables are registered in the [`VarMap`] given to
/// [`MlpGraph::build`] under a scope unique within that map:
///
/// ```text
/// mlp.hidden_layer0.weight  [hidden_dim[0], io_dim[0]]
/// mlp.hidden_layer0.bias    [hidden_dim[0]]
/// ...
/// mlp.output_layer.weight   [hidden_dim[last], io_dim[last]]
/// mlp.output_layer.bias     [io_dim[last]]
/// ```
pub struct MlpGraph {
    scope: String,
    descriptor: MlpDescriptor,
    dtype: DType,
    device: Device,
    input: TensorHandle,
    output: TensorHandle,
    hidden: Vec<Linear>,
    wo: Tensor,
    bo: Tensor,
    var_names: Vec<String>,
    params: Vec<Var>,
}

impl MlpGraph {
    /// Builds an MLP from descriptor tokens.
    ///
    /// The signature must have exactly one input and one output name. It is
    /// checked before the tokens are parsed, and the tokens are parsed before
    /// any variable is created, so a failed build leaves `varmap` untouched.
    pub fn build<S: AsRef<str>>(
        varmap: &VarMap,
        dtype: DType,
        device: &Device,
        params: &[S],
        signature: &FunctionSignature,
    ) -> Result<Self> {
        Self::build_in_scope(
            varmap,
            dtype,
            device,
            params,
            signature,
            DEFAULT_SCOPE,
            OUTPUT_INIT_RANGE,
        )
    }

    /// Builds an MLP from [`MlpGraphConfig`].
    pub fn from_config(varmap: &VarMap, config: &MlpGraphConfig) -> Result<Self> {
        let device: Device = config.device.try_into()?;
        Self::build_in_scope(
            varmap,
            config.dtype.into(),
            &device,
            &config.architecture.params,
            &config.architecture.signature,
            &config.scope,
            config.output_init_range,
        )
    }

    fn build_in_scope<S: AsRef<str>>(
        varmap: &VarMap,
        dtype: DType,
        device: &Device,
        params: &[S],
        signature: &FunctionSignature,
        base_scope: &str,
        output_init_range: f64,
    ) -> Result<Self> {
        signature.check_single_io()?;
        let descriptor = MlpDescriptor::parse(params)?;
        check_layer_sizes(&descriptor, dtype)?;

        let scope = unique_scope(varmap, base_scope)?;
        let vb = VarBuilder::from_varmap(varmap, dtype, device).pp(&scope);
        let mut var_names = Vec::with_capacity(descriptor.n_trainable_params());

        let input = TensorHandle::batched(&signature.input_names[0], descriptor.input_dim(), dtype);

        let mut in_dim = descriptor.input_dim();
        let mut hidden = Vec::with_capacity(descriptor.hidden_dim().len());
        for (n, &out_dim) in descriptor.hidden_dim().iter().enumerate() {
            let layer = format!("hidden_layer{}", n);
            let vb = vb.pp(&layer);
            let w = vb.get_with_hints((out_dim, in_dim), "weight", xavier_uniform(in_dim, out_dim))?;
            let b = vb.get_with_hints(out_dim, "bias", ZERO_BIAS)?;
            trace!("{}.{}: {} -> {}, relu", scope, layer, in_dim, out_dim);

            var_names.push(format!("{}.{}.weight", scope, layer));
            var_names.push(format!("{}.{}.bias", scope, layer));
            hidden.push(Linear::new(w, Some(b)));
            in_dim = out_dim;
        }

        let out_dim = descriptor.output_dim();
        let (wo, bo) = {
            let vb = vb.pp("output_layer");
            let init = small_uniform(output_init_range);
            let wo = vb.get_with_hints((in_dim, out_dim), "weight", init)?;
            let bo = vb.get_with_hints(out_dim, "bias", init)?;
            (wo, bo)
        };
        trace!("{}.output_layer: {} -> {}", scope, in_dim, out_dim);
        var_names.push(format!("{}.output_layer.weight", scope));
        var_names.push(format!("{}.output_layer.bias", scope));

        let output = TensorHandle::batched(&signature.output_names[0], out_dim, dtype);
        let params = collect_vars(varmap, &var_names)?;
        info!(
            "Built MLP {} in scope {} with {} trainable tensors: {} -> {}",
            descriptor,
            scope,
            params.len(),
            input,
            output
        );

        Ok(Self {
            scope,
            descriptor,
            dtype,
            device: device.clone(),
            input,
            output,
            hidden,
            wo,
            bo,
            var_names,
            params,
        })
    }

    /// Prefix of the variable names of this graph.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Parsed layer dimensions.
    pub fn descriptor(&self) -> &MlpDescriptor {
        &self.descriptor
    }

    /// Number of hidden layers.
    pub fn n_hidden_layers(&self) -> usize {
        self.hidden.len()
    }

    /// Names of the trainable variables in creation order.
    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    /// Flattens `xs` into rows of the input width.
    fn reshape_input(&self, xs: &Tensor) -> Result<Tensor> {
        let width = self.descriptor.input_dim();
        let elem_count = xs.elem_count();
        if elem_count % width != 0 {
            return Err(MlpGraphError::Reshape { elem_count, width }.into());
        }
        Ok(xs.reshape((elem_count / width, width))?)
    }
}

impl GraphStructure for MlpGraph {
    fn input(&self) -> &TensorHandle {
        &self.input
    }

    fn output(&self) -> &TensorHandle {
        &self.output
    }

    fn l_param_list(&self) -> &[Var] {
        &self.params
    }

    fn a_param_list(&self) -> &[Var] {
        &self.params
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = xs.to_device(&self.device)?.to_dtype(self.dtype)?;
        let mut xs = self.reshape_input(&xs)?;

        for layer in self.hidden.iter() {
            xs = layer.forward(&xs)?.relu()?;
        }

        let ys = xs.matmul(&self.wo)?.broadcast_add(&self.bo)?;
        Ok(ys.copy()?)
    }
}
