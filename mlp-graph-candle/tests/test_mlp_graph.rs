use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarMap};
use mlp_graph_candle::{
    DescriptorError, FunctionSignature, GraphStructure, MlpGraph, MlpGraphConfig,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn signature() -> FunctionSignature {
    FunctionSignature::single("state", "action")
}

fn build(vm: &VarMap, params: &[&str]) -> Result<MlpGraph> {
    MlpGraph::build(vm, DType::F32, &Device::Cpu, params, &signature())
}

#[test]
fn test_two_hidden_layers() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp = build(&vm, &["4", "2", "/", "8", "8"])?;

    assert_eq!(mlp.descriptor().io_dim(), &[4, 2]);
    assert_eq!(mlp.descriptor().hidden_dim(), &[8, 8]);
    assert_eq!(mlp.n_hidden_layers(), 2);
    assert_eq!(mlp.input().name(), "state");
    assert_eq!(mlp.input().dims(), &[None, Some(4)]);
    assert_eq!(mlp.output().name(), "action");
    assert_eq!(mlp.output().last_dim(), Some(2));
    assert_eq!(mlp.l_param_list().len(), 6);

    let xs = Tensor::randn(0f32, 1., (10, 4), &Device::Cpu)?;
    assert_eq!(mlp.forward(&xs)?.dims(), &[10, 2]);
    Ok(())
}

#[test]
fn test_single_hidden_layer() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp = build(&vm, &["1", "/", "5"])?;

    assert_eq!(mlp.n_hidden_layers(), 1);
    assert_eq!(mlp.output().last_dim(), Some(1));
    assert_eq!(mlp.l_param_list().len(), 4);

    let xs = Tensor::randn(0f32, 1., (3,), &Device::Cpu)?;
    assert_eq!(mlp.forward(&xs)?.dims(), &[3, 1]);
    Ok(())
}

#[test]
fn test_missing_separator_creates_nothing() {
    init();
    let vm = VarMap::new();
    let err = build(&vm, &["4", "2", "8", "8"]).err().unwrap();

    assert!(matches!(
        err.downcast_ref::<DescriptorError>(),
        Some(DescriptorError::MissingSeparator(_))
    ));
    assert!(vm.all_vars().is_empty());
}

#[test]
fn test_arity_checked_before_tokens() {
    init();
    let vm = VarMap::new();
    let sig = FunctionSignature::new(vec!["state", "goal"], vec!["action"]);

    // The tokens are malformed too, but the signature is reported.
    let err = MlpGraph::build(&vm, DType::F32, &Device::Cpu, &["x"], &sig)
        .err()
        .unwrap();
    assert_eq!(
        err.downcast_ref::<DescriptorError>(),
        Some(&DescriptorError::SignatureArity {
            inputs: 2,
            outputs: 1
        })
    );
    assert!(vm.all_vars().is_empty());
}

#[test]
fn test_last_separator_is_the_split_point() {
    init();
    let vm = VarMap::new();

    // Splitting at the first separator would give io_dim = [4], hidden_dim = [2, /, 8].
    // The last one is used, so the first separator is read as an io dimension.
    let err = build(&vm, &["4", "/", "2", "/", "8"]).err().unwrap();
    assert_eq!(
        err.downcast_ref::<DescriptorError>(),
        Some(&DescriptorError::InvalidToken {
            index: 1,
            token: "/".to_string()
        })
    );
}

#[test]
fn test_parameter_count_and_output_width() -> Result<()> {
    init();
    let vm = VarMap::new();

    for params in [
        vec!["3", "/", "4"],
        vec!["6", "2", "/", "16", "16", "16"],
        vec!["5", "7", "3", "/", "9", "1"],
    ] {
        let mlp = build(&vm, &params)?;
        let desc = mlp.descriptor();
        assert_eq!(mlp.l_param_list().len(), 2 * (desc.hidden_dim().len() + 1));
        assert_eq!(mlp.output().last_dim(), Some(desc.output_dim()));

        let xs = Tensor::zeros((2, desc.input_dim()), DType::F32, &Device::Cpu)?;
        let ys = mlp.forward(&xs)?;
        assert_eq!(ys.dims()[1], desc.output_dim());
    }
    Ok(())
}

#[test]
fn test_builders_share_registry() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp1 = build(&vm, &["4", "2", "/", "8", "8"])?;
    let mlp2 = build(&vm, &["4", "2", "/", "8", "8"])?;

    assert_eq!(mlp1.scope(), "mlp");
    assert_eq!(mlp2.scope(), "mlp_1");
    assert_eq!(vm.all_vars().len(), 12);

    // Each graph owns its own variables.
    assert_eq!(mlp2.l_param_list().len(), 6);
    assert!(mlp2.var_names().iter().all(|n| n.starts_with("mlp_1.")));
    Ok(())
}

#[test]
fn test_learner_and_actor_params_alias() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp = build(&vm, &["2", "/", "3"])?;

    let l = mlp.l_param_list();
    let a = mlp.a_param_list();
    assert_eq!(l.len(), a.len());
    assert!(l.iter().zip(a.iter()).all(|(l, a)| l.as_tensor().id() == a.as_tensor().id()));
    Ok(())
}

#[test]
fn test_without_hidden_layers() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp = build(&vm, &["4", "2", "/"])?;

    assert_eq!(mlp.n_hidden_layers(), 0);
    assert_eq!(mlp.l_param_list().len(), 2);
    assert_eq!(mlp.l_param_list()[0].dims(), &[4, 2]);

    let xs = Tensor::ones((3, 4), DType::F32, &Device::Cpu)?;
    assert_eq!(mlp.forward(&xs)?.dims(), &[3, 2]);
    Ok(())
}

#[test]
fn test_from_config() -> Result<()> {
    init();
    let vm = VarMap::new();
    let config = MlpGraphConfig::new(vec!["3", "1", "/", "16"], signature())
        .dtype(mlp_graph_candle::DType::F64)
        .output_init_range(0.01)
        .scope("critic");
    let mlp = MlpGraph::from_config(&vm, &config)?;

    assert_eq!(mlp.scope(), "critic");
    assert_eq!(mlp.output().dtype(), DType::F64);
    let wo = &mlp.l_param_list()[2];
    assert!(wo.abs()?.flatten_all()?.max(0)?.to_scalar::<f64>()? <= 0.01);
    Ok(())
}

#[test]
fn test_training_step_reduces_loss() -> Result<()> {
    init();
    let vm = VarMap::new();
    let mlp = build(&vm, &["2", "1", "/", "16"])?;
    let params = ParamsAdamW {
        lr: 1e-2,
        weight_decay: 0.0,
        ..ParamsAdamW::default()
    };
    let mut opt = AdamW::new(mlp.l_param_list().to_vec(), params)?;

    let xs = Tensor::randn(0f32, 1., (32, 2), &Device::Cpu)?;
    let target = Tensor::ones((32, 1), DType::F32, &Device::Cpu)?;
    let loss = |mlp: &MlpGraph| -> Result<Tensor> {
        Ok((mlp.forward(&xs)? - &target)?.sqr()?.mean_all()?)
    };

    let loss0 = loss(&mlp)?.to_scalar::<f32>()?;
    for _ in 0..200 {
        let l = loss(&mlp)?;
        opt.backward_step(&l)?;
    }
    let loss1 = loss(&mlp)?.to_scalar::<f32>()?;
    assert!(loss1 < 0.5 * loss0, "loss {} -> {}", loss0, loss1);
    Ok(())
}
