//! Initializers of the variables of an MLP.
use candle_nn::Init;

/// Default half-width of the uniform range of output layer parameters.
pub const OUTPUT_INIT_RANGE: f64 = 0.001;

/// Initializer of biases of hidden layers.
pub const ZERO_BIAS: Init = Init::Const(0.);

/// Bound `b` of the Xavier (Glorot) uniform distribution `U(-b, b)`.
pub fn xavier_bound(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in as f64 + fan_out as f64)).sqrt()
}

/// Xavier uniform initializer for a weight with the given fans.
pub fn xavier_uniform(fan_in: usize, fan_out: usize) -> Init {
    let b = xavier_bound(fan_in, fan_out);
    Init::Uniform { lo: -b, up: b }
}

/// Uniform initializer on `[-range, range]`.
pub fn small_uniform(range: f64) -> Init {
    Init::Uniform {
        lo: -range,
        up: range,
    }
}
