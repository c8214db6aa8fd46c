//! Activation function.
//!
//! Every neuron in the network squashes its weighted sum through the logistic
//! sigmoid `1 / (1 + e^-x)`. The backward pass only ever needs the derivative
//! at a point the forward pass already visited, so the derivative is expressed
//! in terms of the cached output `y` rather than the pre-activation sum.

/// Logistic sigmoid.
///
/// Evaluated in the branch that keeps `exp` from overflowing, so very large
/// magnitudes saturate smoothly toward 0 or 1 instead of producing NaN.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Derivative of the sigmoid expressed via its output: `y * (1 - y)`.
#[inline]
pub fn sigmoid_grad_from_output(y: f64) -> f64 {
    y * (1.0 - y)
}
