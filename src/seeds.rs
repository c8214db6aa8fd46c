//! Literal seed weights for the 2-2-1 XOR topology.
//!
//! These fixed values make training runs reproducible: two runs from the same
//! seed, learning rate and pattern order produce bit-identical weights.

use crate::Weights;

/// 2 inputs, 2 hidden neurons, 1 output, no bias.
pub fn xor_plain() -> Weights {
    Weights::from_parts_unchecked(
        2,
        false,
        vec![
            // hidden
            vec![vec![0.62, 0.55], vec![0.42, -0.17]],
            // output
            vec![vec![0.35, 0.81]],
        ],
    )
}

/// Same topology as [`xor_plain`] with a trailing bias weight per neuron.
pub fn xor_biased() -> Weights {
    Weights::from_parts_unchecked(
        2,
        true,
        vec![
            vec![vec![0.62, 0.55, 0.29], vec![0.42, -0.17, 0.10]],
            vec![vec![0.35, 0.81, -0.73]],
        ],
    )
}
