//! Weight matrix.
//!
//! The network's only mutable state: a ragged `layer -> neuron -> incoming weight`
//! structure. When the network is biased, every neuron carries one extra trailing
//! weight whose input is the constant `1.0`.
//!
//! Shape invariant, checked by every constructor:
//! - neurons in layer 0 have `input_dim (+1 if biased)` weights
//! - neurons in layer `L > 0` have `neurons(L-1) (+1 if biased)` weights
//!
//! The shape is fixed at construction; training only ever mutates values in place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

/// Random initialization scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// Uniform in `[-limit, limit]`.
    Uniform { limit: f64 },
    /// Xavier/Glorot uniform: `limit = sqrt(6 / (fan_in + fan_out))`.
    Xavier,
}

impl Init {
    /// Validate initializer parameters.
    pub fn validate(self) -> Result<()> {
        match self {
            Init::Uniform { limit } => {
                if !(limit.is_finite() && limit > 0.0) {
                    return Err(Error::InvalidConfig(format!(
                        "uniform init limit must be finite and > 0, got {limit}"
                    )));
                }
                Ok(())
            }
            Init::Xavier => Ok(()),
        }
    }

    #[inline]
    fn limit(self, fan_in: usize, fan_out: usize) -> f64 {
        match self {
            Init::Uniform { limit } => limit,
            Init::Xavier => (6.0 / (fan_in + fan_out) as f64).sqrt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    input_dim: usize,
    biased: bool,
    layers: Vec<Vec<Vec<f64>>>,
}

impl Weights {
    /// Build a weight matrix from literal per-neuron weight vectors.
    ///
    /// The raw input dimension is inferred from the first neuron of the first layer.
    /// Biased matrices carry the bias as each neuron's last weight.
    pub fn from_literal(layers: Vec<Vec<Vec<f64>>>, biased: bool) -> Result<Self> {
        let first = layers
            .first()
            .and_then(|layer| layer.first())
            .ok_or_else(|| {
                Error::InvalidShape("weight matrix must have at least one neuron".to_owned())
            })?;

        let bias_slots = usize::from(biased);
        if first.len() <= bias_slots {
            return Err(Error::InvalidShape(format!(
                "first neuron has {} weights, need at least {}",
                first.len(),
                bias_slots + 1
            )));
        }
        let input_dim = first.len() - bias_slots;

        validate_layers(input_dim, biased, &layers)?;

        Ok(Self {
            input_dim,
            biased,
            layers,
        })
    }

    /// Build a weight matrix from a flat vector in `to_flat` order.
    ///
    /// `layer_sizes` lists the neuron count of each layer (input excluded).
    pub fn from_flat(
        input_dim: usize,
        layer_sizes: &[usize],
        biased: bool,
        flat: &[f64],
    ) -> Result<Self> {
        validate_topology(input_dim, layer_sizes)?;

        let expected = count_connections(input_dim, layer_sizes, biased);
        if flat.len() != expected {
            return Err(Error::InvalidShape(format!(
                "flat weights length {} does not match connection count {expected}",
                flat.len()
            )));
        }

        let mut values = flat.iter().copied();
        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut fan_in = input_dim;
        for &size in layer_sizes {
            let width = fan_in + usize::from(biased);
            let layer: Vec<Vec<f64>> = (0..size)
                .map(|_| values.by_ref().take(width).collect())
                .collect();
            layers.push(layer);
            fan_in = size;
        }

        validate_layers(input_dim, biased, &layers)?;

        Ok(Self {
            input_dim,
            biased,
            layers,
        })
    }

    /// Build a randomly initialized matrix with a deterministic seed.
    pub fn with_seed(
        input_dim: usize,
        layer_sizes: &[usize],
        biased: bool,
        init: Init,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(input_dim, layer_sizes, biased, init, &mut rng)
    }

    /// Build a randomly initialized matrix using the provided RNG.
    ///
    /// Bias weights are drawn from the same distribution as the other weights.
    pub fn random<R: Rng + ?Sized>(
        input_dim: usize,
        layer_sizes: &[usize],
        biased: bool,
        init: Init,
        rng: &mut R,
    ) -> Result<Self> {
        validate_topology(input_dim, layer_sizes)?;
        init.validate()?;

        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut fan_in = input_dim;
        for &size in layer_sizes {
            let limit = init.limit(fan_in, size);
            let width = fan_in + usize::from(biased);
            let layer: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..width).map(|_| rng.gen_range(-limit..=limit)).collect())
                .collect();
            layers.push(layer);
            fan_in = size;
        }

        Ok(Self {
            input_dim,
            biased,
            layers,
        })
    }

    pub(crate) fn from_parts_unchecked(
        input_dim: usize,
        biased: bool,
        layers: Vec<Vec<Vec<f64>>>,
    ) -> Self {
        debug_assert!(validate_layers(input_dim, biased, &layers).is_ok());
        Self {
            input_dim,
            biased,
            layers,
        }
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Vec::len)
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_biased(&self) -> bool {
        self.biased
    }

    /// Neuron count per layer, input layer excluded.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }

    /// Total number of trainable weights, bias weights included.
    pub fn connection_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| layer.iter())
            .map(Vec::len)
            .sum()
    }

    #[inline]
    pub fn layers(&self) -> &[Vec<Vec<f64>>] {
        &self.layers
    }

    #[inline]
    pub(crate) fn layers_mut(&mut self) -> &mut [Vec<Vec<f64>>] {
        &mut self.layers
    }

    /// All incoming weights of one neuron (bias last, if biased).
    pub fn neuron(&self, layer: usize, neuron: usize) -> Option<&[f64]> {
        self.layers
            .get(layer)
            .and_then(|l| l.get(neuron))
            .map(Vec::as_slice)
    }

    pub fn weight(&self, layer: usize, neuron: usize, input: usize) -> Option<f64> {
        self.neuron(layer, neuron)
            .and_then(|w| w.get(input))
            .copied()
    }

    /// The trailing bias weight of a neuron, or `None` for unbiased matrices.
    pub fn bias(&self, layer: usize, neuron: usize) -> Option<f64> {
        if !self.biased {
            return None;
        }
        self.neuron(layer, neuron).and_then(|w| w.last()).copied()
    }

    pub fn set_weight(
        &mut self,
        layer: usize,
        neuron: usize,
        input: usize,
        value: f64,
    ) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidData(format!(
                "weight must be finite, got {value}"
            )));
        }
        let slot = self
            .layers
            .get_mut(layer)
            .and_then(|l| l.get_mut(neuron))
            .and_then(|w| w.get_mut(input))
            .ok_or_else(|| {
                Error::InvalidShape(format!(
                    "no weight at layer {layer}, neuron {neuron}, input {input}"
                ))
            })?;
        *slot = value;
        Ok(())
    }

    /// Flatten in layer -> neuron -> input order (bias last per neuron).
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.connection_count());
        for neuron in self.layers.iter().flat_map(|layer| layer.iter()) {
            flat.extend_from_slice(neuron);
        }
        flat
    }

    pub fn is_finite(&self) -> bool {
        self.layers
            .iter()
            .flat_map(|layer| layer.iter())
            .all(|w| w.iter().all(|v| v.is_finite()))
    }
}

fn validate_topology(input_dim: usize, layer_sizes: &[usize]) -> Result<()> {
    if input_dim == 0 {
        return Err(Error::InvalidConfig("input_dim must be > 0".to_owned()));
    }
    if layer_sizes.is_empty() {
        return Err(Error::InvalidConfig(
            "network must have at least one layer".to_owned(),
        ));
    }
    if layer_sizes.contains(&0) {
        return Err(Error::InvalidConfig(
            "all layer sizes must be > 0".to_owned(),
        ));
    }
    Ok(())
}

fn count_connections(input_dim: usize, layer_sizes: &[usize], biased: bool) -> usize {
    let mut total = 0;
    let mut fan_in = input_dim;
    for &size in layer_sizes {
        total += size * (fan_in + usize::from(biased));
        fan_in = size;
    }
    total
}

fn validate_layers(input_dim: usize, biased: bool, layers: &[Vec<Vec<f64>>]) -> Result<()> {
    if layers.is_empty() {
        return Err(Error::InvalidShape(
            "weight matrix must have at least one layer".to_owned(),
        ));
    }

    let mut fan_in = input_dim;
    for (l, layer) in layers.iter().enumerate() {
        if layer.is_empty() {
            return Err(Error::InvalidShape(format!("layer {l} has no neurons")));
        }
        let expected = fan_in + usize::from(biased);
        for (n, weights) in layer.iter().enumerate() {
            if weights.len() != expected {
                return Err(Error::InvalidShape(format!(
                    "layer {l} neuron {n} has {} weights, expected {expected}",
                    weights.len()
                )));
            }
            if weights.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "layer {l} neuron {n} has non-finite weights"
                )));
            }
        }
        fan_in = layer.len();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biased_xor() -> Vec<Vec<Vec<f64>>> {
        vec![
            vec![vec![0.62, 0.55, 0.29], vec![0.42, -0.17, 0.10]],
            vec![vec![0.35, 0.81, -0.73]],
        ]
    }

    #[test]
    fn literal_infers_input_dim_and_counts_connections() {
        let w = Weights::from_literal(biased_xor(), true).unwrap();
        assert_eq!(w.input_dim(), 2);
        assert_eq!(w.output_dim(), 1);
        assert_eq!(w.layer_sizes(), vec![2, 1]);
        assert_eq!(w.connection_count(), 9);
        assert_eq!(w.bias(0, 1), Some(0.10));
        assert_eq!(w.bias(1, 0), Some(-0.73));
        assert_eq!(w.weight(0, 0, 1), Some(0.55));
        assert_eq!(w.weight(2, 0, 0), None);
    }

    #[test]
    fn literal_rejects_fan_in_mismatch() {
        let mut layers = biased_xor();
        layers[1][0].pop();
        let err = Weights::from_literal(layers, true).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));

        // Same literal read as unbiased: the output layer no longer matches.
        let err = Weights::from_literal(biased_xor(), false).unwrap_err();
        assert!(format!("{err}").contains("layer 1"));
    }

    #[test]
    fn literal_rejects_empty_and_non_finite() {
        assert!(Weights::from_literal(vec![], false).is_err());
        assert!(Weights::from_literal(vec![vec![]], false).is_err());
        assert!(Weights::from_literal(vec![vec![vec![f64::NAN]]], false).is_err());
        // A biased neuron needs at least one real input besides the bias.
        assert!(Weights::from_literal(vec![vec![vec![0.5]]], true).is_err());
    }

    #[test]
    fn flat_roundtrip_preserves_order() {
        let w = Weights::from_literal(biased_xor(), true).unwrap();
        let flat = w.to_flat();
        assert_eq!(
            flat,
            vec![0.62, 0.55, 0.29, 0.42, -0.17, 0.10, 0.35, 0.81, -0.73]
        );

        let back = Weights::from_flat(2, &[2, 1], true, &flat).unwrap();
        assert_eq!(back, w);

        assert!(Weights::from_flat(2, &[2, 1], true, &flat[..8]).is_err());
        assert!(Weights::from_flat(2, &[2, 1], false, &flat).is_err());
    }

    #[test]
    fn set_weight_bounds_and_finiteness() {
        let mut w = Weights::from_literal(biased_xor(), true).unwrap();
        w.set_weight(1, 0, 2, 0.5).unwrap();
        assert_eq!(w.bias(1, 0), Some(0.5));

        assert!(w.set_weight(1, 1, 0, 0.0).is_err());
        assert!(w.set_weight(0, 0, 3, 0.0).is_err());
        assert!(w.set_weight(0, 0, 0, f64::INFINITY).is_err());
    }

    #[test]
    fn seeded_init_is_deterministic_and_bounded() {
        let a = Weights::with_seed(2, &[3, 1], true, Init::Xavier, 7).unwrap();
        let b = Weights::with_seed(2, &[3, 1], true, Init::Xavier, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.is_finite());
        assert_eq!(a.connection_count(), 3 * 3 + 4);

        let u = Weights::with_seed(4, &[5, 1], false, Init::Uniform { limit: 0.5 }, 1).unwrap();
        assert!(u.to_flat().iter().all(|v| v.abs() <= 0.5));
        assert_eq!(u.neuron(0, 0).map(<[f64]>::len), Some(4));
    }

    #[test]
    fn random_rejects_bad_topology() {
        assert!(Weights::with_seed(0, &[2, 1], false, Init::Xavier, 0).is_err());
        assert!(Weights::with_seed(2, &[], false, Init::Xavier, 0).is_err());
        assert!(Weights::with_seed(2, &[0, 1], false, Init::Xavier, 0).is_err());
        assert!(Weights::with_seed(2, &[2, 1], false, Init::Uniform { limit: -1.0 }, 0).is_err());
    }
}
