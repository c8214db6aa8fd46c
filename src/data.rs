//! Training pattern sets.
//!
//! A `PatternSet` is a fixed, ordered collection of `(input vector, ideal scalar)`
//! pairs. Inputs are stored contiguously in row-major layout; the training loop
//! visits patterns in storage order every epoch, which keeps runs deterministic.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct PatternSet {
    inputs: Vec<f64>,
    ideals: Vec<f64>,
    input_dim: usize,
}

impl PatternSet {
    /// Build a pattern set from a flat input buffer with shape `(len, input_dim)`.
    pub fn from_flat(inputs: Vec<f64>, ideals: Vec<f64>, input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidData("input_dim must be > 0".to_owned()));
        }
        if ideals.is_empty() {
            return Err(Error::InvalidData(
                "pattern set must not be empty".to_owned(),
            ));
        }
        if inputs.len() != ideals.len() * input_dim {
            return Err(Error::InvalidData(format!(
                "inputs length {} does not match len * input_dim ({} * {input_dim})",
                inputs.len(),
                ideals.len()
            )));
        }
        if inputs.iter().chain(&ideals).any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "patterns must contain only finite values".to_owned(),
            ));
        }

        Ok(Self {
            inputs,
            ideals,
            input_dim,
        })
    }

    /// Build a pattern set from per-pattern rows.
    pub fn from_rows(inputs: &[Vec<f64>], ideals: &[f64]) -> Result<Self> {
        if inputs.len() != ideals.len() {
            return Err(Error::InvalidData(format!(
                "inputs/ideals length mismatch: {} vs {}",
                inputs.len(),
                ideals.len()
            )));
        }

        let input_dim = inputs.first().map_or(0, Vec::len);
        for (i, row) in inputs.iter().enumerate() {
            if row.len() != input_dim {
                return Err(Error::InvalidData(format!(
                    "input row {i} has len {}, expected {input_dim}",
                    row.len()
                )));
            }
        }

        Self::from_flat(inputs.concat(), ideals.to_vec(), input_dim)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ideals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ideals.is_empty()
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns the `idx`-th input row.
    ///
    /// Panics if `idx >= len`.
    #[inline]
    pub fn input(&self, idx: usize) -> &[f64] {
        let start = idx * self.input_dim;
        &self.inputs[start..start + self.input_dim]
    }

    /// Returns the `idx`-th ideal output.
    ///
    /// Panics if `idx >= len`.
    #[inline]
    pub fn ideal(&self, idx: usize) -> f64 {
        self.ideals[idx]
    }

    /// Patterns in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        self.inputs
            .chunks_exact(self.input_dim)
            .zip(self.ideals.iter().copied())
    }
}

/// The four canonical XOR patterns.
pub fn xor() -> PatternSet {
    PatternSet {
        inputs: vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0],
        ideals: vec![0.0, 1.0, 1.0, 0.0],
        input_dim: 2,
    }
}

/// Reduced two-pattern set `{(0,1) -> 0, (1,1) -> 1}`.
pub fn xor_reduced() -> PatternSet {
    PatternSet {
        inputs: vec![0.0, 1.0, 1.0, 1.0],
        ideals: vec![0.0, 1.0],
        input_dim: 2,
    }
}
