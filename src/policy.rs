//! Weight-update policies.
//!
//! One `Network` type covers all three update rules. The policy is chosen at
//! construction and decides two things: whether every neuron carries a trailing
//! bias weight, and whether the previous weight delta is blended into the new one.

use crate::{Error, Result};

/// Default momentum rate for [`UpdatePolicy::BiasedMomentumDelta`].
pub const DEFAULT_MOMENTUM: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UpdatePolicy {
    /// Delta rule, no bias weights.
    #[default]
    PlainDelta,
    /// Delta rule with a trailing bias weight per neuron (input fixed at `1.0`).
    BiasedDelta,
    /// Biased delta rule plus `momentum * previous_gradient` on every connection.
    BiasedMomentumDelta { momentum: f64 },
}

impl UpdatePolicy {
    /// Biased momentum policy using [`DEFAULT_MOMENTUM`].
    pub fn momentum() -> Self {
        UpdatePolicy::BiasedMomentumDelta {
            momentum: DEFAULT_MOMENTUM,
        }
    }

    pub fn validate(self) -> Result<()> {
        match self {
            UpdatePolicy::PlainDelta | UpdatePolicy::BiasedDelta => Ok(()),
            UpdatePolicy::BiasedMomentumDelta { momentum } => {
                if !(momentum.is_finite() && (0.0..1.0).contains(&momentum)) {
                    return Err(Error::InvalidConfig(format!(
                        "momentum must be finite and in [0,1), got {momentum}"
                    )));
                }
                Ok(())
            }
        }
    }

    #[inline]
    pub fn is_biased(self) -> bool {
        !matches!(self, UpdatePolicy::PlainDelta)
    }

    /// Momentum rate, or `None` for policies without a momentum ledger.
    #[inline]
    pub fn momentum_rate(self) -> Option<f64> {
        match self {
            UpdatePolicy::BiasedMomentumDelta { momentum } => Some(momentum),
            UpdatePolicy::PlainDelta | UpdatePolicy::BiasedDelta => None,
        }
    }
}

/// How the output error reaches the hidden layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorSignal {
    /// Each hidden neuron receives `sum(delta_out * w_out)` from the layer above,
    /// computed with that layer's pre-update weights.
    #[default]
    Backpropagated,
    /// Every hidden neuron receives the raw output error `ideal - actual`
    /// unchanged. Hidden updates become `lr * error * x_j * h_i * (1 - h_i)`.
    Broadcast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_and_momentum_flags() {
        assert!(!UpdatePolicy::PlainDelta.is_biased());
        assert!(UpdatePolicy::BiasedDelta.is_biased());
        assert!(UpdatePolicy::momentum().is_biased());

        assert_eq!(UpdatePolicy::BiasedDelta.momentum_rate(), None);
        assert_eq!(UpdatePolicy::momentum().momentum_rate(), Some(0.30));
    }

    #[test]
    fn momentum_must_be_in_unit_range() {
        let bad = |momentum| UpdatePolicy::BiasedMomentumDelta { momentum }.validate();
        assert!(bad(-0.1).is_err());
        assert!(bad(1.0).is_err());
        assert!(bad(f64::NAN).is_err());
        assert!(bad(0.0).is_ok());
        assert!(bad(0.9).is_ok());
    }
}
