//! A small backpropagation crate.
//!
//! `rust-backprop` is a from-scratch feedforward sigmoid network trained one sample
//! at a time by the delta rule. No tensors, no autodiff: the forward pass, the
//! local gradients and the weight updates are written out by hand.
//!
//! # Update policies
//!
//! One [`Network`] type, three update rules selected by [`UpdatePolicy`]:
//!
//! - `PlainDelta`: no bias weights.
//! - `BiasedDelta`: each neuron carries a trailing weight on a constant `1.0` input.
//! - `BiasedMomentumDelta`: biased, plus a fraction of each connection's previous
//!   delta added to its new delta.
//!
//! # Panics vs `Result`
//!
//! - Low-level per-sample path (panics on misuse):
//!   [`Network::forward`], [`Network::backward`], [`Network::train_sample`].
//!   Shape mismatches and an out-of-step [`TraceBuffer`] are programmer errors.
//! - High-level APIs (validated, return [`Result`]):
//!   [`Network::predict`], [`Network::train`], [`Network::train_with`],
//!   [`Network::epochs`], [`Network::train_epoch`], [`Network::evaluate`].
//!
//! Running out of epochs is not an error: the report says
//! [`TrainState::Exhausted`] instead of [`TrainState::Converged`].
//!
//! # Quick start
//!
//! ```rust
//! use rust_backprop::{data, seeds, Network, TrainConfig, TrainState, UpdatePolicy};
//!
//! # fn main() -> rust_backprop::Result<()> {
//! let mut net = Network::new(seeds::xor_biased(), UpdatePolicy::momentum())?;
//!
//! let report = net.train(
//!     &data::xor(),
//!     TrainConfig {
//!         learning_rate: 0.25,
//!         tolerance: 0.01,
//!         max_epochs: 5_000,
//!     },
//! )?;
//! assert_eq!(report.state, TrainState::Converged);
//!
//! let y = net.predict(&[1.0, 0.0])?;
//! assert!(y > 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving samples by hand
//!
//! ```rust
//! use rust_backprop::{seeds, Network, UpdatePolicy};
//!
//! # fn main() -> rust_backprop::Result<()> {
//! let mut net = Network::new(seeds::xor_plain(), UpdatePolicy::PlainDelta)?;
//! let mut trace = net.trace_buffer();
//!
//! let x = [0.0, 1.0];
//! let y = net.forward(&x, &mut trace);
//! assert_eq!(trace.len(), 1);
//!
//! let error = net.backward(&x, 0.0, y, &mut trace, 0.25);
//! assert!(trace.is_empty());
//! assert!(error < 0.0);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod data;
pub mod error;
pub mod network;
pub mod policy;
pub mod seeds;
pub mod trace;
pub mod train;
pub mod weights;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use data::PatternSet;
pub use error::{Error, Result};
pub use network::Network;
pub use policy::{ErrorSignal, UpdatePolicy, DEFAULT_MOMENTUM};
pub use trace::TraceBuffer;
pub use train::{
    EpochReport, Epochs, EvalReport, Prediction, TrainConfig, TrainReport, TrainState,
};
pub use weights::{Init, Weights};
