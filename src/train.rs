//! Training loop and convergence control.
//!
//! A run starts `Running` and ends in exactly one terminal state:
//! - `Converged`: an epoch's MSE fell to the configured tolerance
//! - `Exhausted`: the epoch budget ran out first
//! - `Stopped`: the caller asked to stop between epochs
//!
//! Every epoch visits the patterns in storage order, so runs from identical
//! weights and configuration are bit-for-bit reproducible.

use std::ops::ControlFlow;

use tracing::{debug, info, warn};

use crate::{Error, Network, PatternSet, Result, TraceBuffer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub learning_rate: f64,
    /// Convergence threshold on per-epoch MSE (inclusive).
    pub tolerance: f64,
    pub max_epochs: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.25,
            tolerance: 0.01,
            max_epochs: 10_000,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        validate_learning_rate(self.learning_rate)?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_epochs == 0 {
            return Err(Error::InvalidConfig("max_epochs must be > 0".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainState {
    Running,
    Converged,
    Exhausted,
    Stopped,
}

impl TrainState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, TrainState::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    pub mse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainReport {
    pub state: TrainState,
    pub epochs: usize,
    /// MSE of the last completed epoch (NaN if none ran).
    pub final_mse: f64,
}

impl TrainReport {
    #[inline]
    pub fn converged(&self) -> bool {
        self.state == TrainState::Converged
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub actual: f64,
    pub ideal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub mse: f64,
    /// One entry per pattern, in pattern order.
    pub predictions: Vec<Prediction>,
}

/// Epoch-by-epoch training driver.
///
/// Each call to `next` runs one full epoch and yields its report. The iterator
/// ends once the run reaches a terminal state.
#[derive(Debug)]
pub struct Epochs<'a> {
    network: &'a mut Network,
    patterns: &'a PatternSet,
    cfg: TrainConfig,
    trace: TraceBuffer,
    state: TrainState,
    epoch: usize,
    last_mse: f64,
}

impl Epochs<'_> {
    #[inline]
    pub fn state(&self) -> TrainState {
        self.state
    }

    /// Number of completed epochs.
    #[inline]
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Stop a running loop before its next epoch.
    pub fn stop(&mut self) {
        if self.state == TrainState::Running {
            self.state = TrainState::Stopped;
            warn!(epoch = self.epoch, mse = self.last_mse, "training stopped by caller");
        }
    }

    pub fn into_report(self) -> TrainReport {
        TrainReport {
            state: self.state,
            epochs: self.epoch,
            final_mse: self.last_mse,
        }
    }
}

impl Iterator for Epochs<'_> {
    type Item = EpochReport;

    fn next(&mut self) -> Option<EpochReport> {
        if self.state.is_terminal() {
            return None;
        }

        self.epoch += 1;
        let mse = self
            .network
            .run_epoch(self.patterns, self.cfg.learning_rate, &mut self.trace);
        self.last_mse = mse;
        debug!(epoch = self.epoch, mse, "epoch complete");

        if mse <= self.cfg.tolerance {
            self.state = TrainState::Converged;
            info!(epochs = self.epoch, mse, "training converged");
        } else if self.epoch >= self.cfg.max_epochs {
            self.state = TrainState::Exhausted;
            warn!(
                epochs = self.epoch,
                mse,
                tolerance = self.cfg.tolerance,
                "epoch budget exhausted before convergence"
            );
        }

        Some(EpochReport {
            epoch: self.epoch,
            mse,
        })
    }
}

impl Network {
    /// Start an epoch-by-epoch training run.
    ///
    /// Configuration and pattern shapes are validated before any weight moves.
    pub fn epochs<'a>(
        &'a mut self,
        patterns: &'a PatternSet,
        cfg: TrainConfig,
    ) -> Result<Epochs<'a>> {
        cfg.validate()?;
        self.check_patterns(patterns)?;

        let trace = self.trace_buffer();
        Ok(Epochs {
            network: self,
            patterns,
            cfg,
            trace,
            state: TrainState::Running,
            epoch: 0,
            last_mse: f64::NAN,
        })
    }

    /// Train until convergence or until the epoch budget runs out.
    pub fn train(&mut self, patterns: &PatternSet, cfg: TrainConfig) -> Result<TrainReport> {
        self.train_with(patterns, cfg, |_| ControlFlow::Continue(()))
    }

    /// Train, handing every epoch report to `on_epoch`.
    ///
    /// Returning `ControlFlow::Break` ends the run as [`TrainState::Stopped`]
    /// (unless that same epoch already converged or exhausted the budget).
    pub fn train_with<F>(
        &mut self,
        patterns: &PatternSet,
        cfg: TrainConfig,
        mut on_epoch: F,
    ) -> Result<TrainReport>
    where
        F: FnMut(&EpochReport) -> ControlFlow<()>,
    {
        let mut epochs = self.epochs(patterns, cfg)?;
        while let Some(report) = epochs.next() {
            if on_epoch(&report).is_break() {
                epochs.stop();
                break;
            }
        }
        Ok(epochs.into_report())
    }

    /// Run exactly one epoch and return its MSE.
    pub fn train_epoch(&mut self, patterns: &PatternSet, learning_rate: f64) -> Result<f64> {
        validate_learning_rate(learning_rate)?;
        self.check_patterns(patterns)?;

        let mut trace = self.trace_buffer();
        Ok(self.run_epoch(patterns, learning_rate, &mut trace))
    }

    /// Inference-only pass over `patterns`; weights are not touched.
    pub fn evaluate(&self, patterns: &PatternSet) -> Result<EvalReport> {
        self.check_patterns(patterns)?;

        let mut total = 0.0;
        let mut predictions = Vec::with_capacity(patterns.len());
        for (input, ideal) in patterns.iter() {
            let actual = self.predict(input)?;
            let error = ideal - actual;
            total += error * error;
            predictions.push(Prediction { actual, ideal });
        }

        Ok(EvalReport {
            mse: total / patterns.len() as f64,
            predictions,
        })
    }

    fn run_epoch(
        &mut self,
        patterns: &PatternSet,
        learning_rate: f64,
        trace: &mut TraceBuffer,
    ) -> f64 {
        let mut error_sum = 0.0;
        for (input, ideal) in patterns.iter() {
            error_sum += self.train_sample(input, ideal, learning_rate, trace);
        }
        error_sum / patterns.len() as f64
    }

    fn check_patterns(&self, patterns: &PatternSet) -> Result<()> {
        if patterns.is_empty() {
            return Err(Error::InvalidData(
                "pattern set must not be empty".to_owned(),
            ));
        }
        if patterns.input_dim() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "pattern input_dim {} does not match network input_dim {}",
                patterns.input_dim(),
                self.input_dim()
            )));
        }
        Ok(())
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be finite and > 0, got {learning_rate}"
        )));
    }
    Ok(())
}
