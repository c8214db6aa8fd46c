use tracing::debug;

use crate::activation::{sigmoid, sigmoid_grad_from_output};
use crate::{Error, ErrorSignal, Result, TraceBuffer, UpdatePolicy, Weights};

/// Input value paired with every neuron's trailing bias weight.
const BIAS_INPUT: f64 = 1.0;

/// A single-output feedforward sigmoid network trained one sample at a time.
#[derive(Debug, Clone)]
pub struct Network {
    weights: Weights,
    policy: UpdatePolicy,
    signal: ErrorSignal,
    /// Last raw gradient per connection, in backward traversal order
    /// (output layer first, neuron-major, bias last). Empty until the first
    /// momentum update.
    ledger: Vec<f64>,
}

impl Network {
    /// Wrap a weight matrix with an update policy.
    ///
    /// The matrix must be biased exactly when the policy is, and must have a
    /// single output neuron.
    pub fn new(weights: Weights, policy: UpdatePolicy) -> Result<Self> {
        policy.validate()?;
        if weights.is_biased() != policy.is_biased() {
            return Err(Error::InvalidConfig(format!(
                "{policy:?} needs biased={} weights, got biased={}",
                policy.is_biased(),
                weights.is_biased()
            )));
        }
        if weights.output_dim() != 1 {
            return Err(Error::InvalidShape(format!(
                "network must have a single output neuron, got {}",
                weights.output_dim()
            )));
        }

        Ok(Self {
            weights,
            policy,
            signal: ErrorSignal::default(),
            ledger: Vec::new(),
        })
    }

    /// Select how the output error reaches hidden layers.
    pub fn with_error_signal(mut self, signal: ErrorSignal) -> Self {
        self.signal = signal;
        self
    }

    #[inline]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[inline]
    pub fn into_weights(self) -> Weights {
        self.weights
    }

    #[inline]
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    #[inline]
    pub fn error_signal(&self) -> ErrorSignal {
        self.signal
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.weights.input_dim()
    }

    /// Number of non-final layers, i.e. trace entries per sample.
    #[inline]
    pub fn hidden_layers(&self) -> usize {
        self.weights.num_layers() - 1
    }

    /// Previous delta per connection; empty before the first momentum update.
    #[inline]
    pub fn momentum_ledger(&self) -> &[f64] {
        &self.ledger
    }

    /// Forget accumulated momentum.
    pub fn reset_momentum(&mut self) {
        self.ledger.clear();
    }

    /// A trace buffer sized for this network.
    pub fn trace_buffer(&self) -> TraceBuffer {
        TraceBuffer::with_capacity(self.hidden_layers())
    }

    /// Training forward pass for a single sample.
    ///
    /// Pushes every hidden layer's output onto `trace` and returns the network output.
    ///
    /// Shape contract: `input.len() == self.input_dim()`.
    pub fn forward(&self, input: &[f64], trace: &mut TraceBuffer) -> f64 {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match network input_dim {}",
            input.len(),
            self.input_dim()
        );
        self.feed(input, Some(trace))
    }

    /// Shape-checked inference; leaves no trace.
    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "input len {} does not match network input_dim {}",
                input.len(),
                self.input_dim()
            )));
        }
        Ok(self.feed(input, None))
    }

    fn feed(&self, input: &[f64], mut trace: Option<&mut TraceBuffer>) -> f64 {
        let biased = self.weights.is_biased();
        let layers = self.weights.layers();
        let last = layers.len() - 1;

        let mut current: Vec<f64> = Vec::new();
        for (idx, layer) in layers.iter().enumerate() {
            let inputs: &[f64] = if idx == 0 { input } else { &current };
            let outputs: Vec<f64> = layer
                .iter()
                .map(|weights| neuron_output(weights, inputs, biased))
                .collect();

            if idx != last {
                if let Some(trace) = trace.as_deref_mut() {
                    trace.push(outputs.clone());
                }
            }
            current = outputs;
        }

        current[0]
    }

    /// Backward pass for a single sample.
    ///
    /// Consumes the trace left by the matching `forward` call and updates every
    /// weight in place, output layer first. Returns the signed error
    /// `ideal - actual`.
    ///
    /// Panics if `trace` does not hold exactly one entry per hidden layer.
    pub fn backward(
        &mut self,
        input: &[f64],
        ideal: f64,
        actual: f64,
        trace: &mut TraceBuffer,
        learning_rate: f64,
    ) -> f64 {
        assert!(
            learning_rate.is_finite() && learning_rate > 0.0,
            "learning rate must be finite and > 0"
        );
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match network input_dim {}",
            input.len(),
            self.input_dim()
        );
        assert_eq!(
            trace.len(),
            self.hidden_layers(),
            "trace buffer holds {} entries, network has {} hidden layers",
            trace.len(),
            self.hidden_layers()
        );

        let error = ideal - actual;
        let momentum = self.policy.momentum_rate();
        if momentum.is_some() && self.ledger.is_empty() {
            self.ledger = vec![0.0; self.weights.connection_count()];
            debug!(connections = self.ledger.len(), "allocated momentum ledger");
        }

        let rule = self.signal;
        let Self {
            weights, ledger, ..
        } = self;
        let layers = weights.layers_mut();

        // Loop state: outputs of the layer being updated and the error signal
        // arriving at each of its neurons.
        let mut outputs = vec![actual];
        let mut signal = vec![error];
        let mut slot = 0;

        for idx in (0..layers.len()).rev() {
            let popped = (idx > 0).then(|| trace.pop());
            let below: &[f64] = popped.as_deref().unwrap_or(input);
            let layer = &mut layers[idx];

            let deltas: Vec<f64> = signal
                .iter()
                .zip(&outputs)
                .map(|(&s, &y)| s * sigmoid_grad_from_output(y))
                .collect();

            if idx > 0 {
                signal = match rule {
                    ErrorSignal::Backpropagated => (0..below.len())
                        .map(|j| {
                            layer
                                .iter()
                                .zip(&deltas)
                                .map(|(weights, &delta)| delta * weights[j])
                                .sum::<f64>()
                        })
                        .collect(),
                    ErrorSignal::Broadcast => vec![error; below.len()],
                };
            }

            for (weights, &delta) in layer.iter_mut().zip(&deltas) {
                for (i, w) in weights.iter_mut().enumerate() {
                    let x = below.get(i).copied().unwrap_or(BIAS_INPUT);
                    let gradient = learning_rate * delta * x;
                    let change = match momentum {
                        Some(rate) => {
                            let change = gradient + rate * ledger[slot];
                            ledger[slot] = gradient;
                            slot += 1;
                            change
                        }
                        None => gradient,
                    };
                    *w += change;
                }
            }

            if let Some(hidden) = popped {
                outputs = hidden;
            }
        }

        debug_assert!(trace.is_empty());
        debug_assert!(momentum.is_none() || slot == ledger.len());

        error
    }

    /// Forward + backward for one sample. Returns the squared error.
    pub fn train_sample(
        &mut self,
        input: &[f64],
        ideal: f64,
        learning_rate: f64,
        trace: &mut TraceBuffer,
    ) -> f64 {
        trace.clear();
        let actual = self.forward(input, trace);
        let error = self.backward(input, ideal, actual, trace, learning_rate);
        error * error
    }
}

#[inline]
fn neuron_output(weights: &[f64], inputs: &[f64], biased: bool) -> f64 {
    let mut sum = 0.0;
    for (&w, &x) in weights.iter().zip(inputs) {
        sum = w.mul_add(x, sum);
    }
    if biased {
        debug_assert_eq!(weights.len(), inputs.len() + 1);
        if let Some(&bias) = weights.last() {
            sum = bias.mul_add(BIAS_INPUT, sum);
        }
    } else {
        debug_assert_eq!(weights.len(), inputs.len());
    }
    sigmoid(sum)
}
