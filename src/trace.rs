//! Trace buffer.
//!
//! The forward pass pushes the output vector of every non-final layer; the
//! backward pass pops them back in reverse order. Within one sample the number
//! of pops must equal the number of pushes. Popping an empty buffer means the
//! two passes are out of step, which is a bug in the caller, so it panics.

#[derive(Debug, Clone, Default)]
pub struct TraceBuffer {
    stack: Vec<Vec<f64>>,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for a network with `hidden_layers` non-final layers.
    pub fn with_capacity(hidden_layers: usize) -> Self {
        Self {
            stack: Vec::with_capacity(hidden_layers),
        }
    }

    #[inline]
    pub fn push(&mut self, outputs: Vec<f64>) {
        self.stack.push(outputs);
    }

    /// Pops the most recently pushed layer output.
    ///
    /// Panics when the buffer is empty.
    #[inline]
    pub fn pop(&mut self) -> Vec<f64> {
        self.stack.pop().unwrap_or_else(|| {
            panic!("trace buffer popped while empty: forward and backward passes are out of step")
        })
    }

    #[inline]
    pub fn try_pop(&mut self) -> Option<Vec<f64>> {
        self.stack.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<&[f64]> {
        self.stack.last().map(Vec::as_slice)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
