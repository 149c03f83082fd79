//! Trainable parameter tensors

use ndarray::Array2;

/// A trainable tensor with its accumulated gradient
///
/// Vector-shaped parameters (biases) are stored as `(1, n)` rows so that
/// ndarray broadcasting applies them across a batch.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Current value
    pub value: Array2<f32>,
    /// Gradient accumulated by the most recent backward pass
    pub grad: Array2<f32>,
}

impl Parameter {
    /// Wrap a value with a zeroed gradient of the same shape
    pub fn new(value: Array2<f32>) -> Self {
        let grad = Array2::zeros(value.raw_dim());
        Self { value, grad }
    }

    /// Number of scalar elements
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the parameter holds no elements
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Reset the gradient to zero
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }
}
