//! Batch data structure

use ndarray::{Array1, Array2};

/// A training batch containing inputs and class targets
#[derive(Debug, Clone)]
pub struct Batch {
    /// Input features, shape `(batch, n_features)`
    pub inputs: Array2<f32>,
    /// Target class indices, one per row of `inputs`
    pub targets: Array1<usize>,
}

impl Batch {
    /// Create a new batch
    pub fn new(inputs: Array2<f32>, targets: Array1<usize>) -> Self {
        Self { inputs, targets }
    }

    /// Number of samples in the batch
    pub fn size(&self) -> usize {
        self.targets.len()
    }
}
