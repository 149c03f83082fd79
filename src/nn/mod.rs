//! Model definitions
//!
//! The [`Model`] trait is the seam between the training orchestrator and a
//! concrete network. [`MlpClassifier`] is the shipped implementation: two
//! hidden affine transforms with a configurable nonlinearity and dropout,
//! an output affine transform, and a softmax over the classes.

mod activation;
mod dense;
mod dropout;
mod mlp;
mod param;

pub use activation::Activation;
pub use dense::Dense;
pub use dropout::Dropout;
pub use mlp::{MlpClassifier, MlpConfig};
pub use param::Parameter;

use ndarray::{Array1, Array2};

use crate::io::ModelState;
use crate::Result;

/// A parameterized classifier the trainer can drive
///
/// Implementations own their parameters and any RNG state (dropout masks,
/// weight init). `forward` runs in training mode and caches whatever the
/// matching `backward` call needs; `predict_proba` runs in inference mode
/// and leaves no trace.
pub trait Model {
    /// Expected input width
    fn n_features(&self) -> usize;

    /// Number of output classes
    fn n_classes(&self) -> usize;

    /// Training-mode forward pass over `(batch, n_features)` inputs,
    /// returning class probabilities with rows summing to 1
    fn forward(&mut self, inputs: &Array2<f32>) -> Array2<f32>;

    /// Inference-mode forward pass (dropout disabled, nothing cached)
    fn predict_proba(&self, inputs: &Array2<f32>) -> Array2<f32>;

    /// Accumulate parameter gradients from the loss gradient with respect
    /// to the pre-softmax logits
    fn backward(&mut self, grad_logits: &Array2<f32>);

    /// Mutable access to every trainable parameter, in a stable order
    fn params_mut(&mut self) -> Vec<&mut Parameter>;

    /// Snapshot the parameters for checkpointing
    fn state(&self) -> ModelState;

    /// Restore parameters from a snapshot, validating names and shapes
    fn load_state(&mut self, state: &ModelState) -> Result<()>;

    /// Predicted class index per input row
    fn predict(&self, inputs: &Array2<f32>) -> Array1<usize> {
        argmax_rows(&self.predict_proba(inputs))
    }
}

/// Index of the largest value in each row
pub(crate) fn argmax_rows(probs: &Array2<f32>) -> Array1<usize> {
    Array1::from_iter(probs.rows().into_iter().map(|row| {
        row.iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |(bi, bv), (i, &v)| {
                if v > bv {
                    (i, v)
                } else {
                    (bi, bv)
                }
            })
            .0
    }))
}
