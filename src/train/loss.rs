//! Loss functions

use ndarray::{Array1, Array2};

/// Trait for classification loss functions
///
/// `forward` evaluates the scalar loss on predicted class probabilities;
/// `grad_logits` returns the gradient with respect to the pre-softmax
/// logits, which is where the model's backward pass picks up the chain.
pub trait LossFn {
    /// Mean loss over the batch
    fn forward(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32;

    /// Gradient of the mean loss with respect to the logits
    fn grad_logits(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> Array2<f32>;

    /// Name of the loss function
    fn name(&self) -> &'static str;
}

/// Cross entropy over softmax probabilities
///
/// `L = -mean(log p[target])`. The logit gradient uses the softmax fusion
/// `(p - one_hot(target)) / batch`, so no separate softmax backward is
/// needed.
///
/// # Example
///
/// ```
/// use ajustar::train::{CrossEntropyLoss, LossFn};
/// use ndarray::array;
///
/// let loss_fn = CrossEntropyLoss;
/// let probs = array![[0.9f32, 0.1], [0.2, 0.8]];
/// let targets = array![0usize, 1];
///
/// let loss = loss_fn.forward(&probs, &targets);
/// assert!(loss > 0.0 && loss < 0.3);
/// ```
pub struct CrossEntropyLoss;

impl LossFn for CrossEntropyLoss {
    fn forward(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        assert_eq!(
            probs.nrows(),
            targets.len(),
            "probabilities and targets must have the same batch size"
        );
        if targets.is_empty() {
            return 0.0;
        }

        let nll: f32 = targets
            .iter()
            .enumerate()
            .map(|(i, &t)| -(probs[[i, t]] + 1e-10).max(f32::MIN_POSITIVE).ln())
            .sum();
        nll / targets.len() as f32
    }

    fn grad_logits(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> Array2<f32> {
        assert_eq!(
            probs.nrows(),
            targets.len(),
            "probabilities and targets must have the same batch size"
        );

        let scale = 1.0 / targets.len().max(1) as f32;
        let mut grad = probs * scale;
        for (i, &t) in targets.iter().enumerate() {
            grad[[i, t]] -= scale;
        }
        grad
    }

    fn name(&self) -> &'static str {
        "CrossEntropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction_has_near_zero_loss() {
        let probs = array![[1.0f32, 0.0], [0.0, 1.0]];
        let targets = array![0usize, 1];
        let loss = CrossEntropyLoss.forward(&probs, &targets);
        assert!(loss.abs() < 1e-6);
    }

    #[test]
    fn test_uniform_prediction_loss() {
        let probs = array![[0.5f32, 0.5]];
        let targets = array![0usize];
        let loss = CrossEntropyLoss.forward(&probs, &targets);
        assert_relative_eq!(loss, std::f32::consts::LN_2, epsilon = 1e-5);
    }

    #[test]
    fn test_confidently_wrong_is_penalized() {
        let confident = CrossEntropyLoss.forward(&array![[0.01f32, 0.99]], &array![0usize]);
        let unsure = CrossEntropyLoss.forward(&array![[0.4f32, 0.6]], &array![0usize]);
        assert!(confident > unsure);
    }

    #[test]
    fn test_grad_is_probs_minus_one_hot_over_batch() {
        let probs = array![[0.7f32, 0.3], [0.2, 0.8]];
        let targets = array![0usize, 0];
        let grad = CrossEntropyLoss.grad_logits(&probs, &targets);

        assert_relative_eq!(grad[[0, 0]], (0.7 - 1.0) / 2.0, epsilon = 1e-6);
        assert_relative_eq!(grad[[0, 1]], 0.3 / 2.0, epsilon = 1e-6);
        assert_relative_eq!(grad[[1, 0]], (0.2 - 1.0) / 2.0, epsilon = 1e-6);
        assert_relative_eq!(grad[[1, 1]], 0.8 / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_grad_rows_sum_to_zero() {
        let probs = array![[0.6f32, 0.4], [0.1, 0.9]];
        let targets = array![1usize, 0];
        let grad = CrossEntropyLoss.grad_logits(&probs, &targets);
        for row in grad.rows() {
            assert_relative_eq!(row.sum(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_loss_is_finite_for_zero_probability() {
        let probs = array![[0.0f32, 1.0]];
        let targets = array![0usize];
        let loss = CrossEntropyLoss.forward(&probs, &targets);
        assert!(loss.is_finite());
        assert!(loss > 10.0);
    }

    #[test]
    fn test_empty_batch() {
        let probs = Array2::<f32>::zeros((0, 2));
        let targets = Array1::<usize>::zeros(0);
        assert_eq!(CrossEntropyLoss.forward(&probs, &targets), 0.0);
    }

    #[test]
    fn test_name() {
        assert_eq!(CrossEntropyLoss.name(), "CrossEntropy");
    }
}
