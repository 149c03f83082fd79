//! Evaluation metrics: Accuracy, Precision, Recall, F1
//!
//! Metrics operate on predicted class probabilities; the predicted label is
//! the row argmax. Precision, recall, and F1 treat class 1 as the positive
//! class, matching the binary-classification setup.

use ndarray::{Array1, Array2};

use crate::nn::argmax_rows;

/// Trait for evaluation metrics
pub trait Metric {
    /// Compute the metric given class probabilities and target labels
    fn compute(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32;

    /// Name of the metric
    fn name(&self) -> &'static str;

    /// Whether higher values are better (true) or lower (false)
    fn higher_is_better(&self) -> bool {
        true
    }
}

/// Fraction of rows whose argmax matches the target
///
/// # Example
///
/// ```
/// use ajustar::train::{Accuracy, Metric};
/// use ndarray::array;
///
/// let probs = array![[0.9f32, 0.1], [0.3, 0.7], [0.8, 0.2]];
/// let targets = array![0usize, 1, 1];
///
/// let acc = Accuracy.compute(&probs, &targets);
/// assert!((acc - 2.0 / 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn compute(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        assert_eq!(
            probs.nrows(),
            targets.len(),
            "probabilities and targets must have the same batch size"
        );
        if targets.is_empty() {
            return 0.0;
        }

        let predicted = argmax_rows(probs);
        let correct = predicted
            .iter()
            .zip(targets.iter())
            .filter(|(p, t)| p == t)
            .count();
        correct as f32 / targets.len() as f32
    }

    fn name(&self) -> &'static str {
        "Accuracy"
    }
}

/// Binary confusion counts with class 1 as positive
fn confusion(probs: &Array2<f32>, targets: &Array1<usize>) -> (usize, usize, usize) {
    let predicted = argmax_rows(probs);
    let mut tp = 0;
    let mut fp = 0;
    let mut fn_ = 0;
    for (&p, &t) in predicted.iter().zip(targets.iter()) {
        match (p == 1, t == 1) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
            (false, false) => {}
        }
    }
    (tp, fp, fn_)
}

/// True positives over predicted positives
#[derive(Debug, Clone, Copy, Default)]
pub struct Precision;

impl Metric for Precision {
    fn compute(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        assert_eq!(probs.nrows(), targets.len());
        let (tp, fp, _) = confusion(probs, targets);
        if tp + fp == 0 {
            return 0.0;
        }
        tp as f32 / (tp + fp) as f32
    }

    fn name(&self) -> &'static str {
        "Precision"
    }
}

/// True positives over actual positives
#[derive(Debug, Clone, Copy, Default)]
pub struct Recall;

impl Metric for Recall {
    fn compute(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        assert_eq!(probs.nrows(), targets.len());
        let (tp, _, fn_) = confusion(probs, targets);
        if tp + fn_ == 0 {
            return 0.0;
        }
        tp as f32 / (tp + fn_) as f32
    }

    fn name(&self) -> &'static str {
        "Recall"
    }
}

/// Harmonic mean of precision and recall
#[derive(Debug, Clone, Copy, Default)]
pub struct F1Score;

impl Metric for F1Score {
    fn compute(&self, probs: &Array2<f32>, targets: &Array1<usize>) -> f32 {
        let p = Precision.compute(probs, targets);
        let r = Recall.compute(probs, targets);
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    fn name(&self) -> &'static str {
        "F1"
    }
}
