//! Inverted dropout regularization

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;

/// Inverted dropout: zero each unit with probability `rate` at train time
/// and scale the survivors by `1 / (1 - rate)`, so inference is the
/// identity.
#[derive(Debug, Clone)]
pub struct Dropout {
    rate: f32,
    mask: Option<Array2<f32>>,
}

impl Dropout {
    /// Create a dropout layer; `rate` must lie in `[0, 1)`
    pub fn new(rate: f32) -> Self {
        Self { rate, mask: None }
    }

    /// Drop probability
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Training-mode forward pass; samples and caches a fresh mask
    pub fn forward(&mut self, x: &Array2<f32>, rng: &mut StdRng) -> Array2<f32> {
        if self.rate == 0.0 {
            self.mask = None;
            return x.clone();
        }
        let keep = 1.0 - self.rate;
        let mask = Array2::from_shape_fn(x.raw_dim(), |_| {
            if rng.random::<f32>() < keep {
                1.0 / keep
            } else {
                0.0
            }
        });
        let out = x * &mask;
        self.mask = Some(mask);
        out
    }

    /// Inference-mode forward pass: identity
    pub fn forward_inference(&self, x: &Array2<f32>) -> Array2<f32> {
        x.clone()
    }

    /// Route the gradient through the cached mask
    pub fn backward(&self, grad_out: &Array2<f32>) -> Array2<f32> {
        match &self.mask {
            Some(mask) => grad_out * mask,
            None => grad_out.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::SeedableRng;

    #[test]
    fn test_zero_rate_is_identity() {
        let mut dropout = Dropout::new(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let x = Array2::from_elem((4, 4), 2.0f32);
        assert_eq!(dropout.forward(&x, &mut rng), x);
        assert_eq!(dropout.backward(&x), x);
    }

    #[test]
    fn test_mask_zeroes_and_scales() {
        let mut dropout = Dropout::new(0.5);
        let mut rng = StdRng::seed_from_u64(42);
        let x = Array2::from_elem((8, 8), 1.0f32);
        let out = dropout.forward(&x, &mut rng);

        // Every output is either dropped or scaled by 1/keep
        assert!(out.iter().all(|&v| v == 0.0 || (v - 2.0).abs() < 1e-6));
        // With 64 units at rate 0.5 both outcomes occur
        assert!(out.iter().any(|&v| v == 0.0));
        assert!(out.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_backward_uses_same_mask() {
        let mut dropout = Dropout::new(0.3);
        let mut rng = StdRng::seed_from_u64(7);
        let x = Array2::from_elem((5, 5), 1.0f32);
        let out = dropout.forward(&x, &mut rng);

        let g = Array2::from_elem((5, 5), 1.0f32);
        let gx = dropout.backward(&g);
        // Gradient is blocked exactly where the forward output was dropped
        for (o, gv) in out.iter().zip(gx.iter()) {
            assert_eq!(*o == 0.0, *gv == 0.0);
        }
    }

    #[test]
    fn test_inference_is_identity() {
        let dropout = Dropout::new(0.9);
        let x = Array2::from_elem((3, 3), 1.5f32);
        assert_eq!(dropout.forward_inference(&x), x);
    }
}
