//! Fully-connected layer

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;

use super::Parameter;

/// Affine transform `y = x W + b`
///
/// Weights are `(in_features, out_features)`; the bias row is `(1,
/// out_features)` and broadcasts over the batch. The training-mode forward
/// pass caches its input for the backward pass.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Parameter,
    bias: Parameter,
    input: Option<Array2<f32>>,
}

impl Dense {
    /// Create a layer with Xavier-uniform weights and zero bias
    pub fn new(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (in_features + out_features) as f32).sqrt();
        let weights = Array2::from_shape_fn((in_features, out_features), |_| {
            rng.random_range(-limit..limit)
        });
        Self {
            weights: Parameter::new(weights),
            bias: Parameter::new(Array2::zeros((1, out_features))),
            input: None,
        }
    }

    /// Input width
    pub fn in_features(&self) -> usize {
        self.weights.value.nrows()
    }

    /// Output width
    pub fn out_features(&self) -> usize {
        self.weights.value.ncols()
    }

    /// Training-mode forward pass; caches the input for `backward`
    pub fn forward(&mut self, x: &Array2<f32>) -> Array2<f32> {
        let z = x.dot(&self.weights.value) + &self.bias.value;
        self.input = Some(x.clone());
        z
    }

    /// Inference-mode forward pass; no caching
    pub fn forward_inference(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.weights.value) + &self.bias.value
    }

    /// Accumulate gradients and return the gradient with respect to the input
    ///
    /// `grad_out` has shape `(batch, out_features)`.
    pub fn backward(&mut self, grad_out: &Array2<f32>) -> Array2<f32> {
        let x = self
            .input
            .as_ref()
            .expect("Dense::backward requires a prior training-mode forward");

        self.weights.grad = &self.weights.grad + &x.t().dot(grad_out);
        self.bias.grad =
            &self.bias.grad + &grad_out.sum_axis(Axis(0)).insert_axis(Axis(0));

        grad_out.dot(&self.weights.value.t())
    }

    /// Mutable access to `[weights, bias]`
    pub fn params_mut(&mut self) -> [&mut Parameter; 2] {
        [&mut self.weights, &mut self.bias]
    }

    /// Shared access to `[weights, bias]`
    pub fn params(&self) -> [&Parameter; 2] {
        [&self.weights, &self.bias]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;

    fn layer_2x3() -> Dense {
        let mut rng = StdRng::seed_from_u64(0);
        Dense::new(2, 3, &mut rng)
    }

    #[test]
    fn test_forward_shape() {
        let mut layer = layer_2x3();
        let x = array![[1.0f32, 2.0], [3.0, 4.0]];
        let z = layer.forward(&x);
        assert_eq!(z.dim(), (2, 3));
    }

    #[test]
    fn test_forward_inference_matches_forward() {
        let mut layer = layer_2x3();
        let x = array![[0.5f32, -0.5]];
        let train = layer.forward(&x);
        let infer = layer.forward_inference(&x);
        assert_eq!(train, infer);
    }

    #[test]
    fn test_init_within_xavier_limit() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Dense::new(10, 10, &mut rng);
        let limit = (6.0f32 / 20.0).sqrt();
        let [w, b] = layer.params();
        assert!(w.value.iter().all(|&v| v.abs() <= limit));
        assert!(b.value.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_backward_gradients() {
        // Single unit, identity-like setup so the chain is easy to verify
        let mut layer = layer_2x3();
        let x = array![[1.0f32, 2.0], [3.0, 4.0]];
        layer.forward(&x);

        let g = array![[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let dx = layer.backward(&g);
        assert_eq!(dx.dim(), (2, 2));

        let [w, b] = layer.params();
        // dW = x^T g
        assert_relative_eq!(w.grad[[0, 0]], 1.0, epsilon = 1e-6);
        assert_relative_eq!(w.grad[[0, 1]], 3.0, epsilon = 1e-6);
        assert_relative_eq!(w.grad[[1, 0]], 2.0, epsilon = 1e-6);
        // db = column sums of g
        assert_relative_eq!(b.grad[[0, 0]], 1.0, epsilon = 1e-6);
        assert_relative_eq!(b.grad[[0, 1]], 1.0, epsilon = 1e-6);
        assert_relative_eq!(b.grad[[0, 2]], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_backward_accumulates() {
        let mut layer = layer_2x3();
        let x = array![[1.0f32, 1.0]];
        let g = array![[1.0f32, 1.0, 1.0]];

        layer.forward(&x);
        layer.backward(&g);
        layer.forward(&x);
        layer.backward(&g);

        let [w, _] = layer.params();
        assert_relative_eq!(w.grad[[0, 0]], 2.0, epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "prior training-mode forward")]
    fn test_backward_without_forward_panics() {
        let mut layer = layer_2x3();
        let g = array![[1.0f32, 0.0, 0.0]];
        layer.backward(&g);
    }
}
