//! Hidden-layer nonlinearities

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Nonlinearity applied after each hidden affine transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// `max(0, x)`
    #[default]
    Relu,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid
    Sigmoid,
}

impl Activation {
    /// Apply the nonlinearity elementwise
    pub fn apply(self, z: &Array2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Tanh => z.mapv(f32::tanh),
            Activation::Sigmoid => z.mapv(|v| 1.0 / (1.0 + (-v).exp())),
        }
    }

    /// Derivative expressed in terms of the activation output `a`
    ///
    /// Using the output (rather than the pre-activation) keeps the backward
    /// pass free of extra caches: relu' = [a > 0], tanh' = 1 - a^2,
    /// sigmoid' = a (1 - a).
    pub fn grad_from_output(self, a: &Array2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => a.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Tanh => a.mapv(|v| 1.0 - v * v),
            Activation::Sigmoid => a.mapv(|v| v * (1.0 - v)),
        }
    }

    /// Name for logging and checkpoint metadata
    pub fn name(self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_relu() {
        let z = array![[-1.0f32, 0.0, 2.0]];
        let a = Activation::Relu.apply(&z);
        assert_eq!(a, array![[0.0, 0.0, 2.0]]);

        let g = Activation::Relu.grad_from_output(&a);
        assert_eq!(g, array![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_tanh_grad_matches_identity() {
        let z = array![[0.5f32, -0.3]];
        let a = Activation::Tanh.apply(&z);
        let g = Activation::Tanh.grad_from_output(&a);
        for (gv, av) in g.iter().zip(a.iter()) {
            assert_relative_eq!(*gv, 1.0 - av * av, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sigmoid_range() {
        let z = array![[-10.0f32, 0.0, 10.0]];
        let a = Activation::Sigmoid.apply(&z);
        assert!(a.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_relative_eq!(a[[0, 1]], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_names() {
        assert_eq!(Activation::Relu.name(), "relu");
        assert_eq!(Activation::Tanh.name(), "tanh");
        assert_eq!(Activation::Sigmoid.name(), "sigmoid");
    }
}
