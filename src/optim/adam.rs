//! Adam optimizer

use ndarray::Array2;

use super::Optimizer;
use crate::nn::Parameter;

/// Adam optimizer with bias-corrected first and second moments
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: usize,
    m: Vec<Option<Array2<f32>>>,
    v: Vec<Option<Array2<f32>>>,
}

impl Adam {
    /// Create a new Adam optimizer
    ///
    /// Typical values: `Adam::new(0.001, 0.9, 0.999, 1e-8)`.
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    fn ensure_moments(&mut self, n_params: usize) {
        if self.m.is_empty() {
            self.m = (0..n_params).map(|_| None).collect();
            self.v = (0..n_params).map(|_| None).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        self.ensure_moments(params.len());
        self.t += 1;

        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, param) in params.iter_mut().enumerate() {
            let grad = &param.grad;

            let m = match &self.m[i] {
                Some(m) => m * self.beta1 + &(grad * (1.0 - self.beta1)),
                None => grad * (1.0 - self.beta1),
            };
            let v = match &self.v[i] {
                Some(v) => v * self.beta2 + &(grad.mapv(|g| g * g) * (1.0 - self.beta2)),
                None => grad.mapv(|g| g * g) * (1.0 - self.beta2),
            };

            let m_hat = &m / bias1;
            let v_hat = &v / bias2;

            let update = m_hat / (v_hat.mapv(f32::sqrt) + self.epsilon) * self.lr;
            param.value = &param.value - &update;

            self.m[i] = Some(m);
            self.v[i] = Some(v);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_adam_first_step_magnitude() {
        // With bias correction, the first step is close to lr for any gradient scale
        let mut opt = Adam::new(0.001, 0.9, 0.999, 1e-8);
        let mut p = Parameter::new(array![[1.0f32]]);
        p.grad = array![[10.0f32]];

        opt.step(&mut [&mut p]);

        let delta = 1.0 - p.value[[0, 0]];
        assert_relative_eq!(delta, 0.001, epsilon = 1e-5);
    }

    #[test]
    fn test_adam_descends_quadratic() {
        // Minimize f(x) = x^2, gradient 2x
        let mut opt = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let mut p = Parameter::new(array![[2.0f32]]);

        for _ in 0..100 {
            let x = p.value[[0, 0]];
            p.grad = array![[2.0 * x]];
            opt.step(&mut [&mut p]);
        }

        assert!(p.value[[0, 0]].abs() < 0.5);
    }

    #[test]
    fn test_adam_lr_accessors() {
        let mut opt = Adam::new(0.001, 0.9, 0.999, 1e-8);
        assert_eq!(opt.lr(), 0.001);
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }

    #[test]
    fn test_adam_tracks_params_independently() {
        let mut opt = Adam::new(0.01, 0.9, 0.999, 1e-8);
        let mut a = Parameter::new(array![[1.0f32]]);
        let mut b = Parameter::new(array![[1.0f32]]);

        a.grad = array![[1.0f32]];
        b.grad = array![[0.0f32]];
        opt.step(&mut [&mut a, &mut b]);

        assert!(a.value[[0, 0]] < 1.0);
        assert_eq!(b.value[[0, 0]], 1.0);
    }
}
