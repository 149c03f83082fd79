//! Two-hidden-layer feed-forward classifier

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Activation, Dense, Dropout, Model, Parameter};
use crate::io::{ModelMetadata, ModelState};
use crate::{Error, Result};

/// Parameter names in the order `params_mut` exposes them
const PARAM_NAMES: [&str; 6] = [
    "fc1.weight",
    "fc1.bias",
    "fc2.weight",
    "fc2.bias",
    "out.weight",
    "out.bias",
];

/// Configuration for [`MlpClassifier`]
///
/// # Example
///
/// ```
/// use ajustar::nn::{Activation, MlpConfig};
///
/// let model = MlpConfig::new(20)
///     .with_hidden_units(32)
///     .with_activation(Activation::Tanh)
///     .with_dropout(0.1)
///     .with_seed(42)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MlpConfig {
    /// Input width
    pub n_features: usize,
    /// Units in each hidden layer
    pub hidden_units: usize,
    /// Output classes
    pub n_classes: usize,
    /// Hidden-layer nonlinearity
    pub activation: Activation,
    /// Drop probability between the hidden layers
    pub dropout_rate: f32,
    /// RNG seed for weight init and dropout masks (OS entropy when unset)
    pub seed: Option<u64>,
}

impl MlpConfig {
    /// Defaults: 64 hidden units, 2 classes, relu, dropout 0.2
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            hidden_units: 64,
            n_classes: 2,
            activation: Activation::Relu,
            dropout_rate: 0.2,
            seed: None,
        }
    }

    /// Set the hidden-layer width
    pub fn with_hidden_units(mut self, hidden_units: usize) -> Self {
        self.hidden_units = hidden_units;
        self
    }

    /// Set the number of output classes
    pub fn with_n_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = n_classes;
        self
    }

    /// Set the hidden-layer nonlinearity
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Set the drop probability
    pub fn with_dropout(mut self, dropout_rate: f32) -> Self {
        self.dropout_rate = dropout_rate;
        self
    }

    /// Pin the RNG seed for reproducible init and dropout
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and build the classifier
    pub fn build(self) -> Result<MlpClassifier> {
        if self.n_features == 0 {
            return Err(Error::InvalidConfig("n_features must be positive".into()));
        }
        if self.hidden_units == 0 {
            return Err(Error::InvalidConfig("hidden_units must be positive".into()));
        }
        if self.n_classes < 2 {
            return Err(Error::InvalidConfig(format!(
                "n_classes must be at least 2, got {}",
                self.n_classes
            )));
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(Error::InvalidConfig(format!(
                "dropout_rate must be in [0, 1), got {}",
                self.dropout_rate
            )));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(MlpClassifier {
            fc1: Dense::new(self.n_features, self.hidden_units, &mut rng),
            fc2: Dense::new(self.hidden_units, self.hidden_units, &mut rng),
            out: Dense::new(self.hidden_units, self.n_classes, &mut rng),
            dropout: Dropout::new(self.dropout_rate),
            a1: None,
            a2: None,
            rng,
            config: self,
        })
    }
}

/// Feed-forward classifier: affine → nonlinearity → dropout → affine →
/// nonlinearity → affine → softmax
///
/// The backward pass is the closed-form chain for this fixed architecture;
/// it expects the loss gradient with respect to the pre-softmax logits
/// (see [`crate::train::CrossEntropyLoss::grad_logits`]).
#[derive(Debug)]
pub struct MlpClassifier {
    config: MlpConfig,
    fc1: Dense,
    fc2: Dense,
    out: Dense,
    dropout: Dropout,
    // Hidden activations cached by the training-mode forward pass
    a1: Option<Array2<f32>>,
    a2: Option<Array2<f32>>,
    rng: StdRng,
}

impl MlpClassifier {
    /// The configuration the classifier was built from
    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Total number of trainable scalars
    pub fn n_params(&self) -> usize {
        self.named_params().iter().map(|(_, p)| p.len()).sum()
    }

    fn named_params(&self) -> Vec<(&'static str, &Parameter)> {
        let [w1, b1] = self.fc1.params();
        let [w2, b2] = self.fc2.params();
        let [w3, b3] = self.out.params();
        vec![
            (PARAM_NAMES[0], w1),
            (PARAM_NAMES[1], b1),
            (PARAM_NAMES[2], w2),
            (PARAM_NAMES[3], b2),
            (PARAM_NAMES[4], w3),
            (PARAM_NAMES[5], b3),
        ]
    }
}

impl Model for MlpClassifier {
    fn n_features(&self) -> usize {
        self.config.n_features
    }

    fn n_classes(&self) -> usize {
        self.config.n_classes
    }

    fn forward(&mut self, inputs: &Array2<f32>) -> Array2<f32> {
        let z1 = self.fc1.forward(inputs);
        let a1 = self.config.activation.apply(&z1);
        let d1 = self.dropout.forward(&a1, &mut self.rng);
        self.a1 = Some(a1);

        let z2 = self.fc2.forward(&d1);
        let a2 = self.config.activation.apply(&z2);
        let logits = self.out.forward(&a2);
        self.a2 = Some(a2);

        softmax_rows(&logits)
    }

    fn predict_proba(&self, inputs: &Array2<f32>) -> Array2<f32> {
        let a1 = self.config.activation.apply(&self.fc1.forward_inference(inputs));
        let d1 = self.dropout.forward_inference(&a1);
        let a2 = self.config.activation.apply(&self.fc2.forward_inference(&d1));
        softmax_rows(&self.out.forward_inference(&a2))
    }

    fn backward(&mut self, grad_logits: &Array2<f32>) {
        let a2 = self
            .a2
            .take()
            .expect("backward requires a prior training-mode forward");
        let a1 = self
            .a1
            .take()
            .expect("backward requires a prior training-mode forward");

        let g = self.out.backward(grad_logits);
        let g = g * &self.config.activation.grad_from_output(&a2);
        let g = self.fc2.backward(&g);
        let g = self.dropout.backward(&g);
        let g = g * &self.config.activation.grad_from_output(&a1);
        self.fc1.backward(&g);
    }

    fn params_mut(&mut self) -> Vec<&mut Parameter> {
        let mut params = Vec::with_capacity(PARAM_NAMES.len());
        params.extend(self.fc1.params_mut());
        params.extend(self.fc2.params_mut());
        params.extend(self.out.params_mut());
        params
    }

    fn state(&self) -> ModelState {
        let mut state = ModelState::new(ModelMetadata::new("mlp-classifier", "feedforward"));
        for (name, param) in self.named_params() {
            state.push(name, &param.value);
        }
        state
    }

    fn load_state(&mut self, state: &ModelState) -> Result<()> {
        let slices = state.param_slices()?;
        let mut params = self.params_mut();
        if slices.len() != params.len() {
            return Err(Error::ShapeMismatch(format!(
                "state has {} parameters, model expects {}",
                slices.len(),
                params.len()
            )));
        }

        for (((info, chunk), param), expected) in
            slices.iter().zip(params.iter_mut()).zip(PARAM_NAMES)
        {
            if info.name != expected {
                return Err(Error::ShapeMismatch(format!(
                    "unexpected parameter {:?}, wanted {expected:?}",
                    info.name
                )));
            }
            if info.shape.as_slice() != param.value.shape() {
                return Err(Error::ShapeMismatch(format!(
                    "parameter {} has shape {:?}, model expects {:?}",
                    info.name,
                    info.shape,
                    param.value.shape()
                )));
            }
            param.value = Array2::from_shape_vec(
                (info.shape[0], info.shape[1]),
                chunk.to_vec(),
            )
            .map_err(|e| Error::ShapeMismatch(e.to_string()))?;
        }
        Ok(())
    }
}

/// Row-wise softmax with max-subtraction for numerical stability
pub(crate) fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut out = Array2::zeros(logits.raw_dim());
    for (mut out_row, row) in out.rows_mut().into_iter().zip(logits.rows()) {
        let max = row.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let mut sum = 0.0;
        for (o, &l) in out_row.iter_mut().zip(row.iter()) {
            *o = (l - max).exp();
            sum += *o;
        }
        out_row.mapv_inplace(|v| v / sum);
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Softmax rows are a probability distribution for any input
        #[test]
        fn softmax_rows_sum_to_one(
            values in prop::collection::vec(-50.0f32..50.0, 2..40),
        ) {
            let cols = 2;
            let rows = values.len() / cols;
            prop_assume!(rows > 0);
            let logits = Array2::from_shape_vec(
                (rows, cols),
                values[..rows * cols].to_vec(),
            ).unwrap();

            let probs = softmax_rows(&logits);
            for row in probs.rows() {
                let sum: f32 = row.sum();
                prop_assert!((sum - 1.0).abs() < 1e-4);
                prop_assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
            }
        }

        /// Model probabilities are a distribution for any input batch
        #[test]
        fn model_outputs_are_distributions(
            seed in 0u64..100,
            batch in 1usize..8,
        ) {
            let model = MlpConfig::new(3)
                .with_hidden_units(4)
                .with_seed(seed)
                .build()
                .unwrap();
            let x = Array2::from_shape_fn((batch, 3), |(i, j)| {
                ((seed as usize + i * 3 + j) % 13) as f32 - 6.0
            });

            let probs = model.predict_proba(&x);
            for row in probs.rows() {
                let sum: f32 = row.sum();
                prop_assert!((sum - 1.0).abs() < 1e-4);
            }
        }
    }
}
