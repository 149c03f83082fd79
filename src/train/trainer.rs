//! Training orchestrator

use std::time::Instant;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::{Batch, Dataset};
use crate::nn::Model;
use crate::optim::Optimizer;
use crate::{Error, Result};

use super::callback::{CallbackAction, CallbackContext, CallbackManager, TrainerCallback};
use super::metrics::{Accuracy, Metric};
use super::{CrossEntropyLoss, History, LossFn, TrainConfig, TrainResult};

/// High-level trainer that orchestrates the epoch loop
///
/// Each epoch runs batched forward/backward passes with optimizer updates,
/// evaluates the validation set without updates, appends one history
/// record, and dispatches the registered callbacks. The model, optimizer,
/// and history are exclusively owned by the trainer for the duration of a
/// fit call; callbacks see them through shared borrows.
///
/// # Example
///
/// ```no_run
/// use ajustar::data::Dataset;
/// use ajustar::nn::MlpConfig;
/// use ajustar::optim::Sgd;
/// use ajustar::train::{EarlyStopping, TrainConfig, Trainer};
/// # fn main() -> ajustar::Result<()> {
/// # let dataset: Dataset = todo!();
///
/// let model = MlpConfig::new(20).build()?;
/// let mut trainer = Trainer::new(model, Box::new(Sgd::new(0.1, 0.9)), TrainConfig::new());
/// trainer.add_callback(EarlyStopping::new(5, 0.001));
///
/// let result = trainer.fit(&dataset, 100)?;
/// println!("stopped after {} epochs", result.final_epoch);
/// # Ok(())
/// # }
/// ```
pub struct Trainer<M: Model> {
    /// The model being trained
    model: M,

    /// Optimizer
    optimizer: Box<dyn Optimizer>,

    /// Loss function
    loss_fn: Box<dyn LossFn>,

    /// Training configuration
    config: TrainConfig,

    /// Per-epoch records of the current fit call
    history: History,

    /// Callback manager
    callbacks: CallbackManager,

    /// RNG driving splits and shuffles
    rng: StdRng,

    /// Training start time
    start_time: Option<Instant>,
}

impl<M: Model> Trainer<M> {
    /// Create a new trainer with cross-entropy loss
    pub fn new(model: M, optimizer: Box<dyn Optimizer>, config: TrainConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            model,
            optimizer,
            loss_fn: Box::new(CrossEntropyLoss),
            config,
            history: History::new(),
            callbacks: CallbackManager::new(),
            rng,
            start_time: None,
        }
    }

    /// Replace the loss function
    pub fn set_loss(&mut self, loss_fn: Box<dyn LossFn>) {
        self.loss_fn = loss_fn;
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Get reference to the model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get mutable reference to the model
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the trainer and return the model
    pub fn into_model(self) -> M {
        self.model
    }

    /// History of the current fit call
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Get reference to callback manager
    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// Get current learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    /// Set learning rate
    pub fn set_lr(&mut self, lr: f32) {
        self.optimizer.set_lr(lr);
    }

    /// Train for up to `max_epochs`, holding out the configured validation
    /// fraction of `dataset`
    pub fn fit(&mut self, dataset: &Dataset, max_epochs: usize) -> Result<TrainResult> {
        let (train, val) = dataset.split(self.config.validation_split, &mut self.rng)?;
        self.fit_with_val(&train, &val, max_epochs)
    }

    /// Train for up to `max_epochs` with an explicit validation set
    ///
    /// Each epoch: shuffle and batch the training set, run forward/backward
    /// with an optimizer step per batch, evaluate the validation set,
    /// append a history record, and fire the epoch-end callbacks. Failures
    /// (config validation, callback I/O) propagate unmodified; training
    /// stops where they occur.
    pub fn fit_with_val(
        &mut self,
        train: &Dataset,
        val: &Dataset,
        max_epochs: usize,
    ) -> Result<TrainResult> {
        if self.config.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive".into()));
        }
        self.check_dataset("training", train)?;
        self.check_dataset("validation", val)?;

        self.start_time = Some(Instant::now());
        self.history = History::new();
        let mut stopped_early = false;
        let mut last_train_loss = 0.0;
        let mut last_val_loss = 0.0;

        let ctx = CallbackContext {
            epoch: 0,
            max_epochs,
            batch: 0,
            batches_per_epoch: 0,
            train_loss: 0.0,
            val_loss: None,
            val_accuracy: None,
            lr: self.optimizer.lr(),
            elapsed_secs: 0.0,
            model: &self.model,
            history: &self.history,
        };
        if self.callbacks.on_train_begin(&ctx)? == CallbackAction::Stop {
            return Ok(TrainResult {
                final_epoch: 0,
                final_train_loss: 0.0,
                final_val_loss: 0.0,
                best_val_loss: 0.0,
                best_val_accuracy: 0.0,
                stopped_early: true,
                elapsed_secs: self.elapsed(),
            });
        }

        'training: for epoch in 0..max_epochs {
            let epoch_start = Instant::now();

            let ctx = CallbackContext {
                epoch,
                max_epochs,
                batch: 0,
                batches_per_epoch: 0,
                train_loss: last_train_loss,
                val_loss: None,
                val_accuracy: None,
                lr: self.optimizer.lr(),
                elapsed_secs: self.elapsed(),
                model: &self.model,
                history: &self.history,
            };
            if self.callbacks.on_epoch_begin(&ctx)? == CallbackAction::Stop {
                stopped_early = true;
                break;
            }

            let batches = if self.config.shuffle {
                train.shuffled_batches(self.config.batch_size, &mut self.rng)
            } else {
                train.batches(self.config.batch_size)
            };
            let batches_per_epoch = batches.len();
            let mut total_loss = 0.0;

            for (batch_idx, batch) in batches.iter().enumerate() {
                let ctx = CallbackContext {
                    epoch,
                    max_epochs,
                    batch: batch_idx,
                    batches_per_epoch,
                    train_loss: last_train_loss,
                    val_loss: None,
                    val_accuracy: None,
                    lr: self.optimizer.lr(),
                    elapsed_secs: self.elapsed(),
                    model: &self.model,
                    history: &self.history,
                };
                if self.callbacks.on_batch_begin(&ctx)? == CallbackAction::Stop {
                    stopped_early = true;
                    break 'training;
                }

                let loss = self.train_batch(batch);
                total_loss += loss;

                let ctx = CallbackContext {
                    epoch,
                    max_epochs,
                    batch: batch_idx,
                    batches_per_epoch,
                    train_loss: loss,
                    val_loss: None,
                    val_accuracy: None,
                    lr: self.optimizer.lr(),
                    elapsed_secs: self.elapsed(),
                    model: &self.model,
                    history: &self.history,
                };
                if self.callbacks.on_batch_end(&ctx)? == CallbackAction::Stop {
                    stopped_early = true;
                    break 'training;
                }
            }

            let train_loss = total_loss / batches_per_epoch.max(1) as f32;
            last_train_loss = train_loss;

            let (val_loss, val_accuracy) = self.evaluate_batches(val);
            last_val_loss = val_loss;

            self.history.record(
                train_loss,
                val_loss,
                val_accuracy,
                epoch_start.elapsed().as_secs_f64(),
            );

            let ctx = CallbackContext {
                epoch,
                max_epochs,
                batch: batches_per_epoch,
                batches_per_epoch,
                train_loss,
                val_loss: Some(val_loss),
                val_accuracy: Some(val_accuracy),
                lr: self.optimizer.lr(),
                elapsed_secs: self.elapsed(),
                model: &self.model,
                history: &self.history,
            };
            if self.callbacks.on_epoch_end(&ctx)? == CallbackAction::Stop {
                stopped_early = true;
                break;
            }
        }

        let ctx = CallbackContext {
            epoch: self.history.len().saturating_sub(1),
            max_epochs,
            batch: 0,
            batches_per_epoch: 0,
            train_loss: last_train_loss,
            val_loss: self.history.latest().map(|r| r.val_loss),
            val_accuracy: self.history.latest().map(|r| r.val_accuracy),
            lr: self.optimizer.lr(),
            elapsed_secs: self.elapsed(),
            model: &self.model,
            history: &self.history,
        };
        self.callbacks.on_train_end(&ctx)?;

        Ok(TrainResult {
            final_epoch: self.history.len(),
            final_train_loss: last_train_loss,
            final_val_loss: last_val_loss,
            best_val_loss: self.history.best_val_loss().unwrap_or(last_val_loss),
            best_val_accuracy: self.history.best_val_accuracy().unwrap_or(0.0),
            stopped_early,
            elapsed_secs: self.elapsed(),
        })
    }

    /// Loss and accuracy over a dataset, without parameter updates
    pub fn evaluate(&self, dataset: &Dataset) -> Result<(f32, f32)> {
        self.check_dataset("evaluation", dataset)?;
        Ok(self.evaluate_batches(dataset))
    }

    /// Class probabilities for a batch of inputs
    pub fn predict_proba(&self, inputs: &Array2<f32>) -> Result<Array2<f32>> {
        self.check_width(inputs)?;
        Ok(self.model.predict_proba(inputs))
    }

    /// Predicted class index per input row
    pub fn predict(&self, inputs: &Array2<f32>) -> Result<Array1<usize>> {
        self.check_width(inputs)?;
        Ok(self.model.predict(inputs))
    }

    /// One forward/backward/update cycle
    fn train_batch(&mut self, batch: &Batch) -> f32 {
        let mut params = self.model.params_mut();
        self.optimizer.zero_grad(&mut params);
        drop(params);

        let probs = self.model.forward(&batch.inputs);
        let loss = self.loss_fn.forward(&probs, &batch.targets);
        let grad = self.loss_fn.grad_logits(&probs, &batch.targets);
        self.model.backward(&grad);

        let mut params = self.model.params_mut();
        self.optimizer.step(&mut params);
        loss
    }

    /// Mean loss and accuracy over the dataset's batches
    fn evaluate_batches(&self, dataset: &Dataset) -> (f32, f32) {
        let mut total_loss = 0.0;
        let mut num_batches = 0;
        let mut weighted_correct = 0.0;
        let mut seen = 0;

        for batch in dataset.batches(self.config.batch_size) {
            let probs = self.model.predict_proba(&batch.inputs);
            total_loss += self.loss_fn.forward(&probs, &batch.targets);
            num_batches += 1;

            weighted_correct += Accuracy.compute(&probs, &batch.targets) * batch.size() as f32;
            seen += batch.size();
        }

        let loss = if num_batches > 0 {
            total_loss / num_batches as f32
        } else {
            0.0
        };
        let accuracy = if seen > 0 {
            weighted_correct / seen as f32
        } else {
            0.0
        };
        (loss, accuracy)
    }

    fn check_dataset(&self, name: &str, dataset: &Dataset) -> Result<()> {
        if dataset.is_empty() {
            return Err(Error::InvalidConfig(format!("{name} dataset is empty")));
        }
        if dataset.n_features() != self.model.n_features() {
            return Err(Error::ShapeMismatch(format!(
                "{name} dataset has {} features, model expects {}",
                dataset.n_features(),
                self.model.n_features()
            )));
        }
        if let Some(&max_label) = dataset.labels().iter().max() {
            if max_label >= self.model.n_classes() {
                return Err(Error::ShapeMismatch(format!(
                    "{name} dataset has label {max_label}, model has {} classes",
                    self.model.n_classes()
                )));
            }
        }
        Ok(())
    }

    fn check_width(&self, inputs: &Array2<f32>) -> Result<()> {
        if inputs.ncols() != self.model.n_features() {
            return Err(Error::ShapeMismatch(format!(
                "inputs have {} features, model expects {}",
                inputs.ncols(),
                self.model.n_features()
            )));
        }
        Ok(())
    }

    fn elapsed(&self) -> f64 {
        self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64())
    }
}
