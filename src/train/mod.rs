//! High-level training loop
//!
//! This module provides the fit/predict orchestration:
//! - Trainer abstraction over any [`crate::nn::Model`]
//! - Training configuration
//! - Append-only per-epoch history with best-so-far flags
//! - Loss functions and evaluation metrics
//! - Lifecycle callbacks (checkpointing, early stopping, progress)
//!
//! # Example
//!
//! ```no_run
//! use ajustar::data::Dataset;
//! use ajustar::nn::MlpConfig;
//! use ajustar::optim::Sgd;
//! use ajustar::train::{CheckpointCallback, TrainConfig, Trainer};
//!
//! # fn main() -> ajustar::Result<()> {
//! # let dataset: Dataset = todo!();
//! let model = MlpConfig::new(20).with_seed(42).build()?;
//! let mut trainer = Trainer::new(model, Box::new(Sgd::new(0.1, 0.9)), TrainConfig::new());
//! trainer.add_callback(CheckpointCallback::new("best.json"));
//!
//! let result = trainer.fit(&dataset, 20)?;
//! println!("best val accuracy: {:.3}", result.best_val_accuracy);
//! # Ok(())
//! # }
//! ```

pub mod callback;
mod config;
mod history;
mod loss;
mod metrics;
mod result;
mod trainer;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, CheckpointCallback, EarlyStopping,
    ProgressCallback, TrainerCallback,
};
pub use config::TrainConfig;
pub use history::{EpochRecord, History};
pub use loss::{CrossEntropyLoss, LossFn};
pub use metrics::{Accuracy, F1Score, Metric, Precision, Recall};
pub use result::TrainResult;
pub use trainer::Trainer;
