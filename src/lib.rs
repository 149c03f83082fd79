//! ajustar — a supervised training harness for small feed-forward classifiers
//!
//! This crate provides:
//! - A model seam (`nn::Model`) with a ready-made two-hidden-layer
//!   classifier (`nn::MlpClassifier`): affine → nonlinearity → dropout →
//!   affine → nonlinearity → affine → softmax
//! - A training orchestrator (`train::Trainer`) driving the epoch loop:
//!   batched forward/backward passes, optimizer updates, per-epoch
//!   validation metrics, and an append-only training history
//! - Lifecycle callbacks (`train::callback`) dispatched in registration
//!   order, including best-metric checkpointing and early stopping
//! - Checkpoint I/O (`io`) over a flat JSON parameter state
//!
//! # Example
//!
//! ```no_run
//! use ajustar::data::Dataset;
//! use ajustar::nn::MlpConfig;
//! use ajustar::optim::Sgd;
//! use ajustar::train::{CheckpointCallback, ProgressCallback, TrainConfig, Trainer};
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> ajustar::Result<()> {
//! let features: Array2<f32> = Array2::zeros((100, 20));
//! let labels: Array1<usize> = Array1::zeros(100);
//! let dataset = Dataset::new(features, labels)?;
//!
//! let model = MlpConfig::new(20).with_hidden_units(32).with_seed(42).build()?;
//! let optimizer = Sgd::new(0.1, 0.9);
//! let config = TrainConfig::new().with_batch_size(32).with_seed(42);
//!
//! let mut trainer = Trainer::new(model, Box::new(optimizer), config);
//! trainer.add_callback(ProgressCallback::default());
//! trainer.add_callback(CheckpointCallback::new("best.json"));
//!
//! let result = trainer.fit(&dataset, 20)?;
//! println!("trained {} epochs, best val acc {:.3}", result.final_epoch, result.best_val_accuracy);
//! # Ok(())
//! # }
//! ```

pub mod data;
mod error;
pub mod io;
pub mod nn;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
