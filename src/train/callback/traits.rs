//! Core traits and types for the callback system
//!
//! - `CallbackContext` - Training state passed to callbacks
//! - `CallbackAction` - Actions a callback can request
//! - `TrainerCallback` - The trait all callbacks implement

use crate::nn::Model;
use crate::train::History;
use crate::Result;

/// Context passed to callbacks with read access to the trainer's state
///
/// Hooks observe the history and the model through shared borrows; side
/// effects (e.g. writing a checkpoint) are the hook's own responsibility.
pub struct CallbackContext<'a> {
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Total epochs planned
    pub max_epochs: usize,
    /// Current batch within the epoch
    pub batch: usize,
    /// Total batches in the epoch
    pub batches_per_epoch: usize,
    /// Training loss (running mean for batch events, epoch mean afterwards)
    pub train_loss: f32,
    /// Validation loss, available from epoch end onwards
    pub val_loss: Option<f32>,
    /// Validation accuracy, available from epoch end onwards
    pub val_accuracy: Option<f32>,
    /// Current learning rate
    pub lr: f32,
    /// Seconds since training started
    pub elapsed_secs: f64,
    /// The model being trained
    pub model: &'a dyn Model,
    /// Per-epoch records appended so far
    pub history: &'a History,
}

/// Action to take after a callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Continue training normally
    Continue,
    /// Stop training after the current lifecycle point
    Stop,
}

/// Trait for training callbacks
///
/// Implement this trait to hook into training events. All entry points
/// have default no-op implementations, so a callback only implements the
/// events it cares about. Errors propagate out of the fit call unmodified.
pub trait TrainerCallback: Send {
    /// Called before training starts
    fn on_train_begin(&mut self, _ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after training ends
    fn on_train_end(&mut self, _ctx: &CallbackContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called before each epoch
    fn on_epoch_begin(&mut self, _ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after each epoch, once its history record is appended
    fn on_epoch_end(&mut self, _ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called before each training batch
    fn on_batch_begin(&mut self, _ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Called after each training batch
    fn on_batch_end(&mut self, _ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        Ok(CallbackAction::Continue)
    }

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "TrainerCallback"
    }
}
