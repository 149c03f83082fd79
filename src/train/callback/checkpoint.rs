//! Checkpoint callback for persisting the best model seen so far

use std::path::{Path, PathBuf};

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::io::save_state;
use crate::Result;

/// Persists model parameters whenever the monitored metric improves
///
/// On epoch end, reads the best-so-far flag of the freshly appended
/// history record and, when set, writes the current parameter state to a
/// single path, overwriting the previous save. Monitors validation
/// accuracy by default; switch to validation loss with
/// [`CheckpointCallback::monitor_val_loss`].
///
/// # Example
///
/// ```
/// use ajustar::train::CheckpointCallback;
///
/// let checkpoint = CheckpointCallback::new("/tmp/best_model.json");
/// assert_eq!(checkpoint.saves(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CheckpointCallback {
    /// Where the best state is written
    path: PathBuf,
    /// Monitor validation loss instead of validation accuracy
    monitor_val_loss: bool,
    /// Number of saves performed
    saves: usize,
    /// Last epoch that triggered a save
    last_saved_epoch: Option<usize>,
}

impl CheckpointCallback {
    /// Create a checkpoint callback writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            monitor_val_loss: false,
            saves: 0,
            last_saved_epoch: None,
        }
    }

    /// Save when validation loss improves rather than validation accuracy
    pub fn monitor_val_loss(mut self) -> Self {
        self.monitor_val_loss = true;
        self
    }

    /// Target path of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of checkpoint writes so far
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Epoch of the most recent save
    pub fn last_saved_epoch(&self) -> Option<usize> {
        self.last_saved_epoch
    }
}

impl TrainerCallback for CheckpointCallback {
    fn on_epoch_end(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        if let Some(record) = ctx.history.latest() {
            let improved = if self.monitor_val_loss {
                record.best_val_loss
            } else {
                record.best_val_accuracy
            };
            if improved {
                save_state(&ctx.model.state(), &self.path)?;
                self.saves += 1;
                self.last_saved_epoch = Some(record.epoch);
            }
        }
        Ok(CallbackAction::Continue)
    }

    fn name(&self) -> &'static str {
        "CheckpointCallback"
    }
}
