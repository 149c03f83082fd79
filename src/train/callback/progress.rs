//! Progress callback for logging training progress

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::Result;

/// Prints per-epoch (and optionally per-batch) progress lines
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    /// Log every N batches (0 disables batch lines)
    log_interval: usize,
}

impl ProgressCallback {
    /// Create progress callback logging every `log_interval` batches
    pub fn new(log_interval: usize) -> Self {
        Self { log_interval }
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 0 }
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        println!(
            "Epoch {}/{} starting (lr: {:.2e})",
            ctx.epoch + 1,
            ctx.max_epochs,
            ctx.lr
        );
        Ok(CallbackAction::Continue)
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        let val_str = match (ctx.val_loss, ctx.val_accuracy) {
            (Some(loss), Some(acc)) => format!(", val_loss: {loss:.4}, val_acc: {acc:.3}"),
            (Some(loss), None) => format!(", val_loss: {loss:.4}"),
            _ => String::new(),
        };

        println!(
            "Epoch {}/{}: loss: {:.4}{} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            ctx.train_loss,
            val_str,
            ctx.elapsed_secs
        );
        Ok(CallbackAction::Continue)
    }

    fn on_batch_end(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        if self.log_interval > 0 && ctx.batch > 0 && ctx.batch.is_multiple_of(self.log_interval) {
            println!(
                "  Batch {}/{}: loss: {:.4}",
                ctx.batch, ctx.batches_per_epoch, ctx.train_loss
            );
        }
        Ok(CallbackAction::Continue)
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}
