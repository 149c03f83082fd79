//! Callback manager for dispatching events to multiple callbacks

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::Result;

/// Holds registered callbacks and dispatches events in registration order
///
/// A `Stop` returned by any callback short-circuits the remaining
/// callbacks for that event; errors propagate immediately.
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    /// Create new callback manager
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Add a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Get number of callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Fire train begin event
    pub fn on_train_begin(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_train_begin(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, ctx: &CallbackContext<'_>) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx)?;
        }
        Ok(())
    }

    /// Fire epoch begin event
    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_epoch_begin(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire epoch end event
    pub fn on_epoch_end(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_epoch_end(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire batch begin event
    pub fn on_batch_begin(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_batch_begin(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }

    /// Fire batch end event
    pub fn on_batch_end(&mut self, ctx: &CallbackContext<'_>) -> Result<CallbackAction> {
        for cb in &mut self.callbacks {
            if cb.on_batch_end(ctx)? == CallbackAction::Stop {
                return Ok(CallbackAction::Stop);
            }
        }
        Ok(CallbackAction::Continue)
    }
}
