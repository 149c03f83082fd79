//! Training lifecycle callbacks
//!
//! Callbacks hook into defined points of the epoch loop — train
//! begin/end, epoch begin/end, batch begin/end — through the
//! [`TrainerCallback`] trait, whose entry points all default to no-ops.
//! The [`CallbackManager`] dispatches events in registration order and
//! short-circuits when a callback requests a stop.

mod checkpoint;
mod early_stopping;
mod manager;
mod progress;
mod traits;

pub use checkpoint::CheckpointCallback;
pub use early_stopping::EarlyStopping;
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
