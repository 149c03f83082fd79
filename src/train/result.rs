//! Training result types

/// Result of a fit call
#[derive(Debug, Clone)]
pub struct TrainResult {
    /// Number of epochs completed
    pub final_epoch: usize,
    /// Training loss of the last completed epoch
    pub final_train_loss: f32,
    /// Validation loss of the last completed epoch
    pub final_val_loss: f32,
    /// Lowest validation loss across all epochs
    pub best_val_loss: f32,
    /// Highest validation accuracy across all epochs
    pub best_val_accuracy: f32,
    /// Whether a callback stopped training before `max_epochs`
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
