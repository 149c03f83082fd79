//! Training configuration

/// Configuration for a fit call
///
/// Validated when training starts; see
/// [`crate::train::Trainer::fit`].
///
/// # Example
///
/// ```
/// use ajustar::train::TrainConfig;
///
/// let config = TrainConfig::new()
///     .with_batch_size(64)
///     .with_validation_split(0.25)
///     .with_seed(42);
/// assert_eq!(config.batch_size, 64);
/// ```
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Samples per training batch
    pub batch_size: usize,
    /// Fraction of the dataset held out for validation by `fit`
    pub validation_split: f32,
    /// Whether to reshuffle the training samples each epoch
    pub shuffle: bool,
    /// Seed for splitting and shuffling (OS entropy when unset)
    pub seed: Option<u64>,
}

impl TrainConfig {
    /// Defaults: batch size 32, 20% validation split, shuffling on
    pub fn new() -> Self {
        Self {
            batch_size: 32,
            validation_split: 0.2,
            shuffle: true,
            seed: None,
        }
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the validation split fraction
    pub fn with_validation_split(mut self, validation_split: f32) -> Self {
        self.validation_split = validation_split;
        self
    }

    /// Enable or disable per-epoch shuffling
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Pin the RNG seed for reproducible splits and shuffles
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new()
    }
}
