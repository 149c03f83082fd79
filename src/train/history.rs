//! Append-only training history

use serde::{Deserialize, Serialize};

/// Immutable per-epoch metrics snapshot
///
/// The `best_*` flags are derived at record time: a flag is set iff no
/// earlier record holds a strictly better value of that metric (lower is
/// better for losses, higher for accuracy), so ties count as best and the
/// first record sets every flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Epoch index (0-based)
    pub epoch: usize,
    /// Mean training loss over the epoch's batches
    pub train_loss: f32,
    /// Mean validation loss
    pub val_loss: f32,
    /// Validation accuracy
    pub val_accuracy: f32,
    /// Wall-clock duration of the epoch in seconds
    pub duration_secs: f64,
    /// Training loss matched or beat every earlier epoch
    pub best_train_loss: bool,
    /// Validation loss matched or beat every earlier epoch
    pub best_val_loss: bool,
    /// Validation accuracy matched or beat every earlier epoch
    pub best_val_accuracy: bool,
}

/// Ordered sequence of epoch records, growing monotonically during a fit
/// call; records are never mutated once appended
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed epochs
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no epoch has completed yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in epoch order
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// The most recent record
    pub fn latest(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Record one completed epoch, deriving the best-so-far flags
    pub(crate) fn record(
        &mut self,
        train_loss: f32,
        val_loss: f32,
        val_accuracy: f32,
        duration_secs: f64,
    ) -> &EpochRecord {
        let record = EpochRecord {
            epoch: self.records.len(),
            train_loss,
            val_loss,
            val_accuracy,
            duration_secs,
            best_train_loss: !self.records.iter().any(|r| r.train_loss < train_loss),
            best_val_loss: !self.records.iter().any(|r| r.val_loss < val_loss),
            best_val_accuracy: !self.records.iter().any(|r| r.val_accuracy > val_accuracy),
        };
        self.records.push(record);
        // Just pushed, cannot be empty
        self.records.last().expect("record was just pushed")
    }

    /// Lowest validation loss seen so far
    pub fn best_val_loss(&self) -> Option<f32> {
        self.records
            .iter()
            .map(|r| r.val_loss)
            .min_by(f32::total_cmp)
    }

    /// Highest validation accuracy seen so far
    pub fn best_val_accuracy(&self) -> Option<f32> {
        self.records
            .iter()
            .map(|r| r.val_accuracy)
            .max_by(f32::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_sets_every_flag() {
        let mut history = History::new();
        let record = history.record(1.0, 0.9, 0.5, 0.1);
        assert_eq!(record.epoch, 0);
        assert!(record.best_train_loss);
        assert!(record.best_val_loss);
        assert!(record.best_val_accuracy);
    }

    #[test]
    fn test_improvement_sets_flags() {
        let mut history = History::new();
        history.record(1.0, 0.9, 0.5, 0.1);
        let record = history.record(0.8, 0.7, 0.6, 0.1);
        assert!(record.best_train_loss);
        assert!(record.best_val_loss);
        assert!(record.best_val_accuracy);
    }

    #[test]
    fn test_regression_clears_flags() {
        let mut history = History::new();
        history.record(1.0, 0.9, 0.7, 0.1);
        let record = history.record(1.2, 1.1, 0.6, 0.1);
        assert!(!record.best_train_loss);
        assert!(!record.best_val_loss);
        assert!(!record.best_val_accuracy);
    }

    #[test]
    fn test_tie_counts_as_best() {
        let mut history = History::new();
        history.record(1.0, 0.9, 0.7, 0.1);
        let record = history.record(1.0, 0.9, 0.7, 0.1);
        assert!(record.best_train_loss);
        assert!(record.best_val_loss);
        assert!(record.best_val_accuracy);
    }

    #[test]
    fn test_flags_compare_against_all_earlier_epochs() {
        let mut history = History::new();
        history.record(1.0, 0.9, 0.5, 0.1);
        history.record(0.5, 0.4, 0.8, 0.1);
        // Better than the last epoch's neighbors but not the epoch-1 low
        let record = history.record(0.7, 0.6, 0.7, 0.1);
        assert!(!record.best_train_loss);
        assert!(!record.best_val_loss);
        assert!(!record.best_val_accuracy);
    }

    #[test]
    fn test_len_and_latest() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());

        history.record(1.0, 0.9, 0.5, 0.1);
        history.record(0.9, 0.8, 0.6, 0.1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().epoch, 1);
    }

    #[test]
    fn test_best_value_accessors() {
        let mut history = History::new();
        assert!(history.best_val_loss().is_none());

        history.record(1.0, 0.9, 0.5, 0.1);
        history.record(0.9, 0.6, 0.8, 0.1);
        history.record(0.8, 0.7, 0.7, 0.1);
        assert_eq!(history.best_val_loss(), Some(0.6));
        assert_eq!(history.best_val_accuracy(), Some(0.8));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut history = History::new();
        history.record(1.0, 0.9, 0.5, 0.25);

        let json = serde_json::to_string(&history).unwrap();
        let back: History = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records(), history.records());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Best flags agree with a from-scratch scan over all earlier records
        #[test]
        fn best_flags_match_prefix_extrema(
            epochs in prop::collection::vec((0.0f32..10.0, 0.0f32..10.0, 0.0f32..1.0), 1..30),
        ) {
            let mut history = History::new();
            for (train_loss, val_loss, val_accuracy) in &epochs {
                history.record(*train_loss, *val_loss, *val_accuracy, 0.0);
            }

            prop_assert_eq!(history.len(), epochs.len());
            for (i, record) in history.records().iter().enumerate() {
                let earlier = &history.records()[..i];
                prop_assert_eq!(
                    record.best_val_accuracy,
                    earlier.iter().all(|r| r.val_accuracy <= record.val_accuracy)
                );
                prop_assert_eq!(
                    record.best_val_loss,
                    earlier.iter().all(|r| r.val_loss >= record.val_loss)
                );
                prop_assert_eq!(
                    record.best_train_loss,
                    earlier.iter().all(|r| r.train_loss >= record.train_loss)
                );
                prop_assert_eq!(record.epoch, i);
            }
        }
    }
}
