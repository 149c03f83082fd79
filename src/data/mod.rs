//! In-memory datasets and batching
//!
//! A [`Dataset`] pairs a feature matrix of shape `(n_samples, n_features)`
//! with a label vector of class indices. Datasets are immutable once
//! constructed; splitting and batching produce new owned arrays.

mod batch;

pub use batch::Batch;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{Error, Result};

/// A fixed collection of (feature-vector, label) pairs
///
/// # Example
///
/// ```
/// use ajustar::data::Dataset;
/// use ndarray::{array, Array1};
///
/// let features = array![[0.0f32, 1.0], [1.0, 0.0], [1.0, 1.0]];
/// let labels: Array1<usize> = array![0, 1, 1];
///
/// let dataset = Dataset::new(features, labels).unwrap();
/// assert_eq!(dataset.len(), 3);
/// assert_eq!(dataset.n_features(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Array1<usize>,
}

impl Dataset {
    /// Create a dataset, checking that every sample has a label
    pub fn new(features: Array2<f32>, labels: Array1<usize>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of each feature vector
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// View of the feature matrix
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// View of the label vector
    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    /// Split into (train, validation) with a shuffled, seeded partition
    ///
    /// `val_fraction` must lie strictly between 0 and 1, and both sides of
    /// the split must end up non-empty.
    pub fn split(&self, val_fraction: f32, rng: &mut StdRng) -> Result<(Dataset, Dataset)> {
        if !(val_fraction > 0.0 && val_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "val_fraction must be in (0, 1), got {val_fraction}"
            )));
        }
        let n_val = ((self.len() as f32) * val_fraction).round() as usize;
        if n_val == 0 || n_val == self.len() {
            return Err(Error::InvalidConfig(format!(
                "val_fraction {val_fraction} leaves an empty split for {} samples",
                self.len()
            )));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        let (val_idx, train_idx) = indices.split_at(n_val);

        Ok((self.select(train_idx), self.select(val_idx)))
    }

    /// Batches in sample order
    pub fn batches(&self, batch_size: usize) -> Vec<Batch> {
        let indices: Vec<usize> = (0..self.len()).collect();
        self.batches_from(&indices, batch_size)
    }

    /// Batches over a fresh shuffle of the samples
    pub fn shuffled_batches(&self, batch_size: usize, rng: &mut StdRng) -> Vec<Batch> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        self.batches_from(&indices, batch_size)
    }

    fn batches_from(&self, indices: &[usize], batch_size: usize) -> Vec<Batch> {
        let batch_size = batch_size.max(1);
        indices
            .chunks(batch_size)
            .map(|chunk| {
                Batch::new(
                    self.features.select(Axis(0), chunk),
                    self.labels.select(Axis(0), chunk),
                )
            })
            .collect()
    }

    /// Row-gather a subset of the dataset
    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    proptest! {
        /// Split never loses or duplicates samples
        #[test]
        fn split_preserves_sample_count(
            n in 4usize..200,
            fraction in 0.1f32..0.9,
            seed in 0u64..1000,
        ) {
            let features = Array2::from_shape_fn((n, 2), |(i, j)| (i + j) as f32);
            let labels = Array1::from_shape_fn(n, |i| i % 2);
            let dataset = Dataset::new(features, labels).unwrap();

            let mut rng = StdRng::seed_from_u64(seed);
            if let Ok((train, val)) = dataset.split(fraction, &mut rng) {
                prop_assert_eq!(train.len() + val.len(), n);
                prop_assert!(!train.is_empty());
                prop_assert!(!val.is_empty());
            }
        }

        /// Batching covers every sample exactly once
        #[test]
        fn batches_partition_samples(
            n in 1usize..100,
            batch_size in 1usize..40,
        ) {
            let features = Array2::from_shape_fn((n, 2), |(i, _)| i as f32);
            let labels = Array1::from_shape_fn(n, |i| i % 2);
            let dataset = Dataset::new(features, labels).unwrap();

            let batches = dataset.batches(batch_size);
            let total: usize = batches.iter().map(Batch::size).sum();
            prop_assert_eq!(total, n);
            for batch in &batches[..batches.len().saturating_sub(1)] {
                prop_assert_eq!(batch.size(), batch_size);
            }
        }
    }
}
