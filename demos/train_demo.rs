//! Train a small classifier on synthetic blobs with checkpointing
//!
//! Run with: cargo run --example train_demo

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ajustar::data::Dataset;
use ajustar::nn::MlpConfig;
use ajustar::optim::Sgd;
use ajustar::train::{
    CheckpointCallback, EarlyStopping, ProgressCallback, TrainConfig, Trainer,
};

fn synthetic_blobs(n: usize, n_features: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((n, n_features));
    let mut labels = Array1::zeros(n);
    for i in 0..n {
        let class = i % 2;
        let center = if class == 0 { -1.0 } else { 1.0 };
        for j in 0..n_features {
            features[[i, j]] = center + rng.random_range(-0.8..0.8);
        }
        labels[i] = class;
    }
    Dataset::new(features, labels).expect("features and labels line up")
}

fn main() -> ajustar::Result<()> {
    let dataset = synthetic_blobs(1000, 20, 42);

    let model = MlpConfig::new(20)
        .with_hidden_units(32)
        .with_dropout(0.1)
        .with_seed(7)
        .build()?;

    let config = TrainConfig::new()
        .with_batch_size(32)
        .with_validation_split(0.2)
        .with_seed(7);

    let mut trainer = Trainer::new(model, Box::new(Sgd::new(0.1, 0.9)), config);
    trainer.add_callback(ProgressCallback::default());
    trainer.add_callback(CheckpointCallback::new("best_model.json"));
    trainer.add_callback(EarlyStopping::new(5, 1e-4));

    let result = trainer.fit(&dataset, 20)?;

    println!();
    println!(
        "Done: {} epochs in {:.1}s (stopped early: {})",
        result.final_epoch, result.elapsed_secs, result.stopped_early
    );
    println!(
        "Best val loss {:.4}, best val accuracy {:.3}",
        result.best_val_loss, result.best_val_accuracy
    );

    if let Some(record) = trainer.history().latest() {
        println!(
            "Final epoch: train_loss {:.4}, val_loss {:.4}, val_acc {:.3}",
            record.train_loss, record.val_loss, record.val_accuracy
        );
    }
    println!("Best parameters written to best_model.json");

    Ok(())
}
