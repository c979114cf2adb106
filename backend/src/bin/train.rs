//! crop-train: fit the crop classifier and write the model artifact

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_recommendation_backend::dataset;
use shared::training::{train, TrainingConfig};

#[derive(Parser)]
#[command(name = "crop-train")]
#[command(about = "Train the crop recommendation model from a labelled CSV dataset")]
#[command(version)]
struct Cli {
    /// Labelled dataset (N,P,K,temperature,humidity,ph,rainfall,label)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Output model artifact (JSON)
    #[arg(short, long, default_value = "artifacts/crop_model.json")]
    output: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Random seed for the split and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of samples held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Maximum tree depth (unbounded when omitted)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crop_train=info,crop_recommendation_backend=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let samples = dataset::load_samples(&cli.dataset)?;
    let config = TrainingConfig {
        n_estimators: cli.trees,
        seed: cli.seed,
        test_size: cli.test_size,
        max_depth: cli.max_depth,
    };
    tracing::info!(?config, "Training random forest");

    let outcome = train(&samples, &config).context("training failed")?;
    tracing::info!(
        train_samples = outcome.train_samples,
        test_samples = outcome.test_samples,
        classes = outcome.model.n_classes(),
        "Accuracy: {:.2}%",
        outcome.accuracy() * 100.0
    );
    println!("{}", outcome.report());

    outcome
        .model
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    tracing::info!("Model saved to {}", cli.output.display());

    Ok(())
}
