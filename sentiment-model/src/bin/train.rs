//! Offline trainer: fits the mock corpus and writes the model artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sentiment_model::{artifact, dataset, SentimentPipeline, ARTIFACT_KEY};

/// Train the sentiment pipeline and save it as an artifact
#[derive(Parser)]
#[command(name = "train")]
#[command(version, about, long_about = None)]
struct Args {
    /// Where to write the artifact
    #[arg(long, short, default_value = ARTIFACT_KEY)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "train=info,sentiment_model=info".into()),
        )
        .init();

    let args = Args::parse();

    let (texts, labels) = dataset::mock_dataset();
    let pipeline = SentimentPipeline::fit(&texts, &labels).context("Failed to fit pipeline")?;

    let bytes = artifact::encode(&pipeline).context("Failed to encode artifact")?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write artifact to {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        documents = texts.len(),
        features = pipeline.num_features(),
        bytes = bytes.len(),
        "Model trained and saved"
    );

    Ok(())
}
