//! Sentiment Model - text classification for the inference service
//!
//! This crate provides the fitted model that the inference service loads at
//! startup:
//! - A TF-IDF vectorizer over lowercase word tokens
//! - A multinomial Naive Bayes classifier
//! - A framed binary artifact format for shipping fitted pipelines
//! - The `Predictor` capability the service depends on
//!
//! # Example
//!
//! ```
//! use sentiment_model::{artifact, dataset, Predictor, SentimentPipeline};
//!
//! let (texts, labels) = dataset::mock_dataset();
//! let pipeline = SentimentPipeline::fit(&texts, &labels)?;
//!
//! let bytes = artifact::encode(&pipeline)?;
//! let restored = artifact::decode(&bytes)?;
//!
//! let labels = restored.predict(&["Highly recommend this".to_string()])?;
//! assert_eq!(labels, vec![1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod naive_bayes;
pub mod pipeline;
pub mod tfidf;
pub mod tokenize;

// Re-export main types for convenience
pub use artifact::{ArtifactError, ARTIFACT_KEY};
pub use error::ModelError;
pub use pipeline::{Predictor, SentimentPipeline};
