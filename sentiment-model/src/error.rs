use thiserror::Error;

/// Errors raised while fitting or running a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Training corpus is empty")]
    EmptyCorpus,

    #[error("Got {texts} texts but {labels} labels")]
    LengthMismatch { texts: usize, labels: usize },

    #[error("Training corpus produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("Feature index {index} out of range for {features} features")]
    FeatureOutOfRange { index: usize, features: usize },

    #[error("Prediction failed: {0}")]
    Prediction(String),
}
