//! Fitted text-classification pipeline and the `Predictor` capability

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::naive_bayes::{MultinomialNb, DEFAULT_ALPHA};
use crate::tfidf::TfidfVectorizer;

/// Anything that maps texts to discrete labels.
///
/// The surface is batch-shaped: one label per input, in input order.
/// Implementations must be safe to call concurrently from many requests.
pub trait Predictor: Send + Sync {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>, ModelError>;
}

impl std::fmt::Debug for dyn Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Predictor")
    }
}

/// TF-IDF vectorizer followed by a multinomial Naive Bayes classifier
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SentimentPipeline {
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

impl SentimentPipeline {
    /// Fit both stages on a labelled corpus.
    pub fn fit<S: AsRef<str>>(texts: &[S], labels: &[i64]) -> Result<Self, ModelError> {
        if texts.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }

        let vectorizer = TfidfVectorizer::fit(texts)?;
        let features: Vec<_> = texts
            .iter()
            .map(|text| vectorizer.transform(text.as_ref()))
            .collect();
        let classifier =
            MultinomialNb::fit(&features, labels, vectorizer.num_features(), DEFAULT_ALPHA)?;

        debug!(
            documents = texts.len(),
            features = vectorizer.num_features(),
            classes = classifier.classes().len(),
            "Pipeline fitted"
        );

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Label for a single text
    pub fn predict_one(&self, text: &str) -> Result<i64, ModelError> {
        self.classifier.predict_one(&self.vectorizer.transform(text))
    }

    /// Class labels the classifier can emit, ascending
    pub fn classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    /// Vocabulary size
    pub fn num_features(&self) -> usize {
        self.vectorizer.num_features()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.num_features())
    }
}

impl Predictor for SentimentPipeline {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>, ModelError> {
        texts.iter().map(|text| self.predict_one(text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{mock_dataset, NEGATIVE, POSITIVE};

    fn fitted() -> SentimentPipeline {
        let (texts, labels) = mock_dataset();
        SentimentPipeline::fit(&texts, &labels).unwrap()
    }

    #[test]
    fn test_fit_on_mock_dataset() {
        let pipeline = fitted();
        assert_eq!(pipeline.classes(), &[NEGATIVE, POSITIVE]);
        assert!(pipeline.num_features() > 0);
        assert!(pipeline.validate().is_ok());
    }

    #[test]
    fn test_reproduces_training_labels() {
        let pipeline = fitted();
        let (texts, labels) = mock_dataset();

        let inputs: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
        assert_eq!(pipeline.predict(&inputs).unwrap(), labels);
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let pipeline = fitted();
        let inputs = vec![
            "Worst product ever".to_string(),
            "Great service and friendly staff".to_string(),
            String::new(),
        ];

        let labels = pipeline.predict(&inputs).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], NEGATIVE);
        assert_eq!(labels[1], POSITIVE);
        assert!(pipeline.classes().contains(&labels[2]));
    }

    #[test]
    fn test_empty_batch() {
        assert!(fitted().predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        assert!(matches!(
            SentimentPipeline::fit(&["one", "two"], &[1]),
            Err(ModelError::LengthMismatch { texts: 2, labels: 1 })
        ));
    }

    #[test]
    fn test_predictor_as_trait_object() {
        let predictor: std::sync::Arc<dyn Predictor> = std::sync::Arc::new(fitted());
        let labels = predictor.predict(&["Very disappointed".to_string()]).unwrap();
        assert_eq!(labels, vec![NEGATIVE]);
    }
}
