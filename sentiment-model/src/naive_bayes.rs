//! Multinomial Naive Bayes classifier over TF-IDF features

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tfidf::SparseVector;

/// Additive (Laplace) smoothing used when fitting
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fitted multinomial Naive Bayes model
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultinomialNb {
    /// Class labels in ascending order
    classes: Vec<i64>,

    /// Log prior per class
    class_log_prior: Vec<f64>,

    /// Log probability of each feature given each class, `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fit the classifier on pre-vectorized documents.
    pub fn fit(
        features: &[SparseVector],
        labels: &[i64],
        num_features: usize,
        alpha: f64,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        if features.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                texts: features.len(),
                labels: labels.len(),
            });
        }

        let classes: Vec<i64> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; num_features]; classes.len()];

        for (vector, label) in features.iter().zip(labels) {
            let Ok(class) = classes.binary_search(label) else {
                continue;
            };
            class_count[class] += 1;
            for &(index, weight) in vector {
                let slot = feature_count[class]
                    .get_mut(index)
                    .ok_or(ModelError::FeatureOutOfRange { index, features: num_features })?;
                *slot += weight;
            }
        }

        let total = features.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let denominator = counts.iter().sum::<f64>() + alpha * num_features as f64;
                counts
                    .iter()
                    .map(|count| ((count + alpha) / denominator).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Joint log likelihood of the document under each class, in class order.
    pub fn joint_log_likelihood(&self, vector: &SparseVector) -> Result<Vec<f64>, ModelError> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                vector.iter().try_fold(*prior, |acc, &(index, weight)| {
                    log_probs
                        .get(index)
                        .map(|lp| acc + weight * lp)
                        .ok_or(ModelError::FeatureOutOfRange {
                            index,
                            features: log_probs.len(),
                        })
                })
            })
            .collect()
    }

    /// Most likely class for the document. Ties go to the lowest label.
    pub fn predict_one(&self, vector: &SparseVector) -> Result<i64, ModelError> {
        let scores = self.joint_log_likelihood(vector)?;

        let mut best: Option<(usize, f64)> = None;
        for (class, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((class, score)),
            }
        }

        best.and_then(|(class, _)| self.classes.get(class).copied())
            .ok_or_else(|| ModelError::Prediction("classifier has no classes".to_string()))
    }

    /// Class labels in ascending order
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Number of features each class row covers
    pub fn num_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    /// Check that a deserialized classifier is internally consistent.
    pub(crate) fn validate(&self, num_features: usize) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classifier has no classes".to_string());
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("class labels must be strictly ascending".to_string());
        }
        if self.class_log_prior.len() != self.classes.len()
            || self.feature_log_prob.len() != self.classes.len()
        {
            return Err("per-class tables do not match the class count".to_string());
        }
        if self.feature_log_prob.iter().any(|row| row.len() != num_features) {
            return Err(format!(
                "feature tables do not cover the {num_features} vectorizer features"
            ));
        }
        Ok(())
    }
}
