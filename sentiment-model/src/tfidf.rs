//! TF-IDF vectorizer
//!
//! Term weights use raw counts scaled by a smoothed inverse document
//! frequency, `ln((1 + n) / (1 + df)) + 1`, and each document vector is L2
//! normalised. Vocabulary indices follow the sorted order of the terms.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tokenize::tokenize;

/// Sparse document vector as `(feature index, weight)` pairs, sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Fitted TF-IDF vectorizer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TfidfVectorizer {
    /// Term to feature index
    vocabulary: BTreeMap<String, usize>,

    /// Inverse document frequency per feature index
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from a corpus.
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Result<Self, ModelError> {
        if texts.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();

        let terms: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc in &docs {
            let seen: BTreeSet<usize> = doc
                .iter()
                .filter_map(|token| vocabulary.get(token).copied())
                .collect();
            for index in seen {
                document_frequency[index] += 1;
            }
        }

        let n = texts.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Vectorize a single document. Unknown tokens are ignored, so a text
    /// with no known tokens yields an empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .filter_map(|(index, count)| self.idf.get(index).map(|idf| (index, count * idf)))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut vector {
                *weight /= norm;
            }
        }

        vector
    }

    /// Number of features (vocabulary size)
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    /// Feature index of a term, if it is in the vocabulary
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Check that a deserialized vectorizer is internally consistent.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but idf has {} weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }

        let indices: BTreeSet<usize> = self.vocabulary.values().copied().collect();
        if indices.len() != self.vocabulary.len() || indices.iter().any(|&i| i >= self.idf.len()) {
            return Err("vocabulary indices are not a permutation of feature slots".to_string());
        }

        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err("idf weights must be finite".to_string());
        }

        Ok(())
    }
}
