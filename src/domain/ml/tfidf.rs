//! TF-IDF feature extraction over word n-grams.
//!
//! Tokenization follows the usual `\b\w\w+\b` convention: lowercase, words of
//! two or more word characters. Vocabulary columns are assigned in sorted term
//! order so that a refit on the same corpus yields identical artifacts.

use super::stage::{SparseVector, Transformer};
use crate::domain::errors::PipelineError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Inclusive `(min, max)` n-gram sizes
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Keep only the most frequent terms when set
    pub max_features: Option<usize>,
    /// Use `1 + ln(tf)` instead of raw counts
    pub sublinear_tf: bool,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 1,
            max_features: Some(20_000),
            sublinear_tf: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub params: TfidfParams,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(params: TfidfParams) -> Self {
        Self {
            params,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Every vocabulary column must have an idf weight.
    pub fn check_consistency(&self) -> Result<(), PipelineError> {
        let inconsistent = |reason: String| PipelineError::InconsistentArtifact {
            stage: "tfidf_vectorizer",
            reason,
        };
        if self.idf.len() != self.vocabulary.len() {
            return Err(inconsistent(format!(
                "{} idf weights for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|&(_, &index)| index >= self.idf.len())
        {
            return Err(inconsistent(format!(
                "term '{}' maps to column {} of {}",
                term,
                index,
                self.idf.len()
            )));
        }
        Ok(())
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.params.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > words.len() {
                break;
            }
            terms.extend(words.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    fn term_counts(&self, text: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for term in self.analyze(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}

impl Transformer for TfidfVectorizer {
    type Input = String;
    type Output = SparseVector;

    fn name(&self) -> &'static str {
        "tfidf_vectorizer"
    }

    fn fit(&mut self, inputs: &[String]) -> Result<(), PipelineError> {
        if inputs.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_freq: HashMap<String, usize> = HashMap::new();
        for doc in inputs {
            for (term, count) in self.term_counts(doc) {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
                *total_freq.entry(term).or_insert(0) += count;
            }
        }

        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.params.min_df)
            .collect();

        if let Some(limit) = self.params.max_features {
            if kept.len() > limit {
                // Most frequent first, ties broken alphabetically
                kept.sort_by(|(a, _), (b, _)| {
                    let fa = total_freq.get(a).copied().unwrap_or(0);
                    let fb = total_freq.get(b).copied().unwrap_or(0);
                    fb.cmp(&fa).then_with(|| a.cmp(b))
                });
                kept.truncate(limit);
            }
        }

        if kept.is_empty() {
            return Err(PipelineError::EmptyVocabulary {
                min_df: self.params.min_df,
            });
        }

        kept.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n_docs = inputs.len() as f64;
        self.vocabulary = BTreeMap::new();
        self.idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            self.idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            self.vocabulary.insert(term, index);
        }

        Ok(())
    }

    fn transform(&self, inputs: &[String]) -> Result<Vec<SparseVector>, PipelineError> {
        if !self.is_fitted() {
            return Err(PipelineError::NotFitted {
                stage: "tfidf_vectorizer",
            });
        }

        let rows = inputs
            .iter()
            .map(|doc| {
                let mut row: SparseVector = self
                    .term_counts(doc)
                    .into_iter()
                    .filter_map(|(term, count)| {
                        let &col = self.vocabulary.get(&term)?;
                        let tf = if self.params.sublinear_tf {
                            1.0 + (count as f64).ln()
                        } else {
                            count as f64
                        };
                        Some((col, tf * self.idf[col]))
                    })
                    .collect();
                row.sort_by_key(|(col, _)| *col);

                let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in row.iter_mut() {
                        *v /= norm;
                    }
                }
                row
            })
            .collect();

        Ok(rows)
    }
}
