//! Multinomial naive Bayes over sparse TF-IDF rows.

use super::stage::{Estimator, SparseVector};
use crate::domain::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Additive (Laplace/Lidstone) smoothing
    pub alpha: f64,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MultinomialNb {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            classes: Vec::new(),
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
            n_features: 0,
        }
    }

    /// Declare the feature width before fitting. Rows with wider indices are rejected.
    pub fn set_n_features(&mut self, n_features: usize) {
        self.n_features = n_features;
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Priors and per-class likelihood rows must match the class list and feature width.
    pub fn check_consistency(&self) -> Result<(), PipelineError> {
        let inconsistent = |reason: String| PipelineError::InconsistentArtifact {
            stage: "multinomial_nb",
            reason,
        };
        let n_classes = self.classes.len();
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(inconsistent(format!(
                "{} classes, {} priors, {} likelihood rows",
                n_classes,
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }
        if let Some((class, row)) = self
            .classes
            .iter()
            .zip(&self.feature_log_prob)
            .find(|(_, row)| row.len() != self.n_features)
        {
            return Err(inconsistent(format!(
                "class '{}' has {} feature weights, expected {}",
                class,
                row.len(),
                self.n_features
            )));
        }
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    fn check_row(&self, row: &SparseVector) -> Result<(), PipelineError> {
        match row.iter().find(|(col, _)| *col >= self.n_features) {
            Some((index, _)) => Err(PipelineError::DimensionMismatch {
                expected: self.n_features,
                index: *index,
            }),
            None => Ok(()),
        }
    }

    fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .map(|(col, value)| value * log_probs[*col])
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Estimator for MultinomialNb {
    type Input = SparseVector;

    fn name(&self) -> &'static str {
        "multinomial_nb"
    }

    fn fit(&mut self, inputs: &[SparseVector], labels: &[String]) -> Result<(), PipelineError> {
        if inputs.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        if inputs.len() != labels.len() {
            return Err(PipelineError::LengthMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(PipelineError::TooFewClasses {
                found: classes.len(),
            });
        }

        if self.n_features == 0 {
            self.n_features = inputs
                .iter()
                .flat_map(|row| row.iter().map(|(col, _)| col + 1))
                .max()
                .unwrap_or(0);
        }
        for row in inputs {
            self.check_row(row)?;
        }

        let n_classes = classes.len();
        let mut class_count = vec![0.0_f64; n_classes];
        let mut feature_count = vec![vec![0.0_f64; self.n_features]; n_classes];

        for (row, label) in inputs.iter().zip(labels) {
            // classes is sorted and contains every label
            let Ok(class_idx) = classes.binary_search(label) else {
                continue;
            };
            class_count[class_idx] += 1.0;
            for (col, value) in row {
                feature_count[class_idx][*col] += value;
            }
        }

        let total = inputs.len() as f64;
        self.class_log_prior = class_count.iter().map(|c| (c / total).ln()).collect();

        let smoothing = self.alpha * self.n_features as f64;
        self.feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let denom = (counts.iter().sum::<f64>() + smoothing).ln();
                counts
                    .iter()
                    .map(|c| (c + self.alpha).ln() - denom)
                    .collect()
            })
            .collect();

        self.classes = classes;
        Ok(())
    }

    fn predict(&self, inputs: &[SparseVector]) -> Result<Vec<String>, PipelineError> {
        let probas = self.predict_proba(inputs)?;
        Ok(probas
            .iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |(bi, bp), (i, &p)| {
                        if p > bp { (i, p) } else { (bi, bp) }
                    })
                    .0;
                self.classes[best].clone()
            })
            .collect())
    }

    fn predict_proba(&self, inputs: &[SparseVector]) -> Result<Vec<Vec<f64>>, PipelineError> {
        if !self.is_fitted() {
            return Err(PipelineError::NotFitted {
                stage: "multinomial_nb",
            });
        }

        inputs
            .iter()
            .map(|row| {
                self.check_row(row)?;
                let jll = self.joint_log_likelihood(row);
                let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let log_sum = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
                Ok(jll.iter().map(|v| (v - log_sum).exp()).collect())
            })
            .collect()
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}
