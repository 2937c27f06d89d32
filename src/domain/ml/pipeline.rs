use super::naive_bayes::MultinomialNb;
use super::stage::{Estimator, Transformer};
use super::text_cleaner::TextCleaner;
use super::tfidf::{TfidfParams, TfidfVectorizer};
use crate::domain::errors::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Artifact layout version understood by this build.
pub const PIPELINE_FORMAT_VERSION: u32 = 1;

/// Cleaner -> TF-IDF -> naive Bayes, fitted and applied in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPipeline {
    pub format_version: u32,
    pub name: String,
    pub trained_at: Option<DateTime<Utc>>,
    pub cleaner: TextCleaner,
    pub vectorizer: TfidfVectorizer,
    pub classifier: MultinomialNb,
}

impl Default for SentimentPipeline {
    fn default() -> Self {
        Self::new(TfidfParams::default(), 1.0)
    }
}

impl SentimentPipeline {
    pub fn new(params: TfidfParams, alpha: f64) -> Self {
        Self {
            format_version: PIPELINE_FORMAT_VERSION,
            name: "tfidf-multinomial-nb".to_string(),
            trained_at: None,
            cleaner: TextCleaner,
            vectorizer: TfidfVectorizer::new(params),
            classifier: MultinomialNb::new(alpha),
        }
    }

    pub fn steps(&self) -> [&'static str; 3] {
        [
            self.cleaner.name(),
            self.vectorizer.name(),
            self.classifier.name(),
        ]
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    pub fn fit(&mut self, texts: &[String], labels: &[String]) -> Result<(), PipelineError> {
        if texts.len() != labels.len() {
            return Err(PipelineError::LengthMismatch {
                inputs: texts.len(),
                labels: labels.len(),
            });
        }

        let cleaned = self.cleaner.fit_transform(texts)?;
        let features = self.vectorizer.fit_transform(&cleaned)?;
        self.classifier.set_n_features(self.vectorizer.n_features());
        self.classifier.fit(&features, labels)?;
        self.trained_at = Some(Utc::now());
        Ok(())
    }

    /// Check that a deserialized artifact can serve predictions.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.format_version != PIPELINE_FORMAT_VERSION {
            return Err(PipelineError::UnsupportedVersion {
                found: self.format_version,
                expected: PIPELINE_FORMAT_VERSION,
            });
        }
        if !self.vectorizer.is_fitted() {
            return Err(PipelineError::NotFitted {
                stage: "tfidf_vectorizer",
            });
        }
        if !self.classifier.is_fitted() {
            return Err(PipelineError::NotFitted {
                stage: "multinomial_nb",
            });
        }
        self.vectorizer.check_consistency()?;
        self.classifier.check_consistency()?;
        if self.classifier.n_features() != self.vectorizer.n_features() {
            return Err(PipelineError::InconsistentArtifact {
                stage: "multinomial_nb",
                reason: format!(
                    "classifier expects {} features, vectorizer produces {}",
                    self.classifier.n_features(),
                    self.vectorizer.n_features()
                ),
            });
        }
        Ok(())
    }

    fn features(&self, texts: &[String]) -> Result<Vec<Vec<(usize, f64)>>, PipelineError> {
        let cleaned = self.cleaner.transform(texts)?;
        self.vectorizer.transform(&cleaned)
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<String>, PipelineError> {
        self.classifier.predict(&self.features(texts)?)
    }

    pub fn predict_proba(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, PipelineError> {
        self.classifier.predict_proba(&self.features(texts)?)
    }

    pub fn classify(&self, text: &str) -> Result<String, PipelineError> {
        Ok(self
            .predict(&[text.to_string()])?
            .pop()
            .unwrap_or_default())
    }

    /// Label -> probability, in class order.
    pub fn class_probabilities(&self, text: &str) -> Result<Vec<(String, f64)>, PipelineError> {
        let row = self
            .predict_proba(&[text.to_string()])?
            .pop()
            .unwrap_or_default();
        Ok(self.classes().iter().cloned().zip(row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<String>) {
        let rows = [
            ("great app love it", "Positive"),
            ("amazing fast delivery", "Positive"),
            ("love the food great service", "Positive"),
            ("terrible app crashes", "Negative"),
            ("awful late delivery cold food", "Negative"),
            ("worst service terrible", "Negative"),
            ("it is okay average", "Neutral"),
            ("average delivery okay food", "Neutral"),
        ];
        rows.iter()
            .map(|(t, l)| (t.to_string(), l.to_string()))
            .unzip()
    }

    fn fitted() -> SentimentPipeline {
        let (texts, labels) = corpus();
        let mut pipeline = SentimentPipeline::default();
        pipeline.fit(&texts, &labels).unwrap();
        pipeline
    }

    #[test]
    fn test_fit_then_classify() {
        let pipeline = fitted();
        assert_eq!(pipeline.classify("love this great app").unwrap(), "Positive");
        assert_eq!(pipeline.classify("terrible awful service").unwrap(), "Negative");
        assert!(pipeline.trained_at.is_some());
        assert!(pipeline.validate().is_ok());
    }

    #[test]
    fn test_urls_do_not_affect_prediction() {
        let pipeline = fitted();
        let plain = pipeline.class_probabilities("great app").unwrap();
        let with_url = pipeline
            .class_probabilities("great app https://example.com/terrible")
            .unwrap();
        assert_eq!(plain, with_url);
    }

    #[test]
    fn test_class_probabilities_cover_all_classes() {
        let pipeline = fitted();
        let probs = pipeline.class_probabilities("okay food").unwrap();
        let labels: Vec<&str> = probs.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Negative", "Neutral", "Positive"]);
        let sum: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_steps_in_order() {
        let pipeline = SentimentPipeline::default();
        assert_eq!(
            pipeline.steps(),
            ["text_cleaner", "tfidf_vectorizer", "multinomial_nb"]
        );
    }

    #[test]
    fn test_unfitted_pipeline_fails_validation() {
        let pipeline = SentimentPipeline::default();
        assert!(matches!(
            pipeline.validate(),
            Err(PipelineError::NotFitted { .. })
        ));
        assert!(pipeline.classify("anything").is_err());
    }

    #[test]
    fn test_version_mismatch_fails_validation() {
        let mut pipeline = fitted();
        pipeline.format_version = 99;
        assert!(matches!(
            pipeline.validate(),
            Err(PipelineError::UnsupportedVersion { found: 99, .. })
        ));
    }

    fn edited(pipeline: &SentimentPipeline, edit: impl FnOnce(&mut serde_json::Value)) -> SentimentPipeline {
        let mut value = serde_json::to_value(pipeline).unwrap();
        edit(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_inconsistent_dimensions_fail_validation() {
        let pipeline = fitted();

        let truncated_idf = edited(&pipeline, |v| v["vectorizer"]["idf"] = serde_json::json!([]));
        assert!(matches!(
            truncated_idf.validate(),
            Err(PipelineError::InconsistentArtifact {
                stage: "tfidf_vectorizer",
                ..
            })
        ));

        let wide_classifier = edited(&pipeline, |v| {
            v["classifier"]["n_features"] = serde_json::json!(1_000_000)
        });
        assert!(matches!(
            wide_classifier.validate(),
            Err(PipelineError::InconsistentArtifact {
                stage: "multinomial_nb",
                ..
            })
        ));

        let missing_prior = edited(&pipeline, |v| {
            v["classifier"]["class_log_prior"]
                .as_array_mut()
                .unwrap()
                .pop();
        });
        assert!(missing_prior.validate().is_err());

        let short_row = edited(&pipeline, |v| {
            v["classifier"]["feature_log_prob"][0]
                .as_array_mut()
                .unwrap()
                .pop();
        });
        assert!(short_row.validate().is_err());
    }

    #[test]
    fn test_artifact_survives_json() {
        let pipeline = fitted();
        let json = serde_json::to_string(&pipeline).unwrap();
        let restored: SentimentPipeline = serde_json::from_str(&json).unwrap();
        let before = pipeline.class_probabilities("fast delivery").unwrap();
        let after = restored.class_probabilities("fast delivery").unwrap();
        for ((l1, p1), (l2, p2)) in before.iter().zip(&after) {
            assert_eq!(l1, l2);
            assert!((p1 - p2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_length_mismatch() {
        let mut pipeline = SentimentPipeline::default();
        let err = pipeline
            .fit(&["a".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { .. }));
    }
}
