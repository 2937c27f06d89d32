use super::normalizer::normalize;
use super::validation::validate_text;
use crate::application::ml::model_loader::ModelState;
use crate::domain::errors::PredictionError;
use crate::domain::prediction::{PredictionResponse, timestamp_now};
use std::sync::Arc;
use tracing::{debug, error};

/// Validate -> check model -> infer -> normalize, once per request.
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Arc<ModelState>,
}

impl PredictionService {
    pub fn new(model: Arc<ModelState>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    pub async fn predict(&self, text: String) -> Result<PredictionResponse, PredictionError> {
        validate_text(&text)?;
        let classifier = self.model.classifier()?;

        // Inference is CPU-bound; keep it off the async workers
        let (text, native) = tokio::task::spawn_blocking(move || {
            let native = classifier.infer(&text);
            (text, native)
        })
        .await
        .map_err(|e| {
            error!("Inference worker failed: {}", e);
            PredictionError::InferenceFailure {
                message: e.to_string(),
            }
        })?;

        let native = native.map_err(|e| {
            error!("Inference failed: {:#}", e);
            PredictionError::InferenceFailure {
                message: format!("{:#}", e),
            }
        })?;

        let response = normalize(&text, native, timestamp_now())?;
        debug!(
            "Predicted '{}' ({:.3}) for {} chars",
            response.result.sentiment, response.result.confidence, response.text_length
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::TextClassifier;
    use crate::domain::prediction::NativeOutput;
    use serde_json::json;

    /// Emits the `prediction`/`probability` native shape.
    struct LegacyShapeClassifier;

    impl TextClassifier for LegacyShapeClassifier {
        fn classify(&self, _text: &str) -> anyhow::Result<String> {
            Ok("Neutral".to_string())
        }

        fn class_probabilities(&self, _text: &str) -> anyhow::Result<Vec<(String, f64)>> {
            Ok(vec![("Neutral".to_string(), 0.66666)])
        }

        fn infer(&self, text: &str) -> anyhow::Result<NativeOutput> {
            let mut out = NativeOutput::new();
            out.insert("prediction".into(), json!(self.classify(text)?));
            out.insert("probability".into(), json!(0.66666));
            Ok(out)
        }

        fn classes(&self) -> Vec<String> {
            vec!["Neutral".to_string()]
        }

        fn name(&self) -> &str {
            "legacy"
        }

        fn version(&self) -> String {
            "v0".to_string()
        }
    }

    struct FailingClassifier;

    impl TextClassifier for FailingClassifier {
        fn classify(&self, _text: &str) -> anyhow::Result<String> {
            anyhow::bail!("matrix exploded")
        }

        fn class_probabilities(&self, _text: &str) -> anyhow::Result<Vec<(String, f64)>> {
            Ok(Vec::new())
        }

        fn classes(&self) -> Vec<String> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn version(&self) -> String {
            "v0".to_string()
        }
    }

    struct PanickingClassifier;

    impl TextClassifier for PanickingClassifier {
        fn classify(&self, _text: &str) -> anyhow::Result<String> {
            panic!("worker crashed")
        }

        fn class_probabilities(&self, _text: &str) -> anyhow::Result<Vec<(String, f64)>> {
            Ok(Vec::new())
        }

        fn classes(&self) -> Vec<String> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "panicking"
        }

        fn version(&self) -> String {
            "v0".to_string()
        }
    }

    fn service(state: ModelState) -> PredictionService {
        PredictionService::new(Arc::new(state))
    }

    #[tokio::test]
    async fn test_validation_runs_before_availability() {
        let svc = service(ModelState::unavailable("no model"));
        assert!(matches!(
            svc.predict("   ".to_string()).await,
            Err(PredictionError::EmptyInput)
        ));
        assert!(matches!(
            svc.predict("x".repeat(10_001)).await,
            Err(PredictionError::TooLong { .. })
        ));
        assert!(matches!(
            svc.predict("fine text".to_string()).await,
            Err(PredictionError::ModelUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_alternative_shape_is_normalized() {
        let svc = service(ModelState::ready(LegacyShapeClassifier));
        let response = svc.predict("so-so".to_string()).await.unwrap();
        assert_eq!(response.result.sentiment, "neutral");
        assert_eq!(response.result.confidence, 0.667);
        assert_eq!(response.text, "so-so");
        assert_eq!(response.text_length, 5);
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_model_error_becomes_inference_failure() {
        let svc = service(ModelState::ready(FailingClassifier));
        match svc.predict("hello".to_string()).await {
            Err(PredictionError::InferenceFailure { message }) => {
                assert!(message.contains("matrix exploded"))
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.result)),
        }
    }

    #[tokio::test]
    async fn test_worker_panic_becomes_inference_failure() {
        let svc = service(ModelState::ready(PanickingClassifier));
        assert!(matches!(
            svc.predict("hello".to_string()).await,
            Err(PredictionError::InferenceFailure { .. })
        ));
    }
}
