use crate::application::prediction::normalizer::round3;
use crate::domain::ml::SentimentPipeline;
use crate::domain::prediction::NativeOutput;
use serde_json::{Map, Value, json};

/// Interface for loaded sentiment models
pub trait TextClassifier: Send + Sync {
    /// Predicted label, in whatever casing the model was trained with
    fn classify(&self, text: &str) -> anyhow::Result<String>;

    /// Probability per class label
    fn class_probabilities(&self, text: &str) -> anyhow::Result<Vec<(String, f64)>>;

    /// Native key/value output consumed by the response normalizer.
    ///
    /// The default shape is `{sentiment, confidence, probabilities}` with
    /// `confidence` the highest class probability. Models with a different
    /// native shape (`prediction`/`label`/`probability`) override this.
    fn infer(&self, text: &str) -> anyhow::Result<NativeOutput> {
        let label = self.classify(text)?;
        let probabilities = self.class_probabilities(text)?;

        let confidence = probabilities
            .iter()
            .map(|(_, p)| *p)
            .fold(f64::NEG_INFINITY, f64::max);
        if !confidence.is_finite() {
            anyhow::bail!("model returned no class probabilities");
        }

        let by_label: Map<String, Value> = probabilities
            .iter()
            .map(|(label, p)| (label.to_lowercase(), json!(round3(*p))))
            .collect();

        let mut output = NativeOutput::new();
        output.insert("sentiment".to_string(), Value::String(label));
        output.insert("confidence".to_string(), json!(confidence));
        output.insert("probabilities".to_string(), Value::Object(by_label));
        Ok(output)
    }

    fn classes(&self) -> Vec<String>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> String;
}

impl TextClassifier for SentimentPipeline {
    fn classify(&self, text: &str) -> anyhow::Result<String> {
        Ok(SentimentPipeline::classify(self, text)?)
    }

    fn class_probabilities(&self, text: &str) -> anyhow::Result<Vec<(String, f64)>> {
        Ok(SentimentPipeline::class_probabilities(self, text)?)
    }

    fn classes(&self) -> Vec<String> {
        SentimentPipeline::classes(self).to_vec()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> String {
        format!("v{}", self.format_version)
    }
}
