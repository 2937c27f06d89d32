use super::predictor::TextClassifier;
use crate::domain::errors::PredictionError;
use crate::domain::ml::SentimentPipeline;
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Location of the pipeline artifact, relative to the crate directory.
pub const DEFAULT_MODEL_RELATIVE_PATH: &str = "models/sentiment_pipeline.json";

/// Model state resolved once at startup and shared read-only afterwards.
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<dyn TextClassifier>),
    Unavailable { reason: String },
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(model) => write!(f, "Ready({} {})", model.name(), model.version()),
            Self::Unavailable { reason } => write!(f, "Unavailable({})", reason),
        }
    }
}

impl ModelState {
    pub fn ready(model: impl TextClassifier + 'static) -> Self {
        Self::Ready(Arc::new(model))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Shared handle to the loaded model, or `ModelUnavailable`.
    pub fn classifier(&self) -> Result<Arc<dyn TextClassifier>, PredictionError> {
        match self {
            Self::Ready(model) => Ok(Arc::clone(model)),
            Self::Unavailable { reason } => Err(PredictionError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}

pub struct ModelLoader;

impl ModelLoader {
    /// Artifact path anchored at the crate directory, independent of the working directory.
    ///
    /// The directory is `CARGO_MANIFEST_DIR` as captured at compile time, so the
    /// binary reads the artifact that `train` wrote into the same checkout. A
    /// binary copied to another machine still looks in the build tree; ship the
    /// checkout (or rebuild) alongside it.
    pub fn default_model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MODEL_RELATIVE_PATH)
    }

    /// Load the pipeline artifact. Never fails: problems degrade to `Unavailable`.
    pub fn load(path: &Path) -> ModelState {
        if !path.exists() {
            warn!(
                "Model file not found at {:?}. Run the `train` binary to create it; predictions are disabled.",
                path
            );
            return ModelState::unavailable(format!("model file not found at {}", path.display()));
        }

        match Self::read_pipeline(path) {
            Ok(pipeline) => {
                info!(
                    "Successfully loaded model '{}' ({}) from {:?}, classes: {:?}",
                    pipeline.name,
                    TextClassifier::version(&pipeline),
                    path,
                    pipeline.classes()
                );
                ModelState::ready(pipeline)
            }
            Err(e) => {
                error!("Error loading model from {:?}: {:#}", path, e);
                ModelState::unavailable(format!("{:#}", e))
            }
        }
    }

    fn read_pipeline(path: &Path) -> anyhow::Result<SentimentPipeline> {
        let file = File::open(path).context("Failed to open model file")?;
        let pipeline: SentimentPipeline = serde_json::from_reader(BufReader::new(file))
            .context("Failed to deserialize model")?;
        pipeline.validate().context("Model artifact rejected")?;
        Ok(pipeline)
    }
}
