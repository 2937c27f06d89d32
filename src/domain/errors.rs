use thiserror::Error;

/// Errors surfaced by the prediction request path.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Text input cannot be empty")]
    EmptyInput,

    #[error("Text is too long (max {max} characters)")]
    TooLong { length: usize, max: usize },

    #[error("Model not loaded: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Prediction failed: {message}")]
    InferenceFailure { message: String },
}

impl PredictionError {
    /// Rejected because of the request text itself
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::TooLong { .. })
    }
}

/// Errors raised while fitting or applying pipeline stages
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Stage '{stage}' has not been fitted")]
    NotFitted { stage: &'static str },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Input/label length mismatch: {inputs} inputs, {labels} labels")]
    LengthMismatch { inputs: usize, labels: usize },

    #[error("Need at least two classes to train, got {found}")]
    TooFewClasses { found: usize },

    #[error("Feature dimension mismatch: expected {expected}, got index {index}")]
    DimensionMismatch { expected: usize, index: usize },

    #[error("Vocabulary is empty after fitting (min_df={min_df})")]
    EmptyVocabulary { min_df: usize },

    #[error("Unsupported pipeline format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Stage '{stage}' is inconsistent: {reason}")]
    InconsistentArtifact { stage: &'static str, reason: String },
}

/// Errors related to scraping app-store reviews
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Store returned status {status} for {app_id}")]
    Status { status: u16, app_id: String },

    #[error("Unexpected response shape: {reason}")]
    MalformedResponse { reason: String },
}
