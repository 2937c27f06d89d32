// Model loading, inference capability and offline training
pub mod ml;

// Request validation and response normalization
pub mod prediction;
