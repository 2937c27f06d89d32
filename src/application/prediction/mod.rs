pub mod normalizer;
pub mod service;
pub mod validation;

pub use service::PredictionService;
