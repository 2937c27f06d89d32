pub mod model_loader;
pub mod predictor;
pub mod trainer;

pub use model_loader::{ModelLoader, ModelState};
pub use predictor::TextClassifier;
