pub mod naive_bayes;
pub mod pipeline;
pub mod stage;
pub mod text_cleaner;
pub mod tfidf;

pub use naive_bayes::MultinomialNb;
pub use pipeline::{PIPELINE_FORMAT_VERSION, SentimentPipeline};
pub use stage::{Estimator, SparseVector, Transformer};
pub use text_cleaner::{TextCleaner, clean};
pub use tfidf::{TfidfParams, TfidfVectorizer};
