//! URL stripping applied before vectorization, at training and at inference time.

use super::stage::Transformer;
use crate::domain::errors::PipelineError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http\S+|www\S+|https\S+").expect("URL pattern is a valid regex")
});

/// Remove URL-like substrings, then trim surrounding whitespace.
pub fn clean(text: &str) -> String {
    URL_PATTERN.replace_all(text, "").trim().to_string()
}

/// Stateless cleaning stage. Fitting learns nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextCleaner;

impl Transformer for TextCleaner {
    type Input = String;
    type Output = String;

    fn name(&self) -> &'static str {
        "text_cleaner"
    }

    fn fit(&mut self, _inputs: &[String]) -> Result<(), PipelineError> {
        Ok(())
    }

    fn transform(&self, inputs: &[String]) -> Result<Vec<String>, PipelineError> {
        Ok(inputs.iter().map(|t| clean(t)).collect())
    }
}
