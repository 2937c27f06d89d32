use crate::domain::errors::PipelineError;

/// A pipeline step that maps inputs to features. `fit` may be a no-op for stateless steps.
pub trait Transformer {
    type Input;
    type Output;

    fn name(&self) -> &'static str;

    fn fit(&mut self, inputs: &[Self::Input]) -> Result<(), PipelineError>;

    fn transform(&self, inputs: &[Self::Input]) -> Result<Vec<Self::Output>, PipelineError>;

    fn fit_transform(
        &mut self,
        inputs: &[Self::Input],
    ) -> Result<Vec<Self::Output>, PipelineError> {
        self.fit(inputs)?;
        self.transform(inputs)
    }
}

/// The final step of a pipeline: learns labels from features.
pub trait Estimator {
    type Input;

    fn name(&self) -> &'static str;

    fn fit(&mut self, inputs: &[Self::Input], labels: &[String]) -> Result<(), PipelineError>;

    fn predict(&self, inputs: &[Self::Input]) -> Result<Vec<String>, PipelineError>;

    /// One row per input, columns ordered as `classes()`.
    fn predict_proba(&self, inputs: &[Self::Input]) -> Result<Vec<Vec<f64>>, PipelineError>;

    fn classes(&self) -> &[String];
}

/// Sparse feature row: `(column, value)` pairs sorted by column.
pub type SparseVector = Vec<(usize, f64)>;
