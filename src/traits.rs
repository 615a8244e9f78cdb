use crate::dataset::Table;
use crate::error::ModelError;
use ndarray::Array1;

/// Common contract of fitted binary classifiers consumed by the evaluation layer.
pub trait Classifier {
    /// Predicts one class label per row of `x`, preserving row order.
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<i32>)` - Predicted labels
    /// - `Err(ModelError::NotFitted)` - If the model has not been fitted yet
    fn predict(&self, x: &Table) -> Result<Array1<i32>, ModelError>;

    /// Human readable model name, used as the key of persisted results
    fn name(&self) -> &str;
}
