use crate::error::ModelError;
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// Performs validation checks on the input data matrices.
///
/// This function validates that:
/// - The input data matrix is not empty
/// - The input data does not contain NaN or infinite values
/// - When a target vector is provided:
///   - The target vector length matches the number of rows in the input data
///   - The target vector does not contain NaN or infinite values
///
/// # Parameters
///
/// - `x` - A 2D array of feature values where rows represent samples and columns represent features
/// - `y` - An optional 1D array representing the labels corresponding to each sample
///
/// # Returns
///
/// - `Ok(())` - If all validation checks pass
/// - `Err(ModelError::InputValidationError)` - If any validation check fails, with an informative error message
pub fn preliminary_check<S1, S2>(
    x: &ArrayBase<S1, Ix2>,
    y: Option<&ArrayBase<S2, Ix1>>,
) -> Result<(), ModelError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if x.nrows() == 0 {
        return Err(ModelError::InputValidationError(
            "Input data is empty".to_string(),
        ));
    }

    for (i, row) in x.outer_iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            if !val.is_finite() {
                return Err(ModelError::InputValidationError(format!(
                    "Input data contains NaN or infinite value at position [{}][{}]",
                    i, j
                )));
            }
        }
    }

    if let Some(y) = y {
        if y.len() != x.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "Input data and target vector have different lengths, x rows: {}, y length: {}",
                x.nrows(),
                y.len()
            )));
        }

        if y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InputValidationError(
                "Target vector contains NaN or infinite values".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates that every label is 0 or 1.
pub fn validate_binary_labels<S>(y: &ArrayBase<S, Ix1>) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
{
    if y.iter().any(|&val| val != 0.0 && val != 1.0) {
        return Err(ModelError::InputValidationError(
            "Target vector must contain only 0 or 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates that every label is a whole number representable as `i32`.
pub fn validate_integral_labels<S>(y: &ArrayBase<S, Ix1>) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
{
    if let Some(bad) = y
        .iter()
        .find(|&&val| val.fract() != 0.0 || val < i32::MIN as f64 || val > i32::MAX as f64)
    {
        return Err(ModelError::InputValidationError(format!(
            "Class labels must be integers, got {}",
            bad
        )));
    }
    Ok(())
}

/// Validates that the learning rate parameter is positive and finite.
///
/// # Returns
///
/// - `Ok(())` - If the learning rate is valid (positive and finite)
/// - `Err(ModelError::InputValidationError)` - If the learning rate is invalid (non-positive, NaN, or infinite)
pub fn validate_learning_rate(learning_rate: f64) -> Result<(), ModelError> {
    if learning_rate <= 0.0 || !learning_rate.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }

    Ok(())
}

/// Validates that the iteration budget is greater than zero.
pub fn validate_n_iter(n_iter: usize) -> Result<(), ModelError> {
    if n_iter == 0 {
        return Err(ModelError::InputValidationError(
            "n_iter must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the mini-batch size is greater than zero.
pub fn validate_batch_size(batch_size: usize) -> Result<(), ModelError> {
    if batch_size == 0 {
        return Err(ModelError::InputValidationError(
            "batch_size must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
