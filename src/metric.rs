use crate::error::ModelError;
use crate::{Deserialize, Serialize};
use ndarray::Data;
use ndarray::prelude::*;

/// Confusion matrix for binary classification evaluation.
///
/// Values at or above 0.5 count as the positive class.
///
/// # Examples
/// ```rust
/// use ndarray::arr1;
/// use shopper_intent::metric::ConfusionMatrix;
///
/// let predicted = arr1(&[1.0, 0.0, 1.0, 0.0, 1.0]);
/// let actual = arr1(&[1.0, 0.0, 0.0, 0.0, 1.0]);
/// let cm = ConfusionMatrix::new(&predicted, &actual).unwrap();
///
/// let (tp, fp, tn, fn_) = cm.get_counts();
/// assert_eq!((tp, fp, tn, fn_), (2, 1, 2, 0));
/// assert_eq!(cm.to_matrix(), [[2, 1], [0, 2]]);
/// println!("{}", cm.summary());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfusionMatrix {
    tp: usize,
    fp: usize,
    tn: usize,
    fn_: usize,
}

impl ConfusionMatrix {
    /// Create a new confusion matrix.
    ///
    /// # Parameters
    ///
    /// - `predicted` - Predicted labels (>= 0.5 treated as positive)
    /// - `actual` - Ground-truth labels (>= 0.5 treated as positive)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the arrays are empty or have different lengths
    pub fn new<S1, S2>(
        predicted: &ArrayBase<S1, Ix1>,
        actual: &ArrayBase<S2, Ix1>,
    ) -> Result<Self, ModelError>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        if predicted.len() != actual.len() {
            return Err(ModelError::InputValidationError(format!(
                "Input arrays must have the same length. Predicted: {}, Actual: {}",
                predicted.len(),
                actual.len()
            )));
        }

        if predicted.is_empty() {
            return Err(ModelError::InputValidationError(
                "Input arrays must not be empty".to_string(),
            ));
        }

        let mut tp = 0;
        let mut fp = 0;
        let mut tn = 0;
        let mut fn_ = 0;

        for (p, a) in predicted.iter().zip(actual.iter()) {
            match (*p >= 0.5, *a >= 0.5) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }

        Ok(Self { tp, fp, tn, fn_ })
    }

    /// Builds the matrix from integer predictions, as returned by the classifiers.
    pub fn from_predictions<S>(
        predicted: &Array1<i32>,
        actual: &ArrayBase<S, Ix1>,
    ) -> Result<Self, ModelError>
    where
        S: Data<Elem = f64>,
    {
        Self::new(&predicted.mapv(f64::from), actual)
    }

    /// Get the components of the confusion matrix.
    ///
    /// # Returns
    ///
    /// - `(usize, usize, usize, usize)` - Tuple of (tp, fp, tn, fn) counts
    pub fn get_counts(&self) -> (usize, usize, usize, usize) {
        (self.tp, self.fp, self.tn, self.fn_)
    }

    /// Counts laid out as `[[tn, fp], [fn, tp]]` (rows: actual, columns: predicted).
    pub fn to_matrix(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN).
    ///
    /// # Returns
    ///
    /// - `f64` - Accuracy in the range \[0.0, 1.0\]
    pub fn accuracy(&self) -> f64 {
        let total = self.tp + self.tn + self.fp + self.fn_;
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// Calculate precision: TP / (TP + FP).
    ///
    /// # Returns
    ///
    /// - `f64` - Precision in the range \[0.0, 1.0\] (returns 0.0 when there are no positive predictions)
    pub fn precision(&self) -> f64 {
        if self.tp + self.fp == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fp) as f64
    }

    /// Calculate recall (sensitivity): TP / (TP + FN).
    ///
    /// # Returns
    ///
    /// - `f64` - Recall in the range \[0.0, 1.0\] (returns 0.0 when there are no actual positives)
    pub fn recall(&self) -> f64 {
        if self.tp + self.fn_ == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fn_) as f64
    }

    /// Calculate F1 score: 2 * (Precision * Recall) / (Precision + Recall).
    ///
    /// # Returns
    ///
    /// - `f64` - F1 score in the range \[0.0, 1.0\] (returns 0.0 when both precision and recall are 0.0)
    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();

        if precision + recall == 0.0 {
            return 0.0;
        }

        2.0 * (precision * recall) / (precision + recall)
    }

    /// `true` when precision is undefined (no positive predictions)
    pub fn precision_is_undefined(&self) -> bool {
        self.tp + self.fp == 0
    }

    /// `true` when recall is undefined (no actual positives)
    pub fn recall_is_undefined(&self) -> bool {
        self.tp + self.fn_ == 0
    }

    /// Generate a formatted summary of the confusion matrix and derived metrics.
    ///
    /// # Returns
    ///
    /// - `String` - Text summary containing matrix counts and metrics with four decimal places
    pub fn summary(&self) -> String {
        format!(
            "Confusion Matrix:\n\
        |                 | Predicted Positive | Predicted Negative |\n\
        |-----------------|--------------------|--------------------|\n\
        | Actual Positive | TP: {:<14} | FN: {:<14} |\n\
        | Actual Negative | FP: {:<14} | TN: {:<14} |\n\
        \n\
        Performance Metrics:\n\
        - Accuracy: {:.4}\n\
        - Precision: {:.4}\n\
        - Recall: {:.4}\n\
        - F1 Score: {:.4}",
            self.tp,
            self.fn_,
            self.fp,
            self.tn,
            self.accuracy(),
            self.precision(),
            self.recall(),
            self.f1_score()
        )
    }
}
