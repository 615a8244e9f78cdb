use super::logistic_regression::{LogisticRegression, LogisticRegressionParams};
use crate::dataset::LabeledTable;
use crate::error::ModelError;
use crate::metric::ConfusionMatrix;
use crate::utility::stratified_k_fold;
use crate::{Deserialize, Serialize};
use log::info;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Candidate values for each [`LogisticRegressionParams`] field.
///
/// Every combination of the three lists is one grid candidate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogisticRegressionGrid {
    pub learning_rate: Vec<f64>,
    pub n_iter: Vec<usize>,
    pub batch_size: Vec<usize>,
}

impl Default for LogisticRegressionGrid {
    /// # Default Values
    ///
    /// - `learning_rate`: `[1e-7, 1e-6, 1e-5]`
    /// - `n_iter`: `[1000, 5000]`
    /// - `batch_size`: `[250, 500]`
    fn default() -> Self {
        LogisticRegressionGrid {
            learning_rate: vec![1e-7, 1e-6, 1e-5],
            n_iter: vec![1000, 5000],
            batch_size: vec![250, 500],
        }
    }
}

impl LogisticRegressionGrid {
    /// Cartesian product of the three lists, `learning_rate` varying slowest.
    pub fn candidates(&self, random_state: Option<u64>) -> Vec<LogisticRegressionParams> {
        let mut candidates =
            Vec::with_capacity(self.learning_rate.len() * self.n_iter.len() * self.batch_size.len());
        for &learning_rate in &self.learning_rate {
            for &n_iter in &self.n_iter {
                for &batch_size in &self.batch_size {
                    candidates.push(LogisticRegressionParams {
                        learning_rate,
                        n_iter,
                        batch_size,
                        random_state,
                    });
                }
            }
        }
        candidates
    }
}

/// Metric a grid search maximizes on the held-out folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    #[default]
    Accuracy,
    Precision,
    Recall,
    F1,
}

impl Scoring {
    pub fn score(&self, cm: &ConfusionMatrix) -> f64 {
        match self {
            Scoring::Accuracy => cm.accuracy(),
            Scoring::Precision => cm.precision(),
            Scoring::Recall => cm.recall(),
            Scoring::F1 => cm.f1_score(),
        }
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scoring::Accuracy => "accuracy",
            Scoring::Precision => "precision",
            Scoring::Recall => "recall",
            Scoring::F1 => "f1",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accuracy" => Ok(Scoring::Accuracy),
            "precision" => Ok(Scoring::Precision),
            "recall" => Ok(Scoring::Recall),
            "f1" => Ok(Scoring::F1),
            other => Err(format!(
                "unknown scoring '{}', expected one of accuracy, precision, recall, f1",
                other
            )),
        }
    }
}

/// Cross-validated score of one grid candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub params: LogisticRegressionParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

/// Outcome of [`GridSearch::fit`], candidates listed in grid order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSearchResult {
    pub best_params: LogisticRegressionParams,
    pub best_score: f64,
    pub candidates: Vec<CandidateResult>,
}

/// Exhaustive search over a [`LogisticRegressionGrid`] with stratified k-fold
/// cross-validation.
///
/// Candidates are evaluated in parallel. The candidate with the highest mean
/// fold score wins; ties go to the one listed first in the grid.
///
/// # Examples
/// ```rust
/// use ndarray::{Array1, Array2};
/// use shopper_intent::dataset::{LabeledTable, Table};
/// use shopper_intent::machine_learning::{GridSearch, LogisticRegressionGrid, Scoring};
///
/// let values = Array2::from_shape_fn((12, 1), |(i, _)| {
///     if i % 2 == 0 { 100.0 + i as f64 } else { -100.0 - i as f64 }
/// });
/// let labels = Array1::from_shape_fn(12, |i| if i % 2 == 0 { 1.0 } else { 0.0 });
/// let data = LabeledTable::new(Table::new(vec!["x".to_string()], values).unwrap(), labels).unwrap();
///
/// let grid = LogisticRegressionGrid {
///     learning_rate: vec![1e-4, 1e-3],
///     n_iter: vec![200],
///     batch_size: vec![8],
/// };
/// let result = GridSearch::new(grid, 3, Scoring::Accuracy)
///     .unwrap()
///     .with_random_state(Some(42))
///     .fit(&data)
///     .unwrap();
///
/// assert_eq!(result.candidates.len(), 2);
/// assert!(result.best_score >= 0.0 && result.best_score <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: LogisticRegressionGrid,
    cv: usize,
    scoring: Scoring,
    random_state: Option<u64>,
}

impl GridSearch {
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any grid list is empty or `cv < 2`
    pub fn new(
        grid: LogisticRegressionGrid,
        cv: usize,
        scoring: Scoring,
    ) -> Result<Self, ModelError> {
        if grid.learning_rate.is_empty() || grid.n_iter.is_empty() || grid.batch_size.is_empty() {
            return Err(ModelError::InputValidationError(
                "Every grid dimension needs at least one value".to_string(),
            ));
        }

        if cv < 2 {
            return Err(ModelError::InputValidationError(format!(
                "cv must be at least 2, got {}",
                cv
            )));
        }

        Ok(GridSearch {
            grid,
            cv,
            scoring,
            random_state: None,
        })
    }

    /// Seed passed to every candidate model.
    pub fn with_random_state(mut self, random_state: Option<u64>) -> Self {
        self.random_state = random_state;
        self
    }

    get_field!(get_cv, cv, usize);
    get_field!(get_scoring, scoring, Scoring);

    pub fn get_grid(&self) -> &LogisticRegressionGrid {
        &self.grid
    }

    /// Scores every grid candidate on the folds of `data`.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the folds cannot be built or a candidate's
    ///   hyperparameters are invalid
    /// - Any error raised while training or predicting a candidate
    pub fn fit(&self, data: &LabeledTable) -> Result<GridSearchResult, ModelError> {
        let folds = stratified_k_fold(&data.labels, self.cv)?;
        let candidates = self.grid.candidates(self.random_state);

        info!(
            "Grid search: {} candidates x {} folds, scoring {}",
            candidates.len(),
            folds.len(),
            self.scoring
        );

        let results = candidates
            .into_par_iter()
            .map(|params| {
                let fold_scores = folds
                    .iter()
                    .map(|(train_idx, test_idx)| {
                        let train = data.select_rows(train_idx);
                        let test = data.select_rows(test_idx);

                        let mut model =
                            LogisticRegression::new(train.features, train.labels, params)?;
                        model.train()?;

                        let predictions = model.predict(&test.features)?;
                        let cm = ConfusionMatrix::from_predictions(&predictions, &test.labels)?;
                        Ok(self.scoring.score(&cm))
                    })
                    .collect::<Result<Vec<f64>, ModelError>>()?;

                let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
                info!(
                    "learning_rate={:e}, n_iter={}, batch_size={}: mean {} {:.4}",
                    params.learning_rate, params.n_iter, params.batch_size, self.scoring, mean_score
                );

                Ok(CandidateResult {
                    params,
                    fold_scores,
                    mean_score,
                })
            })
            .collect::<Result<Vec<CandidateResult>, ModelError>>()?;

        let mut best: Option<&CandidateResult> = None;
        for candidate in &results {
            if best.is_none_or(|b| candidate.mean_score > b.mean_score) {
                best = Some(candidate);
            }
        }
        let best = best.ok_or_else(|| {
            ModelError::ProcessingError("Grid search produced no candidates".to_string())
        })?;

        let best_params = best.params;
        let best_score = best.mean_score;
        info!(
            "Best candidate: learning_rate={:e}, n_iter={}, batch_size={} ({} {:.4})",
            best_params.learning_rate,
            best_params.n_iter,
            best_params.batch_size,
            self.scoring,
            best_score
        );

        Ok(GridSearchResult {
            best_params,
            best_score,
            candidates: results,
        })
    }
}

/// Trains a fresh model with `params` on all of `data`.
pub fn refit(
    data: &LabeledTable,
    params: LogisticRegressionParams,
) -> Result<LogisticRegression, ModelError> {
    let mut model = LogisticRegression::new(data.features.clone(), data.labels.clone(), params)?;
    model.train()?;
    Ok(model)
}
