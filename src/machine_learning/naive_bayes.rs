use super::helper_function::{preliminary_check, validate_integral_labels};
use crate::dataset::{FeatureSchema, Table};
use crate::error::ModelError;
use crate::math::{gaussian_log_density, mean_and_sample_std};
use crate::traits::Classifier;
use ahash::AHashMap;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

/// Threshold for enabling parallel prediction in Naive Bayes.
/// Tables with at least this many rows are scored row-parallel.
const NAIVE_BAYES_PARALLEL_THRESHOLD: usize = 1000;

/// Fitted state of a [`NaiveBayes`] classifier.
///
/// Rows of the matrices follow `classes`; columns follow the classifier's
/// numerical (for `means`/`stds`) or categorical (for `likelihoods`) columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NaiveBayesModel {
    classes: Vec<i32>,
    priors: Array1<f64>,
    means: Array2<f64>,
    stds: Array2<f64>,
    likelihoods: Array2<f64>,
}

impl NaiveBayesModel {
    /// Class labels in order of first appearance in the training labels
    pub fn classes(&self) -> &[i32] {
        &self.classes
    }

    pub fn priors(&self) -> &Array1<f64> {
        &self.priors
    }

    pub fn means(&self) -> &Array2<f64> {
        &self.means
    }

    pub fn stds(&self) -> &Array2<f64> {
        &self.stds
    }

    pub fn likelihoods(&self) -> &Array2<f64> {
        &self.likelihoods
    }

    fn class_position(&self, class: i32) -> Option<usize> {
        self.classes.iter().position(|&c| c == class)
    }
}

/// Naive Bayes classifier mixing Gaussian numerical features with smoothed
/// categorical likelihood ratios.
///
/// Numerical features contribute `ln N(x; mean, std)` with per-class mean and
/// sample standard deviation. Each one-hot categorical column contributes the
/// per-class ratio `(Σ column over the class + 1) / (Σ column over all rows)`.
/// Prediction picks the class with the largest log-posterior; ties go to the
/// class that appeared first in the training labels.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shopper_intent::dataset::{FeatureSchema, Table};
/// use shopper_intent::machine_learning::NaiveBayes;
///
/// let x = Table::new(
///     vec!["PageValues".to_string()],
///     array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]],
/// )
/// .unwrap();
/// let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
/// let schema = FeatureSchema::new(vec!["PageValues".to_string()], vec![]);
///
/// let mut model = NaiveBayes::new(x, y, &schema).unwrap();
/// model.fit().unwrap();
///
/// let rows = Table::new(vec!["PageValues".to_string()], array![[1.0], [11.0]]).unwrap();
/// assert_eq!(model.predict(&rows).unwrap().to_vec(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    x_train: Table,
    y_train: Array1<f64>,
    numerical_columns: Vec<String>,
    categorical_columns: Vec<String>,
    min_std: Option<f64>,
    model: Option<NaiveBayesModel>,
}

impl NaiveBayes {
    /// Creates an unfitted classifier over a training table.
    ///
    /// The categorical columns are derived from `schema` (explicit list or prefix
    /// convention, see [`FeatureSchema::resolve`]).
    ///
    /// # Parameters
    ///
    /// - `x_train` - Training features
    /// - `y_train` - One integral class label per training row
    /// - `schema` - Numerical / categorical partition of the columns
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the data is empty, non-finite, mismatched in length, or labels are not integers
    /// - `ModelError::SchemaMismatch` - If an explicit categorical column is missing from `x_train`
    pub fn new(
        x_train: Table,
        y_train: Array1<f64>,
        schema: &FeatureSchema,
    ) -> Result<Self, ModelError> {
        preliminary_check(x_train.values(), Some(&y_train))?;
        validate_integral_labels(&y_train)?;

        let resolved = schema.resolve(x_train.column_names())?;
        debug!(
            "Naive Bayes columns: {} numerical, {} categorical, {} ignored",
            resolved.numerical.len(),
            resolved.categorical.len(),
            x_train.ncols() - resolved.numerical.len() - resolved.categorical.len()
        );

        Ok(NaiveBayes {
            x_train,
            y_train,
            numerical_columns: resolved.numerical,
            categorical_columns: resolved.categorical,
            min_std: None,
            model: None,
        })
    }

    /// Sets a floor for per-class standard deviations.
    ///
    /// Without a floor a constant numerical feature within a class makes `fit`
    /// fail with `ModelError::DegenerateVariance`.
    pub fn with_min_std(mut self, min_std: f64) -> Result<Self, ModelError> {
        if min_std <= 0.0 || !min_std.is_finite() {
            return Err(ModelError::InputValidationError(format!(
                "min_std must be positive and finite, got {}",
                min_std
            )));
        }
        self.min_std = Some(min_std);
        Ok(self)
    }

    get_field!(get_min_std, min_std, Option<f64>);
    get_field_as_ref!(get_model, model, Option<&NaiveBayesModel>);

    pub fn get_numerical_columns(&self) -> &[String] {
        &self.numerical_columns
    }

    pub fn get_categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Fitted `(mean, std)` of a numerical feature within a class.
    pub fn get_gaussian(&self, feature: &str, class: i32) -> Option<(f64, f64)> {
        let model = self.model.as_ref()?;
        let c = model.class_position(class)?;
        let j = self.numerical_columns.iter().position(|f| f == feature)?;
        Some((model.means[[c, j]], model.stds[[c, j]]))
    }

    /// Fitted likelihood ratio of a categorical column within a class.
    pub fn get_likelihood(&self, feature: &str, class: i32) -> Option<f64> {
        let model = self.model.as_ref()?;
        let c = model.class_position(class)?;
        let j = self.categorical_columns.iter().position(|f| f == feature)?;
        Some(model.likelihoods[[c, j]])
    }

    /// Estimates priors, Gaussian parameters and categorical likelihoods.
    ///
    /// # Returns
    ///
    /// - `Result<&mut Self, ModelError>` - A mutable reference to the fitted model or error
    ///
    /// # Errors
    ///
    /// - `ModelError::DegenerateVariance` - If a numerical feature has zero or undefined
    ///   standard deviation within a class and no `min_std` floor is set
    /// - `ModelError::NumericOverflow` - If a categorical column sums to zero over the
    ///   training set, making its likelihood ratio infinite
    pub fn fit(&mut self) -> Result<&mut Self, ModelError> {
        let x = &self.x_train;
        let n_samples = self.y_train.len();

        let mut class_index: AHashMap<i32, usize> = AHashMap::new();
        let mut classes: Vec<i32> = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        for (row, &label) in self.y_train.iter().enumerate() {
            let label = label as i32;
            let idx = *class_index.entry(label).or_insert_with(|| {
                classes.push(label);
                members.push(Vec::new());
                classes.len() - 1
            });
            members[idx].push(row);
        }

        let n_classes = classes.len();
        let priors = Array1::from_iter(
            members
                .iter()
                .map(|rows| rows.len() as f64 / n_samples as f64),
        );

        let n_numerical = self.numerical_columns.len();
        let mut means = Array2::zeros((n_classes, n_numerical));
        let mut stds = Array2::zeros((n_classes, n_numerical));
        for (j, feature) in self.numerical_columns.iter().enumerate() {
            let column = numeric_column(x, feature)?;
            for (c, rows) in members.iter().enumerate() {
                let (mean, std) = mean_and_sample_std(rows.iter().map(|&r| column[r]));
                let std = match self.min_std {
                    Some(floor) if std.is_nan() || std < floor => floor,
                    _ => std,
                };
                if !(std.is_finite() && std > 0.0) {
                    return Err(ModelError::DegenerateVariance {
                        feature: feature.clone(),
                        class: classes[c],
                    });
                }
                means[[c, j]] = mean;
                stds[[c, j]] = std;
            }
        }

        let n_categorical = self.categorical_columns.len();
        let mut likelihoods = Array2::zeros((n_classes, n_categorical));
        for (j, feature) in self.categorical_columns.iter().enumerate() {
            let column = numeric_column(x, feature)?;
            let total = column.sum();
            for (c, rows) in members.iter().enumerate() {
                let in_class: f64 = rows.iter().map(|&r| column[r]).sum();
                let likelihood = (in_class + 1.0) / total;
                if !(likelihood.is_finite() && likelihood > 0.0) {
                    return Err(ModelError::NumericOverflow(format!(
                        "Categorical column '{}' sums to {} over the training set, likelihood ratio is {}",
                        feature, total, likelihood
                    )));
                }
                likelihoods[[c, j]] = likelihood;
            }
        }

        info!(
            "Naive Bayes fitted on {} rows: classes {:?}, priors {:?}",
            n_samples,
            classes,
            priors.to_vec()
        );

        self.model = Some(NaiveBayesModel {
            classes,
            priors,
            means,
            stds,
            likelihoods,
        });

        Ok(self)
    }

    /// Computes the unnormalized log-posterior of every class for every row.
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Shape `(n_rows, n_classes)`, columns ordered like the fitted classes
    ///
    /// # Errors
    ///
    /// - `ModelError::NotFitted` - If `fit` has not been called
    /// - `ModelError::SchemaMismatch` - If `rows` lacks a fitted numerical or categorical column
    /// - `ModelError::InputValidationError` - If `rows` is empty or contains non-finite values
    pub fn predict_log_posterior(&self, rows: &Table) -> Result<Array2<f64>, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotFitted)?;

        if rows.is_empty() {
            return Err(ModelError::InputValidationError(
                "Cannot predict on empty dataset".to_string(),
            ));
        }

        for feature in &self.categorical_columns {
            if rows.column_index(feature).is_none() {
                return Err(ModelError::SchemaMismatch(format!(
                    "Categorical column '{}' seen during fit is missing",
                    feature
                )));
            }
        }
        let numeric_idx = self
            .numerical_columns
            .iter()
            .map(|feature| {
                rows.column_index(feature).ok_or_else(|| {
                    ModelError::SchemaMismatch(format!(
                        "Numerical column '{}' seen during fit is missing",
                        feature
                    ))
                })
            })
            .collect::<Result<Vec<usize>, ModelError>>()?;

        let values = rows.values();
        for &j in &numeric_idx {
            if values.column(j).iter().any(|v| !v.is_finite()) {
                return Err(ModelError::InputValidationError(format!(
                    "Column '{}' contains NaN or infinite values",
                    rows.column_names()[j]
                )));
            }
        }

        // row independent part: ln(prior) + Σ ln(likelihood)
        let base: Array1<f64> = Array1::from_iter((0..model.classes.len()).map(|c| {
            model.priors[c].ln() + model.likelihoods.row(c).iter().map(|l| l.ln()).sum::<f64>()
        }));

        let score_row = |row: ArrayView1<f64>, mut out: ndarray::ArrayViewMut1<f64>| {
            for c in 0..model.classes.len() {
                let mut log_posterior = base[c];
                for (k, &j) in numeric_idx.iter().enumerate() {
                    log_posterior +=
                        gaussian_log_density(row[j], model.means[[c, k]], model.stds[[c, k]])
                            .unwrap_or(f64::NEG_INFINITY);
                }
                out[c] = log_posterior;
            }
        };

        let mut log_posteriors = Array2::zeros((rows.nrows(), model.classes.len()));
        if rows.nrows() >= NAIVE_BAYES_PARALLEL_THRESHOLD {
            log_posteriors
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .zip(values.axis_iter(Axis(0)).into_par_iter())
                .for_each(|(out, row)| score_row(row, out));
        } else {
            for (out, row) in log_posteriors
                .axis_iter_mut(Axis(0))
                .zip(values.axis_iter(Axis(0)))
            {
                score_row(row, out);
            }
        }

        Ok(log_posteriors)
    }

    /// Predicts one class label per row, preserving row order.
    ///
    /// # Errors
    ///
    /// Same as [`NaiveBayes::predict_log_posterior`].
    pub fn predict(&self, rows: &Table) -> Result<Array1<i32>, ModelError> {
        let log_posteriors = self.predict_log_posterior(rows)?;
        let model = self.model.as_ref().ok_or(ModelError::NotFitted)?;

        Ok(log_posteriors
            .axis_iter(Axis(0))
            .map(|scores| {
                let mut best = 0;
                for c in 1..scores.len() {
                    if scores[c] > scores[best] {
                        best = c;
                    }
                }
                model.classes[best]
            })
            .collect())
    }

    #[cfg(test)]
    pub(crate) fn likelihoods_mut(&mut self) -> Option<&mut Array2<f64>> {
        self.model.as_mut().map(|m| &mut m.likelihoods)
    }
}

fn numeric_column<'a>(x: &'a Table, feature: &str) -> Result<ArrayView1<'a, f64>, ModelError> {
    x.column(feature).ok_or_else(|| {
        ModelError::SchemaMismatch(format!("Column '{}' is missing from the training table", feature))
    })
}

impl Classifier for NaiveBayes {
    fn predict(&self, x: &Table) -> Result<Array1<i32>, ModelError> {
        NaiveBayes::predict(self, x)
    }

    fn name(&self) -> &str {
        "Naive Bayes"
    }
}
