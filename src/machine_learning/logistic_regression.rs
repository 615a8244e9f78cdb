use super::helper_function::{
    preliminary_check, validate_batch_size, validate_binary_labels, validate_learning_rate,
    validate_n_iter,
};
use crate::dataset::Table;
use crate::error::ModelError;
use crate::math::{logistic_loss, sigmoid};
use crate::traits::Classifier;
use crate::{Deserialize, Serialize};
use log::{Level, debug, info, log_enabled, warn};
use ndarray::{Array1, ArrayBase, Axis, Data, Ix2};
use rand::rngs::StdRng;
use rand::{SeedableRng, rng};
use rand_distr::{Distribution, Normal};

/// Threshold for enabling parallel computation in logistic regression.
/// When the number of rows exceeds this value, the sigmoid is applied in
/// parallel. For smaller inputs, sequential processing is used to avoid
/// parallelization overhead.
const LOGISTIC_REGRESSION_PARALLEL_THRESHOLD: usize = 1000;

/// Standard deviation of the zero-mean Gaussian used to initialize the weights.
const WEIGHT_INIT_STD: f64 = 0.1;

/// How often the batch loss is reported at debug level.
const LOSS_LOG_INTERVAL: usize = 1000;

/// Hyperparameters of [`LogisticRegression`].
///
/// # Fields
///
/// - `learning_rate` - Gradient descent step size
/// - `n_iter` - Exact number of gradient steps, there is no early stopping
/// - `batch_size` - Size of the single mini-batch sampled at the start of training
/// - `random_state` - Seed for weight initialization and batch sampling
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LogisticRegressionParams {
    pub learning_rate: f64,
    pub n_iter: usize,
    pub batch_size: usize,
    #[serde(default)]
    pub random_state: Option<u64>,
}

impl Default for LogisticRegressionParams {
    /// # Default Values
    ///
    /// - `learning_rate`: `1e-6`
    /// - `n_iter`: `5000`
    /// - `batch_size`: `500`
    /// - `random_state`: `None`
    fn default() -> Self {
        LogisticRegressionParams {
            learning_rate: 1e-6,
            n_iter: 5000,
            batch_size: 500,
            random_state: None,
        }
    }
}

impl LogisticRegressionParams {
    pub fn with_random_state(mut self, random_state: Option<u64>) -> Self {
        self.random_state = random_state;
        self
    }
}

/// Logistic regression trained by gradient descent on one fixed mini-batch.
///
/// Training appends a constant-1 bias column after the features, draws the
/// weights from `Normal(0, 0.1)`, samples a single batch of row indices without
/// replacement, and then performs exactly `n_iter` updates against that same
/// batch:
///
/// `w <- w - learning_rate * (sigmoid(X_b w) - y_b) X_b / |batch|`
///
/// Prediction thresholds the sigmoid at 0.5 (strictly greater is class 1).
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shopper_intent::dataset::Table;
/// use shopper_intent::machine_learning::{LogisticRegression, LogisticRegressionParams};
///
/// let names = vec!["a".to_string(), "b".to_string()];
/// let x = Table::new(
///     names.clone(),
///     array![[-300.0, -200.0], [-250.0, -220.0], [260.0, 210.0], [310.0, 190.0]],
/// )
/// .unwrap();
/// let y = array![0.0, 0.0, 1.0, 1.0];
///
/// let params = LogisticRegressionParams::default().with_random_state(Some(7));
/// let mut model = LogisticRegression::new(x.clone(), y, params).unwrap();
/// model.train().unwrap();
///
/// let predictions = model.predict(&x).unwrap();
/// assert!(predictions.iter().all(|&p| p == 0 || p == 1));
/// ```
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    x_train: Table,
    y_train: Array1<f64>,
    learning_rate: f64,
    n_iter: usize,
    batch_size: usize,
    random_state: Option<u64>,
    weights: Option<Array1<f64>>,
    batch_indices: Option<Vec<usize>>,
}

impl LogisticRegression {
    /// Creates an untrained model over a training table.
    ///
    /// # Parameters
    ///
    /// - `x_train` - Training features (without bias column)
    /// - `y_train` - Labels, each 0 or 1
    /// - `params` - Hyperparameters
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any hyperparameter is invalid, the data is
    ///   empty or non-finite, lengths differ, or labels are not binary
    pub fn new(
        x_train: Table,
        y_train: Array1<f64>,
        params: LogisticRegressionParams,
    ) -> Result<Self, ModelError> {
        validate_learning_rate(params.learning_rate)?;
        validate_n_iter(params.n_iter)?;
        validate_batch_size(params.batch_size)?;
        preliminary_check(x_train.values(), Some(&y_train))?;
        validate_binary_labels(&y_train)?;

        Ok(LogisticRegression {
            x_train,
            y_train,
            learning_rate: params.learning_rate,
            n_iter: params.n_iter,
            batch_size: params.batch_size,
            random_state: params.random_state,
            weights: None,
            batch_indices: None,
        })
    }

    /// Creates a model with default hyperparameters.
    pub fn with_defaults(x_train: Table, y_train: Array1<f64>) -> Result<Self, ModelError> {
        Self::new(x_train, y_train, LogisticRegressionParams::default())
    }

    // Getters
    get_field!(get_learning_rate, learning_rate, f64);
    get_field!(get_n_iter, n_iter, usize);
    get_field!(get_batch_size, batch_size, usize);
    get_field!(get_random_state, random_state, Option<u64>);
    get_field_as_ref!(get_weights, weights, Option<&Array1<f64>>);

    /// Row indices of the fixed training batch, `None` before training.
    pub fn get_batch_indices(&self) -> Option<&[usize]> {
        self.batch_indices.as_deref()
    }

    /// Column names the model was trained on, in weight order (bias excluded).
    pub fn get_feature_names(&self) -> &[String] {
        self.x_train.column_names()
    }

    pub fn get_params(&self) -> LogisticRegressionParams {
        LogisticRegressionParams {
            learning_rate: self.learning_rate,
            n_iter: self.n_iter,
            batch_size: self.batch_size,
            random_state: self.random_state,
        }
    }

    /// Runs gradient descent for exactly `n_iter` steps.
    ///
    /// When `batch_size` exceeds the number of training rows, the whole training
    /// set becomes the batch.
    ///
    /// # Returns
    ///
    /// - `Result<&mut Self, ModelError>` - A mutable reference to the trained model or error
    ///
    /// # Errors
    ///
    /// - `ModelError::NumericOverflow` - If the gradient or the weights become NaN or infinite
    pub fn train(&mut self) -> Result<&mut Self, ModelError> {
        let x = self.x_train.with_bias_column();
        let (n_samples, n_features) = x.dim();

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rng()),
        };

        let normal = Normal::new(0.0, WEIGHT_INIT_STD)
            .map_err(|e| ModelError::ProcessingError(e.to_string()))?;
        let mut weights = Array1::from_shape_fn(n_features, |_| normal.sample(&mut rng));

        let batch_size = if self.batch_size > n_samples {
            warn!(
                "batch_size {} exceeds the {} training rows, using every row",
                self.batch_size, n_samples
            );
            n_samples
        } else {
            self.batch_size
        };
        let batch_indices = rand::seq::index::sample(&mut rng, n_samples, batch_size).into_vec();
        let x_batch = x.select(Axis(0), &batch_indices);
        let y_batch = self.y_train.select(Axis(0), &batch_indices);

        #[cfg(feature = "show_progress")]
        let progress_bar = {
            let pb = crate::create_progress_bar(
                self.n_iter as u64,
                "[{elapsed_precise}] {bar:40} {pos}/{len} | Loss: {msg}",
            );
            pb.set_message(format!("{:.6}", f64::INFINITY));
            pb
        };

        for iteration in 0..self.n_iter {
            let scores = x_batch.dot(&weights);
            let gradient = batch_gradient(&x_batch, &scores, &y_batch);

            if gradient.iter().any(|val| !val.is_finite()) {
                #[cfg(feature = "show_progress")]
                progress_bar.finish_with_message("Error: NaN or infinite gradients");
                return Err(ModelError::NumericOverflow(format!(
                    "Gradient calculation resulted in NaN or infinite values at iteration {}",
                    iteration
                )));
            }

            weights.scaled_add(-self.learning_rate, &gradient);

            if weights.iter().any(|val| !val.is_finite()) {
                #[cfg(feature = "show_progress")]
                progress_bar.finish_with_message("Error: NaN or infinite weights");
                return Err(ModelError::NumericOverflow(format!(
                    "Weight update resulted in NaN or infinite values at iteration {}",
                    iteration
                )));
            }

            #[cfg(feature = "show_progress")]
            {
                progress_bar.set_message(format!("{:.6}", logistic_loss(&scores, &y_batch)));
                progress_bar.inc(1);
            }

            if (iteration + 1) % LOSS_LOG_INTERVAL == 0 && log_enabled!(Level::Debug) {
                debug!(
                    "Iteration {}: batch loss {:.6}",
                    iteration + 1,
                    logistic_loss(&scores, &y_batch)
                );
            }
        }

        #[cfg(feature = "show_progress")]
        progress_bar.finish_with_message(format!(
            "{:.6} | Iterations: {}",
            logistic_loss(&x_batch.dot(&weights), &y_batch),
            self.n_iter
        ));

        info!(
            "Logistic regression trained: {} iterations on a fixed batch of {} rows, {} weights",
            self.n_iter,
            batch_size,
            weights.len()
        );

        self.weights = Some(weights);
        self.batch_indices = Some(batch_indices);

        Ok(self)
    }

    /// Predicts the probability of class 1 for each row.
    ///
    /// Columns of `rows` are matched to the training columns by name.
    ///
    /// # Errors
    ///
    /// - `ModelError::NotFitted` - If the model has not been trained yet
    /// - `ModelError::SchemaMismatch` - If the column set differs from the training columns
    /// - `ModelError::InputValidationError` - If input is empty or contains non-finite values
    /// - `ModelError::NumericOverflow` - If the linear scores are not finite
    pub fn predict_proba(&self, rows: &Table) -> Result<Array1<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;

        if rows.is_empty() {
            return Err(ModelError::InputValidationError(
                "Cannot predict on empty dataset".to_string(),
            ));
        }

        if rows.ncols() != self.x_train.ncols() {
            return Err(ModelError::SchemaMismatch(format!(
                "Number of features does not match training data, x columns: {}, expected: {}",
                rows.ncols(),
                self.x_train.ncols()
            )));
        }
        let aligned = rows.select_columns(self.x_train.column_names())?;

        if aligned.values().iter().any(|val| !val.is_finite()) {
            return Err(ModelError::InputValidationError(
                "Input data contains NaN or infinite values".to_string(),
            ));
        }

        let mut predictions = aligned.with_bias_column().dot(weights);
        if predictions.iter().any(|val| !val.is_finite()) {
            return Err(ModelError::NumericOverflow(
                "Linear scores contain NaN or infinite values".to_string(),
            ));
        }

        if predictions.len() >= LOGISTIC_REGRESSION_PARALLEL_THRESHOLD {
            predictions.par_mapv_inplace(sigmoid);
        } else {
            predictions.mapv_inplace(sigmoid);
        }

        Ok(predictions)
    }

    /// Predicts class labels, 1 when the probability is strictly above 0.5.
    ///
    /// # Errors
    ///
    /// Same as [`LogisticRegression::predict_proba`].
    pub fn predict(&self, rows: &Table) -> Result<Array1<i32>, ModelError> {
        let probs = self.predict_proba(rows)?;
        Ok(probs.mapv(|prob| if prob > 0.5 { 1 } else { 0 }))
    }
}

/// `(sigmoid(scores) - y) X / n` for a batch `X` with `n` rows.
fn batch_gradient<S>(x: &ArrayBase<S, Ix2>, scores: &Array1<f64>, y: &Array1<f64>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let mut activations = scores.clone();
    if activations.len() >= LOGISTIC_REGRESSION_PARALLEL_THRESHOLD {
        activations.par_mapv_inplace(sigmoid);
    } else {
        activations.mapv_inplace(sigmoid);
    }
    let errors = activations - y;
    x.t().dot(&errors) / x.nrows() as f64
}

impl Classifier for LogisticRegression {
    fn predict(&self, x: &Table) -> Result<Array1<i32>, ModelError> {
        LogisticRegression::predict(self, x)
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}

