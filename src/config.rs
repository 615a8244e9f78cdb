use crate::dataset::{DatasetKind, FeatureSchema, LABEL_COLUMN};
use crate::error::IoError;
use crate::machine_learning::{LogisticRegressionGrid, LogisticRegressionParams, Scoring};
use crate::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings of one evaluation or tuning run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
///
/// # Fields
///
/// - `data_dir` - Directory holding the training and test CSV files
/// - `dataset` - Which training split to read
/// - `label_column` - Name of the 0/1 target column
/// - `schema` - Numerical / categorical partition used by Naive Bayes
/// - `naive_bayes_min_std` - Optional floor for per-class standard deviations
/// - `logistic_regression` - Hyperparameters for `evaluate`
/// - `feature_subset` - Optional JSON array of column names to keep for logistic regression
/// - `grid` - Candidate hyperparameters for `tune`
/// - `cv` - Number of stratified folds for `tune`
/// - `scoring` - Metric maximized by `tune`
/// - `seed` - Seed for every random draw, `None` for entropy
/// - `results_file` - Where evaluation results are written
/// - `best_params_file` - Where `tune` writes the winning hyperparameters
///
/// # Example
/// ```rust
/// use shopper_intent::config::ExperimentConfig;
/// use shopper_intent::dataset::DatasetKind;
///
/// let config: ExperimentConfig =
///     serde_json::from_str(r#"{ "dataset": "rbo", "cv": 5 }"#).unwrap();
/// assert_eq!(config.dataset, DatasetKind::Rbo);
/// assert_eq!(config.cv, 5);
/// assert_eq!(config.label_column, "Revenue");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data_dir: PathBuf,
    pub dataset: DatasetKind,
    pub label_column: String,
    pub schema: FeatureSchema,
    pub naive_bayes_min_std: Option<f64>,
    pub logistic_regression: LogisticRegressionParams,
    pub feature_subset: Option<PathBuf>,
    pub grid: LogisticRegressionGrid,
    pub cv: usize,
    pub scoring: Scoring,
    pub seed: Option<u64>,
    pub results_file: PathBuf,
    pub best_params_file: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            data_dir: PathBuf::from("data"),
            dataset: DatasetKind::default(),
            label_column: LABEL_COLUMN.to_string(),
            schema: FeatureSchema::default(),
            naive_bayes_min_std: None,
            logistic_regression: LogisticRegressionParams::default(),
            feature_subset: None,
            grid: LogisticRegressionGrid::default(),
            cv: 3,
            scoring: Scoring::default(),
            seed: None,
            results_file: PathBuf::from("Finetuned_models_smote.json"),
            best_params_file: PathBuf::from("LogisticRegression_bestparams.json"),
        }
    }
}

/// Values given on the command line, `None` where the flag was not set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub dataset: Option<DatasetKind>,
    pub features: Option<PathBuf>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub cv: Option<usize>,
    pub scoring: Option<Scoring>,
    pub params_output: Option<PathBuf>,
}

impl ExperimentConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        crate::persistence::load_json(path)
    }

    /// Replaces every field whose override is set and keeps the rest.
    ///
    /// # Example
    /// ```rust
    /// use shopper_intent::config::{ConfigOverrides, ExperimentConfig};
    ///
    /// let mut config = ExperimentConfig::default();
    /// config.apply_overrides(ConfigOverrides {
    ///     cv: Some(5),
    ///     ..Default::default()
    /// });
    /// assert_eq!(config.cv, 5);
    /// assert_eq!(config.seed, None);
    /// ```
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> &mut Self {
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(kind) = overrides.dataset {
            self.dataset = kind;
        }
        if let Some(path) = overrides.features {
            self.feature_subset = Some(path);
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(path) = overrides.output {
            self.results_file = path;
        }
        if let Some(cv) = overrides.cv {
            self.cv = cv;
        }
        if let Some(scoring) = overrides.scoring {
            self.scoring = scoring;
        }
        if let Some(path) = overrides.params_output {
            self.best_params_file = path;
        }
        self
    }

    /// Logistic regression hyperparameters with the run seed applied.
    pub fn seeded_logistic_regression(&self) -> LogisticRegressionParams {
        self.logistic_regression
            .with_random_state(self.seed.or(self.logistic_regression.random_state))
    }
}
