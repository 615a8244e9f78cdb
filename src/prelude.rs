pub use crate::config::ExperimentConfig;
pub use crate::dataset::{
    DatasetKind, FeatureSchema, LabeledTable, Table, load_feature_subset, read_csv, read_dataset,
};
pub use crate::error::{IoError, ModelError};
pub use crate::evaluation::{Evaluation, SplitMetrics, evaluate};
pub use crate::machine_learning::{
    GridSearch, GridSearchResult, LogisticRegression, LogisticRegressionGrid,
    LogisticRegressionParams, NaiveBayes, Scoring, refit,
};
pub use crate::metric::ConfusionMatrix;
pub use crate::persistence::{load_json, save_json};
pub use crate::traits::Classifier;
pub use crate::utility::stratified_k_fold;
pub use ndarray::{Array1, Array2};
