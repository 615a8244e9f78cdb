//! # shopper_intent
//!
//! From-scratch binary classifiers for the "online shoppers purchasing intention"
//! table: a Gaussian / categorical Naive Bayes and a logistic regression trained by
//! gradient descent on a fixed mini-batch.
//!
//! Around the two estimators the crate provides CSV ingestion into named-column
//! tables, confusion-matrix evaluation, stratified k-fold grid search for the
//! logistic regression hyperparameters, and JSON persistence of results.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use shopper_intent::prelude::*;
//!
//! let names = vec!["PageValues".to_string(), "Month_Nov".to_string()];
//! let x = Table::new(
//!     names.clone(),
//!     array![[0.0, 1.0], [1.0, 0.0], [2.0, 1.0], [10.0, 1.0], [11.0, 0.0], [12.0, 1.0]],
//! )
//! .unwrap();
//! let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//!
//! let schema = FeatureSchema::new(vec!["PageValues".to_string()], vec!["Month".to_string()]);
//! let mut model = NaiveBayes::new(x.clone(), y, &schema).unwrap();
//! model.fit().unwrap();
//!
//! let predictions = model.predict(&x).unwrap();
//! assert_eq!(predictions.to_vec(), vec![0, 0, 0, 1, 1, 1]);
//! ```
//!
//! ## Logging
//!
//! The library logs through the `log` facade. The `shopper-intent` binary installs
//! `env_logger`, configured by the `SHOPPER_INTENT_LOG` environment variable.
//!
//! ## Features
//!
//! - `show_progress` - Draw a progress bar while logistic regression trains

pub use serde::{Deserialize, Serialize};

/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the
/// specified field. The generated method includes documentation describing the
/// field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_learning_rate)
/// - `$field_name` - The name of the field to access (e.g., learning_rate)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a public getter returning an optional field as `Option<&T>`.
///
/// # Parameters
///
/// - `$method_name` - The identifier for the generated getter method name
/// - `$field_name` - The identifier of the `Option` field to access
/// - `$return_type` - The return type, typically `Option<&Type>`
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field as a reference")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Creates a progress bar in the crate's common style.
///
/// # Parameters
///
/// - `len` - Total number of steps
/// - `template` - `indicatif` template string, falls back to the default bar when invalid
#[cfg(feature = "show_progress")]
pub fn create_progress_bar(len: u64, template: &str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let progress_bar = ProgressBar::new(len);
    progress_bar.set_style(
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    progress_bar
}

/// Run settings read from JSON and overridden from the command line.
pub mod config;

/// Module `dataset` turns CSV files into named-column tables.
///
/// # Main Components
///
/// - `Table` / `LabeledTable` - Numeric matrices with column names (and labels)
/// - `FeatureSchema` - Which columns are numerical and which are one-hot categorical
/// - `read_csv` / `read_dataset` - Loading the shoppers splits
pub mod dataset;

/// Error types shared by every module.
pub mod error;

/// Scoring of fitted classifiers on training and test splits.
pub mod evaluation;

/// Module `machine_learning` provides the classifiers and the hyperparameter search.
///
/// # Main Components
///
/// - `NaiveBayes` - Gaussian likelihoods for numerical columns and, for each one-hot
///   categorical column, the per-class ratio `(Σ column in class + 1) / Σ column overall`
/// - `LogisticRegression` - Fixed mini-batch gradient descent with a bias column
/// - `GridSearch` - Exhaustive search with stratified k-fold cross-validation
pub mod machine_learning;

/// Numerical helpers: the clipped sigmoid, logistic loss and Gaussian log-densities.
pub mod math;

/// Module `metric` provides the binary confusion matrix and its derived scores.
pub mod metric;

/// JSON save / load helpers.
pub mod persistence;

/// Convenience re-exports of the most used types.
pub mod prelude;

/// Traits shared by the classifiers.
pub mod traits;

/// Module `utility` provides data splitting helpers.
pub mod utility;
