/// Exhaustive hyperparameter search with stratified cross-validation
pub mod grid_search;
/// This module provides helper functions for machine learning models
pub(crate) mod helper_function;
/// Logistic regression trained by gradient descent on a fixed mini-batch
pub mod logistic_regression;
/// Gaussian / categorical Naive Bayes classifier
pub mod naive_bayes;

pub use grid_search::*;
pub use logistic_regression::*;
pub use naive_bayes::*;
