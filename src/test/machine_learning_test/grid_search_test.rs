use super::*;
use crate::metric::ConfusionMatrix;
use std::str::FromStr;

fn quick_grid() -> LogisticRegressionGrid {
    LogisticRegressionGrid {
        learning_rate: vec![1e-4, 1e-3],
        n_iter: vec![500],
        batch_size: vec![16],
    }
}

#[test]
fn test_default_grid_candidates() {
    let grid = LogisticRegressionGrid::default();
    let candidates = grid.candidates(Some(3));

    assert_eq!(candidates.len(), 12);
    assert!(candidates.iter().all(|p| p.random_state == Some(3)));

    // learning_rate varies slowest, batch_size fastest
    assert_eq!(candidates[0].learning_rate, 1e-7);
    assert_eq!(candidates[0].n_iter, 1000);
    assert_eq!(candidates[0].batch_size, 250);
    assert_eq!(candidates[1].batch_size, 500);
    assert_eq!(candidates[2].n_iter, 5000);
    assert_eq!(candidates[4].learning_rate, 1e-6);
    assert_eq!(candidates[11].learning_rate, 1e-5);
}

#[test]
fn test_new_validation_errors() {
    let empty = LogisticRegressionGrid {
        n_iter: vec![],
        ..LogisticRegressionGrid::default()
    };
    assert!(matches!(
        GridSearch::new(empty, 3, Scoring::Accuracy),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        GridSearch::new(LogisticRegressionGrid::default(), 1, Scoring::Accuracy),
        Err(ModelError::InputValidationError(_))
    ));

    let search = GridSearch::new(quick_grid(), 4, Scoring::F1).unwrap();
    assert_eq!(search.get_cv(), 4);
    assert_eq!(search.get_scoring(), Scoring::F1);
    assert_eq!(search.get_grid(), &quick_grid());
}

#[test]
fn test_scoring_parse_and_serde() {
    assert_eq!(Scoring::from_str("F1").unwrap(), Scoring::F1);
    assert_eq!(Scoring::from_str("recall").unwrap(), Scoring::Recall);
    assert!(Scoring::from_str("roc_auc").is_err());

    assert_eq!(serde_json::to_string(&Scoring::Precision).unwrap(), "\"precision\"");
    let parsed: Scoring = serde_json::from_str("\"accuracy\"").unwrap();
    assert_eq!(parsed, Scoring::Accuracy);
    assert_eq!(Scoring::default(), Scoring::Accuracy);
    assert_eq!(Scoring::F1.to_string(), "f1");
}

#[test]
fn test_scoring_score() {
    let cm = ConfusionMatrix::new(&array![1.0, 1.0, 0.0, 0.0], &array![1.0, 0.0, 1.0, 0.0]).unwrap();
    assert_eq!(Scoring::Accuracy.score(&cm), 0.5);
    assert_eq!(Scoring::Precision.score(&cm), 0.5);
    assert_eq!(Scoring::Recall.score(&cm), 0.5);
    assert_eq!(Scoring::F1.score(&cm), 0.5);
}

#[test]
fn test_fit_scores_every_candidate() {
    let data = separable_table();
    let result = GridSearch::new(quick_grid(), 3, Scoring::Accuracy)
        .unwrap()
        .with_random_state(Some(11))
        .fit(&data)
        .unwrap();

    assert_eq!(result.candidates.len(), 2);
    for candidate in &result.candidates {
        assert_eq!(candidate.fold_scores.len(), 3);
        let mean = candidate.fold_scores.iter().sum::<f64>() / 3.0;
        assert!((candidate.mean_score - mean).abs() < 1e-12);
    }

    let max = result
        .candidates
        .iter()
        .map(|c| c.mean_score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(result.best_score, max);
}

#[test]
fn test_fit_tie_keeps_first_candidate() {
    let data = separable_table();
    let result = GridSearch::new(quick_grid(), 3, Scoring::Accuracy)
        .unwrap()
        .with_random_state(Some(11))
        .fit(&data)
        .unwrap();

    // both candidates separate the toy data perfectly
    assert_eq!(result.candidates[0].mean_score, 1.0);
    assert_eq!(result.candidates[1].mean_score, 1.0);
    assert_eq!(result.best_params, result.candidates[0].params);
    assert_eq!(result.best_params.learning_rate, 1e-4);
}

#[test]
fn test_fit_is_reproducible() {
    let data = separable_table();
    let search = GridSearch::new(quick_grid(), 3, Scoring::F1)
        .unwrap()
        .with_random_state(Some(5));

    assert_eq!(search.fit(&data).unwrap(), search.fit(&data).unwrap());
}

#[test]
fn test_fit_too_many_folds() {
    let data = separable_table();
    let result = GridSearch::new(quick_grid(), 30, Scoring::Accuracy)
        .unwrap()
        .fit(&data);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_refit_trains_on_all_rows() {
    let data = separable_table();
    let params = LogisticRegressionParams {
        learning_rate: 1e-4,
        n_iter: 200,
        batch_size: 100,
        random_state: Some(1),
    };
    let model = refit(&data, params).unwrap();

    assert!(model.get_weights().is_some());
    assert_eq!(model.get_batch_indices().unwrap().len(), data.len());
    assert_eq!(model.get_params(), params);
}
