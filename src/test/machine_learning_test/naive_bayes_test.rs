use super::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::PI;

fn page_values_model(labels: Array1<f64>) -> NaiveBayes {
    let x = Table::new(
        names(&["PageValues"]),
        array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]],
    )
    .unwrap();
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);
    NaiveBayes::new(x, labels, &schema).unwrap()
}

/// Numerical `PageValues` plus the one-hot `Month_Feb` / `Month_Nov` and an unrelated column.
fn mixed_table() -> (Table, Array1<f64>) {
    let x = Table::new(
        names(&["PageValues", "Month_Feb", "Month_Nov", "SessionId"]),
        array![
            [0.0, 0.0, 1.0, 17.0],
            [1.0, 1.0, 0.0, 3.0],
            [2.0, 0.0, 1.0, 99.0],
            [10.0, 0.0, 1.0, 5.0],
            [11.0, 0.0, 1.0, 41.0],
            [12.0, 1.0, 1.0, 8.0]
        ],
    )
    .unwrap();
    (x, array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
}

fn mixed_schema() -> FeatureSchema {
    FeatureSchema::new(names(&["PageValues"]), names(&["Month"]))
}

#[test]
fn test_new_resolves_columns() {
    let (x, y) = mixed_table();
    let nb = NaiveBayes::new(x, y, &mixed_schema()).unwrap();

    assert_eq!(nb.get_numerical_columns(), &names(&["PageValues"])[..]);
    assert_eq!(nb.get_categorical_columns(), &names(&["Month_Feb", "Month_Nov"])[..]);
    assert!(nb.get_model().is_none());
    assert_eq!(nb.get_min_std(), None);
}

#[test]
fn test_new_validation_errors() {
    let x = Table::new(names(&["PageValues"]), array![[0.0], [1.0]]).unwrap();
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);

    let result = NaiveBayes::new(x.clone(), array![0.0], &schema);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));

    let result = NaiveBayes::new(x.clone(), array![0.0, 0.5], &schema);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));

    let explicit = schema.with_categorical_columns(names(&["Month_Dec"]));
    let result = NaiveBayes::new(x, array![0.0, 1.0], &explicit);
    assert!(matches!(result, Err(ModelError::SchemaMismatch(_))));
}

#[test]
fn test_priors_sum_to_one() {
    let x = Table::new(
        names(&["PageValues"]),
        array![[0.0], [1.0], [2.0], [3.0], [10.0], [11.0], [12.0]],
    )
    .unwrap();
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);
    let mut nb = NaiveBayes::new(x, array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &schema).unwrap();
    nb.fit().unwrap();

    let model = nb.get_model().unwrap();
    assert_abs_diff_eq!(model.priors().sum(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(model.priors()[0], 4.0 / 7.0, epsilon = 1e-12);
    assert_abs_diff_eq!(model.priors()[1], 3.0 / 7.0, epsilon = 1e-12);
}

#[test]
fn test_gaussian_parameters_use_sample_std() {
    let mut nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    nb.fit().unwrap();

    let (mean, std) = nb.get_gaussian("PageValues", 0).unwrap();
    assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(std, 1.0, epsilon = 1e-12);

    let (mean, std) = nb.get_gaussian("PageValues", 1).unwrap();
    assert_abs_diff_eq!(mean, 11.0, epsilon = 1e-12);
    assert_abs_diff_eq!(std, 1.0, epsilon = 1e-12);

    assert!(nb.get_gaussian("PageValues", 7).is_none());
    assert!(nb.get_gaussian("BounceRates", 0).is_none());
}

#[test]
fn test_predict_separated_groups() {
    let mut nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    nb.fit().unwrap();

    let rows = Table::new(names(&["PageValues"]), array![[0.5], [1.5], [10.5], [11.5]]).unwrap();
    let predictions = nb.predict(&rows).unwrap();
    assert_eq!(predictions, array![0, 0, 1, 1]);
}

#[test]
fn test_log_posterior_values() {
    let mut nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    nb.fit().unwrap();

    let rows = Table::new(names(&["PageValues"]), array![[1.0]]).unwrap();
    let log_posterior = nb.predict_log_posterior(&rows).unwrap();

    assert_eq!(log_posterior.dim(), (1, 2));
    let expected_0 = 0.5f64.ln() - 0.5 * (2.0 * PI).ln();
    let expected_1 = 0.5f64.ln() - 0.5 * (2.0 * PI).ln() - 50.0;
    assert_abs_diff_eq!(log_posterior[[0, 0]], expected_0, epsilon = 1e-9);
    assert_abs_diff_eq!(log_posterior[[0, 1]], expected_1, epsilon = 1e-9);
}

#[test]
fn test_categorical_likelihood_ratio() {
    let (x, y) = mixed_table();
    let mut nb = NaiveBayes::new(x, y, &mixed_schema()).unwrap();
    nb.fit().unwrap();

    // Month_Nov: 5 ones overall, 2 in class 0, 3 in class 1
    assert_abs_diff_eq!(nb.get_likelihood("Month_Nov", 0).unwrap(), 3.0 / 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(nb.get_likelihood("Month_Nov", 1).unwrap(), 4.0 / 5.0, epsilon = 1e-12);
    // Month_Feb: 2 ones overall, 1 per class
    assert_abs_diff_eq!(nb.get_likelihood("Month_Feb", 0).unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(nb.get_likelihood("Month_Feb", 1).unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_categorical_term_ignores_row_value() {
    let (x, y) = mixed_table();
    let mut nb = NaiveBayes::new(x, y, &mixed_schema()).unwrap();
    nb.fit().unwrap();

    let cols = names(&["PageValues", "Month_Feb", "Month_Nov", "SessionId"]);
    let a = Table::new(cols.clone(), array![[5.0, 0.0, 0.0, 1.0]]).unwrap();
    let b = Table::new(cols, array![[5.0, 1.0, 1.0, 1000.0]]).unwrap();

    let lp_a = nb.predict_log_posterior(&a).unwrap();
    let lp_b = nb.predict_log_posterior(&b).unwrap();
    for (a, b) in lp_a.iter().zip(lp_b.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_scaling_likelihoods_keeps_predictions() {
    let (x, y) = mixed_table();
    let mut nb = NaiveBayes::new(x.clone(), y, &mixed_schema()).unwrap();
    nb.fit().unwrap();
    let before = nb.predict(&x).unwrap();

    nb.likelihoods_mut().unwrap().mapv_inplace(|l| l * 3.0);
    let after = nb.predict(&x).unwrap();

    assert_eq!(before, after);
}

#[test]
fn test_classes_in_first_appearance_order() {
    let mut nb = page_values_model(array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
    nb.fit().unwrap();

    assert_eq!(nb.get_model().unwrap().classes(), &[1, 0]);

    let rows = Table::new(names(&["PageValues"]), array![[1.0], [11.0]]).unwrap();
    assert_eq!(nb.predict(&rows).unwrap(), array![1, 0]);
}

#[test]
fn test_tie_goes_to_first_class() {
    let x = Table::new(
        names(&["PageValues"]),
        array![[0.0], [1.0], [2.0], [0.0], [1.0], [2.0]],
    )
    .unwrap();
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);
    let mut nb = NaiveBayes::new(x, array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0], &schema).unwrap();
    nb.fit().unwrap();

    let rows = Table::new(names(&["PageValues"]), array![[0.3], [1.7]]).unwrap();
    assert_eq!(nb.predict(&rows).unwrap(), array![1, 1]);
}

#[test]
fn test_predict_not_fitted() {
    let nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let rows = Table::new(names(&["PageValues"]), array![[1.0]]).unwrap();

    assert!(matches!(nb.predict(&rows), Err(ModelError::NotFitted)));
    assert!(matches!(nb.predict_log_posterior(&rows), Err(ModelError::NotFitted)));
}

#[test]
fn test_predict_missing_column() {
    let (x, y) = mixed_table();
    let mut nb = NaiveBayes::new(x, y, &mixed_schema()).unwrap();
    nb.fit().unwrap();

    let without_numeric = Table::new(names(&["Month_Feb", "Month_Nov"]), array![[0.0, 1.0]]).unwrap();
    assert!(matches!(
        nb.predict(&without_numeric),
        Err(ModelError::SchemaMismatch(_))
    ));

    let without_categorical = Table::new(names(&["PageValues", "Month_Feb"]), array![[3.0, 1.0]]).unwrap();
    assert!(matches!(
        nb.predict(&without_categorical),
        Err(ModelError::SchemaMismatch(_))
    ));
}

#[test]
fn test_predict_accepts_reordered_columns() {
    let (x, y) = mixed_table();
    let mut nb = NaiveBayes::new(x.clone(), y, &mixed_schema()).unwrap();
    nb.fit().unwrap();

    let reordered = x
        .select_columns(&names(&["Month_Nov", "SessionId", "Month_Feb", "PageValues"]))
        .unwrap();
    assert_eq!(nb.predict(&x).unwrap(), nb.predict(&reordered).unwrap());
}

#[test]
fn test_degenerate_variance() {
    let x = Table::new(
        names(&["PageValues"]),
        array![[4.0], [4.0], [4.0], [10.0], [11.0], [12.0]],
    )
    .unwrap();
    let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);

    let mut nb = NaiveBayes::new(x.clone(), y.clone(), &schema).unwrap();
    match nb.fit() {
        Err(ModelError::DegenerateVariance { feature, class }) => {
            assert_eq!(feature, "PageValues");
            assert_eq!(class, 0);
        }
        other => panic!("expected DegenerateVariance, got {:?}", other.map(|_| ())),
    }
    assert!(nb.get_model().is_none());

    let mut floored = NaiveBayes::new(x, y, &schema)
        .unwrap()
        .with_min_std(1e-3)
        .unwrap();
    floored.fit().unwrap();
    assert_abs_diff_eq!(floored.get_gaussian("PageValues", 0).unwrap().1, 1e-3);
}

#[test]
fn test_single_member_class_is_degenerate() {
    let x = Table::new(names(&["PageValues"]), array![[0.0], [1.0], [2.0], [10.0]]).unwrap();
    let schema = FeatureSchema::new(names(&["PageValues"]), vec![]);
    let mut nb = NaiveBayes::new(x, array![0.0, 0.0, 0.0, 1.0], &schema).unwrap();

    assert!(matches!(
        nb.fit(),
        Err(ModelError::DegenerateVariance { class: 1, .. })
    ));
}

#[test]
fn test_invalid_min_std() {
    let nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    assert!(matches!(
        nb.clone().with_min_std(0.0),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        nb.with_min_std(f64::NAN),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_zero_sum_categorical_column_overflows() {
    let x = Table::new(
        names(&["PageValues", "Month_Dec"]),
        array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [10.0, 0.0], [11.0, 0.0], [12.0, 0.0]],
    )
    .unwrap();
    let mut nb = NaiveBayes::new(x, array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], &mixed_schema()).unwrap();

    assert!(matches!(nb.fit(), Err(ModelError::NumericOverflow(_))));
}

#[test]
fn test_parallel_prediction_matches_sequential() {
    let mut nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    nb.fit().unwrap();

    let n = 1500;
    let values = Array2::from_shape_fn((n, 1), |(i, _)| (i % 13) as f64);
    let rows = Table::new(names(&["PageValues"]), values).unwrap();
    let predictions = nb.predict(&rows).unwrap();

    for (i, &p) in predictions.iter().enumerate() {
        let single = Table::new(names(&["PageValues"]), array![[(i % 13) as f64]]).unwrap();
        assert_eq!(p, nb.predict(&single).unwrap()[0]);
    }
}

#[test]
fn test_classifier_trait() {
    let mut nb = page_values_model(array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    nb.fit().unwrap();

    let classifier: &dyn crate::traits::Classifier = &nb;
    assert_eq!(classifier.name(), "Naive Bayes");
    let rows = Table::new(names(&["PageValues"]), array![[0.0], [12.0]]).unwrap();
    assert_eq!(classifier.predict(&rows).unwrap(), array![0, 1]);
}
