use super::*;
use approx::assert_abs_diff_eq;

fn seeded(seed: u64) -> LogisticRegressionParams {
    LogisticRegressionParams::default().with_random_state(Some(seed))
}

#[test]
fn test_default_params() {
    let params = LogisticRegressionParams::default();
    assert_eq!(params.learning_rate, 1e-6);
    assert_eq!(params.n_iter, 5000);
    assert_eq!(params.batch_size, 500);
    assert_eq!(params.random_state, None);

    let data = separable_table();
    let model = LogisticRegression::with_defaults(data.features, data.labels).unwrap();
    assert_eq!(model.get_params(), params);
    assert!(model.get_weights().is_none());
    assert!(model.get_batch_indices().is_none());
}

#[test]
fn test_new_validation_errors() {
    let data = separable_table();
    let bad_params = [
        LogisticRegressionParams {
            learning_rate: 0.0,
            ..Default::default()
        },
        LogisticRegressionParams {
            learning_rate: f64::INFINITY,
            ..Default::default()
        },
        LogisticRegressionParams {
            n_iter: 0,
            ..Default::default()
        },
        LogisticRegressionParams {
            batch_size: 0,
            ..Default::default()
        },
    ];
    for params in bad_params {
        let result = LogisticRegression::new(data.features.clone(), data.labels.clone(), params);
        assert!(matches!(result, Err(ModelError::InputValidationError(_))));
    }

    let mut labels = data.labels.clone();
    labels[0] = 2.0;
    let result = LogisticRegression::with_defaults(data.features.clone(), labels);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));

    let result = LogisticRegression::with_defaults(data.features.clone(), array![0.0, 1.0]);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_train_sets_weights_with_bias() {
    let data = separable_table();
    let mut model = LogisticRegression::new(data.features, data.labels, seeded(1)).unwrap();
    model.train().unwrap();

    assert_eq!(model.get_weights().unwrap().len(), 3);
    assert_eq!(
        model.get_feature_names(),
        &names(&["Administrative_Duration", "PageValues"])[..]
    );
}

#[test]
fn test_batch_clamped_to_training_rows() {
    let data = separable_table();
    let mut model = LogisticRegression::new(data.features, data.labels, seeded(3)).unwrap();
    model.train().unwrap();

    let mut batch = model.get_batch_indices().unwrap().to_vec();
    batch.sort_unstable();
    assert_eq!(batch, (0..24).collect::<Vec<_>>());
}

#[test]
fn test_batch_sampled_without_replacement() {
    let data = separable_table();
    let params = LogisticRegressionParams {
        batch_size: 10,
        ..seeded(5)
    };
    let mut model = LogisticRegression::new(data.features, data.labels, params).unwrap();
    model.train().unwrap();

    let mut batch = model.get_batch_indices().unwrap().to_vec();
    assert_eq!(batch.len(), 10);
    batch.sort_unstable();
    batch.dedup();
    assert_eq!(batch.len(), 10);
    assert!(batch.iter().all(|&i| i < 24));
}

#[test]
fn test_separable_accuracy() {
    let data = separable_table();
    let mut model =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), seeded(42)).unwrap();
    model.train().unwrap();

    let predictions = model.predict(&data.features).unwrap();
    assert!(predictions.iter().all(|&p| p == 0 || p == 1));

    let correct = predictions
        .iter()
        .zip(data.labels.iter())
        .filter(|&(&p, &y)| p as f64 == y)
        .count();
    assert!(correct as f64 / data.len() as f64 > 0.9);
}

#[test]
fn test_predict_proba_range() {
    let data = separable_table();
    let mut model =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), seeded(8)).unwrap();
    model.train().unwrap();

    let probs = model.predict_proba(&data.features).unwrap();
    assert_eq!(probs.len(), 24);
    assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));

    let predictions = model.predict(&data.features).unwrap();
    for (&p, &label) in probs.iter().zip(predictions.iter()) {
        assert_eq!(label, if p > 0.5 { 1 } else { 0 });
    }
}

#[test]
fn test_same_seed_is_reproducible() {
    let data = separable_table();
    let params = LogisticRegressionParams {
        batch_size: 12,
        n_iter: 300,
        ..seeded(2024)
    };

    let mut first =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), params).unwrap();
    first.train().unwrap();
    let mut second =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), params).unwrap();
    second.train().unwrap();

    assert_eq!(first.get_weights(), second.get_weights());
    assert_eq!(first.get_batch_indices(), second.get_batch_indices());
    assert_eq!(
        first.predict_proba(&data.features).unwrap(),
        second.predict_proba(&data.features).unwrap()
    );
}

#[test]
fn test_predict_not_fitted() {
    let data = separable_table();
    let model = LogisticRegression::with_defaults(data.features.clone(), data.labels).unwrap();

    assert!(matches!(model.predict(&data.features), Err(ModelError::NotFitted)));
    assert!(matches!(
        model.predict_proba(&data.features),
        Err(ModelError::NotFitted)
    ));
}

#[test]
fn test_predict_schema_mismatch() {
    let data = separable_table();
    let mut model =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), seeded(4)).unwrap();
    model.train().unwrap();

    let too_few = Table::new(names(&["PageValues"]), array![[1.0]]).unwrap();
    assert!(matches!(
        model.predict(&too_few),
        Err(ModelError::SchemaMismatch(_))
    ));

    let renamed = Table::new(names(&["Administrative_Duration", "ExitRates"]), array![[1.0, 2.0]])
        .unwrap();
    assert!(matches!(
        model.predict(&renamed),
        Err(ModelError::SchemaMismatch(_))
    ));
}

#[test]
fn test_predict_aligns_columns_by_name() {
    let data = separable_table();
    let mut model =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), seeded(6)).unwrap();
    model.train().unwrap();

    let swapped = data
        .features
        .select_columns(&names(&["PageValues", "Administrative_Duration"]))
        .unwrap();
    let expected = model.predict_proba(&data.features).unwrap();
    let actual = model.predict_proba(&swapped).unwrap();
    for (a, b) in expected.iter().zip(actual.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_exploding_weights_overflow() {
    let x = Table::new(names(&["PageValues"]), array![[1e10], [1e10]]).unwrap();
    let params = LogisticRegressionParams {
        learning_rate: 1e300,
        n_iter: 10,
        batch_size: 2,
        random_state: Some(9),
    };
    let mut model = LogisticRegression::new(x, array![0.0, 1.0], params).unwrap();

    assert!(matches!(model.train(), Err(ModelError::NumericOverflow(_))));
    assert!(model.get_weights().is_none());
}

#[test]
fn test_classifier_trait() {
    let data = separable_table();
    let mut model =
        LogisticRegression::new(data.features.clone(), data.labels.clone(), seeded(10)).unwrap();
    model.train().unwrap();

    let classifier: &dyn crate::traits::Classifier = &model;
    assert_eq!(classifier.name(), "Logistic Regression");
    assert_eq!(
        classifier.predict(&data.features).unwrap(),
        model.predict(&data.features).unwrap()
    );
}
