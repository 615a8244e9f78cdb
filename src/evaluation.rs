use crate::dataset::LabeledTable;
use crate::error::ModelError;
use crate::metric::ConfusionMatrix;
use crate::traits::Classifier;
use crate::{Deserialize, Serialize};
use log::{info, warn};

/// Metrics of one classifier on one data split.
///
/// # Fields
///
/// - `cm` - Confusion matrix as `[[tn, fp], [fn, tp]]`
/// - `precision` - TP / (TP + FP), 0.0 when nothing was predicted positive
/// - `recall` - TP / (TP + FN), 0.0 when the split has no positives
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SplitMetrics {
    pub cm: [[usize; 2]; 2],
    pub precision: f64,
    pub recall: f64,
}

/// Metrics of one classifier on its training and test splits.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Evaluation {
    pub train: SplitMetrics,
    pub test: SplitMetrics,
}

/// Predicts `data` with `model` and scores the predictions against its labels.
///
/// # Errors
///
/// - Any error of `model.predict`
/// - `ModelError::InputValidationError` - If `data` is empty
pub fn evaluate_split<C>(model: &C, data: &LabeledTable) -> Result<SplitMetrics, ModelError>
where
    C: Classifier + ?Sized,
{
    let predictions = model.predict(&data.features)?;
    let cm = ConfusionMatrix::from_predictions(&predictions, &data.labels)?;

    if cm.precision_is_undefined() {
        warn!(
            "{}: precision is ill-defined with no predicted positives, reporting 0.0",
            model.name()
        );
    }
    if cm.recall_is_undefined() {
        warn!(
            "{}: recall is ill-defined with no positive samples, reporting 0.0",
            model.name()
        );
    }

    Ok(SplitMetrics {
        cm: cm.to_matrix(),
        precision: cm.precision(),
        recall: cm.recall(),
    })
}

/// Scores a fitted classifier on the training and test splits.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shopper_intent::dataset::{FeatureSchema, LabeledTable, Table};
/// use shopper_intent::evaluation::evaluate;
/// use shopper_intent::machine_learning::NaiveBayes;
///
/// let names = vec!["PageValues".to_string()];
/// let train = LabeledTable::new(
///     Table::new(names.clone(), array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]]).unwrap(),
///     array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
/// )
/// .unwrap();
/// let test = LabeledTable::new(
///     Table::new(names.clone(), array![[0.5], [11.5]]).unwrap(),
///     array![0.0, 1.0],
/// )
/// .unwrap();
///
/// let schema = FeatureSchema::new(names, vec![]);
/// let mut model = NaiveBayes::new(train.features.clone(), train.labels.clone(), &schema).unwrap();
/// model.fit().unwrap();
///
/// let evaluation = evaluate(&model, &train, &test).unwrap();
/// assert_eq!(evaluation.test.cm, [[1, 0], [0, 1]]);
/// assert_eq!(evaluation.train.recall, 1.0);
/// ```
pub fn evaluate<C>(
    model: &C,
    train: &LabeledTable,
    test: &LabeledTable,
) -> Result<Evaluation, ModelError>
where
    C: Classifier + ?Sized,
{
    let test_metrics = evaluate_split(model, test)?;
    let train_metrics = evaluate_split(model, train)?;

    info!(
        "{}: test precision {:.4}, recall {:.4}; train precision {:.4}, recall {:.4}",
        model.name(),
        test_metrics.precision,
        test_metrics.recall,
        train_metrics.precision,
        train_metrics.recall
    );

    Ok(Evaluation {
        train: train_metrics,
        test: test_metrics,
    })
}
