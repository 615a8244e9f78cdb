use crate::error::ModelError;
use log::warn;
use ndarray::{ArrayBase, Data, Ix1};

/// `(train_indices, test_indices)` of one cross-validation fold.
pub type FoldIndices = (Vec<usize>, Vec<usize>);

/// Splits sample indices into `n_splits` stratified folds without shuffling.
///
/// Each class's indices, taken in dataset order, are cut into `n_splits`
/// contiguous chunks whose sizes differ by at most one (earlier chunks are the
/// larger ones). Fold `k` tests on the `k`-th chunk of every class and trains on
/// everything else. Both index lists of a fold are sorted ascending.
///
/// # Parameters
///
/// - `labels` - Class label of each sample
/// - `n_splits` - Number of folds, at least 2
///
/// # Returns
///
/// - `Result<Vec<FoldIndices>, ModelError>` - One `(train, test)` pair per fold
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If `n_splits < 2`, `n_splits` exceeds the number of
///   samples, labels are not finite, or a fold would end up with no test samples
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use shopper_intent::utility::stratified_k_fold;
///
/// let labels = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
/// let folds = stratified_k_fold(&labels, 2).unwrap();
///
/// assert_eq!(folds[0].1, vec![0, 1, 4]);
/// assert_eq!(folds[1].0, vec![0, 1, 4]);
/// ```
pub fn stratified_k_fold<S>(
    labels: &ArrayBase<S, Ix1>,
    n_splits: usize,
) -> Result<Vec<FoldIndices>, ModelError>
where
    S: Data<Elem = f64>,
{
    let n_samples = labels.len();

    if n_splits < 2 {
        return Err(ModelError::InputValidationError(format!(
            "n_splits must be at least 2, got {}",
            n_splits
        )));
    }

    if n_splits > n_samples {
        return Err(ModelError::InputValidationError(format!(
            "n_splits ({}) cannot exceed the number of samples ({})",
            n_splits, n_samples
        )));
    }

    if labels.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::InputValidationError(
            "Labels contain NaN or infinite values".to_string(),
        ));
    }

    // group sample indices by class, classes in order of first appearance
    let mut classes: Vec<(f64, Vec<usize>)> = Vec::new();
    for (i, &label) in labels.iter().enumerate() {
        match classes.iter_mut().find(|(class, _)| *class == label) {
            Some((_, members)) => members.push(i),
            None => classes.push((label, vec![i])),
        }
    }

    for (class, members) in &classes {
        if members.len() < n_splits {
            warn!(
                "Class {} has only {} members, fewer than n_splits = {}",
                class,
                members.len(),
                n_splits
            );
        }
    }

    let mut in_test = vec![usize::MAX; n_samples];
    for (_, members) in &classes {
        let base = members.len() / n_splits;
        let extra = members.len() % n_splits;
        let mut start = 0;
        for fold in 0..n_splits {
            let size = base + usize::from(fold < extra);
            for &idx in &members[start..start + size] {
                in_test[idx] = fold;
            }
            start += size;
        }
    }

    let mut folds = Vec::with_capacity(n_splits);
    for fold in 0..n_splits {
        let (test, train): (Vec<usize>, Vec<usize>) =
            (0..n_samples).partition(|&idx| in_test[idx] == fold);

        if test.is_empty() {
            return Err(ModelError::InputValidationError(format!(
                "Fold {} has no test samples, reduce n_splits ({})",
                fold, n_splits
            )));
        }

        folds.push((train, test));
    }

    Ok(folds)
}
