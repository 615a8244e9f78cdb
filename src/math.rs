use ndarray::{ArrayBase, Data, Ix1};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Computes the logistic sigmoid for a scalar input.
///
/// The sigmoid maps any real number into the interval \[0, 1\]. Inputs beyond
/// ±500 are clipped so that `exp` never overflows.
///
/// # Parameters
///
/// - `z` - Input value to transform
///
/// # Returns
///
/// - `f64` - Sigmoid output in the range \[0, 1\]
///
/// # Examples
/// ```rust
/// use shopper_intent::math::sigmoid;
///
/// let value = sigmoid(0.0);
/// // sigmoid(0) = 0.5
/// assert!((value - 0.5).abs() < 1e-6);
/// assert_eq!(sigmoid(-1e6), 0.0);
/// ```
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    const MAX_SIGMOID_INPUT: f64 = 500.0;
    const MIN_SIGMOID_INPUT: f64 = -500.0;

    if z > MAX_SIGMOID_INPUT {
        return 1.0;
    } else if z < MIN_SIGMOID_INPUT {
        return 0.0;
    }

    1.0 / (1.0 + (-z).exp())
}

/// Calculates the logistic regression loss (log loss).
///
/// This computes the average cross-entropy loss by applying the sigmoid
/// to raw logits before evaluating the log-likelihood.
///
/// # Parameters
///
/// - `logits` - Raw model outputs (logits before sigmoid)
/// - `actual_labels` - Binary labels (0 or 1)
///
/// # Returns
///
/// - `f64` - Average logistic regression loss (0.0 for empty input)
///
/// # Examples
/// ```rust
/// use shopper_intent::math::logistic_loss;
/// use ndarray::array;
///
/// let logits = array![0.0, 2.0, -1.0];
/// let actual_labels = array![0.0, 1.0, 0.0];
/// let loss = logistic_loss(&logits, &actual_labels);
/// assert!((loss - 0.37778).abs() < 1e-5);
/// ```
#[inline]
pub fn logistic_loss<S1, S2>(logits: &ArrayBase<S1, Ix1>, actual_labels: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if logits.is_empty() {
        return 0.0;
    }

    let n = logits.len() as f64;

    let total_loss = logits
        .iter()
        .zip(actual_labels.iter())
        .map(|(&x, &y)| {
            // max(0, x) - x*y + log(1 + exp(-|x|))
            x.max(0.0) - x * y + (1.0 + (-x.abs()).exp()).ln()
        })
        .sum::<f64>();

    total_loss / n
}

/// Returns the arithmetic mean and the sample standard deviation (ddof = 1) of `values`.
///
/// The standard deviation is `NaN` when fewer than two values are given, which
/// callers treat as a degenerate spread.
///
/// # Examples
/// ```rust
/// use shopper_intent::math::mean_and_sample_std;
///
/// let (mean, std) = mean_and_sample_std([0.0, 1.0, 2.0]);
/// assert!((mean - 1.0).abs() < 1e-12);
/// assert!((std - 1.0).abs() < 1e-12);
/// ```
pub fn mean_and_sample_std<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let collected: Vec<f64> = values.into_iter().collect();
    let mean = collected.iter().mean();
    let std = collected.iter().std_dev();
    (mean, std)
}

/// Natural logarithm of the Gaussian density `N(x; mean, std)`.
///
/// # Returns
///
/// - `Some(f64)` - The log density
/// - `None` - If `std` is not strictly positive and finite, or `mean` is not finite
///
/// # Examples
/// ```rust
/// use shopper_intent::math::gaussian_log_density;
///
/// let at_mean = gaussian_log_density(0.0, 0.0, 1.0).unwrap();
/// assert!((at_mean + 0.9189385332046727).abs() < 1e-12);
/// assert!(gaussian_log_density(0.0, 0.0, 0.0).is_none());
/// ```
#[inline]
pub fn gaussian_log_density(x: f64, mean: f64, std: f64) -> Option<f64> {
    if !mean.is_finite() || !std.is_finite() {
        return None;
    }
    Normal::new(mean, std).ok().map(|normal| normal.ln_pdf(x))
}
