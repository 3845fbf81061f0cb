//! Trailing-window statistics.
//!
//! Position `i` is `None` until `window` values ending at `i` are available.

/// Arithmetic mean over the trailing `window` values.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    trailing(values, window, |slice| Some(mean(slice)))
}

/// Sample standard deviation (n - 1 denominator) over the trailing `window`
/// values. A window of one has no sample deviation, so every point is `None`.
#[must_use]
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    trailing(values, window, sample_std)
}

fn trailing<F>(values: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                stat(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

fn mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

fn sample_std(slice: &[f64]) -> Option<f64> {
    if slice.len() < 2 {
        return None;
    }
    let m = mean(slice);
    let sum_sq: f64 = slice.iter().map(|x| (x - m).powi(2)).sum();
    Some((sum_sq / (slice.len() - 1) as f64).max(0.0).sqrt())
}
