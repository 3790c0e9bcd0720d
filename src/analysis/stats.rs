#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
#[allow(clippy::cast_precision_loss)]
pub fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of unsorted values: middle element, or the mean of the two middle
/// elements for even lengths. 0 for empty input.
pub fn median(values: &[f64]) -> f64 {
    let sorted = sorted(values);
    let count = sorted.len();

    match count {
        0 => 0.0,
        _ if count % 2 == 0 => (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0,
        _ => sorted[count / 2],
    }
}

/// Nearest-rank percentile over ascending-sorted values: the element at
/// `ceil(n * p / 100) - 1`, clamped to the array. 0 for empty input.
pub fn percentile(sorted_values: &[f64], p: u32) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let rank = (sorted_values.len() as f64 * f64::from(p) / 100.0).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted_values.len() - 1);
    sorted_values[index]
}

/// Population standard deviation around a precomputed mean.
#[allow(clippy::cast_precision_loss)]
pub fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
