//! Small numeric helpers shared by the categorizer and the aggregator.
//!
//! All functions expect the caller to pass finite values; slices passed to
//! [`percentile`] and [`median`] must already be sorted ascending.

/// Percentile with inclusive linear interpolation between closest ranks.
///
/// `p` is a fraction in `[0, 1]`. The rank is `p * (n - 1)`, which matches the
/// default quantile method of most dataframe libraries. Returns `None` on an
/// empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        Some(sorted[sorted.len() - 1])
    } else {
        Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
    }
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    percentile(sorted, 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sorts in place; NaN never reaches here because callers filter non-finite values.
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [100.0, 200.0, 300.0, 400.0];
        assert_eq!(percentile(&values, 0.25), Some(175.0));
        assert_eq!(percentile(&values, 0.5), Some(250.0));
        assert_eq!(percentile(&values, 0.75), Some(325.0));
    }

    #[test]
    fn test_percentile_edges() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[42.0], 0.75), Some(42.0));
        assert_eq!(percentile(&[1.0, 2.0], 1.0), Some(2.0));
        assert_eq!(percentile(&[1.0, 2.0], 0.0), Some(1.0));
    }

    #[test]
    fn test_median_and_mean() {
        assert_eq!(median(&[1.0, 3.0, 10.0]), Some(3.0));
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345_6), 12.35);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(7.0), 7.0);
    }
}
