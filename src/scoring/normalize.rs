//! Batch min-max normalization.

/// Rescales `values` to `[0, 1]` relative to the batch minimum and maximum.
///
/// When every value is equal the range is zero and every result is `0.0`.
#[must_use]
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_min_max_bounds() {
        assert_close(&min_max(&[10.0, 0.0, 5.0, 5.0]), &[1.0, 0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_min_max_degenerate_is_zero() {
        assert_close(&min_max(&[3.0, 3.0, 3.0]), &[0.0, 0.0, 0.0]);
        assert_close(&min_max(&[7.0]), &[0.0]);
    }

    #[test]
    fn test_min_max_empty() {
        assert!(min_max(&[]).is_empty());
    }

    #[test]
    fn test_min_max_negative_values() {
        assert_close(&min_max(&[-2.0, 0.0, 2.0]), &[0.0, 0.5, 1.0]);
    }
}
