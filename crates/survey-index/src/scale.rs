//! Min-max rescaling onto the 1-5 response scale

use survey_core::{SCALE_MAX, SCALE_MIDPOINT, SCALE_MIN};

/// Smallest and largest finite value present, if any
pub fn observed_range(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Whether rescaling would collapse the column to the midpoint
pub fn is_degenerate(values: &[Option<f64>]) -> bool {
    !matches!(observed_range(values), Some((lo, hi)) if hi > lo)
}

/// Whether any present value lies outside [1, 5]
pub fn needs_rescale(values: &[Option<f64>]) -> bool {
    values
        .iter()
        .flatten()
        .any(|&v| !(SCALE_MIN..=SCALE_MAX).contains(&v))
}

/// Rescale to [1, 5] with `(x - min) / (max - min) * 4 + 1`
///
/// Missing and non-finite cells stay missing. When every cell is missing or
/// the observed range is zero, every output cell (missing ones included) is
/// the midpoint 3.0.
pub fn rescale(values: &[Option<f64>]) -> Vec<Option<f64>> {
    match observed_range(values) {
        Some((min, max)) if max > min => {
            let width = max - min;
            values
                .iter()
                .map(|v| {
                    v.filter(|x| x.is_finite())
                        .map(|x| (x - min) / width * (SCALE_MAX - SCALE_MIN) + SCALE_MIN)
                })
                .collect()
        }
        _ => vec![Some(SCALE_MIDPOINT); values.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_wifi_speed_example() {
        let raw = [Some(10.0), Some(20.0), Some(20.0), Some(30.0)];
        assert_eq!(
            rescale(&raw),
            vec![Some(1.0), Some(3.0), Some(3.0), Some(5.0)]
        );
    }

    #[test]
    fn test_missing_propagates() {
        let raw = [Some(0.0), None, Some(8.0), Some(f64::NAN)];
        let out = rescale(&raw);
        assert_eq!(out[0], Some(1.0));
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(5.0));
        assert_eq!(out[3], None);
    }

    #[test]
    fn test_constant_column_collapses_to_midpoint() {
        let raw = [Some(4.0), None, Some(4.0)];
        assert!(is_degenerate(&raw));
        assert_eq!(rescale(&raw), vec![Some(3.0); 3]);
    }

    #[test]
    fn test_all_missing_collapses_to_midpoint() {
        let raw = [None, None];
        assert_eq!(observed_range(&raw), None);
        assert_eq!(rescale(&raw), vec![Some(3.0); 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rescale(&[]).is_empty());
    }

    #[test]
    fn test_needs_rescale() {
        assert!(!needs_rescale(&[Some(1.0), Some(5.0), None]));
        assert!(needs_rescale(&[Some(0.0), Some(3.0)]));
        assert!(needs_rescale(&[Some(7.0)]));
    }

    #[test]
    fn test_interior_value() {
        let out = rescale(&[Some(2.0), Some(3.0), Some(6.0)]);
        assert_abs_diff_eq!(out[1].unwrap(), 2.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_non_constant_hits_both_bounds(
            values in proptest::collection::vec(-1000.0f64..1000.0, 2..60)
        ) {
            let input: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
            prop_assume!(!is_degenerate(&input));

            let out: Vec<f64> = rescale(&input).into_iter().flatten().collect();
            prop_assert_eq!(out.len(), values.len());
            let lo = out.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = out.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(lo, 1.0);
            prop_assert_eq!(hi, 5.0);
            prop_assert!(out.iter().all(|v| (1.0..=5.0).contains(v)));
        }

        #[test]
        fn prop_constant_is_midpoint(value in -1e6f64..1e6, len in 1usize..40) {
            let input = vec![Some(value); len];
            prop_assert!(rescale(&input).iter().all(|v| *v == Some(3.0)));
        }
    }
}
