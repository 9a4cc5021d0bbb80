//! Fisher one-way analysis of variance

use crate::traits::OneWayAnovaProvider;
use crate::types::OneWayStatistics;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use survey_core::{Error, Result};

/// Classical one-way ANOVA with pooled within-group variance
///
/// F = MS_between / MS_within with (k - 1, N - k) degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct FisherAnova;

impl FisherAnova {
    pub fn new() -> Self {
        Self
    }
}

impl OneWayAnovaProvider for FisherAnova {
    fn one_way(&self, groups: &[&[f64]]) -> Result<OneWayStatistics> {
        let k = groups.len();
        if k < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: k,
            });
        }
        if groups.iter().any(|g| g.is_empty()) {
            return Err(Error::InvalidInput("every group needs at least one observation".to_string()));
        }
        if groups.iter().flat_map(|g| g.iter()).any(|v| !v.is_finite()) {
            return Err(Error::non_finite("group values"));
        }

        let n: usize = groups.iter().map(|g| g.len()).sum();
        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;

        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in groups {
            let mean = group.iter().sum::<f64>() / group.len() as f64;
            ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
            ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        }

        let df_between = k - 1;
        let df_within = n - k;
        if df_within == 0 {
            return Err(Error::Computation(
                "no within-group degrees of freedom (every group has one observation)".to_string(),
            ));
        }
        if ss_within <= 0.0 {
            return Err(Error::Computation("within-group variance is zero".to_string()));
        }

        let f_statistic = (ss_between / df_between as f64) / (ss_within / df_within as f64);
        let p_value = f_upper_tail(f_statistic, df_between as f64, df_within as f64)?;

        Ok(OneWayStatistics {
            f_statistic,
            p_value,
            df_between,
            df_within,
            ss_between,
            ss_within,
        })
    }
}

/// `P(F > f)` for an F distribution with `(d1, d2)` degrees of freedom
pub fn f_upper_tail(f: f64, d1: f64, d2: f64) -> Result<f64> {
    if f.is_nan() {
        return Err(Error::non_finite("F statistic"));
    }
    let dist = FisherSnedecor::new(d1, d2)
        .map_err(|e| Error::Computation(format!("Failed to create F distribution: {e}")))?;
    if f <= 0.0 {
        return Ok(1.0);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    Ok((1.0 - dist.cdf(f)).clamp(0.0, 1.0))
}

/// Effect size `F / (F + N - k)`
///
/// An approximation of eta-squared from the F statistic alone; it equals
/// `SS_between / (SS_between + SS_within · (k - 1))` rather than the usual
/// `SS_between / SS_total` when more than two groups are compared.
pub fn effect_size(f_statistic: f64, n_observations: usize, n_groups: usize) -> f64 {
    let df_within = n_observations.saturating_sub(n_groups) as f64;
    f_statistic / (f_statistic + df_within)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_textbook_example() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [4.0, 5.0, 6.0];
        let g3 = [7.0, 8.0, 9.0];
        let stats = FisherAnova::new().one_way(&[&g1, &g2, &g3]).unwrap();

        assert_abs_diff_eq!(stats.ss_between, 54.0, epsilon = 1e-10);
        assert_abs_diff_eq!(stats.ss_within, 6.0, epsilon = 1e-10);
        assert_eq!(stats.df_between, 2);
        assert_eq!(stats.df_within, 6);
        assert_abs_diff_eq!(stats.f_statistic, 27.0, epsilon = 1e-10);
        // F(2, d2) has tail (1 + 2f/d2)^(-d2/2)
        assert_abs_diff_eq!(stats.p_value, 0.001, epsilon = 1e-8);
    }

    #[test]
    fn test_equal_means_not_significant() {
        let g1 = [1.0, 2.0, 3.0, 4.0];
        let g2 = [4.0, 3.0, 2.0, 1.0];
        let stats = FisherAnova::new().one_way(&[&g1, &g2]).unwrap();
        assert_abs_diff_eq!(stats.f_statistic, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let anova = FisherAnova::new();
        assert!(matches!(
            anova.one_way(&[&[1.0, 2.0]]),
            Err(Error::InsufficientData { .. })
        ));
        assert!(matches!(
            anova.one_way(&[&[1.0], &[5.0]]),
            Err(Error::Computation(_))
        ));
        assert!(matches!(
            anova.one_way(&[&[2.0, 2.0], &[3.0, 3.0]]),
            Err(Error::Computation(_))
        ));
        assert!(anova.one_way(&[&[1.0, 2.0], &[]]).is_err());
    }

    #[test]
    fn test_effect_size() {
        assert_abs_diff_eq!(effect_size(27.0, 9, 3), 27.0 / 33.0, epsilon = 1e-12);
        assert_eq!(effect_size(0.0, 10, 2), 0.0);
    }

    #[test]
    fn test_f_upper_tail_matches_closed_form() {
        for &(f, d2) in &[(0.5, 4.0), (3.0, 10.0), (12.0, 20.0)] {
            let expected = (1.0f64 + 2.0 * f / d2).powf(-d2 / 2.0);
            assert_abs_diff_eq!(f_upper_tail(f, 2.0, d2).unwrap(), expected, epsilon = 1e-10);
        }
    }

    proptest! {
        #[test]
        fn prop_effect_size_in_unit_interval(
            f in 0.0f64..1e6,
            n in 3usize..500,
            k in 2usize..10
        ) {
            prop_assume!(n > k);
            let es = effect_size(f, n, k);
            prop_assert!((0.0..1.0).contains(&es));
        }

        #[test]
        fn prop_p_value_is_probability(
            a in proptest::collection::vec(1.0f64..5.0, 2..20),
            b in proptest::collection::vec(1.0f64..5.0, 2..20)
        ) {
            if let Ok(stats) = FisherAnova::new().one_way(&[&a, &b]) {
                prop_assert!(stats.f_statistic >= 0.0);
                prop_assert!((0.0..=1.0).contains(&stats.p_value));
            }
        }
    }
}
