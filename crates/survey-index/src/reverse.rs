//! Reverse coding of 1-5 scaled items

use survey_core::{Diagnostic, DiagnosticBus, Error, RangePolicy, Result, SCALE_MAX, SCALE_MIN};

const REFLECTION: f64 = SCALE_MIN + SCALE_MAX;

/// Reverse one value on the 1-5 scale
#[inline]
pub fn reverse_value(value: f64) -> f64 {
    REFLECTION - value
}

/// Reverse a column with `6 - v`, keeping missing cells missing
///
/// Inputs are expected on [1, 5]; this function does not check. Use
/// [`ReverseCoder`] to apply a [`RangePolicy`].
pub fn reverse(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(reverse_value)).collect()
}

/// Reverse coder that enforces a range policy
#[derive(Debug, Clone, Default)]
pub struct ReverseCoder {
    policy: RangePolicy,
    bus: DiagnosticBus,
}

impl ReverseCoder {
    pub fn new(policy: RangePolicy) -> Self {
        Self {
            policy,
            bus: DiagnosticBus::new(),
        }
    }

    /// Emit range violations on `bus`
    pub fn with_diagnostics(mut self, bus: DiagnosticBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Reverse a named column
    ///
    /// Under [`RangePolicy::Warn`] every out-of-range value is reported and
    /// reversed anyway; under [`RangePolicy::Strict`] the first one is an
    /// [`Error::OutOfRange`].
    pub fn reverse_column(&self, column: &str, values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
        for (record, value) in values.iter().enumerate() {
            let Some(value) = *value else { continue };
            if (SCALE_MIN..=SCALE_MAX).contains(&value) {
                continue;
            }
            match self.policy {
                RangePolicy::Strict => {
                    return Err(Error::OutOfRange {
                        column: column.to_string(),
                        record,
                        value,
                    });
                }
                RangePolicy::Warn => self.bus.emit(Diagnostic::RangeViolation {
                    column: column.to_string(),
                    record,
                    value,
                }),
            }
        }
        Ok(reverse(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use survey_core::CollectingReporter;

    #[test]
    fn test_outage_frequency_example() {
        assert_eq!(reverse(&[Some(4.0)]), vec![Some(2.0)]);
    }

    #[test]
    fn test_missing_stays_missing() {
        assert_eq!(reverse(&[None, Some(1.0)]), vec![None, Some(5.0)]);
    }

    #[test]
    fn test_warn_policy_reports_and_reverses() {
        let collector = CollectingReporter::new();
        let coder = ReverseCoder::new(RangePolicy::Warn)
            .with_diagnostics(DiagnosticBus::with_reporter(collector.clone()));

        let out = coder
            .reverse_column("Time_Lost_Score", &[Some(7.0), Some(3.0), None])
            .unwrap();
        assert_eq!(out, vec![Some(-1.0), Some(3.0), None]);
        assert_eq!(
            collector.events(),
            vec![Diagnostic::RangeViolation {
                column: "Time_Lost_Score".to_string(),
                record: 0,
                value: 7.0,
            }]
        );
    }

    #[test]
    fn test_strict_policy_rejects() {
        let coder = ReverseCoder::new(RangePolicy::Strict);
        let err = coder
            .reverse_column("Time_Lost_Score", &[Some(2.0), Some(0.5)])
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { record: 1, .. }));
    }

    #[test]
    fn test_strict_policy_accepts_in_range() {
        let coder = ReverseCoder::new(RangePolicy::Strict);
        let out = coder
            .reverse_column("Outage_Frequency_Score", &[Some(1.0), Some(5.0)])
            .unwrap();
        assert_eq!(out, vec![Some(5.0), Some(1.0)]);
    }

    proptest! {
        #[test]
        fn prop_reverse_is_involution(v in 1.0f64..=5.0) {
            prop_assert!((reverse_value(reverse_value(v)) - v).abs() <= 1e-12);
        }

        #[test]
        fn prop_reverse_is_exact_on_likert_steps(step in 0u32..=16) {
            let v = 1.0 + step as f64 * 0.25;
            prop_assert_eq!(reverse_value(reverse_value(v)), v);
        }

        #[test]
        fn prop_reverse_stays_on_scale(v in 1.0f64..=5.0) {
            let r = reverse_value(v);
            prop_assert!((1.0..=5.0).contains(&r));
        }
    }
}
