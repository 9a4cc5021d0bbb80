//! Batteries of one-way tests and their result tables

use crate::engine::AnovaEngine;
use crate::traits::OneWayAnovaProvider;
use crate::types::{AnovaResult, OneWayOutcome};
use survey_core::{Dataset, Diagnostic, Error};
use tracing::{info, instrument};

/// Ordered one-way results, in the order the pairings were run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    results: Vec<AnovaResult>,
}

/// Counts derived from a [`ResultTable`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySummary {
    pub total_tests: usize,
    pub significant_tests: usize,
    /// Share of significant tests in percent, 0 for an empty table
    pub percent_significant: f64,
}

impl ResultTable {
    pub fn new(results: Vec<AnovaResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[AnovaResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnovaResult> {
        self.results.iter()
    }

    /// Significant results in run order
    pub fn significant(&self) -> impl Iterator<Item = &AnovaResult> {
        self.results.iter().filter(|r| r.significant)
    }

    pub fn summary(&self) -> BatterySummary {
        let total_tests = self.results.len();
        let significant_tests = self.significant().count();
        let percent_significant = if total_tests == 0 {
            0.0
        } else {
            significant_tests as f64 / total_tests as f64 * 100.0
        };
        BatterySummary {
            total_tests,
            significant_tests,
            percent_significant,
        }
    }

    /// Up to `n` significant results, smallest p-value first
    ///
    /// Ties keep run order.
    pub fn most_significant(&self, n: usize) -> Vec<&AnovaResult> {
        let mut ranked: Vec<&AnovaResult> = self.significant().collect();
        ranked.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
        ranked.truncate(n);
        ranked
    }

    /// The pairing a post-hoc test should follow up
    ///
    /// The result with the smallest p-value overall (first one on ties),
    /// provided at least one result is significant.
    pub fn posthoc_candidate(&self) -> Option<&AnovaResult> {
        if !self.results.iter().any(|r| r.significant) {
            return None;
        }
        self.results
            .iter()
            .reduce(|best, r| if r.p_value < best.p_value { r } else { best })
    }

    /// Append every result of `other`, keeping order
    pub fn extend(&mut self, other: ResultTable) {
        self.results.extend(other.results);
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a AnovaResult;
    type IntoIter = std::slice::Iter<'a, AnovaResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromIterator<AnovaResult> for ResultTable {
    fn from_iter<I: IntoIterator<Item = AnovaResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<P: OneWayAnovaProvider> AnovaEngine<P> {
    /// One-way test of every `(independent, dependent)` pair
    ///
    /// Pairs are visited independent-major, in the given order. Absent
    /// columns, skipped pairings and failed computations are reported on the
    /// diagnostic bus and leave no row; the run itself never fails.
    #[instrument(skip_all, fields(independent = independent.len(), dependent = dependent.len()))]
    pub fn run_battery<S: AsRef<str>>(&self, dataset: &Dataset, independent: &[S], dependent: &[S]) -> ResultTable {
        let mut table = ResultTable::default();

        for iv in independent.iter().map(AsRef::as_ref) {
            if !dataset.has_column(iv) {
                self.bus.emit(Diagnostic::ConfigurationMismatch {
                    stage: "one_way",
                    column: iv.to_string(),
                });
                continue;
            }
            for dv in dependent.iter().map(AsRef::as_ref) {
                match self.one_way(dataset, iv, dv) {
                    Ok(OneWayOutcome::Tested(result)) => table.results.push(result),
                    Ok(OneWayOutcome::Skipped { groups }) => self.bus.emit(Diagnostic::PairingSkipped {
                        independent: iv.to_string(),
                        dependent: dv.to_string(),
                        groups,
                    }),
                    Err(e) if e.is_missing_column() => self.bus.emit(Diagnostic::ConfigurationMismatch {
                        stage: "one_way",
                        column: dv.to_string(),
                    }),
                    Err(e) => self.bus.emit(Diagnostic::ComputationFailure {
                        stage: "one_way",
                        detail: describe(iv, dv, &e),
                    }),
                }
            }
        }

        let summary = table.summary();
        info!(
            total = summary.total_tests,
            significant = summary.significant_tests,
            "battery finished"
        );
        table
    }
}

fn describe(independent: &str, dependent: &str, error: &Error) -> String {
    format!("{independent} -> {dependent}: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupSummary;
    use survey_core::{CollectingReporter, Column, DiagnosticBus, GroupKey};

    fn result(iv: &str, p: f64, alpha: f64) -> AnovaResult {
        AnovaResult {
            independent: iv.to_string(),
            dependent: "y".to_string(),
            f_statistic: 1.0,
            p_value: p,
            significant: p < alpha,
            effect_size: 0.1,
            n_groups: 2,
            n_observations: 10,
            groups: vec![GroupSummary::from_values(GroupKey::number(1.0), &[1.0])],
        }
    }

    #[test]
    fn test_summary_and_ranking() {
        let table: ResultTable = [
            result("a", 0.04, 0.05),
            result("b", 0.20, 0.05),
            result("c", 0.001, 0.05),
            result("d", 0.03, 0.05),
            result("e", 0.01, 0.05),
        ]
        .into_iter()
        .collect();

        let summary = table.summary();
        assert_eq!(summary.total_tests, 5);
        assert_eq!(summary.significant_tests, 4);
        assert_eq!(summary.percent_significant, 80.0);

        let top: Vec<_> = table.most_significant(3).iter().map(|r| r.independent.as_str()).collect();
        assert_eq!(top, vec!["c", "e", "d"]);
        assert_eq!(table.posthoc_candidate().unwrap().independent, "c");
    }

    #[test]
    fn test_no_candidate_without_significance() {
        let table = ResultTable::new(vec![result("a", 0.5, 0.05), result("b", 0.2, 0.05)]);
        assert!(table.posthoc_candidate().is_none());
        assert!(table.most_significant(3).is_empty());
    }

    #[test]
    fn test_empty_table_summary() {
        let summary = ResultTable::default().summary();
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.percent_significant, 0.0);
    }

    #[test]
    fn test_candidate_ties_keep_first() {
        let table = ResultTable::new(vec![result("a", 0.01, 0.05), result("b", 0.01, 0.05)]);
        assert_eq!(table.posthoc_candidate().unwrap().independent, "a");
    }

    fn dataset() -> Dataset {
        Dataset::from_columns([
            ("g1", Column::from_values(&[1.0, 1.0, 1.0, 2.0, 2.0, 2.0])),
            ("g2", Column::from_values(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0])),
            ("single", Column::from_values(&[1.0; 6])),
            ("y1", Column::from_values(&[1.0, 2.0, 3.0, 6.0, 7.0, 8.0])),
            ("y2", Column::from_values(&[2.0, 3.0, 2.5, 2.0, 3.0, 2.5])),
            ("flat", Column::from_values(&[4.0; 6])),
        ])
        .unwrap()
    }

    #[test]
    fn test_run_battery_order_and_skips() {
        let collector = CollectingReporter::new();
        let engine = AnovaEngine::new(0.05)
            .unwrap()
            .with_diagnostics(DiagnosticBus::with_reporter(collector.clone()));

        let independent = ["g1", "single", "absent", "g2"];
        let dependent = ["y1", "y2", "flat", "gone"];
        let table = engine.run_battery(&dataset(), &independent, &dependent);

        assert!(table.len() <= independent.len() * dependent.len());
        let pairs: Vec<_> = table
            .iter()
            .map(|r| (r.independent.as_str(), r.dependent.as_str()))
            .collect();
        assert_eq!(pairs, vec![("g1", "y1"), ("g1", "y2"), ("g2", "y1"), ("g2", "y2")]);
        assert!(table.results()[0].significant);

        let warnings = collector.warnings();
        let skipped = warnings
            .iter()
            .filter(|d| matches!(d, Diagnostic::PairingSkipped { .. }))
            .count();
        let mismatched = warnings
            .iter()
            .filter(|d| matches!(d, Diagnostic::ConfigurationMismatch { .. }))
            .count();
        let failed = warnings
            .iter()
            .filter(|d| matches!(d, Diagnostic::ComputationFailure { .. }))
            .count();
        // "single" has one group for each present dependent
        assert_eq!(skipped, 3);
        // "absent" once, "gone" for g1, single and g2
        assert_eq!(mismatched, 4);
        // zero within-group variance of "flat" under g1 and g2
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_full_battery_has_every_pair() {
        let engine = AnovaEngine::new(0.05).unwrap();
        let table = engine.run_battery(&dataset(), &["g1", "g2"], &["y1", "y2"]);
        assert_eq!(table.len(), 4);
    }
}
