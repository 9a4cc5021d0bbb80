//! Capability traits for the statistical tests
//!
//! Each test family sits behind a trait so that the engine, the post-hoc
//! analyzer and the assumption checker can be driven by an alternative
//! implementation (or a test double) without changing the driver.

use crate::posthoc::PairwiseComparison;
use crate::types::{OneWayStatistics, TestStatistic};
use survey_core::{GroupKey, Result};

/// One-way analysis of variance over pre-grouped values
pub trait OneWayAnovaProvider {
    /// F-test of equal group means
    ///
    /// `groups` holds the non-empty groups in ascending key order.
    fn one_way(&self, groups: &[&[f64]]) -> Result<OneWayStatistics>;
}

/// Pairwise comparisons after a significant omnibus test
pub trait PostHocProvider {
    /// Compare every pair of groups `(i, j)` with `i < j`
    fn pairwise(&self, groups: &[(GroupKey, Vec<f64>)], alpha: f64) -> Result<Vec<PairwiseComparison>>;
}

/// Test that a sample comes from a normal distribution
pub trait NormalityTestProvider {
    fn test_normality(&self, values: &[f64]) -> Result<TestStatistic>;
}

/// Test that groups share a common variance
pub trait HomogeneityTestProvider {
    fn test_homogeneity(&self, groups: &[&[f64]]) -> Result<TestStatistic>;
}
