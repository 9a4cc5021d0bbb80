//! Tukey's honestly significant difference test

use crate::partition::partition;
use crate::studentized_range::{ptukey, qtukey};
use crate::traits::PostHocProvider;
use survey_core::{Dataset, Error, GroupKey, Result};
use tracing::{debug, instrument};

/// Comparison of one pair of groups
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison {
    /// Lower group in key order
    pub group1: GroupKey,
    pub group2: GroupKey,
    /// `mean(group2) - mean(group1)`
    pub mean_diff: f64,
    /// Family-wise adjusted p-value
    pub p_adj: f64,
    /// Simultaneous confidence interval of `mean_diff`
    pub lower: f64,
    pub upper: f64,
    /// `p_adj < alpha`
    pub reject: bool,
}

/// Tukey HSD with the Tukey-Kramer standard error for unequal group sizes
#[derive(Debug, Clone, Copy, Default)]
pub struct TukeyHsd;

impl TukeyHsd {
    pub fn new() -> Self {
        Self
    }
}

impl PostHocProvider for TukeyHsd {
    fn pairwise(&self, groups: &[(GroupKey, Vec<f64>)], alpha: f64) -> Result<Vec<PairwiseComparison>> {
        let k = groups.len();
        if k < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: k,
            });
        }
        if groups.iter().any(|(_, v)| v.is_empty()) {
            return Err(Error::InvalidInput("every group needs at least one observation".to_string()));
        }

        let n: usize = groups.iter().map(|(_, v)| v.len()).sum();
        let means: Vec<f64> = groups
            .iter()
            .map(|(_, v)| v.iter().sum::<f64>() / v.len() as f64)
            .collect();
        let ss_within: f64 = groups
            .iter()
            .zip(&means)
            .map(|((_, v), m)| v.iter().map(|x| (x - m).powi(2)).sum::<f64>())
            .sum();

        let df = (n - k) as f64;
        if df < 2.0 {
            return Err(Error::InsufficientData {
                expected: k + 2,
                actual: n,
            });
        }
        let mse = ss_within / df;
        if mse <= 0.0 {
            return Err(Error::Computation("within-group variance is zero".to_string()));
        }

        let q_crit = qtukey(1.0 - alpha, k, df)?;
        let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);
        for i in 0..k {
            for j in (i + 1)..k {
                let ni = groups[i].1.len() as f64;
                let nj = groups[j].1.len() as f64;
                let mean_diff = means[j] - means[i];
                let se = (mse / 2.0 * (1.0 / ni + 1.0 / nj)).sqrt();
                let q = mean_diff.abs() / se;
                let p_adj = (1.0 - ptukey(q, k, df)?).clamp(0.0, 1.0);

                comparisons.push(PairwiseComparison {
                    group1: groups[i].0.clone(),
                    group2: groups[j].0.clone(),
                    mean_diff,
                    p_adj,
                    lower: mean_diff - q_crit * se,
                    upper: mean_diff + q_crit * se,
                    reject: p_adj < alpha,
                });
            }
        }
        Ok(comparisons)
    }
}

/// All pairwise comparisons of one independent/dependent pairing
#[derive(Debug, Clone, PartialEq)]
pub struct TukeyTable {
    pub independent: String,
    pub dependent: String,
    pub alpha: f64,
    pub comparisons: Vec<PairwiseComparison>,
}

impl TukeyTable {
    /// Comparisons whose difference is significant
    pub fn rejected(&self) -> impl Iterator<Item = &PairwiseComparison> {
        self.comparisons.iter().filter(|c| c.reject)
    }
}

/// Runs a post-hoc test against dataset columns
#[derive(Debug, Clone)]
pub struct PostHocAnalyzer<P = TukeyHsd> {
    provider: P,
    alpha: f64,
}

impl PostHocAnalyzer<TukeyHsd> {
    pub fn new(alpha: f64) -> Self {
        Self::with_provider(TukeyHsd, alpha)
    }
}

impl Default for PostHocAnalyzer<TukeyHsd> {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl<P: PostHocProvider> PostHocAnalyzer<P> {
    pub fn with_provider(provider: P, alpha: f64) -> Self {
        Self { provider, alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Compare every pair of `independent` groups on `dependent`
    ///
    /// Records missing either column are dropped.
    #[instrument(skip(self, dataset), fields(alpha = self.alpha))]
    pub fn tukey_hsd(&self, dataset: &Dataset, independent: &str, dependent: &str) -> Result<TukeyTable> {
        let groups = partition(dataset, independent)?.values(dataset, dependent)?;
        let comparisons = self.provider.pairwise(&groups, self.alpha)?;
        debug!(
            groups = groups.len(),
            comparisons = comparisons.len(),
            "post-hoc comparisons computed"
        );
        Ok(TukeyTable {
            independent: independent.to_string(),
            dependent: dependent.to_string(),
            alpha: self.alpha,
            comparisons,
        })
    }
}
