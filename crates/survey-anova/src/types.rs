//! Result types shared by the ANOVA, post-hoc and assumption modules

use survey_core::GroupKey;

/// Descriptive statistics of one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single observation
    pub std_dev: Option<f64>,
}

impl GroupSummary {
    /// Summarize the values of one group
    pub fn from_values(key: GroupKey, values: &[f64]) -> Self {
        let n = values.len();
        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let std_dev = (n > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        Self {
            key,
            n,
            mean,
            std_dev,
        }
    }
}

/// Raw output of a one-way F-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneWayStatistics {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
}

impl OneWayStatistics {
    /// Number of observations used
    pub fn n_observations(&self) -> usize {
        self.df_between + self.df_within + 1
    }

    /// Number of groups compared
    pub fn n_groups(&self) -> usize {
        self.df_between + 1
    }

    /// Mean square within groups
    pub fn ms_within(&self) -> f64 {
        self.ss_within / self.df_within as f64
    }
}

/// One tested independent/dependent pairing
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaResult {
    pub independent: String,
    pub dependent: String,
    pub f_statistic: f64,
    pub p_value: f64,
    /// `p_value < alpha`
    pub significant: bool,
    /// `F / (F + N - k)`
    pub effect_size: f64,
    pub n_groups: usize,
    pub n_observations: usize,
    /// Per-group statistics in ascending key order
    pub groups: Vec<GroupSummary>,
}

/// Outcome of a one-way analysis of one pairing
#[derive(Debug, Clone, PartialEq)]
pub enum OneWayOutcome {
    /// The F-test ran
    Tested(AnovaResult),
    /// Fewer than two non-empty groups
    Skipped { groups: usize },
}

impl OneWayOutcome {
    /// The result, if the pairing was tested
    pub fn result(&self) -> Option<&AnovaResult> {
        match self {
            Self::Tested(r) => Some(r),
            Self::Skipped { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<AnovaResult> {
        match self {
            Self::Tested(r) => Some(r),
            Self::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Statistic and p-value of an assumption test
#[derive(Debug, Clone, PartialEq)]
pub struct TestStatistic {
    /// Name of the test, e.g. "Shapiro-Wilk"
    pub test: &'static str,
    pub statistic: f64,
    pub p_value: f64,
    /// Observations used
    pub n: usize,
}

impl TestStatistic {
    /// Whether the null hypothesis is rejected at `alpha`
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
