//! ANOVA engine over dataset columns

use crate::one_way::{effect_size, FisherAnova};
use crate::partition::partition;
use crate::traits::OneWayAnovaProvider;
use crate::two_way::{TwoWayAnova, TwoWayTable};
use crate::types::{AnovaResult, GroupSummary, OneWayOutcome};
use survey_core::{Dataset, Diagnostic, DiagnosticBus, Error, GroupKey, Result};
use tracing::{debug, instrument};

/// Runs one-way and two-way analyses against a dataset
///
/// The one-way test is pluggable through [`OneWayAnovaProvider`]; results
/// and skipped pairings are reported on the engine's diagnostic bus.
#[derive(Debug, Clone)]
pub struct AnovaEngine<P = FisherAnova> {
    pub(crate) provider: P,
    pub(crate) alpha: f64,
    pub(crate) bus: DiagnosticBus,
}

impl AnovaEngine<FisherAnova> {
    pub fn new(alpha: f64) -> Result<Self> {
        Self::with_provider(FisherAnova, alpha)
    }
}

impl<P: OneWayAnovaProvider> AnovaEngine<P> {
    pub fn with_provider(provider: P, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "alpha {alpha} must be in (0, 1)"
            )));
        }
        Ok(Self {
            provider,
            alpha,
            bus: DiagnosticBus::new(),
        })
    }

    /// Report diagnostics on `bus`
    pub fn with_diagnostics(mut self, bus: DiagnosticBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn diagnostics(&self) -> &DiagnosticBus {
        &self.bus
    }

    /// One-way ANOVA of `dependent` across the groups of `independent`
    ///
    /// Records missing the dependent value are dropped. Fewer than two
    /// non-empty groups yields [`OneWayOutcome::Skipped`]; absent columns and
    /// failed computations are errors.
    #[instrument(skip(self, dataset))]
    pub fn one_way(&self, dataset: &Dataset, independent: &str, dependent: &str) -> Result<OneWayOutcome> {
        let groups = partition(dataset, independent)?.values(dataset, dependent)?;
        self.one_way_grouped(independent, dependent, &groups)
    }

    /// One-way ANOVA over groups that were already extracted
    pub fn one_way_grouped(
        &self,
        independent: &str,
        dependent: &str,
        groups: &[(GroupKey, Vec<f64>)],
    ) -> Result<OneWayOutcome> {
        if groups.len() < 2 {
            debug!(groups = groups.len(), "not enough groups, pairing skipped");
            return Ok(OneWayOutcome::Skipped {
                groups: groups.len(),
            });
        }

        let slices: Vec<&[f64]> = groups.iter().map(|(_, v)| v.as_slice()).collect();
        let stats = self.provider.one_way(&slices)?;
        let n_observations = stats.n_observations();
        let n_groups = stats.n_groups();

        self.bus.emit(Diagnostic::TestCompleted {
            independent: independent.to_string(),
            dependent: dependent.to_string(),
            f_statistic: stats.f_statistic,
            p_value: stats.p_value,
        });

        Ok(OneWayOutcome::Tested(AnovaResult {
            independent: independent.to_string(),
            dependent: dependent.to_string(),
            f_statistic: stats.f_statistic,
            p_value: stats.p_value,
            significant: stats.p_value < self.alpha,
            effect_size: effect_size(stats.f_statistic, n_observations, n_groups),
            n_groups,
            n_observations,
            groups: groups
                .iter()
                .map(|(key, values)| GroupSummary::from_values(key.clone(), values))
                .collect(),
        }))
    }

    /// Two-way ANOVA with interaction, Type-II sums of squares
    pub fn two_way(
        &self,
        dataset: &Dataset,
        factor_a: &str,
        factor_b: &str,
        dependent: &str,
    ) -> Result<TwoWayTable> {
        TwoWayAnova::new().analyze(dataset, factor_a, factor_b, dependent)
    }
}
