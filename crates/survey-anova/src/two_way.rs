//! Two-way ANOVA with interaction, Type-II sums of squares
//!
//! Both factors are treatment coded (first level in ascending order is the
//! reference) and the model `y ~ A + B + A:B` is fitted by least squares.
//! Each main effect is tested against the additive model with the other
//! factor already present, the interaction against the additive model.
//! Degrees of freedom come from the ranks of the nested design matrices,
//! so empty cells reduce the interaction df instead of breaking the fit.

use crate::one_way::f_upper_tail;
use crate::types::GroupSummary;
use nalgebra::{DMatrix, DVector};
use std::collections::{BTreeMap, BTreeSet};
use survey_core::{Dataset, Error, GroupKey, Result};
use tracing::{debug, instrument};

/// One row of a two-way ANOVA table
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRow {
    /// Term name: a factor column, `A:B`, or `Residual`
    pub source: String,
    pub sum_sq: f64,
    pub df: usize,
    /// `None` for the residual row and for effects with no degrees of freedom
    pub f_statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// Observations and mean of one factor-level combination
#[derive(Debug, Clone, PartialEq)]
pub struct CellSummary {
    pub level_a: GroupKey,
    pub level_b: GroupKey,
    pub n: usize,
    pub mean: f64,
}

/// Result of a two-way analysis
#[derive(Debug, Clone, PartialEq)]
pub struct TwoWayTable {
    pub factor_a: String,
    pub factor_b: String,
    pub dependent: String,
    /// Complete cases used in the fit
    pub n_observations: usize,
    /// Factor A, factor B, interaction, residual
    pub rows: [EffectRow; 4],
    /// Non-empty cells in ascending (A, B) order
    pub cells: Vec<CellSummary>,
}

impl TwoWayTable {
    pub fn factor_a_effect(&self) -> &EffectRow {
        &self.rows[0]
    }

    pub fn factor_b_effect(&self) -> &EffectRow {
        &self.rows[1]
    }

    pub fn interaction(&self) -> &EffectRow {
        &self.rows[2]
    }

    pub fn residual(&self) -> &EffectRow {
        &self.rows[3]
    }

    /// Effect rows whose p-value is below `alpha`
    pub fn significant_effects(&self, alpha: f64) -> impl Iterator<Item = &EffectRow> {
        self.rows[..3]
            .iter()
            .filter(move |row| row.p_value.is_some_and(|p| p < alpha))
    }
}

/// Least-squares fit summary
#[derive(Debug, Clone, Copy)]
struct Fit {
    rss: f64,
    rank: usize,
}

/// Two-way ANOVA estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoWayAnova;

impl TwoWayAnova {
    pub fn new() -> Self {
        Self
    }

    /// Fit `dependent ~ factor_a * factor_b` on the complete cases
    ///
    /// Fails with [`Error::Computation`] when a factor has a single level,
    /// when no residual degrees of freedom remain, or when the residual
    /// variance is zero.
    #[instrument(skip(self, dataset))]
    pub fn analyze(
        &self,
        dataset: &Dataset,
        factor_a: &str,
        factor_b: &str,
        dependent: &str,
    ) -> Result<TwoWayTable> {
        let column_a = dataset.column(factor_a)?;
        let column_b = dataset.column(factor_b)?;
        dataset.numeric(dependent)?;

        let cases: Vec<(GroupKey, GroupKey, f64)> = dataset
            .records()
            .filter_map(|record| {
                let row = record.index();
                Some((column_a.key(row)?, column_b.key(row)?, record.value(dependent)?))
            })
            .collect();
        let n = cases.len();

        let levels_a: Vec<GroupKey> = cases.iter().map(|c| c.0.clone()).collect::<BTreeSet<_>>().into_iter().collect();
        let levels_b: Vec<GroupKey> = cases.iter().map(|c| c.1.clone()).collect::<BTreeSet<_>>().into_iter().collect();
        for (name, levels) in [(factor_a, &levels_a), (factor_b, &levels_b)] {
            if levels.len() < 2 {
                return Err(Error::Computation(format!(
                    "factor '{name}' has {} level(s) among complete cases",
                    levels.len()
                )));
            }
        }

        let index_a: Vec<usize> = cases.iter().map(|c| level_index(&levels_a, &c.0)).collect();
        let index_b: Vec<usize> = cases.iter().map(|c| level_index(&levels_b, &c.1)).collect();
        let y = DVector::from_iterator(n, cases.iter().map(|c| c.2));

        let dummies_a = treatment_columns(&index_a, levels_a.len());
        let dummies_b = treatment_columns(&index_b, levels_b.len());
        let interaction: Vec<Vec<f64>> = dummies_a
            .iter()
            .flat_map(|a| {
                dummies_b
                    .iter()
                    .map(move |b| a.iter().zip(b).map(|(x, z)| x * z).collect())
            })
            .collect();

        let fit_a = fit(&y, &[&dummies_a])?;
        let fit_b = fit(&y, &[&dummies_b])?;
        let fit_additive = fit(&y, &[&dummies_a, &dummies_b])?;
        let fit_full = fit(&y, &[&dummies_a, &dummies_b, &interaction])?;

        let df_resid = n.saturating_sub(fit_full.rank);
        if df_resid == 0 {
            return Err(Error::Computation(
                "no residual degrees of freedom for the two-way model".to_string(),
            ));
        }
        if fit_full.rss <= 1e-12 * y.norm_squared().max(1.0) {
            return Err(Error::Computation("residual variance is zero".to_string()));
        }
        let mse = fit_full.rss / df_resid as f64;

        let effect = |source: String, reduced: Fit, larger: Fit| -> Result<EffectRow> {
            let sum_sq = (reduced.rss - larger.rss).max(0.0);
            let df = larger.rank.saturating_sub(reduced.rank);
            let (f_statistic, p_value) = if df == 0 {
                (None, None)
            } else {
                let f = (sum_sq / df as f64) / mse;
                (Some(f), Some(f_upper_tail(f, df as f64, df_resid as f64)?))
            };
            Ok(EffectRow {
                source,
                sum_sq,
                df,
                f_statistic,
                p_value,
            })
        };

        let rows = [
            effect(factor_a.to_string(), fit_b, fit_additive)?,
            effect(factor_b.to_string(), fit_a, fit_additive)?,
            effect(format!("{factor_a}:{factor_b}"), fit_additive, fit_full)?,
            EffectRow {
                source: "Residual".to_string(),
                sum_sq: fit_full.rss,
                df: df_resid,
                f_statistic: None,
                p_value: None,
            },
        ];

        debug!(
            n,
            levels_a = levels_a.len(),
            levels_b = levels_b.len(),
            df_resid,
            "two-way model fitted"
        );

        Ok(TwoWayTable {
            factor_a: factor_a.to_string(),
            factor_b: factor_b.to_string(),
            dependent: dependent.to_string(),
            n_observations: n,
            rows,
            cells: cell_summaries(&cases),
        })
    }
}

fn level_index(levels: &[GroupKey], key: &GroupKey) -> usize {
    levels.binary_search(key).unwrap_or_default()
}

/// Indicator columns for every level but the first
fn treatment_columns(index: &[usize], n_levels: usize) -> Vec<Vec<f64>> {
    (1..n_levels)
        .map(|level| {
            index
                .iter()
                .map(|&i| if i == level { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

/// Least squares of `y` on an intercept plus the given column blocks
fn fit(y: &DVector<f64>, blocks: &[&Vec<Vec<f64>>]) -> Result<Fit> {
    let n = y.len();
    let columns: Vec<&Vec<f64>> = blocks.iter().flat_map(|b| b.iter()).collect();
    let p = columns.len() + 1;
    let x = DMatrix::from_fn(n, p, |row, col| if col == 0 { 1.0 } else { columns[col - 1][row] });

    let svd = x.clone().svd(true, true);
    let tol = svd.singular_values.max() * 1e-10 * n.max(p) as f64;
    let rank = svd.rank(tol);
    let beta = svd
        .solve(y, tol)
        .map_err(|e| Error::Computation(format!("Failed to solve least squares system: {e}")))?;
    let residual = y - &x * beta;

    Ok(Fit {
        rss: residual.norm_squared(),
        rank,
    })
}

fn cell_summaries(cases: &[(GroupKey, GroupKey, f64)]) -> Vec<CellSummary> {
    let mut cells: BTreeMap<(&GroupKey, &GroupKey), Vec<f64>> = BTreeMap::new();
    for (a, b, y) in cases {
        cells.entry((a, b)).or_default().push(*y);
    }
    cells
        .into_iter()
        .map(|((a, b), values)| {
            let summary = GroupSummary::from_values(a.clone(), &values);
            CellSummary {
                level_a: a.clone(),
                level_b: b.clone(),
                n: summary.n,
                mean: summary.mean,
            }
        })
        .collect()
}
