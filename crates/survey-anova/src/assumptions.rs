//! Normality and variance homogeneity checks
//!
//! These are read-only diagnostics reported next to the ANOVA results;
//! they never gate a test.

use crate::one_way::FisherAnova;
use crate::partition::partition;
use crate::traits::{HomogeneityTestProvider, NormalityTestProvider, OneWayAnovaProvider};
use crate::types::TestStatistic;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use survey_core::{Dataset, Error, Result};

// Royston (1992, 1995) polynomial approximations
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// `c[0] + c[1] x + c[2] x^2 + ...`
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &coef| acc * x + coef)
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("Failed to create normal distribution: {e}")))
}

/// Shapiro-Wilk W test, Royston's AS R94 approximation
///
/// Valid for 3 to 5000 observations. For n = 3 the exact p-value is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapiroWilk;

impl ShapiroWilk {
    pub const MIN_SAMPLES: usize = 3;
    pub const MAX_SAMPLES: usize = 5000;

    pub fn new() -> Self {
        Self
    }

    /// Coefficients for the lower half of the order statistics
    fn coefficients(n: usize, normal: &Normal) -> Result<Vec<f64>> {
        let half = n / 2;
        let an = n as f64;

        // Blom scores of the expected normal order statistics, negative half
        let m: Vec<f64> = (0..half)
            .map(|i| normal.inverse_cdf((i as f64 + 1.0 - 0.375) / (an + 0.25)))
            .collect();
        let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();

        let a1 = poly(&C1, rsn) - m[0] / ssumm2;
        let mut a = vec![0.0; half];
        let (corrected, fac_sq, one_minus) = if n > 5 {
            let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
            a[1] = a2;
            (
                2,
                summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
                1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
            )
        } else {
            (1, summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
        };
        if fac_sq <= 0.0 || one_minus <= 0.0 {
            return Err(Error::Computation(
                "Shapiro-Wilk coefficients are not defined for this sample size".to_string(),
            ));
        }

        let fac = (fac_sq / one_minus).sqrt();
        a[0] = a1;
        for i in corrected..half {
            a[i] = -m[i] / fac;
        }
        Ok(a)
    }

    fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
        let an = n as f64;
        let y = (1.0 - w).ln();
        if n <= 11 {
            let gamma = poly(&G, an);
            if y >= gamma {
                return 0.0;
            }
            let y = -(gamma - y).ln();
            let z = (y - poly(&C3, an)) / poly(&C4, an).exp();
            1.0 - normal.cdf(z)
        } else {
            let ln_n = an.ln();
            let z = (y - poly(&C5, ln_n)) / poly(&C6, ln_n).exp();
            1.0 - normal.cdf(z)
        }
    }
}

impl NormalityTestProvider for ShapiroWilk {
    fn test_normality(&self, values: &[f64]) -> Result<TestStatistic> {
        let n = values.len();
        if n < Self::MIN_SAMPLES {
            return Err(Error::InsufficientData {
                expected: Self::MIN_SAMPLES,
                actual: n,
            });
        }
        if n > Self::MAX_SAMPLES {
            return Err(Error::InvalidInput(format!(
                "Shapiro-Wilk supports at most {} observations, got {n}",
                Self::MAX_SAMPLES
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("normality sample"));
        }

        let mut x = values.to_vec();
        x.sort_by(f64::total_cmp);
        let range = x[n - 1] - x[0];
        if range <= 0.0 {
            return Err(Error::Computation("sample is constant".to_string()));
        }

        let mean = x.iter().sum::<f64>() / n as f64;
        let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();

        if n == 3 {
            let w = ((FRAC_1_SQRT_2 * (x[2] - x[0])).powi(2) / ss).clamp(0.75, 1.0);
            let p_value = (1.0 - 6.0 / PI * w.sqrt().acos()).clamp(0.0, 1.0);
            return Ok(TestStatistic {
                test: "Shapiro-Wilk",
                statistic: w,
                p_value,
                n,
            });
        }

        let normal = standard_normal()?;
        let a = Self::coefficients(n, &normal)?;
        let numerator: f64 = a
            .iter()
            .enumerate()
            .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
            .sum();
        let w = (numerator * numerator / ss).min(1.0);
        let p_value = if w >= 1.0 {
            1.0
        } else {
            Self::p_value(w, n, &normal).clamp(0.0, 1.0)
        };

        Ok(TestStatistic {
            test: "Shapiro-Wilk",
            statistic: w,
            p_value,
            n,
        })
    }
}

/// Location each group is centred on before taking absolute deviations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Center {
    /// Brown-Forsythe variant
    #[default]
    Median,
    /// Levene's original test
    Mean,
}

/// Levene's test: one-way ANOVA on absolute deviations from the group centre
#[derive(Debug, Clone, Copy, Default)]
pub struct Levene {
    center: Center,
}

impl Levene {
    pub fn new(center: Center) -> Self {
        Self { center }
    }

    pub fn center(&self) -> Center {
        self.center
    }

    fn centre_of(&self, values: &[f64]) -> f64 {
        match self.center {
            Center::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Center::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    0.5 * (sorted[mid - 1] + sorted[mid])
                } else {
                    sorted[mid]
                }
            }
        }
    }
}

impl HomogeneityTestProvider for Levene {
    fn test_homogeneity(&self, groups: &[&[f64]]) -> Result<TestStatistic> {
        let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
        if groups.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: groups.len(),
            });
        }

        let deviations: Vec<Vec<f64>> = groups
            .iter()
            .map(|g| {
                let centre = self.centre_of(g);
                g.iter().map(|x| (x - centre).abs()).collect()
            })
            .collect();
        let slices: Vec<&[f64]> = deviations.iter().map(Vec::as_slice).collect();
        let stats = FisherAnova::new().one_way(&slices)?;

        Ok(TestStatistic {
            test: match self.center {
                Center::Median => "Levene (median)",
                Center::Mean => "Levene (mean)",
            },
            statistic: stats.f_statistic,
            p_value: stats.p_value,
            n: stats.n_observations(),
        })
    }
}

/// Runs the normality and homogeneity checks
#[derive(Debug, Clone, Default)]
pub struct AssumptionChecker<N = ShapiroWilk, H = Levene> {
    normality: N,
    homogeneity: H,
}

impl AssumptionChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N, H> AssumptionChecker<N, H>
where
    N: NormalityTestProvider,
    H: HomogeneityTestProvider,
{
    pub fn with_providers(normality: N, homogeneity: H) -> Self {
        Self {
            normality,
            homogeneity,
        }
    }

    pub fn normality(&self, values: &[f64]) -> Result<TestStatistic> {
        self.normality.test_normality(values)
    }

    pub fn homogeneity(&self, groups: &[&[f64]]) -> Result<TestStatistic> {
        self.homogeneity.test_homogeneity(groups)
    }

    /// Normality of the present values of a column
    pub fn column_normality(&self, dataset: &Dataset, column: &str) -> Result<TestStatistic> {
        let values: Vec<f64> = dataset
            .numeric(column)?
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        self.normality(&values)
    }

    /// Homogeneity of `value_column` across the groups of `group_column`
    pub fn grouped_homogeneity(
        &self,
        dataset: &Dataset,
        group_column: &str,
        value_column: &str,
    ) -> Result<TestStatistic> {
        let groups = partition(dataset, group_column)?.values(dataset, value_column)?;
        let slices: Vec<&[f64]> = groups.iter().map(|(_, v)| v.as_slice()).collect();
        self.homogeneity(&slices)
    }
}
