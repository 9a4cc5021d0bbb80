//! Equal-frequency Low/Medium/High binning

use std::fmt;
use survey_core::{Error, Result};

/// Tercile label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tercile {
    Low,
    Medium,
    High,
}

impl Tercile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Tercile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bin edges at the 0, 1/3, 2/3 and 1 quantiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TercileEdges {
    pub min: f64,
    pub lower: f64,
    pub upper: f64,
    pub max: f64,
}

impl TercileEdges {
    /// Label of one value; bins are right-closed and the first one includes `min`
    pub fn classify(&self, value: f64) -> Tercile {
        if value <= self.lower {
            Tercile::Low
        } else if value <= self.upper {
            Tercile::Medium
        } else {
            Tercile::High
        }
    }
}

/// Quantile of sorted data with linear interpolation between order statistics
///
/// # Panics
/// Panics if `sorted` is empty.
pub fn quantile_linear(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "quantile of empty data");
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Compute tercile edges of the present values
///
/// Fails when there is no data or when two edges coincide, since the bins
/// would then not be distinct.
pub fn tercile_edges(values: &[Option<f64>]) -> Result<TercileEdges> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(Error::empty_input());
    }
    sorted.sort_by(f64::total_cmp);

    let edges = TercileEdges {
        min: sorted[0],
        lower: quantile_linear(&sorted, 1.0 / 3.0),
        upper: quantile_linear(&sorted, 2.0 / 3.0),
        max: sorted[sorted.len() - 1],
    };

    if !(edges.min < edges.lower && edges.lower < edges.upper && edges.upper < edges.max) {
        return Err(Error::Computation(format!(
            "tercile edges are not unique: [{}, {}, {}, {}]",
            edges.min, edges.lower, edges.upper, edges.max
        )));
    }
    Ok(edges)
}

/// Label every record; missing values stay unlabelled
pub fn tercile_labels(values: &[Option<f64>]) -> Result<Vec<Option<Tercile>>> {
    let edges = tercile_edges(values)?;
    Ok(values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()).map(|x| edges.classify(x)))
        .collect())
}
