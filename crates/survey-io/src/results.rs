//! Result table CSV output

use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use survey_anova::{ResultTable, TukeyTable, TwoWayTable};

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    #[serde(rename = "Independent_Variable")]
    independent: &'a str,
    #[serde(rename = "Dependent_Variable")]
    dependent: &'a str,
    #[serde(rename = "F_statistic")]
    f_statistic: f64,
    #[serde(rename = "P_value")]
    p_value: f64,
    #[serde(rename = "Significant")]
    significant: bool,
    #[serde(rename = "Effect_Size")]
    effect_size: f64,
}

#[derive(Debug, Serialize)]
struct ComparisonRow {
    group1: String,
    group2: String,
    meandiff: f64,
    #[serde(rename = "p-adj")]
    p_adj: f64,
    lower: f64,
    upper: f64,
    reject: bool,
}

#[derive(Debug, Serialize)]
struct EffectRowOut<'a> {
    source: &'a str,
    sum_sq: f64,
    df: usize,
    #[serde(rename = "F")]
    f_statistic: Option<f64>,
    #[serde(rename = "PR(>F)")]
    p_value: Option<f64>,
}

/// One row per tested pairing, in run order
///
/// An empty table still produces the header row.
pub fn write_result_table<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if table.is_empty() {
        csv_writer.write_record([
            "Independent_Variable",
            "Dependent_Variable",
            "F_statistic",
            "P_value",
            "Significant",
            "Effect_Size",
        ])?;
    }
    for result in table {
        csv_writer.serialize(ResultRow {
            independent: &result.independent,
            dependent: &result.dependent,
            f_statistic: result.f_statistic,
            p_value: result.p_value,
            significant: result.significant,
            effect_size: result.effect_size,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_result_table_path(table: &ResultTable, path: impl AsRef<Path>) -> Result<()> {
    write_result_table(table, File::create(path)?)
}

/// Pairwise comparisons of a Tukey HSD table
pub fn write_tukey_table<W: Write>(table: &TukeyTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for c in &table.comparisons {
        csv_writer.serialize(ComparisonRow {
            group1: c.group1.to_string(),
            group2: c.group2.to_string(),
            meandiff: c.mean_diff,
            p_adj: c.p_adj,
            lower: c.lower,
            upper: c.upper,
            reject: c.reject,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Effect rows of a two-way table, residual last; undefined F and p are empty
pub fn write_two_way_table<W: Write>(table: &TwoWayTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &table.rows {
        csv_writer.serialize(EffectRowOut {
            source: &row.source,
            sum_sq: row.sum_sq,
            df: row.df,
            f_statistic: row.f_statistic,
            p_value: row.p_value,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
