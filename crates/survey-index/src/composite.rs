//! Composite index construction
//!
//! A composite index is the unweighted mean of its constituent scores,
//! computed per record over whichever constituents are present.

use survey_core::{CompositeSpec, Dataset, Error, Record, Result};

/// Mean of the present constituent values of one record
///
/// Returns `None` only when no constituent is present; missing values are
/// dropped, never imputed.
pub fn build_index<S: AsRef<str>>(record: &Record<'_>, constituents: &[S]) -> Option<f64> {
    mean_present(constituents.iter().map(|c| record.value(c.as_ref())))
}

/// Mean of the `Some` values, `None` if there are none
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Builds composite index columns over a dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeBuilder;

impl CompositeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Index values for every record
    ///
    /// Every constituent must exist as a numeric column; an absent one is
    /// [`Error::MissingRequiredColumn`].
    pub fn build(&self, dataset: &Dataset, spec: &CompositeSpec) -> Result<Vec<Option<f64>>> {
        for column in &spec.constituents {
            if !dataset.has_column(column) {
                return Err(Error::MissingRequiredColumn {
                    index: spec.name.clone(),
                    column: column.clone(),
                });
            }
            dataset.numeric(column)?;
        }

        Ok(dataset
            .records()
            .map(|record| build_index(&record, &spec.constituents))
            .collect())
    }
}
