//! Dataset CSV reading and writing

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use survey_core::{Column, Dataset};
use tracing::{debug, instrument};

/// Cell texts read as a missing response
pub const MISSING_TOKENS: [&str; 5] = ["", "NA", "NaN", "nan", "null"];

/// CSV reader producing a [`Dataset`]
///
/// The first row is the header. A column whose present cells all parse as
/// finite numbers is numeric; any other column is categorical.
#[derive(Debug, Clone)]
pub struct DatasetReader {
    delimiter: u8,
    missing: Vec<String>,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing: MISSING_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DatasetReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat `token` as missing in addition to the defaults
    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing.push(token.into());
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.missing.iter().any(|m| m == cell)
    }

    #[instrument(skip_all)]
    pub fn read<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(Error::InvalidInput("missing header row".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (column, cell) in cells.iter_mut().zip(record.iter()) {
                column.push((!self.is_missing(cell)).then(|| cell.to_string()));
            }
        }

        let dataset = Dataset::from_columns(headers.into_iter().zip(cells.into_iter().map(infer_column)))?;
        debug!(
            records = dataset.n_records(),
            columns = dataset.n_columns(),
            "dataset read"
        );
        Ok(dataset)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        self.read(File::open(path)?)
    }
}

fn infer_column(cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some),
        })
        .collect();
    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Categorical(cells),
    }
}

/// Read a comma-separated dataset with the default missing tokens
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    DatasetReader::new().read(reader)
}

pub fn read_dataset_path(path: impl AsRef<Path>) -> Result<Dataset> {
    DatasetReader::new().read_path(path)
}

/// Write every column of `dataset` in column order; missing cells are empty
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(dataset.column_names())?;

    let columns = dataset
        .column_names()
        .iter()
        .map(|name| dataset.column(name))
        .collect::<survey_core::Result<Vec<_>>>()?;
    for row in 0..dataset.n_records() {
        csv_writer.write_record(columns.iter().map(|c| c.render(row)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_dataset_path(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    write_dataset(dataset, File::create(path)?)
}
