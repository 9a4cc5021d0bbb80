//! In-memory survey dataset
//!
//! A [`Dataset`] is an ordered set of equally long named columns. Numeric
//! columns carry `Option<f64>` cells so that per-record missingness survives
//! every transformation; categorical columns carry optional labels.

use crate::error::{Error, Result};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::fmt;

/// Discrete value used to form groups
///
/// Numbers sort numerically, labels lexicographically, and every number sorts
/// before every label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// Numeric response level
    Number(OrderedFloat<f64>),
    /// Categorical label
    Label(String),
}

impl GroupKey {
    /// Numeric key
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    /// Label key
    pub fn label(value: impl Into<String>) -> Self {
        Self::Label(value.into())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", v.0),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// A single column of cells
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric scores, `None` marks a missing response
    Numeric(Vec<Option<f64>>),
    /// Text labels, `None` marks a missing response
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Numeric column with every cell present
    pub fn from_values(values: &[f64]) -> Self {
        Self::Numeric(values.iter().map(|&v| Some(v)).collect())
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the column kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Categorical(_) => "categorical",
        }
    }

    /// Numeric cells, if this is a numeric column
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Numeric(v) => Some(v),
            Self::Categorical(_) => None,
        }
    }

    /// Group key of one cell; missing and non-finite cells have no key
    pub fn key(&self, row: usize) -> Option<GroupKey> {
        match self {
            Self::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|x| x.is_finite())
                .map(GroupKey::number),
            Self::Categorical(v) => v.get(row).cloned().flatten().map(GroupKey::Label),
        }
    }

    /// Text rendering of one cell, empty for missing
    pub fn render(&self, row: usize) -> String {
        match self {
            Self::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) => x.to_string(),
                None => String::new(),
            },
            Self::Categorical(v) => v.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

/// Table of survey records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    n_records: usize,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, column)` pairs, in order
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, column) in columns {
            dataset.insert_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Number of records (rows)
    pub fn n_records(&self) -> usize {
        self.n_records
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Look up a numeric column by name
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| Error::not_numeric(name))
    }

    /// Insert a column, replacing an existing one of the same name in place
    ///
    /// The first column fixes the record count; later columns must match it.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.names.is_empty() {
            self.n_records = column.len();
        } else if column.len() != self.n_records {
            return Err(Error::LengthMismatch {
                column: name,
                expected: self.n_records,
                actual: column.len(),
            });
        }

        if !self.columns.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// View of one record
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn record(&self, row: usize) -> Record<'_> {
        assert!(row < self.n_records, "record {row} out of bounds");
        Record { dataset: self, row }
    }

    /// Iterate over all records
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        (0..self.n_records).map(move |row| Record { dataset: self, row })
    }
}

/// Borrowed view of one row of a [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    dataset: &'a Dataset,
    row: usize,
}

impl<'a> Record<'a> {
    /// Row index within the dataset
    pub fn index(&self) -> usize {
        self.row
    }

    /// Numeric value of a column; `None` if missing, absent or non-numeric
    pub fn value(&self, column: &str) -> Option<f64> {
        self.dataset
            .columns
            .get(column)
            .and_then(Column::as_numeric)
            .and_then(|cells| cells[self.row])
            .filter(|v| v.is_finite())
    }

    /// Group key of a column for this record
    pub fn key(&self, column: &str) -> Option<GroupKey> {
        self.dataset
            .columns
            .get(column)
            .and_then(|c| c.key(self.row))
    }
}
