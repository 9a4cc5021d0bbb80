//! Grouping records by the distinct values of a column

use std::collections::{BTreeMap, BTreeSet};
use survey_core::{Dataset, GroupKey, Result};

/// Records of a dataset grouped by one column, in ascending key order
///
/// Holds record indices only, so a partition stays valid for any column of
/// the dataset it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    column: String,
    groups: BTreeMap<GroupKey, Vec<usize>>,
}

impl Partition {
    /// Column the records were grouped by
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Record indices of one group
    pub fn indices(&self, key: &GroupKey) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// `(key, record indices)` pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[usize])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Values of `dependent` per group
    ///
    /// Missing values are dropped and groups left with no values are
    /// omitted.
    pub fn values(&self, dataset: &Dataset, dependent: &str) -> Result<Vec<(GroupKey, Vec<f64>)>> {
        let cells = dataset.numeric(dependent)?;
        Ok(self
            .groups
            .iter()
            .filter_map(|(key, rows)| {
                let values: Vec<f64> = rows
                    .iter()
                    .filter_map(|&row| cells[row])
                    .filter(|v| v.is_finite())
                    .collect();
                (!values.is_empty()).then(|| (key.clone(), values))
            })
            .collect())
    }
}

/// Group records by the distinct values of `column`
///
/// Records with a missing value belong to no group.
pub fn partition(dataset: &Dataset, column: &str) -> Result<Partition> {
    let source = dataset.column(column)?;
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for row in 0..dataset.n_records() {
        if let Some(key) = source.key(row) {
            groups.entry(key).or_default().push(row);
        }
    }
    Ok(Partition {
        column: column.to_string(),
        groups,
    })
}

/// Group records by a caller-specified set of labels
///
/// Records whose value is not among `labels` are left out, and labels
/// matching no record produce no group.
pub fn partition_with_labels(dataset: &Dataset, column: &str, labels: &[GroupKey]) -> Result<Partition> {
    let wanted: BTreeSet<&GroupKey> = labels.iter().collect();
    let mut full = partition(dataset, column)?;
    full.groups.retain(|key, _| wanted.contains(key));
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::Column;

    fn dataset() -> Dataset {
        Dataset::from_columns([
            (
                "speed",
                Column::Numeric(vec![Some(3.0), Some(1.0), None, Some(3.0), Some(2.0), Some(1.0)]),
            ),
            (
                "score",
                Column::Numeric(vec![Some(4.0), Some(2.0), Some(5.0), None, None, Some(3.0)]),
            ),
            (
                "group",
                Column::Categorical(
                    ["b", "a", "a", "c", "b", "a"]
                        .iter()
                        .map(|s| Some(s.to_string()))
                        .collect(),
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_partition_sorted_ascending() {
        let ds = dataset();
        let p = partition(&ds, "speed").unwrap();
        let keys: Vec<_> = p.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![GroupKey::number(1.0), GroupKey::number(2.0), GroupKey::number(3.0)]
        );
        assert_eq!(p.indices(&GroupKey::number(1.0)), Some(&[1, 5][..]));
        assert_eq!(p.indices(&GroupKey::number(3.0)), Some(&[0, 3][..]));
        assert_eq!(p.column(), "speed");
    }

    #[test]
    fn test_missing_key_excluded() {
        let ds = dataset();
        let p = partition(&ds, "speed").unwrap();
        let covered: usize = p.iter().map(|(_, rows)| rows.len()).sum();
        assert_eq!(covered, 5);
    }

    #[test]
    fn test_values_drop_missing_and_empty_groups() {
        let ds = dataset();
        let p = partition(&ds, "speed").unwrap();
        let values = p.values(&ds, "score").unwrap();
        assert_eq!(
            values,
            vec![
                (GroupKey::number(1.0), vec![2.0, 3.0]),
                (GroupKey::number(3.0), vec![4.0]),
            ]
        );
    }

    #[test]
    fn test_categorical_partition() {
        let ds = dataset();
        let p = partition(&ds, "group").unwrap();
        assert_eq!(p.n_groups(), 3);
        assert_eq!(p.indices(&GroupKey::label("a")), Some(&[1, 2, 5][..]));
    }

    #[test]
    fn test_partition_with_labels() {
        let ds = dataset();
        let labels = [GroupKey::label("a"), GroupKey::label("c"), GroupKey::label("z")];
        let p = partition_with_labels(&ds, "group", &labels).unwrap();
        assert_eq!(p.n_groups(), 2);
        assert!(p.indices(&GroupKey::label("b")).is_none());
        assert!(p.indices(&GroupKey::label("z")).is_none());
    }

    #[test]
    fn test_unknown_column() {
        let ds = dataset();
        assert!(partition(&ds, "nope").is_err());
        let p = partition(&ds, "speed").unwrap();
        assert!(p.values(&ds, "group").is_err());
    }
}
