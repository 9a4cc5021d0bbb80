//! Common test utilities for survey-index tests

use survey_core::{Column, Dataset};

/// Raw responses for every score column of the connectivity study
///
/// Twelve respondents; WiFi speed is recorded in Mbps and the remaining
/// items on assorted raw scales.
pub fn raw_study_dataset() -> Dataset {
    let n = 12;
    let cycle = |values: &[f64]| -> Column {
        Column::Numeric((0..n).map(|i| Some(values[i % values.len()])).collect())
    };

    Dataset::from_columns([
        (
            "WiFi_Speed_Score",
            Column::from_values(&[
                5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0,
            ]),
        ),
        ("Reliability_Score", cycle(&[1.0, 2.0, 3.0, 4.0])),
        ("Peak_Performance_Score", cycle(&[2.0, 4.0, 6.0])),
        ("Outage_Frequency_Score", cycle(&[5.0, 4.0, 3.0, 2.0, 1.0, 3.0])),
        ("Programming_Impact_Score", cycle(&[1.0, 3.0, 5.0])),
        ("Collaboration_Score", cycle(&[2.0, 3.0, 4.0, 5.0])),
        ("Task_Abandonment_Score", cycle(&[4.0, 2.0, 1.0])),
        ("Time_Lost_Score", cycle(&[0.0, 30.0, 60.0, 90.0])),
        ("Productivity_Influence_Score", cycle(&[1.0, 2.0, 5.0])),
        (
            "Future_Performance_Score",
            Column::Numeric(
                (0..n)
                    .map(|i| if i % 5 == 0 { None } else { Some((i % 4) as f64 + 1.0) })
                    .collect(),
            ),
        ),
    ])
    .unwrap()
}

/// Assert every present value of a column lies on the 1-5 scale
pub fn assert_on_scale(dataset: &Dataset, column: &str) {
    for value in dataset.numeric(column).unwrap().iter().flatten() {
        assert!(
            (1.0..=5.0).contains(value),
            "{column} has value {value} outside [1, 5]"
        );
    }
}
