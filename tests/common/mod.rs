//! Shared fixtures for end-to-end study tests

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use survey_stats::{Column, Dataset};

pub const SEED: u64 = 20_240_611;

/// Likert response near `center`, clamped to 1..=5
fn likert(center: f64, noise: f64) -> f64 {
    (center + noise).round().clamp(1.0, 5.0)
}

/// Raw connectivity survey with every score column except `LMS_Access_Score`
///
/// WiFi speed and reliability cycle through all 25 level combinations, so
/// every two-way cell is populated. Productivity items improve with WiFi
/// speed; inverted items (outages, abandonment, time lost) worsen with it.
pub fn connectivity_survey(n: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let noise = Normal::new(0.0, 0.7).unwrap();
    let mut draw = |center: f64| likert(center, noise.sample(&mut rng));

    let wifi: Vec<f64> = (0..n).map(|i| (i % 5 + 1) as f64).collect();
    let reliability: Vec<f64> = (0..n).map(|i| (i / 5 % 5 + 1) as f64).collect();

    let mut column = |f: &dyn Fn(f64, f64) -> f64| -> Column {
        Column::from_values(
            &wifi
                .iter()
                .zip(&reliability)
                .map(|(&w, &r)| draw(f(w, r)))
                .collect::<Vec<_>>(),
        )
    };

    let peak = column(&|w, r| 0.5 * (w + r));
    let outage = column(&|_, r| 6.0 - r);
    let programming = column(&|w, _| 0.6 + 0.8 * w);
    let collaboration = column(&|w, r| 1.0 + 0.3 * w + 0.3 * r);
    let abandonment = column(&|w, _| 5.4 - 0.8 * w);
    let time_lost = column(&|w, _| 5.0 - 0.6 * w);
    let productivity = column(&|w, _| 0.6 + 0.8 * w);
    let future = column(&|_, _| 3.0);

    Dataset::from_columns([
        ("WiFi_Speed_Score", Column::from_values(&wifi)),
        ("Reliability_Score", Column::from_values(&reliability)),
        ("Peak_Performance_Score", peak),
        ("Outage_Frequency_Score", outage),
        ("Programming_Impact_Score", programming),
        ("Collaboration_Score", collaboration),
        ("Task_Abandonment_Score", abandonment),
        ("Time_Lost_Score", time_lost),
        ("Productivity_Influence_Score", productivity),
        ("Future_Performance_Score", future),
    ])
    .unwrap()
}
