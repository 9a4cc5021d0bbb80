//! Shared fixtures for survey-anova integration tests

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use survey_core::{Column, Dataset};

pub const SEED: u64 = 0x5eed_0f_a7;

pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(SEED)
}

/// Survey-like dataset of `n` records with known structure
///
/// - `speed` cycles through 1..=5, `reliability` through 1..=3
/// - `productivity` rises by 0.8 per speed level plus N(0, 0.5) noise
/// - `collaboration` rises with speed and reliability, no interaction
/// - `spread` has group-dependent variance across `speed`
/// - `skewed` is exponential
pub fn synthetic_survey(n: usize) -> Dataset {
    let mut rng = rng();
    let noise = Normal::new(0.0, 0.5).unwrap();
    let exp = Exp::new(1.0).unwrap();

    let speed: Vec<f64> = (0..n).map(|i| (i % 5 + 1) as f64).collect();
    let reliability: Vec<f64> = (0..n).map(|i| (i / 5 % 3 + 1) as f64).collect();
    let productivity: Vec<f64> = speed
        .iter()
        .map(|s| 1.0 + 0.8 * s + noise.sample(&mut rng))
        .collect();
    let collaboration: Vec<f64> = speed
        .iter()
        .zip(&reliability)
        .map(|(s, r)| 0.5 * s + 1.5 * r + noise.sample(&mut rng))
        .collect();
    let spread: Vec<f64> = speed
        .iter()
        .map(|s| {
            let sd = if *s <= 2.0 { 0.1 } else { 3.0 };
            3.0 + sd * noise.sample(&mut rng) / 0.5
        })
        .collect();
    let normal: Vec<f64> = (0..n).map(|_| 3.0 + 2.0 * noise.sample(&mut rng)).collect();
    let skewed: Vec<f64> = (0..n).map(|_| exp.sample(&mut rng)).collect();

    Dataset::from_columns([
        ("speed", Column::from_values(&speed)),
        ("reliability", Column::from_values(&reliability)),
        ("productivity", Column::from_values(&productivity)),
        ("collaboration", Column::from_values(&collaboration)),
        ("spread", Column::from_values(&spread)),
        ("normal", Column::from_values(&normal)),
        ("skewed", Column::from_values(&skewed)),
    ])
    .unwrap()
}
