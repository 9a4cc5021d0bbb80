//! End-to-end checks of the analyses on a seeded synthetic survey

mod common;

use approx::assert_abs_diff_eq;
use common::synthetic_survey;
use survey_anova::{AnovaEngine, AssumptionChecker, PostHocAnalyzer, TukeyHsd};
use survey_core::{CollectingReporter, Diagnostic, DiagnosticBus, GroupKey};

#[test]
fn test_battery_detects_speed_effect() {
    let ds = synthetic_survey(150);
    let collector = CollectingReporter::new();
    let engine = AnovaEngine::new(0.05)
        .unwrap()
        .with_diagnostics(DiagnosticBus::with_reporter(collector.clone()));

    let table = engine.run_battery(&ds, &["speed", "reliability"], &["productivity", "collaboration"]);
    assert_eq!(table.len(), 4);

    let result = &table.results()[0];
    assert_eq!(result.independent, "speed");
    assert_eq!(result.dependent, "productivity");
    assert_eq!(result.n_groups, 5);
    assert_eq!(result.n_observations, 150);
    assert!(result.p_value < 1e-10);
    assert!(result.effect_size > 0.6 && result.effect_size < 1.0);

    for r in &table {
        assert!((0.0..=1.0).contains(&r.p_value));
        assert_eq!(r.significant, r.p_value < 0.05);
    }

    let completed = collector
        .events()
        .iter()
        .filter(|d| matches!(d, Diagnostic::TestCompleted { .. }))
        .count();
    assert_eq!(completed, 4);
    assert!(collector.warnings().is_empty());

    let candidate = table.posthoc_candidate().unwrap();
    let min_p = table.iter().map(|r| r.p_value).fold(f64::INFINITY, f64::min);
    assert_eq!(candidate.p_value, min_p);
}

#[test]
fn test_tukey_separates_every_speed_level() {
    let ds = synthetic_survey(150);
    let table = PostHocAnalyzer::<TukeyHsd>::default()
        .tukey_hsd(&ds, "speed", "productivity")
        .unwrap();

    assert_eq!(table.comparisons.len(), 10);
    assert_eq!(table.rejected().count(), 10);

    let extreme = table
        .comparisons
        .iter()
        .find(|c| c.group1 == GroupKey::number(1.0) && c.group2 == GroupKey::number(5.0))
        .unwrap();
    assert_abs_diff_eq!(extreme.mean_diff, 3.2, epsilon = 0.5);
    assert!(extreme.lower > 0.0);
}

#[test]
fn test_two_way_main_effects() {
    let ds = synthetic_survey(150);
    let engine = AnovaEngine::new(0.05).unwrap();
    let table = engine.two_way(&ds, "speed", "reliability", "collaboration").unwrap();

    assert_eq!(table.n_observations, 150);
    assert_eq!(table.factor_a_effect().df, 4);
    assert_eq!(table.factor_b_effect().df, 2);
    assert_eq!(table.interaction().df, 8);
    assert_eq!(table.residual().df, 135);
    assert_eq!(table.cells.len(), 15);
    assert!(table.cells.iter().all(|c| c.n == 10));

    assert!(table.factor_a_effect().p_value.unwrap() < 1e-6);
    assert!(table.factor_b_effect().p_value.unwrap() < 1e-6);
}

#[test]
fn test_assumption_checks() {
    let ds = synthetic_survey(150);
    let checker = AssumptionChecker::new();

    let normal = checker.column_normality(&ds, "normal").unwrap();
    assert_eq!(normal.n, 150);
    assert!(normal.statistic > 0.97, "W = {}", normal.statistic);

    let skewed = checker.column_normality(&ds, "skewed").unwrap();
    assert!(skewed.rejects(0.001), "p = {}", skewed.p_value);

    let levene = checker.grouped_homogeneity(&ds, "speed", "spread").unwrap();
    assert!(levene.rejects(0.001), "p = {}", levene.p_value);
}
