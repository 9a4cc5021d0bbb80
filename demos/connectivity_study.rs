//! Connectivity study on a CSV export
//!
//! ```text
//! cargo run --example connectivity_study -- comprehensive_anova_data.csv results/ [config.json]
//! ```
//!
//! Without a config file the built-in connectivity study preset is used.
//! Set `RUST_LOG=debug` for per-stage detail.

use anyhow::{bail, Context};
use survey_stats::{
    survey_io, AnalysisConfig, CollectingReporter, DiagnosticBus, LoggingReporter, StudyPipeline,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [input, output, ..] => (input.clone(), output.clone()),
        _ => bail!("usage: connectivity_study <input.csv> <output-dir> [config.json]"),
    };
    let config = match args.get(2) {
        Some(path) => survey_io::read_config_path(path).with_context(|| format!("loading {path}"))?,
        None => AnalysisConfig::connectivity_study(),
    };

    let collector = CollectingReporter::new();
    let bus = DiagnosticBus::with_reporter(LoggingReporter::new());
    bus.register(collector.clone());

    let report = StudyPipeline::new(config)?
        .with_diagnostics(bus)
        .run_files(&input, &output)
        .with_context(|| format!("analysing {input}"))?;

    println!("{report}");
    let warnings = collector.warnings();
    if !warnings.is_empty() {
        println!("{} warning(s) during the run, see the log above", warnings.len());
    }
    println!("Tables written to {output}");
    Ok(())
}
