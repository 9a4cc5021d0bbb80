//! Diagnostic event system
//!
//! Non-fatal problems (absent columns, skipped pairings, failed statistical
//! routines) are emitted as [`Diagnostic`] events on a [`DiagnosticBus`]
//! instead of being printed. Any number of [`Reporter`]s can observe a run.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Event emitted while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A run started over a dataset
    RunStarted { records: usize, columns: usize },

    /// A run finished
    RunCompleted { duration: Duration },

    /// A configured column is absent; the step using it was skipped
    ConfigurationMismatch { stage: &'static str, column: String },

    /// A value fed to the reverse coder lies outside [1, 5]
    RangeViolation {
        column: String,
        record: usize,
        value: f64,
    },

    /// A column had a single distinct value and was collapsed to the midpoint
    ConstantColumn { column: String },

    /// An ordinal label had no mapping and became missing
    UnmappedLabel { column: String, label: String },

    /// Fewer than two non-empty groups; the pairing was not tested
    PairingSkipped {
        independent: String,
        dependent: String,
        groups: usize,
    },

    /// A statistical routine failed; its output was omitted
    ComputationFailure { stage: &'static str, detail: String },

    /// A one-way test completed
    TestCompleted {
        independent: String,
        dependent: String,
        f_statistic: f64,
        p_value: f64,
    },
}

impl Diagnostic {
    /// Whether the event signals something the user should look at
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMismatch { .. }
                | Self::RangeViolation { .. }
                | Self::UnmappedLabel { .. }
                | Self::PairingSkipped { .. }
                | Self::ComputationFailure { .. }
        )
    }
}

/// Identity and timing of one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run started
    pub start_time: Instant,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            start_time: Instant::now(),
        }
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer of diagnostic events
pub trait Reporter: Send + Sync {
    /// Handle one event
    fn report(&self, event: &Diagnostic, context: &RunContext);

    /// Check if this reporter is interested in a particular event
    fn is_interested(&self, event: &Diagnostic) -> bool {
        let _ = event;
        true
    }

    /// Get the name of this reporter for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Fan-out of diagnostic events to registered reporters
///
/// Clones share the same reporters and run context.
#[derive(Clone)]
pub struct DiagnosticBus {
    reporters: Arc<Mutex<Vec<Box<dyn Reporter>>>>,
    context: RunContext,
}

impl DiagnosticBus {
    /// Create a bus with no reporters
    pub fn new() -> Self {
        Self {
            reporters: Arc::new(Mutex::new(Vec::new())),
            context: RunContext::new(),
        }
    }

    /// Create a bus with a single reporter
    pub fn with_reporter<R>(reporter: R) -> Self
    where
        R: Reporter + 'static,
    {
        let bus = Self::new();
        bus.register(reporter);
        bus
    }

    /// Register a reporter
    pub fn register<R>(&self, reporter: R)
    where
        R: Reporter + 'static,
    {
        match self.reporters.lock() {
            Ok(mut reporters) => reporters.push(Box::new(reporter)),
            Err(e) => tracing::error!("Failed to lock reporters: {e}"),
        }
    }

    /// Emit an event to every interested reporter
    pub fn emit(&self, event: Diagnostic) {
        let Ok(reporters) = self.reporters.lock() else {
            tracing::error!("Failed to lock reporters; dropping {event:?}");
            return;
        };
        for reporter in reporters.iter() {
            if reporter.is_interested(&event) {
                reporter.report(&event, &self.context);
            }
        }
    }

    /// Number of registered reporters
    pub fn reporter_count(&self) -> usize {
        self.reporters.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Run context shared by every event on this bus
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Default for DiagnosticBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiagnosticBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticBus")
            .field("run_id", &self.context.run_id)
            .field("reporters", &self.reporter_count())
            .finish()
    }
}

/// Reporter that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for LoggingReporter {
    fn report(&self, event: &Diagnostic, context: &RunContext) {
        let run = context.run_id;
        match event {
            Diagnostic::RunStarted { records, columns } => {
                tracing::info!(%run, records, columns, "analysis run started");
            }
            Diagnostic::RunCompleted { duration } => {
                tracing::info!(%run, ?duration, "analysis run completed");
            }
            Diagnostic::ConfigurationMismatch { stage, column } => {
                tracing::warn!(%run, stage, column = %column, "configured column not found, step skipped");
            }
            Diagnostic::RangeViolation {
                column,
                record,
                value,
            } => {
                tracing::warn!(%run, column = %column, record, value, "value outside [1, 5] before reverse coding");
            }
            Diagnostic::ConstantColumn { column } => {
                tracing::info!(%run, column = %column, "constant column collapsed to midpoint");
            }
            Diagnostic::UnmappedLabel { column, label } => {
                tracing::warn!(%run, column = %column, label = %label, "ordinal label has no mapping");
            }
            Diagnostic::PairingSkipped {
                independent,
                dependent,
                groups,
            } => {
                tracing::warn!(%run, independent = %independent, dependent = %dependent, groups, "not enough groups for ANOVA");
            }
            Diagnostic::ComputationFailure { stage, detail } => {
                tracing::warn!(%run, stage, detail = %detail, "computation failed, output omitted");
            }
            Diagnostic::TestCompleted {
                independent,
                dependent,
                f_statistic,
                p_value,
            } => {
                tracing::debug!(%run, independent = %independent, dependent = %dependent, f_statistic, p_value, "ANOVA completed");
            }
        }
    }
}

/// Reporter that keeps every event for later inspection
///
/// Clones share storage, so a clone can be registered on a bus and the
/// original inspected afterwards.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    events: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Collected warnings only
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events()
            .into_iter()
            .filter(Diagnostic::is_warning)
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: &Diagnostic, _context: &RunContext) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Reporter that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &Diagnostic, _context: &RunContext) {}

    fn is_interested(&self, _event: &Diagnostic) -> bool {
        false
    }
}
