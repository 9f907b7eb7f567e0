//! # navseq Logger
//!
//! Logging and tracing support for navseq sequences

use navseq_context::{SequenceSnapshot, StepState};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Logger bound to one sequence's trace id
pub struct Logger {
    pub trace_id: String,
}

impl Logger {
    /// Create a logger with a fresh trace ID
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific trace ID
    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }

    /// Logger sharing the trace ID of a sequence snapshot
    pub fn for_sequence(snapshot: &SequenceSnapshot) -> Self {
        Self::with_trace_id(snapshot.trace_id.clone())
    }

    /// Initialize the global tracing subscriber, filtered by `RUST_LOG`
    pub fn init_tracing() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    /// Like [`Logger::init_tracing`], but falls back to `default_filter`
    /// when `RUST_LOG` is unset and reports failure instead of panicking
    /// when a subscriber is already installed.
    pub fn try_init_tracing(default_filter: &str) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e).context("failed to install tracing subscriber"))
    }

    pub fn info(&self, message: &str) {
        info!(trace_id = %self.trace_id, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(trace_id = %self.trace_id, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(trace_id = %self.trace_id, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!(trace_id = %self.trace_id, "{}", message);
    }

    /// Log per-state counts and every stored step error
    pub fn log_sequence_summary(&self, snapshot: &SequenceSnapshot) {
        info!(
            trace_id = %self.trace_id,
            total_steps = snapshot.steps.len(),
            idle = snapshot.count(StepState::Idle),
            validating = snapshot.count(StepState::Validating),
            failed = snapshot.count(StepState::Failed),
            ready = snapshot.count(StepState::ReadyToAdvance),
            submitting = snapshot.count(StepState::Submitting),
            "Sequence summary"
        );

        for step in snapshot.failed_steps() {
            warn!(
                trace_id = %self.trace_id,
                index = step.index,
                step = step.name,
                state = %step.state,
                error = %step.error_message,
                "Step error"
            );
        }
    }

    /// Log each step's state on its own line
    pub fn log_step_details(&self, snapshot: &SequenceSnapshot) {
        for step in &snapshot.steps {
            debug!(
                trace_id = %self.trace_id,
                index = step.index,
                id = step.id,
                step = step.name,
                state = %step.state,
                loading = step.is_loading(),
                "Step state"
            );
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
