// crates/submorph-core/src/logging.rs

//! A thin logging seam so the core carries no global logging state. Every
//! skip/stage transition in the pipeline is reported through this trait
//! instead of a package-level logger. The default [`TracingLogger`]
//! forwards to the `tracing` crate; callers that want statistics only (no
//! log lines) can use [`NullLogger`].

use crate::error::Error;

/// Observes per-item skips and per-stage progress during induction.
///
/// Implementations must be cheap to call — the orchestrator invokes
/// `on_skip` once per discarded domain/closure/template, which can be a
/// large fraction of a big input.
pub trait Logger: Send + Sync {
    /// Called whenever an item (domain, closure, or template) is skipped.
    fn on_skip(&self, stage: &str, err: &Error) {
        let _ = (stage, err);
    }

    /// Called when a pipeline stage starts or finishes for a level-group.
    fn on_stage(&self, stage: &str, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called once at the end of a run with the final statistics summary.
    fn on_summary(&self, summary: &str) {
        let _ = summary;
    }
}

/// Forwards every callback to `tracing` at an appropriate level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn on_skip(&self, stage: &str, err: &Error) {
        tracing::debug!(stage, kind = err.kind_name(), %err, "skipped item");
    }

    fn on_stage(&self, stage: &str, detail: &str) {
        tracing::info!(stage, detail, "pipeline stage");
    }

    fn on_summary(&self, summary: &str) {
        tracing::info!(%summary, "induction complete");
    }
}

/// Discards every callback. Useful for benchmarks and tests that want a
/// quiet pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLogger {
        skips: AtomicUsize,
    }

    impl Logger for CountingLogger {
        fn on_skip(&self, _stage: &str, _err: &Error) {
            self.skips.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn custom_logger_receives_skips() {
        let logger = CountingLogger::default();
        logger.on_skip("tokenize", &Error::EmptyInput);
        logger.on_skip("tokenize", &Error::EmptyInput);
        assert_eq!(logger.skips.load(Ordering::Relaxed), 2);
    }
}
