// crates/submorph-core/src/error.rs

//! Typed error kinds the engine surfaces.
//!
//! All but [`Error::EmptyInput`] are recoverable, per-item failures: the
//! orchestrator constructs them, reports them through a [`crate::Logger`],
//! and discards the offending item rather than propagating.

use thiserror::Error;

/// Error kinds the core surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No domains were supplied to `learn_patterns`. The only variant that
    /// is ever returned from the public API.
    #[error("no domains supplied")]
    EmptyInput,

    /// Tokenization failed for one domain (malformed host, wildcard
    /// mid-name). Skipped, not raised.
    #[error("invalid domain {input:?}: {reason}")]
    InvalidDomain { input: String, reason: String },

    /// A closure was too small to produce a template.
    #[error("insufficient data in closure of size {closure_size}")]
    InsufficientData { closure_size: usize },

    /// A generated template failed validation against its own examples.
    #[error("template {template:?} has invalid shape: {reason}")]
    TemplateShape { template: String, reason: String },

    /// A template failed the quality filter (coverage/ratio/confidence).
    #[error("template {template:?} rejected: {reason}")]
    QualityRejected { template: String, reason: String },
}

impl Error {
    /// A short, stable tag for statistics/log correlation.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::EmptyInput => "empty_input",
            Error::InvalidDomain { .. } => "invalid_domain",
            Error::InsufficientData { .. } => "insufficient_data",
            Error::TemplateShape { .. } => "template_shape",
            Error::QualityRejected { .. } => "quality_rejected",
        }
    }
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, Error>;
