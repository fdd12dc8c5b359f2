// crates/submorph-core/src/options.rs

//! Engine configuration: a plain struct with a `Default` impl, passed to
//! `Inducer::new`.

use crate::dictionary::Dictionary;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Strategy for merging templates within an affinity-propagation cluster.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Keep the exemplar's template; union domain sets; recompute
    /// ratio/confidence.
    #[default]
    Exemplar,
    /// Union payloads and domains only if average intra-cluster domain
    /// Jaccard exceeds 0.5; otherwise fall back to `Exemplar`.
    UnionConservative,
    /// Always union payloads per variable index and union domains.
    UnionAggressive,
}

/// Tunable inputs to [`Inducer::new`](../../submorph/struct.Inducer.html).
///
/// Every field that overlaps a [`crate::mode::ModeParams`] knob is
/// `Option`-wrapped: `None` defers to the selected [`Mode`]'s default;
/// `Some` always wins over the mode default. Fields with no mode
/// counterpart (`max_ratio`, `absolute_threshold`, `merge_strategy`,
/// `enable_compression`, `enable_dedupe`, `graduated_ratio_caps`) are
/// plain values with no mode fallback.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InducerOptions {
    /// Minimum closure coverage to survive the quality filter. `None`
    /// defers to the mode's default.
    pub min_coverage: Option<usize>,
    pub max_ratio: f64,
    pub absolute_threshold: u64,
    /// Lower δ bound for closure clustering. `None` defers to the mode's
    /// default.
    pub delta_lo: Option<u32>,
    /// Upper δ bound for closure clustering. `None` defers to the mode's
    /// default.
    pub delta_hi: Option<u32>,
    /// Largest group size a closure search runs over directly before
    /// splitting. `None` defers to the mode's default.
    pub max_group_size: Option<usize>,
    /// Force a specific [`Mode`] instead of selecting from input size.
    pub mode_override: Option<Mode>,
    /// Optional semantic dictionary for categorical variable naming.
    pub dictionary: Option<Dictionary>,
    pub merge_strategy: MergeStrategy,
    pub enable_compression: bool,
    pub enable_dedupe: bool,
    /// Cumulative coverage the budget selector aims for. `None` defers to
    /// the mode's default.
    pub target_coverage: Option<f64>,
    /// Marginal-coverage flatness threshold that stops the budget
    /// selector's greedy walk. `None` defers to the mode's default.
    pub elbow_sensitivity: Option<f64>,
    /// Lower clamp on the budget selector's output count. `None` defers
    /// to the mode's default.
    pub min_patterns: Option<usize>,
    /// Upper clamp on the budget selector's output count. `None` defers
    /// to the mode's default.
    pub max_patterns: Option<usize>,
    /// Use coverage-graduated ratio caps (40/60/100 at coverage
    /// `<10`/`<50`/`>=50`) instead of the flat `max_ratio`.
    pub graduated_ratio_caps: bool,
}

impl Default for InducerOptions {
    fn default() -> Self {
        Self {
            min_coverage: None,
            max_ratio: 25.0,
            absolute_threshold: 500,
            delta_lo: None,
            delta_hi: None,
            max_group_size: None,
            mode_override: None,
            dictionary: None,
            merge_strategy: MergeStrategy::default(),
            enable_compression: true,
            enable_dedupe: true,
            target_coverage: None,
            elbow_sensitivity: None,
            min_patterns: None,
            max_patterns: None,
            graduated_ratio_caps: true,
        }
    }
}
