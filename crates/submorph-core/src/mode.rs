// crates/submorph-core/src/mode.rs

//! Mode selection: the orchestrator picks a [`Mode`] from the input size,
//! and the mode fixes the knobs every downstream component reads.

use serde::{Deserialize, Serialize};

/// Operating mode, selected from input size unless overridden.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `< 100` domains: widest delta range, smallest minimum coverage.
    Thorough,
    /// `100..=1000` domains.
    Balanced,
    /// `> 1000` domains: tightest bounds to keep the pipeline linear-ish.
    Fast,
}

impl Mode {
    /// Select a mode from the input size.
    #[must_use]
    pub fn select(domain_count: usize) -> Self {
        if domain_count < 100 {
            Mode::Thorough
        } else if domain_count <= 1000 {
            Mode::Balanced
        } else {
            Mode::Fast
        }
    }

    /// The fixed parameter set for this mode.
    #[must_use]
    pub fn params(self) -> ModeParams {
        match self {
            Mode::Thorough => ModeParams {
                delta_lo: 1,
                delta_hi: 3,
                min_coverage: 2,
                min_patterns: 1,
                max_patterns: 40,
                target_coverage: 0.95,
                elbow_sensitivity: 0.01,
                max_group_size: 64,
                ap_iterations: 200,
                enable_strategy2: true,
                enable_strategy3: true,
            },
            Mode::Balanced => ModeParams {
                delta_lo: 1,
                delta_hi: 2,
                min_coverage: 3,
                min_patterns: 1,
                max_patterns: 60,
                target_coverage: 0.90,
                elbow_sensitivity: 0.02,
                max_group_size: 128,
                ap_iterations: 120,
                enable_strategy2: true,
                enable_strategy3: true,
            },
            Mode::Fast => ModeParams {
                delta_lo: 1,
                delta_hi: 1,
                min_coverage: 4,
                min_patterns: 1,
                max_patterns: 80,
                target_coverage: 0.85,
                elbow_sensitivity: 0.03,
                max_group_size: 256,
                ap_iterations: 60,
                enable_strategy2: true,
                enable_strategy3: false,
            },
        }
    }
}

/// Knobs fixed by a [`Mode`]. Every field here that [`crate::InducerOptions`]
/// also names is `Option`-wrapped there; an unset option field defers to the
/// matching value here. `ap_iterations`, `enable_strategy2`, and
/// `enable_strategy3` have no options counterpart and always come from here.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModeParams {
    pub delta_lo: u32,
    pub delta_hi: u32,
    pub min_coverage: usize,
    pub min_patterns: usize,
    pub max_patterns: usize,
    pub target_coverage: f64,
    pub elbow_sensitivity: f64,
    pub max_group_size: usize,
    pub ap_iterations: usize,
    pub enable_strategy2: bool,
    pub enable_strategy3: bool,
}
