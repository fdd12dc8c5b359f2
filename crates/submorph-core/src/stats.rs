// crates/submorph-core/src/stats.rs

//! Persisted pipeline statistics, for callers that want to log or display
//! them. This crate never writes them anywhere itself.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Per-strategy closure counts (Global / N-gram / Token).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyCounts {
    pub global: usize,
    pub ngram: usize,
    pub token: usize,
}

impl StrategyCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.global + self.ngram + self.token
    }
}

/// Statistics describing one `learn_patterns` run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub input_domains: usize,
    pub filtered_domains: usize,
    pub level_groups: usize,
    pub strategy_patterns: StrategyCounts,
    pub raw_patterns: usize,
    pub after_dedup: usize,
    pub after_ap: usize,
    pub final_patterns: usize,
    pub mode: Option<Mode>,
}
