// crates/submorph-core/src/types.rs

//! Canonical data model shared across the submorph workspace.
//!
//! These live in `submorph-core` and are re-exported at the crate root so
//! other crates import via `submorph_core::Token`, `submorph_core::Closure`,
//! etc.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Lexical class of a single [`Token`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Alphabetic (or mixed non-numeric) run.
    Word,
    /// A piece carrying a leading `-` that was not absorbed into a number.
    Dash,
    /// All-digit run.
    Number,
}

/// One lexical unit within a [`Level`]. `value` preserves any leading `-`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub position: u32,
}

impl Token {
    #[must_use]
    pub fn new(value: impl Into<String>, kind: TokenKind, position: u32) -> Self {
        Self {
            value: value.into(),
            kind,
            position,
        }
    }

    /// The token's value with any leading `-` stripped.
    #[must_use]
    pub fn bare_value(&self) -> &str {
        self.value.strip_prefix('-').unwrap_or(&self.value)
    }
}

/// One dot-separated label of the subdomain, zero-indexed from the left.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Level {
    pub index: u32,
    pub tokens: Vec<Token>,
}

/// The result of tokenizing one hostname.
///
/// Invariant: `levels.len() == number_of_dots(subdomain) + 1` when
/// `subdomain` is non-empty; `levels` is empty when the input is its own
/// root (no subdomain part).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizedDomain {
    pub original: String,
    pub subdomain: String,
    pub root: String,
    pub levels: Vec<Level>,
}

impl TokenizedDomain {
    /// Total number of tokens across every level.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.levels.iter().map(|l| l.tokens.len()).sum()
    }
}

/// Domains sharing the same subdomain depth (number of dot-separated
/// levels). Partitions the input so structurally different hostnames never
/// feed the same closure/template.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelGroup {
    pub level_count: usize,
    pub root: String,
    /// Domains in first-seen input order, deduplicated.
    pub domains: Vec<String>,
}

/// A set of domains pairwise within `delta` edit distance of a seed.
///
/// Invariant: every pair in `domains` lies within `delta` edit distance of
/// the closure's seed; `size == domains.len()`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Closure {
    pub domains: Vec<String>,
    pub delta: u32,
    pub size: usize,
}

impl Closure {
    /// Build a closure from a seed and its neighbors within `delta`,
    /// deduplicating and sorting for a stable canonical form.
    #[must_use]
    pub fn new(mut domains: Vec<String>, delta: u32) -> Self {
        domains.sort();
        domains.dedup();
        let size = domains.len();
        Self {
            domains,
            delta,
            size,
        }
    }

    /// Canonical identity used for closure deduplication: the sorted,
    /// newline-joined member list.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        self.domains.join("\n")
    }
}

/// An integer generator bound to a printf-style width spec.
///
/// Invariant: `end >= start`; cardinality is `(end - start) / step + 1`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumberRange {
    pub start: i64,
    pub end: i64,
    pub format: String,
    pub step: u32,
    #[serde(rename = "type")]
    pub kind: NumberRangeKind,
}

/// The (currently single) generator mode for a [`NumberRange`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NumberRangeKind {
    Iterator,
}

impl NumberRange {
    /// Number of distinct integers this range generates.
    #[must_use]
    pub fn cardinality(&self) -> u64 {
        let span = (self.end - self.start) as u64;
        span / u64::from(self.step.max(1)) + 1
    }
}

/// A named, generative slot inside a [`DSLTemplate`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DSLVariable {
    /// A word- or dash-kind positional/categorical variable bound to a
    /// sorted, deduplicated payload set.
    Payload {
        name: String,
        kind: TokenKind,
        payloads: Vec<String>,
    },
    /// A numeric variable bound to an integer range.
    Number { name: String, range: NumberRange },
}

impl DSLVariable {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DSLVariable::Payload { name, .. } | DSLVariable::Number { name, .. } => name,
        }
    }

    /// Cardinality of the values this variable can take.
    #[must_use]
    pub fn generations(&self) -> u64 {
        match self {
            DSLVariable::Payload { payloads, .. } => payloads.len() as u64,
            DSLVariable::Number { range, .. } => range.cardinality(),
        }
    }
}

/// A generative pattern over one or more levels, ending in `.{{root}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DSLTemplate {
    pub template: String,
    pub level_count: usize,
    pub variables: Vec<DSLVariable>,
    pub coverage: usize,
    pub ratio: f64,
    pub confidence: f64,
    pub domains: Vec<String>,
}

impl DSLTemplate {
    /// `true` if `self`'s domain set is a proper superset of `other`'s
    /// (strictly larger, and every one of `other`'s domains is in `self`)
    /// with at least as much coverage. Equal domain sets never subsume
    /// each other, even with distinct template strings, so `filter_subsumed`
    /// can never drop both sides of a tie.
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        if self.template == other.template {
            return false;
        }
        if self.coverage < other.coverage {
            return false;
        }
        if self.domains.len() <= other.domains.len() {
            return false;
        }
        let self_set: std::collections::BTreeSet<&str> =
            self.domains.iter().map(String::as_str).collect();
        other
            .domains
            .iter()
            .all(|d| self_set.contains(d.as_str()))
    }

    /// Estimated number of distinct strings this template can generate:
    /// the product of every variable's cardinality.
    #[must_use]
    pub fn estimated_generations(&self) -> u64 {
        self.variables
            .iter()
            .map(DSLVariable::generations)
            .fold(1u64, |acc, n| acc.saturating_mul(n.max(1)))
    }
}

/// Confidence weighting constants.
pub const CONFIDENCE_RATIO_WEIGHT: f64 = 0.85;
pub const CONFIDENCE_COVERAGE_WEIGHT: f64 = 0.15;

/// `confidence = 0.85*min(1, 1/ratio) + 0.15*min(1, log10(coverage)/3)`,
/// clamped to `[0, 1]`.
#[must_use]
pub fn confidence(ratio: f64, coverage: usize) -> f64 {
    let ratio_term = if ratio > 0.0 { (1.0 / ratio).min(1.0) } else { 0.0 };
    let coverage_term = if coverage > 0 {
        ((coverage as f64).log10() / 3.0).min(1.0)
    } else {
        0.0
    };
    let raw = CONFIDENCE_RATIO_WEIGHT * ratio_term + CONFIDENCE_COVERAGE_WEIGHT * coverage_term;
    raw.clamp(0.0, 1.0)
}

/// A cluster of template indices with exactly one exemplar (affinity
/// propagation output; see `submorph-affinity`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub exemplar: usize,
    pub members: Vec<usize>,
}

/// Orders `(a, b)` so `a <= b` by natural string order — the canonical key
/// shape used by `EditDistanceMemo`.
#[must_use]
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    match a.cmp(b) {
        Ordering::Less | Ordering::Equal => (a.to_string(), b.to_string()),
        Ordering::Greater => (b.to_string(), a.to_string()),
    }
}
