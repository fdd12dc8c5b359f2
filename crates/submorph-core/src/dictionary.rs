// crates/submorph-core/src/dictionary.rs

//! Optional, caller-supplied semantic dictionary: when at least half of a
//! variable's payload values match a single category (`service`, `env`,
//! `region`, ...), the variable is named after that category instead of
//! positionally (`p0`, `p1`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fraction of matching values required before a category name wins over a
/// positional name.
pub const CATEGORY_MATCH_THRESHOLD: f64 = 0.5;

/// A category -> member-words table used for semantic variable naming.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dictionary {
    categories: BTreeMap<String, Vec<String>>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category with its member words (case-insensitive match).
    #[must_use]
    pub fn with_category(mut self, name: impl Into<String>, words: Vec<String>) -> Self {
        self.categories.insert(name.into(), words);
        self
    }

    /// The three conventional categories (`service`, `env`, `region`) with
    /// a small starter vocabulary, useful as a default when a caller wants
    /// semantic naming without curating their own dictionary.
    #[must_use]
    pub fn common() -> Self {
        Self::new()
            .with_category(
                "service",
                ["api", "www", "app", "cdn", "mail", "admin", "portal", "gateway"]
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
            )
            .with_category(
                "env",
                ["dev", "prod", "staging", "stage", "qa", "test", "beta", "preprod"]
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
            )
            .with_category(
                "region",
                ["us", "eu", "ap", "cn", "sg", "jp", "kr", "in", "br", "ca"]
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
            )
    }

    /// If at least [`CATEGORY_MATCH_THRESHOLD`] of `values` fall in a single
    /// category, return that category's name. Ties broken by category name
    /// (lexicographic) for determinism.
    #[must_use]
    pub fn categorize(&self, values: &[String]) -> Option<String> {
        if values.is_empty() {
            return None;
        }
        let mut best: Option<(&str, usize)> = None;
        for (name, words) in &self.categories {
            let hits = values
                .iter()
                .filter(|v| words.iter().any(|w| w.eq_ignore_ascii_case(v)))
                .count();
            let better = match best {
                None => true,
                Some((best_name, best_hits)) => {
                    hits > best_hits || (hits == best_hits && name.as_str() < best_name)
                }
            };
            if better && hits > 0 {
                best = Some((name, hits));
            }
        }
        best.and_then(|(name, hits)| {
            let frac = hits as f64 / values.len() as f64;
            (frac >= CATEGORY_MATCH_THRESHOLD).then(|| name.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_category_wins() {
        let dict = Dictionary::common();
        let values = vec!["api".to_string(), "www".to_string(), "foo".to_string()];
        assert_eq!(dict.categorize(&values), Some("service".to_string()));
    }

    #[test]
    fn below_threshold_yields_positional_fallback() {
        let dict = Dictionary::common();
        let values = vec!["api".to_string(), "foo".to_string(), "bar".to_string()];
        assert_eq!(dict.categorize(&values), None);
    }

    #[test]
    fn empty_dictionary_never_categorizes() {
        let dict = Dictionary::new();
        assert_eq!(dict.categorize(&["api".to_string()]), None);
    }
}
