// crates/submorph-cluster/src/lib.rs

//! δ-neighborhood closure clustering.
//!
//! Strategies are plain enum variants dispatched in one function rather
//! than dynamic trait objects, keeping every flavor's traversal over a
//! shared context instead of behind indirection.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::collections::BTreeSet;
use submorph_core::{Cancel, Closure};
use submorph_editdist::EditDistanceMemo;
use submorph_partition::{bounded_partition, ngram_groups, token_groups};

/// Which closure-construction strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// δ-closures over the whole level-group list.
    Global,
    /// δ-closures repeated within each 1/2/3-gram prefix group.
    NgramPrefix,
    /// δ-closures repeated within each first-token group.
    Token,
}

/// Run every strategy in `strategies` for every δ in `[delta_lo, delta_hi]`,
/// deduplicating by member set as closures are discovered — no two
/// returned closures ever share the same member set.
///
/// Checks `cancel` between δ values and returns the best-so-far closures if
/// set.
#[must_use]
pub fn build_closures(
    domains: &[String],
    delta_lo: u32,
    delta_hi: u32,
    strategies: &[Strategy],
    memo: &EditDistanceMemo,
    max_group_size: usize,
    cancel: &Cancel,
) -> Vec<Closure> {
    let mut out = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for delta in delta_lo..=delta_hi {
        if cancel.is_set() {
            return out;
        }
        for &strategy in strategies {
            for closure in run_strategy(domains, strategy, delta, memo, max_group_size) {
                let key = closure.canonical_key();
                if seen.insert(key) {
                    out.push(closure);
                }
            }
        }
    }
    out
}

fn run_strategy(
    domains: &[String],
    strategy: Strategy,
    delta: u32,
    memo: &EditDistanceMemo,
    max_group_size: usize,
) -> Vec<Closure> {
    match strategy {
        Strategy::Global => closures_within(domains, delta, memo, max_group_size),
        Strategy::NgramPrefix => {
            let mut out = Vec::new();
            for n in 1..=3usize {
                for (_, indices) in ngram_groups(domains, n) {
                    let group: Vec<String> = indices.iter().map(|&i| domains[i].clone()).collect();
                    out.extend(closures_within(&group, delta, memo, max_group_size));
                }
            }
            out
        }
        Strategy::Token => {
            let mut out = Vec::new();
            for (_, indices) in token_groups(domains) {
                let group: Vec<String> = indices.iter().map(|&i| domains[i].clone()).collect();
                out.extend(closures_within(&group, delta, memo, max_group_size));
            }
            out
        }
    }
}

/// δ-closures over a (possibly n-gram-bounded) group of domains.
fn closures_within(
    group: &[String],
    delta: u32,
    memo: &EditDistanceMemo,
    max_group_size: usize,
) -> Vec<Closure> {
    if group.len() > max_group_size {
        let group_owned = group.to_vec();
        return bounded_partition(&group_owned, max_group_size)
            .into_iter()
            .flat_map(|idxs| {
                let chunk: Vec<String> = idxs.into_iter().map(|i| group_owned[i].clone()).collect();
                closures_within(&chunk, delta, memo, max_group_size)
            })
            .collect();
    }

    let mut out = Vec::with_capacity(group.len());
    for seed in group {
        let mut members = vec![seed.clone()];
        for candidate in group {
            if candidate != seed && memo.distance(seed, candidate) <= delta {
                members.push(candidate.clone());
            }
        }
        if members.len() > 1 {
            out.push(Closure::new(members, delta));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_respect_delta_invariant_against_their_seed() {
        // Constructed directly (bypassing dedup/sort) so the original seed
        // is known, exercising the low-level closure builder's invariant.
        let group: Vec<String> = vec![
            "api-dev-01.example.com".into(),
            "api-dev-02.example.com".into(),
            "api-dev-03.example.com".into(),
            "totally-different.example.com".into(),
        ];
        let memo = EditDistanceMemo::new();
        let closures = closures_within(&group, 1, &memo, 128);
        assert!(!closures.is_empty());
        for closure in &closures {
            // Some member must act as a seed within delta of every other.
            let has_seed = closure.domains.iter().any(|seed| {
                closure
                    .domains
                    .iter()
                    .all(|member| memo.distance(seed, member) <= closure.delta)
            });
            assert!(has_seed, "closure {:?} has no valid seed", closure.domains);
        }
    }

    #[test]
    fn closures_have_expected_count_for_a_hand_built_example() {
        let domains: Vec<String> = vec![
            "api-dev-01.example.com".into(),
            "api-dev-02.example.com".into(),
            "api-dev-03.example.com".into(),
            "cdn.example.com".into(),
        ];
        let memo = EditDistanceMemo::new();
        let closures = build_closures(
            &domains,
            1,
            2,
            &[Strategy::Global],
            &memo,
            128,
            &Cancel::new(),
        );
        assert!(!closures.is_empty());
    }

    #[test]
    fn closures_are_deduplicated_by_member_set() {
        let domains: Vec<String> = vec!["a.example.com".into(), "b.example.com".into()];
        let memo = EditDistanceMemo::new();
        let closures = build_closures(
            &domains,
            1,
            3,
            &[Strategy::Global, Strategy::NgramPrefix, Strategy::Token],
            &memo,
            128,
            &Cancel::new(),
        );
        let mut keys: Vec<String> = closures.iter().map(Closure::canonical_key).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(before, keys.len());
    }

    #[test]
    fn size_one_closures_are_discarded() {
        let domains: Vec<String> = vec!["lonely.example.com".into()];
        let memo = EditDistanceMemo::new();
        let closures = build_closures(
            &domains,
            1,
            1,
            &[Strategy::Global],
            &memo,
            128,
            &Cancel::new(),
        );
        assert!(closures.is_empty());
    }

    #[test]
    fn cancellation_returns_best_so_far() {
        let domains: Vec<String> = vec!["a.example.com".into(), "aa.example.com".into()];
        let memo = EditDistanceMemo::new();
        let cancel = Cancel::new();
        cancel.set();
        let closures = build_closures(&domains, 1, 3, &[Strategy::Global], &memo, 128, &cancel);
        assert!(closures.is_empty());
    }
}
