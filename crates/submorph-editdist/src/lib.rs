// crates/submorph-editdist/src/lib.rs

//! A concurrent, memoized Levenshtein distance table. The memo is the
//! single source of truth for distance within its enclosing level-group;
//! callers own one instance per group and drop it when the group
//! finishes.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use dashmap::DashMap;
use rayon::prelude::*;
use submorph_core::{canonical_pair, Cancel};

/// A thread-safe, memoized edit-distance table keyed by canonical
/// `(min(a,b), max(a,b))` string pairs.
#[derive(Default)]
pub struct EditDistanceMemo {
    table: DashMap<(String, String), u32>,
}

impl EditDistanceMemo {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Compute-or-return the Levenshtein distance between `a` and `b`.
    /// Symmetric and independent of call order.
    #[must_use]
    pub fn distance(&self, a: &str, b: &str) -> u32 {
        let key = canonical_pair(a, b);
        if let Some(existing) = self.table.get(&key) {
            return *existing;
        }
        let d = levenshtein(a, b);
        self.table.insert(key, d);
        d
    }

    /// Compute every ordered pair's distance up front, sequentially.
    pub fn precompute(&self, strings: &[String]) {
        for i in 0..strings.len() {
            for j in (i + 1)..strings.len() {
                self.distance(&strings[i], &strings[j]);
            }
        }
    }

    /// Compute every ordered pair's distance up front, using a rayon
    /// thread pool. Yields the same table as [`Self::precompute`] — the
    /// memo is an identity map keyed on content, not on arrival order, so
    /// parallelism is a pure throughput optimization.
    ///
    /// Checks `cancel` between chunks and stops early (with a partially
    /// filled memo) if it has been set.
    pub fn precompute_parallel(&self, strings: &[String], cancel: &Cancel) {
        let pairs: Vec<(usize, usize)> = (0..strings.len())
            .flat_map(|i| ((i + 1)..strings.len()).map(move |j| (i, j)))
            .collect();

        const CHUNK: usize = 4096;
        for chunk in pairs.chunks(CHUNK) {
            if cancel.is_set() {
                return;
            }
            chunk.par_iter().for_each(|&(i, j)| {
                self.distance(&strings[i], &strings[j]);
            });
        }
    }

    /// Drop every memoized entry.
    pub fn clear(&self) {
        self.table.clear();
    }

    /// Number of memoized pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Classic O(len(a) * len(b)) Levenshtein DP over bytes (DNS labels are
/// ASCII, so byte-wise is equivalent to char-wise and avoids UTF-8
/// decoding overhead).
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> u32 {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len() as u32;
    }
    if b.is_empty() {
        return a.len() as u32;
    }

    let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
    let mut cur = vec![0u32; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i as u32 + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = u32::from(ca != cb);
            cur[j + 1] = (prev[j] + cost)
                .min(prev[j + 1] + 1)
                .min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_identical_strings_is_zero() {
        assert_eq!(levenshtein("api-dev-01", "api-dev-01"), 0);
    }

    #[test]
    fn levenshtein_matches_hand_computed_example() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn levenshtein_is_symmetric() {
        let pairs = [
            ("api-dev-01", "api-dev-02"),
            ("scheduler", "webhook"),
            ("", "abc"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    #[test]
    fn memo_is_symmetric_and_deterministic_under_either_call_order() {
        let memo = EditDistanceMemo::new();
        let d1 = memo.distance("api-dev-01", "api-dev-02");
        let memo2 = EditDistanceMemo::new();
        let d2 = memo2.distance("api-dev-02", "api-dev-01");
        assert_eq!(d1, d2);
        assert_eq!(memo.distance("api-dev-02", "api-dev-01"), d1);
    }

    #[test]
    fn parallel_precompute_matches_sequential() {
        let strings: Vec<String> = (0..40).map(|i| format!("host-{i:03}")).collect();

        let seq = EditDistanceMemo::new();
        seq.precompute(&strings);

        let par = EditDistanceMemo::new();
        par.precompute_parallel(&strings, &Cancel::new());

        assert_eq!(seq.len(), par.len());
        for i in 0..strings.len() {
            for j in (i + 1)..strings.len() {
                assert_eq!(
                    seq.distance(&strings[i], &strings[j]),
                    par.distance(&strings[i], &strings[j])
                );
            }
        }
    }

    #[test]
    fn clear_empties_the_table() {
        let memo = EditDistanceMemo::new();
        memo.distance("a", "b");
        assert!(!memo.is_empty());
        memo.clear();
        assert!(memo.is_empty());
    }

    #[test]
    fn cancellation_stops_precompute_early() {
        let strings: Vec<String> = (0..200).map(|i| format!("host-{i:04}")).collect();
        let cancel = Cancel::new();
        cancel.set();
        let memo = EditDistanceMemo::new();
        memo.precompute_parallel(&strings, &cancel);
        assert!(memo.is_empty());
    }
}
