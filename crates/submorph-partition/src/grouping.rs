// crates/submorph-partition/src/grouping.rs

//! N-gram and first-token grouping, and the bounded recursive partitioner
//! that keeps closure clustering's O(N^2) cost in check.

use std::collections::BTreeMap;

/// Group domain indices by their first `n` characters. Domains shorter than
/// `n` map to themselves.
#[must_use]
pub fn ngram_groups(domains: &[String], n: usize) -> BTreeMap<String, Vec<usize>> {
    ngram_groups_over(domains, &(0..domains.len()).collect::<Vec<_>>(), n)
}

fn ngram_groups_over(
    domains: &[String],
    indices: &[usize],
    n: usize,
) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for &idx in indices {
        let domain = &domains[idx];
        let key: String = if domain.chars().count() < n {
            domain.clone()
        } else {
            domain.chars().take(n).collect()
        };
        groups.entry(key).or_default().push(idx);
    }
    groups
}

/// Group domain indices by the value of their first token (per
/// `submorph_tokenizer::tokenize`). Domains that fail to tokenize are
/// skipped — this component never fails outright.
#[must_use]
pub fn token_groups(domains: &[String]) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, domain) in domains.iter().enumerate() {
        let Ok(tokenized) = submorph_tokenizer::tokenize(domain) else {
            continue;
        };
        let Some(first_level) = tokenized.levels.first() else {
            continue;
        };
        let Some(first_token) = first_level.tokens.first() else {
            continue;
        };
        groups
            .entry(first_token.value.clone())
            .or_default()
            .push(idx);
    }
    groups
}

/// Recursively n-gram-partition `domains` so every returned group has at
/// most `max_group_size` members: 1-gram, then 2-gram, ... up to 4-gram;
/// groups still oversized at the depth limit are chunked sequentially.
#[must_use]
pub fn bounded_partition(domains: &[String], max_group_size: usize) -> Vec<Vec<usize>> {
    let all: Vec<usize> = (0..domains.len()).collect();
    partition_recursive(domains, all, 1, max_group_size)
}

const MAX_NGRAM_DEPTH: usize = 4;

fn partition_recursive(
    domains: &[String],
    indices: Vec<usize>,
    n: usize,
    max_group_size: usize,
) -> Vec<Vec<usize>> {
    if indices.len() <= max_group_size {
        return vec![indices];
    }
    if n > MAX_NGRAM_DEPTH {
        return indices
            .chunks(max_group_size.max(1))
            .map(<[usize]>::to_vec)
            .collect();
    }
    let groups = ngram_groups_over(domains, &indices, n);
    let mut out = Vec::new();
    for (_, group_indices) in groups {
        out.extend(partition_recursive(domains, group_indices, n + 1, max_group_size));
    }
    out
}
