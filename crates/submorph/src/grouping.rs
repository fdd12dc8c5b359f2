//! Groups tokenized domains into [`LevelGroup`]s: same subdomain depth and
//! same registrable root, so a closure never mixes domains whose template
//! would need to bind `{{root}}` to two different things.

use std::collections::BTreeMap;
use submorph_core::{LevelGroup, TokenizedDomain};

/// Partition `tokenized` by `(level_count, root)`, returning groups sorted
/// ascending by level count (ties broken by root) and with each group's
/// domains deduplicated in first-seen order.
#[must_use]
pub fn group_by_level(tokenized: &[TokenizedDomain]) -> Vec<LevelGroup> {
    let mut groups: BTreeMap<(usize, String), Vec<String>> = BTreeMap::new();

    for t in tokenized {
        let level_count = t.levels.len();
        if level_count == 0 {
            // No generative subdomain structure to pattern-match against.
            continue;
        }
        let key = (level_count, t.root.clone());
        let bucket = groups.entry(key).or_default();
        if !bucket.contains(&t.original) {
            bucket.push(t.original.clone());
        }
    }

    groups
        .into_iter()
        .map(|((level_count, root), domains)| LevelGroup {
            level_count,
            root,
            domains,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use submorph_tokenizer::tokenize;

    #[test]
    fn groups_share_both_level_count_and_root() {
        let hosts = ["dev.example.com", "prod.example.com", "dev.example.org", "a.b.example.com"];
        let tokenized: Vec<TokenizedDomain> = hosts.iter().map(|h| tokenize(h).unwrap()).collect();
        let groups = group_by_level(&tokenized);

        assert_eq!(groups.len(), 3);
        let one_level_com = groups
            .iter()
            .find(|g| g.level_count == 1 && g.root == "example.com")
            .unwrap();
        assert_eq!(one_level_com.domains.len(), 2);
    }

    #[test]
    fn bare_root_domains_are_excluded() {
        let tokenized = vec![tokenize("example.com").unwrap()];
        assert!(group_by_level(&tokenized).is_empty());
    }
}
