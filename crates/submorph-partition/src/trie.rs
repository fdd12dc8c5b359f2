// crates/submorph-partition/src/trie.rs

//! A character trie over a domain-list, arena-indexed rather than
//! pointer-linked — a flat `Vec<TrieNode>` suits the small, dense-ish
//! branching factor of domain labels better than a pointer graph.

use std::collections::BTreeMap;

struct TrieNode {
    children: BTreeMap<char, usize>,
    /// Indices into the owning `Trie`'s domain list that terminate here.
    terminal: Vec<usize>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            terminal: Vec::new(),
        }
    }
}

/// A trie built over one domain list, indexed by position in that list.
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    /// Build a trie over `domains` (index-addressed; the trie does not own
    /// or clone the strings beyond what insertion requires).
    #[must_use]
    pub fn build(domains: &[String]) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::new()],
        };
        for (idx, domain) in domains.iter().enumerate() {
            trie.insert(domain, idx);
        }
        trie
    }

    fn insert(&mut self, domain: &str, idx: usize) {
        let mut cur = 0usize;
        for ch in domain.chars() {
            let existing = self.nodes[cur].children.get(&ch).copied();
            cur = match existing {
                Some(next) => next,
                None => {
                    self.nodes.push(TrieNode::new());
                    let next = self.nodes.len() - 1;
                    self.nodes[cur].children.insert(ch, next);
                    next
                }
            };
        }
        self.nodes[cur].terminal.push(idx);
    }

    /// Every domain in the list that shares the given prefix, via DFS
    /// collection from the prefix's trie node.
    #[must_use]
    pub fn keys_with_prefix(&self, domains: &[String], prefix: &str) -> Vec<String> {
        let mut cur = 0usize;
        for ch in prefix.chars() {
            match self.nodes[cur].children.get(&ch) {
                Some(&next) => cur = next,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        let mut stack = vec![cur];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            for &idx in &node.terminal {
                out.push(domains[idx].clone());
            }
            stack.extend(node.children.values().copied());
        }
        out.sort();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_domains_sharing_a_prefix() {
        let domains: Vec<String> = vec![
            "api-dev.example.com".into(),
            "api-prod.example.com".into(),
            "cdn.example.com".into(),
        ];
        let trie = Trie::build(&domains);
        let mut hits = trie.keys_with_prefix(&domains, "api-");
        hits.sort();
        assert_eq!(
            hits,
            vec!["api-dev.example.com".to_string(), "api-prod.example.com".to_string()]
        );
    }

    #[test]
    fn unknown_prefix_yields_empty() {
        let domains: Vec<String> = vec!["api.example.com".into()];
        let trie = Trie::build(&domains);
        assert!(trie.keys_with_prefix(&domains, "zzz").is_empty());
    }

    #[test]
    fn empty_prefix_returns_everything() {
        let domains: Vec<String> = vec!["a.example.com".into(), "b.example.com".into()];
        let trie = Trie::build(&domains);
        let hits = trie.keys_with_prefix(&domains, "");
        assert_eq!(hits.len(), 2);
    }
}
