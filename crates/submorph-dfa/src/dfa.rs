//! Deterministic automaton: subset construction from an [`Nfa`], Brzozowski
//! minimization, bounded-length counting (arbitrary precision), and
//! lexicographic enumeration at a fixed length.

use crate::ast::parse;
use crate::ast::ParseError;
use crate::nfa::Nfa;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;

/// The alphabet every DFA transition table is completed over: `a-z 0-9 . _ -`.
pub const DNS_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789._-";
const ALPHABET_LEN: usize = DNS_ALPHABET.len();

#[derive(Debug, Clone)]
pub struct Dfa {
    /// `transitions[state][i]` is the next state on `DNS_ALPHABET[i]`.
    transitions: Vec<[usize; ALPHABET_LEN]>,
    accepting: Vec<bool>,
    start: usize,
    dead: usize,
}

impl Dfa {
    /// Parse `pattern`, build its Thompson NFA, determinize, then minimize
    /// via Brzozowski's double-reversal.
    ///
    /// # Errors
    /// Returns [`ParseError`] if `pattern` is not valid regex syntax.
    pub fn build(pattern: &str) -> Result<Self, ParseError> {
        let ast = parse(pattern)?;
        let nfa = Nfa::from_ast(&ast);
        Ok(Self::from_nfa(&nfa).minimize())
    }

    fn from_nfa(nfa: &Nfa) -> Self {
        let mut index_of: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut sets: Vec<Vec<usize>> = Vec::new();

        let dead_idx = intern(&mut index_of, &mut sets, Vec::new());
        let start_key = sorted(nfa.epsilon_closure(&[nfa.start]));
        let start_idx = intern(&mut index_of, &mut sets, start_key);

        let mut transitions: Vec<[usize; ALPHABET_LEN]> = Vec::new();
        let mut accepting: Vec<bool> = Vec::new();
        let mut processed = 0usize;

        while processed < sets.len() {
            let set = sets[processed].clone();
            let mut row = [dead_idx; ALPHABET_LEN];
            for (i, &byte) in DNS_ALPHABET.iter().enumerate() {
                let moved = nfa.step(&set, byte);
                let closure = sorted(nfa.epsilon_closure(&moved));
                row[i] = intern(&mut index_of, &mut sets, closure);
            }
            transitions.push(row);
            accepting.push(set.contains(&nfa.accept));
            processed += 1;
        }

        Self {
            transitions,
            accepting,
            start: start_idx,
            dead: dead_idx,
        }
    }

    /// Reverse every edge, fan the new start into every old accepting
    /// state, and fold the old start into a unique new accept state.
    fn reverse_to_nfa(&self) -> Nfa {
        let n = self.transitions.len();
        let mut nfa = Nfa {
            transitions: vec![Vec::new(); n + 2],
            start: 0,
            accept: 0,
        };
        for (from, row) in self.transitions.iter().enumerate() {
            if from == self.dead {
                continue;
            }
            for (i, &to) in row.iter().enumerate() {
                if to == self.dead {
                    continue;
                }
                nfa.transitions[to].push((DNS_ALPHABET[i], from));
            }
        }
        let new_start = n;
        let new_accept = n + 1;
        for (state, &acc) in self.accepting.iter().enumerate() {
            if acc {
                nfa.transitions[new_start].push((crate::nfa::EPSILON, state));
            }
        }
        nfa.transitions[self.start].push((crate::nfa::EPSILON, new_accept));
        nfa.start = new_start;
        nfa.accept = new_accept;
        nfa
    }

    /// Brzozowski minimization: reverse, determinize, reverse, determinize.
    #[must_use]
    pub fn minimize(&self) -> Self {
        let reversed_once = Self::from_nfa(&self.reverse_to_nfa());
        Self::from_nfa(&reversed_once.reverse_to_nfa())
    }

    /// Count distinct accepted strings with length in `[min_len, max_len]`,
    /// as an arbitrary-precision integer.
    #[must_use]
    pub fn count_range(&self, min_len: usize, max_len: usize) -> BigUint {
        let n = self.transitions.len();
        let mut ways = vec![BigUint::zero(); n];
        ways[self.start] = BigUint::from(1u32);
        let mut total = BigUint::zero();

        for len in 0..=max_len {
            if len >= min_len {
                for (state, w) in ways.iter().enumerate() {
                    if self.accepting[state] {
                        total += w;
                    }
                }
            }
            if len == max_len {
                break;
            }
            let mut next = vec![BigUint::zero(); n];
            for (state, w) in ways.iter().enumerate() {
                if state == self.dead || w.is_zero() {
                    continue;
                }
                for &to in &self.transitions[state] {
                    if to != self.dead {
                        next[to] += w;
                    }
                }
            }
            ways = next;
        }
        total
    }

    /// [`Self::count_range`], saturating to `u64::MAX` if it overflows.
    #[must_use]
    pub fn count_range_saturating(&self, min_len: usize, max_len: usize) -> u64 {
        self.count_range(min_len, max_len)
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    /// Every accepted string of exactly `len`, in lexicographic order over
    /// [`DNS_ALPHABET`].
    #[must_use]
    pub fn enumerate(&self, len: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut buf = Vec::with_capacity(len);
        self.dfs(self.start, len, &mut buf, &mut out);
        out
    }

    fn dfs(&self, state: usize, remaining: usize, buf: &mut Vec<u8>, out: &mut Vec<String>) {
        if state == self.dead {
            return;
        }
        if remaining == 0 {
            if self.accepting[state] {
                out.push(String::from_utf8(buf.clone()).expect("DNS alphabet is ASCII"));
            }
            return;
        }
        for (i, &byte) in DNS_ALPHABET.iter().enumerate() {
            let to = self.transitions[state][i];
            if to == self.dead {
                continue;
            }
            buf.push(byte);
            self.dfs(to, remaining - 1, buf, out);
            buf.pop();
        }
    }
}

fn sorted(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

fn intern(index_of: &mut HashMap<Vec<usize>, usize>, sets: &mut Vec<Vec<usize>>, key: Vec<usize>) -> usize {
    if let Some(&i) = index_of.get(&key) {
        return i;
    }
    let i = sets.len();
    sets.push(key.clone());
    index_of.insert(key, i);
    i
}
