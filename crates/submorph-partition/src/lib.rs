// crates/submorph-partition/src/lib.rs

//! A character trie and the n-gram/token grouping partitioner it backs.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod grouping;
mod trie;

pub use grouping::{bounded_partition, ngram_groups, token_groups};
pub use trie::Trie;
