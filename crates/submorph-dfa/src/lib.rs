// crates/submorph-dfa/src/lib.rs

//! Counts how many distinct strings a regex accepts, up to a fixed
//! length, so generativity ratios can be compared against observed
//! coverage.
//!
//! Pipeline: textual regex -> Thompson NFA -> subset construction -> DFA ->
//! Brzozowski minimization. Counting is a DP over `ways[len][state]` with
//! arbitrary-precision accumulation, saturating to `u64` on request.
//! [`fallback`] is a much cheaper recursive-descent counter for the
//! alternation/concatenation/optional shapes the DSL generator emits; it
//! must agree with the DFA counter wherever both apply.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod ast;
pub mod dfa;
pub mod fallback;
pub mod nfa;
pub mod translate;

pub use ast::ParseError;
pub use dfa::{Dfa, DNS_ALPHABET};
pub use nfa::Nfa;
pub use translate::template_to_regex;

use submorph_core::DSLTemplate;

/// The longest realistic DNS name length, used as an upper length bound
/// when the cheap [`fallback`] estimator can't be used (unbounded
/// repetition, never emitted by the DSL generator but not forbidden by
/// this crate's own regex grammar).
pub const MAX_REASONABLE_LENGTH: usize = 253;

/// Estimate how many distinct strings `template`'s generative prefix can
/// produce. Uses [`fallback::estimate`] when the translated pattern has no
/// unbounded repetition (always true for DSL-generator output), otherwise
/// falls back to the full DFA counter.
///
/// # Errors
/// Returns [`ParseError`] if the translated pattern fails to parse, which
/// would indicate a bug in [`translate::template_to_regex`] rather than in
/// caller input.
pub fn estimate_generations(template: &DSLTemplate) -> Result<u64, ParseError> {
    let pattern = translate::template_to_regex(template);
    if let Some(n) = fallback::estimate(&pattern)? {
        return Ok(n);
    }
    Ok(Dfa::build(&pattern)?.count_range_saturating(0, MAX_REASONABLE_LENGTH))
}
