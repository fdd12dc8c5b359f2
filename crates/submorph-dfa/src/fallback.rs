//! Cheap recursive-descent generativity counter, used in place of the full
//! DFA pipeline for the pattern shapes the DSL generator actually emits
//! (concatenation, alternation, and optional groups — never unbounded
//! repetition). Must agree with [`crate::dfa::Dfa::count_range`] on every
//! such shape.

use crate::ast::{parse, Ast, ParseError};

/// `None` if `pattern` contains unbounded repetition (`*` or `+`), which
/// this estimator does not attempt to bound; callers should fall back to
/// [`crate::dfa::Dfa`] in that case.
///
/// # Errors
/// Returns [`ParseError`] if `pattern` is not valid regex syntax.
pub fn estimate(pattern: &str) -> Result<Option<u64>, ParseError> {
    let ast = parse(pattern)?;
    Ok(count(&ast))
}

fn count(ast: &Ast) -> Option<u64> {
    match ast {
        Ast::Empty => Some(1),
        Ast::Char(_) => Some(1),
        Ast::Concat(parts) => parts
            .iter()
            .try_fold(1u64, |acc, part| Some(acc.saturating_mul(count(part)?))),
        Ast::Alt(branches) => branches
            .iter()
            .try_fold(0u64, |acc, branch| Some(acc.saturating_add(count(branch)?))),
        Ast::Opt(inner) => Some(count(inner)?.saturating_add(1)),
        Ast::Star(_) | Ast::Plus(_) => None,
    }
}
