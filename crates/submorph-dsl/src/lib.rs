// crates/submorph-dsl/src/lib.rs

//! Turns an edit-distance closure into a generative template.
//!
//! Every closure member is tokenized, then walked level by level, position
//! by position, grouping the values seen at each slot by [`TokenKind`] in
//! priority `Number > Dash > Word` and turning each kind-group into either a
//! literal `-` plus a sub-variable, a `NumberRange`, or a payload list.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::collections::HashMap;
use submorph_core::{
    confidence, Closure, DSLTemplate, DSLVariable, Dictionary, Error, NumberRange,
    NumberRangeKind, Result, TokenKind, TokenizedDomain,
};
use submorph_tokenizer::tokenize;

/// Build a [`DSLTemplate`] from `closure`. `dictionary`, if given, enables
/// semantic naming of Word/Dash variables (service/env/region instead of
/// `p{n}`).
pub fn generate(closure: &Closure, dictionary: Option<&Dictionary>) -> Result<DSLTemplate> {
    let tokenized: Vec<TokenizedDomain> = closure
        .domains
        .iter()
        .filter_map(|d| tokenize(d).ok())
        .collect();

    if closure.domains.len() < 2 || tokenized.len() < 2 {
        return Err(Error::InsufficientData {
            closure_size: closure.domains.len(),
        });
    }

    let level_count = tokenized.iter().map(|t| t.levels.len()).max().unwrap_or(0);
    if level_count == 0 {
        return Err(Error::InsufficientData {
            closure_size: closure.domains.len(),
        });
    }

    let mut next_positional = 0usize;
    let mut variables: Vec<DSLVariable> = Vec::new();
    let mut level_parts: Vec<String> = Vec::with_capacity(level_count);

    for level_idx in 0..level_count {
        let max_positions = tokenized
            .iter()
            .filter_map(|t| t.levels.get(level_idx))
            .map(|l| l.tokens.len())
            .max()
            .unwrap_or(0);

        let mut part = String::new();

        for pos in 0..max_positions {
            let mut by_kind: HashMap<TokenKind, Vec<String>> = HashMap::new();
            for t in &tokenized {
                if let Some(tok) = t
                    .levels
                    .get(level_idx)
                    .and_then(|level| level.tokens.get(pos))
                {
                    by_kind.entry(tok.kind).or_default().push(tok.value.clone());
                }
            }
            if by_kind.is_empty() {
                continue;
            }

            for kind in [TokenKind::Number, TokenKind::Dash, TokenKind::Word] {
                let Some(values) = by_kind.get(&kind) else {
                    continue;
                };
                render_kind_group(
                    kind,
                    values,
                    &mut part,
                    &mut variables,
                    &mut next_positional,
                    dictionary,
                )?;
            }
        }

        level_parts.push(part);
    }

    let template = format!("{}.{{{{root}}}}", level_parts.join("."));
    let coverage = closure.domains.len();
    let estimated_generations = variables
        .iter()
        .map(DSLVariable::generations)
        .fold(1u64, |acc, n| acc.saturating_mul(n.max(1)));
    let ratio = estimated_generations as f64 / coverage as f64;
    let conf = confidence(ratio, coverage);

    let dsl = DSLTemplate {
        template,
        level_count,
        variables,
        coverage,
        ratio,
        confidence: conf,
        domains: closure.domains.clone(),
    };

    validate(&dsl, &tokenized)?;
    Ok(dsl)
}

/// Render one (level, position) kind-group into `part`, pushing any
/// resulting variable onto `variables`.
fn render_kind_group(
    kind: TokenKind,
    values: &[String],
    part: &mut String,
    variables: &mut Vec<DSLVariable>,
    next_positional: &mut usize,
    dictionary: Option<&Dictionary>,
) -> Result<()> {
    match kind {
        TokenKind::Number => {
            let range = number_range_from(values)?;
            part.push_str("{{number}}");
            variables.push(DSLVariable::Number {
                name: "number".into(),
                range,
            });
        }
        TokenKind::Dash => {
            part.push('-');
            let stripped: Vec<String> = values
                .iter()
                .map(|v| v.strip_prefix('-').unwrap_or(v).to_string())
                .collect();
            let all_numeric = stripped
                .iter()
                .all(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()));
            if all_numeric {
                let range = number_range_from(&stripped)?;
                part.push_str("{{number}}");
                variables.push(DSLVariable::Number {
                    name: "number".into(),
                    range,
                });
            } else {
                let (name, payloads) =
                    positional_or_semantic(next_positional, &stripped, TokenKind::Dash, dictionary);
                part.push_str(&format!("{{{{{name}}}}}"));
                variables.push(DSLVariable::Payload {
                    name,
                    kind: TokenKind::Dash,
                    payloads,
                });
            }
        }
        TokenKind::Word => {
            let (name, payloads) =
                positional_or_semantic(next_positional, values, TokenKind::Word, dictionary);
            part.push_str(&format!("{{{{{name}}}}}"));
            variables.push(DSLVariable::Payload {
                name,
                kind: TokenKind::Word,
                payloads,
            });
        }
    }
    Ok(())
}

/// Parse `values` (guaranteed all-digit by the caller) into a buffered
/// `NumberRange`: `[min-1, max+1]` when `min-1 >= 0`, else `[0, max+2]`.
/// `format` is `%0Wd` when any source value has a leading zero, else `%d`.
fn number_range_from(values: &[String]) -> Result<NumberRange> {
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    let mut width = 0usize;
    let mut has_leading_zero = false;

    for v in values {
        let n: i64 = v.parse().map_err(|_| Error::TemplateShape {
            template: String::new(),
            reason: format!("{v:?} is not a valid number token"),
        })?;
        min = min.min(n);
        max = max.max(n);
        width = width.max(v.len());
        if v.len() > 1 && v.starts_with('0') {
            has_leading_zero = true;
        }
    }

    let (start, end) = if min - 1 >= 0 {
        (min - 1, max + 1)
    } else {
        (0, max + 2)
    };
    let format = if has_leading_zero {
        format!("%0{width}d")
    } else {
        "%d".to_string()
    };

    Ok(NumberRange {
        start,
        end,
        format,
        step: 1,
        kind: NumberRangeKind::Iterator,
    })
}

/// Name a Word/Dash variable: `p{n}` unless a configured dictionary matches
/// at least half of its sorted, deduplicated payload values to one category.
fn positional_or_semantic(
    next_positional: &mut usize,
    raw_values: &[String],
    _kind: TokenKind,
    dictionary: Option<&Dictionary>,
) -> (String, Vec<String>) {
    let mut payloads = raw_values.to_vec();
    payloads.sort();
    payloads.dedup();

    let name = dictionary
        .and_then(|dict| dict.categorize(&payloads))
        .unwrap_or_else(|| {
            let n = *next_positional;
            *next_positional += 1;
            format!("p{n}")
        });
    (name, payloads)
}

/// Every non-root placeholder must fit within each member's own token
/// budget, and the template must end in the literal root placeholder.
fn validate(dsl: &DSLTemplate, tokenized: &[TokenizedDomain]) -> Result<()> {
    let placeholder_count = dsl.variables.len();
    for t in tokenized {
        if placeholder_count > t.token_count() {
            return Err(Error::TemplateShape {
                template: dsl.template.clone(),
                reason: format!(
                    "{placeholder_count} placeholders exceed {} tokens in {}",
                    t.token_count(),
                    t.original
                ),
            });
        }
    }
    if !dsl.template.ends_with(".{{root}}") {
        return Err(Error::TemplateShape {
            template: dsl.template.clone(),
            reason: "template must end with .{{root}}".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closure(domains: &[&str]) -> Closure {
        Closure::new(domains.iter().map(|s| (*s).to_string()).collect(), 1)
    }

    #[test]
    fn numbered_hosts_yield_a_buffered_number_range() {
        let c = closure(&[
            "api-dev-01.example.com",
            "api-dev-02.example.com",
            "api-dev-03.example.com",
        ]);
        let dsl = generate(&c, None).expect("template");
        assert!(dsl.template.contains("{{number}}"));
        assert!(dsl.template.ends_with(".{{root}}"));
        assert_eq!(dsl.coverage, 3);

        let range = dsl
            .variables
            .iter()
            .find_map(|v| match v {
                DSLVariable::Number { range, .. } => Some(range),
                DSLVariable::Payload { .. } => None,
            })
            .expect("a number variable");
        assert_eq!(range.format, "%02d");
        assert!(range.start <= 1 && range.end >= 3);
    }

    #[test]
    fn word_variants_yield_a_positional_payload_variable() {
        let c = closure(&["api-dev.example.com", "api-prod.example.com"]);
        let dsl = generate(&c, None).expect("template");
        let payload = dsl.variables.iter().find_map(|v| match v {
            DSLVariable::Payload { payloads, .. } if payloads.len() > 1 => Some(payloads.clone()),
            _ => None,
        });
        let payload = payload.expect("a multi-valued payload variable");
        assert_eq!(payload, vec!["dev".to_string(), "prod".to_string()]);
    }

    #[test]
    fn dictionary_match_names_the_variable_by_category() {
        let dict = Dictionary::with_category("env", vec!["dev".into(), "prod".into()]);
        let c = closure(&["api-dev.example.com", "api-prod.example.com"]);
        let dsl = generate(&c, Some(&dict)).expect("template");
        assert!(dsl.variables.iter().any(|v| v.name() == "env"));
    }

    #[test]
    fn too_few_members_fails_with_insufficient_data() {
        let c = Closure::new(vec!["only.example.com".to_string()], 1);
        let err = generate(&c, None).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { .. }));
    }

    #[test]
    fn confidence_and_ratio_are_internally_consistent() {
        let c = closure(&[
            "api-dev-01.example.com",
            "api-dev-02.example.com",
            "api-dev-03.example.com",
        ]);
        let dsl = generate(&c, None).expect("template");
        let expected_ratio = dsl.estimated_generations() as f64 / dsl.coverage as f64;
        assert!((dsl.ratio - expected_ratio).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&dsl.confidence));
    }
}
