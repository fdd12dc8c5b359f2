//! Distance between two templates, as a weighted sum of four components
//! (each already normalized to `[0,1]`); a fifth component — one minus the
//! Jaccard similarity of the two templates' originating domain sets — is
//! computed separately and carries weight 0 here, since folding domain-set
//! overlap into the clustering distance would bias clusters toward
//! whichever templates happen to share raw domains rather than shape.
//! [`domain_jaccard_distance`] exposes it for merge-strategy decisions.

use submorph_core::{DSLTemplate, DSLVariable};

const WEIGHT_CHAR_LEVENSHTEIN: f64 = 0.25;
const WEIGHT_TOKEN_TYPE_LEVENSHTEIN: f64 = 0.25;
const WEIGHT_VARIABLE_STRUCTURE: f64 = 0.25;
const WEIGHT_QUALITY: f64 = 0.25;

/// Clustering distance between `a` and `b`, in `[0,1]`.
#[must_use]
pub fn distance(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    WEIGHT_CHAR_LEVENSHTEIN * char_levenshtein(a, b)
        + WEIGHT_TOKEN_TYPE_LEVENSHTEIN * token_type_levenshtein(a, b)
        + WEIGHT_VARIABLE_STRUCTURE * variable_structure_distance(a, b)
        + WEIGHT_QUALITY * quality_distance(a, b)
}

/// `1 - Jaccard(a.domains, b.domains)`, used only by merge strategies.
#[must_use]
pub fn domain_jaccard_distance(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    1.0 - domain_jaccard_similarity(a, b)
}

#[must_use]
pub fn domain_jaccard_similarity(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    let set_a: std::collections::BTreeSet<&str> = a.domains.iter().map(String::as_str).collect();
    let set_b: std::collections::BTreeSet<&str> = b.domains.iter().map(String::as_str).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn char_levenshtein(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    normalized_levenshtein(&a.template, &b.template)
}

/// Marker alphabet for a template's token-type sequence: `W`ord, `-`ash,
/// `.`ot, `N`umber, `R`oot.
fn token_type_sequence(t: &DSLTemplate) -> String {
    let mut out = String::new();
    let body = t.template.as_str();
    let mut i = 0;
    while i < body.len() {
        if body[i..].starts_with("{{") {
            let close = body[i..].find("}}").map_or(body.len(), |o| i + o);
            let name = &body[i + 2..close];
            if name == "root" {
                out.push('R');
            } else if let Some(var) = t.variables.iter().find(|v| v.name() == name) {
                match var {
                    DSLVariable::Number { .. } => out.push('N'),
                    DSLVariable::Payload { .. } => out.push('W'),
                }
            }
            i = close + 2;
        } else {
            let ch = body.as_bytes()[i] as char;
            match ch {
                '.' => out.push('.'),
                '-' => out.push('-'),
                _ => {}
            }
            i += 1;
        }
    }
    out
}

fn token_type_levenshtein(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    let sa = token_type_sequence(a);
    let sb = token_type_sequence(b);
    normalized_levenshtein(&sa, &sb)
}

fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count()).max(1);
    f64::from(submorph_editdist::levenshtein(a, b)) / max_len as f64
}

fn avg_payload_size(t: &DSLTemplate) -> f64 {
    let sizes: Vec<usize> = t
        .variables
        .iter()
        .filter_map(|v| match v {
            DSLVariable::Payload { payloads, .. } => Some(payloads.len()),
            DSLVariable::Number { .. } => None,
        })
        .collect();
    if sizes.is_empty() {
        0.0
    } else {
        sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
    }
}

fn token_type_distribution(t: &DSLTemplate) -> [f64; 5] {
    let seq = token_type_sequence(t);
    let mut counts = [0.0; 5];
    for ch in seq.chars() {
        let idx = match ch {
            'W' => 0,
            '-' => 1,
            '.' => 2,
            'N' => 3,
            'R' => 4,
            _ => continue,
        };
        counts[idx] += 1.0;
    }
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        for c in &mut counts {
            *c /= total;
        }
    }
    counts
}

fn variable_structure_distance(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    let count_a = a.variables.len();
    let count_b = b.variables.len();
    let count_term =
        (count_a as f64 - count_b as f64).abs() / (count_a.max(count_b).max(1) as f64);

    let dist_a = token_type_distribution(a);
    let dist_b = token_type_distribution(b);
    let l1: f64 = dist_a
        .iter()
        .zip(dist_b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum();
    let distribution_term = l1 / 2.0;

    let avg_a = avg_payload_size(a);
    let avg_b = avg_payload_size(b);
    let payload_term = (avg_a - avg_b).abs() / avg_a.max(avg_b).max(1.0);

    (count_term + distribution_term + payload_term) / 3.0
}

fn quality_distance(a: &DSLTemplate, b: &DSLTemplate) -> f64 {
    let coverage_term = (a.coverage as f64 - b.coverage as f64).abs()
        / (a.coverage.max(b.coverage).max(1) as f64);
    let ratio_term = (a.ratio - b.ratio).abs() / a.ratio.max(b.ratio).max(1e-9);
    let confidence_term = (a.confidence - b.confidence).abs();
    (coverage_term + ratio_term + confidence_term) / 3.0
}
