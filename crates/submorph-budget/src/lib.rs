//! Picks the final surviving pattern set from a pool of already-clustered
//! templates.
//!
//! Templates are ranked by `(coverage desc, confidence desc, ratio asc)`
//! and added greedily, tracking the running set of domains covered. The
//! run stops once cumulative coverage hits a target, once marginal
//! coverage goes flat, or once marginal returns turn sharply negative —
//! unless the underlying coverage distribution is already near-uniform, in
//! which case a flat proportional count is taken instead.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::collections::{BTreeSet, HashSet};
use submorph_core::DSLTemplate;

/// Sharp-negative-second-derivative cutoff for stopping the greedy walk
/// early, independent of the elbow-sensitivity threshold.
const SECOND_DERIVATIVE_CUTOFF: f64 = -0.1;
/// Below this coefficient of variation, the coverage distribution across
/// templates is treated as near-uniform.
const UNIFORM_CV_THRESHOLD: f64 = 0.3;

/// Select the final template set from `templates`.
#[must_use]
pub fn select(
    templates: &[DSLTemplate],
    target_coverage: f64,
    elbow_sensitivity: f64,
    min_patterns: usize,
    max_patterns: usize,
) -> Vec<DSLTemplate> {
    if templates.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..templates.len()).collect();
    order.sort_by(|&i, &j| {
        templates[j]
            .coverage
            .cmp(&templates[i].coverage)
            .then_with(|| templates[j].confidence.total_cmp(&templates[i].confidence))
            .then_with(|| templates[i].ratio.total_cmp(&templates[j].ratio))
    });

    if is_near_uniform(templates) {
        let count = uniform_count(templates.len(), target_coverage, min_patterns, max_patterns);
        return order.into_iter().take(count).map(|i| templates[i].clone()).collect();
    }

    let selected = greedy_select(&order, templates, target_coverage, elbow_sensitivity, min_patterns, max_patterns);
    selected.into_iter().map(|i| templates[i].clone()).collect()
}

fn is_near_uniform(templates: &[DSLTemplate]) -> bool {
    let n = templates.len();
    if n < 2 {
        return true;
    }
    let values: Vec<f64> = templates.iter().map(|t| t.coverage as f64).collect();
    let mean = values.iter().sum::<f64>() / n as f64;
    if mean == 0.0 {
        return true;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    variance.sqrt() / mean < UNIFORM_CV_THRESHOLD
}

fn uniform_count(total: usize, target_coverage: f64, min_patterns: usize, max_patterns: usize) -> usize {
    let raw = (total as f64 * target_coverage).ceil() as usize;
    raw.clamp(min_patterns, max_patterns).min(total)
}

fn greedy_select(
    order: &[usize],
    templates: &[DSLTemplate],
    target_coverage: f64,
    elbow_sensitivity: f64,
    min_patterns: usize,
    max_patterns: usize,
) -> Vec<usize> {
    let all_domains: BTreeSet<&str> = templates
        .iter()
        .flat_map(|t| t.domains.iter().map(String::as_str))
        .collect();
    let total = all_domains.len().max(1);

    let mut covered: HashSet<&str> = HashSet::new();
    let mut marginals: Vec<f64> = Vec::new();
    let mut selected: Vec<usize> = Vec::new();

    for &idx in order {
        if selected.len() >= max_patterns {
            break;
        }

        let template = &templates[idx];
        let new_domains = template
            .domains
            .iter()
            .filter(|d| !covered.contains(d.as_str()))
            .count();
        let marginal = new_domains as f64 / total as f64;
        covered.extend(template.domains.iter().map(String::as_str));
        selected.push(idx);
        marginals.push(marginal);

        if selected.len() < min_patterns {
            continue;
        }

        let cumulative = covered.len() as f64 / total as f64;
        if cumulative >= target_coverage {
            break;
        }
        if marginal < elbow_sensitivity {
            break;
        }
        let n = marginals.len();
        if n >= 3 {
            let second_derivative = marginals[n - 1] - 2.0 * marginals[n - 2] + marginals[n - 3];
            if second_derivative < SECOND_DERIVATIVE_CUTOFF {
                break;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use submorph_core::{DSLVariable, TokenKind};

    fn template(id: &str, coverage: usize, confidence: f64, ratio: f64) -> DSLTemplate {
        DSLTemplate {
            template: format!("{id}.{{{{root}}}}"),
            level_count: 1,
            variables: vec![DSLVariable::Payload {
                name: "p0".into(),
                kind: TokenKind::Word,
                payloads: vec![id.to_string()],
            }],
            coverage,
            ratio,
            confidence,
            domains: (0..coverage).map(|i| format!("{id}{i}.example.com")).collect(),
        }
    }

    #[test]
    fn empty_input_returns_empty_output() {
        assert!(select(&[], 0.9, 0.02, 1, 60).is_empty());
    }

    #[test]
    fn stops_once_target_coverage_is_reached() {
        let templates = vec![template("a", 90, 0.9, 1.0), template("b", 10, 0.9, 1.0)];
        let selected = select(&templates, 0.85, 0.02, 1, 60);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].template, "a.{{root}}");
    }

    #[test]
    fn stops_once_marginal_coverage_goes_flat() {
        // Distinct coverages keep this off the near-uniform fast path, but
        // overlapping domain sets mean later templates add almost nothing
        // new, so the elbow should trigger well before max_patterns.
        let mut templates = vec![template("big", 100, 0.9, 1.0)];
        for i in 0..10 {
            let mut t = template(&format!("dup{i}"), 5, 0.5, 1.0);
            t.domains = templates[0].domains[0..5].to_vec();
            templates.push(t);
        }
        let selected = select(&templates, 0.99, 0.05, 1, 60);
        assert!(selected.len() < templates.len());
    }

    #[test]
    fn near_uniform_distribution_bypasses_elbow_logic() {
        let templates: Vec<DSLTemplate> = (0..20).map(|i| template(&format!("t{i}"), 10, 0.8, 1.0)).collect();
        let selected = select(&templates, 0.5, 0.02, 1, 60);
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn respects_min_and_max_pattern_clamp() {
        let templates: Vec<DSLTemplate> = (0..5).map(|i| template(&format!("t{i}"), 1, 0.8, 1.0)).collect();
        let selected = select(&templates, 0.99, 0.5, 3, 4);
        assert!(selected.len() >= 3);
        assert!(selected.len() <= 4);
    }
}
