//! Folds an affinity-propagation [`Cluster`] of templates into a single
//! surviving template, per the configured [`MergeStrategy`].

use crate::distance::domain_jaccard_similarity;
use submorph_core::{
    confidence, Cluster, DSLTemplate, DSLVariable, MergeStrategy, NumberRange, NumberRangeKind,
};
use std::collections::BTreeSet;

/// Merge `cluster`'s members (indices into `pool`) per `strategy`.
#[must_use]
pub fn merge_cluster(cluster: &Cluster, pool: &[DSLTemplate], strategy: MergeStrategy) -> DSLTemplate {
    let members: Vec<&DSLTemplate> = cluster.members.iter().map(|&i| &pool[i]).collect();
    let exemplar = &pool[cluster.exemplar];

    match strategy {
        MergeStrategy::Exemplar => {
            let mut merged = exemplar.clone();
            merged.domains = union_domains(&members);
            recompute(&mut merged);
            merged
        }
        MergeStrategy::UnionConservative => {
            if average_intra_cluster_jaccard(&members) > 0.5 {
                union_aggressive(exemplar, &members)
            } else {
                let mut merged = exemplar.clone();
                merged.domains = union_domains(&members);
                recompute(&mut merged);
                merged
            }
        }
        MergeStrategy::UnionAggressive => union_aggressive(exemplar, &members),
    }
}

fn union_aggressive(exemplar: &DSLTemplate, members: &[&DSLTemplate]) -> DSLTemplate {
    let mut merged = exemplar.clone();
    merged.domains = union_domains(members);
    if let Some(variables) = union_payloads_by_index(members) {
        merged.variables = variables;
    }
    recompute(&mut merged);
    merged
}

fn union_domains(members: &[&DSLTemplate]) -> Vec<String> {
    let mut set: BTreeSet<String> = BTreeSet::new();
    for m in members {
        set.extend(m.domains.iter().cloned());
    }
    set.into_iter().collect()
}

/// Average pairwise domain-Jaccard similarity within the cluster. A
/// singleton cluster has nothing to disagree about, so it reports full
/// cohesion.
fn average_intra_cluster_jaccard(members: &[&DSLTemplate]) -> f64 {
    if members.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            total += domain_jaccard_similarity(members[i], members[j]);
            count += 1;
        }
    }
    total / count as f64
}

/// Union every member's variable at each shared index. Returns `None` if
/// members disagree on variable count or on a variable's kind at some
/// index, in which case the caller keeps the exemplar's variables as-is.
fn union_payloads_by_index(members: &[&DSLTemplate]) -> Option<Vec<DSLVariable>> {
    let count = members[0].variables.len();
    if !members.iter().all(|m| m.variables.len() == count) {
        return None;
    }

    let mut merged = Vec::with_capacity(count);
    for idx in 0..count {
        match &members[0].variables[idx] {
            DSLVariable::Number { name, range } => {
                let mut start = range.start;
                let mut end = range.end;
                let mut format = range.format.clone();
                for m in &members[1..] {
                    let DSLVariable::Number { range: other, .. } = &m.variables[idx] else {
                        return None;
                    };
                    start = start.min(other.start);
                    end = end.max(other.end);
                    if other.format.len() > format.len() {
                        format = other.format.clone();
                    }
                }
                merged.push(DSLVariable::Number {
                    name: name.clone(),
                    range: NumberRange {
                        start,
                        end,
                        format,
                        step: 1,
                        kind: NumberRangeKind::Iterator,
                    },
                });
            }
            DSLVariable::Payload { name, kind, payloads } => {
                let mut set: BTreeSet<String> = payloads.iter().cloned().collect();
                for m in &members[1..] {
                    let DSLVariable::Payload { payloads: other, .. } = &m.variables[idx] else {
                        return None;
                    };
                    set.extend(other.iter().cloned());
                }
                merged.push(DSLVariable::Payload {
                    name: name.clone(),
                    kind: *kind,
                    payloads: set.into_iter().collect(),
                });
            }
        }
    }
    Some(merged)
}

fn recompute(template: &mut DSLTemplate) {
    template.coverage = template.domains.len();
    let estimated = template.estimated_generations();
    template.ratio = estimated as f64 / template.coverage.max(1) as f64;
    template.confidence = confidence(template.ratio, template.coverage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use submorph_core::TokenKind;

    fn payload_template(payloads: Vec<&str>, domains: Vec<&str>) -> DSLTemplate {
        DSLTemplate {
            template: "{{p0}}.{{root}}".into(),
            level_count: 1,
            variables: vec![DSLVariable::Payload {
                name: "p0".into(),
                kind: TokenKind::Word,
                payloads: payloads.into_iter().map(String::from).collect(),
            }],
            coverage: domains.len(),
            ratio: 1.0,
            confidence: 0.9,
            domains: domains.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn exemplar_strategy_keeps_exemplar_variables_but_unions_domains() {
        let a = payload_template(vec!["dev"], vec!["dev.example.com"]);
        let b = payload_template(vec!["prod"], vec!["prod.example.com"]);
        let pool = vec![a, b];
        let cluster = Cluster {
            exemplar: 0,
            members: vec![0, 1],
        };
        let merged = merge_cluster(&cluster, &pool, MergeStrategy::Exemplar);
        assert_eq!(merged.variables, pool[0].variables);
        assert_eq!(merged.coverage, 2);
    }

    #[test]
    fn union_aggressive_merges_payload_sets() {
        let a = payload_template(vec!["dev"], vec!["dev.example.com"]);
        let b = payload_template(vec!["prod"], vec!["prod.example.com"]);
        let pool = vec![a, b];
        let cluster = Cluster {
            exemplar: 0,
            members: vec![0, 1],
        };
        let merged = merge_cluster(&cluster, &pool, MergeStrategy::UnionAggressive);
        let DSLVariable::Payload { payloads, .. } = &merged.variables[0] else {
            panic!("expected payload variable");
        };
        assert_eq!(payloads, &vec!["dev".to_string(), "prod".to_string()]);
        assert_eq!(merged.coverage, 2);
    }

    #[test]
    fn union_conservative_falls_back_to_exemplar_when_domains_disjoint_and_dissimilar() {
        let a = payload_template(vec!["dev"], vec!["dev.example.com", "api.example.com"]);
        let b = payload_template(vec!["prod"], vec!["prod.example.com", "cdn.example.com"]);
        let pool = vec![a, b];
        let cluster = Cluster {
            exemplar: 0,
            members: vec![0, 1],
        };
        let merged = merge_cluster(&cluster, &pool, MergeStrategy::UnionConservative);
        assert_eq!(merged.variables, pool[0].variables);
    }
}
