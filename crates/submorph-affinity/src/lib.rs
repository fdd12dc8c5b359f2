//! Groups near-duplicate templates by affinity propagation, folds each
//! cluster down to one surviving template, and reports cluster-quality
//! metrics alongside the result.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod distance;
mod merge;
mod propagation;
mod validation;

pub use distance::{distance as template_distance, domain_jaccard_distance, domain_jaccard_similarity};
pub use merge::merge_cluster;
pub use propagation::{propagate, DEFAULT_CONVERGENCE, DEFAULT_DAMPING};
pub use validation::{calinski_harabasz_simplified, davies_bouldin, silhouette};

use submorph_core::{Cancel, DSLTemplate, MergeStrategy};

/// Cluster-quality metrics, reported but never used to reject a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusteringMetrics {
    pub silhouette: f64,
    pub davies_bouldin: f64,
    pub calinski_harabasz: f64,
    pub cluster_count: usize,
}

/// Cluster `templates` by affinity propagation using a fixed preference
/// (the median off-diagonal similarity, a standard AP default that yields
/// a moderate number of clusters), then merge each cluster per `strategy`.
#[must_use]
pub fn cluster_and_merge(
    templates: &[DSLTemplate],
    strategy: MergeStrategy,
    ap_iterations: usize,
    cancel: &Cancel,
) -> (Vec<DSLTemplate>, ClusteringMetrics) {
    if templates.is_empty() {
        return (
            Vec::new(),
            ClusteringMetrics {
                silhouette: 0.0,
                davies_bouldin: 0.0,
                calinski_harabasz: 0.0,
                cluster_count: 0,
            },
        );
    }

    let similarity = similarity_matrix(templates, median_preference(templates));
    let clusters = propagation::propagate(
        &similarity,
        propagation::DEFAULT_DAMPING,
        ap_iterations,
        propagation::DEFAULT_CONVERGENCE,
        cancel,
    );

    let merged: Vec<DSLTemplate> = clusters
        .iter()
        .map(|c| merge::merge_cluster(c, templates, strategy))
        .collect();

    let metrics = ClusteringMetrics {
        silhouette: validation::silhouette(&clusters, templates),
        davies_bouldin: validation::davies_bouldin(&clusters, templates),
        calinski_harabasz: validation::calinski_harabasz_simplified(&clusters, templates),
        cluster_count: clusters.len(),
    };

    (merged, metrics)
}

/// Binary-searches a preference value in `[-2, 0]` that steers affinity
/// propagation toward producing roughly `target_clusters` clusters while
/// keeping silhouette at or above `0.25`, falling back to the median
/// preference if no candidate clears that bar.
#[must_use]
pub fn auto_tuned_preference(templates: &[DSLTemplate], target_clusters: usize, ap_iterations: usize) -> f64 {
    if templates.is_empty() {
        return 0.0;
    }
    let median = median_preference(templates);
    let mut lo = -2.0f64;
    let mut hi = 0.0f64;
    let mut best = median;
    let mut best_gap = usize::MAX;

    for _ in 0..7 {
        let mid = lo + (hi - lo) / 2.0;
        let similarity = similarity_matrix(templates, mid);
        let clusters = propagation::propagate(
            &similarity,
            propagation::DEFAULT_DAMPING,
            ap_iterations,
            propagation::DEFAULT_CONVERGENCE,
            &Cancel::new(),
        );
        let sil = validation::silhouette(&clusters, templates);
        let gap = clusters.len().abs_diff(target_clusters);
        if sil >= 0.25 && gap < best_gap {
            best_gap = gap;
            best = mid;
        }
        if clusters.len() > target_clusters {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    if best_gap == usize::MAX {
        median
    } else {
        best
    }
}

fn similarity_matrix(templates: &[DSLTemplate], preference: f64) -> Vec<Vec<f64>> {
    let n = templates.len();
    let mut s = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                s[i][j] = -distance::distance(&templates[i], &templates[j]);
            }
        }
    }
    for (i, row) in s.iter_mut().enumerate() {
        row[i] = preference;
    }
    s
}

fn median_preference(templates: &[DSLTemplate]) -> f64 {
    let n = templates.len();
    if n < 2 {
        return 0.0;
    }
    let mut values = Vec::with_capacity(n * (n - 1));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                values.push(-distance::distance(&templates[i], &templates[j]));
            }
        }
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use submorph_core::{DSLVariable, TokenKind};

    fn template(payload: &str, coverage: usize) -> DSLTemplate {
        DSLTemplate {
            template: format!("{payload}.{{{{root}}}}"),
            level_count: 1,
            variables: vec![DSLVariable::Payload {
                name: "p0".into(),
                kind: TokenKind::Word,
                payloads: vec![payload.to_string()],
            }],
            coverage,
            ratio: 1.0,
            confidence: 0.9,
            domains: (0..coverage).map(|i| format!("{payload}{i}.example.com")).collect(),
        }
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let (merged, metrics) = cluster_and_merge(&[], MergeStrategy::Exemplar, 100, &Cancel::new());
        assert!(merged.is_empty());
        assert_eq!(metrics.cluster_count, 0);
    }

    #[test]
    fn near_duplicate_templates_collapse_to_fewer_outputs() {
        let templates = vec![template("dev", 3), template("deev", 3), template("prod", 3)];
        let (merged, metrics) = cluster_and_merge(&templates, MergeStrategy::UnionAggressive, 200, &Cancel::new());
        assert!(merged.len() <= templates.len());
        assert_eq!(metrics.cluster_count, merged.len());
    }
}
