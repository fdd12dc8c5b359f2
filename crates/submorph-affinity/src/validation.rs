//! Cluster-quality metrics, reported alongside a clustering run but never
//! used to gate it: silhouette, Davies-Bouldin, and a simplified
//! Calinski-Harabasz index built on the same [`distance`] used to cluster.

use crate::distance;
use submorph_core::{Cluster, DSLTemplate};

/// Mean over every point of `(b - a) / max(a, b)`, where `a` is the mean
/// distance to the point's own cluster and `b` is the mean distance to the
/// nearest other cluster. Singleton clusters contribute `a = 0` by
/// convention, since there is no intra-cluster partner to compare against.
#[must_use]
pub fn silhouette(clusters: &[Cluster], templates: &[DSLTemplate]) -> f64 {
    if templates.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    let mut count = 0usize;

    for (ci, cluster) in clusters.iter().enumerate() {
        for &i in &cluster.members {
            let a = if cluster.members.len() <= 1 {
                0.0
            } else {
                let sum: f64 = cluster
                    .members
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| distance::distance(&templates[i], &templates[j]))
                    .sum();
                sum / (cluster.members.len() - 1) as f64
            };

            let b = clusters
                .iter()
                .enumerate()
                .filter(|(cj, _)| *cj != ci)
                .map(|(_, other)| {
                    let sum: f64 = other
                        .members
                        .iter()
                        .map(|&j| distance::distance(&templates[i], &templates[j]))
                        .sum();
                    sum / other.members.len().max(1) as f64
                })
                .fold(f64::INFINITY, f64::min);
            let b = if b.is_finite() { b } else { 0.0 };

            let denom = a.max(b);
            let s = if denom > 0.0 { (b - a) / denom } else { 0.0 };
            total += s;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Lower is better. Each cluster's scatter is its mean distance to its own
/// exemplar; the index averages, over every cluster, the worst ratio of
/// combined scatter to inter-exemplar distance against any other cluster.
#[must_use]
pub fn davies_bouldin(clusters: &[Cluster], templates: &[DSLTemplate]) -> f64 {
    let k = clusters.len();
    if k <= 1 {
        return 0.0;
    }

    let scatter: Vec<f64> = clusters
        .iter()
        .map(|c| {
            let exemplar = &templates[c.exemplar];
            let sum: f64 = c
                .members
                .iter()
                .map(|&i| distance::distance(&templates[i], exemplar))
                .sum();
            sum / c.members.len().max(1) as f64
        })
        .collect();

    let mut total = 0.0;
    for i in 0..k {
        let mut worst = 0.0f64;
        for j in 0..k {
            if i == j {
                continue;
            }
            let d = distance::distance(&templates[clusters[i].exemplar], &templates[clusters[j].exemplar]);
            if d > 0.0 {
                worst = worst.max((scatter[i] + scatter[j]) / d);
            }
        }
        total += worst;
    }
    total / k as f64
}

/// Higher is better. Uses the highest-coverage template as a stand-in grand
/// centroid, since templates have no native vector-space mean.
#[must_use]
pub fn calinski_harabasz_simplified(clusters: &[Cluster], templates: &[DSLTemplate]) -> f64 {
    let n = templates.len();
    let k = clusters.len();
    if k <= 1 || n <= k {
        return 0.0;
    }

    let Some(grand_idx) = (0..n).max_by_key(|&i| templates[i].coverage) else {
        return 0.0;
    };

    let between: f64 = clusters
        .iter()
        .map(|c| {
            let d = distance::distance(&templates[c.exemplar], &templates[grand_idx]);
            c.members.len() as f64 * d * d
        })
        .sum();

    let within: f64 = clusters
        .iter()
        .map(|c| {
            let exemplar = &templates[c.exemplar];
            c.members
                .iter()
                .map(|&i| {
                    let d = distance::distance(&templates[i], exemplar);
                    d * d
                })
                .sum::<f64>()
        })
        .sum();

    if within == 0.0 {
        return 0.0;
    }
    (between / (k - 1) as f64) / (within / (n - k) as f64)
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
    fn silhouette_of_well_separated_clusters_is_high() {
        let templates = vec![
            template("dev", 3),
            template("development", 3),
            template("xqzvfoobar123456789", 3),
        ];
        let clusters = vec![
            Cluster { exemplar: 0, members: vec![0, 1] },
            Cluster { exemplar: 2, members: vec![2] },
        ];
        let score = silhouette(&clusters, &templates);
        assert!(score > 0.0, "expected positive silhouette, got {score}");
    }

    #[test]
    fn single_cluster_has_zero_davies_bouldin() {
        let templates = vec![template("dev", 3), template("prod", 3)];
        let clusters = vec![Cluster { exemplar: 0, members: vec![0, 1] }];
        assert_eq!(davies_bouldin(&clusters, &templates), 0.0);
    }

    #[test]
    fn single_cluster_has_zero_calinski_harabasz() {
        let templates = vec![template("dev", 3), template("prod", 3)];
        let clusters = vec![Cluster { exemplar: 0, members: vec![0, 1] }];
        assert_eq!(calinski_harabasz_simplified(&clusters, &templates), 0.0);
    }
}
