//! Affinity propagation: message-passing clustering that discovers both
//! the number of clusters and their exemplars from a similarity matrix,
//! with no need to pick `k` up front.

use submorph_core::{Cancel, Cluster};

/// Damping factor; must lie in `[0.5, 1)`.
pub const DEFAULT_DAMPING: f64 = 0.9;
/// Consecutive stable iterations required for convergence.
pub const DEFAULT_CONVERGENCE: usize = 15;

/// Run affinity propagation over a precomputed similarity matrix.
///
/// `similarity[i][j]` must be symmetric for `i != j`; the diagonal carries
/// each point's preference (higher preference biases a point toward being
/// its own exemplar, i.e. a singleton cluster).
#[must_use]
pub fn propagate(
    similarity: &[Vec<f64>],
    damping: f64,
    max_iterations: usize,
    convergence: usize,
    cancel: &Cancel,
) -> Vec<Cluster> {
    let n = similarity.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Cluster {
            exemplar: 0,
            members: vec![0],
        }];
    }

    let mut responsibility = vec![vec![0.0f64; n]; n];
    let mut availability = vec![vec![0.0f64; n]; n];
    let mut stable_rounds = 0usize;
    let mut last_exemplars: Option<Vec<usize>> = None;

    for _ in 0..max_iterations {
        if cancel.is_set() {
            break;
        }

        update_responsibility(similarity, &availability, &mut responsibility, damping);
        update_availability(&responsibility, &mut availability, damping);

        let exemplars = exemplars_of(&responsibility, &availability);
        if last_exemplars.as_ref() == Some(&exemplars) {
            stable_rounds += 1;
        } else {
            stable_rounds = 0;
        }
        last_exemplars = Some(exemplars);
        if stable_rounds >= convergence {
            break;
        }
    }

    assign_clusters(&responsibility, &availability)
}

fn update_responsibility(s: &[Vec<f64>], a: &[Vec<f64>], r: &mut [Vec<f64>], damping: f64) {
    let n = s.len();
    for i in 0..n {
        for k in 0..n {
            let mut max_other = f64::NEG_INFINITY;
            for kp in 0..n {
                if kp != k {
                    max_other = max_other.max(a[i][kp] + s[i][kp]);
                }
            }
            let new_value = s[i][k] - max_other;
            r[i][k] = damping * r[i][k] + (1.0 - damping) * new_value;
        }
    }
}

fn update_availability(r: &[Vec<f64>], a: &mut [Vec<f64>], damping: f64) {
    let n = r.len();
    for i in 0..n {
        for k in 0..n {
            let new_value = if i == k {
                (0..n).filter(|&ip| ip != k).map(|ip| r[ip][k].max(0.0)).sum()
            } else {
                let sum: f64 = (0..n)
                    .filter(|&ip| ip != i && ip != k)
                    .map(|ip| r[ip][k].max(0.0))
                    .sum();
                (r[k][k] + sum).min(0.0)
            };
            a[i][k] = damping * a[i][k] + (1.0 - damping) * new_value;
        }
    }
}

fn exemplars_of(r: &[Vec<f64>], a: &[Vec<f64>]) -> Vec<usize> {
    let n = r.len();
    (0..n)
        .filter(|&k| r[k][k] + a[k][k] > 0.0)
        .collect()
}

fn assign_clusters(r: &[Vec<f64>], a: &[Vec<f64>]) -> Vec<Cluster> {
    let n = r.len();
    let mut exemplars = exemplars_of(r, a);
    if exemplars.is_empty() {
        // No point has positive self-responsibility+availability: fall
        // back to the single strongest overall exemplar so the run still
        // produces a cluster instead of dropping every template.
        if let Some((best, _)) = (0..n)
            .map(|k| (k, r[k][k] + a[k][k]))
            .max_by(|x, y| x.1.total_cmp(&y.1))
        {
            exemplars = vec![best];
        } else {
            return Vec::new();
        }
    }

    let mut by_exemplar: std::collections::BTreeMap<usize, Vec<usize>> =
        exemplars.iter().map(|&e| (e, Vec::new())).collect();

    for i in 0..n {
        let best_exemplar = exemplars
            .iter()
            .copied()
            .max_by(|&x, &y| (r[i][x] + a[i][x]).total_cmp(&(r[i][y] + a[i][y])))
            .expect("exemplars is non-empty");
        by_exemplar.entry(best_exemplar).or_default().push(i);
    }

    by_exemplar
        .into_iter()
        .map(|(exemplar, members)| Cluster { exemplar, members })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn similarity_from_distance(distance: impl Fn(usize, usize) -> f64, n: usize, preference: f64) -> Vec<Vec<f64>> {
        let mut s = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                s[i][j] = if i == j { preference } else { -distance(i, j) };
            }
        }
        s
    }

    #[test]
    fn single_point_is_its_own_exemplar() {
        let s = vec![vec![-1.0]];
        let clusters = propagate(&s, 0.9, 100, 10, &Cancel::new());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].exemplar, 0);
    }

    #[test]
    fn two_well_separated_groups_form_two_clusters() {
        // Points 0,1 are close; points 2,3 are close; the two groups are
        // far apart.
        let points = [0.0, 0.1, 10.0, 10.1];
        let s = similarity_from_distance(|i, j| (points[i] - points[j]).abs(), 4, -1.0);
        let clusters = propagate(&s, 0.9, 200, 15, &Cancel::new());
        assert_eq!(clusters.len(), 2);
        let total_members: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total_members, 4);
    }

    #[test]
    fn cancellation_still_returns_a_valid_assignment() {
        let s = similarity_from_distance(|i, j| if i == j { 0.0 } else { 1.0 }, 5, -1.0);
        let cancel = Cancel::new();
        cancel.set();
        let clusters = propagate(&s, 0.9, 200, 15, &cancel);
        let total_members: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total_members, 5);
    }
}
