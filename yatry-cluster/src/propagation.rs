use std::collections::HashMap;

use yatry_affinity::Matrix;

use crate::config::ClusterConfig;
use crate::error::{Error, Result};

/// One discovered group: an exemplar passenger index and the full member
/// list (the exemplar is always a member of its own group), both reported
/// in ascending index order (`spec.md` §5 ordering guarantee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub exemplar: usize,
    pub members: Vec<usize>,
}

/// Outcome of running affinity propagation to convergence (or `max_iter`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    pub groups: Vec<Group>,
    pub iterations: usize,
    pub converged: bool,
    /// Set when a non-finite update forced the single-exemplar fallback of
    /// `spec.md` §4.4's failure semantics.
    pub degenerate: bool,
}

fn has_non_finite(m: &Matrix) -> bool {
    m.as_slice().iter().any(|v| !v.is_finite())
}

fn l1_distance(a: &Matrix, b: &Matrix) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs())
        .sum()
}

/// `D = R + V`; exemplars are `{k : D[k,k] > 0}`, or the single
/// `argmax_k D[k,k]` if that set is empty.
fn extract_exemplars(d: &Matrix) -> Vec<usize> {
    let n = d.n();
    let exemplars: Vec<usize> = (0..n).filter(|&k| d.get(k, k) > 0.0).collect();
    if !exemplars.is_empty() {
        return exemplars;
    }
    let mut best_k = 0;
    let mut best_val = f64::NEG_INFINITY;
    for k in 0..n {
        let val = d.get(k, k);
        if val > best_val {
            best_val = val;
            best_k = k;
        }
    }
    vec![best_k]
}

/// Assigns every non-exemplar to its best exemplar (`argmax_k D[i,k]`,
/// ties broken by lowest index), and reports groups sorted by lowest
/// member index with members in ascending order.
fn assign_groups(d: &Matrix, exemplars: &[usize]) -> Vec<Group> {
    let n = d.n();
    let mut members: HashMap<usize, Vec<usize>> = exemplars.iter().map(|&k| (k, Vec::new())).collect();

    for i in 0..n {
        if exemplars.contains(&i) {
            members.get_mut(&i).unwrap().push(i);
            continue;
        }
        let mut best_k = exemplars[0];
        let mut best_val = f64::NEG_INFINITY;
        for &k in exemplars {
            let val = d.get(i, k);
            if val > best_val {
                best_val = val;
                best_k = k;
            }
        }
        members.get_mut(&best_k).unwrap().push(i);
    }

    let mut groups: Vec<Group> = members
        .into_iter()
        .map(|(exemplar, mut members)| {
            members.sort_unstable();
            Group { exemplar, members }
        })
        .collect();
    groups.sort_by_key(|g| g.members[0]);
    groups
}

/// Runs the responsibility/availability message-passing procedure of
/// `spec.md` §4.4 on `affinity` (min-max rescaled internally) and returns
/// the discovered groups.
pub fn cluster(affinity: &Matrix, config: &ClusterConfig) -> Result<ClusterResult> {
    let n = affinity.n();
    if n == 0 {
        return Err(Error::EmptyMatrix);
    }
    if !(0.5..1.0).contains(&config.damping) {
        return Err(Error::InvalidDamping(config.damping));
    }
    if n == 1 {
        return Ok(ClusterResult {
            groups: vec![Group {
                exemplar: 0,
                members: vec![0],
            }],
            iterations: 0,
            converged: true,
            degenerate: false,
        });
    }

    let scaled = affinity.min_max_scaled();
    let preference = config
        .preference_override
        .unwrap_or_else(|| scaled.percentile(config.preference_percentile));

    let mut s = scaled.clone();
    for k in 0..n {
        s.set(k, k, preference);
    }

    let mut r = Matrix::zeros(n);
    let mut v = Matrix::zeros(n);
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.max_iter {
        iterations = iter + 1;
        let r_old = r.clone();
        let v_old = v.clone();

        let mut r_new = Matrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let mut best = f64::NEG_INFINITY;
                for kp in 0..n {
                    if kp == k {
                        continue;
                    }
                    let candidate = v_old.get(i, kp) + s.get(i, kp);
                    if candidate > best {
                        best = candidate;
                    }
                }
                r_new.set(i, k, s.get(i, k) - best);
            }
        }

        let mut v_new = Matrix::zeros(n);
        for k in 0..n {
            let sum_pos: f64 = (0..n)
                .filter(|&ip| ip != k)
                .map(|ip| r_old.get(ip, k).max(0.0))
                .sum();
            for i in 0..n {
                if i == k {
                    v_new.set(k, k, sum_pos);
                } else {
                    let sum_excl = sum_pos - r_old.get(i, k).max(0.0);
                    v_new.set(i, k, (r_old.get(k, k) + sum_excl).min(0.0));
                }
            }
        }

        if has_non_finite(&r_new) || has_non_finite(&v_new) {
            tracing::warn!(iteration = iter, "non-finite update; falling back to single exemplar");
            let d_fallback = add(&r_old, &v_old);
            let exemplars = extract_exemplars(&d_fallback);
            let exemplar = exemplars[0];
            let members: Vec<usize> = (0..n).collect();
            return Ok(ClusterResult {
                groups: vec![Group { exemplar, members }],
                iterations,
                converged: false,
                degenerate: true,
            });
        }

        for idx in 0..n * n {
            r.as_mut_slice()[idx] =
                (1.0 - config.damping) * r_new.as_slice()[idx] + config.damping * r_old.as_slice()[idx];
            v.as_mut_slice()[idx] =
                (1.0 - config.damping) * v_new.as_slice()[idx] + config.damping * v_old.as_slice()[idx];
        }

        let delta = l1_distance(&r, &r_old) + l1_distance(&v, &v_old);
        if delta < config.conv_tol {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(max_iter = config.max_iter, "affinity propagation did not converge");
    }

    let d = add(&r, &v);
    let exemplars = extract_exemplars(&d);
    let groups = assign_groups(&d, &exemplars);

    Ok(ClusterResult {
        groups,
        iterations,
        converged,
        degenerate: false,
    })
}

fn add(a: &Matrix, b: &Matrix) -> Matrix {
    let n = a.n();
    let mut out = Matrix::zeros(n);
    for idx in 0..n * n {
        out.as_mut_slice()[idx] = a.as_slice()[idx] + b.as_slice()[idx];
    }
    out
}
