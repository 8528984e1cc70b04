use yatry_model::{MapGraph, Route};

use crate::error::Result;

/// `spec.md` §4.3: `rho[i,j] = fare(shared_prefix(route_i, route_j)) / fare(route_i)`,
/// with `rho[i,i] = 1`. Asymmetric: `i`'s affinity toward `j` is the
/// fraction of `i`'s fare that `j` can share.
///
/// See `SPEC_FULL.md` §4.3: this applies the formula directly from the
/// shared-prefix definition in `spec.md` §3, without requiring the prefix
/// to equal one of the two full routes — both worked scenarios in
/// `spec.md` §8 (prefix subsumption, disjoint routes) are consistent with
/// this direct reading.
pub fn route_affinity(
    graph: &MapGraph,
    route_i: &Route,
    fare_i: f64,
    route_j: &Route,
) -> Result<f64> {
    let prefix = route_i.shared_prefix(route_j);
    let prefix_fare = if prefix.stops().len() <= 1 {
        0.0
    } else {
        graph.route_fare(&prefix)?
    };
    Ok(prefix_fare / fare_i)
}
