//! `yatry-affinity` — builds the pairwise route (`rho`), temporal (`tau`),
//! and composite (`A = rho (.) tau`) affinity matrices described in
//! `spec.md` §4.3, from a [`MapGraph`] and a passenger batch.

mod error;
mod matrix;
mod route;

pub use error::{Error, Result};
pub use matrix::Matrix;

use rayon::prelude::*;
use yatry_model::{MapGraph, Passenger};
use yatry_time::TimeDistribution;

/// Tunables for [`build`]. `parallel` gates the rayon fan-out described in
/// `spec.md` §5: with a fixed passenger batch the two code paths produce
/// bitwise-identical matrices, since each row is an independent,
/// index-addressed computation over shared immutable inputs.
#[derive(Debug, Clone, Copy)]
pub struct AffinityConfig {
    pub m_range: f64,
    pub parallel: bool,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        AffinityConfig {
            m_range: yatry_time::DEFAULT_M_RANGE,
            parallel: false,
        }
    }
}

/// The three `N x N` matrices of `spec.md` §3: `rho`, `tau`, and their
/// elementwise product `a`. Diagonal entries are `1.0` in all three before
/// `ExemplarCluster` substitutes a preference value.
pub struct AffinityMatrices {
    pub rho: Matrix,
    pub tau: Matrix,
    pub a: Matrix,
}

struct PassengerGeometry {
    route: yatry_model::Route,
    fare: f64,
    dist: TimeDistribution,
}

fn gather(
    graph: &MapGraph,
    passengers: &[Passenger],
    m_range: f64,
) -> Result<Vec<PassengerGeometry>> {
    passengers
        .iter()
        .map(|p| {
            let route = graph.route(p.origin(), p.destination())?;
            let fare = graph.route_fare(&route)?;
            let dist = TimeDistribution::from_window(
                p.window().t_min(),
                p.window().t_max(),
                m_range,
            )?;
            Ok(PassengerGeometry { route, fare, dist })
        })
        .collect()
}

fn compute_row(
    graph: &MapGraph,
    geometry: &[PassengerGeometry],
    passengers: &[Passenger],
    i: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = geometry.len();
    let mut rho_row = vec![0.0; n];
    let mut tau_row = vec![0.0; n];
    for j in 0..n {
        if i == j {
            rho_row[j] = 1.0;
            tau_row[j] = 1.0;
            continue;
        }
        rho_row[j] = route::route_affinity(
            graph,
            &geometry[i].route,
            geometry[i].fare,
            &geometry[j].route,
        )?;
        tau_row[j] = geometry[i].dist.temporal_affinity_toward(
            passengers[j].window().t_min(),
            passengers[j].window().t_max(),
        )?;
    }
    Ok((rho_row, tau_row))
}

/// Builds the affinity matrices for a passenger batch over `graph`.
pub fn build(
    graph: &MapGraph,
    passengers: &[Passenger],
    config: &AffinityConfig,
) -> Result<AffinityMatrices> {
    if passengers.is_empty() {
        return Err(Error::EmptyPassengers);
    }
    let n = passengers.len();
    let geometry = gather(graph, passengers, config.m_range)?;

    let rows: Vec<(Vec<f64>, Vec<f64>)> = if config.parallel {
        (0..n)
            .into_par_iter()
            .map(|i| compute_row(graph, &geometry, passengers, i))
            .collect::<Result<Vec<_>>>()?
    } else {
        (0..n)
            .map(|i| compute_row(graph, &geometry, passengers, i))
            .collect::<Result<Vec<_>>>()?
    };

    let mut rho = Matrix::zeros(n);
    let mut tau = Matrix::zeros(n);
    let mut a = Matrix::zeros(n);
    for (i, (rho_row, tau_row)) in rows.into_iter().enumerate() {
        for j in 0..n {
            rho.set(i, j, rho_row[j]);
            tau.set(i, j, tau_row[j]);
            a.set(i, j, rho_row[j] * tau_row[j]);
        }
    }

    tracing::debug!(n, "built affinity matrices");
    Ok(AffinityMatrices { rho, tau, a })
}
