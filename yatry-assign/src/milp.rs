use std::collections::HashMap;
use std::time::Duration;

use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};

use crate::error::{Error, Result};
use crate::trip::{split_trips, Trip};

/// Treat any `x[t,v] > 0.5` as "assigned" when reading back a binary
/// variable's relaxed solver value.
const ASSIGNED_THRESHOLD: f64 = 0.5;

/// Whether `VehicleAssigner::solve` proved optimality or returned the best
/// incumbent found before `deadline` expired (`spec.md` §4.5 "Failure
/// semantics").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Approximate,
}

/// One (possibly split) trip's final assignment: which vehicle it rides,
/// and its apportioned fare `F[t]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedTrip {
    pub vehicle: usize,
    pub group: usize,
    pub count: u32,
    pub pickup: usize,
    pub drop: usize,
    pub fare: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    pub trips: Vec<AssignedTrip>,
    pub worst_fare: f64,
    pub status: SolveStatus,
}

/// Solves the capacity-constrained vehicle assignment and fare-splitting
/// MILP of `spec.md` §4.5.
pub struct VehicleAssigner {
    capacity: u32,
}

impl VehicleAssigner {
    pub fn new(capacity: u32) -> Result<VehicleAssigner> {
        if capacity == 0 {
            return Err(Error::NonPositiveCapacity(0));
        }
        Ok(VehicleAssigner { capacity })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// `segment_fares[s]` is the fare of segment `s` (`s = 0 .. L-1` for a
    /// route of `L` stops). `deadline`, when set, is passed to the solver
    /// as a wall-clock budget; a solution returned under a deadline is
    /// reported as [`SolveStatus::Approximate`] per §4.5/§5's cancellation
    /// contract, since optimality is no longer guaranteed once the solver
    /// is time-boxed.
    pub fn solve(
        &self,
        trips: &[Trip],
        segment_fares: &[f64],
        deadline: Option<Duration>,
    ) -> Result<AssignmentResult> {
        let split = split_trips(trips, self.capacity)?;
        if split.is_empty() {
            return Ok(AssignmentResult {
                trips: Vec::new(),
                worst_fare: 0.0,
                status: SolveStatus::Optimal,
            });
        }

        let num_segments = segment_fares.len();
        for t in &split {
            if t.drop > num_segments {
                return Err(Error::SegmentOutOfRange {
                    segment: t.drop,
                    segment_count: num_segments,
                });
            }
        }

        let capacity = self.capacity;
        let num_trips = split.len();
        // One candidate vehicle per trip is always sufficient (each trip
        // could ride alone), so this upper-bounds the fleet without loss
        // of optimality.
        let num_vehicles = num_trips;
        let big_m: f64 = segment_fares.iter().sum::<f64>().max(1.0);

        let segment_trips: Vec<Vec<usize>> = (0..num_segments)
            .map(|s| {
                (0..num_trips)
                    .filter(|&t| split[t].segments().contains(&s))
                    .collect()
            })
            .collect();

        let mut vars = ProblemVariables::new();

        let x: Vec<Vec<Variable>> = (0..num_trips)
            .map(|_| {
                (0..num_vehicles)
                    .map(|_| vars.add(variable().binary()))
                    .collect()
            })
            .collect();
        let y: Vec<Vec<Variable>> = (0..num_vehicles)
            .map(|_| {
                (0..num_segments)
                    .map(|_| vars.add(variable().binary()))
                    .collect()
            })
            .collect();
        let occ: Vec<Vec<Variable>> = (0..num_vehicles)
            .map(|_| {
                (0..num_segments)
                    .map(|_| vars.add(variable().integer().min(0.0).max(capacity as f64)))
                    .collect()
            })
            .collect();
        let gamma: Vec<Vec<Vec<Variable>>> = (0..num_vehicles)
            .map(|_| {
                (0..num_segments)
                    .map(|_| {
                        (0..capacity)
                            .map(|_| vars.add(variable().binary()))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let f: Vec<Variable> = (0..num_trips).map(|_| vars.add(variable().min(0.0))).collect();
        let z = vars.add(variable().min(0.0));

        let mut model = vars.minimise(z).using(good_lp::default_solver);
        if let Some(d) = deadline {
            model.set_parameter("seconds", &d.as_secs_f64().to_string());
        }

        for v in 0..num_vehicles {
            for s in 0..num_segments {
                let occupants = &segment_trips[s];

                let demand: Expression = occupants
                    .iter()
                    .map(|&t| split[t].count as f64 * x[t][v])
                    .sum();
                model = model.with(constraint!(demand.clone() <= capacity as f64 * y[v][s]));

                let presence: Expression = occupants.iter().map(|&t| x[t][v]).sum();
                model = model.with(constraint!(presence <= occupants.len() as f64 * y[v][s]));

                model = model.with(constraint!(occ[v][s] == demand));

                let one_hot: Expression = gamma[v][s].iter().copied().sum();
                model = model.with(constraint!(one_hot == y[v][s]));

                let occ_from_gamma: Expression = gamma[v][s]
                    .iter()
                    .enumerate()
                    .map(|(idx, &g)| (idx + 1) as f64 * g)
                    .sum();
                model = model.with(constraint!(occ[v][s] == occ_from_gamma));
            }
        }

        for t in 0..num_trips {
            let exclusive: Expression = (0..num_vehicles).map(|v| x[t][v]).sum();
            model = model.with(constraint!(exclusive == 1.0));

            for v in 0..num_vehicles {
                let f_vt: Expression = split[t]
                    .segments()
                    .map(|s| {
                        let per_seat: Expression = gamma[v][s]
                            .iter()
                            .enumerate()
                            .map(|(idx, &g)| (1.0 / (idx + 1) as f64) * g)
                            .sum();
                        segment_fares[s] * per_seat
                    })
                    .fold(Expression::from(0.0), |acc, e| acc + e);

                model = model.with(constraint!(
                    f_vt.clone() - big_m * (1.0 - x[t][v]) <= f[t]
                ));
                model = model.with(constraint!(f[t] <= f_vt + big_m * (1.0 - x[t][v])));
            }

            model = model.with(constraint!(f[t] <= z));
        }

        let solution = model.solve().map_err(|e| {
            let classified = classify_solver_error(e, &split, num_vehicles, capacity);
            tracing::warn!(error = %classified, num_trips, "MILP solve did not produce a solution");
            classified
        })?;

        let status = if deadline.is_some() {
            SolveStatus::Approximate
        } else {
            SolveStatus::Optimal
        };
        tracing::debug!(?status, num_trips, worst_fare = solution.value(z), "MILP solve outcome");

        let mut assigned = Vec::with_capacity(num_trips);
        for t in 0..num_trips {
            let vehicle = (0..num_vehicles)
                .find(|&v| solution.value(x[t][v]) > ASSIGNED_THRESHOLD)
                .ok_or_else(|| Error::SolverFailed(format!("trip {t} has no assigned vehicle")))?;
            assigned.push((vehicle, solution.value(f[t])));
        }

        let mut used_vehicles: Vec<usize> = assigned.iter().map(|(v, _)| *v).collect();
        used_vehicles.sort_unstable();
        used_vehicles.dedup();
        let renumber: HashMap<usize, usize> = used_vehicles
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let result_trips = split
            .iter()
            .zip(assigned.iter())
            .map(|(trip, (vehicle, fare))| AssignedTrip {
                vehicle: renumber[vehicle],
                group: trip.group,
                count: trip.count,
                pickup: trip.pickup,
                drop: trip.drop,
                fare: *fare,
            })
            .collect();

        Ok(AssignmentResult {
            trips: result_trips,
            worst_fare: solution.value(z),
            status,
        })
    }
}

fn classify_solver_error(
    err: good_lp::ResolutionError,
    split: &[Trip],
    num_vehicles: usize,
    capacity: u32,
) -> Error {
    match err {
        good_lp::ResolutionError::Infeasible => {
            let aggregate_capacity = capacity * num_vehicles as u32;
            match exceeding_segment(split, aggregate_capacity) {
                Some((segment, demand)) => Error::CapacityExceeded {
                    segment,
                    demand,
                    aggregate_capacity,
                },
                None => Error::SolverFailed("solver reported infeasibility".to_string()),
            }
        }
        other => Error::SolverFailed(other.to_string()),
    }
}

/// Finds a segment whose aggregate demand exceeds `aggregate_capacity`, the
/// re-check `spec.md` §4.5 requires before reporting *capacity-exceeded*.
fn exceeding_segment(split: &[Trip], aggregate_capacity: u32) -> Option<(usize, u32)> {
    let num_segments = split.iter().map(|t| t.drop).max().unwrap_or(0);
    (0..num_segments).find_map(|s| {
        let demand: u32 = split
            .iter()
            .filter(|t| t.segments().contains(&s))
            .map(|t| t.count)
            .sum();
        (demand > aggregate_capacity).then_some((s, demand))
    })
}
