use std::collections::HashMap;

use yatry_affinity::AffinityConfig;
use yatry_assign::{AssignedTrip, SolveStatus, Trip, VehicleAssigner};
use yatry_cluster::ClusterConfig;
use yatry_model::{MapGraph, Passenger, Route};
use yatry_time::{DepartureOptimizer, TimeDistribution};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{PipelineReport, VehicleSolveReport};

/// One passenger's fare share within a group, keyed by that passenger's
/// position in the input slice handed to [`Pipeline::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassengerFare {
    pub passenger: usize,
    pub fare: f64,
}

/// A single vehicle's trips within a group, renumbered contiguously from
/// zero (`spec.md` §4.5 "Result extraction").
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleOutcome {
    pub vehicle: usize,
    pub trips: Vec<AssignedTrip>,
}

/// One discovered passenger group and everything downstream of clustering:
/// its optimised departure time, per-passenger fare shares, and per-vehicle
/// assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    pub exemplar: usize,
    pub members: Vec<usize>,
    pub departure_time: f64,
    pub passenger_fares: Vec<PassengerFare>,
    pub vehicles: Vec<VehicleOutcome>,
}

/// The full result of running the pipeline once: every group, in cluster
/// order (`spec.md` §5 ordering guarantee), plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub groups: Vec<GroupResult>,
    pub report: PipelineReport,
}

/// The single entry point a driver program calls (`spec.md` §6): ties
/// `MapGraph`, `TimeDistribution`/`DepartureOptimizer`, `AffinityMatrices`,
/// `ExemplarCluster`, and `VehicleAssigner` together into one batch run.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Pipeline {
        Pipeline { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, graph: &MapGraph, passengers: &[Passenger]) -> Result<PipelineOutput> {
        if passengers.is_empty() {
            return Err(Error::EmptyPassengers);
        }
        tracing::info!(num_passengers = passengers.len(), "pipeline: building affinity matrices");

        let affinity = yatry_affinity::build(
            graph,
            passengers,
            &AffinityConfig {
                m_range: self.config.m_range,
                parallel: self.config.parallel,
            },
        )?;

        tracing::info!("pipeline: running exemplar clustering");
        let cluster_result = yatry_cluster::cluster(
            &affinity.a,
            &ClusterConfig {
                damping: self.config.damping,
                max_iter: self.config.max_iter,
                conv_tol: self.config.conv_tol,
                preference_percentile: self.config.preference_percentile,
                preference_override: self.config.preference_override,
            },
        )?;
        tracing::info!(
            groups = cluster_result.groups.len(),
            iterations = cluster_result.iterations,
            converged = cluster_result.converged,
            "pipeline: clustering finished"
        );

        let mut groups = Vec::with_capacity(cluster_result.groups.len());
        let mut vehicle_reports = Vec::with_capacity(cluster_result.groups.len());

        for (group_index, group) in cluster_result.groups.iter().enumerate() {
            tracing::debug!(group_index, members = group.members.len(), "pipeline: assigning group");
            let departure_time = self.group_departure_time(passengers, &group.members)?;
            let (passenger_fares, vehicles, status) =
                self.assign_group_vehicles(graph, passengers, group_index, &group.members)?;

            vehicle_reports.push(VehicleSolveReport {
                group: group_index,
                status,
            });

            groups.push(GroupResult {
                exemplar: group.exemplar,
                members: group.members.clone(),
                departure_time,
                passenger_fares,
                vehicles,
            });
        }

        Ok(PipelineOutput {
            groups,
            report: PipelineReport {
                cluster_iterations: cluster_result.iterations,
                cluster_converged: cluster_result.converged,
                cluster_degenerate: cluster_result.degenerate,
                vehicle_reports,
            },
        })
    }

    fn group_departure_time(&self, passengers: &[Passenger], members: &[usize]) -> Result<f64> {
        let distributions: Vec<TimeDistribution> = members
            .iter()
            .map(|&idx| {
                let window = passengers[idx].window();
                TimeDistribution::from_window(window.t_min(), window.t_max(), self.config.m_range)
            })
            .collect::<yatry_time::Result<Vec<_>>>()?;

        let optimizer = DepartureOptimizer::default();
        Ok(optimizer.optimize(&distributions, self.config.bracket_policy)?)
    }

    /// Builds the shared-route trip plan for a group, solves the MILP (or
    /// falls back to proportional splitting on a non-capacity solver
    /// error), and maps the result back onto individual passengers.
    fn assign_group_vehicles(
        &self,
        graph: &MapGraph,
        passengers: &[Passenger],
        group_index: usize,
        members: &[usize],
    ) -> Result<(Vec<PassengerFare>, Vec<VehicleOutcome>, SolveStatus)> {
        let plan = self.group_route_plan(graph, passengers, group_index, members)?;
        if plan.trips.is_empty() {
            return Ok((Vec::new(), Vec::new(), SolveStatus::Optimal));
        }

        let assigner = VehicleAssigner::new(self.config.capacity).map_err(|source| Error::Assign {
            group: group_index,
            source,
        })?;
        let assignment = match assigner.solve(&plan.trips, &plan.segment_fares, self.config.solver_deadline)
        {
            Ok(result) => result,
            Err(source @ yatry_assign::Error::CapacityExceeded { .. }) => {
                return Err(Error::Assign {
                    group: group_index,
                    source,
                });
            }
            Err(_) => {
                return self.proportional_fallback(&plan, members);
            }
        };

        let mut cursors: HashMap<usize, usize> = HashMap::new();
        let mut passenger_fares = Vec::with_capacity(members.len());
        let mut by_vehicle: HashMap<usize, Vec<AssignedTrip>> = HashMap::new();

        for assigned_trip in &assignment.trips {
            let bucket = &plan.trip_members[assigned_trip.group];
            let offset = *cursors.entry(assigned_trip.group).or_insert(0);
            let take = assigned_trip.count as usize;
            for &member in &bucket[offset..offset + take] {
                passenger_fares.push(PassengerFare {
                    passenger: member,
                    fare: assigned_trip.fare,
                });
            }
            cursors.insert(assigned_trip.group, offset + take);
            by_vehicle
                .entry(assigned_trip.vehicle)
                .or_default()
                .push(assigned_trip.clone());
        }

        passenger_fares.sort_by_key(|pf| pf.passenger);

        let mut vehicles: Vec<VehicleOutcome> = by_vehicle
            .into_iter()
            .map(|(vehicle, trips)| VehicleOutcome { vehicle, trips })
            .collect();
        vehicles.sort_by_key(|v| v.vehicle);

        Ok((passenger_fares, vehicles, assignment.status))
    }

    fn proportional_fallback(
        &self,
        plan: &GroupRoutePlan,
        members: &[usize],
    ) -> Result<(Vec<PassengerFare>, Vec<VehicleOutcome>, SolveStatus)> {
        let original_fares: Vec<f64> = plan
            .trips
            .iter()
            .map(|t| plan.segment_fares[t.pickup..t.drop].iter().sum())
            .collect();
        let worst_case_fare = plan.full_route_fare;
        let shares = yatry_assign::solve_proportional(&original_fares, worst_case_fare);

        let mut passenger_fares = Vec::with_capacity(members.len());
        for (bucket, share) in plan.trip_members.iter().zip(shares.iter()) {
            for &member in bucket {
                passenger_fares.push(PassengerFare {
                    passenger: member,
                    fare: *share / bucket.len() as f64,
                });
            }
        }
        passenger_fares.sort_by_key(|pf| pf.passenger);

        Ok((passenger_fares, Vec::new(), SolveStatus::Approximate))
    }

    /// Builds the backbone ("spine") route for a group: the longest route
    /// among its members, with each member mapped onto a `[pickup, drop)`
    /// window of that spine via `Route::shared_prefix`. Members sharing a
    /// window are bundled into one pre-split trip so `VehicleAssigner` sees
    /// the group's actual seat demand per segment.
    ///
    /// Assumes every member's route shares the spine's origin (true for a
    /// campus batch, where all commutes begin at the registered hub): the
    /// segment fares are read off the spine in its own stop order, and the
    /// shared-prefix length is used directly as a segment index into that
    /// order. A cluster whose members approach from different origins but
    /// converge on a common destination can make `Route::shared_prefix`
    /// reorient one side, which this mapping does not account for.
    fn group_route_plan(
        &self,
        graph: &MapGraph,
        passengers: &[Passenger],
        group_index: usize,
        members: &[usize],
    ) -> Result<GroupRoutePlan> {
        let routes: Vec<Route> = members
            .iter()
            .map(|&idx| graph.route(passengers[idx].origin(), passengers[idx].destination()))
            .collect::<yatry_model::Result<Vec<_>>>()?;

        let spine_position = routes
            .iter()
            .enumerate()
            .max_by_key(|(_, r)| r.len())
            .map(|(pos, _)| pos)
            .expect("members is non-empty");
        let spine = routes[spine_position].clone();

        let mut segment_fares = Vec::with_capacity(spine.len().saturating_sub(1));
        for pair in spine.stops().windows(2) {
            let hop = graph.route(pair[0], pair[1])?;
            segment_fares.push(graph.route_fare(&hop)?);
        }
        let full_route_fare: f64 = segment_fares.iter().sum();

        let mut buckets: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (&member, route) in members.iter().zip(routes.iter()) {
            let prefix = spine.shared_prefix(route);
            if prefix.len() < 2 {
                return Err(Error::DisjointGroupRoute {
                    group: group_index,
                    location: route.origin(),
                });
            }
            buckets.entry((0, prefix.len() - 1)).or_default().push(member);
        }

        let mut keys: Vec<(usize, usize)> = buckets.keys().copied().collect();
        keys.sort_unstable();

        let mut trips = Vec::with_capacity(keys.len());
        let mut trip_members = Vec::with_capacity(keys.len());
        for (trip_index, key) in keys.into_iter().enumerate() {
            let mut bucket = buckets.remove(&key).unwrap();
            bucket.sort_unstable();
            let count = bucket.len() as u32;
            let trip = Trip::new(trip_index, count, key.0, key.1).map_err(|source| Error::Assign {
                group: group_index,
                source,
            })?;
            trips.push(trip);
            trip_members.push(bucket);
        }

        Ok(GroupRoutePlan {
            segment_fares,
            full_route_fare,
            trips,
            trip_members,
        })
    }
}

struct GroupRoutePlan {
    segment_fares: Vec<f64>,
    full_route_fare: f64,
    trips: Vec<Trip>,
    /// `trip_members[i]` holds the passenger indices (ascending) bundled
    /// into pre-split trip `i`, so solved fares can be mapped back to
    /// individual passengers after `split_trips` fragments them.
    trip_members: Vec<Vec<usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two trips sharing a spine of fare-150 then fare-50 segments: a
    /// short-route trip (`[0, 1)`, fare 150) carrying two passengers and a
    /// full-route trip (`[0, 2)`, fare 200) carrying one. Head count alone
    /// would charge every passenger `200/3 = 66.67`; the proportional rule
    /// must instead weight each trip by its own sub-route fare.
    fn mismatched_route_length_plan() -> GroupRoutePlan {
        GroupRoutePlan {
            segment_fares: vec![150.0, 50.0],
            full_route_fare: 200.0,
            trips: vec![
                Trip::new(0, 2, 0, 1).unwrap(),
                Trip::new(1, 1, 0, 2).unwrap(),
            ],
            trip_members: vec![vec![0, 1], vec![2]],
        }
    }

    #[test]
    fn proportional_fallback_weights_by_route_length_not_head_count() {
        let pipeline = Pipeline::new(Config::default());
        let plan = mismatched_route_length_plan();
        let (fares, vehicles, status) = pipeline
            .proportional_fallback(&plan, &[0, 1, 2])
            .unwrap();

        assert!(vehicles.is_empty());
        assert_eq!(status, SolveStatus::Approximate);

        let mut fares = fares;
        fares.sort_by_key(|f| f.passenger);

        // Short-route riders (trip 0, fare 150 shared by 2) each pay
        // 150 * 200 / 350 / 2; the long-route rider (trip 1, fare 200)
        // pays the full 200 * 200 / 350 alone. Equal-head-count sharing
        // would have put all three at 200/3 = 66.67 instead.
        let expected_short = 150.0 * 200.0 / 350.0 / 2.0;
        let expected_long = 200.0 * 200.0 / 350.0;
        assert!((fares[0].fare - expected_short).abs() < 1e-9);
        assert!((fares[1].fare - expected_short).abs() < 1e-9);
        assert!((fares[2].fare - expected_long).abs() < 1e-9);
        assert!(fares[2].fare > fares[0].fare);
    }
}
