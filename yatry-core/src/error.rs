use thiserror::Error;

use yatry_model::LocationId;

/// Aggregated failure modes of `Pipeline::run`, per `spec.md` §7's
/// taxonomy: *invalid topology* and *invalid input* are fatal construction
/// failures, *solver infeasible* carries the offending segment, and
/// *solver time-limit* is not an error at all (it surfaces as
/// [`crate::report::VehicleSolveReport::approximate`] instead).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no passengers were given")]
    EmptyPassengers,

    #[error("invalid topology or passenger input: {0}")]
    Model(#[from] yatry_model::Error),

    #[error("invalid time preference: {0}")]
    Time(#[from] yatry_time::Error),

    #[error("affinity computation failed: {0}")]
    Affinity(#[from] yatry_affinity::Error),

    #[error("clustering failed: {0}")]
    Cluster(#[from] yatry_cluster::Error),

    #[error("group {group} has no route connecting {location:?} back to the group's shared origin")]
    DisjointGroupRoute { group: usize, location: LocationId },

    #[error("vehicle assignment failed for group {group}: {source}")]
    Assign {
        group: usize,
        #[source]
        source: yatry_assign::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
