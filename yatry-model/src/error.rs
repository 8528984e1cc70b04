use thiserror::Error;

use crate::LocationId;

/// Errors produced while building or querying a [`crate::MapGraph`] or
/// constructing a [`crate::Passenger`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("location {0:?} is not registered")]
    UnknownLocation(LocationId),

    #[error("edge fare must be strictly positive, got {0}")]
    NonPositiveFare(f64),

    #[error("location {0:?} already has a parent; adding this edge would create a cycle")]
    WouldCreateCycle(LocationId),

    #[error("no path exists between {0:?} and {1:?}; the atlas is disconnected")]
    Disconnected(LocationId, LocationId),

    #[error("route is empty")]
    EmptyRoute,

    #[error("route contains a non-adjacent step between {0:?} and {1:?}")]
    BrokenAdjacency(LocationId, LocationId),

    #[error("passenger time window is invalid: t_min ({0}) must be < t_max ({1})")]
    InvalidTimeWindow(f64, f64),
}

pub type Result<T> = std::result::Result<T, Error>;
