use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("vehicle capacity must be positive, got {0}")]
    NonPositiveCapacity(u32),

    #[error("trip pickup ({pickup}) must be < drop ({drop})")]
    InvalidStops { pickup: usize, drop: usize },

    #[error("trip references segment {segment} but only {segment_count} segment fares were given")]
    SegmentOutOfRange { segment: usize, segment_count: usize },

    #[error("demand on segment {segment} ({demand}) exceeds aggregate capacity ({aggregate_capacity})")]
    CapacityExceeded {
        segment: usize,
        demand: u32,
        aggregate_capacity: u32,
    },

    #[error("the MILP solver failed: {0}")]
    SolverFailed(String),

    #[error("solver deadline expired before a feasible solution was found")]
    NoSolution,
}

pub type Result<T> = std::result::Result<T, Error>;
