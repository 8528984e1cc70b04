//! `yatry-core` — the pipeline orchestrator tying the rest of the
//! workspace together, per `spec.md` §6: a single `Pipeline::run` entry
//! point from `MapGraph` + passengers + `Config` to a clustering, per-group
//! departure time and fare split, and per-vehicle assignment.
//!
//! | Module       | Contents                                          |
//! |--------------|------------------------------------------------------|
//! | [`config`]   | `Config`                                              |
//! | [`pipeline`] | `Pipeline`, `PipelineOutput`, `GroupResult`, ...      |
//! | [`report`]   | `PipelineReport`, `VehicleSolveReport`                |
//! | [`error`]    | `Error`, `Result`                                     |

mod config;
mod error;
mod pipeline;
mod report;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{GroupResult, PassengerFare, Pipeline, PipelineOutput, VehicleOutcome};
pub use report::{PipelineReport, VehicleSolveReport};

pub use yatry_assign::SolveStatus;
pub use yatry_model::{LocationId, MapGraph, Passenger, PassengerId, TimeWindow};
pub use yatry_time::BracketPolicy;
