//! `yatry-assign` — capacity-aware vehicle assignment and fare splitting
//! (`spec.md` §4.5): the MILP-based `VehicleAssigner` plus the proportional
//! fallback for when the solver is skipped.
//!
//! | Module      | Contents                                             |
//! |-------------|-------------------------------------------------------|
//! | [`trip`]    | `Trip`, `split_trips`                                  |
//! | [`milp`]    | `VehicleAssigner`, `AssignmentResult`, `SolveStatus`   |
//! | [`fallback`]| `solve_proportional`                                   |
//! | [`error`]   | `Error`, `Result`                                      |

mod error;
mod fallback;
mod milp;
mod trip;

pub use error::{Error, Result};
pub use fallback::solve_proportional;
pub use milp::{AssignedTrip, AssignmentResult, SolveStatus, VehicleAssigner};
pub use trip::{split_trips, Trip};
