//! `yatry-time` — Gaussian departure-preference modelling and the
//! golden-section departure-time search.
//!
//! | Module         | Contents                                  |
//! |----------------|--------------------------------------------|
//! | [`distribution`] | `TimeDistribution`, temporal affinity     |
//! | [`departure`]    | `DepartureOptimizer`, `BracketPolicy`     |
//! | [`error`]        | `Error`, `Result`                         |

mod departure;
mod distribution;
mod error;

pub use departure::{BracketPolicy, DepartureOptimizer};
pub use distribution::{TimeDistribution, DEFAULT_M_RANGE};
pub use error::{Error, Result};
