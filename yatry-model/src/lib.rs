//! `yatry-model` — the atlas and passenger types shared by every pipeline
//! stage.
//!
//! | Module       | Contents                                    |
//! |--------------|----------------------------------------------|
//! | [`location`] | `LocationId`, `PassengerId` typed arena ids   |
//! | [`graph`]    | `MapGraph`, `Route`                           |
//! | [`passenger`]| `Passenger`, `TimeWindow`                     |
//! | [`error`]    | `Error`, `Result`                             |

mod error;
mod graph;
mod location;
mod passenger;

pub use error::{Error, Result};
pub use graph::{MapGraph, Route};
pub use location::{LocationId, PassengerId};
pub use passenger::{Passenger, TimeWindow};
