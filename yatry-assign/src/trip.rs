use crate::error::{Error, Result};

/// A passenger-count demand between two stops on the shared linear route
/// that the cluster has agreed to ride together (`spec.md` §4.5).
///
/// `group` identifies which original (pre-split) trip a split trip came
/// from, so fares can later be re-aggregated proportionally (§4.5
/// "Result extraction").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    pub group: usize,
    pub count: u32,
    pub pickup: usize,
    pub drop: usize,
}

impl Trip {
    pub fn new(group: usize, count: u32, pickup: usize, drop: usize) -> Result<Trip> {
        if pickup >= drop {
            return Err(Error::InvalidStops { pickup, drop });
        }
        Ok(Trip {
            group,
            count,
            pickup,
            drop,
        })
    }

    /// Segments `[pickup, drop)` this trip occupies a seat on.
    pub fn segments(&self) -> std::ops::Range<usize> {
        self.pickup..self.drop
    }
}

/// Splits every trip whose count exceeds `capacity` into `count / capacity`
/// full trips plus one remainder trip, per `spec.md` §4.5's pre-processing
/// step. Group identity and stops are preserved across a split so fares
/// can be re-apportioned to the original trip afterwards.
pub fn split_trips(trips: &[Trip], capacity: u32) -> Result<Vec<Trip>> {
    if capacity == 0 {
        return Err(Error::NonPositiveCapacity(0));
    }
    let mut out = Vec::new();
    for trip in trips {
        let full = trip.count / capacity;
        let remainder = trip.count % capacity;
        for _ in 0..full {
            out.push(Trip {
                group: trip.group,
                count: capacity,
                pickup: trip.pickup,
                drop: trip.drop,
            });
        }
        if remainder > 0 {
            out.push(Trip {
                group: trip.group,
                count: remainder,
                pickup: trip.pickup,
                drop: trip.drop,
            });
        }
    }
    Ok(out)
}
