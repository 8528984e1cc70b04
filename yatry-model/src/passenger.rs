use crate::error::{Error, Result};
use crate::location::{LocationId, PassengerId};

/// A passenger's preferred departure interval `[t_min, t_max]`, in whatever
/// scalar time unit the caller uses consistently (seconds since some epoch,
/// minutes since midnight, ...). Invariant: `t_min < t_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    t_min: f64,
    t_max: f64,
}

impl TimeWindow {
    pub fn new(t_min: f64, t_max: f64) -> Result<TimeWindow> {
        if !(t_min < t_max) {
            return Err(Error::InvalidTimeWindow(t_min, t_max));
        }
        Ok(TimeWindow { t_min, t_max })
    }

    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }
}

/// An immutable passenger: an opaque identity plus origin, destination, and
/// preferred departure window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Passenger {
    id: PassengerId,
    origin: LocationId,
    destination: LocationId,
    window: TimeWindow,
}

impl Passenger {
    pub fn new(
        id: PassengerId,
        origin: LocationId,
        destination: LocationId,
        window: TimeWindow,
    ) -> Passenger {
        Passenger {
            id,
            origin,
            destination,
            window,
        }
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn origin(&self) -> LocationId {
        self.origin
    }

    pub fn destination(&self) -> LocationId {
        self.destination
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_window() {
        assert_eq!(
            TimeWindow::new(100.0, 100.0),
            Err(Error::InvalidTimeWindow(100.0, 100.0))
        );
        assert_eq!(
            TimeWindow::new(200.0, 100.0),
            Err(Error::InvalidTimeWindow(200.0, 100.0))
        );
    }
}
