use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Error, Result};

/// Default tail-mass parameter used when a caller does not override it.
pub const DEFAULT_M_RANGE: f64 = 0.8;

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::Normal(e.to_string()))
}

/// A passenger's preferred departure interval recast as a normal
/// distribution `(mu, sigma)`, per `spec.md` §4.2: `mu` is the window's
/// midpoint and `sigma` is chosen so that exactly `m_range` of the mass
/// falls inside `[t_min, t_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDistribution {
    mu: f64,
    sigma: f64,
    m_range: f64,
    t_min: f64,
    t_max: f64,
}

impl TimeDistribution {
    /// `spec.md` §4.2 `distribution(t_min, t_max, m_range) -> (mu, sigma)`.
    pub fn from_window(t_min: f64, t_max: f64, m_range: f64) -> Result<TimeDistribution> {
        if !(t_min < t_max) {
            return Err(Error::InvalidWindow(t_min, t_max));
        }
        if !(m_range > 0.0 && m_range < 1.0) {
            return Err(Error::InvalidMRange(m_range));
        }
        let mu = (t_min + t_max) / 2.0;
        let z = standard_normal()?.inverse_cdf((1.0 + m_range) / 2.0);
        let sigma = (t_max - t_min) / (2.0 * z);
        Ok(TimeDistribution {
            mu,
            sigma,
            m_range,
            t_min,
            t_max,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn m_range(&self) -> f64 {
        self.m_range
    }

    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// `temporal_affinity(i, j)`: the fraction of this distribution's mass
    /// that falls inside `[other_t_min, other_t_max]`, relative to
    /// `m_range`, clipped to `[0, 1]`.
    ///
    /// `spec.md` §4.2 writes the numerator as
    /// `Phi((t_j_min - mu_i)/sigma_i) - Phi((t_j_max - mu_i)/sigma_i)`, which
    /// is non-positive for every valid window and would always clip to `0`.
    /// The surrounding prose ("how much of passenger i's preference mass
    /// falls inside passenger j's window") and invariant 3
    /// (`tau[i,i] = 1`) both pin down the intended quantity as the
    /// probability mass of this distribution inside the other passenger's
    /// window, computed with the arguments in the opposite order; see
    /// `SPEC_FULL.md` §4.2 for the resolution this implements.
    pub fn temporal_affinity_toward(&self, other_t_min: f64, other_t_max: f64) -> Result<f64> {
        if !(other_t_min < other_t_max) {
            return Err(Error::InvalidWindow(other_t_min, other_t_max));
        }
        let normal = standard_normal()?;
        let upper = normal.cdf((other_t_max - self.mu) / self.sigma);
        let lower = normal.cdf((other_t_min - self.mu) / self.sigma);
        let mass = (upper - lower) / self.m_range;
        Ok(mass.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_affinity_is_one() {
        let dist = TimeDistribution::from_window(0.0, 3600.0, DEFAULT_M_RANGE).unwrap();
        let affinity = dist.temporal_affinity_toward(0.0, 3600.0).unwrap();
        assert!((affinity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn far_apart_windows_have_near_zero_affinity() {
        let dist = TimeDistribution::from_window(0.0, 600.0, DEFAULT_M_RANGE).unwrap();
        let affinity = dist.temporal_affinity_toward(7200.0, 7800.0).unwrap();
        assert!(affinity < 1e-6);
    }

    #[test]
    fn affinity_stays_in_unit_interval() {
        let dist = TimeDistribution::from_window(0.0, 1000.0, DEFAULT_M_RANGE).unwrap();
        for (lo, hi) in [(-5000.0, -4000.0), (0.0, 500.0), (500.0, 20000.0)] {
            let affinity = dist.temporal_affinity_toward(lo, hi).unwrap();
            assert!((0.0..=1.0).contains(&affinity));
        }
    }

    #[test]
    fn rejects_bad_m_range() {
        assert_eq!(
            TimeDistribution::from_window(0.0, 10.0, 1.0),
            Err(Error::InvalidMRange(1.0))
        );
        assert_eq!(
            TimeDistribution::from_window(0.0, 10.0, 0.0),
            Err(Error::InvalidMRange(0.0))
        );
    }
}
