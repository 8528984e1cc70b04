use std::time::Duration;

use yatry_time::BracketPolicy;

/// The configuration record a driver program hands to [`crate::Pipeline`],
/// per `spec.md` §6's recognised option set, extended with the
/// `SPEC_FULL.md` §9 supplements (`preference_override`, `bracket_policy`,
/// `parallel`).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Tail-mass parameter for [`yatry_time::TimeDistribution`], `(0, 1)`.
    pub m_range: f64,
    /// Affinity-propagation damping, `[0.5, 1)`.
    pub damping: f64,
    /// Affinity-propagation iteration cap.
    pub max_iter: usize,
    /// Affinity-propagation convergence tolerance.
    pub conv_tol: f64,
    /// Vehicle seating capacity, positive.
    pub capacity: u32,
    /// Percentile of the scaled affinity matrix used as the AP preference
    /// when `preference_override` is `None`.
    pub preference_percentile: f64,
    /// Pins the AP preference directly, bypassing the percentile rule.
    pub preference_override: Option<f64>,
    /// Wall-clock budget handed to the MILP solver per group; `None` runs
    /// to proven optimality.
    pub solver_deadline: Option<Duration>,
    /// Which bracket `DepartureOptimizer` searches (`spec.md` §4.6 /
    /// Open Questions §9).
    pub bracket_policy: BracketPolicy,
    /// Gates the rayon fan-out in affinity-matrix construction (`spec.md`
    /// §5); off by default to match "optional, behind a deterministic
    /// flag".
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            m_range: yatry_time::DEFAULT_M_RANGE,
            damping: 0.7,
            max_iter: 500,
            conv_tol: 1e-6,
            capacity: 5,
            preference_percentile: 50.0,
            preference_override: None,
            solver_deadline: None,
            bracket_policy: BracketPolicy::NarrowPrototype,
            parallel: false,
        }
    }
}
