/// Tunables for [`crate::cluster`], per `spec.md` §4.4.
#[derive(Debug, Clone, Copy)]
pub struct ClusterConfig {
    pub damping: f64,
    pub max_iter: usize,
    pub conv_tol: f64,
    /// Percentile (`0..=100`) of the scaled similarity matrix used as the
    /// default preference, when `preference_override` is `None`.
    pub preference_percentile: f64,
    /// Pins the preference directly, bypassing the percentile rule.
    /// `SPEC_FULL.md` §9 extends the documented `preference` knob with this
    /// override since real callers routinely want to pin exemplar
    /// granularity directly.
    pub preference_override: Option<f64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            damping: 0.7,
            max_iter: 500,
            conv_tol: 1e-6,
            preference_percentile: 50.0,
            preference_override: None,
        }
    }
}
