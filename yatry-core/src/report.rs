use yatry_assign::SolveStatus;

/// Per-group MILP outcome, threaded back to the caller as a diagnostic
/// (`SPEC_FULL.md` §9.1) rather than folded into the assignment itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSolveReport {
    pub group: usize,
    pub status: SolveStatus,
}

impl VehicleSolveReport {
    /// `true` when the solver returned a best-known incumbent under a
    /// deadline rather than a proof of optimality.
    pub fn approximate(&self) -> bool {
        matches!(self.status, SolveStatus::Approximate)
    }
}

/// Diagnostics accompanying a [`crate::PipelineOutput`]: how many
/// message-passing rounds clustering took, whether it converged or fell
/// back to the degenerate single-exemplar outcome, and the solver status
/// of every group's vehicle assignment. Mirrors the running log the
/// original Python prototype's `utils/pipeline.py` threaded back to its
/// caller for inspection (see `SPEC_FULL.md` §9.1); none of it changes the
/// shape of `PipelineOutput` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub cluster_iterations: usize,
    pub cluster_converged: bool,
    pub cluster_degenerate: bool,
    pub vehicle_reports: Vec<VehicleSolveReport>,
}
