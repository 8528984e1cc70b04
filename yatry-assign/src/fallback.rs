/// Proportional fare split, used only when the MILP solver is skipped in a
/// way that is not *capacity-exceeded* (`SPEC_FULL.md` §4.5). Each share is
/// `original_fare · worst_case_fare / Σ original_fare`.
pub fn solve_proportional(original_fares: &[f64], worst_case_fare: f64) -> Vec<f64> {
    let total: f64 = original_fares.iter().sum();
    if total <= 0.0 {
        return vec![0.0; original_fares.len()];
    }
    original_fares
        .iter()
        .map(|&fare| fare * worst_case_fare / total)
        .collect()
}
