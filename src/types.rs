use nalgebra::DVector;
use serde::Serialize;

/// Terminal state of a correlation solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FitStatus {
    /// Relative step dropped below the configured tolerance.
    Converged,
    /// The iteration cap was reached first; the returned displacement is
    /// the best available, not a converged one.
    MaxIterationsReached,
}

/// Per-iteration diagnostics kept in the fit trace.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    /// Weighted squared mismatch Σ w·r² at the start of the iteration.
    pub cost: f64,
    /// Norm of the displacement increment ‖dU‖.
    pub step_norm: f64,
    /// ‖dU‖/‖U‖; absent while ‖U‖ is below the absolute floor.
    pub rel_step: Option<f64>,
}

/// Outcome of a correlation solve.
#[derive(Clone, Debug, Serialize)]
pub struct FitResult {
    /// Fitted control-point displacement, stacked x then y.
    pub displacement: DVector<f64>,
    pub status: FitStatus,
    /// Number of Gauss–Newton iterations performed.
    pub iterations: usize,
    /// One record per iteration, in order.
    pub trace: Vec<IterationRecord>,
}

impl FitResult {
    /// True when the solve met the tolerance within the cap.
    pub fn converged(&self) -> bool {
        self.status == FitStatus::Converged
    }
}
