//! Sparse direct solve of the regularized normal equations.
//!
//! The system is symmetric and, when the problem is well posed, positive
//! definite. Factorization is LDLᵀ via `sprs-ldl` with reverse Cuthill-McKee
//! fill-in reduction; non-positive or non-finite pivots are reported as a
//! singular system rather than letting a garbage solution through.

use sprs::{CsMat, FillInReduction, SymmetryCheck};
use sprs_ldl::Ldl;

use crate::error::FitError;

/// Relative pivot floor: pivots below this fraction of the largest pivot
/// magnitude are treated as numerically zero.
const PIVOT_REL_EPS: f64 = 1e-12;

/// Solve `A·x = b` for a symmetric positive-definite sparse A.
pub fn solve_spd(a: &CsMat<f64>, b: &[f64], iteration: usize) -> Result<Vec<f64>, FitError> {
    let a_csc = a.to_csc();
    let ldl = Ldl::new()
        .fill_in_reduction(FillInReduction::ReverseCuthillMcKee)
        .check_symmetry(SymmetryCheck::DontCheckSymmetry)
        .numeric(a_csc.view())
        .map_err(|e| FitError::SingularSystem {
            iteration,
            reason: e.to_string(),
        })?;

    let pivot_scale = ldl
        .d()
        .iter()
        .fold(0.0f64, |acc, &d| acc.max(d.abs()))
        .max(f64::MIN_POSITIVE);
    for (i, &d) in ldl.d().iter().enumerate() {
        if !d.is_finite() || d <= PIVOT_REL_EPS * pivot_scale {
            return Err(FitError::SingularSystem {
                iteration,
                reason: format!("non-positive pivot {d:.3e} at index {i}"),
            });
        }
    }

    let x = ldl.solve(b);
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FitError::SingularSystem {
            iteration,
            reason: "non-finite solution component".into(),
        });
    }
    Ok(x)
}
