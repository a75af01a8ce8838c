//! Parameters controlling the correlation fit.
//!
//! Defaults target contours of a few hundred pixels in images around
//! 256–1024 px. For tuning, start with the band half-width (it must cover
//! the initial contour error) and the regularization weight.

use serde::Deserialize;

/// Configuration constants consumed by the Gauss–Newton driver.
#[derive(Clone, Debug, Deserialize)]
pub struct FitParams {
    /// Half-width h (px) of the normal search band; offsets span [-h, h].
    pub band_halfwidth: f64,
    /// Number of parameter samples ξ along the curve.
    pub n_params: usize,
    /// Number of offset samples γ across the band (odd values place a
    /// sample exactly on the curve).
    pub n_offsets: usize,
    /// Regularization weight ρ applied to the bending stiffness.
    pub regularization: f64,
    /// Relative-step convergence tolerance ε on ‖dU‖/‖U‖.
    pub tol: f64,
    /// Absolute step floor; also the fallback convergence gate while ‖U‖
    /// is still too small for the relative test.
    pub step_abs_floor: f64,
    /// Iteration cap for the Gauss–Newton loop.
    pub max_iters: usize,
    /// Gauss–Legendre points per knot span for the stiffness assembly.
    pub stiffness_points_per_span: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            band_halfwidth: 20.0,
            n_params: 128,
            n_offsets: 41,
            regularization: 1e4,
            tol: 5e-3,
            step_abs_floor: 1e-9,
            max_iters: 100,
            stiffness_points_per_span: 4,
        }
    }
}

impl FitParams {
    /// Basic sanity of the numeric knobs; returns a message for the first
    /// violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.band_halfwidth > 0.0) {
            return Err("band_halfwidth must be positive".into());
        }
        if self.n_params < 2 || self.n_offsets < 2 {
            return Err("need at least 2 samples per grid dimension".into());
        }
        if !(self.regularization >= 0.0) {
            return Err("regularization must be non-negative".into());
        }
        if !(self.tol > 0.0) || !(self.step_abs_floor > 0.0) {
            return Err("tolerances must be positive".into());
        }
        if self.max_iters == 0 {
            return Err("max_iters must be positive".into());
        }
        if self.stiffness_points_per_span == 0 {
            return Err("stiffness_points_per_span must be positive".into());
        }
        Ok(())
    }
}
