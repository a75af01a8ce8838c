//! The Gauss–Newton correlation driver.
//!
//! [`Correlator`] owns the reference configuration and the fit constants;
//! [`Correlator::fit`] runs the damped Gauss–Newton loop against an image
//! and a virtual profile. Per iteration it re-evaluates the sampling
//! geometry and Jacobian from the *reference* configuration (the
//! linearization point never moves to X + U; see [`crate::fit::jacobian`]),
//! evaluates the mismatch at the accumulated displacement, accumulates the
//! normal equations, adds the bending regularization and solves for the
//! next increment.
//!
//! Submodules, leaf-first:
//! - [`grid`] — the static (ξ, γ) sampling grid and weights,
//! - [`jacobian`] — sparse neighborhood Jacobian assembly,
//! - [`residual`] — per-sample mismatch and gradient rows,
//! - [`accumulate`] — Gauss–Newton gradient/Hessian integration,
//! - [`stiffness`] — thin-beam bending regularization,
//! - [`linear`] — the sparse LDLᵀ solve.

pub mod accumulate;
pub mod grid;
pub mod jacobian;
pub mod linear;
pub mod residual;
pub mod stiffness;

use log::{debug, info, warn};
use nalgebra::DVector;

use crate::curve::evaluate_frames;
use crate::error::FitError;
use crate::image::ImageInterp;
use crate::params::FitParams;
use crate::profile::VirtualProfile;
use crate::spline::CurveBasis;
use crate::types::{FitResult, FitStatus, IterationRecord};

pub use grid::NeighborhoodGrid;

/// Registers a curve against an image by virtual image correlation.
///
/// The reference control configuration is immutable for the lifetime of the
/// correlator; [`fit`](Correlator::fit) solves for the control-point
/// displacement that makes the gray levels sampled across the normal band
/// match the virtual profile.
pub struct Correlator {
    basis: CurveBasis,
    ctrl_ref: DVector<f64>,
    params: FitParams,
}

impl Correlator {
    /// Bind a basis, a reference control vector (stacked x then y) and the
    /// fit constants.
    pub fn new(
        basis: CurveBasis,
        ctrl_ref: DVector<f64>,
        params: FitParams,
    ) -> Result<Self, FitError> {
        params.validate().map_err(FitError::InvalidInput)?;
        if ctrl_ref.len() != 2 * basis.n_bf() {
            return Err(FitError::InvalidInput(format!(
                "control vector has {} entries, basis expects {}",
                ctrl_ref.len(),
                2 * basis.n_bf()
            )));
        }
        Ok(Self {
            basis,
            ctrl_ref,
            params,
        })
    }

    /// The curve basis this correlator evaluates on.
    pub fn basis(&self) -> &CurveBasis {
        &self.basis
    }

    /// The immutable reference control vector.
    pub fn reference(&self) -> &DVector<f64> {
        &self.ctrl_ref
    }

    /// Curve points of the displaced configuration `X + U` at `params`.
    pub fn curve_points(&self, u: &DVector<f64>, params: &[f64]) -> Vec<[f64; 2]> {
        let displaced = &self.ctrl_ref + u;
        self.basis.eval(&displaced, params, 0)
    }

    /// Run the Gauss–Newton loop to convergence or the iteration cap.
    ///
    /// Reaching the cap is reported through
    /// [`FitStatus::MaxIterationsReached`] with the best available
    /// displacement; hard failures (degenerate geometry, samples leaving
    /// the image, a singular system) surface as errors.
    pub fn fit(
        &self,
        image: &dyn ImageInterp,
        profile: &dyn VirtualProfile,
    ) -> Result<FitResult, FitError> {
        let grid = NeighborhoodGrid::new(&self.params);
        let frames_ref = evaluate_frames(&self.basis, &self.ctrl_ref, &grid.xi)?;
        let weights = grid.sample_weights(&frames_ref);
        let stiffness = stiffness::assemble(
            &self.basis,
            &self.ctrl_ref,
            self.params.stiffness_points_per_span,
        )?;
        let rho = self.params.regularization;
        let stiffness_scaled = stiffness.map(|&v| v * rho);

        let n_dof = 2 * self.basis.n_bf();
        let mut u = DVector::zeros(n_dof);
        let mut trace = Vec::new();

        for iteration in 0..self.params.max_iters {
            // Geometry and Jacobian come from the fixed reference every
            // iteration; the accumulated displacement enters only through
            // the residual.
            let frames = evaluate_frames(&self.basis, &self.ctrl_ref, &grid.xi)?;
            let jac = jacobian::assemble(&self.basis, &grid, &frames);
            let base = grid.stacked_positions(&frames);

            let mismatch =
                residual::evaluate(&grid, &jac, &u, &base, image, profile, iteration)?;
            let ne = accumulate::accumulate(&mismatch, &weights, n_dof);

            let a = &ne.hessian + &stiffness_scaled;
            let mut ku = vec![0.0; n_dof];
            sprs::prod::mul_acc_mat_vec_csr(stiffness.view(), u.as_slice(), &mut ku);
            let b: Vec<f64> = (0..n_dof)
                .map(|i| -ne.gradient[i] - rho * ku[i])
                .collect();

            let du = linear::solve_spd(&a, &b, iteration)?;
            let step_norm = du.iter().map(|v| v * v).sum::<f64>().sqrt();
            for (ui, di) in u.iter_mut().zip(&du) {
                *ui += di;
            }
            let u_norm = u.norm();

            // While ‖U‖ is still negligible the relative step is undefined;
            // fall back to an absolute gate on ‖dU‖ instead of dividing.
            let rel_step = (u_norm > self.params.step_abs_floor).then(|| step_norm / u_norm);
            trace.push(IterationRecord {
                iteration,
                cost: ne.cost,
                step_norm,
                rel_step,
            });
            debug!(
                "iter {iteration}: cost {:.6e}, |dU| {:.3e}, |U| {:.3e}",
                ne.cost, step_norm, u_norm
            );

            let converged = match rel_step {
                Some(r) => r < self.params.tol,
                None => step_norm < self.params.step_abs_floor,
            };
            if converged {
                info!(
                    "converged after {} iterations (|dU|/|U| < {:.1e})",
                    iteration + 1,
                    self.params.tol
                );
                return Ok(FitResult {
                    displacement: u,
                    status: FitStatus::Converged,
                    iterations: iteration + 1,
                    trace,
                });
            }
        }

        warn!(
            "iteration cap {} reached without meeting tolerance {:.1e}",
            self.params.max_iters, self.params.tol
        );
        Ok(FitResult {
            displacement: u,
            status: FitStatus::MaxIterationsReached,
            iterations: self.params.max_iters,
            trace,
        })
    }
}
