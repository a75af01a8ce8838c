//! Quadrature-weighted assembly of the Gauss–Newton normal equations.
//!
//! The Hessian here is the Gauss approximation `Σ w·∇rᵀ∇r`: second-order
//! residual curvature is dropped, which is accurate near convergence where
//! the residual is small. Both the gradient and the Hessian are integrals
//! over the sampling grid, so every term carries the sample's quadrature
//! weight.

use nalgebra::DVector;
use sprs::{CsMat, TriMat};

use super::residual::Mismatch;

/// Accumulated Gauss–Newton system for one iteration.
#[derive(Clone, Debug)]
pub struct NormalEquations {
    /// Gauss–Newton gradient `Σ w·r·∇r`, length 2·n_bf.
    pub gradient: DVector<f64>,
    /// Gauss Hessian approximation `Σ w·∇rᵀ∇r`, symmetric sparse.
    pub hessian: CsMat<f64>,
    /// Weighted squared mismatch `Σ w·r²` (for the iteration trace).
    pub cost: f64,
}

/// Integrate the per-sample mismatch into gradient, Hessian and cost.
pub fn accumulate(mismatch: &Mismatch, weights: &[f64], n_dof: usize) -> NormalEquations {
    debug_assert_eq!(mismatch.residual.len(), weights.len());

    let mut gradient = DVector::zeros(n_dof);
    let mut cost = 0.0;
    // Each gradient row has a handful of nonzeros; the outer products stay
    // within the basis-support band, so triplets + one compression beat any
    // dense intermediate.
    let mut tri = TriMat::new((n_dof, n_dof));

    for ((r, row), &w) in mismatch
        .residual
        .iter()
        .zip(&mismatch.grad)
        .zip(weights)
    {
        cost += w * r * r;
        let wr = w * r;
        for (a, (&ca, &va)) in row.cols.iter().zip(&row.vals).enumerate() {
            gradient[ca] += wr * va;
            let wa = w * va;
            for (&cb, &vb) in row.cols.iter().zip(&row.vals).skip(a) {
                tri.add_triplet(ca, cb, wa * vb);
                if cb != ca {
                    tri.add_triplet(cb, ca, wa * vb);
                }
            }
        }
    }

    NormalEquations {
        gradient,
        hessian: tri.to_csr(),
        cost,
    }
}
