//! Sparse Jacobian of the neighborhood samples w.r.t. control displacement.
//!
//! A control perturbation U moves the sample at (ξ, γ) by the curve-point
//! displacement `N(ξ)·U` plus the first-order effect of the normal frame
//! rotating with the tangent:
//!
//! ```text
//! J(ξ, γ) = N(ξ) − γ·(t/‖t‖)·Θ(ξ)ᵀ,   θ(U) = Θ·U = (R·t)·(N'(ξ)U) / ‖t‖²
//! ```
//!
//! Rows [0, pq) carry x-displacements, rows [pq, 2pq) y-displacements;
//! columns [0, n_bf) act on the x control block, [n_bf, 2n_bf) on y. Each
//! sample row has at most 2·(degree+1) nonzeros per coordinate, so the
//! matrix is assembled from coordinate triplets and compressed once.

use sprs::{CsMat, TriMat};

use crate::curve::CurveFrames;
use crate::spline::CurveBasis;

use super::grid::NeighborhoodGrid;

/// Assemble J on the given reference frames, shape (2pq) × (2·n_bf).
///
/// The frames must have been evaluated at `grid.xi` on the same reference
/// configuration the solve linearizes about.
pub fn assemble(basis: &CurveBasis, grid: &NeighborhoodGrid, frames: &CurveFrames) -> CsMat<f64> {
    let nb = basis.n_bf();
    let (p, q) = (grid.n_params(), grid.n_offsets());
    let n = p * q;
    let nnz_estimate = 4 * n * (basis.degree() + 1);
    let mut tri = TriMat::with_capacity((2 * n, 2 * nb), nnz_estimate);

    for i in 0..p {
        let u = grid.xi[i];
        let (first, n0) = basis.basis_row(u, 0);
        let (first1, n1) = basis.basis_row(u, 1);
        debug_assert_eq!(first, first1);

        let [tx, ty] = frames.tan[i];
        let s = frames.speed[i];
        let s3 = s * s * s;
        // Row coefficients of −γ·(t/‖t‖)·Θᵀ, with Θᵀ = (R t)ᵀ N' / ‖t‖².
        let cxx = tx * ty / s3;
        let cxy = -tx * tx / s3;
        let cyx = ty * ty / s3;
        let cyy = -ty * tx / s3;

        for (j, &g) in grid.gamma.iter().enumerate() {
            let row_x = i * q + j;
            let row_y = n + row_x;
            for (b, (&v0, &v1)) in n0.iter().zip(&n1).enumerate() {
                let col_x = first + b;
                let col_y = nb + col_x;
                tri.add_triplet(row_x, col_x, v0 + g * cxx * v1);
                tri.add_triplet(row_x, col_y, g * cxy * v1);
                tri.add_triplet(row_y, col_x, g * cyx * v1);
                tri.add_triplet(row_y, col_y, v0 + g * cyy * v1);
            }
        }
    }

    tri.to_csr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{circle_control_points, evaluate_frames};
    use crate::params::FitParams;
    use nalgebra::DVector;

    #[test]
    fn translation_moves_every_sample_rigidly() {
        // A rigid translation leaves the frame unrotated: J·U must equal
        // the same (dx, dy) at every sample.
        let basis = CurveBasis::clamped_uniform(9, 3);
        let ctrl = circle_control_points([50.0, 50.0], 25.0, 9);
        let params = FitParams {
            n_params: 10,
            n_offsets: 5,
            band_halfwidth: 6.0,
            ..FitParams::default()
        };
        let grid = NeighborhoodGrid::new(&params);
        let frames = evaluate_frames(&basis, &ctrl, &grid.xi).unwrap();
        let jac = assemble(&basis, &grid, &frames);

        let nb = basis.n_bf();
        let mut u = DVector::zeros(2 * nb);
        for b in 0..nb {
            u[b] = 1.5;
            u[nb + b] = -0.75;
        }
        let mut moved = vec![0.0; 2 * grid.n_samples()];
        sprs::prod::mul_acc_mat_vec_csr(jac.view(), u.as_slice(), &mut moved);
        let n = grid.n_samples();
        for s in 0..n {
            assert!((moved[s] - 1.5).abs() < 1e-10, "x at {s}: {}", moved[s]);
            assert!((moved[n + s] + 0.75).abs() < 1e-10, "y at {s}: {}", moved[n + s]);
        }
    }

    #[test]
    fn zero_offset_rows_reduce_to_the_basis() {
        let basis = CurveBasis::clamped_uniform(9, 3);
        let ctrl = circle_control_points([50.0, 50.0], 25.0, 9);
        let params = FitParams {
            n_params: 8,
            n_offsets: 5,
            band_halfwidth: 6.0,
            ..FitParams::default()
        };
        let grid = NeighborhoodGrid::new(&params);
        let frames = evaluate_frames(&basis, &ctrl, &grid.xi).unwrap();
        let jac = assemble(&basis, &grid, &frames);

        let nb = basis.n_bf();
        let q = grid.n_offsets();
        for i in 0..grid.n_params() {
            let (first, n0) = basis.basis_row(grid.xi[i], 0);
            let row = jac.outer_view(i * q + 2).unwrap(); // γ = 0
            for (b, &v0) in n0.iter().enumerate() {
                let got = row.get(first + b).copied().unwrap_or(0.0);
                assert!((got - v0).abs() < 1e-12);
                // No cross-coupling into the y block at zero offset.
                let cross = row.get(nb + first + b).copied().unwrap_or(0.0);
                assert!(cross.abs() < 1e-12);
            }
        }
    }
}
