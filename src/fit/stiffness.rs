//! Thin-beam bending stiffness of the curve.
//!
//! Models the contour as an infinitely thin elastic beam: a displacement U
//! changes the curvature vector at ξ by `N''(ξ)U / ‖t(ξ)‖²` to first order,
//! and the assembled operator penalizes the integral of its squared norm:
//!
//! ```text
//! K = Σ_k w_k · α_kᵀ α_k,   α_k U = N''(ξ_k) U / ‖t(ξ_k)‖²
//! ```
//!
//! K is symmetric positive semi-definite and annihilates rigid translations
//! (the basis is a partition of unity, so N'' kills constant fields): only
//! deformation modes are penalized, the correlation term constrains rigid
//! motion. Assembled once per solve on the reference configuration, over a
//! per-span Gauss–Legendre rule — exact for the polynomial integrand,
//! unlike the uniform correlation grid.

use nalgebra::DVector;
use sprs::{CsMat, TriMat};

use crate::curve::evaluate_frames;
use crate::error::FitError;
use crate::spline::quadrature::gauss_legendre_spans;
use crate::spline::CurveBasis;

/// Assemble the bending stiffness on the reference configuration.
pub fn assemble(
    basis: &CurveBasis,
    ctrl_ref: &DVector<f64>,
    points_per_span: usize,
) -> Result<CsMat<f64>, FitError> {
    let nb = basis.n_bf();
    let (nodes, weights) = gauss_legendre_spans(basis, points_per_span);
    let frames = evaluate_frames(basis, ctrl_ref, &nodes)?;

    let mut tri = TriMat::new((2 * nb, 2 * nb));
    for (k, (&u, &w)) in nodes.iter().zip(&weights).enumerate() {
        let (first, n2) = basis.basis_row(u, 2);
        let s = frames.speed[k];
        let inv_s2 = 1.0 / (s * s);
        // The x and y components of the curvature perturbation decouple:
        // one α row per coordinate, both scaled by 1/‖t‖².
        for (a, &va) in n2.iter().enumerate() {
            let ca = first + a;
            let wa = w * va * inv_s2;
            for (b, &vb) in n2.iter().enumerate() {
                let cb = first + b;
                let v = wa * vb * inv_s2;
                tri.add_triplet(ca, cb, v);
                tri.add_triplet(nb + ca, nb + cb, v);
            }
        }
    }

    Ok(tri.to_csr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::circle_control_points;

    #[test]
    fn rigid_translation_is_in_the_null_space() {
        let basis = CurveBasis::clamped_uniform(13, 3);
        let ctrl = circle_control_points([80.0, 80.0], 40.0, 13);
        let k = assemble(&basis, &ctrl, 4).unwrap();

        let nb = basis.n_bf();
        let mut translation = DVector::zeros(2 * nb);
        for b in 0..nb {
            translation[b] = 7.0;
            translation[nb + b] = -3.0;
        }
        let mut out = vec![0.0; 2 * nb];
        sprs::prod::mul_acc_mat_vec_csr(k.view(), translation.as_slice(), &mut out);
        let scale: f64 = k.data().iter().map(|v| v.abs()).fold(0.0, f64::max);
        for (i, v) in out.iter().enumerate() {
            assert!(
                v.abs() < 1e-8 * scale.max(1e-30) * 10.0,
                "K·translation component {i} = {v}"
            );
        }
    }

    #[test]
    fn bending_a_straight_segment_costs_energy() {
        let basis = CurveBasis::clamped_uniform(8, 3);
        // A straight horizontal segment.
        let nb = basis.n_bf();
        let mut ctrl = DVector::zeros(2 * nb);
        for b in 0..nb {
            ctrl[b] = 10.0 + 10.0 * b as f64;
            ctrl[nb + b] = 50.0;
        }
        let k = assemble(&basis, &ctrl, 4).unwrap();

        // Push one interior control point sideways: nonzero bending energy.
        let mut u = DVector::zeros(2 * nb);
        u[nb + 3] = 1.0;
        let mut ku = vec![0.0; 2 * nb];
        sprs::prod::mul_acc_mat_vec_csr(k.view(), u.as_slice(), &mut ku);
        let energy: f64 = u.as_slice().iter().zip(&ku).map(|(a, b)| a * b).sum();
        assert!(energy > 0.0, "bending energy {energy} should be positive");
    }
}
