//! Per-sample gray-level mismatch and its gradient rows.
//!
//! The residual at sample s is `f(x_s + (J·U)_s) − g(γ_s)` with `f` the
//! image interpolator and `g` the virtual profile; its gradient w.r.t. U is
//! the image gradient chained through the two Jacobian rows of the sample.
//! Evaluation is pure and per-sample independent; with the `parallel`
//! feature it fans out over Rayon with an order-preserving collect, so the
//! result does not depend on the thread schedule.

use nalgebra::DVector;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use sprs::{CsMat, CsVecView};

use crate::error::FitError;
use crate::image::ImageInterp;
use crate::profile::VirtualProfile;

use super::grid::NeighborhoodGrid;

/// Sparse gradient row of one sample's residual w.r.t. U.
#[derive(Clone, Debug)]
pub struct SampleGrad {
    pub cols: Vec<usize>,
    pub vals: Vec<f64>,
}

/// Residual vector and per-sample gradient rows at one displacement.
#[derive(Clone, Debug)]
pub struct Mismatch {
    pub residual: Vec<f64>,
    pub grad: Vec<SampleGrad>,
}

/// Evaluate the mismatch at displacement `u`.
///
/// `base` holds the stacked undisplaced sample coordinates (x block then y
/// block); displaced positions are `base + J·u`. A sample leaving the image
/// domain surfaces [`FitError::OutOfDomain`] with its index.
pub fn evaluate(
    grid: &NeighborhoodGrid,
    jac: &CsMat<f64>,
    u: &DVector<f64>,
    base: &[f64],
    image: &dyn ImageInterp,
    profile: &dyn VirtualProfile,
    iteration: usize,
) -> Result<Mismatch, FitError> {
    let n = grid.n_samples();
    debug_assert_eq!(base.len(), 2 * n);

    let mut displaced = base.to_vec();
    sprs::prod::mul_acc_mat_vec_csr(jac.view(), u.as_slice(), &mut displaced[..]);

    let eval_one = |s: usize| -> Result<(f64, SampleGrad), FitError> {
        let (x, y) = (displaced[s], displaced[n + s]);
        let out_of_domain = || FitError::OutOfDomain {
            iteration,
            sample: s,
            x,
            y,
        };
        let f = image.intensity(x, y).ok_or_else(out_of_domain)?;
        let (fx, fy) = image.gradient(x, y).ok_or_else(out_of_domain)?;
        let r = f - profile.level(grid.offset_of(s));
        let row_x = jac.outer_view(s).expect("jacobian row");
        let row_y = jac.outer_view(n + s).expect("jacobian row");
        Ok((r, merged_row(row_x, fx, row_y, fy)))
    };

    #[cfg(feature = "parallel")]
    let rows: Result<Vec<_>, FitError> = (0..n).into_par_iter().map(eval_one).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Result<Vec<_>, FitError> = (0..n).map(eval_one).collect();

    let (residual, grad) = rows?.into_iter().unzip();
    Ok(Mismatch { residual, grad })
}

/// `fa·a + fb·b` for two sparse rows with sorted indices.
fn merged_row(a: CsVecView<f64>, fa: f64, b: CsVecView<f64>, fb: f64) -> SampleGrad {
    let (ai, av) = (a.indices(), a.data());
    let (bi, bv) = (b.indices(), b.data());
    let mut cols = Vec::with_capacity(ai.len().max(bi.len()));
    let mut vals = Vec::with_capacity(cols.capacity());
    let (mut i, mut j) = (0, 0);
    while i < ai.len() || j < bi.len() {
        let ca = ai.get(i).copied().unwrap_or(usize::MAX);
        let cb = bi.get(j).copied().unwrap_or(usize::MAX);
        if ca < cb {
            cols.push(ca);
            vals.push(fa * av[i]);
            i += 1;
        } else if cb < ca {
            cols.push(cb);
            vals.push(fb * bv[j]);
            j += 1;
        } else {
            cols.push(ca);
            vals.push(fa * av[i] + fb * bv[j]);
            i += 1;
            j += 1;
        }
    }
    SampleGrad { cols, vals }
}
