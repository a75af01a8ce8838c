//! Curve frames: positions, tangents and normals at parameter samples.
//!
//! The normal is the tangent rotated by 90° and normalized,
//! `n = R·t/‖t‖` with `R = [[0,-1],[1,0]]`. A closed curve traversed
//! counter-clockwise therefore carries normals pointing into the enclosed
//! region. The tangent norm must stay strictly positive everywhere; a
//! vanishing tangent means the parametrization is degenerate and the whole
//! solve is rejected.

use nalgebra::DVector;

use crate::error::FitError;
use crate::spline::CurveBasis;

/// Tangent norms below this are treated as degenerate.
const TANGENT_EPS: f64 = 1e-9;

/// Position / tangent / normal fields evaluated at a set of parameters.
#[derive(Clone, Debug)]
pub struct CurveFrames {
    /// Curve position per parameter sample.
    pub pos: Vec<[f64; 2]>,
    /// Unnormalized tangent per parameter sample.
    pub tan: Vec<[f64; 2]>,
    /// Unit normal (90°-rotated normalized tangent) per parameter sample.
    pub normal: Vec<[f64; 2]>,
    /// Tangent norm per parameter sample (the local parametric speed).
    pub speed: Vec<f64>,
}

/// Evaluate position/tangent/normal frames on a control-point vector.
///
/// `ctrl` is the stacked layout: all x coordinates then all y coordinates.
/// Fails with [`FitError::DegenerateGeometry`] if the tangent vanishes at
/// any sample.
pub fn evaluate_frames(
    basis: &CurveBasis,
    ctrl: &DVector<f64>,
    params: &[f64],
) -> Result<CurveFrames, FitError> {
    let pos = basis.eval(ctrl, params, 0);
    let tan = basis.eval(ctrl, params, 1);

    let mut normal = Vec::with_capacity(params.len());
    let mut speed = Vec::with_capacity(params.len());
    for (sample, t) in tan.iter().enumerate() {
        let norm = (t[0] * t[0] + t[1] * t[1]).sqrt();
        if !norm.is_finite() || norm <= TANGENT_EPS {
            return Err(FitError::DegenerateGeometry { sample, norm });
        }
        // n = R t / |t| with R the 90° rotation [[0,-1],[1,0]].
        normal.push([-t[1] / norm, t[0] / norm]);
        speed.push(norm);
    }

    Ok(CurveFrames {
        pos,
        tan,
        normal,
        speed,
    })
}

/// Control points of a closed-loop curve tracing a circle counter-clockwise.
///
/// The first and last control points coincide so the clamped curve closes.
/// Returned in the stacked layout expected by the solver. Useful as an
/// initial configuration for roughly circular contours.
pub fn circle_control_points(center: [f64; 2], radius: f64, n_ctrl: usize) -> DVector<f64> {
    assert!(n_ctrl >= 4, "a closed loop needs at least 4 control points");
    let mut ctrl = DVector::zeros(2 * n_ctrl);
    for i in 0..n_ctrl {
        let phi = 2.0 * std::f64::consts::PI * i as f64 / (n_ctrl - 1) as f64;
        ctrl[i] = center[0] + radius * phi.cos();
        ctrl[n_ctrl + i] = center[1] + radius * phi.sin();
    }
    ctrl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_normals_point_inward() {
        let basis = CurveBasis::clamped_uniform(17, 3);
        let ctrl = circle_control_points([100.0, 100.0], 50.0, 17);
        let params: Vec<f64> = (0..20).map(|i| (i as f64 + 0.5) / 20.0).collect();
        let frames = evaluate_frames(&basis, &ctrl, &params).unwrap();
        for (p, n) in frames.pos.iter().zip(&frames.normal) {
            // Inward normal means it points from the curve toward the center.
            let to_center = [100.0 - p[0], 100.0 - p[1]];
            let dot = to_center[0] * n[0] + to_center[1] * n[1];
            assert!(dot > 0.0, "normal {n:?} at {p:?} does not point inward");
        }
    }

    #[test]
    fn coincident_control_points_are_degenerate() {
        let basis = CurveBasis::clamped_uniform(5, 3);
        // All control points identical: tangent vanishes everywhere.
        let mut ctrl = DVector::zeros(10);
        for i in 0..5 {
            ctrl[i] = 3.0;
            ctrl[5 + i] = 4.0;
        }
        let err = evaluate_frames(&basis, &ctrl, &[0.5]).unwrap_err();
        assert!(matches!(err, FitError::DegenerateGeometry { sample: 0, .. }));
    }
}
