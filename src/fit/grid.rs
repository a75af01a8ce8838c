//! The (ξ, γ) normal-neighborhood sampling grid.
//!
//! Built once per solve and reused across iterations: only the geometry it
//! is applied to is re-evaluated. Samples are ordered with γ varying fastest
//! within each ξ, and stacked coordinates put all x values before all y
//! values, matching the block layout of the neighborhood Jacobian.

use crate::curve::CurveFrames;
use crate::params::FitParams;
use crate::spline::quadrature::uniform_midpoint;

/// Static product grid of curve parameters and normal offsets.
#[derive(Clone, Debug)]
pub struct NeighborhoodGrid {
    /// Parameter nodes ξ in [0, 1] (uniform midpoint rule).
    pub xi: Vec<f64>,
    /// Parameter-space integration weight per ξ node.
    pub wxi: Vec<f64>,
    /// Offset nodes γ in [-h, h], inclusive and uniform.
    pub gamma: Vec<f64>,
    /// Offset-space integration weight (uniform spacing).
    pub wgamma: f64,
}

impl NeighborhoodGrid {
    /// Build the grid from the configured sample counts and band width.
    pub fn new(params: &FitParams) -> Self {
        let (xi, wxi) = uniform_midpoint(params.n_params);
        let q = params.n_offsets;
        let h = params.band_halfwidth;
        let step = 2.0 * h / (q - 1) as f64;
        let gamma = (0..q).map(|j| -h + j as f64 * step).collect();
        Self {
            xi,
            wxi,
            gamma,
            wgamma: step,
        }
    }

    /// Number of parameter samples p.
    pub fn n_params(&self) -> usize {
        self.xi.len()
    }

    /// Number of offset samples q.
    pub fn n_offsets(&self) -> usize {
        self.gamma.len()
    }

    /// Total sample count p·q.
    pub fn n_samples(&self) -> usize {
        self.xi.len() * self.gamma.len()
    }

    /// Offset γ of flat sample index `s` (γ varies fastest).
    #[inline]
    pub fn offset_of(&self, s: usize) -> f64 {
        self.gamma[s % self.gamma.len()]
    }

    /// Physical sample coordinates on the given frames, stacked as all x
    /// then all y: `position(ξ) + γ·normal(ξ)`.
    pub fn stacked_positions(&self, frames: &CurveFrames) -> Vec<f64> {
        let (p, q) = (self.n_params(), self.n_offsets());
        let n = p * q;
        let mut coords = vec![0.0; 2 * n];
        for i in 0..p {
            let pos = frames.pos[i];
            let nrm = frames.normal[i];
            for (j, &g) in self.gamma.iter().enumerate() {
                let s = i * q + j;
                coords[s] = pos[0] + g * nrm[0];
                coords[n + s] = pos[1] + g * nrm[1];
            }
        }
        coords
    }

    /// Per-sample quadrature weights on the given frames:
    /// `w = (wξ / ‖t‖) · wγ`. Static for the lifetime of a solve since the
    /// frames come from the fixed reference configuration.
    pub fn sample_weights(&self, frames: &CurveFrames) -> Vec<f64> {
        let q = self.n_offsets();
        let mut w = Vec::with_capacity(self.n_samples());
        for (i, &wx) in self.wxi.iter().enumerate() {
            let wi = wx / frames.speed[i] * self.wgamma;
            w.extend(std::iter::repeat(wi).take(q));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{circle_control_points, evaluate_frames};
    use crate::spline::CurveBasis;

    fn grid_params(n_params: usize, n_offsets: usize, h: f64) -> FitParams {
        FitParams {
            band_halfwidth: h,
            n_params,
            n_offsets,
            ..FitParams::default()
        }
    }

    #[test]
    fn offsets_span_the_band_inclusively() {
        let grid = NeighborhoodGrid::new(&grid_params(16, 5, 10.0));
        assert_eq!(grid.gamma, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert_eq!(grid.wgamma, 5.0);
    }

    #[test]
    fn zero_offset_samples_lie_on_the_curve() {
        let basis = CurveBasis::clamped_uniform(9, 3);
        let ctrl = circle_control_points([60.0, 60.0], 30.0, 9);
        let grid = NeighborhoodGrid::new(&grid_params(12, 5, 8.0));
        let frames = evaluate_frames(&basis, &ctrl, &grid.xi).unwrap();
        let coords = grid.stacked_positions(&frames);
        let n = grid.n_samples();
        let q = grid.n_offsets();
        for i in 0..grid.n_params() {
            let s = i * q + 2; // γ = 0 row
            assert!((coords[s] - frames.pos[i][0]).abs() < 1e-12);
            assert!((coords[n + s] - frames.pos[i][1]).abs() < 1e-12);
        }
    }

    #[test]
    fn weights_scale_with_inverse_speed() {
        let basis = CurveBasis::clamped_uniform(9, 3);
        let ctrl = circle_control_points([60.0, 60.0], 30.0, 9);
        let grid = NeighborhoodGrid::new(&grid_params(12, 5, 8.0));
        let frames = evaluate_frames(&basis, &ctrl, &grid.xi).unwrap();
        let w = grid.sample_weights(&frames);
        assert_eq!(w.len(), grid.n_samples());
        for (i, &speed) in frames.speed.iter().enumerate() {
            let expect = grid.wxi[i] / speed * grid.wgamma;
            for j in 0..grid.n_offsets() {
                assert!((w[i * grid.n_offsets() + j] - expect).abs() < 1e-15);
            }
        }
    }
}
