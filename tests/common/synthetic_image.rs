//! Synthetic step-edge rasters used by the integration tests.
//!
//! All generators supersample 4×4 per pixel so the rendered edge carries a
//! roughly one-pixel anti-aliased transition, which keeps the bilinear
//! image gradient informative right at the contour.

use vicfit::image::ImageF32;

const SS: usize = 4;

fn coverage(mut inside: impl FnMut(f64, f64) -> bool, x: usize, y: usize) -> f64 {
    let mut hits = 0u32;
    for sy in 0..SS {
        for sx in 0..SS {
            let px = x as f64 + (sx as f64 + 0.5) / SS as f64;
            let py = y as f64 + (sy as f64 + 0.5) / SS as f64;
            if inside(px, py) {
                hits += 1;
            }
        }
    }
    hits as f64 / (SS * SS) as f64
}

/// Bright disc of `radius` around `center` on a dark background.
pub fn disc_f32(
    w: usize,
    h: usize,
    center: [f64; 2],
    radius: f64,
    background: f32,
    foreground: f32,
) -> ImageF32 {
    ImageF32::from_fn(w, h, |x, y| {
        let c = coverage(
            |px, py| {
                let dx = px - center[0];
                let dy = py - center[1];
                (dx * dx + dy * dy).sqrt() <= radius
            },
            x,
            y,
        );
        background + (foreground - background) * c as f32
    })
}

/// Polar description of a closed star-shaped contour around a center:
/// radius as a function of the polar angle, interpolated from a dense
/// sampling of the contour.
pub struct RadialEdge {
    center: [f64; 2],
    /// (θ, r) pairs sorted by θ over (-π, π].
    samples: Vec<(f64, f64)>,
}

impl RadialEdge {
    /// Build the polar table from densely sampled contour points. The
    /// contour must be star-shaped with respect to `center`.
    pub fn from_curve(points: &[[f64; 2]], center: [f64; 2]) -> Self {
        assert!(points.len() >= 16, "need a dense contour sampling");
        let mut samples: Vec<(f64, f64)> = points
            .iter()
            .map(|p| {
                let dx = p[0] - center[0];
                let dy = p[1] - center[1];
                (dy.atan2(dx), (dx * dx + dy * dy).sqrt())
            })
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        samples.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-12);
        Self { center, samples }
    }

    /// Contour radius at polar angle `theta`, with wrap-around.
    pub fn radius_at(&self, theta: f64) -> f64 {
        let n = self.samples.len();
        let idx = self.samples.partition_point(|&(t, _)| t < theta);
        let (t0, r0, t1, r1) = if idx == 0 || idx == n {
            // Between the last and first sample across the ±π seam.
            let (tl, rl) = self.samples[n - 1];
            let (tf, rf) = self.samples[0];
            (tl - 2.0 * std::f64::consts::PI, rl, tf, rf)
        } else {
            let (ta, ra) = self.samples[idx - 1];
            let (tb, rb) = self.samples[idx];
            (ta, ra, tb, rb)
        };
        let theta = if theta > t1 {
            theta - 2.0 * std::f64::consts::PI
        } else {
            theta
        };
        let span = (t1 - t0).max(1e-12);
        let t = ((theta - t0) / span).clamp(0.0, 1.0);
        r0 + t * (r1 - r0)
    }

    /// True when (x, y) lies inside the contour.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        let r = (dx * dx + dy * dy).sqrt();
        r <= self.radius_at(dy.atan2(dx))
    }
}

/// Bright region bounded by a star-shaped contour on a dark background.
pub fn region_f32(
    w: usize,
    h: usize,
    edge: &RadialEdge,
    background: f32,
    foreground: f32,
) -> ImageF32 {
    ImageF32::from_fn(w, h, |x, y| {
        let c = coverage(|px, py| edge.contains(px, py), x, y);
        background + (foreground - background) * c as f32
    })
}
