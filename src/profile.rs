//! Target gray-level profiles across the normal band.
//!
//! The profile prescribes, as a function of the signed normal offset γ only,
//! the gray level the fitted contour should see. It is deterministic and
//! stateless; swapping in a different monotone or smooth shape leaves the
//! rest of the pipeline untouched.

use serde::Deserialize;

/// Target gray level as a function of the signed normal offset.
///
/// Offsets follow the curve normal: for a counter-clockwise closed curve,
/// positive γ points into the enclosed region.
pub trait VirtualProfile: Sync {
    /// Target gray level at offset `gamma`.
    fn level(&self, gamma: f64) -> f64;
}

/// Two-level step: background outside (γ < 0), foreground at and inside
/// (γ ≥ 0) the contour.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct StepProfile {
    /// Gray level on the negative-offset side.
    pub background: f64,
    /// Gray level on the non-negative-offset side.
    pub foreground: f64,
}

impl VirtualProfile for StepProfile {
    fn level(&self, gamma: f64) -> f64 {
        if gamma < 0.0 {
            self.background
        } else {
            self.foreground
        }
    }
}

/// Step with a linear transition of total width `width` centered on the
/// contour. Useful when the physical edge is blurred over a few pixels.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RampProfile {
    pub background: f64,
    pub foreground: f64,
    /// Total transition width; must be positive.
    pub width: f64,
}

impl VirtualProfile for RampProfile {
    fn level(&self, gamma: f64) -> f64 {
        let half = 0.5 * self.width;
        if gamma <= -half {
            self.background
        } else if gamma >= half {
            self.foreground
        } else {
            let t = (gamma + half) / self.width;
            self.background + t * (self.foreground - self.background)
        }
    }
}
