//! Error taxonomy of the correlation core.
//!
//! Leaf helpers (basis rows, bilinear lookups) return `Option` where absence
//! is a normal outcome; the component boundaries promote those into the
//! structured variants below so a failed fit always reports which iteration
//! and which sample went wrong.

use thiserror::Error;

/// Fatal conditions raised by the correlation core.
///
/// Reaching the iteration cap is *not* an error: the driver reports it via
/// [`crate::FitStatus::MaxIterationsReached`] together with the best
/// available displacement.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FitError {
    /// The reference curve has a (near-)zero tangent at a parameter sample.
    /// The reference configuration itself is invalid; no retry.
    #[error("degenerate curve tangent at parameter sample {sample} (|t| = {norm:.3e})")]
    DegenerateGeometry { sample: usize, norm: f64 },

    /// A displaced sample left the image's valid interpolation domain.
    /// Typically indicates divergence; surfaced rather than clamped.
    #[error("sample {sample} displaced outside the image domain to ({x:.2}, {y:.2}) at iteration {iteration}")]
    OutOfDomain {
        iteration: usize,
        sample: usize,
        x: f64,
        y: f64,
    },

    /// The regularized normal-equations matrix is singular or indefinite.
    /// The caller may increase the regularization weight and retry; the
    /// core does not retry on its own.
    #[error("singular normal-equations system at iteration {iteration}: {reason}")]
    SingularSystem { iteration: usize, reason: String },

    /// Inconsistent dimensions in user-provided inputs.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
