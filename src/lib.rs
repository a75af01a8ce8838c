#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod error;
pub mod fit;
pub mod image;
pub mod params;
pub mod profile;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod curve;
pub mod spline;

// --- High-level re-exports -------------------------------------------------

// Main entry points: correlator + results.
pub use crate::error::FitError;
pub use crate::fit::Correlator;
pub use crate::params::FitParams;
pub use crate::types::{FitResult, FitStatus, IterationRecord};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{Bilinear, ImageF32, ImageInterp};
    pub use crate::profile::{StepProfile, VirtualProfile};
    pub use crate::spline::CurveBasis;
    pub use crate::{Correlator, FitParams, FitResult, FitStatus};
}
