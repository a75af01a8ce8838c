//! Clamped B-spline basis evaluation and quadrature-node generation.
//!
//! The correlation core consumes the basis through three operations: sparse
//! basis rows `N(ξ)`, `N'(ξ)`, `N''(ξ)` at arbitrary parameters, curve
//! evaluation on a stacked control vector, and quadrature schemes over the
//! parametric domain (an exact Gauss–Legendre scheme per knot span for
//! stiffness assembly, a uniform midpoint scheme for the correlation grid).

mod basis;
pub mod quadrature;

pub use basis::CurveBasis;
