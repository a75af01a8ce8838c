//! Sub-pixel intensity and analytic gradient lookups.
//!
//! Pixel (i, j) covers the unit cell centered at (i + 0.5, j + 0.5); the
//! valid domain of an interpolator is the full raster `[0, w] × [0, h]`.
//! Border cells extend their bilinear patch so the surface stays continuous
//! and differentiable up to the domain boundary.

use super::ImageF32;

/// Sub-pixel image access used by the correlation core.
///
/// `None` means the query point left the valid domain; the caller decides
/// how to surface that (the fit driver reports it with iteration and sample
/// context instead of clamping).
pub trait ImageInterp: Sync {
    /// Valid domain, `(width, height)` in pixel units.
    fn domain(&self) -> (f64, f64);

    /// Interpolated gray level at (x, y).
    fn intensity(&self, x: f64, y: f64) -> Option<f64>;

    /// Analytic (∂x, ∂y) gradient of the interpolated surface at (x, y).
    fn gradient(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Bilinear interpolation over an [`ImageF32`].
pub struct Bilinear<'a> {
    img: &'a ImageF32,
}

struct Cell {
    f00: f64,
    f10: f64,
    f01: f64,
    f11: f64,
    tx: f64,
    ty: f64,
}

impl<'a> Bilinear<'a> {
    /// Wrap an image; needs at least a 2×2 raster to define a patch.
    pub fn new(img: &'a ImageF32) -> Self {
        assert!(img.w >= 2 && img.h >= 2, "bilinear needs a 2x2 raster");
        Self { img }
    }

    fn cell(&self, x: f64, y: f64) -> Option<Cell> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (w, h) = (self.img.w, self.img.h);
        if x < 0.0 || y < 0.0 || x > w as f64 || y > h as f64 {
            return None;
        }
        // Pixel centers sit at half-integer coordinates.
        let u = x - 0.5;
        let v = y - 0.5;
        let i0 = (u.floor() as isize).clamp(0, w as isize - 2) as usize;
        let j0 = (v.floor() as isize).clamp(0, h as isize - 2) as usize;
        Some(Cell {
            f00: self.img.get(i0, j0) as f64,
            f10: self.img.get(i0 + 1, j0) as f64,
            f01: self.img.get(i0, j0 + 1) as f64,
            f11: self.img.get(i0 + 1, j0 + 1) as f64,
            tx: u - i0 as f64,
            ty: v - j0 as f64,
        })
    }
}

impl ImageInterp for Bilinear<'_> {
    fn domain(&self) -> (f64, f64) {
        (self.img.w as f64, self.img.h as f64)
    }

    fn intensity(&self, x: f64, y: f64) -> Option<f64> {
        let c = self.cell(x, y)?;
        let top = c.f00 * (1.0 - c.tx) + c.f10 * c.tx;
        let bot = c.f01 * (1.0 - c.tx) + c.f11 * c.tx;
        Some(top * (1.0 - c.ty) + bot * c.ty)
    }

    fn gradient(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let c = self.cell(x, y)?;
        let gx = (c.f10 - c.f00) * (1.0 - c.ty) + (c.f11 - c.f01) * c.ty;
        let gy = (c.f01 - c.f00) * (1.0 - c.tx) + (c.f11 - c.f10) * c.tx;
        Some((gx, gy))
    }
}
