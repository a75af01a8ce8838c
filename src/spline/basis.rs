//! Clamped (open-uniform) B-spline basis of arbitrary degree.
//!
//! Basis functions and their derivatives are evaluated with the standard
//! Cox–de Boor recurrence (The NURBS Book, algorithms A2.1–A2.3). A row at
//! parameter `u` has exactly `degree + 1` nonzero entries starting at column
//! `span − degree`, which is what keeps the neighborhood Jacobian sparse.

use nalgebra::DVector;
use sprs::{CsMat, TriMat};

/// Clamped B-spline basis on the parameter domain [0, 1].
#[derive(Clone, Debug)]
pub struct CurveBasis {
    degree: usize,
    knots: Vec<f64>,
}

impl CurveBasis {
    /// Open-uniform knot vector for `n_ctrl` control points of `degree`.
    ///
    /// Panics if `n_ctrl <= degree` (no valid span would exist).
    pub fn clamped_uniform(n_ctrl: usize, degree: usize) -> Self {
        assert!(degree >= 1, "degree must be at least 1");
        assert!(
            n_ctrl > degree,
            "need more control points ({n_ctrl}) than the degree ({degree})"
        );
        let n_spans = n_ctrl - degree;
        let mut knots = Vec::with_capacity(n_ctrl + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        for i in 1..n_spans {
            knots.push(i as f64 / n_spans as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(degree + 1));
        Self { degree, knots }
    }

    /// Polynomial degree of the basis.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis functions (= number of control points).
    pub fn n_bf(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Non-degenerate knot intervals covering [0, 1].
    pub fn spans(&self) -> Vec<(f64, f64)> {
        self.knots
            .windows(2)
            .filter(|w| w[1] > w[0])
            .map(|w| (w[0], w[1]))
            .collect()
    }

    /// Index i such that knots[i] <= u < knots[i+1] (closed at u = 1).
    fn find_span(&self, u: f64) -> usize {
        let p = self.degree;
        let n = self.n_bf() - 1;
        if u >= self.knots[n + 1] {
            return n;
        }
        if u <= self.knots[p] {
            return p;
        }
        let mut lo = p;
        let mut hi = n + 1;
        let mut mid = (lo + hi) / 2;
        while u < self.knots[mid] || u >= self.knots[mid + 1] {
            if u < self.knots[mid] {
                hi = mid;
            } else {
                lo = mid;
            }
            mid = (lo + hi) / 2;
        }
        mid
    }

    /// All basis derivatives up to `n` at `u` within `span` (A2.3).
    ///
    /// Returns `ders[k][j]` = k-th derivative of basis function
    /// `span - degree + j`.
    fn ders_basis(&self, span: usize, u: f64, n: usize) -> Vec<Vec<f64>> {
        let p = self.degree;
        let k = &self.knots;
        let mut ndu = vec![vec![0.0f64; p + 1]; p + 1];
        let mut left = vec![0.0f64; p + 1];
        let mut right = vec![0.0f64; p + 1];
        ndu[0][0] = 1.0;
        for j in 1..=p {
            left[j] = u - k[span + 1 - j];
            right[j] = k[span + j] - u;
            let mut saved = 0.0;
            for r in 0..j {
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = ndu[r][j - 1] / ndu[j][r];
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut ders = vec![vec![0.0f64; p + 1]; n + 1];
        for j in 0..=p {
            ders[0][j] = ndu[j][p];
        }

        let mut a_prev = vec![0.0f64; p + 1];
        let mut a_curr = vec![0.0f64; p + 1];
        for r in 0..=p {
            a_prev.iter_mut().for_each(|v| *v = 0.0);
            a_prev[0] = 1.0;
            for kk in 1..=n {
                a_curr.iter_mut().for_each(|v| *v = 0.0);
                let mut d = 0.0;
                let rk = r as isize - kk as isize;
                let pk = p - kk;
                if r >= kk {
                    a_curr[0] = a_prev[0] / ndu[pk + 1][rk as usize];
                    d = a_curr[0] * ndu[rk as usize][pk];
                }
                let j1 = if rk >= -1 { 1usize } else { (-rk) as usize };
                let j2 = if r as isize - 1 <= pk as isize {
                    kk - 1
                } else {
                    p - r
                };
                for j in j1..=j2 {
                    a_curr[j] =
                        (a_prev[j] - a_prev[j - 1]) / ndu[pk + 1][(rk + j as isize) as usize];
                    d += a_curr[j] * ndu[(rk + j as isize) as usize][pk];
                }
                if r <= pk {
                    a_curr[kk] = -a_prev[kk - 1] / ndu[pk + 1][r];
                    d += a_curr[kk] * ndu[r][pk];
                }
                ders[kk][r] = d;
                std::mem::swap(&mut a_prev, &mut a_curr);
            }
        }

        let mut fac = p as f64;
        for (kk, row) in ders.iter_mut().enumerate().skip(1) {
            for v in row.iter_mut() {
                *v *= fac;
            }
            fac *= (p - kk) as f64;
        }
        ders
    }

    /// Sparse basis row at `u`: first nonzero column and the `degree + 1`
    /// values of the `order`-th derivative.
    ///
    /// Panics if `order > degree` (such derivatives vanish identically and
    /// asking for them is a caller bug).
    pub fn basis_row(&self, u: f64, order: usize) -> (usize, Vec<f64>) {
        assert!(
            order <= self.degree,
            "derivative order {order} exceeds degree {}",
            self.degree
        );
        let span = self.find_span(u);
        let mut ders = self.ders_basis(span, u, order);
        (span - self.degree, ders.swap_remove(order))
    }

    /// Sparse basis matrix, one row per parameter, shape
    /// `params.len() × n_bf`.
    pub fn basis_matrix(&self, params: &[f64], order: usize) -> CsMat<f64> {
        let mut tri = TriMat::new((params.len(), self.n_bf()));
        for (row, &u) in params.iter().enumerate() {
            let (first, vals) = self.basis_row(u, order);
            for (j, &v) in vals.iter().enumerate() {
                tri.add_triplet(row, first + j, v);
            }
        }
        tri.to_csr()
    }

    /// Evaluate the curve (or a derivative of it) on a stacked control
    /// vector, x coordinates first then y coordinates.
    pub fn eval(&self, ctrl: &DVector<f64>, params: &[f64], order: usize) -> Vec<[f64; 2]> {
        let nb = self.n_bf();
        assert_eq!(ctrl.len(), 2 * nb, "control vector length mismatch");
        params
            .iter()
            .map(|&u| {
                let (first, vals) = self.basis_row(u, order);
                let mut x = 0.0;
                let mut y = 0.0;
                for (j, &v) in vals.iter().enumerate() {
                    x += v * ctrl[first + j];
                    y += v * ctrl[nb + first + j];
                }
                [x, y]
            })
            .collect()
    }
}
