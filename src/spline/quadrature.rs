//! Quadrature schemes over the parametric domain [0, 1].
//!
//! Two schemes are exposed, matching the two integration jobs in the
//! pipeline: a composite Gauss–Legendre rule laid out per knot span (exact
//! for the polynomial integrands of the stiffness operator) and a uniform
//! midpoint rule for the correlation sampling grid.

use super::CurveBasis;

/// Nodes and weights of an `n`-point Gauss–Legendre rule on [-1, 1].
///
/// Roots of the Legendre polynomial found by Newton iteration from the
/// Chebyshev initial guess; converges in a handful of steps for the small
/// orders used here.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    assert!(n >= 1, "quadrature order must be positive");
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    for i in 0..n {
        let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut dp = 0.0;
        for _ in 0..100 {
            let (p, d) = legendre(n, x);
            dp = d;
            let dx = p / d;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        nodes[i] = x;
        weights[i] = 2.0 / ((1.0 - x * x) * dp * dp);
    }
    nodes.reverse();
    weights.reverse();
    (nodes, weights)
}

/// Legendre polynomial P_n and its derivative at `x` (three-term recurrence).
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let d = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, d)
}

/// Composite Gauss–Legendre rule over the basis' knot spans.
///
/// Returns parameter nodes and weights whose sum equals the domain length
/// (1 for a clamped basis on [0, 1]).
pub fn gauss_legendre_spans(basis: &CurveBasis, points_per_span: usize) -> (Vec<f64>, Vec<f64>) {
    let (ref_nodes, ref_weights) = gauss_legendre(points_per_span);
    let spans = basis.spans();
    let mut nodes = Vec::with_capacity(spans.len() * points_per_span);
    let mut weights = Vec::with_capacity(spans.len() * points_per_span);
    for (a, b) in spans {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        for (&t, &w) in ref_nodes.iter().zip(&ref_weights) {
            nodes.push(mid + half * t);
            weights.push(half * w);
        }
    }
    (nodes, weights)
}

/// Uniform midpoint (Riemann) rule with `n` nodes on [0, 1].
pub fn uniform_midpoint(n: usize) -> (Vec<f64>, Vec<f64>) {
    assert!(n >= 1, "need at least one node");
    let w = 1.0 / n as f64;
    let nodes = (0..n).map(|i| (i as f64 + 0.5) * w).collect();
    (nodes, vec![w; n])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauss_legendre_integrates_cubics_exactly() {
        let (nodes, weights) = gauss_legendre(2);
        // 2-point rule is exact through degree 3.
        let quad = |f: &dyn Fn(f64) -> f64| -> f64 {
            nodes.iter().zip(&weights).map(|(&x, &w)| w * f(x)).sum()
        };
        assert!((quad(&|_| 1.0) - 2.0).abs() < 1e-12);
        assert!(quad(&|x| x).abs() < 1e-12);
        assert!((quad(&|x| x * x) - 2.0 / 3.0).abs() < 1e-12);
        assert!(quad(&|x| x * x * x).abs() < 1e-12);
    }

    #[test]
    fn span_rule_weights_cover_the_domain() {
        let basis = CurveBasis::clamped_uniform(10, 3);
        let (nodes, weights) = gauss_legendre_spans(&basis, 4);
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(nodes.iter().all(|&u| (0.0..=1.0).contains(&u)));
        assert!(nodes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn midpoint_rule_is_uniform() {
        let (nodes, weights) = uniform_midpoint(8);
        assert_eq!(nodes.len(), 8);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((nodes[0] - 0.0625).abs() < 1e-12);
        assert!((nodes[7] - 0.9375).abs() < 1e-12);
    }
}
