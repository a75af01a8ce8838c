use nalgebra::DVector;
use vicfit::curve::circle_control_points;
use vicfit::image::{Bilinear, ImageF32};
use vicfit::profile::StepProfile;
use vicfit::spline::CurveBasis;
use vicfit::{Correlator, FitParams};

fn main() {
    // Demo stub: renders a synthetic bright disc and fits a circle to its
    // contour starting from a wrong radius.
    let (w, h) = (256usize, 256usize);
    let center = [128.0f64, 128.0];
    let true_radius = 80.0f64;
    let image = ImageF32::from_fn(w, h, |x, y| {
        // 4x4 supersampled coverage of the disc per pixel.
        let mut hits = 0u32;
        for sy in 0..4 {
            for sx in 0..4 {
                let px = x as f64 + (sx as f64 + 0.5) / 4.0;
                let py = y as f64 + (sy as f64 + 0.5) / 4.0;
                let d = ((px - center[0]).powi(2) + (py - center[1]).powi(2)).sqrt();
                if d <= true_radius {
                    hits += 1;
                }
            }
        }
        10.0 + 200.0 * hits as f32 / 16.0
    });
    let interp = Bilinear::new(&image);

    let n_ctrl = 17;
    let basis = CurveBasis::clamped_uniform(n_ctrl, 3);
    let init: DVector<f64> = circle_control_points(center, true_radius + 5.0, n_ctrl);
    let profile = StepProfile {
        background: 10.0,
        foreground: 210.0,
    };

    let correlator =
        Correlator::new(basis, init, FitParams::default()).expect("valid configuration");
    match correlator.fit(&interp, &profile) {
        Ok(result) => {
            let xi: Vec<f64> = (0..64).map(|i| (i as f64 + 0.5) / 64.0).collect();
            let pts = correlator.curve_points(&result.displacement, &xi);
            let mean_radius = pts
                .iter()
                .map(|p| ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2)).sqrt())
                .sum::<f64>()
                / pts.len() as f64;
            println!(
                "converged={} iterations={} mean_radius={:.3} (true {:.1})",
                result.converged(),
                result.iterations,
                mean_radius,
                true_radius
            );
        }
        Err(e) => eprintln!("fit failed: {e}"),
    }
}
