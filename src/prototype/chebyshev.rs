use num_complex::Complex;

use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::RootError;

const EPSILON_MIN: f64 = 0.00001;
const EPSILON_MAX: f64 = 0.996;

/// Equiripple pass band (Chebyshev type I).
///
/// Poles lie on an ellipse whose shape is set by the ripple:
/// `σ = −sinh(a)·sin θ`, `ω = cosh(a)·cos θ` with `a = asinh(1/ε) / N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl PoleZeroGenerator for Chebyshev {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let n = params.poles;
        let epsilon = (10f64.powf(params.ripple_db / 10.0) - 1.0)
            .sqrt()
            .clamp(EPSILON_MIN, EPSILON_MAX);
        let arg = (1.0 / epsilon).asinh() / n as f64;
        let (sinh, cosh) = (arg.sinh(), arg.cosh());

        let mut poles = Vec::with_capacity(n);
        for j in 0..n / 2 {
            let theta = (2 * j + 1) as f64 * core::f64::consts::FRAC_PI_2 / n as f64;
            let sigma = -sinh * theta.sin();
            let omega = cosh * theta.cos();
            poles.push(Complex::new(sigma, omega));
            poles.push(Complex::new(sigma, -omega));
        }
        if n % 2 == 1 {
            poles.push(Complex::new(-sinh, 0.0));
        }
        Ok(RootSet::all_pole(poles))
    }
}
