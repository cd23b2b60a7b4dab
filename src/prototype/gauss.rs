use num_complex::Complex;

use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::{find_roots, reverse_monic, RootError};
use crate::special::factorial;

/// Imaginary-part stretch applied to Adjustable Gauss roots.
const ADJUSTABLE_IMAG_SCALE: f64 = 1.10;

/// Gaussian magnitude response.
///
/// Roots of the truncated series of `e^(s²)`, i.e. `Σ (−1)^k s^(2k) / k!`;
/// both half planes are returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gaussian;

/// Transitional family: gamma −1 is close to Gaussian, about −0.7 close to
/// Bessel, and 1 close to Butterworth.
///
/// The series coefficients become `(−1)^k·(k!)^γ`, with positive gamma
/// doubled, and the roots' imaginary parts are stretched by 10%.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustableGauss;

/// Ascending even-power series `Σ (−1)^k · weight(k) · s^(2k)`, `k = 0..=n`.
fn even_series(n: usize, weight: impl Fn(usize) -> f64) -> Vec<f64> {
    let mut coeffs = vec![0.0; 2 * n + 1];
    coeffs[0] = 1.0;
    for k in 1..=n {
        let c = weight(k);
        coeffs[2 * k] = if k % 2 == 1 { -c } else { c };
    }
    coeffs
}

impl PoleZeroGenerator for Gaussian {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let mut coeffs = even_series(params.poles, |k| 1.0 / factorial(k));
        reverse_monic(&mut coeffs);
        Ok(RootSet::all_pole(find_roots(&coeffs)?))
    }
}

impl PoleZeroGenerator for AdjustableGauss {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let gamma = if params.gamma > 0.0 {
            params.gamma * 2.0
        } else {
            params.gamma
        };
        let mut coeffs = even_series(params.poles, |k| factorial(k).powf(gamma));
        reverse_monic(&mut coeffs);
        let poles = find_roots(&coeffs)?
            .into_iter()
            .map(|r| Complex::new(r.re, r.im * ADJUSTABLE_IMAG_SCALE))
            .collect();
        Ok(RootSet::all_pole(poles))
    }
}
