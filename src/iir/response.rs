use num_complex::Complex;

use super::BiquadCascade;

/// Smallest denominator magnitude used; a pole on the unit circle would
/// otherwise divide by zero.
const DENOMINATOR_FLOOR: f64 = 1.0e-12;

/// `H(e^jω)` sampled at `ω = π·j/N`, `j = 0..N`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyResponse {
    pub re: Vec<f64>,
    pub im: Vec<f64>,
}

impl FrequencyResponse {
    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Normalized frequency of each point (1.0 is Nyquist).
    pub fn frequencies(&self) -> Vec<f64> {
        let n = self.len() as f64;
        (0..self.len()).map(|j| j as f64 / n).collect()
    }

    pub fn magnitude(&self) -> Vec<f64> {
        self.points().map(|h| h.norm()).collect()
    }

    /// `20·log10|H|`; `-inf` at an exact zero.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.points().map(|h| 20.0 * h.norm().log10()).collect()
    }

    /// Phase in radians, wrapped to `(−π, π]`.
    pub fn phase(&self) -> Vec<f64> {
        self.points().map(|h| h.arg()).collect()
    }

    fn points(&self) -> impl Iterator<Item = Complex<f64>> + '_ {
        self.re
            .iter()
            .zip(self.im.iter())
            .map(|(&re, &im)| Complex::new(re, im))
    }
}

/// Evaluate the cascade at `n_points` frequencies from DC up to (not
/// including) Nyquist, section by section.
///
/// Direct evaluation rather than an FFT, so narrow filters resolve without
/// a long impulse response.
pub fn frequency_response(cascade: &BiquadCascade, n_points: usize) -> FrequencyResponse {
    let mut re = Vec::with_capacity(n_points);
    let mut im = Vec::with_capacity(n_points);
    for j in 0..n_points {
        let arg = core::f64::consts::PI * j as f64 / n_points as f64;
        // z⁻¹ on the unit circle
        let z1 = Complex::new(arg.cos(), -arg.sin());
        let z2 = z1 * z1;

        let mut h = Complex::new(1.0, 0.0);
        for sec in &cascade.sections {
            h *= sec.a[0];
            h *= z2 * sec.b[2] + z1 * sec.b[1] + sec.b[0];
            let mut den = z2 * sec.a[2] + z1 * sec.a[1] + 1.0;
            if den.norm() < DENOMINATOR_FLOOR {
                den = Complex::new(DENOMINATOR_FLOOR, 0.0);
            }
            h /= den;
        }
        re.push(h.re);
        im.push(h.im);
    }
    FrequencyResponse { re, im }
}
