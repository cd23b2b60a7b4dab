use num_complex::Complex;

use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::RootError;

/// Elliptic designs need a little more ripple than the global floor.
const RIPPLE_FLOOR: f64 = 0.001;
const MAX_ITER: usize = 15;
/// Landen sequence length limit.
const MAX_LANDEN: usize = 10;
const LANDEN_TOL: f64 = 1.0e-6;
const STOP_BAND_TOL_DB: f64 = 0.1;
const MODULUS_MIN: f64 = 0.001;
/// Above this the poles leave the left half plane.
const MODULUS_MAX: f64 = 0.990;

/// Cauer filter: equiripple in both pass and stop band.
///
/// The selectivity modulus `k` is iterated (secant on stop-band dB) until
/// the attenuation implied by the Landen sequence is within 0.1 dB of the
/// request; poles and zeros then come from the descending Landen
/// transformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elliptic;

/// Result of the modulus search.
struct Landen {
    /// `k[0]` is the selectivity modulus; `k[1..=last]` its Landen sequence.
    k: [f64; MAX_LANDEN + 1],
    g: [f64; MAX_LANDEN + 1],
    last: usize,
}

impl Landen {
    fn compute(k0: f64, order: usize) -> Self {
        let mut k = [0.0; MAX_LANDEN + 1];
        let mut g = [0.0; MAX_LANDEN + 1];
        k[0] = k0;
        // Unreachable fallback: for k0 ≤ MODULUS_MAX the sequence drops
        // below LANDEN_TOL within five steps
        let mut last = MAX_LANDEN - 1;
        for j in 1..MAX_LANDEN {
            k[j] = (k[j - 1] / (1.0 + (1.0 - k[j - 1] * k[j - 1]).sqrt())).powi(2);
            if k[j] <= LANDEN_TOL {
                last = j;
                break;
            }
        }
        g[last] = 4.0 * (k[last] / 4.0).powi(order as i32);
        for j in (1..=last).rev() {
            g[j - 1] = 2.0 * g[j].sqrt() / (1.0 + g[j]);
        }
        if g[0] <= 0.0 {
            g[0] = 1.0e-10;
        }
        Self { k, g, last }
    }

    fn stop_band_db(&self, eps0: f64) -> f64 {
        10.0 * (1.0 + (eps0 / self.g[0]).powi(2)).log10()
    }

    /// Apply the descending transformation `x ← (x − k/x) / (1 + k)`.
    fn descend_complex(&self, mut c: Complex<f64>) -> Complex<f64> {
        for j in (1..=self.last).rev() {
            let kj = self.k[j];
            c = (c - c.inv().scale(kj)).unscale(1.0 + kj);
        }
        c
    }
}

/// Find the modulus whose stop-band attenuation matches `desired_db`.
fn search_modulus(order: usize, eps0: f64, desired_db: f64) -> Landen {
    let mut k0 = ((order as f64 - 2.0) * 0.1605 + 0.016).clamp(0.01, 0.7);
    let mut landen = Landen::compute(k0, order);
    let mut delta = 0.0;
    let mut prev_err = 0.0;

    for iter in 0..MAX_ITER {
        landen = Landen::compute(k0, order);
        let err = desired_db - landen.stop_band_db(eps0);
        if err.abs() < STOP_BAND_TOL_DB {
            break;
        }
        if iter == 0 {
            delta = if err > 0.0 { 0.005 } else { -0.005 };
        } else {
            let deriv = (prev_err - err) / delta;
            if deriv == 0.0 {
                // k pinned at a limit
                break;
            }
            delta = (err / deriv).clamp(-0.1, 0.1);
        }
        prev_err = err;
        k0 = (k0 - delta).clamp(MODULUS_MIN, MODULUS_MAX);
    }
    log::debug!(
        "elliptic modulus {:.6}, stop band {:.2} dB",
        landen.k[0],
        landen.stop_band_db(eps0)
    );
    landen
}

impl PoleZeroGenerator for Elliptic {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let n = params.poles;
        let ripple = params.ripple_db.max(RIPPLE_FLOOR);
        let eps0 = (10f64.powf(ripple / 10.0) - 1.0).sqrt();
        let landen = search_modulus(n, eps0, params.stop_band_db);

        let mut eps = eps0;
        for j in 1..=landen.last {
            let a = (1.0 + landen.g[j]) * eps / 2.0;
            eps = a + (a * a + landen.g[j]).sqrt();
        }
        let imag = ((1.0 + (1.0 + eps * eps).sqrt()) / eps).ln() / n as f64;

        let mut poles = Vec::with_capacity(n);
        let mut zeros = Vec::with_capacity(n);
        for j in 1..=n / 2 {
            let re = (2 * j - 1) as f64 * core::f64::consts::FRAC_PI_2 / n as f64;
            let c = Complex::new(0.0, -1.0) / Complex::new(-re, imag).cos();
            let c = landen.descend_complex(c);

            let mut d = 1.0 / re.cos();
            for m in (1..=landen.last).rev() {
                let km = landen.k[m];
                d = (d + km / d) / (1.0 + km);
            }

            let pole = c.inv();
            poles.push(pole);
            poles.push(pole.conj());
            let zero = Complex::new(0.0, d / landen.k[0]);
            zeros.push(zero);
            zeros.push(zero.conj());
        }

        if n % 2 == 1 {
            let mut a = 1.0 / imag.sinh();
            for m in (1..=landen.last).rev() {
                let km = landen.k[m];
                a = (a - km / a) / (1.0 + km);
            }
            poles.push(Complex::new(-1.0 / a, 0.0));
        }

        Ok(RootSet { poles, zeros })
    }
}
