//! Bilinear transform of s-plane sections.
//!
//! With `H(s) = (D·s² + E·s + F) / (A·s² + B·s + C)` and
//! `s = (2/T)·(1 − z⁻¹)/(1 + z⁻¹)`, `T = 2·tan(ω_c·π/2)` pre-warps the
//! prototype's 1 rad/s corner onto `ω_c`. Every result carries the factor
//! `C/F` so a section's pass-band gain matches the prototype's DC-normalized
//! gain.

use super::split::Quartic;
use super::{ResponseShape, ZSection};
use crate::prototype::SPlaneSection;

/// Below this distance from 2, `T` is treated as exactly 2 for band shapes.
const T_EQUALS_TWO: f64 = 0.0005;

/// Bilinear constant for a corner at `omega_c` (fraction of Nyquist).
pub(super) fn warp(omega_c: f64) -> f64 {
    2.0 * (omega_c * core::f64::consts::FRAC_PI_2).tan()
}

/// Band-pass/notch quality factor with the empirical correction that keeps
/// the -3 dB bandwidth close to `bandwidth` across the band.
pub(super) fn band_q(omega_c: f64, bandwidth: f64) -> f64 {
    let correction = 0.8 * ((1.0 + omega_c).min(1.95) * core::f64::consts::FRAC_PI_4).tan();
    omega_c / bandwidth / correction
}

/// Low-pass (also all-pass, whose numerator is already set).
pub(super) fn low_pass(s: &SPlaneSection, t: f64) -> ZSection {
    let (a, b, c) = (s.d2, s.d1, s.d0);
    let (d, e, f) = (s.n2, s.n1, s.n0);
    let gain = c / f;

    if a == 0.0 && d == 0.0 {
        let arg = 2.0 * b + c * t;
        ZSection {
            a: [1.0, (-2.0 * b + c * t) / arg, 0.0],
            b: [
                (2.0 * e + f * t) / arg * gain,
                (-2.0 * e + f * t) / arg * gain,
                0.0,
            ],
        }
    } else {
        let t2 = t * t;
        let arg = 4.0 * a + 2.0 * b * t + c * t2;
        ZSection {
            a: [
                1.0,
                (2.0 * c * t2 - 8.0 * a) / arg,
                (4.0 * a - 2.0 * b * t + c * t2) / arg,
            ],
            b: [
                (4.0 * d + f * t2 + 2.0 * e * t) / arg * gain,
                (2.0 * f * t2 - 8.0 * d) / arg * gain,
                (4.0 * d - 2.0 * e * t + f * t2) / arg * gain,
            ],
        }
    }
}

/// High-pass: `s → 1/s` folded into the substitution.
pub(super) fn high_pass(s: &SPlaneSection, t: f64) -> ZSection {
    let (a, b, c) = (s.d2, s.d1, s.d0);
    let (d, e, f) = (s.n2, s.n1, s.n0);
    let gain = c / f;

    if a == 0.0 && d == 0.0 {
        let arg = 2.0 * c + b * t;
        ZSection {
            a: [1.0, (b * t - 2.0 * c) / arg, 0.0],
            b: [
                (e * t + 2.0 * f) / arg * gain,
                (e * t - 2.0 * f) / arg * gain,
                0.0,
            ],
        }
    } else {
        let t2 = t * t;
        let arg = a * t2 + 4.0 * c + 2.0 * b * t;
        ZSection {
            a: [
                1.0,
                (2.0 * a * t2 - 8.0 * c) / arg,
                (a * t2 + 4.0 * c - 2.0 * b * t) / arg,
            ],
            b: [
                (d * t2 + 4.0 * f + 2.0 * e * t) / arg * gain,
                (2.0 * d * t2 - 8.0 * f) / arg * gain,
                (d * t2 - 2.0 * e * t + 4.0 * f) / arg * gain,
            ],
        }
    }
}

/// A first-order prototype section becomes one biquad under the band
/// transforms.
pub(super) fn band_first_order(shape: ResponseShape, s: &SPlaneSection, t: f64, q: f64) -> ZSection {
    let (b, c) = (s.d1, s.d0);
    let (e, f) = (s.n1, s.n0);
    let gain = c / f;
    let t2 = t * t;

    if shape == ResponseShape::Notch {
        let arg = 2.0 * b * t + c * q * t2 + 4.0 * c * q;
        ZSection {
            a: [
                1.0,
                (2.0 * c * q * t2 - 8.0 * c * q) / arg,
                (4.0 * c * q - 2.0 * b * t + c * q * t2) / arg,
            ],
            b: [
                (2.0 * e * t + f * q * t2 + 4.0 * f * q) / arg * gain,
                (2.0 * f * q * t2 - 8.0 * f * q) / arg * gain,
                (4.0 * f * q - 2.0 * e * t + f * q * t2) / arg * gain,
            ],
        }
    } else {
        let arg = 4.0 * b * q + 2.0 * c * t + b * q * t2;
        ZSection {
            a: [
                1.0,
                (2.0 * b * q * t2 - 8.0 * b * q) / arg,
                (b * q * t2 + 4.0 * b * q - 2.0 * c * t) / arg,
            ],
            b: [
                (4.0 * e * q + 2.0 * f * t + e * q * t2) / arg * gain,
                (2.0 * e * q * t2 - 8.0 * e * q) / arg * gain,
                (e * q * t2 + 4.0 * e * q - 2.0 * f * t) / arg * gain,
            ],
        }
    }
}

/// A second-order prototype section under the band transforms: 4th-order
/// numerator and denominator in `z⁻¹`, not yet normalized.
///
/// The odd terms vanish analytically at `T = 2` (`ω_c = 0.5`); they are
/// zeroed there so the root finder sees an exact biquadratic.
pub(super) fn band_quartic(shape: ResponseShape, s: &SPlaneSection, t: f64, q: f64) -> Quartic {
    let (a, b, c) = (s.d2, s.d1, s.d0);
    let (d, e, f) = (s.n2, s.n1, s.n0);
    let (q2, t2) = (q * q, t * t);
    let (t3, t4) = (t2 * t, t2 * t2);

    let mut quartic = if shape == ResponseShape::Notch {
        let den = [
            (4.0 * a * t2 - 2.0 * b * t3 * q + 8.0 * c * q2 * t2 - 8.0 * b * t * q
                + c * q2 * t4
                + 16.0 * c * q2)
                * -f,
            (16.0 * b * t * q + 4.0 * c * q2 * t4 - 64.0 * c * q2 - 4.0 * b * t3 * q) * -f,
            (96.0 * c * q2 - 8.0 * a * t2 - 16.0 * c * q2 * t2 + 6.0 * c * q2 * t4) * -f,
            (4.0 * b * t3 * q - 16.0 * b * t * q - 64.0 * c * q2 + 4.0 * c * q2 * t4) * -f,
            (4.0 * a * t2 + 2.0 * b * t3 * q + 8.0 * c * q2 * t2 + 8.0 * b * t * q
                + c * q2 * t4
                + 16.0 * c * q2)
                * -f,
        ];
        let num = [
            (2.0 * e * t3 * q - 4.0 * d * t2 - 8.0 * f * q2 * t2 + 8.0 * e * t * q
                - 16.0 * f * q2
                - f * q2 * t4)
                * c,
            (64.0 * f * q2 + 4.0 * e * t3 * q - 16.0 * e * t * q - 4.0 * f * q2 * t4) * c,
            (8.0 * d * t2 - 96.0 * f * q2 + 16.0 * f * q2 * t2 - 6.0 * f * q2 * t4) * c,
            (16.0 * e * t * q - 4.0 * e * t3 * q + 64.0 * f * q2 - 4.0 * f * q2 * t4) * c,
            (-4.0 * d * t2 - 2.0 * e * t3 * q - 8.0 * e * t * q - 8.0 * f * q2 * t2
                - f * q2 * t4
                - 16.0 * f * q2)
                * c,
        ];
        Quartic { den, num }
    } else {
        let den = [
            (16.0 * a * q2 + a * q2 * t4 + 8.0 * a * q2 * t2 - 2.0 * b * q * t3 - 8.0 * b * q * t
                + 4.0 * c * t2)
                * f,
            (4.0 * t4 * a * q2 - 4.0 * q * t3 * b + 16.0 * q * b * t - 64.0 * a * q2) * f,
            (96.0 * a * q2 - 16.0 * a * q2 * t2 + 6.0 * a * q2 * t4 - 8.0 * c * t2) * f,
            (4.0 * t4 * a * q2 + 4.0 * q * t3 * b - 16.0 * q * b * t - 64.0 * a * q2) * f,
            (16.0 * a * q2 + a * q2 * t4 + 8.0 * a * q2 * t2 + 2.0 * b * q * t3 + 8.0 * b * q * t
                + 4.0 * c * t2)
                * f,
        ];
        let num = [
            (8.0 * d * q2 * t2 - 8.0 * e * q * t + 16.0 * d * q2 - 2.0 * e * q * t3
                + d * q2 * t4
                + 4.0 * f * t2)
                * c,
            (16.0 * e * q * t - 4.0 * e * q * t3 - 64.0 * d * q2 + 4.0 * d * q2 * t4) * c,
            (96.0 * d * q2 - 8.0 * f * t2 + 6.0 * d * q2 * t4 - 16.0 * d * q2 * t2) * c,
            (4.0 * d * q2 * t4 - 64.0 * d * q2 + 4.0 * e * q * t3 - 16.0 * e * q * t) * c,
            (16.0 * d * q2 + 8.0 * e * q * t + 8.0 * d * q2 * t2 + 2.0 * e * q * t3
                + 4.0 * f * t2
                + d * q2 * t4)
                * c,
        ];
        Quartic { den, num }
    };

    if (t - 2.0).abs() < T_EQUALS_TWO {
        for poly in [&mut quartic.den, &mut quartic.num] {
            poly[1] = 0.0;
            poly[3] = 0.0;
        }
    }
    quartic
}
