//! Splitting a 4th-order band section into two biquads.

use num_complex::Complex;

use super::ZSection;
use crate::roots::{find_roots, RootError};

/// Band-pass/notch section before splitting: coefficients of `z⁻⁴` down to
/// `z⁰`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Quartic {
    pub den: [f64; 5],
    pub num: [f64; 5],
}

/// Numerator roots of a band-pass built on an all-pole prototype:
/// `(z⁻¹ − 1)²·(z⁻¹ + 1)²`, paired so each biquad gets one of each.
const ALL_POLE_BAND_PASS_ZEROS: [f64; 4] = [-1.0, 1.0, -1.0, 1.0];

/// Factor `quartic` into two biquads. Each factor carries `sqrt|leading|`,
/// so the pair multiplies back to the quartic up to sign. `a[0]` is left
/// unnormalized.
///
/// With `analytic_zeros` the numerator is taken as
/// `(z⁻² − 1)²` rather than solved, and `b1` is exactly zero.
///
/// # Errors
///
/// The root finder failed or returned fewer than four roots.
pub(super) fn split_quartic(
    quartic: &Quartic,
    analytic_zeros: bool,
) -> Result<[ZSection; 2], RootError> {
    let poles = quartic_roots(&quartic.den)?;
    let den = factor_pair(&poles, quartic.den[0]);

    let num = if analytic_zeros {
        let zeros = ALL_POLE_BAND_PASS_ZEROS.map(|r| Complex::new(r, 0.0));
        let mut num = factor_pair(&zeros, quartic.num[0]);
        for n in num.iter_mut() {
            n[1] = 0.0;
        }
        num
    } else {
        factor_pair(&quartic_roots(&quartic.num)?, quartic.num[0])
    };

    Ok([
        ZSection {
            a: den[0],
            b: num[0],
        },
        ZSection {
            a: den[1],
            b: num[1],
        },
    ])
}

fn quartic_roots(coeffs: &[f64; 5]) -> Result<[Complex<f64>; 4], RootError> {
    let roots = find_roots(coeffs)?;
    <[Complex<f64>; 4]>::try_from(roots).map_err(|r| RootError::NoConvergence {
        degree: 4 - r.len().min(4),
    })
}

/// Quadratic factors `[c0, c1, c2]` (coefficients of `x⁰, x¹, x²`) from
/// roots taken two at a time.
fn factor_pair(roots: &[Complex<f64>; 4], leading: f64) -> [[f64; 3]; 2] {
    let scale = leading.abs().sqrt();
    let factor = |r0: Complex<f64>, r1: Complex<f64>| {
        [
            (r0 * r1).re * scale,
            -(r0 + r1).re * scale,
            scale,
        ]
    };
    [factor(roots[0], roots[1]), factor(roots[2], roots[3])]
}
