use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::{find_roots, reverse_monic, RootError};
use crate::special::factorial;

/// Maximally flat group delay.
///
/// The denominator is the reverse Bessel polynomial
/// `θₙ(s) = Σ (2n−k)! / (2ⁿ⁻ᵏ·k!·(n−k)!) · sᵏ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bessel;

/// Ascending coefficients of the reverse Bessel polynomial of order `n`.
pub(crate) fn reverse_bessel(n: usize) -> Vec<f64> {
    let mut coeffs: Vec<f64> = (0..n)
        .map(|k| {
            factorial(2 * n - k) / factorial(k) / factorial(n - k) / 2f64.powi((n - k) as i32)
        })
        .collect();
    coeffs.push(1.0);
    coeffs
}

impl PoleZeroGenerator for Bessel {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let mut coeffs = reverse_bessel(params.poles);
        reverse_monic(&mut coeffs);
        Ok(RootSet::all_pole(find_roots(&coeffs)?))
    }
}
