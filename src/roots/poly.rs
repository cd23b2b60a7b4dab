//! Small polynomial utilities. Coefficients are in descending order of power.

use core::ops::{Add, Mul};

use num_complex::Complex;
use num_traits::{One, Zero};

/// Horner evaluation of `coeffs` at `x`.
///
/// Generic over anything with `+`, `*` and a zero, so it serves `f64`,
/// [`Ext`](crate::Ext) and `Complex<f64>` alike.
///
/// # Examples
///
/// ```
/// use iirkit::roots::horner;
///
/// // 2x² − 3x + 1 at x = 2
/// assert_eq!(horner(&[2.0, -3.0, 1.0], 2.0), 3.0);
/// ```
pub fn horner<T>(coeffs: &[T], x: T) -> T
where
    T: Copy + Zero + Mul<Output = T> + Add<Output = T>,
{
    coeffs.iter().fold(T::zero(), |acc, &c| acc * x + c)
}

/// Evaluate a real polynomial at a complex point.
pub fn eval_complex(coeffs: &[f64], z: Complex<f64>) -> Complex<f64> {
    coeffs
        .iter()
        .fold(Complex::zero(), |acc, &c| acc * z + Complex::new(c, 0.0))
}

/// Derivative coefficients (one fewer than the input; empty for a constant).
///
/// Works on `f64` and [`Ext`](crate::Ext) coefficients; the root finder
/// seeds its iteration polynomials from it.
pub fn derivative<T>(coeffs: &[T]) -> Vec<T>
where
    T: Copy + Mul<f64, Output = T>,
{
    let n = coeffs.len().saturating_sub(1);
    coeffs
        .iter()
        .take(n)
        .enumerate()
        .map(|(j, &c)| c * (n - j) as f64)
        .collect()
}

/// Monic polynomial with the given roots.
///
/// Complex roots are expected in conjugate pairs; the imaginary residue of
/// each coefficient is discarded.
pub fn poly_from_roots(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut acc: Vec<Complex<f64>> = vec![Complex::one()];
    for &r in roots {
        acc.push(Complex::zero());
        for j in (1..acc.len()).rev() {
            let prev = acc[j - 1];
            acc[j] -= prev * r;
        }
    }
    acc.into_iter().map(|c| c.re).collect()
}

/// Product of two polynomials.
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Reverse the coefficient order and rescale so the new leading
/// coefficient is one. Maps the roots `r` to `1 / r`.
pub fn reverse_monic(coeffs: &mut [f64]) {
    coeffs.reverse();
    if let Some(&lead) = coeffs.first() {
        if lead != 0.0 {
            for c in coeffs.iter_mut() {
                *c /= lead;
            }
        }
    }
}
