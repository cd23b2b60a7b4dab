//! Polynomial root finding in extended precision.
//!
//! - [`find_roots`]: roots of a real polynomial of degree up to
//!   [`MAX_DEGREE`], coefficients as `f64`
//! - [`find_roots_ext`]: the same solver on [`Ext`] coefficients
//! - [`low_order_roots`], [`quad_roots`], [`cubic_roots`], [`quartic_roots`]:
//!   closed forms for degree four and below
//! - [`poly_from_roots`], [`horner`], [`eval_complex`], [`derivative`]:
//!   polynomial helpers
//!
//! Coefficients are always in descending order of power: `coeffs[0]` is
//! the leading term.
//!
//! # Examples
//!
//! ```
//! use iirkit::roots::find_roots;
//!
//! // (x − 1)(x − 2)(x − 3)(x² + 1)(x + 4)
//! let p = [1.0, -2.0, -12.0, 36.0, -37.0, 38.0, -24.0];
//! let roots = find_roots(&p).unwrap();
//! assert_eq!(roots.len(), 6);
//! for r in &roots {
//!     let v = iirkit::roots::eval_complex(&p, *r);
//!     assert!(v.norm() < 1e-9);
//! }
//! ```

mod general;
mod low_order;
mod poly;

#[cfg(test)]
mod tests;

pub use general::{find_roots_ext, MAX_DEGREE};
pub use low_order::{cubic_roots, linear_root, low_order_roots, quad_roots, quartic_roots};
pub use poly::{derivative, eval_complex, horner, multiply, poly_from_roots, reverse_monic};

use num_complex::Complex;

use crate::ext::Ext;

/// Errors from the polynomial root finders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootError {
    /// No coefficients, or degree above [`MAX_DEGREE`].
    DegreeOutOfRange,
    /// A coefficient was NaN or infinite.
    NotFinite,
    /// Every coefficient was zero.
    ZeroPolynomial,
    /// Every seed was exhausted with `degree` roots still unresolved.
    NoConvergence { degree: usize },
}

impl core::fmt::Display for RootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RootError::DegreeOutOfRange => {
                write!(f, "polynomial degree must be between 0 and {}", MAX_DEGREE)
            }
            RootError::NotFinite => write!(f, "polynomial coefficient is NaN or infinity"),
            RootError::ZeroPolynomial => write!(f, "every polynomial coefficient is zero"),
            RootError::NoConvergence { degree } => {
                write!(f, "root finder failed to converge with {} roots remaining", degree)
            }
        }
    }
}

impl std::error::Error for RootError {}

/// Roots of a real polynomial with `f64` coefficients (descending order).
///
/// Coefficients are promoted to [`Ext`] for the search and the roots are
/// rounded back to `f64`. See [`find_roots_ext`] for the treatment of
/// leading and trailing zeros and the error conditions.
pub fn find_roots(coeffs: &[f64]) -> Result<Vec<Complex<f64>>, RootError> {
    let ext: Vec<Ext> = coeffs.iter().map(|&c| Ext::from(c)).collect();
    let roots = find_roots_ext(&ext)?;
    Ok(roots
        .into_iter()
        .map(|r| Complex::new(r.re.to_f64(), r.im.to_f64()))
        .collect())
}
