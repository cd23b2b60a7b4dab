//! Analog low-pass prototypes.
//!
//! Each [`Family`] has a pole/zero generator implementing
//! [`PoleZeroGenerator`]. [`design_low_pass_prototype`] clamps the
//! parameters, asks the generator for roots, keeps the left-half-plane
//! poles and imaginary-axis zeros, pairs them into real first/second-order
//! [`SPlaneSection`]s and, for every family except Butterworth, rescales so
//! the −3 dB corner sits at 1 rad/s.
//!
//! | Family | Max poles | Parameters used |
//! |--------|-----------|-----------------|
//! | Butterworth | 20 | — |
//! | Chebyshev | 20 | ripple (capped further above 15 poles) |
//! | Inverse Chebyshev | 15 | stop-band attenuation |
//! | Elliptic | 15 | ripple, stop-band attenuation |
//! | Bessel | 12 | — |
//! | Gaussian | 12 | — |
//! | Adjustable Gauss | 20 | gamma |
//! | Papoulis | 20 | — |
//!
//! # Examples
//!
//! ```
//! use iirkit::prototype::{design_low_pass_prototype, Family, LowPassParams};
//!
//! let params = LowPassParams::new(Family::Chebyshev, 5).with_ripple(0.5);
//! let proto = design_low_pass_prototype(&params).unwrap();
//! assert_eq!(proto.sections.len(), 3);
//!
//! // −3 dB at 1 rad/s
//! let db = 20.0 * proto.sections.response(1.0).norm().log10();
//! assert!((db + 3.0103).abs() < 0.05);
//! ```

mod bessel;
mod butterworth;
mod chebyshev;
mod elliptic;
mod gauss;
mod inverse_chebyshev;
mod papoulis;
mod sections;


pub use bessel::Bessel;
pub use butterworth::Butterworth;
pub use chebyshev::Chebyshev;
pub use elliptic::Elliptic;
pub use gauss::{AdjustableGauss, Gaussian};
pub use inverse_chebyshev::InverseChebyshev;
pub use papoulis::Papoulis;
pub use sections::{
    find_corner_frequency, pair_roots, set_corner_frequency, sort_roots_by_zeta, SPlaneSection,
    SPlaneSections,
};

use num_complex::Complex;

use crate::roots::RootError;

/// Largest pole count for any family.
pub const MAX_POLE_COUNT: usize = 20;

pub(crate) const RIPPLE_MIN: f64 = 0.0001;
pub(crate) const RIPPLE_MAX: f64 = 1.0;
pub(crate) const STOP_BAND_MIN: f64 = 20.0;
pub(crate) const STOP_BAND_MAX: f64 = 120.0;
pub(crate) const GAMMA_MIN: f64 = -1.0;
pub(crate) const GAMMA_MAX: f64 = 1.0;

/// Low-pass prototype family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Butterworth,
    Chebyshev,
    InverseChebyshev,
    Elliptic,
    Bessel,
    Gaussian,
    /// Transitional family between Gaussian (gamma = −1) and Butterworth
    /// (gamma = 1).
    AdjustableGauss,
    Papoulis,
}

impl Family {
    pub const ALL: [Family; 8] = [
        Family::Butterworth,
        Family::Chebyshev,
        Family::InverseChebyshev,
        Family::Elliptic,
        Family::Bessel,
        Family::Gaussian,
        Family::AdjustableGauss,
        Family::Papoulis,
    ];

    /// Largest supported pole count for this family.
    pub fn max_poles(self) -> usize {
        match self {
            Family::Elliptic | Family::InverseChebyshev => 15,
            Family::Gaussian | Family::Bessel => 12,
            _ => MAX_POLE_COUNT,
        }
    }

    /// Family has finite transmission zeros on the imaginary axis.
    pub fn has_zeros(self) -> bool {
        matches!(self, Family::InverseChebyshev | Family::Elliptic)
    }
}

impl core::fmt::Display for Family {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Family::Butterworth => "Butterworth",
            Family::Chebyshev => "Chebyshev",
            Family::InverseChebyshev => "Inverse Chebyshev",
            Family::Elliptic => "Elliptic",
            Family::Bessel => "Bessel",
            Family::Gaussian => "Gaussian",
            Family::AdjustableGauss => "Adjustable Gauss",
            Family::Papoulis => "Papoulis",
        };
        f.write_str(name)
    }
}

/// Low-pass prototype parameters.
///
/// Out-of-range values are clamped by [`LowPassParams::clamped`] rather
/// than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassParams {
    pub family: Family,
    /// Pole count, 1 to [`Family::max_poles`].
    pub poles: usize,
    /// Pass-band ripple in dB (Chebyshev, Elliptic), 0.0001 to 1.
    pub ripple_db: f64,
    /// Stop-band attenuation in positive dB (Inverse Chebyshev,
    /// Elliptic), 20 to 120.
    pub stop_band_db: f64,
    /// Adjustable Gauss shape, −1 to 1.
    pub gamma: f64,
}

impl Default for LowPassParams {
    fn default() -> Self {
        Self {
            family: Family::Butterworth,
            poles: 4,
            ripple_db: 0.25,
            stop_band_db: 60.0,
            gamma: 0.0,
        }
    }
}

impl LowPassParams {
    pub fn new(family: Family, poles: usize) -> Self {
        Self {
            family,
            poles,
            ..Self::default()
        }
    }

    pub fn with_ripple(mut self, ripple_db: f64) -> Self {
        self.ripple_db = ripple_db;
        self
    }

    pub fn with_stop_band(mut self, stop_band_db: f64) -> Self {
        self.stop_band_db = stop_band_db;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// The parameters actually used for design.
    ///
    /// Pole count is clamped to `1..=family.max_poles()`; ripple, stop-band
    /// and gamma to their ranges (non-finite values fall back to the
    /// default). A Chebyshev with more than 15 poles has its ripple capped
    /// further to keep the poles clear of the imaginary axis.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let fix = |v: f64, lo: f64, hi: f64, dflt: f64| {
            if v.is_finite() {
                v.clamp(lo, hi)
            } else {
                dflt
            }
        };

        let poles = self.poles.clamp(1, self.family.max_poles());
        let mut ripple_db = fix(self.ripple_db, RIPPLE_MIN, RIPPLE_MAX, defaults.ripple_db);
        if self.family == Family::Chebyshev {
            let cap = match poles {
                0..=15 => RIPPLE_MAX,
                16 => 0.5,
                17 => 0.4,
                18 => 0.25,
                19 => 0.125,
                _ => 0.10,
            };
            ripple_db = ripple_db.min(cap);
        }

        Self {
            family: self.family,
            poles,
            ripple_db,
            stop_band_db: fix(
                self.stop_band_db,
                STOP_BAND_MIN,
                STOP_BAND_MAX,
                defaults.stop_band_db,
            ),
            gamma: fix(self.gamma, GAMMA_MIN, GAMMA_MAX, defaults.gamma),
        }
    }
}

/// Roots produced by a [`PoleZeroGenerator`].
///
/// Generators that work from `H(s)·H(−s)` return both half planes; the
/// assembler keeps only what it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootSet {
    pub poles: Vec<Complex<f64>>,
    pub zeros: Vec<Complex<f64>>,
}

impl RootSet {
    pub fn all_pole(poles: Vec<Complex<f64>>) -> Self {
        Self {
            poles,
            zeros: Vec::new(),
        }
    }
}

/// Produces the poles (and zeros) of one prototype family.
///
/// Parameters arrive already clamped; `params.poles` is at least 2.
pub trait PoleZeroGenerator: Sync {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError>;

    /// Whether the result must be rescaled to a 1 rad/s −3 dB corner.
    fn needs_corner_scaling(&self) -> bool {
        true
    }
}

/// The generator for `family`.
pub fn generator(family: Family) -> &'static dyn PoleZeroGenerator {
    match family {
        Family::Butterworth => &Butterworth,
        Family::Chebyshev => &Chebyshev,
        Family::InverseChebyshev => &InverseChebyshev,
        Family::Elliptic => &Elliptic,
        Family::Bessel => &Bessel,
        Family::Gaussian => &Gaussian,
        Family::AdjustableGauss => &AdjustableGauss,
        Family::Papoulis => &Papoulis,
    }
}

/// A designed prototype and the clamped parameters it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeDesign {
    pub sections: SPlaneSections,
    pub params: LowPassParams,
}

/// Design the s-plane sections of a low-pass prototype.
///
/// The result has `ceil(poles / 2)` sections for a well-formed root set.
/// For odd pole counts with zeros, the real-pole section gets the
/// zero-free numerator.
///
/// # Errors
///
/// Propagates [`RootError`] from generators that use the root finder.
pub fn design_low_pass_prototype(params: &LowPassParams) -> Result<PrototypeDesign, RootError> {
    let eff = params.clamped();
    if eff != *params {
        log::debug!("prototype parameters clamped: {:?} -> {:?}", params, eff);
    }

    if eff.poles == 1 {
        let single = SPlaneSection {
            d1: 1.0,
            ..SPlaneSection::default()
        };
        return Ok(PrototypeDesign {
            sections: SPlaneSections {
                sections: vec![single],
            },
            params: eff,
        });
    }

    let gen = generator(eff.family);
    let RootSet {
        mut poles,
        mut zeros,
    } = gen.roots(&eff)?;

    let denominators = pair_roots(&mut poles);
    let numerators = if zeros.is_empty() {
        Vec::new()
    } else {
        pair_roots(&mut zeros)
    };

    let expected = (eff.poles + 1) / 2;
    if denominators.len() != expected {
        log::warn!(
            "{} with {} poles produced {} sections, expected {}",
            eff.family,
            eff.poles,
            denominators.len(),
            expected
        );
    }

    // Odd order with zeros: the real pole takes the zero-free numerator
    let placeholder = if !numerators.is_empty() && eff.poles % 2 == 1 {
        denominators.iter().position(|d| d[0] == 0.0)
    } else {
        None
    };

    let mut num_iter = numerators.into_iter();
    let sections = denominators
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut sec = SPlaneSection {
                d2: d[0],
                d1: d[1],
                d0: d[2],
                ..SPlaneSection::default()
            };
            if placeholder != Some(i) {
                if let Some(n) = num_iter.next() {
                    sec.n2 = n[0];
                    sec.n1 = n[1];
                    sec.n0 = n[2];
                }
            }
            sec
        })
        .collect();

    let mut sections = SPlaneSections { sections };
    if gen.needs_corner_scaling() {
        set_corner_frequency(&mut sections);
    }

    Ok(PrototypeDesign {
        sections,
        params: eff,
    })
}
