//! Digital IIR filters from analog prototypes.
//!
//! [`design_iir_filter`] designs a low-pass prototype, reshapes it into a
//! low-pass, high-pass, band-pass, notch or all-pass response, maps it to
//! the z-plane with the bilinear transform and returns a cascade of
//! biquads. Band-pass and notch sections come out of the transform as 4th
//! order polynomials and are split into two biquads with the root finder.
//!
//! [`BiquadState`] runs a cascade over a signal (Form 1, with an overflow
//! guard) and [`frequency_response`] evaluates it on a uniform grid from
//! DC to Nyquist.
//!
//! Frequencies are normalized: 1.0 is Nyquist.
//!
//! # Examples
//!
//! ```
//! use iirkit::iir::{design_iir_filter, frequency_response, IirParams, ResponseShape};
//! use iirkit::prototype::{Family, LowPassParams};
//!
//! let proto = LowPassParams::new(Family::Butterworth, 4);
//! let design = design_iir_filter(&IirParams::new(ResponseShape::LowPass, 0.3, proto)).unwrap();
//! assert_eq!(design.cascade.num_sections(), 2);
//!
//! // −3 dB at the corner
//! let resp = frequency_response(&design.cascade, 1000);
//! assert!((resp.magnitude_db()[300] + 3.0103).abs() < 0.05);
//! ```
//!
//! ```
//! use iirkit::iir::{design_iir_filter, filter_signal, BiquadState, IirParams, ResponseShape};
//! use iirkit::prototype::{Family, LowPassParams};
//!
//! let proto = LowPassParams::new(Family::Chebyshev, 6).with_ripple(0.1);
//! let params = IirParams::new(ResponseShape::BandPass, 0.25, proto).with_bandwidth(0.05);
//! let design = design_iir_filter(&params).unwrap();
//!
//! let mut state = BiquadState::for_cascade(&design.cascade);
//! let out = filter_signal(&design.cascade, &mut state, &[1.0, 0.0, 0.0, 0.0]);
//! assert_eq!(out.samples.len(), 4);
//! assert!(out.overflow.is_none());
//! ```

mod bilinear;
mod response;
mod runtime;
mod split;

#[cfg(test)]
mod tests;

pub use response::{frequency_response, FrequencyResponse};
pub use runtime::{filter_signal, BiquadState, FilterOutput, Overflow, OVERFLOW_LIMIT};

use crate::prototype::{design_low_pass_prototype, LowPassParams, SPlaneSection};
use crate::roots::RootError;

const OMEGA_MIN: f64 = 0.0001;
const OMEGA_MAX: f64 = 0.9999;
const BANDWIDTH_MIN: f64 = 0.0001;
const BANDWIDTH_MAX: f64 = 1.0;

/// Errors from [`design_iir_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignError {
    /// The prototype's root finder failed.
    Prototype(RootError),
    /// Corner or center frequency is NaN or infinite.
    InvalidFrequency,
    /// Bandwidth is NaN or infinite.
    InvalidBandwidth,
    /// Gain is NaN or infinite.
    InvalidGain,
}

impl core::fmt::Display for DesignError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DesignError::Prototype(e) => write!(f, "prototype design failed: {}", e),
            DesignError::InvalidFrequency => write!(f, "frequency must be finite"),
            DesignError::InvalidBandwidth => write!(f, "bandwidth must be finite"),
            DesignError::InvalidGain => write!(f, "gain must be finite"),
        }
    }
}

impl std::error::Error for DesignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DesignError::Prototype(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RootError> for DesignError {
    fn from(e: RootError) -> Self {
        DesignError::Prototype(e)
    }
}

/// Shape of the digital response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    LowPass,
    HighPass,
    BandPass,
    Notch,
    /// Unity magnitude with the prototype's phase. Any prototype zeros are
    /// discarded; Gaussian gives the most linear phase.
    AllPass,
}

impl ResponseShape {
    /// Band shapes double the order and use the bandwidth.
    pub fn is_band(self) -> bool {
        matches!(self, ResponseShape::BandPass | ResponseShape::Notch)
    }
}

/// Where the per-section gain goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GainPlacement {
    /// Scale `b0`, `b1`, `b2`.
    #[default]
    Numerator,
    /// Store the gain in `a0`, which the runtime applies to the
    /// feed-forward sum.
    A0,
}

/// Digital filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IirParams {
    pub shape: ResponseShape,
    /// Corner (LPF, HPF, all-pass) or center (BPF, notch) frequency as a
    /// fraction of Nyquist, clamped to `[0.0001, 0.9999]`.
    pub omega_c: f64,
    /// Band-pass and notch bandwidth as a fraction of Nyquist, clamped to
    /// `[0.0001, 1]`.
    pub bandwidth: f64,
    /// Overall cascade gain in dB.
    pub gain_db: f64,
    pub gain_placement: GainPlacement,
    pub prototype: LowPassParams,
}

impl IirParams {
    pub fn new(shape: ResponseShape, omega_c: f64, prototype: LowPassParams) -> Self {
        Self {
            shape,
            omega_c,
            bandwidth: 0.1,
            gain_db: 0.0,
            gain_placement: GainPlacement::Numerator,
            prototype,
        }
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_gain_db(mut self, gain_db: f64) -> Self {
        self.gain_db = gain_db;
        self
    }

    pub fn with_gain_placement(mut self, placement: GainPlacement) -> Self {
        self.gain_placement = placement;
        self
    }

    /// The parameters actually used for design: frequency and bandwidth
    /// clamped, prototype parameters clamped per [`LowPassParams::clamped`].
    ///
    /// # Errors
    ///
    /// Non-finite frequency, bandwidth or gain.
    pub fn clamped(&self) -> Result<Self, DesignError> {
        if !self.omega_c.is_finite() {
            return Err(DesignError::InvalidFrequency);
        }
        if !self.bandwidth.is_finite() {
            return Err(DesignError::InvalidBandwidth);
        }
        if !self.gain_db.is_finite() {
            return Err(DesignError::InvalidGain);
        }
        Ok(Self {
            omega_c: self.omega_c.clamp(OMEGA_MIN, OMEGA_MAX),
            bandwidth: self.bandwidth.clamp(BANDWIDTH_MIN, BANDWIDTH_MAX),
            prototype: self.prototype.clamped(),
            ..*self
        })
    }
}

/// One z-plane biquad:
///
/// ```text
/// H(z) = a0 · (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²)
/// ```
///
/// `a[0]` is 1 unless the gain was placed there with
/// [`GainPlacement::A0`]. A first-order section has `a[2] = b[2] = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZSection {
    pub a: [f64; 3],
    pub b: [f64; 3],
}

impl ZSection {
    /// Every coefficient is zero (a failed band split).
    pub fn is_zero(&self) -> bool {
        self.a.iter().chain(self.b.iter()).all(|&c| c == 0.0)
    }

    pub fn is_first_order(&self) -> bool {
        self.a[2] == 0.0 && self.b[2] == 0.0
    }

    /// Divide through by `a[0]` so it becomes one.
    fn normalize(&mut self) {
        let a0 = self.a[0];
        if a0 == 0.0 {
            return;
        }
        for c in self.b.iter_mut().chain(self.a.iter_mut()) {
            *c /= a0;
        }
    }
}

/// Cascade of z-plane biquads, applied in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BiquadCascade {
    pub sections: Vec<ZSection>,
}

impl BiquadCascade {
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Filter order: two per section, one per first-order section.
    pub fn order(&self) -> usize {
        self.sections
            .iter()
            .map(|s| if s.is_first_order() { 1 } else { 2 })
            .sum()
    }

    /// No section is all zeros.
    pub fn is_valid(&self) -> bool {
        !self.sections.is_empty() && !self.sections.iter().any(ZSection::is_zero)
    }
}

/// A designed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct IirDesign {
    pub cascade: BiquadCascade,
    /// Effective (clamped) parameters.
    pub params: IirParams,
    /// Indices of sections left zeroed because a band split failed.
    pub degenerate: Vec<usize>,
}

/// Design a digital IIR filter.
///
/// Out-of-range frequency, bandwidth and prototype values are clamped;
/// the values used are in [`IirDesign::params`]. A band-pass or notch
/// section whose 4th-order split fails is left zeroed and listed in
/// [`IirDesign::degenerate`].
///
/// # Errors
///
/// [`DesignError::Prototype`] if the prototype's root finder fails, and the
/// `Invalid*` variants for non-finite inputs.
pub fn design_iir_filter(params: &IirParams) -> Result<IirDesign, DesignError> {
    let mut eff = params.clamped()?;
    let proto = design_low_pass_prototype(&eff.prototype)?;
    eff.prototype = proto.params;

    let mut sections = proto.sections.sections;
    if eff.shape == ResponseShape::AllPass {
        for s in sections.iter_mut() {
            *s = all_pass_numerator(s);
        }
    }

    let t = bilinear::warp(eff.omega_c);
    let q = bilinear::band_q(eff.omega_c, eff.bandwidth);
    // Analytic ±1 numerator roots for band-pass with an all-pole prototype
    let analytic_zeros = eff.shape == ResponseShape::BandPass && !eff.prototype.family.has_zeros();

    let mut out = Vec::with_capacity(sections.len() * 2);
    let mut degenerate = Vec::new();
    for s in &sections {
        match eff.shape {
            ResponseShape::LowPass | ResponseShape::AllPass => out.push(bilinear::low_pass(s, t)),
            ResponseShape::HighPass => out.push(bilinear::high_pass(s, t)),
            ResponseShape::BandPass | ResponseShape::Notch => {
                if s.d2 == 0.0 && s.n2 == 0.0 {
                    out.push(bilinear::band_first_order(eff.shape, s, t, q));
                    continue;
                }
                let quartic = bilinear::band_quartic(eff.shape, s, t, q);
                match split::split_quartic(&quartic, analytic_zeros) {
                    Ok(pair) => out.extend(pair),
                    Err(e) => {
                        log::warn!(
                            "{:?} section {} could not be split ({}); left zeroed",
                            eff.shape,
                            out.len(),
                            e
                        );
                        degenerate.extend([out.len(), out.len() + 1]);
                        out.extend([ZSection::default(); 2]);
                    }
                }
            }
        }
    }

    if eff.shape.is_band() {
        for s in out.iter_mut() {
            s.normalize();
        }
    }

    apply_gain(&mut out, eff.gain_db, eff.gain_placement);

    Ok(IirDesign {
        cascade: BiquadCascade { sections: out },
        params: eff,
        degenerate,
    })
}

/// `(A·s² − B·s + C) / (A·s² + B·s + C)`
fn all_pass_numerator(s: &SPlaneSection) -> SPlaneSection {
    SPlaneSection {
        n2: s.d2,
        n1: -s.d1,
        n0: s.d0,
        ..*s
    }
}

/// Spread `gain_db` evenly over the sections.
fn apply_gain(sections: &mut [ZSection], gain_db: f64, placement: GainPlacement) {
    if sections.is_empty() {
        return;
    }
    let section_gain = 10f64
        .powf(gain_db / 20.0)
        .powf(1.0 / sections.len() as f64);
    for s in sections.iter_mut().filter(|s| !s.is_zero()) {
        match placement {
            GainPlacement::Numerator => {
                for b in s.b.iter_mut() {
                    *b *= section_gain;
                }
            }
            GainPlacement::A0 => s.a[0] = section_gain,
        }
    }
}
