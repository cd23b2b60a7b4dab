//! # iirkit
//!
//! IIR filter design in pure Rust: classical analog low-pass prototypes,
//! the bilinear transform to z-plane biquad cascades, a Form 1 biquad
//! runtime, and the extended-precision polynomial root finder the design
//! depends on.
//!
//! ## Quick start
//!
//! ```
//! use iirkit::iir::{design_iir_filter, filter_signal, BiquadState, IirParams, ResponseShape};
//! use iirkit::prototype::{Family, LowPassParams};
//!
//! // 6-pole elliptic low-pass, corner at 0.2 × Nyquist
//! let proto = LowPassParams::new(Family::Elliptic, 6)
//!     .with_ripple(0.1)
//!     .with_stop_band(70.0);
//! let design = design_iir_filter(&IirParams::new(ResponseShape::LowPass, 0.2, proto)).unwrap();
//! assert_eq!(design.cascade.num_sections(), 3);
//!
//! let mut state = BiquadState::for_cascade(&design.cascade);
//! let out = filter_signal(&design.cascade, &mut state, &[1.0, 0.5, 0.25]);
//! assert_eq!(out.samples.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`roots`]: Roots of real polynomials up to degree 100. A quadratic
//!   factor iteration with a real-root fallback reduces the polynomial to
//!   degree four, which closed forms finish. Runs in [`Ext`]
//!   (double-double) arithmetic.
//!
//! - [`prototype`]: Butterworth, Chebyshev, Inverse Chebyshev, Elliptic,
//!   Bessel, Gaussian, Adjustable Gauss and Papoulis low-pass prototypes as
//!   s-plane sections normalized to −3 dB at 1 rad/s. Each family is a
//!   [`prototype::PoleZeroGenerator`].
//!
//! - [`iir`]: Low-pass, high-pass, band-pass, notch and all-pass biquad
//!   cascades from a prototype; [`iir::BiquadState`] for filtering and
//!   [`iir::frequency_response`] for analysis.
//!
//! - [`special`]: Factorials and Chebyshev polynomial coefficients.
//!
//! - [`ext`]: The [`Ext`] double-double scalar.
//!
//! ## Parameter handling
//!
//! Out-of-range parameters are clamped, never rejected; the values
//! actually used come back with every design. Only non-finite inputs and
//! root-finder failures are errors.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: `debug`
//! for clamped parameters and solver retries, `warn` for a failed band
//! split and for the first overflow of a running filter. No logger is
//! installed by the library.

pub mod ext;
pub mod iir;
pub mod prototype;
pub mod roots;
pub mod special;

pub use ext::Ext;
pub use num_complex::Complex;
