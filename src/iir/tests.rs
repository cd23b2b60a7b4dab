use super::split::{split_quartic, Quartic};
use super::*;
use crate::prototype::Family;

const TOL: f64 = 1e-10;
const DB_TOL: f64 = 0.05;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

/// Cascade magnitude at `omega` (fraction of Nyquist), evaluated with real
/// arithmetic independently of `frequency_response`.
fn mag(cascade: &BiquadCascade, omega: f64) -> f64 {
    let w = core::f64::consts::PI * omega;
    let (cos_w, sin_w) = (w.cos(), w.sin());
    let (cos_2w, sin_2w) = ((2.0 * w).cos(), (2.0 * w).sin());

    let mut mag_sq = 1.0;
    for s in &cascade.sections {
        let num_re = s.b[0] + s.b[1] * cos_w + s.b[2] * cos_2w;
        let num_im = -(s.b[1] * sin_w + s.b[2] * sin_2w);
        let den_re = 1.0 + s.a[1] * cos_w + s.a[2] * cos_2w;
        let den_im = -(s.a[1] * sin_w + s.a[2] * sin_2w);
        mag_sq *= s.a[0] * s.a[0] * (num_re * num_re + num_im * num_im)
            / (den_re * den_re + den_im * den_im);
    }
    mag_sq.sqrt()
}

fn db(cascade: &BiquadCascade, omega: f64) -> f64 {
    20.0 * mag(cascade, omega).log10()
}

fn design(shape: ResponseShape, omega_c: f64, proto: LowPassParams) -> IirDesign {
    design_iir_filter(&IirParams::new(shape, omega_c, proto)).unwrap()
}

fn butterworth(poles: usize) -> LowPassParams {
    LowPassParams::new(Family::Butterworth, poles)
}

// ═══════════════════════════════════════════════════════════════════
// Low-pass and high-pass
// ═══════════════════════════════════════════════════════════════════

#[test]
fn lowpass_butterworth() {
    let d = design(ResponseShape::LowPass, 0.3, butterworth(4));
    assert_eq!(d.cascade.num_sections(), 2);
    assert_eq!(d.cascade.order(), 4);
    assert!(d.degenerate.is_empty());
    for s in &d.cascade.sections {
        assert_eq!(s.a[0], 1.0);
    }
    assert_near(db(&d.cascade, 0.0), 0.0, 1e-9, "DC");
    assert_near(db(&d.cascade, 0.3), -3.0103, 1e-3, "corner");
    assert!(db(&d.cascade, 0.9) < -60.0);
}

#[test]
fn lowpass_odd_order_first_order_section() {
    let d = design(ResponseShape::LowPass, 0.2, butterworth(5));
    assert_eq!(d.cascade.num_sections(), 3);
    assert_eq!(d.cascade.order(), 5);
    assert_eq!(
        d.cascade.sections.iter().filter(|s| s.is_first_order()).count(),
        1
    );
    assert_near(db(&d.cascade, 0.2), -3.0103, 1e-3, "corner");
}

#[test]
fn lowpass_every_family() {
    for family in Family::ALL {
        let d = design(ResponseShape::LowPass, 0.25, LowPassParams::new(family, 6));
        assert!(d.cascade.is_valid(), "{}", family);
        assert_near(db(&d.cascade, 0.0), 0.0, 1e-9, &format!("{} DC", family));
        assert_near(db(&d.cascade, 0.25), -3.0103, DB_TOL, &format!("{}", family));
    }
}

#[test]
fn lowpass_elliptic_zeros_in_stop_band() {
    let proto = LowPassParams::new(Family::Elliptic, 5)
        .with_ripple(0.1)
        .with_stop_band(50.0);
    let d = design(ResponseShape::LowPass, 0.2, proto);
    assert_eq!(d.cascade.num_sections(), 3);
    // Transmission zeros give b0 = b2 in the second-order sections
    for s in d.cascade.sections.iter().filter(|s| !s.is_first_order()) {
        assert_near(s.b[0], s.b[2], 1e-12, "symmetric numerator");
    }
    assert!(db(&d.cascade, 0.5) < -45.0);
}

#[test]
fn highpass_butterworth() {
    let d = design(ResponseShape::HighPass, 0.3, butterworth(4));
    assert_eq!(d.cascade.num_sections(), 2);
    assert_near(db(&d.cascade, 1.0), 0.0, 1e-9, "Nyquist");
    assert_near(db(&d.cascade, 0.3), -3.0103, 1e-3, "corner");
    assert!(db(&d.cascade, 0.02) < -60.0);
}

#[test]
fn highpass_odd_order() {
    let d = design(ResponseShape::HighPass, 0.4, LowPassParams::new(Family::Chebyshev, 3));
    assert_eq!(d.cascade.order(), 3);
    assert_near(db(&d.cascade, 0.4), -3.0103, DB_TOL, "corner");
}

// ═══════════════════════════════════════════════════════════════════
// Band-pass and notch
// ═══════════════════════════════════════════════════════════════════

#[test]
fn bandpass_all_pole() {
    let params = IirParams::new(ResponseShape::BandPass, 0.3, butterworth(4)).with_bandwidth(0.1);
    let d = design_iir_filter(&params).unwrap();
    assert_eq!(d.cascade.num_sections(), 4);
    assert!(d.degenerate.is_empty());
    for s in &d.cascade.sections {
        assert_eq!(s.a[0], 1.0);
        // (z⁻² − 1): zeros at DC and Nyquist
        assert_eq!(s.b[1], 0.0);
        assert_near(s.b[0], -s.b[2], 1e-12, "b0 = -b2");
    }
    assert_near(db(&d.cascade, 0.3), 0.0, DB_TOL, "center");
    assert!(mag(&d.cascade, 0.0) < 1e-9);
    assert!(db(&d.cascade, 0.05) < -40.0);
    assert!(db(&d.cascade, 0.8) < -40.0);
}

#[test]
fn bandpass_odd_poles() {
    let d = design(ResponseShape::BandPass, 0.35, LowPassParams::new(Family::Bessel, 3));
    assert_eq!(d.cascade.num_sections(), 3);
    assert_near(db(&d.cascade, 0.35), 0.0, DB_TOL, "center");
}

#[test]
fn bandpass_center_at_half_nyquist() {
    // T = 2: odd quartic terms are zeroed before the split
    let d = design(ResponseShape::BandPass, 0.5, LowPassParams::new(Family::Chebyshev, 4));
    assert!(d.cascade.is_valid());
    assert_near(db(&d.cascade, 0.5), 0.0, DB_TOL, "center");
    assert!(db(&d.cascade, 0.1) < -30.0);
}

#[test]
fn bandpass_with_prototype_zeros() {
    let proto = LowPassParams::new(Family::InverseChebyshev, 4).with_stop_band(40.0);
    let d = design(ResponseShape::BandPass, 0.4, proto);
    assert_eq!(d.cascade.num_sections(), 4);
    assert!(d.cascade.is_valid());
    assert_near(db(&d.cascade, 0.4), 0.0, DB_TOL, "center");
    assert!(db(&d.cascade, 0.05) < -39.0);
}

#[test]
fn notch_butterworth() {
    let params = IirParams::new(ResponseShape::Notch, 0.4, butterworth(2)).with_bandwidth(0.1);
    let d = design_iir_filter(&params).unwrap();
    assert_eq!(d.cascade.num_sections(), 2);
    assert!(d.cascade.is_valid());
    assert!(mag(&d.cascade, 0.4) < 1e-4, "notch depth");
    assert_near(db(&d.cascade, 0.0), 0.0, DB_TOL, "DC");
    assert_near(db(&d.cascade, 1.0), 0.0, DB_TOL, "Nyquist");
}

#[test]
fn notch_odd_poles() {
    let d = design(ResponseShape::Notch, 0.3, butterworth(3));
    assert_eq!(d.cascade.num_sections(), 3);
    assert!(mag(&d.cascade, 0.3) < 1e-4, "notch depth");
}

#[test]
fn split_failure_reports_error() {
    let quartic = Quartic {
        den: [0.0; 5],
        num: [1.0, 0.0, -2.0, 0.0, 1.0],
    };
    assert!(split_quartic(&quartic, false).is_err());
}

#[test]
fn split_multiplies_back() {
    // (x² + 0.5x + 0.3)(x² − 0.4x + 0.2)·4
    let den = crate::roots::multiply(&[1.0, 0.5, 0.3], &[1.0, -0.4, 0.2]);
    let den: Vec<f64> = den.iter().map(|c| 4.0 * c).collect();
    let quartic = Quartic {
        den: [den[0], den[1], den[2], den[3], den[4]],
        num: [1.0, 0.0, -2.0, 0.0, 1.0],
    };
    let [s0, s1] = split_quartic(&quartic, true).unwrap();
    // Sections store x⁰ first
    let f0 = [s0.a[2], s0.a[1], s0.a[0]];
    let f1 = [s1.a[2], s1.a[1], s1.a[0]];
    let prod = crate::roots::multiply(&f0, &f1);
    for (p, d) in prod.iter().zip(den.iter()) {
        assert_near(*p, *d, 1e-12, "denominator");
    }
    assert_eq!(s0.b, [-1.0, 0.0, 1.0]);
    assert_eq!(s1.b, [-1.0, 0.0, 1.0]);
}

// ═══════════════════════════════════════════════════════════════════
// All-pass and gain
// ═══════════════════════════════════════════════════════════════════

#[test]
fn allpass_mirrors_denominator() {
    let d = design(ResponseShape::AllPass, 0.3, LowPassParams::new(Family::Gaussian, 5));
    for s in &d.cascade.sections {
        if s.is_first_order() {
            assert_near(s.b[0], s.a[1], TOL, "b0");
            assert_near(s.b[1], s.a[0], TOL, "b1");
        } else {
            assert_near(s.b[0], s.a[2], TOL, "b0");
            assert_near(s.b[1], s.a[1], TOL, "b1");
            assert_near(s.b[2], s.a[0], TOL, "b2");
        }
    }
    for j in 0..=100 {
        let w = j as f64 * 0.01;
        assert!(db(&d.cascade, w).abs() < 0.1, "w = {}", w);
    }
}

#[test]
fn allpass_discards_prototype_zeros() {
    let d = design(ResponseShape::AllPass, 0.2, LowPassParams::new(Family::Elliptic, 4));
    for j in 0..=100 {
        assert!(db(&d.cascade, j as f64 * 0.01).abs() < 0.1);
    }
}

#[test]
fn gain_spread_over_sections() {
    let params = IirParams::new(ResponseShape::LowPass, 0.3, butterworth(6)).with_gain_db(6.0);
    let d = design_iir_filter(&params).unwrap();
    assert_near(db(&d.cascade, 0.0), 6.0, 1e-9, "DC gain");

    let plain = design(ResponseShape::LowPass, 0.3, butterworth(6));
    let ratio = d.cascade.sections[0].b[0] / plain.cascade.sections[0].b[0];
    assert_near(ratio, 10f64.powf(6.0 / 20.0 / 3.0), 1e-12, "section gain");
}

#[test]
fn gain_in_a0() {
    let params = IirParams::new(ResponseShape::LowPass, 0.3, butterworth(4))
        .with_gain_db(-12.0)
        .with_gain_placement(GainPlacement::A0);
    let d = design_iir_filter(&params).unwrap();
    let expected = 10f64.powf(-12.0 / 20.0 / 2.0);
    for s in &d.cascade.sections {
        assert_near(s.a[0], expected, 1e-12, "a0");
    }
    assert_near(db(&d.cascade, 0.0), -12.0, 1e-9, "DC gain");
    let resp = frequency_response(&d.cascade, 10);
    assert_near(resp.magnitude_db()[0], -12.0, 1e-9, "response DC");
}

// ═══════════════════════════════════════════════════════════════════
// Parameters
// ═══════════════════════════════════════════════════════════════════

#[test]
fn params_clamped() {
    let p = IirParams::new(ResponseShape::BandPass, 2.0, butterworth(30))
        .with_bandwidth(0.0)
        .clamped()
        .unwrap();
    assert_eq!(p.omega_c, 0.9999);
    assert_eq!(p.bandwidth, 0.0001);
    assert_eq!(p.prototype.poles, 20);

    let p = IirParams::new(ResponseShape::LowPass, -1.0, butterworth(2))
        .clamped()
        .unwrap();
    assert_eq!(p.omega_c, 0.0001);
}

#[test]
fn design_reports_effective_params() {
    let d = design(ResponseShape::LowPass, 1.5, LowPassParams::new(Family::Bessel, 15));
    assert_eq!(d.params.omega_c, 0.9999);
    assert_eq!(d.params.prototype.poles, 12);
    assert_eq!(d.cascade.num_sections(), 6);
}

#[test]
fn non_finite_params_rejected() {
    let proto = butterworth(4);
    let err = |p: IirParams| design_iir_filter(&p).unwrap_err();
    assert_eq!(
        err(IirParams::new(ResponseShape::LowPass, f64::NAN, proto)),
        DesignError::InvalidFrequency
    );
    assert_eq!(
        err(IirParams::new(ResponseShape::Notch, 0.3, proto).with_bandwidth(f64::INFINITY)),
        DesignError::InvalidBandwidth
    );
    assert_eq!(
        err(IirParams::new(ResponseShape::LowPass, 0.3, proto).with_gain_db(f64::NAN)),
        DesignError::InvalidGain
    );
}

#[test]
fn error_display() {
    let e = DesignError::Prototype(RootError::NoConvergence { degree: 6 });
    assert!(e.to_string().contains("6 roots remaining"));
    assert_eq!(DesignError::InvalidGain.to_string(), "gain must be finite");
}

// ═══════════════════════════════════════════════════════════════════
// Cascade validity
// ═══════════════════════════════════════════════════════════════════

#[test]
fn zero_section_invalidates_cascade() {
    let good = ZSection {
        a: [1.0, -0.5, 0.0],
        b: [0.5, 0.0, 0.0],
    };
    let cascade = BiquadCascade {
        sections: vec![good, ZSection::default()],
    };
    assert!(ZSection::default().is_zero());
    assert!(!cascade.is_valid());
    assert!(!BiquadCascade::default().is_valid());
    assert!(BiquadCascade { sections: vec![good] }.is_valid());
}

// ═══════════════════════════════════════════════════════════════════
// Runtime
// ═══════════════════════════════════════════════════════════════════

#[test]
fn runtime_impulse_two_sections() {
    // y = x + 0.5·y[n−1], twice
    let sec = ZSection {
        a: [1.0, -0.5, 0.0],
        b: [1.0, 0.0, 0.0],
    };
    let cascade = BiquadCascade {
        sections: vec![sec, sec],
    };
    let mut state = BiquadState::for_cascade(&cascade);
    let out = state.process(&cascade, &[1.0, 0.0, 0.0]);
    // (n + 1)·0.5ⁿ
    assert_eq!(out.samples, vec![1.0, 1.0, 0.75]);
    assert_eq!(state.history(1), Some((0.25, 0.5, 0.75, 1.0)));
    assert_eq!(state.history(2), None);
}

#[test]
fn runtime_state_carries_over_and_resets() {
    let d = design(ResponseShape::LowPass, 0.2, butterworth(4));
    let input: Vec<f64> = (0..64).map(|j| (j as f64 * 0.3).sin()).collect();

    let mut whole = BiquadState::for_cascade(&d.cascade);
    let all = whole.process(&d.cascade, &input).samples;

    let mut split = BiquadState::for_cascade(&d.cascade);
    let mut parts = split.process(&d.cascade, &input[..20]).samples;
    parts.extend(split.process(&d.cascade, &input[20..]).samples);
    assert_eq!(all, parts);

    split.reset();
    assert!(split.is_cleared());
    let again = split.process(&d.cascade, &input).samples;
    assert_eq!(all, again);
}

#[test]
fn runtime_resizes_state() {
    let d = design(ResponseShape::LowPass, 0.2, butterworth(6));
    let mut state = BiquadState::new(1);
    let out = filter_signal(&d.cascade, &mut state, &[1.0, 0.0]);
    assert_eq!(out.samples.len(), 2);
    assert!(state.history(2).is_some());
}

#[test]
fn runtime_overflow_reported_once() {
    let cascade = BiquadCascade {
        sections: vec![ZSection {
            a: [1.0, 0.0, 0.0],
            b: [1.0e21, 0.0, 0.0],
        }],
    };
    let mut state = BiquadState::for_cascade(&cascade);

    let first = filter_signal(&cascade, &mut state, &[1.0]);
    let overflow = first.overflow.unwrap();
    assert_eq!(overflow.peak, 1.0e21);
    assert_eq!(overflow.sample, 0);
    assert!(state.is_cleared());

    let mut reports = 0;
    for _ in 0..1000 {
        if filter_signal(&cascade, &mut state, &[1.0]).overflow.is_some() {
            reports += 1;
        }
        assert!(state.is_cleared());
    }
    assert_eq!(reports, 0);
}

#[test]
fn runtime_overflow_mid_signal_keeps_filtering() {
    // Pole at z = 2
    let cascade = BiquadCascade {
        sections: vec![ZSection {
            a: [1.0, -2.0, 0.0],
            b: [1.0, 0.0, 0.0],
        }],
    };
    let mut state = BiquadState::for_cascade(&cascade);
    let input = vec![1.0; 200];
    let out = filter_signal(&cascade, &mut state, &input);
    assert_eq!(out.samples.len(), 200);
    assert!(out.samples.iter().all(|y| y.is_finite()));
    assert!(out.overflow.is_some());
}

// ═══════════════════════════════════════════════════════════════════
// Frequency response
// ═══════════════════════════════════════════════════════════════════

#[test]
fn response_matches_direct_evaluation() {
    let d = design(ResponseShape::HighPass, 0.35, LowPassParams::new(Family::Papoulis, 5));
    let resp = frequency_response(&d.cascade, 200);
    assert_eq!(resp.len(), 200);
    let freqs = resp.frequencies();
    let m = resp.magnitude();
    for j in (0..200).step_by(7) {
        assert_near(m[j], mag(&d.cascade, freqs[j]), 1e-9, "magnitude");
    }
}

#[test]
fn response_idempotent() {
    let d = design(ResponseShape::BandPass, 0.3, LowPassParams::new(Family::Elliptic, 4));
    let a = frequency_response(&d.cascade, 512);
    let b = frequency_response(&d.cascade, 512);
    assert_eq!(a, b);
}

#[test]
fn response_floors_denominator() {
    // Double pole at z = 1
    let cascade = BiquadCascade {
        sections: vec![ZSection {
            a: [1.0, -2.0, 1.0],
            b: [1.0, 0.0, 0.0],
        }],
    };
    let resp = frequency_response(&cascade, 16);
    assert_near(resp.re[0], 1.0e12, 1.0, "floored DC");
    assert!(resp.re.iter().chain(resp.im.iter()).all(|v| v.is_finite()));
}

#[test]
fn response_phase_of_delay() {
    // Pure one-sample delay: phase −πj/N
    let cascade = BiquadCascade {
        sections: vec![ZSection {
            a: [1.0, 0.0, 0.0],
            b: [0.0, 1.0, 0.0],
        }],
    };
    let resp = frequency_response(&cascade, 8);
    let phase = resp.phase();
    for (j, p) in phase.iter().enumerate() {
        assert_near(*p, -core::f64::consts::PI * j as f64 / 8.0, 1e-12, "phase");
    }
    assert!(resp.magnitude_db().iter().all(|m| m.abs() < 1e-12));
}
