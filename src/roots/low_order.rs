//! Closed-form roots of polynomials of degree one through four.
//!
//! Coefficients are in descending order of power. The entry point
//! [`low_order_roots`] strips roots at the origin, scales the polynomial so
//! its trailing coefficient has unit magnitude, and reverses it when the
//! reciprocal polynomial is better conditioned. The per-degree kernels work
//! on monic, already-conditioned polynomials.
//!
//! Roots come back grouped so that each consecutive pair `(0, 1)`, `(2, 3)`
//! is a real-coefficient quadratic factor whenever the structure allows it:
//! conjugate pairs are always adjacent and carry bit-identical magnitudes.

use num_complex::Complex;

use crate::ext::Ext;

/// Absolute near-zero threshold on scaled intermediate quantities.
pub(crate) const ZERO_PLUS: f64 = 8.881_784_197_001_252e-16;
/// Relative near-zero threshold against the magnitude of the terms a
/// quantity was computed from.
const ZERO_RELATIVE: f64 = 16.0 * f64::EPSILON;

/// Newton steps applied to a real cubic root after the `f64` closed form.
const CUBIC_POLISH_STEPS: usize = 3;

/// A value is round-off only when it is small in absolute terms AND small
/// next to the terms it was formed from.
#[inline]
fn negligible(x: Ext, scale: Ext) -> bool {
    let ax = x.abs();
    ax.to_f64() <= ZERO_PLUS && ax <= scale * ZERO_RELATIVE
}

#[inline]
fn real(x: Ext) -> Complex<Ext> {
    Complex::new(x, Ext::ZERO)
}

/// Root of `x + b`.
#[inline]
pub fn linear_root(b: Ext) -> Complex<Ext> {
    real(-b)
}

/// Roots of the monic quadratic `x² + b·x + c`.
///
/// Real roots are computed with the cancellation-free form; complex roots
/// are returned as an adjacent conjugate pair `(re + j·im, re − j·im)`.
///
/// # Examples
///
/// ```
/// use iirkit::Ext;
/// use iirkit::roots::quad_roots;
///
/// // x² + 2x + 5 = 0  →  -1 ± 2j
/// let r = quad_roots(Ext::from(2.0), Ext::from(5.0));
/// assert_eq!(r[0].re.to_f64(), -1.0);
/// assert_eq!(r[0].im.to_f64(), 2.0);
/// assert_eq!(r[1].im.to_f64(), -2.0);
/// ```
pub fn quad_roots(b: Ext, c: Ext) -> [Complex<Ext>; 2] {
    if c.is_zero() {
        return [real(-b), real(Ext::ZERO)];
    }
    let half_b = b * 0.5;
    let hb2 = half_b * half_b;
    let mut disc = hb2 - c;
    if negligible(disc, hb2 + c.abs()) {
        disc = Ext::ZERO;
    }
    if disc >= Ext::ZERO {
        let root = disc.sqrt();
        let big = if half_b.is_sign_negative() {
            root - half_b
        } else {
            -half_b - root
        };
        let small = if big.is_zero() { Ext::ZERO } else { c / big };
        [real(big), real(small)]
    } else {
        let re = -half_b;
        let im = (-disc).sqrt();
        [Complex::new(re, im), Complex::new(re, -im)]
    }
}

/// `((y + a)·y + b)·y + c` and its derivative.
#[inline]
fn cubic_eval(a: Ext, b: Ext, c: Ext, y: Ext) -> (Ext, Ext) {
    let f = ((y + a) * y + b) * y + c;
    let df = (y * 3.0 + a * 2.0) * y + b;
    (f, df)
}

fn polish_cubic_root(a: Ext, b: Ext, c: Ext, mut y: Ext) -> Ext {
    for _ in 0..CUBIC_POLISH_STEPS {
        let (f, df) = cubic_eval(a, b, c, y);
        if df.is_zero() || !df.is_finite() {
            break;
        }
        let step = f / df;
        if !step.is_finite() {
            break;
        }
        y -= step;
    }
    y
}

/// Roots of the monic cubic `x³ + a·x² + b·x + c`.
///
/// One real root is found from the depressed form (Cardano when the
/// discriminant is positive, the trigonometric form when three real roots
/// exist), polished by Newton in extended precision, and divided out. The
/// remaining quadratic gives the other two. The real root is always
/// element 0; elements 1 and 2 form a quadratic factor.
pub fn cubic_roots(a: Ext, b: Ext, c: Ext) -> [Complex<Ext>; 3] {
    let third = a / 3.0;
    let p = b - a * third;
    let q = c - third * b + third * third * third * 2.0;
    let p_scale = b.abs() + (a * third).abs();
    let q_scale = c.abs() + (third * b).abs() + (third * third * third * 2.0).abs();

    let p_zero = negligible(p, p_scale);
    let q_zero = negligible(q, q_scale);
    if p_zero && q_zero {
        let y = -third;
        return [real(y), real(y), real(y)];
    }

    let half_q = q * 0.5;
    let p3 = p / 3.0;
    let mut disc = half_q * half_q + p3 * p3 * p3;
    if negligible(disc, half_q * half_q + (p3 * p3 * p3).abs()) {
        disc = Ext::ZERO;
    }

    let y1 = if disc.is_zero() {
        if p_zero {
            -third
        } else {
            // Simple root of a depressed cubic with a double root
            q * 3.0 / p - third
        }
    } else if disc > Ext::ZERO {
        let s = disc.sqrt();
        let w = if half_q.is_sign_negative() {
            s - half_q
        } else {
            -half_q - s
        };
        let u = w.cbrt();
        let v = if u.is_zero() { Ext::ZERO } else { -p / (u * 3.0) };
        u + v - third
    } else {
        // Three real roots, p < 0
        let pf = p.to_f64();
        let qf = q.to_f64();
        let r = 2.0 * (-pf / 3.0).sqrt();
        let arg = (3.0 * qf / (2.0 * pf) * (-3.0 / pf).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        let shift = third.to_f64();
        // Deflate by the largest-magnitude root
        let y = (0..3)
            .map(|k| r * (phi - 2.0 * core::f64::consts::PI * k as f64 / 3.0).cos() - shift)
            .fold(0.0_f64, |best, y| if y.abs() > best.abs() { y } else { best });
        Ext::from(y)
    };

    let y1 = polish_cubic_root(a, b, c, y1);
    let b1 = a + y1;
    let c1 = b + y1 * b1;
    let [r2, r3] = quad_roots(b1, c1);
    [real(y1), r2, r3]
}

/// Roots of the monic quartic `x⁴ + a·x³ + b·x² + c·x + d`.
///
/// The polynomial is depressed to `t⁴ + p·t² + q·t + r`. When `q` is
/// negligible it is solved as a biquadratic; otherwise Ferrari's method
/// splits it into two real quadratics using the largest real root of the
/// resolvent cubic `m³ + p·m² + (p²/4 − r)·m − q²/8`. Four coincident roots
/// are detected directly. Elements `(0, 1)` and `(2, 3)` are each the roots of
/// one real quadratic factor.
pub fn quartic_roots(a: Ext, b: Ext, c: Ext, d: Ext) -> [Complex<Ext>; 4] {
    let quarter = a * 0.25;
    let q2 = quarter * quarter;
    let p = b - q2 * 6.0;
    let q = c - b * quarter * 2.0 + q2 * quarter * 8.0;
    let r = d - c * quarter + b * q2 - q2 * q2 * 3.0;

    let p_scale = b.abs() + q2 * 6.0;
    let q_scale = c.abs() + (b * quarter * 2.0).abs() + (q2 * quarter * 8.0).abs();
    let r_scale = d.abs() + (c * quarter).abs() + (b * q2).abs() + q2 * q2 * 3.0;

    let q_zero = negligible(q, q_scale);
    if q_zero && negligible(p, p_scale) && negligible(r, r_scale) {
        let y = -quarter;
        return [real(y), real(y), real(y), real(y)];
    }

    let shift = |t: Complex<Ext>| Complex::new(t.re - quarter, t.im);

    let pairs = if q_zero {
        biquadratic(p, r)
    } else {
        let [m0, m1, m2] = cubic_roots(p, p * p * 0.25 - r, -(q * q) / 8.0);
        let m = [m0, m1, m2]
            .iter()
            .filter(|z| z.im.is_zero())
            .map(|z| z.re)
            .fold(Ext::from(f64::NEG_INFINITY), Ext::max);
        if m > Ext::ZERO && m.is_finite() {
            let s = (m * 2.0).sqrt();
            let base = p * 0.5 + m;
            let skew = q / (s * 2.0);
            [quad_roots(s, base - skew), quad_roots(-s, base + skew)]
        } else {
            log::debug!("quartic resolvent gave no positive root; treating as biquadratic");
            biquadratic(p, r)
        }
    };

    let [[t0, t1], [t2, t3]] = pairs;
    [shift(t0), shift(t1), shift(t2), shift(t3)]
}

/// `t⁴ + p·t² + r` as two real quadratic factors.
fn biquadratic(p: Ext, r: Ext) -> [[Complex<Ext>; 2]; 2] {
    let [z0, z1] = quad_roots(p, r);
    if z0.im.is_zero() {
        // (t² − z0)(t² − z1)
        [quad_roots(Ext::ZERO, -z0.re), quad_roots(Ext::ZERO, -z1.re)]
    } else {
        // p² < 4r, so r > 0: (t² + s·t + √r)(t² − s·t + √r) with s² = 2√r − p
        let sr = r.sqrt();
        let s = (sr * 2.0 - p).sqrt();
        [quad_roots(s, sr), quad_roots(-s, sr)]
    }
}

/// `1 / z` for a complex extended value.
#[inline]
fn invert(z: Complex<Ext>) -> Complex<Ext> {
    if z.im.is_zero() {
        return real(z.re.recip());
    }
    let m = z.re * z.re + z.im * z.im;
    Complex::new(z.re / m, -z.im / m)
}

/// Roots of a polynomial of degree 1 to 4 (descending coefficients,
/// non-zero leading coefficient).
///
/// Returns `None` for any other length.
pub fn low_order_roots(coeffs: &[Ext]) -> Option<Vec<Complex<Ext>>> {
    let degree = coeffs.len().checked_sub(1)?;
    if !(1..=4).contains(&degree) || coeffs[0].is_zero() {
        return None;
    }
    let lead = coeffs[0];
    let mut p: Vec<Ext> = coeffs.iter().map(|&c| c / lead).collect();

    let mut roots = Vec::with_capacity(degree);
    while p.len() > 1 && p[p.len() - 1].is_zero() {
        roots.push(real(Ext::ZERO));
        p.pop();
    }
    let n = p.len() - 1;
    if n == 0 {
        return Some(roots);
    }

    // x = s·y puts the trailing coefficient on the unit circle
    let s = Ext::from(p[n].to_f64().abs().powf(1.0 / n as f64));
    let mut sj = Ext::ONE;
    for coeff in p.iter_mut().skip(1) {
        sj *= s;
        *coeff /= sj;
    }

    // Reverse when the root sum outweighs the reciprocal root sum
    let reversed = n >= 2 && p[1].abs() > p[n - 1].abs();
    if reversed {
        p.reverse();
        let lead = p[0];
        for coeff in p.iter_mut() {
            *coeff /= lead;
        }
    }

    let found: Vec<Complex<Ext>> = match n {
        1 => vec![linear_root(p[1])],
        2 => quad_roots(p[1], p[2]).to_vec(),
        3 => cubic_roots(p[1], p[2], p[3]).to_vec(),
        _ => quartic_roots(p[1], p[2], p[3], p[4]).to_vec(),
    };

    roots.extend(found.into_iter().map(|z| {
        let z = if reversed { invert(z) } else { z };
        Complex::new(z.re * s, z.im * s)
    }));
    Some(roots)
}
