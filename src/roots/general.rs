//! General polynomial root finder for degrees up to [`MAX_DEGREE`].
//!
//! A Jenkins-Traub style solver. Quadratic factors `x² + u·x + v` are
//! refined by JT quadratic iteration seeded from a table of angles on a
//! circle of radius `|P[N]|^(1/N) / 2`; when that stalls, a damped Newton
//! variant looks for a single real root. Each factor found is divided out
//! and the search repeats on the quotient until degree four or less
//! remains, which is handed to the closed-form solver.
//!
//! Every seed is tried with four different initialisations of the `K`
//! polynomial before giving up. All arithmetic is done in [`Ext`].

use num_complex::Complex;

use super::low_order::{low_order_roots, quad_roots};
use super::poly::derivative;
use super::RootError;
use crate::ext::Ext;

/// Largest polynomial degree accepted.
pub const MAX_DEGREE: usize = 100;

/// Convergence threshold, the unit roundoff of a 64-bit significand.
pub(crate) const CONVERGENCE_EPS: f64 = 1.084_202_172_485_504_4e-19;

const TINY: f64 = 1.0e-30;
const HUGE: f64 = 1.0e200;
const QUAD_ITER_MAX: usize = 20;
const REAL_ITER_MAX: usize = 20;

/// Seed angles in degrees. Conjugate symmetry means only the upper half
/// plane is searched; the first two find nearly every factor.
#[rustfmt::skip]
const SEED_ANGLES: [f64; 180] = [
    45.0, 135.0, 0.0, 90.0, 15.0, 30.0, 60.0, 75.0, 105.0, 120.0, 150.0, 165.0,
    6.0, 51.0, 96.0, 141.0, 12.0, 57.0, 102.0, 147.0, 21.0, 66.0, 111.0, 156.0,
    27.0, 72.0, 117.0, 162.0, 36.0, 81.0, 126.0, 171.0, 42.0, 87.0, 132.0, 177.0,
    3.0, 48.0, 93.0, 138.0, 9.0, 54.0, 99.0, 144.0, 18.0, 63.0, 108.0, 153.0,
    24.0, 69.0, 114.0, 159.0, 33.0, 78.0, 123.0, 168.0, 39.0, 84.0, 129.0, 174.0,
    46.0, 136.0, 91.0, 1.0, 16.0, 31.0, 61.0, 76.0, 106.0, 121.0, 151.0, 166.0,
    7.0, 52.0, 97.0, 142.0, 13.0, 58.0, 103.0, 148.0, 22.0, 67.0, 112.0, 157.0,
    28.0, 73.0, 118.0, 163.0, 37.0, 82.0, 127.0, 172.0, 43.0, 88.0, 133.0, 178.0,
    4.0, 49.0, 94.0, 139.0, 10.0, 55.0, 100.0, 145.0, 19.0, 64.0, 109.0, 154.0,
    25.0, 70.0, 115.0, 160.0, 34.0, 79.0, 124.0, 169.0, 40.0, 85.0, 130.0, 175.0,
    47.0, 137.0, 92.0, 2.0, 17.0, 32.0, 62.0, 77.0, 107.0, 122.0, 152.0, 167.0,
    8.0, 53.0, 98.0, 143.0, 14.0, 59.0, 104.0, 149.0, 23.0, 68.0, 113.0, 158.0,
    29.0, 74.0, 119.0, 164.0, 38.0, 83.0, 128.0, 173.0, 44.0, 89.0, 134.0, 179.0,
    5.0, 50.0, 95.0, 140.0, 11.0, 56.0, 101.0, 146.0, 20.0, 65.0, 110.0, 155.0,
    26.0, 71.0, 116.0, 161.0, 35.0, 80.0, 125.0, 170.0, 41.0, 86.0, 131.0, 176.0,
];

/// Index of the 0° seed, which starts from two real roots at `±X`.
const REAL_AXIS_SEED: usize = 2;

/// Initialisations of the quadratic-iteration `K` polynomial, in the order
/// they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KInit {
    SecondDerivative,
    Quotient,
    ShiftedDerivative,
    Unit,
}

impl KInit {
    const ALL: [KInit; 4] = [
        KInit::SecondDerivative,
        KInit::Quotient,
        KInit::ShiftedDerivative,
        KInit::Unit,
    ];
}

/// Outcome of a quadratic update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Updated,
    /// Divergence or a degenerate factor; move to the next seed.
    BadAngle,
    /// Both corrections vanished; accept if the error is small enough.
    ZeroDelta,
    DamperOn,
    DamperOff,
}

enum Found {
    Quadratic,
    Real(Ext),
}

/// `q = p / (x² + u·x + v)` for the degree-`n` polynomial `p`.
///
/// `q[0..=n-2]` is the quotient; `q[n-1]` and `q[n+1]` carry the remainder.
fn quad_syn_div(p: &[Ext], n: usize, tuv: &[Ext; 3], q: &mut [Ext]) {
    let (u, v) = (tuv[1], tuv[2]);
    q[0] = p[0];
    q[1] = p[1] - u * q[0];
    for j in 2..=n {
        q[j] = p[j] - u * q[j - 1] - v * q[j - 2];
    }
    q[n + 1] = q[n - 1] * u + q[n];
}

/// Scale factor `s` with `|p[n]| = s^n` for a monic `p` of degree `n`.
///
/// Substituting `x = s·y` moves the root product onto the unit circle, so
/// the squared residuals of the quadratic iteration stay within `f64`
/// exponent range however large or small the roots are.
fn unit_scale(p: &[Ext], n: usize) -> Ext {
    let s = p[n].to_f64().abs().powf(1.0 / n as f64);
    if s.is_finite() && s > 0.0 {
        Ext::from(s)
    } else {
        Ext::ONE
    }
}

/// `p[j] ← p[j]·f^j`, which multiplies every root of `p` by `f`.
fn scale_roots(p: &mut [Ext], f: Ext) {
    for (j, c) in p.iter_mut().enumerate().skip(1) {
        *c *= f.powi(j as i32);
    }
}

/// Scratch polynomials and iteration state for one solve.
///
/// The damper and previous-residual trackers live here rather than in
/// function-local statics, so concurrent solves do not interfere.
struct Workspace {
    p: Vec<Ext>,
    quad_qp: Vec<Ext>,
    real_qp: Vec<Ext>,
    quad_k: Vec<Ext>,
    real_k: Vec<Ext>,
    qk: Vec<Ext>,
    tuv: [Ext; 3],
    status: Status,
    first_damper_iter: usize,
    prev_qpn: Ext,
}

impl Workspace {
    fn new(p: Vec<Ext>) -> Self {
        let len = p.len() + 2;
        Self {
            p,
            quad_qp: vec![Ext::ZERO; len],
            real_qp: vec![Ext::ZERO; len],
            quad_k: vec![Ext::ZERO; len],
            real_k: vec![Ext::ZERO; len],
            qk: vec![Ext::ZERO; len],
            tuv: [Ext::ONE, Ext::ZERO, Ext::ZERO],
            status: Status::Updated,
            first_damper_iter: 0,
            prev_qpn: Ext::ZERO,
        }
    }

    /// Seed the quadratic factor and both `K` polynomials.
    fn seed(&mut self, n: usize, x: Ext, angle: usize, k_init: KInit) {
        self.tuv = if angle == REAL_AXIS_SEED {
            [Ext::ONE, Ext::ZERO, -(x * x)]
        } else {
            let theta = SEED_ANGLES[angle].to_radians();
            let a = x * theta.cos();
            [Ext::ONE, a * -2.0, x * x]
        };

        let dp = derivative(&self.p[..=n]);
        self.real_k[..n].copy_from_slice(&dp);
        self.real_k[n] = Ext::ZERO;

        let k = &mut self.quad_k;
        match k_init {
            KInit::SecondDerivative => {
                let d2 = derivative(&dp);
                k[..n - 1].copy_from_slice(&d2);
                k[n] = Ext::ZERO;
                k[n - 1] = Ext::ZERO;
            }
            KInit::Quotient => {
                quad_syn_div(&self.p, n, &self.tuv, k);
                k[n] = Ext::ZERO;
                k[n - 1] = Ext::ZERO;
            }
            KInit::ShiftedDerivative => {
                for j in 0..=n - 2 {
                    k[j] = self.real_k[j + 1];
                }
                k[n] = Ext::ZERO;
                k[n - 1] = Ext::ZERO;
            }
            KInit::Unit => {
                for c in k[1..=n].iter_mut() {
                    *c = Ext::ZERO;
                }
                k[0] = Ext::ONE;
            }
        }

        if k[0].is_zero() {
            k[0] = Ext::ONE;
        }
        let lead = k[0];
        for c in k[1..=n - 2].iter_mut() {
            *c /= lead;
        }
        k[0] = Ext::ONE;
    }

    /// Refine the current quadratic factor. Returns `true` once it divides
    /// `p` to within the convergence threshold.
    fn quad_iterate(&mut self, pass: usize, n: usize) -> bool {
        let pn = self.p[n].abs();
        let err_scale = (pn * (16.0 * (n as f64).powi(3))).recip();
        let base_iter = pass * QUAD_ITER_MAX;
        let mut min_err = Ext::from(1.0e100);

        self.status = Status::Updated;
        quad_syn_div(&self.p, n, &self.tuv, &mut self.quad_qp);
        quad_syn_div(&self.quad_k, n - 1, &self.tuv, &mut self.qk);

        for iter in 0..QUAD_ITER_MAX {
            self.update_tuv(base_iter + iter, n);
            if self.status == Status::BadAngle {
                return false;
            }

            let qp = &self.quad_qp;
            let err = (qp[n - 1].abs() + qp[n + 1].abs()) * err_scale;
            if !err.is_finite() {
                self.status = Status::BadAngle;
                return false;
            }
            if err < Ext::from(CONVERGENCE_EPS) {
                return true;
            }

            if self.status == Status::ZeroDelta {
                if err < Ext::from(4.0 * n as f64 * CONVERGENCE_EPS) {
                    self.status = Status::Updated;
                    return true;
                }
                self.status = Status::BadAngle;
                return false;
            }

            let qk_check = (self.qk[n - 2].abs() + self.qk[n].abs()) * err_scale;
            if err > Ext::from(HUGE) || !(qk_check <= Ext::from(HUGE)) {
                self.status = Status::BadAngle;
                return false;
            }

            if err < min_err {
                self.status = Status::DamperOff;
                min_err = err;
            } else if iter > 2 {
                self.status = Status::DamperOn;
            }
        }

        self.status = Status::Updated;
        false
    }

    /// One JT update of `u` and `v`.
    fn update_tuv(&mut self, iter: usize, n: usize) {
        if iter == 0 {
            self.first_damper_iter = 0;
        }
        if self.status == Status::DamperOn {
            self.first_damper_iter = iter;
        }

        let Workspace {
            p,
            quad_qp: qp,
            quad_k: k,
            qk,
            tuv,
            ..
        } = self;
        let (u, v) = (tuv[1], tuv[2]);
        let huge = Ext::from(HUGE);
        let eps = Ext::from(CONVERGENCE_EPS);

        let e2 = qp[n] * qp[n] + u * qp[n] * qp[n - 1] + v * qp[n - 1] * qp[n - 1];
        let e3 = qp[n] * qk[n - 1] + u * qp[n] * qk[n - 2] + v * qp[n - 1] * qk[n - 2];

        if e3.abs() * huge > e2.abs() {
            let scale = -e2 / e3;
            for j in 1..=n - 2 {
                k[j] = scale * qk[j - 1] + qp[j];
            }
        } else {
            for j in 1..=n - 2 {
                k[j] = qk[j - 1];
            }
        }
        k[0] = qp[0];
        k[n - 1] = Ext::ZERO;

        quad_syn_div(k, n - 1, tuv, qk);

        let e3 = qp[n] * qk[n - 1] + u * qp[n] * qk[n - 2] + v * qp[n - 1] * qk[n - 2];
        let e4 = qk[n - 1] * qk[n - 1] + u * qk[n - 1] * qk[n - 2] + v * qk[n - 2] * qk[n - 2];
        let e5 = qp[n - 1] * qk[n - 1] - qp[n] * qk[n - 2];

        let denom = e5 * k[n - 2] * v + e4 * p[n];
        if !(denom.abs() * huge >= p[n].abs()) {
            self.status = Status::BadAngle;
            return;
        }

        let mut del_u = e3 * k[n - 2] * v / denom;
        if del_u.abs() < eps * u.abs() {
            del_u = if del_u.is_sign_negative() {
                -(u.abs() * eps)
            } else {
                u.abs() * eps
            };
        }

        let mut del_v = -e5 * k[n - 2] * v * v / denom;
        if del_v.abs() < eps * v.abs() {
            del_v = if del_v.is_sign_negative() {
                -(v.abs() * eps)
            } else {
                v.abs() * eps
            };
        }

        if iter >= QUAD_ITER_MAX - 1 {
            let eps8 = eps * 8.0;
            if del_u.abs() < eps8 * u.abs() && del_v.abs() < eps8 * v.abs() {
                self.status = Status::ZeroDelta;
                return;
            }
            if del_u.abs() > u.abs() * 10.0 || del_v.abs() > v.abs() * 10.0 {
                self.status = Status::BadAngle;
                return;
            }
        }

        if iter.saturating_sub(self.first_damper_iter) < 3 {
            del_u *= 0.75;
            del_v *= 0.75;
        }

        tuv[1] += del_u;
        if (tuv[2] + del_v).abs() < Ext::from(TINY) {
            del_v *= 0.9;
        }
        tuv[2] += del_v;

        if !tuv[1].is_finite() || !tuv[2].is_finite() || tuv[2].abs() < tuv[1].abs() * TINY {
            self.status = Status::BadAngle;
            return;
        }

        self.status = Status::Updated;
        quad_syn_div(p, n, tuv, qp);
    }

    /// Damped Newton search for one real root starting at `x`.
    fn real_iterate(&mut self, pass: usize, n: usize, mut x: Ext) -> Option<Ext> {
        let Workspace {
            p,
            real_qp: qp,
            real_k: k,
            qk,
            prev_qpn,
            ..
        } = self;
        let pn = p[n].abs();
        let err_scale = (pn * (16.0 * (n as f64).powi(2))).recip();
        let eps = Ext::from(CONVERGENCE_EPS);
        let huge = Ext::from(HUGE);

        if pass == 0 {
            *prev_qpn = Ext::ZERO;
        }
        qk[0] = k[0];
        for j in 1..n {
            qk[j] = qk[j - 1] * x + k[j];
        }

        for _ in 0..REAL_ITER_MAX {
            qp[0] = p[0];
            for j in 1..=n {
                qp[j] = qp[j - 1] * x + p[j];
            }
            let err = qp[n].abs() * err_scale;
            if err < eps {
                return Some(x);
            }
            if !(err <= huge) {
                return None;
            }

            if qk[n - 1].abs() > pn * TINY {
                let del = -qp[n] / qk[n - 1];
                k[0] = qp[0];
                for j in 1..n {
                    k[j] = del * qk[j - 1] + qp[j];
                }
            } else {
                k[0] = Ext::ZERO;
                for j in 1..n {
                    k[j] = qk[j - 1];
                }
            }
            if !(k[n - 1].abs() <= huge) {
                return None;
            }

            qk[0] = k[0];
            for j in 1..n {
                qk[j] = qk[j - 1] * x + k[j];
            }
            if !(qk[n - 1].abs() > pn * TINY) {
                return None;
            }

            // Oscillation about a root shows up as residuals of opposite sign
            let damper = if (qp[n] + *prev_qpn).abs() < qp[n].abs() {
                0.5
            } else {
                1.0
            };
            *prev_qpn = qp[n];

            let mut del = qp[n] / qk[n - 1] * damper;
            if !x.is_zero() {
                if del.abs() < eps * x.abs() {
                    del = if del.is_sign_negative() {
                        -(x * eps * 2.0)
                    } else {
                        x * eps * 2.0
                    };
                }
            } else if del.is_zero() {
                return None;
            }
            x -= del;
        }
        None
    }

    /// Search for one real root or quadratic factor of the degree-`n`
    /// polynomial currently in `p`.
    fn find_factor(&mut self, n: usize) -> Option<Found> {
        let radius = Ext::from(self.p[n].to_f64().abs().powf(1.0 / n as f64) / 2.0);
        for k_init in KInit::ALL {
            for angle in 0..SEED_ANGLES.len() {
                self.seed(n, radius, angle, k_init);
                for pass in 0..n {
                    if self.quad_iterate(pass, n) {
                        return Some(Found::Quadratic);
                    }
                    let guess = if self.quad_k[n - 2].abs() > self.p[n].abs() * TINY {
                        -self.p[n] / self.quad_k[n - 2]
                    } else {
                        Ext::ZERO
                    };
                    if let Some(x) = self.real_iterate(pass, n, guess) {
                        return Some(Found::Real(x));
                    }
                    if self.status == Status::BadAngle {
                        break;
                    }
                }
            }
            log::debug!("no factor from {:?} seeds at degree {}", k_init, n);
        }
        None
    }
}

/// Roots of a real polynomial given in extended precision, coefficients
/// in descending order of power.
///
/// Near-zero trailing coefficients become roots at the origin; leading
/// zeros lower the degree, so the result has one root per power of the
/// trimmed polynomial. Conjugate pairs are adjacent with bit-identical
/// magnitudes.
///
/// # Errors
///
/// - [`RootError::DegreeOutOfRange`] for an empty slice or degree above
///   [`MAX_DEGREE`].
/// - [`RootError::NotFinite`] if any coefficient is NaN or infinite.
/// - [`RootError::ZeroPolynomial`] if every coefficient is zero.
/// - [`RootError::NoConvergence`] if every seed is exhausted.
pub fn find_roots_ext(coeffs: &[Ext]) -> Result<Vec<Complex<Ext>>, RootError> {
    if coeffs.is_empty() || coeffs.len() - 1 > MAX_DEGREE {
        return Err(RootError::DegreeOutOfRange);
    }
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(RootError::NotFinite);
    }
    if coeffs.iter().all(|c| c.is_zero()) {
        return Err(RootError::ZeroPolynomial);
    }

    let mut p: Vec<Ext> = coeffs.to_vec();
    let mut roots = Vec::with_capacity(p.len() - 1);
    let origin = Complex::new(Ext::ZERO, Ext::ZERO);

    let mut n = p.len() - 1;
    while n > 0 && p[n].abs() <= p[n - 1].abs() * TINY {
        roots.push(origin);
        n -= 1;
    }
    p.truncate(n + 1);
    let leading = p.iter().take_while(|c| c.is_zero()).count();
    p.drain(..leading);
    n = p.len() - 1;

    let lead = p[0];
    for c in p.iter_mut() {
        *c /= lead;
    }

    let mut ws = Workspace::new(p);
    while n > 4 {
        // Search in y = x / s; the quotient of a monic divisor stays scaled
        let s = unit_scale(&ws.p, n);
        scale_roots(&mut ws.p[..=n], s.recip());
        match ws.find_factor(n) {
            Some(Found::Quadratic) => {
                let pair = quad_roots(ws.tuv[1], ws.tuv[2]);
                roots.extend(pair.map(|z| Complex::new(z.re * s, z.im * s)));
                n -= 2;
                ws.p[..=n].copy_from_slice(&ws.quad_qp[..=n]);
            }
            Some(Found::Real(x)) => {
                roots.push(Complex::new(x * s, Ext::ZERO));
                n -= 1;
                ws.p[..=n].copy_from_slice(&ws.real_qp[..=n]);
            }
            None => {
                log::warn!("root finder did not converge with {} roots remaining", n);
                return Err(RootError::NoConvergence { degree: n });
            }
        }
        scale_roots(&mut ws.p[..=n], s);
        while n > 0 && ws.p[n].abs() <= ws.p[n - 1].abs() * TINY {
            roots.push(origin);
            n -= 1;
        }
    }

    if n > 0 {
        let tail = low_order_roots(&ws.p[..=n]).ok_or(RootError::NoConvergence { degree: n })?;
        roots.extend(tail);
    }
    Ok(roots)
}
