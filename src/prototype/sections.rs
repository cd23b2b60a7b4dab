use num_complex::Complex;

/// One factor of an analog transfer function:
///
/// ```text
/// H(s) = (n2·s² + n1·s + n0) / (d2·s² + d1·s + d0)
/// ```
///
/// A first-order factor has `d2 = 0`. The default is the identity
/// `1 / 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SPlaneSection {
    pub n2: f64,
    pub n1: f64,
    pub n0: f64,
    pub d2: f64,
    pub d1: f64,
    pub d0: f64,
}

impl Default for SPlaneSection {
    fn default() -> Self {
        Self {
            n2: 0.0,
            n1: 0.0,
            n0: 1.0,
            d2: 0.0,
            d1: 0.0,
            d0: 1.0,
        }
    }
}

impl SPlaneSection {
    /// First-order denominator (a single real pole).
    #[inline]
    pub fn is_first_order(&self) -> bool {
        self.d2 == 0.0
    }

    /// Numerator has a finite zero pair.
    #[inline]
    pub fn has_zeros(&self) -> bool {
        self.n2 != 0.0
    }

    /// Raw `N(s) / D(s)` without gain normalization.
    pub fn eval(&self, s: Complex<f64>) -> Complex<f64> {
        let num = s * s * self.n2 + s * self.n1 + self.n0;
        let den = s * s * self.d2 + s * self.d1 + self.d0;
        num / den
    }

    /// Scalar that brings this section's DC gain to one.
    #[inline]
    pub fn dc_normalizer(&self) -> f64 {
        self.d0 / self.n0
    }
}

/// Cascade of [`SPlaneSection`]s forming a low-pass prototype.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SPlaneSections {
    pub sections: Vec<SPlaneSection>,
}

impl SPlaneSections {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, SPlaneSection> {
        self.sections.iter()
    }

    /// Total pole count (two per second-order section, one per first-order).
    pub fn order(&self) -> usize {
        self.sections
            .iter()
            .map(|s| if s.is_first_order() { 1 } else { 2 })
            .sum()
    }

    /// Product of the per-section DC normalizers.
    pub fn dc_gain_scale(&self) -> f64 {
        self.sections.iter().map(SPlaneSection::dc_normalizer).product()
    }

    /// Cascade response at `s = j·omega`, normalized to unity DC gain.
    pub fn response(&self, omega: f64) -> Complex<f64> {
        let s = Complex::new(0.0, omega);
        let h = self
            .sections
            .iter()
            .fold(Complex::new(1.0, 0.0), |h, sec| h * sec.eval(s));
        h * self.dc_gain_scale()
    }

    /// Expand the denominators into one polynomial (descending powers),
    /// with leading zeros from first-order sections removed.
    pub fn rebuild_denominator(&self) -> Vec<f64> {
        rebuild(self.sections.iter().map(|s| [s.d2, s.d1, s.d0]))
    }

    /// Expand the numerators into one polynomial (descending powers).
    pub fn rebuild_numerator(&self) -> Vec<f64> {
        rebuild(self.sections.iter().map(|s| [s.n2, s.n1, s.n0]))
    }
}

impl<'a> IntoIterator for &'a SPlaneSections {
    type Item = &'a SPlaneSection;
    type IntoIter = core::slice::Iter<'a, SPlaneSection>;
    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

fn rebuild(factors: impl Iterator<Item = [f64; 3]>) -> Vec<f64> {
    let mut poly = vec![1.0];
    for f in factors {
        poly = crate::roots::multiply(&poly, &f);
    }
    let leading = poly.iter().take_while(|&&c| c == 0.0).count();
    if leading == poly.len() {
        return vec![0.0];
    }
    poly.split_off(leading)
}

// ─────────────────────────────────────────────────────────────────────
// Root sorting and pairing
// ─────────────────────────────────────────────────────────────────────

/// Relative size below which a real or imaginary part is set to zero.
const INCONSEQUENTIAL: f64 = 1.0e3;
/// Roots closer than this in both parts are duplicates.
const DUPLICATE_TOL: f64 = 1.0e-3;

/// Zero out inconsequential parts and sort ascending.
///
/// The key is the real part, or `|imag|` when the first root lies on the
/// imaginary axis (zero sets). The sort is stable, so conjugate partners,
/// which share a key, stay adjacent.
pub fn sort_roots_by_zeta(roots: &mut [Complex<f64>]) {
    for r in roots.iter_mut() {
        if r.re.abs() * INCONSEQUENTIAL < r.im.abs() {
            r.re = 0.0;
        }
        if r.im.abs() * INCONSEQUENTIAL < r.re.abs() {
            r.im = 0.0;
        }
    }
    let Some(first) = roots.first() else {
        return;
    };
    if first.re != 0.0 {
        roots.sort_by(|a, b| a.re.total_cmp(&b.re));
    } else {
        roots.sort_by(|a, b| a.im.abs().total_cmp(&b.im.abs()));
    }
}

/// Form real quadratic (or linear) factors `[a2, a1, a0]` from the
/// left-half-plane members of `roots`.
///
/// Roots are sorted by [`sort_roots_by_zeta`], later duplicates are moved
/// into the right half plane, and right-half-plane and origin roots are
/// discarded. An imaginary-axis root gives `s² + ω²`, a real root gives
/// `s − re`, and a complex root gives `s² − 2·re·s + |r|²`; the partner of
/// an imaginary or complex root is consumed with it.
pub fn pair_roots(roots: &mut [Complex<f64>]) -> Vec<[f64; 3]> {
    sort_roots_by_zeta(roots);

    let count = roots.len();
    for j in 0..count.saturating_sub(1) {
        for k in j + 1..count {
            if (roots[j].re - roots[k].re).abs() < DUPLICATE_TOL
                && (roots[j].im - roots[k].im).abs() < DUPLICATE_TOL
            {
                // A distinct positive real value per slot so relocated
                // roots never match each other
                roots[k] = Complex::new(k as f64, 0.0);
            }
        }
    }

    let mut factors = Vec::with_capacity(count / 2 + 1);
    let mut j = 0;
    while j < count {
        let r = roots[j];
        j += 1;
        if r.re > 0.0 || (r.re == 0.0 && r.im == 0.0) {
            continue;
        }
        if r.re == 0.0 {
            factors.push([1.0, 0.0, r.im * r.im]);
            j += 1;
        } else if r.im == 0.0 {
            factors.push([0.0, 1.0, -r.re]);
        } else {
            factors.push([1.0, -2.0 * r.re, r.re * r.re + r.im * r.im]);
            j += 1;
        }
    }
    factors
}

// ─────────────────────────────────────────────────────────────────────
// Corner frequency normalization
// ─────────────────────────────────────────────────────────────────────

/// Coarse search step for the −3 dB crossing, rad/s.
const CORNER_STEP: f64 = 1.0 / 512.0;
const CORNER_MAX_STEPS: usize = 6000;
const CORNER_BISECTIONS: usize = 48;

/// Frequency at which the DC-normalized cascade first drops below −3 dB.
///
/// Steps outward from zero and then bisects within the bracketing step.
/// Returns `None` if no crossing is found in the search range.
pub fn find_corner_frequency(sections: &SPlaneSections) -> Option<f64> {
    let half_power = core::f64::consts::FRAC_1_SQRT_2;
    let below = |w: f64| sections.response(w).norm() < half_power;

    let mut hi = None;
    for j in 1..CORNER_MAX_STEPS {
        let w = j as f64 * CORNER_STEP;
        if below(w) {
            hi = Some(w);
            break;
        }
    }
    let mut hi = hi?;
    let mut lo = hi - CORNER_STEP;
    for _ in 0..CORNER_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if below(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Frequency-scale every section so the −3 dB corner lands at 1 rad/s.
///
/// Second-order denominators keep their damping ratio; first-order
/// denominators scale linearly; numerators with a zero pair scale `n0`.
pub fn set_corner_frequency(sections: &mut SPlaneSections) {
    let corner = match find_corner_frequency(sections) {
        Some(w) => w,
        None => {
            log::warn!("no -3 dB crossing below {} rad/s", CORNER_MAX_STEPS as f64 * CORNER_STEP);
            (CORNER_MAX_STEPS - 1) as f64 * CORNER_STEP
        }
    };
    let scale = 1.0 / corner;
    log::debug!("prototype corner at {:.6} rad/s, scaling by {:.6}", corner, scale);

    for sec in sections.sections.iter_mut() {
        let omega = sec.d0.sqrt();
        if omega == 0.0 || !omega.is_finite() {
            continue;
        }
        if sec.d2 != 0.0 {
            let zeta = sec.d1 / omega / 2.0;
            sec.d0 = omega * omega * scale * scale;
            sec.d1 = 2.0 * zeta * omega * scale;
        } else {
            sec.d0 *= scale;
        }
    }
    for sec in sections.sections.iter_mut() {
        if sec.has_zeros() {
            sec.n0 *= scale * scale;
        }
    }
}
