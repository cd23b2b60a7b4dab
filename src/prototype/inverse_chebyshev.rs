use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::{find_roots, RootError};
use crate::special::{chebyshev_t, j_power_re};

/// Squared-polynomial coefficients at or below this magnitude are leading
/// zeros of the numerator.
const NUMERATOR_ZERO_TOL: f64 = 0.01;

/// Chebyshev type II: flat pass band, equiripple stop band with
/// transmission zeros on the imaginary axis.
///
/// With `ε² = 1 / (10^(A/10) − 1)` for stop-band attenuation `A`, the
/// squared magnitude is `ε²·T_n²(1/ω) / (1 + ε²·T_n²(1/ω))`. Substituting
/// `ω = s/j` into `T_n(ω)²` gives a real polynomial; reading its ascending
/// coefficients as descending maps `ω` to `1/ω`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseChebyshev;

/// Ascending coefficients of `T_n(s/j)²`, kept real.
pub(crate) fn chebyshev_squared(n: usize) -> Vec<f64> {
    let t = chebyshev_t(n);
    let mut sq = vec![0.0; 2 * n + 1];
    for (j, &a) in t.iter().enumerate() {
        for (k, &b) in t.iter().enumerate() {
            sq[j + k] += a * b;
        }
    }
    // Only even powers survive: T_n has a single parity
    for (m, c) in sq.iter_mut().enumerate() {
        *c *= j_power_re(m);
    }
    sq
}

impl PoleZeroGenerator for InverseChebyshev {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let n = params.poles;
        let eps_sq = 1.0 / (10f64.powf(params.stop_band_db / 10.0) - 1.0);
        let sq = chebyshev_squared(n);

        let mut denominator: Vec<f64> = sq.iter().map(|c| c * eps_sq).collect();
        denominator[0] += 1.0;
        let poles = find_roots(&denominator)?;

        // Scaling by ε² cancels in the roots, so the raw square is used
        let first = sq
            .iter()
            .position(|c| c.abs() > NUMERATOR_ZERO_TOL)
            .unwrap_or(sq.len() - 1);
        let zeros = find_roots(&sq[first..])?;

        Ok(RootSet { poles, zeros })
    }
}
