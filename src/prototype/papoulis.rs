use super::{LowPassParams, PoleZeroGenerator, RootSet, MAX_POLE_COUNT};
use crate::roots::{find_roots, reverse_monic, RootError};

/// Pass-band roll-off control.
const EPSILON: f64 = 0.1;

/// Optimum "L" response: steepest monotonic roll-off, between
/// Butterworth and Chebyshev.
///
/// Built from a table of the Legendre-derived `L_n(ω²)` polynomials;
/// row `n − 1` holds the coefficients of `ω²`, `ω⁴`, ... `ω²ⁿ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Papoulis;

#[rustfmt::skip]
const L_POLYNOMIALS: [&[f64]; MAX_POLE_COUNT] = [
    &[1.0],
    &[0.0, 1.0],
    &[1.0, -3.0, 3.0],
    &[0.0, 3.0, -8.0, 6.0],
    &[1.0, -8.0, 28.0, -40.0, 20.0],
    &[0.0, 6.0, -40.0, 105.0, -120.0, 50.0],
    &[1.0, -15.0, 105.0, -355.0, 615.0, -525.0, 175.0],
    &[0.0, 10.0, -120.0, 615.0, -1624.0, 2310.0, -1680.0, 490.0],
    &[1.0, -24.0, 276.0, -1624.0, 5376.0, -10416.0, 11704.0, -7056.0, 1764.0],
    &[0.0, 15.0, -280.0, 2310.0, -10416.0, 27860.0, -45360.0, 44100.0, -23520.0, 5292.0],
    &[1.0, -35.0, 595.0, -5320.0, 27860.0, -90804.0, 189420.0, -252840.0, 208740.0,
      -97020.0, 19404.0],
    &[0.0, 21.0, -560.0, 6720.0, -45360.0, 189420.0, -512784.0, 916020.0, -1071840.0,
      790020.0, -332640.0, 60984.0],
    &[1.0, -48.0, 1128.0, -14160.0, 106380.0, -512784.0, 1652232.0, -3632112.0, 5462820.0,
      -5528160.0, 3597264.0, -1359072.0, 226512.0],
    &[0.0, 28.0, -1008.0, 16506.0, -154560.0, 916020.0, -3632112.0, 9934617.0, -18993744.0,
      25322220.0, -23063040.0, 13675662.0, -4756752.0, 736164.0],
    &[1.0, -63.0, 1953.0, -32655.0, 331065.0, -2191959.0, 9934617.0, -31730787.0,
      72539775.0, -119144025.0, 139378239.0, -113270157.0, 60747687.0, -19324305.0,
      2760615.0],
    &[0.0, 36.0, -1680.0, 35910.0, -443520.0, 3515820.0, -18993744.0, 72539775.0,
      -200142800.0, 403062660.0, -592431840.0, 628221594.0, -467747280.0, 231891660.0,
      -68708640.0, 9202050.0],
    &[1.0, -80.0, 3160.0, -67760.0, 888580.0, -7696304.0, 46307800.0, -200142800.0,
      634862800.0, -1496123200.0, 2629731104.0, -3431908480.0, 3276433160.0,
      -2221579360.0, 1012634480.0, -278106400.0, 34763300.0],
    &[0.0, 45.0, -2640.0, 71280.0, -1119888.0, 11397540.0, -79999920.0, 403062660.0,
      -1496123200.0, 4158224928.0, -8725654080.0, 13838184360.0, -16474217760.0,
      14480345880.0, -9110765664.0, 3879584280.0, -1001183040.0, 118195220.0],
    &[1.0, -99.0, 4851.0, -129624.0, 2130876.0, -23315292.0, 178966788.0, -999092952.0,
      4158224928.0, -13117232128.0, 31671113760.0, -58751550000.0, 83545742280.0,
      -90231621480.0, 72660859128.0, -42233237904.0, 16732271556.0, -4042276524.0,
      449141836.0],
    &[0.0, 55.0, -3960.0, 131670.0, -2560272.0, 32458140.0, -286125840.0, 1829127300.0,
      -8725654080.0, 31671113760.0, -88572527680.0, 192167478360.0, -323945724960.0,
      422594051880.0, -422089668000.0, 316521742680.0, -172355177280.0, 64308944700.0,
      -14699187360.0, 1551580888.0],
];

/// Ascending coefficients of `1 + ε·L_n(−s²)` for order `n` in `1..=20`.
pub(crate) fn papoulis_denominator(n: usize) -> Vec<f64> {
    let mut coeffs = vec![0.0; 2 * n + 1];
    coeffs[0] = 1.0;
    for (i, &c) in L_POLYNOMIALS[n - 1].iter().enumerate() {
        let k = i + 1;
        // ω² = −s²
        let sign = if k % 2 == 1 { -1.0 } else { 1.0 };
        coeffs[2 * k] = sign * c * EPSILON;
    }
    coeffs
}

impl PoleZeroGenerator for Papoulis {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let mut coeffs = papoulis_denominator(params.poles);
        reverse_monic(&mut coeffs);
        Ok(RootSet::all_pole(find_roots(&coeffs)?))
    }
}
