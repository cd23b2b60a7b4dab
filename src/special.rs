//! Factorials and classical polynomials used by the prototype generators.

/// Factorial lookup table for small non-negative integers: FACTORIAL[n] = n!
/// Valid for n = 0..=20 (exact in f64 up to 18!).
const FACTORIAL: [f64; 21] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5040.0,
    40320.0,
    362880.0,
    3628800.0,
    39916800.0,
    479001600.0,
    6227020800.0,
    87178291200.0,
    1307674368000.0,
    20922789888000.0,
    355687428096000.0,
    6402373705728000.0,
    121645100408832000.0,
    2432902008176640000.0,
];

/// `n!` as `f64`. Table lookup up to 20, running product beyond.
pub fn factorial(n: usize) -> f64 {
    match FACTORIAL.get(n) {
        Some(&f) => f,
        None => (FACTORIAL.len()..=n).fold(FACTORIAL[FACTORIAL.len() - 1], |acc, k| {
            acc * k as f64
        }),
    }
}

/// Ascending coefficients of the Chebyshev polynomial of the first kind
/// `T_n(x)`, from the explicit sum
///
/// ```text
/// T_n(x) = (n/2) · Σ_{j=0}^{⌊n/2⌋} (−1)^j · (n−j−1)! / (j!·(n−2j)!) · (2x)^(n−2j)
/// ```
///
/// Requires `n >= 1`.
///
/// # Example
///
/// ```
/// use iirkit::special::chebyshev_t;
///
/// // T₃(x) = 4x³ − 3x
/// assert_eq!(chebyshev_t(3), vec![0.0, -3.0, 0.0, 4.0]);
/// ```
pub fn chebyshev_t(n: usize) -> Vec<f64> {
    let mut coeffs = vec![0.0; n + 1];
    for j in 0..=n / 2 {
        let power = n - 2 * j;
        let c = factorial(n - j - 1) * 2f64.powi(power as i32) * n as f64
            / (2.0 * factorial(j) * factorial(power));
        coeffs[power] = if j % 2 == 1 { -c } else { c };
    }
    coeffs
}

/// Real part of `jᵐ` (1, 0, −1, 0, ...).
#[inline]
pub fn j_power_re(m: usize) -> f64 {
    match m % 4 {
        0 => 1.0,
        2 => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorial_table_and_extension() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(factorial(20), 2432902008176640000.0);
        let f24 = factorial(24);
        assert!((f24 / 6.204484017332394e23 - 1.0).abs() < 1e-14);
    }

    #[test]
    fn chebyshev_low_orders() {
        assert_eq!(chebyshev_t(1), vec![0.0, 1.0]);
        assert_eq!(chebyshev_t(2), vec![-1.0, 0.0, 2.0]);
        assert_eq!(chebyshev_t(4), vec![1.0, 0.0, -8.0, 0.0, 8.0]);
    }

    #[test]
    fn chebyshev_equiripple() {
        // |T_n(x)| <= 1 on [−1, 1] and T_n(cos θ) = cos(nθ)
        let t = chebyshev_t(9);
        for k in 0..50 {
            let theta = k as f64 * 0.0628;
            let x = theta.cos();
            let v = t.iter().rev().fold(0.0, |acc, &c| acc * x + c);
            assert!((v - (9.0 * theta).cos()).abs() < 1e-10);
        }
    }

    #[test]
    fn j_powers() {
        let re: Vec<f64> = (0..6).map(j_power_re).collect();
        assert_eq!(re, vec![1.0, 0.0, -1.0, 0.0, 1.0, 0.0]);
    }
}
