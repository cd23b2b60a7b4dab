use super::*;

const TOL: f64 = 1e-12;
const LOOSE_TOL: f64 = 1e-6;

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

fn e(x: f64) -> Ext {
    Ext::from(x)
}

fn to_f64(roots: &[Complex<Ext>]) -> Vec<Complex<f64>> {
    roots
        .iter()
        .map(|r| Complex::new(r.re.to_f64(), r.im.to_f64()))
        .collect()
}

/// Sort by real part then imaginary part, for comparison against known roots.
fn sorted(mut roots: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
    roots.sort_by(|a, b| {
        a.re.partial_cmp(&b.re)
            .unwrap()
            .then(a.im.partial_cmp(&b.im).unwrap())
    });
    roots
}

fn assert_roots(found: Vec<Complex<f64>>, expected: &[Complex<f64>], tol: f64) {
    assert_eq!(found.len(), expected.len(), "root count");
    let found = sorted(found);
    let expected = sorted(expected.to_vec());
    for (f, x) in found.iter().zip(expected.iter()) {
        assert!((f - x).norm() < tol, "found {} expected {}", f, x);
    }
}

fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

/// Deterministic test roots: magnitudes spread geometrically over
/// [0.3, 3], conjugate pairs with a trailing real root for odd degree.
fn test_roots(degree: usize) -> Vec<Complex<f64>> {
    let mut roots = Vec::with_capacity(degree);
    let mut k = 0;
    while roots.len() < degree {
        let t = if degree > 1 {
            k as f64 / (degree - 1) as f64
        } else {
            0.5
        };
        let r = 0.3 * 10f64.powf(t);
        if degree - roots.len() >= 2 {
            let theta = 0.25 + 2.6 * t;
            roots.push(c(r * theta.cos(), r * theta.sin()));
            roots.push(c(r * theta.cos(), -r * theta.sin()));
            k += 2;
        } else {
            roots.push(c(-r, 0.0));
            k += 1;
        }
    }
    roots
}

// ═══════════════════════════════════════════════════════════════════
// Closed forms
// ═══════════════════════════════════════════════════════════════════

#[test]
fn linear() {
    let r = linear_root(e(2.5));
    assert_eq!(r.re.to_f64(), -2.5);
    assert!(r.im.is_zero());
}

#[test]
fn quadratic_real_roots() {
    // (x − 3)(x + 0.5) = x² − 2.5x − 1.5
    let r = quad_roots(e(-2.5), e(-1.5));
    assert_roots(to_f64(&r), &[c(3.0, 0.0), c(-0.5, 0.0)], TOL);
}

#[test]
fn quadratic_no_cancellation() {
    // Roots 1e8 and 1e-8: the small one is lost by the textbook formula
    let r = quad_roots(e(-(1e8 + 1e-8)), e(1.0));
    let roots = sorted(to_f64(&r));
    assert_near(roots[0].re / 1e-8, 1.0, 1e-12, "small root");
    assert_near(roots[1].re / 1e8, 1.0, 1e-12, "large root");
}

#[test]
fn quadratic_conjugates_bit_identical() {
    let r = quad_roots(e(0.7), e(3.1));
    assert_eq!(r[0].re, r[1].re);
    assert_eq!(r[0].im, -r[1].im);
    assert!(r[0].im > Ext::ZERO);
}

#[test]
fn quadratic_double_root() {
    // (x + 1.25)²
    let r = quad_roots(e(2.5), e(1.5625));
    for z in to_f64(&r) {
        assert_near(z.re, -1.25, TOL, "double root");
        assert_eq!(z.im, 0.0);
    }
}

#[test]
fn cubic_three_real() {
    // (x − 1)(x − 2)(x + 4) = x³ + x² − 10x + 8
    let r = cubic_roots(e(1.0), e(-10.0), e(8.0));
    assert_roots(to_f64(&r), &[c(1.0, 0.0), c(2.0, 0.0), c(-4.0, 0.0)], TOL);
}

#[test]
fn cubic_real_and_pair() {
    // (x − 2)(x² + 2x + 5) = x³ + x + −10
    let r = cubic_roots(e(0.0), e(1.0), e(-10.0));
    assert!(r[0].im.is_zero(), "real root first");
    assert_roots(to_f64(&r), &[c(2.0, 0.0), c(-1.0, 2.0), c(-1.0, -2.0)], TOL);
    assert_eq!(r[1].im, -r[2].im);
}

#[test]
fn cubic_triple_root() {
    // (x − 0.5)³ = x³ − 1.5x² + 0.75x − 0.125
    let r = cubic_roots(e(-1.5), e(0.75), e(-0.125));
    for z in to_f64(&r) {
        assert_near(z.re, 0.5, TOL, "triple root");
        assert_near(z.im, 0.0, TOL, "triple root im");
    }
}

#[test]
fn quartic_two_pairs() {
    // (x² + 2x + 5)(x² − x + 1)
    // = x⁴ + x³ + 4x² − 3x + 5
    let r = quartic_roots(e(1.0), e(4.0), e(-3.0), e(5.0));
    let s3 = 3f64.sqrt() / 2.0;
    assert_roots(
        to_f64(&r),
        &[c(-1.0, 2.0), c(-1.0, -2.0), c(0.5, s3), c(0.5, -s3)],
        1e-10,
    );
    // Each half is a real quadratic factor
    assert_eq!(r[0].re, r[1].re);
    assert_eq!(r[2].re, r[3].re);
}

#[test]
fn quartic_four_real() {
    // (x − 1)(x − 2)(x − 3)(x − 4) = x⁴ − 10x³ + 35x² − 50x + 24
    let r = quartic_roots(e(-10.0), e(35.0), e(-50.0), e(24.0));
    assert_roots(
        to_f64(&r),
        &[c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)],
        1e-10,
    );
}

#[test]
fn quartic_biquadratic() {
    // (x² + 1)(x² + 4) = x⁴ + 5x² + 4
    let r = quartic_roots(e(0.0), e(5.0), e(0.0), e(4.0));
    assert_roots(
        to_f64(&r),
        &[c(0.0, 1.0), c(0.0, -1.0), c(0.0, 2.0), c(0.0, -2.0)],
        TOL,
    );
}

#[test]
fn quartic_biquadratic_complex_z() {
    // x⁴ + 1: roots at odd multiples of 45°
    let r = quartic_roots(e(0.0), e(0.0), e(0.0), e(1.0));
    let h = core::f64::consts::FRAC_1_SQRT_2;
    assert_roots(
        to_f64(&r),
        &[c(h, h), c(h, -h), c(-h, h), c(-h, -h)],
        TOL,
    );
}

#[test]
fn quartic_four_equal_roots() {
    // (x + 2)⁴ = x⁴ + 8x³ + 24x² + 32x + 16
    let r = quartic_roots(e(8.0), e(24.0), e(32.0), e(16.0));
    for z in to_f64(&r) {
        assert_near(z.re, -2.0, TOL, "quad root");
        assert_eq!(z.im, 0.0);
    }
}

#[test]
fn low_order_strips_origin_and_scales() {
    // 4x³ − 4x = 4x(x − 1)(x + 1)
    let p = [e(4.0), e(0.0), e(-4.0), e(0.0)];
    let r = low_order_roots(&p).unwrap();
    assert_eq!(r[0].re, Ext::ZERO);
    assert_roots(to_f64(&r), &[c(0.0, 0.0), c(1.0, 0.0), c(-1.0, 0.0)], TOL);
}

#[test]
fn low_order_reversal_widely_spread_roots() {
    // (x − 1000)(x − 0.001)(x + 1)
    let roots = [c(1000.0, 0.0), c(0.001, 0.0), c(-1.0, 0.0)];
    let p: Vec<Ext> = poly_from_roots(&roots).into_iter().map(e).collect();
    let r = low_order_roots(&p).unwrap();
    let found = sorted(to_f64(&r));
    assert_near(found[0].re, -1.0, 1e-12, "−1");
    assert_near(found[1].re / 0.001, 1.0, 1e-10, "0.001");
    assert_near(found[2].re / 1000.0, 1.0, 1e-12, "1000");
}

#[test]
fn low_order_rejects_bad_lengths() {
    assert!(low_order_roots(&[e(1.0)]).is_none());
    assert!(low_order_roots(&[e(1.0); 6]).is_none());
    assert!(low_order_roots(&[e(0.0), e(1.0)]).is_none());
}

// ═══════════════════════════════════════════════════════════════════
// General solver
// ═══════════════════════════════════════════════════════════════════

#[test]
fn round_trip_degrees_1_to_20() {
    for degree in 1..=20 {
        let expected = test_roots(degree);
        let p = poly_from_roots(&expected);
        let found = find_roots(&p).unwrap_or_else(|err| panic!("degree {}: {}", degree, err));
        assert_eq!(found.len(), degree, "degree {}", degree);

        let rebuilt = poly_from_roots(&found);
        let scale = p.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        for (j, (a, b)) in rebuilt.iter().zip(p.iter()).enumerate() {
            assert!(
                (a - b).abs() <= LOOSE_TOL * scale,
                "degree {} coeff {}: {} vs {}",
                degree,
                j,
                a,
                b
            );
        }
    }
}

#[test]
fn round_trip_roots_outside_unit_circle() {
    // Every root magnitude above one
    let expected: Vec<Complex<f64>> = test_roots(12)
        .into_iter()
        .map(|r| r * 4.0)
        .collect();
    let p = poly_from_roots(&expected);
    let found = find_roots(&p).unwrap();
    assert_roots(found, &expected, 1e-8);
}

#[test]
fn conjugate_pairs_adjacent_and_bit_identical() {
    let p = poly_from_roots(&test_roots(10));
    let found = find_roots(&p).unwrap();
    let mut j = 0;
    while j < found.len() {
        if found[j].im != 0.0 {
            assert_eq!(found[j].re, found[j + 1].re, "pair at {}", j);
            assert_eq!(found[j].im, -found[j + 1].im, "pair at {}", j);
            j += 2;
        } else {
            j += 1;
        }
    }
}

#[test]
fn known_high_degree() {
    // x⁸ − 1: the eighth roots of unity
    let mut p = vec![0.0; 9];
    p[0] = 1.0;
    p[8] = -1.0;
    let found = find_roots(&p).unwrap();
    assert_eq!(found.len(), 8);
    for z in &found {
        assert_near(z.norm(), 1.0, 1e-12, "unit circle");
    }
}

#[test]
fn trailing_zeros_are_origin_roots() {
    // x²(x − 1)(x − 2)(x − 3)(x − 4)(x − 5)
    let mut p = poly_from_roots(&[
        c(1.0, 0.0),
        c(2.0, 0.0),
        c(3.0, 0.0),
        c(4.0, 0.0),
        c(5.0, 0.0),
    ]);
    p.extend([0.0, 0.0]);
    let found = find_roots(&p).unwrap();
    assert_eq!(found.len(), 7);
    assert_eq!(found.iter().filter(|z| z.norm() == 0.0).count(), 2);
}

#[test]
fn leading_zeros_lower_degree() {
    // 0·x³ + x² − 1
    let found = find_roots(&[0.0, 1.0, 0.0, -1.0]).unwrap();
    assert_roots(found, &[c(1.0, 0.0), c(-1.0, 0.0)], TOL);
}

#[test]
fn unnormalized_leading_coefficient() {
    let expected = test_roots(7);
    let p: Vec<f64> = poly_from_roots(&expected).iter().map(|x| x * -3.5).collect();
    assert_roots(find_roots(&p).unwrap(), &expected, 1e-9);
}

/// `|p(z)|` relative to the sum of term magnitudes at `z`.
fn relative_residual(p: &[f64], z: Complex<f64>) -> f64 {
    let n = p.len() - 1;
    let terms: f64 = p
        .iter()
        .enumerate()
        .map(|(j, c)| c.abs() * z.norm().powi((n - j) as i32))
        .sum();
    eval_complex(p, z).norm() / terms
}

#[test]
fn extreme_constant_term() {
    // x⁶ + 10^e: roots of magnitude 10^(e/6) on both sides of f64's comfort zone
    for exp in [-80, 80] {
        let c0 = 10f64.powi(exp);
        let p = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, c0];
        let found = find_roots(&p).unwrap_or_else(|err| panic!("1e{}: {}", exp, err));
        assert_eq!(found.len(), 6, "1e{}", exp);
        for z in &found {
            assert_near(z.norm().log10(), exp as f64 / 6.0, 1e-9, "root magnitude");
            assert!(relative_residual(&p, *z) < 1e-9, "1e{}: {}", exp, z);
        }
    }
}

#[test]
fn widely_separated_root_clusters() {
    // x⁷ + x⁶ + 1e-120: one root near −1, six of magnitude 1e-20
    let p = [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e-120];
    let found = find_roots(&p).unwrap();
    assert_eq!(found.len(), 7);
    let near_minus_one = found.iter().filter(|z| (**z - c(-1.0, 0.0)).norm() < 1e-9).count();
    assert_eq!(near_minus_one, 1);
    for z in found.iter().filter(|z| z.norm() < 0.5) {
        assert_near(z.norm().log10(), -20.0, 1e-6, "small root magnitude");
        assert!(relative_residual(&p, *z) < 1e-9, "{}", z);
    }
}

#[test]
fn ext_entry_point() {
    let p: Vec<Ext> = poly_from_roots(&test_roots(6)).into_iter().map(e).collect();
    let roots = find_roots_ext(&p).unwrap();
    for r in &roots {
        let z = Complex::new(r.re.to_f64(), r.im.to_f64());
        let p64: Vec<f64> = p.iter().map(|c| c.to_f64()).collect();
        assert!(eval_complex(&p64, z).norm() < 1e-10);
    }
}

#[test]
fn errors() {
    assert_eq!(find_roots(&[]), Err(RootError::DegreeOutOfRange));
    assert_eq!(
        find_roots(&vec![1.0; MAX_DEGREE + 2]),
        Err(RootError::DegreeOutOfRange)
    );
    assert_eq!(find_roots(&[1.0, f64::NAN, 2.0]), Err(RootError::NotFinite));
    assert_eq!(find_roots(&[1.0, f64::INFINITY]), Err(RootError::NotFinite));
    assert_eq!(find_roots(&[0.0, 0.0, 0.0]), Err(RootError::ZeroPolynomial));
    assert_eq!(find_roots(&[3.0]), Ok(vec![]));
}

#[test]
fn error_display() {
    let msg = format!("{}", RootError::NoConvergence { degree: 7 });
    assert!(msg.contains('7'));
}

// ═══════════════════════════════════════════════════════════════════
// Polynomial helpers
// ═══════════════════════════════════════════════════════════════════

#[test]
fn helpers() {
    let p = [1.0, -6.0, 11.0, -6.0];
    assert_eq!(horner(&p, 1.0), 0.0);
    assert_eq!(horner(&p, 4.0), 6.0);
    assert_eq!(derivative(&p), vec![3.0, -12.0, 11.0]);
    assert!(derivative(&[5.0_f64]).is_empty());
    let dp = derivative(&[e(2.0), e(-3.0), e(1.0)]);
    assert_eq!(dp, vec![e(4.0), e(-3.0)]);
    assert_eq!(multiply(&[1.0, -1.0], &[1.0, 1.0]), vec![1.0, 0.0, -1.0]);

    let mut q = vec![2.0, -3.0, 1.0];
    reverse_monic(&mut q);
    assert_eq!(q, vec![1.0, -3.0, 2.0]);

    let z = eval_complex(&[1.0, 0.0, 1.0], c(0.0, 1.0));
    assert_eq!(z, c(0.0, 0.0));
}
