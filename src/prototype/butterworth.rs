use num_complex::Complex;

use super::{LowPassParams, PoleZeroGenerator, RootSet};
use crate::roots::RootError;

/// Maximally flat magnitude: poles evenly spaced on the left half of the
/// unit circle, already −3 dB at 1 rad/s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Butterworth;

impl PoleZeroGenerator for Butterworth {
    fn roots(&self, params: &LowPassParams) -> Result<RootSet, RootError> {
        let n = params.poles;
        let mut poles = Vec::with_capacity(n);
        for j in 0..n / 2 {
            let theta = core::f64::consts::PI * (2 * j + n + 1) as f64 / (2 * n) as f64;
            let (sin, cos) = theta.sin_cos();
            poles.push(Complex::new(cos, sin));
            poles.push(Complex::new(cos, -sin));
        }
        if n % 2 == 1 {
            poles.push(Complex::new(-1.0, 0.0));
        }
        Ok(RootSet::all_pole(poles))
    }

    fn needs_corner_scaling(&self) -> bool {
        false
    }
}
