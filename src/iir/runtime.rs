use super::BiquadCascade;

/// Register magnitude at which a running filter is declared broken and its
/// history is cleared.
pub const OVERFLOW_LIMIT: f64 = 1.0e20;

/// Starting value of the register-magnitude tracker.
const MAX_REG_FLOOR: f64 = 1.0e-12;

/// First overflow seen by a [`BiquadState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overflow {
    /// Largest register magnitude when the guard tripped.
    pub peak: f64,
    /// Index, within the call's input, of the sample being processed.
    pub sample: usize,
}

/// Output of [`filter_signal`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutput {
    pub samples: Vec<f64>,
    /// `Some` only for the first overflow in the life of the state.
    pub overflow: Option<Overflow>,
}

/// History registers of a running cascade.
///
/// Each section keeps its last two inputs and outputs (Form 1). Owned by
/// the caller, so independent filters never share history. The state
/// carries over between calls; [`reset`](Self::reset) clears it.
///
/// # Example
///
/// ```
/// use iirkit::iir::{BiquadCascade, BiquadState, ZSection};
///
/// // y[n] = 0.5·x[n] + 0.5·y[n−1]
/// let cascade = BiquadCascade {
///     sections: vec![ZSection { a: [1.0, -0.5, 0.0], b: [0.5, 0.0, 0.0] }],
/// };
/// let mut state = BiquadState::for_cascade(&cascade);
/// let out = state.process(&cascade, &[1.0, 1.0]);
/// assert_eq!(out.samples, vec![0.5, 0.75]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadState {
    x1: Vec<f64>,
    x2: Vec<f64>,
    y1: Vec<f64>,
    y2: Vec<f64>,
    max_reg: f64,
    overflow_reported: bool,
}

impl BiquadState {
    /// Cleared state for `sections` sections.
    pub fn new(sections: usize) -> Self {
        Self {
            x1: vec![0.0; sections],
            x2: vec![0.0; sections],
            y1: vec![0.0; sections],
            y2: vec![0.0; sections],
            max_reg: MAX_REG_FLOOR,
            overflow_reported: false,
        }
    }

    pub fn for_cascade(cascade: &BiquadCascade) -> Self {
        Self::new(cascade.num_sections())
    }

    /// Zero every register. The one-shot overflow report stays consumed.
    pub fn reset(&mut self) {
        for reg in [&mut self.x1, &mut self.x2, &mut self.y1, &mut self.y2] {
            reg.iter_mut().for_each(|r| *r = 0.0);
        }
        self.max_reg = MAX_REG_FLOOR;
    }

    /// `(x1, x2, y1, y2)` of section `k`.
    pub fn history(&self, k: usize) -> Option<(f64, f64, f64, f64)> {
        Some((
            *self.x1.get(k)?,
            *self.x2.get(k)?,
            *self.y1.get(k)?,
            *self.y2.get(k)?,
        ))
    }

    /// Every register is zero.
    pub fn is_cleared(&self) -> bool {
        [&self.x1, &self.x2, &self.y1, &self.y2]
            .iter()
            .all(|reg| reg.iter().all(|&r| r == 0.0))
    }

    /// Filter `input` through `cascade`, continuing from the current
    /// history.
    ///
    /// If any register exceeds [`OVERFLOW_LIMIT`] the history is cleared
    /// and filtering continues; the first such event is returned in
    /// [`FilterOutput::overflow`] and later ones are silent. The guard is
    /// also checked after the last sample, so a call that ends in overflow
    /// leaves the state cleared.
    pub fn process(&mut self, cascade: &BiquadCascade, input: &[f64]) -> FilterOutput {
        let n = cascade.num_sections();
        if self.x1.len() != n {
            *self = Self {
                overflow_reported: self.overflow_reported,
                ..Self::new(n)
            };
        }

        let mut overflow = None;
        let mut samples = Vec::with_capacity(input.len());
        for (j, &x) in input.iter().enumerate() {
            let mut x = x;
            for (k, sec) in cascade.sections.iter().enumerate() {
                if self.max_reg > OVERFLOW_LIMIT {
                    overflow = overflow.or(self.trip(j));
                }
                let center = x * sec.b[0] + sec.b[1] * self.x1[k] + sec.b[2] * self.x2[k];
                let y = sec.a[0] * center - sec.a[1] * self.y1[k] - sec.a[2] * self.y2[k];

                self.x2[k] = self.x1[k];
                self.x1[k] = x;
                self.y2[k] = self.y1[k];
                self.y1[k] = y;
                self.max_reg = self.max_reg.max(center.abs()).max(y.abs());
                x = y;
            }
            samples.push(x);
        }
        if self.max_reg > OVERFLOW_LIMIT {
            overflow = overflow.or(self.trip(input.len().saturating_sub(1)));
        }

        FilterOutput { samples, overflow }
    }

    /// Clear the history and report the overflow if it is the first.
    fn trip(&mut self, sample: usize) -> Option<Overflow> {
        let peak = self.max_reg;
        self.reset();
        if self.overflow_reported {
            return None;
        }
        self.overflow_reported = true;
        log::warn!(
            "biquad register reached {:e} at sample {}; history cleared",
            peak,
            sample
        );
        Some(Overflow { peak, sample })
    }
}

/// Filter `input` through `cascade` using `state`.
///
/// Same as [`BiquadState::process`]; the state is resized (and cleared)
/// if it was built for a different section count.
pub fn filter_signal(cascade: &BiquadCascade, state: &mut BiquadState, input: &[f64]) -> FilterOutput {
    state.process(cascade, input)
}
