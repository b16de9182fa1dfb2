//! IIR engine: biquad Direct-Form-II-Transposed, cascading, coefficient
//! synthesis, `filtfilt` (spec §4.I).
//!
//! DF-II-T state and the `reset`/`apply` shape are grounded on
//! `momoto-audio/src/filters/biquad.rs` (`BiquadFilter` with `z1, z2`);
//! the divergence/denormal guards are dropped here since the spec has no
//! equivalent concept and defines no such safety net — only the stability
//! *check* (§4.I, `a2`/`a1` bound) is, which the teacher does not have.
//! Coefficient synthesis (lowpass/highpass/bandpass/notch/peaking/shelf) is
//! grounded on the RBJ cookbook bilinear-transform derivation in
//! `other_examples/...valib...src-filters-biquad.rs`.

use crate::core::{DspError, DspResult, Real};

/// `{b0, b1, b2, a1, a2}` — `a0` is implicit (`= 1`); the caller must
/// pre-normalize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: Real,
    pub b1: Real,
    pub b2: Real,
    pub a1: Real,
    pub a2: Real,
}

impl BiquadCoeffs {
    /// The identity filter (`y = x`).
    pub const IDENTITY: Self = Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0 };

    /// Reject coefficients with poles outside (or on) the unit circle:
    /// non-finite, `|a2| >= 1`, or `|a1| >= 1 + a2`.
    pub fn check_stability(&self) -> DspResult<()> {
        let finite = [self.b0, self.b1, self.b2, self.a1, self.a2].iter().all(|v| v.is_finite());
        if !finite {
            return Err(DspError::out_of_range("biquad coeffs", f64::NAN, "all coefficients finite"));
        }
        if self.a2.abs() >= 1.0 {
            return Err(DspError::out_of_range("a2", self.a2 as f64, "|a2| < 1"));
        }
        if self.a1.abs() >= 1.0 + self.a2 {
            return Err(DspError::out_of_range("a1", self.a1 as f64, "|a1| < 1 + a2"));
        }
        Ok(())
    }
}

/// One DF-II-T biquad section. State is exactly two reals (`z1`, `z2`).
#[derive(Debug, Clone, Copy)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    z1: Real,
    z2: Real,
}

impl BiquadFilter {
    #[must_use]
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self { coeffs, z1: 0.0, z2: 0.0 }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    #[must_use]
    pub fn coeffs(&self) -> BiquadCoeffs {
        self.coeffs
    }

    /// Process one sample:
    /// ```text
    /// y  = b0*x + z1
    /// z1 = b1*x - a1*y + z2
    /// z2 = b2*x - a2*y
    /// ```
    #[inline]
    pub fn process(&mut self, x: Real) -> Real {
        let c = self.coeffs;
        let y = c.b0 * x + self.z1;
        self.z1 = c.b1 * x - c.a1 * y + self.z2;
        self.z2 = c.b2 * x - c.a2 * y;
        y
    }

    pub fn process_into(&mut self, input: &[Real], output: &mut [Real]) {
        assert_eq!(input.len(), output.len(), "input/output length mismatch");
        for (&x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.process(x);
        }
    }
}

/// A left-to-right cascade of biquad sections; sample flow is serial.
pub struct BiquadCascade {
    stages: Vec<BiquadFilter>,
}

impl BiquadCascade {
    #[must_use]
    pub fn new(stages: Vec<BiquadCoeffs>) -> Self {
        Self { stages: stages.into_iter().map(BiquadFilter::new).collect() }
    }

    pub fn reset(&mut self) {
        for s in &mut self.stages {
            s.reset();
        }
    }

    #[inline]
    pub fn process(&mut self, x: Real) -> Real {
        let mut v = x;
        for s in &mut self.stages {
            v = s.process(v);
        }
        v
    }

    pub fn process_into(&mut self, input: &[Real], output: &mut [Real]) {
        assert_eq!(input.len(), output.len(), "input/output length mismatch");
        for (&x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.process(x);
        }
    }

    /// Zero-phase cascade filtering via mirror-reflection padding identical
    /// in spirit to [`crate::filter::fir::filtfilt_fir`], sized by the
    /// cascade's total order (`2 * stage_count` samples per side, one
    /// sample of settling per biquad order as a conservative pad).
    pub fn filtfilt(&mut self, input: &[Real]) -> Vec<Real> {
        let n = input.len();
        let pad = (2 * self.stages.len().max(1)).min(n.saturating_sub(1)).max(1);
        let padded = crate::filter::common::reflect_pad(input, pad);

        self.reset();
        let mut forward = vec![0.0; padded.len()];
        self.process_into(&padded, &mut forward);
        forward.reverse();

        self.reset();
        let mut backward = vec![0.0; forward.len()];
        self.process_into(&forward, &mut backward);
        backward.reverse();

        backward[pad..pad + n].to_vec()
    }
}

/// Coefficient synthesis via the bilinear transform (RBJ cookbook form).
/// `fs` is the sample rate, `f0` the center/corner frequency, `q` the
/// quality factor. Validates `0 < f0 < fs/2` and `q > 0`.
pub mod synth {
    use super::*;

    fn w0_alpha(fs: Real, f0: Real, q: Real) -> DspResult<(Real, Real, Real, Real)> {
        if !(f0 > 0.0 && f0 < fs / 2.0) {
            return Err(DspError::out_of_range("f0", f0 as f64, "0 < f0 < fs/2"));
        }
        if !(q > 0.0) {
            return Err(DspError::out_of_range("q", q as f64, "q > 0"));
        }
        let w0 = crate::core::TAU * f0 / fs;
        let alpha = w0.sin() / (2.0 * q);
        Ok((w0, alpha, w0.cos(), w0.sin()))
    }

    pub fn lowpass(fs: Real, f0: Real, q: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, _sin_w0) = w0_alpha(fs, f0, q)?;
        let b1 = 1.0 - cos_w0;
        let b0 = b1 / 2.0;
        let b2 = b0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    pub fn highpass(fs: Real, f0: Real, q: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, _sin_w0) = w0_alpha(fs, f0, q)?;
        let b0 = (1.0 + cos_w0) / 2.0;
        let b1 = -(1.0 + cos_w0);
        let b2 = b0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    pub fn bandpass(fs: Real, f0: Real, q: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, sin_w0) = w0_alpha(fs, f0, q)?;
        let b0 = alpha;
        let b1 = 0.0;
        let b2 = -alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;
        let _ = sin_w0;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    pub fn notch(fs: Real, f0: Real, q: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, _sin_w0) = w0_alpha(fs, f0, q)?;
        let b0 = 1.0;
        let b1 = -2.0 * cos_w0;
        let b2 = 1.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    pub fn allpass(fs: Real, f0: Real, q: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, _sin_w0) = w0_alpha(fs, f0, q)?;
        let b0 = 1.0 - alpha;
        let b1 = -2.0 * cos_w0;
        let b2 = 1.0 + alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    /// Peaking EQ with gain `db`.
    pub fn peaking(fs: Real, f0: Real, q: Real, db: Real) -> DspResult<BiquadCoeffs> {
        let (_w0, alpha, cos_w0, _sin_w0) = w0_alpha(fs, f0, q)?;
        let a_gain = (10f64.powf(db as f64 / 40.0)) as Real;
        let b0 = 1.0 + alpha * a_gain;
        let b1 = -2.0 * cos_w0;
        let b2 = 1.0 - alpha * a_gain;
        let a0 = 1.0 + alpha / a_gain;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha / a_gain;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    fn shelf(fs: Real, f0: Real, q: Real, db: Real, low: bool) -> DspResult<BiquadCoeffs> {
        if !(f0 > 0.0 && f0 < fs / 2.0) {
            return Err(DspError::out_of_range("f0", f0 as f64, "0 < f0 < fs/2"));
        }
        if !(q > 0.0) {
            return Err(DspError::out_of_range("q", q as f64, "q > 0"));
        }
        let a_gain = (10f64.powf(db as f64 / 40.0)) as Real;
        let w0 = crate::core::TAU * f0 / fs;
        let (cos_w0, sin_w0) = (w0.cos(), w0.sin());
        let alpha = sin_w0 / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * a_gain.sqrt() * alpha;
        let sign = if low { 1.0 } else { -1.0 };
        let b0 = a_gain * ((a_gain + 1.0) - sign * (a_gain - 1.0) * cos_w0 + two_sqrt_a_alpha);
        let b1 = sign * 2.0 * a_gain * ((a_gain - 1.0) - sign * (a_gain + 1.0) * cos_w0);
        let b2 = a_gain * ((a_gain + 1.0) - sign * (a_gain - 1.0) * cos_w0 - two_sqrt_a_alpha);
        let a0 = (a_gain + 1.0) + sign * (a_gain - 1.0) * cos_w0 + two_sqrt_a_alpha;
        let a1 = -sign * 2.0 * ((a_gain - 1.0) + sign * (a_gain + 1.0) * cos_w0);
        let a2 = (a_gain + 1.0) + sign * (a_gain - 1.0) * cos_w0 - two_sqrt_a_alpha;
        Ok(normalize(b0, b1, b2, a0, a1, a2))
    }

    pub fn lowshelf(fs: Real, f0: Real, q: Real, db: Real) -> DspResult<BiquadCoeffs> {
        shelf(fs, f0, q, db, true)
    }

    pub fn highshelf(fs: Real, f0: Real, q: Real, db: Real) -> DspResult<BiquadCoeffs> {
        shelf(fs, f0, q, db, false)
    }

    fn normalize(b0: Real, b1: Real, b2: Real, a0: Real, a1: Real, a2: Real) -> BiquadCoeffs {
        BiquadCoeffs { b0: b0 / a0, b1: b1 / a0, b2: b2 / a0, a1: a1 / a0, a2: a2 / a0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_biquad_passes_through() {
        let mut f = BiquadFilter::new(BiquadCoeffs::IDENTITY);
        assert_eq!(f.process(0.5), 0.5);
        assert_eq!(f.process(-1.0), -1.0);
    }

    #[test]
    fn stability_check_rejects_unstable_coeffs() {
        let bad = BiquadCoeffs { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 1.5 };
        assert!(bad.check_stability().is_err());
        let nan = BiquadCoeffs { b0: Real::NAN, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0 };
        assert!(nan.check_stability().is_err());
    }

    #[test]
    fn lowpass_synth_is_stable_and_attenuates_highs() {
        let fs = 48_000.0;
        let coeffs = synth::lowpass(fs, 1000.0, 0.707).unwrap();
        assert!(coeffs.check_stability().is_ok());

        let mut f = BiquadFilter::new(coeffs);
        let n = 2048;
        let low: Vec<Real> = (0..n).map(|i| (crate::core::TAU * 100.0 * i as Real / fs).sin()).collect();
        let high: Vec<Real> = (0..n).map(|i| (crate::core::TAU * 18_000.0 * i as Real / fs).sin()).collect();

        let mut out_low = vec![0.0; n];
        f.process_into(&low, &mut out_low);
        f.reset();
        let mut out_high = vec![0.0; n];
        f.process_into(&high, &mut out_high);

        let rms = |v: &[Real]| (v.iter().map(|x| x * x).sum::<Real>() / v.len() as Real).sqrt();
        assert!(rms(&out_high) < rms(&out_low));
    }

    #[test]
    fn synth_rejects_out_of_range_f0() {
        assert!(synth::lowpass(48_000.0, 30_000.0, 0.7).is_err());
        assert!(synth::lowpass(48_000.0, 1000.0, 0.0).is_err());
    }

    #[test]
    fn cascade_filtfilt_preserves_length() {
        let fs = 8000.0;
        let coeffs = synth::lowpass(fs, 500.0, 0.7).unwrap();
        let mut cascade = BiquadCascade::new(vec![coeffs, coeffs]);
        let input: Vec<Real> = (0..200).map(|i| (i as Real * 0.1).sin()).collect();
        let out = cascade.filtfilt(&input);
        assert_eq!(out.len(), input.len());
    }
}
