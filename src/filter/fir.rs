//! FIR engine: lowpass design, streaming ring-buffer apply, FFT-accelerated
//! apply, zero-phase `filtfilt` (spec §4.H).
//!
//! Streaming history ring grounded on
//! `other_examples/...nih-plug...plugins-crossover-src-crossover-fir-filter.rs`'s
//! `FirFilter` (cursor-based ring with wraparound split into before/after
//! segments); the windowed-sinc lowpass design follows that file's
//! half-Blackman-windowed-impulse approach generalized to any window type.

use crate::core::{DspError, DspResult, Real};
use crate::spectral::fft::{c2r, r2c, Direction, FftKind, FftPlan};
use crate::window::{generate_into, WindowType};

/// Design a length-`m` linear-phase lowpass by sampling the ideal sinc at
/// `alpha = (m-1)/2` and multiplying by `window_type`. `fc` is normalized so
/// `1.0 == Nyquist`; `0 < fc < 1` else [`DspError::OutOfRange`].
pub fn design_lowpass(m: usize, fc: Real, window_type: WindowType) -> DspResult<Vec<Real>> {
    if !(fc > 0.0 && fc < 1.0) {
        return Err(DspError::out_of_range("fc", fc as f64, "0 < fc < 1"));
    }
    if m == 0 {
        return Err(DspError::invalid_size("m must be >= 1"));
    }
    let alpha = (m as Real - 1.0) / 2.0;
    let mut h = vec![0.0; m];
    for (n, v) in h.iter_mut().enumerate() {
        let x = n as Real - alpha;
        *v = if x.abs() < 1e-8 {
            2.0 * fc
        } else {
            2.0 * fc * (crate::core::PI * fc * x).sin() / (crate::core::PI * fc * x)
        };
    }
    let mut window = vec![0.0; m];
    generate_into(window_type, &mut window);
    for (v, w) in h.iter_mut().zip(window.iter()) {
        *v *= w;
    }
    Ok(h)
}

/// History ring for streaming FIR application. Coefficients are supplied at
/// each call, not owned by the state, so one history can be reused across
/// coefficient updates with continuous history — spec §3.
pub struct FirState {
    history: Vec<Real>,
    cursor: usize,
}

impl FirState {
    /// `num_taps` is the coefficient count `L`; the history ring holds
    /// `L - 1` samples, all initially zero.
    #[must_use]
    pub fn new(num_taps: usize) -> Self {
        let len = num_taps.saturating_sub(1);
        Self { history: vec![0.0; len], cursor: 0 }
    }

    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.cursor = 0;
    }

    /// Apply `h` (length `L`) to `input`, writing `L`-length-matched output
    /// into `output`, updating history in place for the next call.
    pub fn apply(&mut self, h: &[Real], input: &[Real], output: &mut [Real]) {
        assert_eq!(output.len(), input.len(), "output length must equal input length");
        assert_eq!(self.history.len(), h.len().saturating_sub(1), "history length must be L - 1");
        let l = h.len();
        for (&x, out) in input.iter().zip(output.iter_mut()) {
            let mut acc = h[0] * x;
            let len = self.history.len();
            for k in 1..l {
                let idx = (self.cursor + len - k) % len;
                acc += h[k] * self.history[idx];
            }
            *out = acc;
            if !self.history.is_empty() {
                self.history[self.cursor] = x;
                self.cursor = (self.cursor + 1) % self.history.len();
            }
        }
    }
}

/// FFT-accelerated, zero-history-state convolution: `n` input samples with
/// `L` coefficients, `Nfft = next_pow2(n + L - 1)`, R2C both, multiply,
/// C2R, keep the first `n` samples. Correct for offline blocks; does not
/// preserve streaming state.
pub fn fir_apply_fft(h: &[Real], input: &[Real]) -> DspResult<Vec<Real>> {
    let n = input.len();
    let l = h.len();
    if n == 0 || l == 0 {
        return Err(DspError::invalid_size("input and coefficients must be non-empty"));
    }
    let conv_len = n + l - 1;
    let nfft = conv_len.next_power_of_two();

    let mut x_pad = vec![0.0; nfft];
    x_pad[..n].copy_from_slice(input);
    let mut h_pad = vec![0.0; nfft];
    h_pad[..l].copy_from_slice(h);

    let fwd = FftPlan::make_plan(nfft, FftKind::R2C, Direction::Forward)?;
    let mut xs = vec![crate::core::Complex::ZERO; nfft / 2 + 1];
    let mut hs = vec![crate::core::Complex::ZERO; nfft / 2 + 1];
    r2c(&fwd, &x_pad, &mut xs);
    r2c(&fwd, &h_pad, &mut hs);

    let ys: Vec<crate::core::Complex> = xs.iter().zip(hs.iter()).map(|(&a, &b)| a * b).collect();
    let bwd = FftPlan::make_plan(nfft, FftKind::C2R, Direction::Backward)?;
    let mut y = vec![0.0; nfft];
    c2r(&bwd, &ys, &mut y);
    y.truncate(n);
    Ok(y)
}

/// Zero-phase filtering: mirror-reflect-pad by `L-1` samples on each side,
/// apply forward, reverse, apply again, reverse, crop the center `n`
/// samples. Group delay cancels.
pub fn filtfilt_fir(h: &[Real], input: &[Real]) -> DspResult<Vec<Real>> {
    let n = input.len();
    let l = h.len();
    if n == 0 || l == 0 {
        return Err(DspError::invalid_size("input and coefficients must be non-empty"));
    }
    let pad = l - 1;
    let padded = crate::filter::common::reflect_pad(input, pad);

    let mut state = FirState::new(l);
    let mut forward = vec![0.0; padded.len()];
    state.apply(h, &padded, &mut forward);
    forward.reverse();

    let mut state2 = FirState::new(l);
    let mut backward = vec![0.0; forward.len()];
    state2.apply(h, &forward, &mut backward);
    backward.reverse();

    Ok(backward[pad..pad + n].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_lowpass_rejects_out_of_range_fc() {
        assert!(design_lowpass(11, 0.0, WindowType::Hamming).is_err());
        assert!(design_lowpass(11, 1.0, WindowType::Hamming).is_err());
    }

    #[test]
    fn design_lowpass_is_linear_phase_symmetric() {
        let h = design_lowpass(21, 0.3, WindowType::Hamming).unwrap();
        for i in 0..h.len() / 2 {
            assert!((h[i] - h[h.len() - 1 - i]).abs() < 1e-5);
        }
    }

    #[test]
    fn streaming_identity_filter_passes_through() {
        let h = [1.0];
        let mut state = FirState::new(1);
        let input = [1.0, 2.0, 3.0, 4.0];
        let mut output = [0.0; 4];
        state.apply(&h, &input, &mut output);
        assert_eq!(output, input);
    }

    #[test]
    fn streaming_matches_block_for_split_calls() {
        let h = [0.25, 0.5, 0.25];
        let input = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let mut whole_state = FirState::new(3);
        let mut whole_out = [0.0; 6];
        whole_state.apply(&h, &input, &mut whole_out);

        let mut split_state = FirState::new(3);
        let mut split_out = [0.0; 6];
        split_state.apply(&h, &input[..3], &mut split_out[..3]);
        split_state.apply(&h, &input[3..], &mut split_out[3..]);

        for (a, b) in whole_out.iter().zip(split_out.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn fft_apply_matches_streaming_apply() {
        let h = design_lowpass(15, 0.25, WindowType::Hamming).unwrap();
        let input: Vec<Real> = (0..40).map(|i| (i as Real * 0.3).sin()).collect();

        let mut state = FirState::new(h.len());
        let mut streaming_out = vec![0.0; input.len()];
        state.apply(&h, &input, &mut streaming_out);

        let fft_out = fir_apply_fft(&h, &input).unwrap();
        for (a, b) in streaming_out.iter().zip(fft_out.iter()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn filtfilt_preserves_length() {
        let h = design_lowpass(9, 0.4, WindowType::Hamming).unwrap();
        let input: Vec<Real> = (0..30).map(|i| (i as Real * 0.2).sin()).collect();
        let out = filtfilt_fir(&h, &input).unwrap();
        assert_eq!(out.len(), input.len());
    }
}
