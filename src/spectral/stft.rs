//! STFT engine: windowed forward/inverse frame processing with overlap-add
//! reconstruction (spec §4.G).
//!
//! Grounded on the overlap-add/gain-compensation shape in
//! `other_examples/...nih-plug...plugins-examples-stft-src-lib.rs` (window
//! applied both on analysis and synthesis, explicit normalization rather
//! than an assumed-COLA constant), adapted to this crate's `FftPlan`
//! instead of FFTW.

use crate::core::{Complex, DspError, DspResult, Real};
use crate::spectral::fft::{Direction, FftKind, FftPlan};

/// Parameters for [`Stft::new`].
#[derive(Debug, Clone)]
pub struct StftParams {
    pub nfft: usize,
    pub hop: usize,
    pub window: Vec<Real>,
}

/// Owns the window, scratch buffer, and forward/backward C2C plans needed
/// to process one frame at a time.
pub struct Stft {
    nfft: usize,
    hop: usize,
    window: Vec<Real>,
    forward: FftPlan,
    backward: FftPlan,
    scratch: Vec<Complex>,
}

impl Stft {
    /// Construct a handle. `1 <= hop <= nfft` and `window.len() == nfft`,
    /// else [`DspError::InvalidSize`].
    pub fn new(params: StftParams) -> DspResult<Self> {
        let StftParams { nfft, hop, window } = params;
        if nfft == 0 {
            return Err(DspError::invalid_size("nfft must be >= 1"));
        }
        if hop == 0 || hop > nfft {
            return Err(DspError::invalid_size("hop must satisfy 1 <= hop <= nfft"));
        }
        if window.len() != nfft {
            return Err(DspError::invalid_size("window length must equal nfft"));
        }
        let forward = FftPlan::make_plan(nfft, FftKind::C2C, Direction::Forward)?;
        let backward = FftPlan::make_plan(nfft, FftKind::C2C, Direction::Backward)?;
        Ok(Self { nfft, hop, window, forward, backward, scratch: vec![Complex::ZERO; nfft] })
    }

    #[must_use]
    pub fn nfft(&self) -> usize {
        self.nfft
    }

    #[must_use]
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Window `time_in`, zero-fill the imaginary part, run the forward C2C
    /// FFT into `spec_out` (full length `nfft`, not Hermitian-packed).
    pub fn process(&mut self, time_in: &[Real], spec_out: &mut [Complex]) {
        assert_eq!(time_in.len(), self.nfft, "time_in must have length nfft");
        assert_eq!(spec_out.len(), self.nfft, "spec_out must have length nfft");
        for ((s, &t), &w) in self.scratch.iter_mut().zip(time_in.iter()).zip(self.window.iter()) {
            *s = Complex::from_real(t * w);
        }
        self.forward.execute(&self.scratch, spec_out);
    }

    /// Backward C2C FFT of `spec_in` (already scaled 1/n by the plan),
    /// window a second time, and overlap-add into `out_add`. If `norm_add`
    /// is supplied, accumulates `window[i]^2` at the same positions so the
    /// caller can later divide out non-ideal COLA.
    ///
    /// The caller positions `out_add`/`norm_add` at `frame_index * hop`
    /// themselves (by slicing) before calling this.
    pub fn reconstruct(&mut self, spec_in: &[Complex], out_add: &mut [Real], mut norm_add: Option<&mut [Real]>) {
        assert_eq!(spec_in.len(), self.nfft, "spec_in must have length nfft");
        assert_eq!(out_add.len(), self.nfft, "out_add must have length nfft");
        self.backward.execute(spec_in, &mut self.scratch);
        for i in 0..self.nfft {
            let w = self.window[i];
            out_add[i] += self.scratch[i].re * w;
            if let Some(norm) = norm_add.as_deref_mut() {
                assert_eq!(norm.len(), self.nfft, "norm_add must have length nfft");
                norm[i] += w * w;
            }
        }
    }

    /// Zero-pads the tail, iterates frames at `start = f * hop`, writes
    /// magnitude `|X[k]|` into `mag_out[f*nfft + k]`. Returns the frame
    /// count `1 + ceil((n - nfft) / hop)` when `n >= nfft`, else `1` — this
    /// is a ceiling, not [`crate::framing::num_frames`]'s floor, since the
    /// last frame here is zero-padded rather than dropped.
    pub fn spectrogram(&mut self, signal: &[Real], mag_out: &mut [Real]) -> usize {
        let n = signal.len();
        let frames = if n >= self.nfft { 1 + (n - self.nfft + self.hop - 1) / self.hop } else { 1 };
        assert!(
            mag_out.len() >= frames * self.nfft,
            "mag_out must hold frames * nfft magnitudes"
        );
        let mut frame_buf = vec![0.0; self.nfft];
        let mut spec = vec![Complex::ZERO; self.nfft];
        for f in 0..frames {
            let start = f * self.hop;
            for (k, v) in frame_buf.iter_mut().enumerate() {
                let pos = start + k;
                *v = if pos < n { signal[pos] } else { 0.0 };
            }
            self.process(&frame_buf, &mut spec);
            for (k, c) in spec.iter().enumerate() {
                mag_out[f * self.nfft + k] = c.abs();
            }
        }
        frames
    }
}
