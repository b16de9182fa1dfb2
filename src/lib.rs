//! A portable digital signal processing core: FFT, STFT, FIR/IIR filtering,
//! polyphase resampling, Chirp-Z Transform, Hilbert/analytic signal, real
//! cepstrum and LPC, Mel/MFCC feature extraction, DCT, and window
//! generation, all parameterized on a single compile-time real-scalar
//! choice (`f32` by default, `f64` via the `f64` feature).
//!
//! The public surface is organized the way `SPEC_FULL.md` §C maps it:
//! `core`, `fpenv`, `window`, `spectral` (`fft`, `stft`, `dct`, `czt`,
//! `hilbert`, `utils`), `filter` (`fir`, `iir`, `common`), `resample`,
//! `envelope` (`cepstrum`, `minphase`, `lpc`), `features` (`mel`, `mfcc`,
//! `spectral`).

pub mod core;
pub mod envelope;
pub mod features;
pub mod filter;
pub mod fpenv;
pub mod framing;
pub mod resample;
pub mod spectral;
pub mod window;

pub use core::{Complex, DspError, DspResult, Real};
