//! FFT, STFT, CZT, Hilbert, DCT, and spectral utilities (spec §4.D, §4.E,
//! §4.G, §4.K, §4.L, §4.O).

pub mod czt;
pub mod dct;
pub mod fft;
pub mod hilbert;
pub mod stft;
pub mod utils;
