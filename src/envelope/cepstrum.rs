//! Real cepstrum (spec §4.M).
//!
//! No corpus exemplar computes a cepstrum; implemented directly from the
//! standard homomorphic definition `c = IFFT(log|FFT(x)|)`, using this
//! crate's own FFT plans the same way `spectral::hilbert` does.

use crate::core::{Complex, DspResult, Real};
use crate::spectral::fft::{Direction, FftKind, FftPlan};

/// Real cepstrum of `x` (length `N`, transformed at its own length — the
/// underlying [`FftPlan`] falls back to the naive DFT for non-power-of-two
/// `N` rather than padding):
/// `c[n] = IFFT(log(|FFT(x)[k]| + eps))[n].re`.
pub fn real_cepstrum(x: &[Real], eps: Real) -> DspResult<Vec<Real>> {
    let n = x.len();
    let forward = FftPlan::make_plan(n, FftKind::C2C, Direction::Forward)?;
    let spectrum_in: Vec<Complex> = x.iter().map(|&v| Complex::from_real(v)).collect();
    let mut spectrum = vec![Complex::ZERO; n];
    forward.execute(&spectrum_in, &mut spectrum);

    let log_mag: Vec<Complex> = spectrum.iter().map(|c| Complex::from_real((c.abs() + eps).ln())).collect();

    let backward = FftPlan::make_plan(n, FftKind::C2C, Direction::Backward)?;
    let mut cepstrum = vec![Complex::ZERO; n];
    backward.execute(&log_mag, &mut cepstrum);
    Ok(cepstrum.into_iter().map(|c| c.re).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_cepstrum_of_impulse_is_near_zero() {
        let mut x = vec![0.0; 16];
        x[0] = 1.0;
        let c = real_cepstrum(&x, 1e-10).unwrap();
        for v in c {
            assert!(v.abs() < 1e-4);
        }
    }

    #[test]
    fn real_cepstrum_length_matches_input() {
        let x: Vec<Real> = (0..32).map(|i| (i as Real * 0.2).sin()).collect();
        let c = real_cepstrum(&x, 1e-8).unwrap();
        assert_eq!(c.len(), x.len());
    }
}
