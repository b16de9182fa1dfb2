//! Minimum-phase reconstruction from a real cepstrum (spec §4.M).
//!
//! Standard homomorphic construction: window the cepstrum so only the
//! causal part survives (doubled, except the DC and — for even length —
//! Nyquist terms), exponentiate in the log-spectral domain, and invert.
//! No corpus exemplar does this; implemented directly from the textbook
//! algorithm, following this crate's FFT-plan idiom elsewhere in
//! `envelope`/`spectral`.

use crate::core::{Complex, DspResult, Real};
use crate::spectral::fft::{Direction, FftKind, FftPlan};

/// Reconstruct the minimum-phase time-domain signal whose magnitude
/// spectrum matches the one `cepstrum` was derived from via
/// [`crate::envelope::cepstrum::real_cepstrum`].
pub fn minimum_phase_reconstruction(cepstrum: &[Real]) -> DspResult<Vec<Real>> {
    let n = cepstrum.len();
    let mut windowed = vec![0.0; n];
    windowed[0] = cepstrum[0];
    // Last quefrency index doubled: N/2-1 for even N, (N-1)/2 for odd N —
    // both captured by `(n - 1) / 2` (integer division).
    let last_doubled = n.saturating_sub(1) / 2;
    for (i, w) in windowed.iter_mut().enumerate().take(last_doubled + 1).skip(1) {
        *w = 2.0 * cepstrum[i];
    }
    if n % 2 == 0 {
        windowed[n / 2] = cepstrum[n / 2];
    }

    let forward = FftPlan::make_plan(n, FftKind::C2C, Direction::Forward)?;
    let complex_in: Vec<Complex> = windowed.iter().map(|&v| Complex::from_real(v)).collect();
    let mut log_spectrum = vec![Complex::ZERO; n];
    forward.execute(&complex_in, &mut log_spectrum);

    let exp_spectrum: Vec<Complex> = log_spectrum
        .iter()
        .map(|c| Complex::from_polar(c.re.exp(), c.im))
        .collect();

    let backward = FftPlan::make_plan(n, FftKind::C2C, Direction::Backward)?;
    let mut out = vec![Complex::ZERO; n];
    backward.execute(&exp_spectrum, &mut out);
    Ok(out.into_iter().map(|c| c.re).collect())
}
