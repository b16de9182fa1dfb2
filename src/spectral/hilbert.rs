//! Hilbert transform / analytic signal (spec §4.K).

use crate::core::{Complex, DspResult, Real};
use crate::spectral::fft::{r2c, Direction, FftKind, FftPlan};

/// Compute the analytic signal of real input `x` into complex output `z`,
/// both length `N`:
/// 1. R2C forward FFT → Hermitian half-spectrum.
/// 2. Expand to a full spectrum via conjugate symmetry.
/// 3. Apply the analytic mask: bin 0 and Nyquist (if `N` even) unchanged,
///    positive-frequency bins doubled, negative-frequency bins zeroed.
/// 4. Inverse C2C FFT (scaled `1/N` by the FFT layer).
pub fn hilbert_analytic(x: &[Real]) -> DspResult<Vec<Complex>> {
    let n = x.len();
    let half_plan = FftPlan::make_plan(n, FftKind::R2C, Direction::Forward)?;
    let mut half = vec![Complex::ZERO; n / 2 + 1];
    r2c(&half_plan, x, &mut half);

    let mut full = vec![Complex::ZERO; n];
    full[..half.len()].copy_from_slice(&half);
    for k in half.len()..n {
        full[k] = full[n - k].conj();
    }

    let nyquist = if n % 2 == 0 { Some(n / 2) } else { None };
    for (k, c) in full.iter_mut().enumerate() {
        let is_dc = k == 0;
        let is_nyquist = nyquist == Some(k);
        if is_dc || is_nyquist {
            continue;
        } else if k < n - k {
            *c = c.scale(2.0);
        } else {
            *c = Complex::ZERO;
        }
    }

    let backward = FftPlan::make_plan(n, FftKind::C2C, Direction::Backward)?;
    let mut z = vec![Complex::ZERO; n];
    backward.execute(&full, &mut z);
    Ok(z)
}

/// Integrate phase increments via the conjugate product
/// `phi[i] = phi[i-1] + atan2(Im(z[i]*conj(z[i-1])), Re(...))`, avoiding a
/// direct `2*pi` wrap. `phi[0] = arg(z[0])`.
pub fn instantaneous_phase(z: &[Complex]) -> Vec<Real> {
    if z.is_empty() {
        return Vec::new();
    }
    let mut phi = vec![0.0; z.len()];
    phi[0] = z[0].arg();
    for i in 1..z.len() {
        let delta = z[i] * z[i - 1].conj();
        phi[i] = phi[i - 1] + delta.im.atan2(delta.re);
    }
    phi
}

/// `f[i] = (phi[i] - phi[i-1]) * fs / (2*pi)`, `f[0] = 0`.
pub fn instantaneous_frequency(phi: &[Real], fs: Real) -> Vec<Real> {
    if phi.is_empty() {
        return Vec::new();
    }
    let mut f = vec![0.0; phi.len()];
    for i in 1..phi.len() {
        f[i] = (phi[i] - phi[i - 1]) * fs / crate::core::TAU;
    }
    f
}
