//! Chirp-Z Transform via Bluestein's algorithm (spec §4.L).
//!
//! No corpus exemplar implements CZT; this follows spec.md's own five-step
//! construction directly (see `DESIGN.md`'s Open Question entry), using
//! this crate's own `FftPlan` for the two convolution FFTs.

use crate::core::{Complex, DspResult, Real};
use crate::spectral::fft::{Direction, FftKind, FftPlan};

/// `base^exponent` for a complex `base`, via its polar form — `W`/`A` are
/// points used as generic complex bases, not necessarily unit-modulus.
fn cpow(base: Complex, exponent: Real) -> Complex {
    Complex::from_polar(base.abs().powf(exponent), base.arg() * exponent)
}

/// Evaluate the Chirp-Z Transform of `x` (length `N`) at `m` taps along the
/// contour `A * W^{-k}`, producing `M = m` output samples.
pub fn czt(x: &[Complex], m: usize, w: Complex, a: Complex) -> DspResult<Vec<Complex>> {
    let big_n = x.len();
    let l = big_n + m - 1;
    let p = l.next_power_of_two();

    let g: Vec<Complex> = (0..big_n)
        .map(|n| cpow(a, -(n as Real)) * cpow(w, (n * n) as Real / 2.0))
        .collect();
    let mut a_buf = vec![Complex::ZERO; p];
    for (k, (&xi, &gi)) in x.iter().zip(g.iter()).enumerate() {
        a_buf[k] = xi * gi;
    }

    let mut b_buf = vec![Complex::ZERO; p];
    // v[m] = W^{-m^2/2} for m in [-(N-1), M); place into b[0..L).
    for (idx, slot) in b_buf.iter_mut().take(l).enumerate() {
        let mm = idx as isize - (big_n as isize - 1);
        *slot = cpow(w, -((mm * mm) as Real) / 2.0);
    }

    let forward = FftPlan::make_plan(p, FftKind::C2C, Direction::Forward)?;
    let backward = FftPlan::make_plan(p, FftKind::C2C, Direction::Backward)?;

    let mut a_spec = vec![Complex::ZERO; p];
    forward.execute(&a_buf, &mut a_spec);
    let mut b_spec = vec![Complex::ZERO; p];
    forward.execute(&b_buf, &mut b_spec);

    let mut prod: Vec<Complex> = a_spec.iter().zip(b_spec.iter()).map(|(&x, &y)| x * y).collect();
    let mut conv = vec![Complex::ZERO; p];
    backward.execute(&prod, &mut conv);
    prod.clear();

    let mut out = vec![Complex::ZERO; m];
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = conv[(big_n - 1) + k] * cpow(w, (k * k) as Real / 2.0);
    }
    Ok(out)
}

/// Derive `(W, A)` for sampling `M` equally spaced bins over `[f_start,
/// f_end)` at sample rate `fs`: `W = exp(-i*2*pi*df/fs)` with
/// `df = (f_end - f_start) / M`, `A = exp(-i*2*pi*f_start/fs)`.
#[must_use]
pub fn params_for_freq_range(f_start: Real, f_end: Real, m: usize, fs: Real) -> (Complex, Complex) {
    let df = (f_end - f_start) / m as Real;
    let w = Complex::from_polar(1.0, -crate::core::TAU * df / fs);
    let a = Complex::from_polar(1.0, -crate::core::TAU * f_start / fs);
    (w, a)
}
