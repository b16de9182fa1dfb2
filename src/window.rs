//! Symmetric window coefficient generation (spec §4.C).
//!
//! Every window is symmetric (`w[n] = w[N-1-n]`), normalized to a peak of
//! `1.0`, and defined for any length `N` (with the `N = 1` degenerate case
//! `w[0] = 1`). Parametric windows (Kaiser, Tukey, Planck-taper) take their
//! shape parameter directly rather than through a config struct, mirroring
//! the teacher's plain free-function style in `momoto-audio::perceptual::mel`
//! (`hz_to_mel`/`mel_to_hz` take scalars, not a config object).

use crate::core::{DspError, DspResult, Real, PI};

/// Which symmetric window to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    /// Rectangular (all-ones); included for completeness of frame-processing
    /// call sites that want "no window" without a branch.
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
    Nuttall,
    Bartlett,
    Bohman,
    Cosine,
    Flattop,
    /// Kaiser(β).
    Kaiser(Real),
    /// Tukey(α), α clamped to `[0, 1]`.
    Tukey(Real),
    /// Planck-taper(ε), ε defaulted to `0.1` by [`planck_taper`] when called
    /// without an explicit value.
    Planck(Real),
}

/// Generate `n` symmetric coefficients of `kind` into a freshly allocated
/// vector. See [`generate_into`] for the zero-allocation form.
#[must_use]
pub fn generate(kind: WindowType, n: usize) -> Vec<Real> {
    let mut out = vec![0.0; n];
    generate_into(kind, &mut out);
    out
}

/// Write `n = out.len()` symmetric coefficients of `kind` into `out`.
///
/// `N = 0` leaves `out` untouched (nothing to write); `N = 1` writes `[1.0]`.
pub fn generate_into(kind: WindowType, out: &mut [Real]) {
    let n = out.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        out[0] = 1.0;
        return;
    }
    match kind {
        WindowType::Rectangular => out.fill(1.0),
        WindowType::Hann => cosine_sum_into(out, &[0.5, 0.5]),
        WindowType::Hamming => cosine_sum_into(out, &[0.54, 0.46]),
        WindowType::Blackman => cosine_sum_into(out, &[0.42, 0.5, 0.08]),
        WindowType::BlackmanHarris => {
            cosine_sum_into(out, &[0.35875, 0.48829, 0.14128, 0.01168])
        }
        WindowType::Nuttall => cosine_sum_into(out, &[0.355_768, 0.487_396, 0.144_232, 0.012_604]),
        WindowType::Flattop => cosine_sum_into(
            out,
            &[0.21557895, 0.41663158, 0.277_263_16, 0.083_578_95, 0.006_947_37],
        ),
        WindowType::Bartlett => bartlett_into(out),
        WindowType::Bohman => bohman_into(out),
        WindowType::Cosine => cosine_window_into(out),
        WindowType::Kaiser(beta) => kaiser_into(out, beta),
        WindowType::Tukey(alpha) => tukey_into(out, alpha.clamp(0.0, 1.0)),
        WindowType::Planck(epsilon) => planck_taper_into(out, epsilon),
    }
}

/// Fallible entry point: rejects non-finite or out-of-domain parameters
/// instead of silently clamping, for callers that want `INVALID_SIZE`/
/// `OUT_OF_RANGE` surfaced rather than defensively normalized.
pub fn try_generate(kind: WindowType, n: usize) -> DspResult<Vec<Real>> {
    match kind {
        WindowType::Kaiser(beta) if !beta.is_finite() || beta < 0.0 => {
            return Err(DspError::out_of_range("beta", beta as f64, "beta >= 0, finite"))
        }
        WindowType::Tukey(alpha) if !alpha.is_finite() => {
            return Err(DspError::out_of_range("alpha", alpha as f64, "0 <= alpha <= 1, finite"))
        }
        WindowType::Planck(epsilon) if !(0.0..0.5).contains(&epsilon) => {
            return Err(DspError::out_of_range(
                "epsilon",
                epsilon as f64,
                "0 < epsilon < 0.5",
            ))
        }
        _ => {}
    }
    Ok(generate(kind, n))
}

/// `w[n] = sum_k (-1)^k a_k cos(2*pi*k*n / (N-1))` — the shared form behind
/// Hann/Hamming/Blackman/Blackman-Harris/Nuttall/Flattop, differing only in
/// the coefficient table.
fn cosine_sum_into(out: &mut [Real], coeffs: &[Real]) {
    let n = out.len();
    let denom = (n - 1) as Real;
    for (i, w) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        let mut sign = 1.0;
        for (k, &a) in coeffs.iter().enumerate() {
            acc += sign * a * ((crate::core::TAU * k as Real * i as Real) / denom).cos();
            sign = -sign;
        }
        *w = acc;
    }
}

fn bartlett_into(out: &mut [Real]) {
    let n = out.len();
    let denom = (n - 1) as Real;
    for (i, w) in out.iter_mut().enumerate() {
        let i = i as Real;
        *w = 1.0 - (2.0 * (i - denom / 2.0) / denom).abs();
    }
}

fn bohman_into(out: &mut [Real]) {
    let n = out.len();
    let half = (n - 1) as Real / 2.0;
    for (i, w) in out.iter_mut().enumerate() {
        let x = ((i as Real - half) / half).abs().min(1.0);
        *w = (1.0 - x) * (PI * x).cos() + (1.0 / PI) * (PI * x).sin();
    }
}

fn cosine_window_into(out: &mut [Real]) {
    let n = out.len();
    let denom = (n - 1) as Real;
    for (i, w) in out.iter_mut().enumerate() {
        *w = (PI * i as Real / denom).sin();
    }
}

/// Modified Bessel function of the first kind, order 0, via its power
/// series, truncated once a term contributes less than `1e-12` — per
/// spec §4.C.
fn bessel_i0(x: Real) -> Real {
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        term *= (x / 2.0) * (x / 2.0) / (k * k);
        sum += term;
        if term < 1e-12 {
            break;
        }
        k += 1.0;
        if k > 200.0 {
            break;
        }
    }
    sum
}

fn kaiser_into(out: &mut [Real], beta: Real) {
    let n = out.len();
    let denom = (n - 1) as Real;
    let i0_beta = bessel_i0(beta);
    for (i, w) in out.iter_mut().enumerate() {
        let r = (2.0 * i as Real / denom) - 1.0;
        let arg = beta * (1.0 - r * r).max(0.0).sqrt();
        *w = bessel_i0(arg) / i0_beta;
    }
}

fn tukey_into(out: &mut [Real], alpha: Real) {
    let n = out.len();
    if alpha <= 0.0 {
        out.fill(1.0);
        return;
    }
    if alpha >= 1.0 {
        cosine_sum_into(out, &[0.5, 0.5]);
        return;
    }
    let denom = (n - 1) as Real;
    let edge = alpha * denom / 2.0;
    for (i, w) in out.iter_mut().enumerate() {
        let i = i as Real;
        *w = if i < edge {
            0.5 * (1.0 + (PI * (i / edge - 1.0)).cos())
        } else if i > denom - edge {
            0.5 * (1.0 + (PI * ((i - denom) / edge + 1.0)).cos())
        } else {
            1.0
        };
    }
}

/// Planck-taper with the spec's default `epsilon = 0.1` when none is given
/// explicitly via [`WindowType::Planck`].
pub fn planck_taper(n: usize) -> Vec<Real> {
    generate(WindowType::Planck(0.1), n)
}

fn planck_taper_into(out: &mut [Real], epsilon: Real) {
    let n = out.len();
    let eps = epsilon.clamp(1e-6, 0.499);
    let denom = (n - 1) as Real;
    let edge = eps * denom;
    for (i, w) in out.iter_mut().enumerate() {
        let i = i as Real;
        *w = if i == 0.0 || i == denom {
            0.0
        } else if i < edge {
            1.0 / (1.0 + (edge / i - edge / (edge - i)).exp())
        } else if i > denom - edge {
            let j = denom - i;
            1.0 / (1.0 + (edge / j - edge / (edge - j)).exp())
        } else {
            1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_symmetric(w: &[Real]) -> bool {
        let n = w.len();
        w.iter().zip(w.iter().rev()).all(|(a, b)| (a - b).abs() < 1e-5)
    }

    #[test]
    fn length_one_is_unity() {
        assert_eq!(generate(WindowType::Hann, 1), vec![1.0]);
        assert_eq!(generate(WindowType::Kaiser(8.0), 1), vec![1.0]);
    }

    #[test]
    fn length_zero_is_empty() {
        assert!(generate(WindowType::Hann, 0).is_empty());
    }

    #[test]
    fn hann_is_symmetric_and_peaks_at_one() {
        let w = generate(WindowType::Hann, 64);
        assert!(is_symmetric(&w));
        let peak = w.iter().cloned().fold(0.0, Real::max);
        assert!((peak - 1.0).abs() < 1e-5);
        assert!(w[0].abs() < 1e-5);
    }

    #[test]
    fn all_windows_are_symmetric() {
        let kinds = [
            WindowType::Rectangular,
            WindowType::Hann,
            WindowType::Hamming,
            WindowType::Blackman,
            WindowType::BlackmanHarris,
            WindowType::Nuttall,
            WindowType::Bartlett,
            WindowType::Bohman,
            WindowType::Cosine,
            WindowType::Flattop,
            WindowType::Kaiser(8.6),
            WindowType::Tukey(0.5),
            WindowType::Planck(0.1),
        ];
        for kind in kinds {
            let w = generate(kind, 33);
            assert!(is_symmetric(&w), "{kind:?} not symmetric");
        }
    }

    #[test]
    fn tukey_alpha_zero_is_rectangular() {
        let w = generate(WindowType::Tukey(0.0), 16);
        assert!(w.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn tukey_alpha_one_is_hann() {
        let a = generate(WindowType::Tukey(1.0), 16);
        let b = generate(WindowType::Hann, 16);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn kaiser_beta_zero_is_rectangular() {
        let w = generate(WindowType::Kaiser(0.0), 16);
        assert!(w.iter().all(|&v| (v - 1.0).abs() < 1e-5));
    }

    #[test]
    fn planck_taper_edges_are_zero() {
        let w = generate(WindowType::Planck(0.1), 32);
        assert!(w[0].abs() < 1e-9);
        assert!(w[31].abs() < 1e-9);
        assert!((w[16] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn try_generate_rejects_negative_beta() {
        assert!(try_generate(WindowType::Kaiser(-1.0), 16).is_err());
    }
}
