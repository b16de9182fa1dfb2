//! Autocorrelation, Levinson-Durbin recursion, and LPC spectrum (spec §4.M).
//!
//! No corpus exemplar implements Levinson-Durbin; this follows the
//! standard Yule-Walker recursion directly, consistent with the spec's own
//! Open Question note to verify against reference-library behavior rather
//! than clone a single existing code path.

use crate::core::{DspError, DspResult, Real};

/// Biased autocorrelation `r[lag] = sum_n x[n] * x[n + lag]` for
/// `lag in [0, max_lag]`.
#[must_use]
pub fn autocorrelation(x: &[Real], max_lag: usize) -> Vec<Real> {
    let n = x.len();
    (0..=max_lag)
        .map(|lag| {
            let mut acc = 0.0;
            for i in 0..n.saturating_sub(lag) {
                acc += x[i] * x[i + lag];
            }
            acc
        })
        .collect()
}

/// Result of the Levinson-Durbin recursion.
#[derive(Debug, Clone)]
pub struct LpcResult {
    /// Prediction coefficients `a[1..=order]` such that
    /// `x[n] ~= sum_{k=1}^{order} a[k] * x[n-k]`.
    pub coeffs: Vec<Real>,
    /// Final prediction-error (residual) variance.
    pub error: Real,
    /// Reflection (PARCOR) coefficients, one per recursion stage.
    pub reflection: Vec<Real>,
}

/// Solve the order-`p` normal equations from autocorrelation lags
/// `r[0..=p]` via Levinson-Durbin. `r.len() == order + 1`, else
/// [`DspError::InvalidSize`].
pub fn levinson_durbin(r: &[Real], order: usize) -> DspResult<LpcResult> {
    if r.len() != order + 1 {
        return Err(DspError::invalid_size("autocorrelation length must be order + 1"));
    }
    if r[0].abs() < 1e-20 {
        return Err(DspError::invalid_size("r[0] (signal energy) must be non-zero"));
    }
    let mut a = vec![0.0; order + 1];
    let mut error = r[0];
    let mut reflection = Vec::with_capacity(order);

    for i in 1..=order {
        let mut acc = r[i];
        for j in 1..i {
            acc -= a[j] * r[i - j];
        }
        let k = acc / error;
        reflection.push(k);

        let mut new_a = a.clone();
        new_a[i] = k;
        for j in 1..i {
            new_a[j] = a[j] - k * a[i - j];
        }
        a = new_a;
        error *= 1.0 - k * k;
        if error <= 0.0 {
            error = error.max(1e-30);
        }
    }

    Ok(LpcResult { coeffs: a[1..=order].to_vec(), error, reflection })
}

/// Fit an order-`p` LPC model to `x` via autocorrelation + Levinson-Durbin
/// in one step.
pub fn lpc_analyze(x: &[Real], order: usize) -> DspResult<LpcResult> {
    let r = autocorrelation(x, order);
    levinson_durbin(&r, order)
}

/// Evaluate the LPC all-pole magnitude spectrum
/// `H(k) = sqrt(error) / |1 - sum_{j=1}^{p} a[j] * exp(-i*2*pi*k*j/nfft)|`
/// at `nfft` linearly spaced bins over `[0, 2*pi)`.
#[must_use]
pub fn lpc_spectrum(lpc: &LpcResult, nfft: usize) -> Vec<Real> {
    let gain = lpc.error.max(0.0).sqrt();
    (0..nfft)
        .map(|k| {
            let omega = crate::core::TAU * k as Real / nfft as Real;
            let mut re = 1.0;
            let mut im = 0.0;
            for (j, &aj) in lpc.coeffs.iter().enumerate() {
                let order = (j + 1) as Real;
                re -= aj * (omega * order).cos();
                im += aj * (omega * order).sin();
            }
            let denom = (re * re + im * im).sqrt().max(1e-12);
            gain / denom
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocorrelation_lag_zero_is_energy() {
        let x = vec![1.0, -1.0, 1.0, -1.0];
        let r = autocorrelation(&x, 2);
        assert!((r[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn levinson_durbin_recovers_ar1_process() {
        // x[n] = 0.5*x[n-1] + noise -> autocorrelation r[k] = 0.5^k (up to scale).
        let r = vec![1.0, 0.5, 0.25, 0.125];
        let result = levinson_durbin(&r, 1).unwrap();
        assert!((result.coeffs[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(levinson_durbin(&[1.0, 0.5], 2).is_err());
    }

    #[test]
    fn lpc_spectrum_is_nonnegative_and_peaks_near_resonance() {
        let n = 256;
        let freq_bin = 20.0;
        let x: Vec<Real> = (0..n)
            .map(|i| (crate::core::TAU * freq_bin * i as Real / n as Real).sin())
            .collect();
        let lpc = lpc_analyze(&x, 8).unwrap();
        let spectrum = lpc_spectrum(&lpc, 128);
        assert!(spectrum.iter().all(|&v| v >= 0.0));
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let expected_bin = (freq_bin / n as Real * 128.0).round() as usize;
        assert!((peak_bin as isize - expected_bin as isize).unsigned_abs() <= 4);
    }
}
