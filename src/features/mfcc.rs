//! MFCC pipeline: log-Mel + DCT-II + liftering, with plan lifecycle
//! (spec §4.N).

use crate::core::{DspError, DspResult, Real};
use crate::features::mel::MelFilterbank;
use crate::spectral::dct::dct2;

/// Immutable MFCC configuration and precomputed filterbank.
pub struct MfccPlan {
    filterbank: MelFilterbank,
    num_mfcc_coeffs: usize,
    lifter: Real,
    log_epsilon: Real,
}

impl MfccPlan {
    /// `num_mfcc_coeffs <= n_mels`, else [`DspError::InvalidSize`].
    /// `lifter <= 0` disables liftering.
    pub fn new(
        n_mels: usize,
        n_fft: usize,
        sample_rate: Real,
        fmin: Real,
        fmax: Real,
        num_mfcc_coeffs: usize,
        lifter: Real,
        log_epsilon: Real,
    ) -> DspResult<Self> {
        if num_mfcc_coeffs > n_mels {
            return Err(DspError::invalid_size("num_mfcc_coeffs must be <= n_mels"));
        }
        let filterbank = MelFilterbank::new(n_mels, n_fft, sample_rate, fmin, fmax)?;
        Ok(Self { filterbank, num_mfcc_coeffs, lifter, log_epsilon })
    }

    #[must_use]
    pub fn num_mfcc_coeffs(&self) -> usize {
        self.num_mfcc_coeffs
    }

    /// `log_mel[m] = log(sum_k filterbank[m,k] * power[k] + eps)`.
    #[must_use]
    pub fn log_mel(&self, power: &[Real]) -> Vec<Real> {
        self.filterbank
            .apply(power)
            .into_iter()
            .map(|e| (e + self.log_epsilon).ln())
            .collect()
    }

    /// Process one frame's one-sided power spectrum into
    /// `num_mfcc_coeffs` cepstral coefficients: DCT-II across the
    /// `n_mels` axis, keep the first `num_mfcc_coeffs`, lifter coefficients
    /// `i >= 1` by `1 + (L/2) * sin(pi*i/L)` when `L > 0` (coefficient 0 is
    /// never liftered).
    #[must_use]
    pub fn process(&self, power: &[Real]) -> Vec<Real> {
        let log_mel = self.log_mel(power);
        let mut coeffs = dct2(&log_mel);
        coeffs.truncate(self.num_mfcc_coeffs);
        if self.lifter > 0.0 {
            for (i, c) in coeffs.iter_mut().enumerate().skip(1) {
                let factor = 1.0 + (self.lifter / 2.0) * (crate::core::PI * i as Real / self.lifter).sin();
                *c *= factor;
            }
        }
        coeffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_many_requested_coeffs() {
        let result = MfccPlan::new(13, 512, 16_000.0, 0.0, 8000.0, 20, 22.0, 1e-6);
        assert!(result.is_err());
    }

    #[test]
    fn process_produces_requested_coefficient_count() {
        let plan = MfccPlan::new(26, 512, 16_000.0, 0.0, 8000.0, 13, 22.0, 1e-6).unwrap();
        let power = vec![1.0; plan.filterbank.n_fft_bins()];
        let coeffs = plan.process(&power);
        assert_eq!(coeffs.len(), 13);
    }

    #[test]
    fn lifter_zero_leaves_coefficients_unscaled() {
        let plan_no_lift = MfccPlan::new(13, 256, 8000.0, 0.0, 4000.0, 13, 0.0, 1e-6).unwrap();
        let power: Vec<Real> = (0..plan_no_lift.filterbank.n_fft_bins())
            .map(|k| 1.0 + k as Real * 0.01)
            .collect();
        let log_mel = plan_no_lift.log_mel(&power);
        let expected = dct2(&log_mel);
        let coeffs = plan_no_lift.process(&power);
        for (a, b) in coeffs.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
