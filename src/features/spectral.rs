//! Supplemental spectral-feature helpers operating on one-sided power
//! spectra (see `SPEC_FULL.md` §B).
//!
//! Grounded directly on `momoto-audio/src/perceptual/spectral.rs`
//! (`spectral_centroid`, `spectral_brightness`, `spectral_flux`,
//! `spectral_rolloff`, `spectral_flatness`), carried over with the same
//! one-sided power-spectrum convention the Mel filterbank already uses.

use crate::core::Real;

/// Bin-index-weighted centroid of `power` (a one-sided power spectrum),
/// expressed in bins; multiply by `fs / n_fft` for Hz.
#[must_use]
pub fn spectral_centroid(power: &[Real]) -> Real {
    let total: Real = power.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: Real = power.iter().enumerate().map(|(k, &p)| k as Real * p).sum();
    weighted / total
}

/// Fraction of total power above a fixed cutoff bin, a coarse measure of
/// high-frequency content.
#[must_use]
pub fn spectral_brightness(power: &[Real], cutoff_bin: usize) -> Real {
    let total: Real = power.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let high: Real = power.iter().skip(cutoff_bin).sum();
    high / total
}

/// Half-wave-rectified squared difference between successive power
/// spectra — large when new energy appears, zero when energy only decays.
#[must_use]
pub fn spectral_flux(prev: &[Real], curr: &[Real]) -> Real {
    assert_eq!(prev.len(), curr.len(), "spectra must have matching length");
    prev.iter()
        .zip(curr.iter())
        .map(|(&p, &c)| {
            let d = c - p;
            if d > 0.0 {
                d * d
            } else {
                0.0
            }
        })
        .sum()
}

/// The smallest bin index below which `rolloff_fraction` of total power is
/// contained (e.g. `0.85` for the conventional 85% rolloff point).
#[must_use]
pub fn spectral_rolloff(power: &[Real], rolloff_fraction: Real) -> usize {
    let total: Real = power.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let threshold = total * rolloff_fraction;
    let mut acc = 0.0;
    for (k, &p) in power.iter().enumerate() {
        acc += p;
        if acc >= threshold {
            return k;
        }
    }
    power.len().saturating_sub(1)
}

/// Geometric-mean-over-arithmetic-mean ratio — near `1` for noise-like
/// (flat) spectra, near `0` for tonal (peaky) spectra.
#[must_use]
pub fn spectral_flatness(power: &[Real]) -> Real {
    if power.is_empty() {
        return 0.0;
    }
    let n = power.len() as Real;
    let eps = 1e-20;
    let log_sum: Real = power.iter().map(|&p| (p + eps).ln()).sum();
    let geo_mean = (log_sum / n).exp();
    let arith_mean: Real = power.iter().sum::<Real>() / n;
    if arith_mean <= 0.0 {
        return 0.0;
    }
    geo_mean / arith_mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_single_bin_is_that_bin() {
        let mut power = vec![0.0; 8];
        power[3] = 1.0;
        assert!((spectral_centroid(&power) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn flatness_of_constant_spectrum_is_one() {
        let power = vec![2.0; 16];
        assert!((spectral_flatness(&power) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn flatness_of_impulse_spectrum_is_near_zero() {
        let mut power = vec![1e-12; 16];
        power[0] = 10.0;
        assert!(spectral_flatness(&power) < 0.3);
    }

    #[test]
    fn rolloff_at_full_fraction_is_last_bin() {
        let power = vec![1.0; 10];
        assert_eq!(spectral_rolloff(&power, 1.0), 9);
    }

    #[test]
    fn flux_ignores_decaying_energy() {
        let prev = vec![1.0, 1.0, 1.0];
        let curr = vec![0.5, 0.5, 0.5];
        assert_eq!(spectral_flux(&prev, &curr), 0.0);
    }
}
