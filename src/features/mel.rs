//! Hz<->Mel conversion and the triangular Mel filterbank (spec §4.N).
//!
//! Grounded on `momoto-audio/src/perceptual/mel.rs`: same HTK formula, same
//! sparse flat `(usize, Real)` storage with per-filter offsets instead of a
//! dense `n_mels x n_fft_bins` matrix, same area-normalization approach
//! (that file uses the Slaney `2/(hz_r - hz_l)` form; spec.md §4.N instead
//! asks for "sum of weights = 1", so the normalization constant is derived
//! fresh per filter by dividing by the triangle's own area rather than
//! reusing the teacher's closed-form bandwidth-based constant).

use crate::core::{DspError, DspResult, Real};

/// HTK Hz→Mel: `mel = 2595 * log10(1 + hz/700)`.
#[must_use]
pub fn hz_to_mel(hz: Real) -> Real {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// HTK Mel→Hz: `hz = 700 * (10^(mel/2595) - 1)`.
#[must_use]
pub fn mel_to_hz(mel: Real) -> Real {
    700.0 * (10f64.powf(mel as f64 / 2595.0) as Real - 1.0)
}

/// The Slaney Mel variant is reserved — recognized but not implemented.
pub fn hz_to_mel_slaney(_hz: Real) -> DspResult<Real> {
    Err(DspError::Unsupported("slaney mel variant"))
}

/// A sparse triangular Mel filterbank: `n_mels + 2` equally Mel-spaced
/// points between `fmin` and `fmax`, each filter rising linearly from
/// `left` to `center` and falling to `right`, area-normalized (weights for
/// a filter sum to `1`).
pub struct MelFilterbank {
    n_mels: usize,
    n_fft_bins: usize,
    /// Flattened `(bin_index, weight)` pairs for every filter, concatenated.
    weights: Box<[(usize, Real)]>,
    /// `band_offsets[m]..band_offsets[m+1]` indexes into `weights` for
    /// filter `m`.
    band_offsets: Box<[usize]>,
}

impl MelFilterbank {
    /// `n_mels < n_fft/2 + 1` and `0 <= fmin < fmax <= fs/2`, else
    /// [`DspError::InvalidSize`]/[`DspError::OutOfRange`].
    pub fn new(n_mels: usize, n_fft: usize, sample_rate: Real, fmin: Real, fmax: Real) -> DspResult<Self> {
        let n_fft_bins = n_fft / 2 + 1;
        if n_mels == 0 || n_mels >= n_fft_bins {
            return Err(DspError::invalid_size("n_mels must be >= 1 and < n_fft/2 + 1"));
        }
        if !(fmin >= 0.0 && fmin < fmax && fmax <= sample_rate / 2.0) {
            return Err(DspError::out_of_range(
                "fmin/fmax",
                fmin as f64,
                "0 <= fmin < fmax <= fs/2",
            ));
        }

        let mel_min = hz_to_mel(fmin);
        let mel_max = hz_to_mel(fmax);
        let points: Vec<Real> = (0..n_mels + 2)
            .map(|i| mel_min + (mel_max - mel_min) * i as Real / (n_mels + 1) as Real)
            .map(mel_to_hz)
            .collect();
        let bin_freqs: Vec<Real> =
            (0..n_fft_bins).map(|k| k as Real * sample_rate / n_fft as Real).collect();

        let mut weights = Vec::new();
        let mut band_offsets = vec![0usize];
        for m in 0..n_mels {
            let (left, center, right) = (points[m], points[m + 1], points[m + 2]);
            let mut filter_weights = Vec::new();
            for (k, &f) in bin_freqs.iter().enumerate() {
                let w = if f <= left || f >= right {
                    0.0
                } else if f <= center {
                    if (center - left).abs() < 1e-9 {
                        1.0
                    } else {
                        (f - left) / (center - left)
                    }
                } else if (right - center).abs() < 1e-9 {
                    1.0
                } else {
                    (right - f) / (right - center)
                };
                if w > 0.0 {
                    filter_weights.push((k, w));
                }
            }
            let sum: Real = filter_weights.iter().map(|(_, w)| w).sum();
            if sum > 1e-12 {
                for (_, w) in &mut filter_weights {
                    *w /= sum;
                }
            }
            weights.extend(filter_weights);
            band_offsets.push(weights.len());
        }

        Ok(Self {
            n_mels,
            n_fft_bins,
            weights: weights.into_boxed_slice(),
            band_offsets: band_offsets.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    #[must_use]
    pub fn n_fft_bins(&self) -> usize {
        self.n_fft_bins
    }

    /// Apply the filterbank to a one-sided `power` spectrum (length
    /// `n_fft_bins`), writing `n_mels` band energies into `out`.
    pub fn apply_into(&self, power: &[Real], out: &mut [Real]) {
        assert_eq!(power.len(), self.n_fft_bins, "power spectrum length mismatch");
        assert_eq!(out.len(), self.n_mels, "out length must equal n_mels");
        for (m, o) in out.iter_mut().enumerate() {
            let range = self.band_offsets[m]..self.band_offsets[m + 1];
            *o = self.weights[range].iter().map(|&(k, w)| w * power[k]).sum();
        }
    }

    /// Allocating convenience wrapper around [`MelFilterbank::apply_into`].
    #[must_use]
    pub fn apply(&self, power: &[Real]) -> Vec<Real> {
        let mut out = vec![0.0; self.n_mels];
        self.apply_into(power, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hz_mel_roundtrip() {
        let hz = 1000.0;
        let mel = hz_to_mel(hz);
        assert!((mel_to_hz(mel) - hz).abs() < 1e-3);
    }

    #[test]
    fn slaney_variant_is_unsupported() {
        assert!(hz_to_mel_slaney(1000.0).is_err());
    }

    #[test]
    fn rejects_too_many_mels() {
        assert!(MelFilterbank::new(300, 512, 16_000.0, 0.0, 8000.0).is_err());
    }

    #[test]
    fn rejects_invalid_fmin_fmax() {
        assert!(MelFilterbank::new(20, 512, 16_000.0, 8000.0, 100.0).is_err());
    }

    #[test]
    fn filters_are_area_normalized() {
        let fb = MelFilterbank::new(10, 512, 16_000.0, 0.0, 8000.0).unwrap();
        for m in 0..fb.n_mels() {
            let range = fb.band_offsets[m]..fb.band_offsets[m + 1];
            let sum: Real = fb.weights[range].iter().map(|(_, w)| w).sum();
            assert!((sum - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn white_noise_power_spreads_across_bands() {
        let fb = MelFilterbank::new(8, 256, 16_000.0, 0.0, 8000.0).unwrap();
        let power = vec![1.0; fb.n_fft_bins()];
        let out = fb.apply(&power);
        assert!(out.iter().all(|&v| v > 0.0));
    }
}
