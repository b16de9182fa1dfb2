//! DCT-II, -III, -IV forward and inverse transforms (spec §4.O).
//!
//! Implemented as direct O(N^2) sums rather than routed through an FFT of
//! length `4N` on a symmetry-extended sequence — spec.md is explicit that
//! "the contract is purely the mathematical transform, not the routing",
//! and `N` here is always small (MFCC's `n_mels`, typically tens), so the
//! direct form is simpler and exact.

use crate::core::Real;

/// Forward DCT-II: `X[k] = sum_n x[n] * cos(pi/N * (n + 0.5) * k)`.
#[must_use]
pub fn dct2(x: &[Real]) -> Vec<Real> {
    let n = x.len();
    let mut out = vec![0.0; n];
    for (k, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (i, &xi) in x.iter().enumerate() {
            acc += xi * (crate::core::PI / n as Real * (i as Real + 0.5) * k as Real).cos();
        }
        *o = acc;
    }
    out
}

/// DCT-III, the inverse of DCT-II up to `2/N` scaling:
/// `x[n] = X[0]/2 + sum_{k=1}^{N-1} X[k] * cos(pi/N * (n + 0.5) * k)`.
#[must_use]
pub fn dct3(x: &[Real]) -> Vec<Real> {
    let n = x.len();
    let mut out = vec![0.0; n];
    for (i, o) in out.iter_mut().enumerate() {
        let mut acc = x[0] / 2.0;
        for (k, &xk) in x.iter().enumerate().skip(1) {
            acc += xk * (crate::core::PI / n as Real * (i as Real + 0.5) * k as Real).cos();
        }
        *o = acc;
    }
    out
}

/// Exact inverse of [`dct2`]: `dct3(dct2(x)) * 2/N == x`.
#[must_use]
pub fn idct2(x: &[Real]) -> Vec<Real> {
    let n = x.len().max(1) as Real;
    dct3(x).into_iter().map(|v| v * 2.0 / n).collect()
}

/// DCT-IV: `X[k] = sum_n x[n] * cos(pi/N * (n + 0.5) * (k + 0.5))`. Self-
/// inverse up to `2/N` scaling.
#[must_use]
pub fn dct4(x: &[Real]) -> Vec<Real> {
    let n = x.len();
    let mut out = vec![0.0; n];
    for (k, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (i, &xi) in x.iter().enumerate() {
            acc += xi
                * (crate::core::PI / n as Real * (i as Real + 0.5) * (k as Real + 0.5)).cos();
        }
        *o = acc;
    }
    out
}

/// Exact inverse of [`dct4`]: `idct4(dct4(x)) == x`.
#[must_use]
pub fn idct4(x: &[Real]) -> Vec<Real> {
    let n = x.len().max(1) as Real;
    dct4(x).into_iter().map(|v| v * 2.0 / n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[Real], b: &[Real], eps: Real) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < eps, "{x} vs {y}");
        }
    }

    #[test]
    fn dct2_idct2_roundtrip() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let spec = dct2(&x);
        let back = idct2(&spec);
        approx(&x, &back, 1e-3);
    }

    #[test]
    fn dct4_is_self_inverse_up_to_scale() {
        let x = vec![0.5, -1.0, 2.0, 3.5, -0.25];
        let spec = dct4(&x);
        let back = idct4(&spec);
        approx(&x, &back, 1e-3);
    }

    #[test]
    fn dc_input_concentrates_energy_in_bin_zero() {
        let x = vec![3.0; 8];
        let spec = dct2(&x);
        assert!(spec[0].abs() > spec[1..].iter().map(|v| v.abs()).sum::<Real>());
    }
}
