//! Spectral utilities: fftshift/ifftshift, phase wrap/unwrap (spec §4.E).

use crate::core::Real;

/// Swap the left and right halves of `buf` so that the zero-frequency (or
/// zero-lag) component moves to the center. For odd length the extra sample
/// stays with the second half, matching `numpy.fft.fftshift`.
pub fn fftshift<T: Copy>(buf: &mut [T]) {
    let n = buf.len();
    let mid = n / 2;
    buf.rotate_left(mid);
}

/// Inverse of [`fftshift`] — undoes the rotation exactly, including for odd
/// lengths where `fftshift`/`ifftshift` are not self-inverse.
pub fn ifftshift<T: Copy>(buf: &mut [T]) {
    let n = buf.len();
    let mid = n - n / 2;
    buf.rotate_left(mid);
}

/// Wrap an angle (radians) into `(-pi, pi]`.
#[must_use]
pub fn wrap_phase(theta: Real) -> Real {
    let tau = crate::core::TAU;
    let mut wrapped = (theta + crate::core::PI) % tau;
    if wrapped < 0.0 {
        wrapped += tau;
    }
    wrapped - crate::core::PI
}

/// Unwrap a sequence of phase samples in place, adding/subtracting multiples
/// of `2*pi` so that successive differences never exceed `pi` in magnitude.
pub fn unwrap_phase(phase: &mut [Real]) {
    if phase.len() < 2 {
        return;
    }
    let tau = crate::core::TAU;
    let mut correction = 0.0;
    for i in 1..phase.len() {
        let prev_raw = phase[i - 1] - correction;
        let mut delta = phase[i] - prev_raw;
        while delta > crate::core::PI {
            delta -= tau;
            correction += tau;
        }
        while delta < -crate::core::PI {
            delta += tau;
            correction -= tau;
        }
        phase[i] -= correction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fftshift_even_length() {
        let mut v = vec![0, 1, 2, 3, 4, 5];
        fftshift(&mut v);
        assert_eq!(v, vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn fftshift_ifftshift_roundtrip_odd_length() {
        let original = vec![0, 1, 2, 3, 4];
        let mut v = original.clone();
        fftshift(&mut v);
        ifftshift(&mut v);
        assert_eq!(v, original);
    }

    #[test]
    fn wrap_phase_keeps_in_range() {
        let w = wrap_phase(3.0 * crate::core::PI);
        assert!(w > -crate::core::PI && w <= crate::core::PI);
    }

    #[test]
    fn unwrap_phase_removes_jumps() {
        let mut phase = vec![0.0, 3.0, -3.0, 3.0, -3.0];
        unwrap_phase(&mut phase);
        for w in phase.windows(2) {
            assert!((w[1] - w[0]).abs() <= crate::core::PI + 1e-4);
        }
    }
}
