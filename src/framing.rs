//! Frame extraction and overlap-add accumulation (spec §4.F).

use crate::core::Real;

/// Number of frames a signal of length `n` yields for the given
/// `frame`/`hop`/`center` configuration.
#[must_use]
pub fn num_frames(n: usize, frame: usize, hop: usize, center: bool) -> usize {
    if center {
        (n + hop - 1) / hop.max(1)
    } else if n >= frame {
        1 + (n - frame) / hop.max(1)
    } else {
        0
    }
}

/// Reflect index `i` around `[0, n)` by folding at the boundaries, handling
/// overflows of more than one period via modulo `2n` folding.
fn reflect_index(i: isize, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let period = 2 * n as isize;
    let mut m = i % period;
    if m < 0 {
        m += period;
    }
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Extract frame `idx` from `sig` into `out` (length `frame`), zero-padding
/// (non-centered) or reflecting (centered) out-of-range samples. If
/// `window` is supplied it is multiplied into `out` in place, matching the
/// combined extract-and-window step `spec.md` describes for STFT analysis.
pub fn fetch_frame(sig: &[Real], out: &mut [Real], frame: usize, hop: usize, idx: usize, center: bool, window: Option<&[Real]>) {
    assert_eq!(out.len(), frame, "out buffer must have length `frame`");
    let n = sig.len();
    let start = idx as isize * hop as isize - if center { frame as isize / 2 } else { 0 };
    for (k, o) in out.iter_mut().enumerate() {
        let pos = start + k as isize;
        *o = if center {
            if n == 0 {
                0.0
            } else {
                sig[reflect_index(pos, n)]
            }
        } else if pos >= 0 && (pos as usize) < n {
            sig[pos as usize]
        } else {
            0.0
        };
    }
    if let Some(w) = window {
        assert_eq!(w.len(), frame, "window length must equal frame length");
        for (o, &wv) in out.iter_mut().zip(w.iter()) {
            *o *= wv;
        }
    }
}

/// Accumulate `frame` (length `frame_len`) into `out` at `idx * hop`,
/// bounds-checked: writes past `out.len()` are silently dropped.
pub fn overlap_add(frame: &[Real], out: &mut [Real], frame_len: usize, hop: usize, idx: usize) {
    assert_eq!(frame.len(), frame_len, "frame buffer must have length `frame_len`");
    let start = idx * hop;
    for (k, &v) in frame.iter().enumerate() {
        let pos = start + k;
        if pos < out.len() {
            out[pos] += v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_frames_non_centered_exact() {
        assert_eq!(num_frames(16, 4, 4, false), 4);
        assert_eq!(num_frames(3, 4, 4, false), 0);
    }

    #[test]
    fn num_frames_centered_ceiling() {
        assert_eq!(num_frames(10, 4, 4, true), 3);
    }

    #[test]
    fn fetch_frame_zero_pads_noncentered_tail() {
        let sig = vec![1.0, 2.0, 3.0];
        let mut out = vec![0.0; 4];
        fetch_frame(&sig, &mut out, 4, 4, 0, false, None);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn fetch_frame_applies_window() {
        let sig = vec![1.0, 1.0, 1.0, 1.0];
        let window = vec![0.5, 1.0, 1.0, 0.5];
        let mut out = vec![0.0; 4];
        fetch_frame(&sig, &mut out, 4, 4, 0, false, Some(&window));
        assert_eq!(out, vec![0.5, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn overlap_add_accumulates_and_drops_out_of_range() {
        let mut out = vec![0.0; 4];
        overlap_add(&[1.0, 1.0, 1.0, 1.0], &mut out, 4, 2, 0);
        overlap_add(&[1.0, 1.0, 1.0, 1.0], &mut out, 4, 2, 1);
        assert_eq!(out, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn reflect_index_handles_multi_period_overflow() {
        assert_eq!(reflect_index(-1, 4), 1);
        assert_eq!(reflect_index(4, 4), 2);
        assert_eq!(reflect_index(-9, 4), reflect_index(-9 + 8, 4));
    }
}
