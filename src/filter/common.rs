//! Shared helpers between [`crate::filter::fir`] and [`crate::filter::iir`].

use crate::core::Real;

/// Mirror-reflect-pad `input` by `pad` samples on each side: left pad `i`
/// reads `input[i+1]` counting back from the start, right pad `i` reads
/// `input[n-2-i]`. Used by both FIR and IIR `filtfilt` so that group delay
/// introduced by the padding itself cancels identically on both paths.
pub fn reflect_pad(input: &[Real], pad: usize) -> Vec<Real> {
    let n = input.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    for i in 0..pad {
        out.push(input[(i + 1).min(n.saturating_sub(1))]);
    }
    out.reverse();
    out.extend_from_slice(input);
    for i in 0..pad {
        let idx = n.saturating_sub(2).saturating_sub(i);
        out.push(input[idx]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_pad_lengths() {
        let input = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let padded = reflect_pad(&input, 2);
        assert_eq!(padded.len(), input.len() + 4);
    }
}
