//! Closed error taxonomy (spec §7).
//!
//! Every fallible *construction* path (`make_plan`, `Stft::new`,
//! `Resampler::new`, biquad synthesis, `MfccPlan::new`, ...) returns
//! [`DspResult<T>`]. Buffer-shape mismatches on an already-validated object
//! are a caller bug, not a recoverable condition, and panic via `assert!`
//! instead — the same split the teacher (`momoto-audio`) draws between its
//! `Option`-returning constructors and its `assert_eq!`-guarded hot paths.

/// The closed set of non-`OK` outcomes from a fallible operation.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum DspError {
    /// A required buffer or handle was missing.
    #[error("null argument: {0}")]
    NullArgument(&'static str),

    /// A size was zero where forbidden, or violated a size invariant.
    #[error("invalid size: {reason}")]
    InvalidSize {
        /// Human-readable description of which invariant was violated.
        reason: String,
    },

    /// A numeric parameter fell outside its permitted domain.
    #[error("out of range: {parameter} = {value}, expected {expected}")]
    OutOfRange {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The value that was supplied.
        value: f64,
        /// A description of the permitted domain.
        expected: &'static str,
    },

    /// A recognized but not-compiled-in feature was requested.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Allocation failure, backend refusal to plan, or any condition the
    /// caller cannot directly fix.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl DspError {
    /// Build an [`DspError::InvalidSize`] from a formatted reason.
    #[must_use]
    pub fn invalid_size(reason: impl Into<String>) -> Self {
        Self::InvalidSize { reason: reason.into() }
    }

    /// Build an [`DspError::OutOfRange`] for a named parameter.
    #[must_use]
    pub fn out_of_range(parameter: &'static str, value: f64, expected: &'static str) -> Self {
        Self::OutOfRange { parameter, value, expected }
    }
}

/// Result alias used throughout the crate's fallible constructors.
pub type DspResult<T> = Result<T, DspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_non_empty() {
        let errs = [
            DspError::NullArgument("window"),
            DspError::invalid_size("hop must be <= nfft"),
            DspError::out_of_range("fc", 1.5, "0 < fc < 1"),
            DspError::Unsupported("slaney mel variant"),
            DspError::Internal("allocation failure"),
        ];
        for e in errs {
            assert!(!e.to_string().is_empty());
        }
    }

    #[test]
    fn errors_are_equatable() {
        assert_eq!(DspError::NullArgument("x"), DspError::NullArgument("x"));
        assert_ne!(DspError::NullArgument("x"), DspError::NullArgument("y"));
    }
}
