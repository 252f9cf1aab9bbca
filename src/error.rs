//! Error type shared by every detection routine.
//!
//! Only two things can go wrong inside the core: a parameter that makes the
//! computation meaningless, or inputs whose lengths disagree.  Finding zero
//! events is not an error; it is reported as an empty [`DetectionResult`].
//!
//! [`DetectionResult`]: crate::DetectionResult
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, DetectError>;

/// Errors raised by the detectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// A parameter is out of its valid domain (e.g. `sf <= 0`, `lookahead == 0`,
    /// a millisecond window that resolves to zero samples).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Two sequences that must be aligned sample-by-sample have different lengths.
    #[error("dimension mismatch: {what} has {actual} samples, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl DetectError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DetectError::InvalidParameter { name, reason: reason.into() }
    }
}

/// Reject non-positive or non-finite sampling rates.
pub(crate) fn check_sampling_rate(sf: f64) -> Result<()> {
    if !(sf > 0.0) || !sf.is_finite() {
        return Err(DetectError::invalid("sf", format!("sampling rate must be > 0 Hz, got {sf}")));
    }
    Ok(())
}

/// Reject a second sequence whose length differs from the signal's.
pub(crate) fn check_same_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(DetectError::DimensionMismatch { what, expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_rate_must_be_positive() {
        assert!(check_sampling_rate(100.0).is_ok());
        for sf in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                check_sampling_rate(sf),
                Err(DetectError::InvalidParameter { name: "sf", .. })
            ));
        }
    }

    #[test]
    fn mismatch_message_names_both_lengths() {
        let err = check_same_len("hypnogram", 10, 9).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dimension mismatch: hypnogram has 9 samples, expected 10"
        );
    }
}
