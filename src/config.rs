//! Detection configuration.
//!
//! [`DetectionParams`] holds every tunable parameter recognised by the
//! detectors.  Two presets are provided, one per detector; the fields a
//! detector does not use are simply ignored by it.
use std::fmt;
use std::str::FromStr;

use crate::error::{DetectError, Result};

/// How the complex (analytic) representation of the band-passed EEG is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticMethod {
    /// FFT-based Hilbert analytic signal.
    #[default]
    Hilbert,
    /// Convolution with a complex Morlet wavelet centred on the band.
    Wavelet,
}

impl FromStr for AnalyticMethod {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hilbert" | "analytic" => Ok(AnalyticMethod::Hilbert),
            "wavelet" | "morlet" => Ok(AnalyticMethod::Wavelet),
            other => Err(DetectError::invalid(
                "method",
                format!("unknown method '{other}' (expected 'hilbert' or 'wavelet')"),
            )),
        }
    }
}

impl fmt::Display for AnalyticMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticMethod::Hilbert => write!(f, "hilbert"),
            AnalyticMethod::Wavelet => write!(f, "wavelet"),
        }
    }
}

/// Parameters for spindle and REM detection.
///
/// All fields are `pub` so you can start from a preset and override fields
/// with struct-update syntax:
///
/// ```
/// use sleepdet::DetectionParams;
///
/// let params = DetectionParams {
///     threshold: 2.5,
///     min_freq: 11.0,
///     ..DetectionParams::spindles()
/// };
/// assert_eq!(params.max_freq, 14.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Number of standard deviations above the mean used as threshold:
    /// `mean + threshold * std` of the conditioned signal.
    ///
    /// Default: `3.0` for spindles, `2.0` for REMs.
    pub threshold: f64,

    /// Lower edge of the spindle band in Hz.
    ///
    /// Default: `12.0`.
    pub min_freq: f64,

    /// Upper edge of the spindle band in Hz.  Must stay below Nyquist.
    ///
    /// Default: `14.0`.
    pub max_freq: f64,

    /// Events must last strictly longer than this (ms).
    ///
    /// Default: `500` for spindles, `0` for REMs.
    pub min_dur_ms: f64,

    /// Events must last strictly shorter than this (ms).
    ///
    /// Default: `1500` for spindles, unbounded for REMs.
    pub max_dur_ms: f64,

    /// Complex decomposition used for the spindle envelope.
    pub method: AnalyticMethod,

    /// Moving-average window in ms (REM derivative smoothing).
    ///
    /// Default: `100`.
    pub moving_ms: f64,

    /// Derivative step in ms (REM).  Saccades rarely last longer than
    /// 30–40 ms, hence the default.
    ///
    /// Default: `40`.
    pub deriv_ms: f64,

    /// Restrict detection to the relevant sleep stages (NREM for spindles,
    /// REM for eye movements) when a real hypnogram is supplied.
    ///
    /// Default: `true`.
    pub stage_restrict: bool,

    /// Discard the first supra-threshold sample before segmentation.
    ///
    /// Default: `false` for spindles, `true` for REMs.
    pub drop_first_crossing: bool,
}

impl Default for DetectionParams {
    /// Returns [`DetectionParams::spindles()`].
    fn default() -> Self {
        Self::spindles()
    }
}

impl DetectionParams {
    /// Spindle preset: 12–14 Hz, 500–1500 ms, Hilbert envelope, 3 σ.
    pub fn spindles() -> Self {
        Self {
            threshold: 3.0,
            min_freq: 12.0,
            max_freq: 14.0,
            min_dur_ms: 500.0,
            max_dur_ms: 1500.0,
            method: AnalyticMethod::Hilbert,
            moving_ms: 100.0,
            deriv_ms: 40.0,
            stage_restrict: true,
            drop_first_crossing: false,
        }
    }

    /// REM preset: 100 ms smoothing, 40 ms derivative, 2 σ, no duration bounds.
    pub fn rems() -> Self {
        Self {
            threshold: 2.0,
            min_dur_ms: 0.0,
            max_dur_ms: f64::INFINITY,
            drop_first_crossing: true,
            ..Self::spindles()
        }
    }

    /// Check the parameters shared by every detector.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(DetectError::invalid("threshold", "must be finite"));
        }
        if !(self.min_dur_ms >= 0.0) {
            return Err(DetectError::invalid(
                "min_dur_ms",
                format!("must be >= 0, got {}", self.min_dur_ms),
            ));
        }
        if !(self.max_dur_ms > self.min_dur_ms) {
            return Err(DetectError::invalid(
                "max_dur_ms",
                format!("must exceed min_dur_ms ({} <= {})", self.max_dur_ms, self.min_dur_ms),
            ));
        }
        Ok(())
    }

    /// Check the band edges against the sampling rate `sf`.
    pub fn validate_band(&self, sf: f64) -> Result<()> {
        let nyquist = sf / 2.0;
        if !(self.min_freq > 0.0) {
            return Err(DetectError::invalid(
                "min_freq",
                format!("must be > 0 Hz, got {}", self.min_freq),
            ));
        }
        if !(self.max_freq > self.min_freq) {
            return Err(DetectError::invalid(
                "max_freq",
                format!("must exceed min_freq ({} <= {})", self.max_freq, self.min_freq),
            ));
        }
        if !(self.max_freq < nyquist) {
            return Err(DetectError::invalid(
                "max_freq",
                format!("must be below Nyquist ({} >= {nyquist})", self.max_freq),
            ));
        }
        Ok(())
    }

    /// Centre frequency of the band, used for the Morlet wavelet.
    pub fn center_freq(&self) -> f64 {
        (self.min_freq + self.max_freq) / 2.0
    }
}

/// Convert a window in milliseconds to a sample count:
/// `round(window_ms / (1000 / sf))`.
///
/// Fails with [`DetectError::InvalidParameter`] when the window resolves to
/// zero samples.
///
/// ```
/// use sleepdet::config::ms_to_samples;
/// assert_eq!(ms_to_samples("moving_ms", 100.0, 100.0).unwrap(), 10);
/// assert!(ms_to_samples("deriv_ms", 4.0, 100.0).is_err());
/// ```
pub fn ms_to_samples(name: &'static str, window_ms: f64, sf: f64) -> Result<usize> {
    if !window_ms.is_finite() || window_ms < 0.0 {
        return Err(DetectError::invalid(name, format!("must be a finite duration >= 0 ms, got {window_ms}")));
    }
    let n = (window_ms / (1000.0 / sf)).round();
    if n < 1.0 {
        return Err(DetectError::invalid(
            name,
            format!("{window_ms} ms at {sf} Hz resolves to zero samples"),
        ));
    }
    Ok(n as usize)
}
