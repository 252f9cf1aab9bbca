//! Sleep spindle detection.
//!
//! ```text
//! eeg ─ band-pass [min_freq, max_freq] ─ Hilbert | Morlet ─ |a(t)|
//!     ─ NREM gate ─ mean + k·std ─ runs ─ min_dur < d < max_dur ─ density
//! ```
use ndarray::ArrayView2;

use crate::analytic::{self, AnalyticSignal, MORLET_WIDTH};
use crate::config::{AnalyticMethod, DetectionParams};
use crate::detect::{detect_events, DetectionResult, EventCriteria};
use crate::error::{check_sampling_rate, Result};
use crate::filter;
use crate::hypno::{gate, StageRule};

/// Band-pass `eeg` and compute its analytic representation.
///
/// The result has `len(eeg)` samples whichever method is used.
pub fn spindle_envelope(eeg: &[f64], sf: f64, params: &DetectionParams) -> Result<AnalyticSignal> {
    check_sampling_rate(sf)?;
    params.validate_band(sf)?;

    let filtered = filter::bandpass(eeg, params.min_freq, params.max_freq, sf);
    let z = match params.method {
        AnalyticMethod::Hilbert => analytic::hilbert(&filtered),
        AnalyticMethod::Wavelet => analytic::morlet(&filtered, sf, params.center_freq(), MORLET_WIDTH),
    };
    Ok(AnalyticSignal::from_complex(&z, sf))
}

/// Detect sleep spindles in a single EEG channel.
///
/// * `eeg`   – samples, preferably from a central electrode.
/// * `sf`    – sampling rate in Hz.
/// * `hypno` – per-sample stages (same length as `eeg`), or `None`.
///   With `params.stage_restrict`, wake and REM samples are excluded unless
///   the hypnogram is uniform.
///
/// # Errors
///
/// `InvalidParameter` for a bad sampling rate, band or duration bounds;
/// `DimensionMismatch` if `hypno` and `eeg` differ in length.
///
/// # Examples
///
/// ```
/// use sleepdet::{detect_spindles, DetectionParams};
///
/// let eeg = vec![0.0; 3000];
/// let res = detect_spindles(&eeg, 100.0, None, &DetectionParams::spindles()).unwrap();
/// assert_eq!(res.count, 0);
/// assert_eq!(res.density, 0.0);
/// ```
pub fn detect_spindles(
    eeg: &[f64],
    sf: f64,
    hypno: Option<&[i32]>,
    params: &DetectionParams,
) -> Result<DetectionResult> {
    check_sampling_rate(sf)?;
    params.validate()?;
    let mask = gate(eeg.len(), hypno, StageRule::NonRem, params.stage_restrict)?;

    let envelope = spindle_envelope(eeg, sf, params)?;
    tracing::debug!(
        n = eeg.len(),
        valid = mask.valid_len(),
        method = %params.method,
        "spindle envelope computed"
    );

    Ok(detect_events(&envelope.amplitude, &mask, sf, criteria(params)))
}

/// Run [`detect_spindles`] on every row of `data` (`[C, T]`).
pub fn detect_spindles_channels(
    data: ArrayView2<'_, f64>,
    sf: f64,
    hypno: Option<&[i32]>,
    params: &DetectionParams,
) -> Result<Vec<DetectionResult>> {
    data.rows()
        .into_iter()
        .map(|row| {
            let eeg: Vec<f64> = row.to_vec();
            detect_spindles(&eeg, sf, hypno, params)
        })
        .collect()
}

fn criteria(params: &DetectionParams) -> EventCriteria {
    EventCriteria {
        threshold: params.threshold,
        min_dur_ms: params.min_dur_ms,
        max_dur_ms: params.max_dur_ms,
        drop_first_crossing: params.drop_first_crossing,
    }
}
