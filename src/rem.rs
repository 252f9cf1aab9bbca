//! Rapid eye movement detection on an EOG channel.
//!
//! ```text
//! eog ─ moving average ─ |x[n+step] - x[n]| ─ moving average
//!     ─ REM gate ─ mean + k·std ─ drop first crossing ─ runs ─ density
//! ```
use ndarray::ArrayView2;

use crate::config::{ms_to_samples, DetectionParams};
use crate::detect::{detect_events, DetectionResult, EventCriteria};
use crate::error::{check_sampling_rate, Result};
use crate::filter::{abs_derivative, moving_average};
use crate::hypno::{gate, StageRule};

/// Smoothed absolute derivative of `eog`, `len(eog)` samples.
///
/// Fails with `InvalidParameter` when `moving_ms` or `deriv_ms` resolves to
/// zero samples at `sf`.
pub fn rem_derivative(eog: &[f64], sf: f64, params: &DetectionParams) -> Result<Vec<f64>> {
    check_sampling_rate(sf)?;
    let window = ms_to_samples("moving_ms", params.moving_ms, sf)?;
    let step = ms_to_samples("deriv_ms", params.deriv_ms, sf)?;

    let smoothed = moving_average(eog, window);
    let deriv = abs_derivative(&smoothed, step);
    Ok(moving_average(&deriv, window))
}

/// Detect rapid eye movements in a single EOG channel.
///
/// With `params.stage_restrict`, only REM samples are kept if the hypnogram
/// is non-uniform and contains REM.  The threshold is
/// `mean + params.threshold · std` of the smoothed derivative.
///
/// # Examples
///
/// ```
/// use sleepdet::{detect_rems, DetectionParams};
///
/// let eog = vec![0.0; 1000];
/// let res = detect_rems(&eog, 100.0, None, &DetectionParams::rems()).unwrap();
/// assert!(res.indices.is_empty());
///
/// // 4 ms at 100 Hz is less than one sample
/// let p = DetectionParams { moving_ms: 4.0, ..DetectionParams::rems() };
/// assert!(detect_rems(&eog, 100.0, None, &p).is_err());
/// ```
pub fn detect_rems(
    eog: &[f64],
    sf: f64,
    hypno: Option<&[i32]>,
    params: &DetectionParams,
) -> Result<DetectionResult> {
    check_sampling_rate(sf)?;
    params.validate()?;
    let mask = gate(eog.len(), hypno, StageRule::RemOnly, params.stage_restrict)?;

    let deriv = rem_derivative(eog, sf, params)?;
    tracing::debug!(n = eog.len(), valid = mask.valid_len(), "REM derivative computed");

    let crit = EventCriteria {
        threshold: params.threshold,
        min_dur_ms: params.min_dur_ms,
        max_dur_ms: params.max_dur_ms,
        drop_first_crossing: params.drop_first_crossing,
    };
    Ok(detect_events(&deriv, &mask, sf, crit))
}

/// Run [`detect_rems`] on every row of `data` (`[C, T]`).
pub fn detect_rems_channels(
    data: ArrayView2<'_, f64>,
    sf: f64,
    hypno: Option<&[i32]>,
    params: &DetectionParams,
) -> Result<Vec<DetectionResult>> {
    data.rows()
        .into_iter()
        .map(|row| detect_rems(&row.to_vec(), sf, hypno, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;

    #[test]
    fn derivative_keeps_length() {
        let x: Vec<f64> = (0..777).map(|i| (i as f64 / 30.0).sin()).collect();
        let d = rem_derivative(&x, 100.0, &DetectionParams::rems()).unwrap();
        assert_eq!(d.len(), 777);
        assert!(d.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn derivative_window_below_one_sample_fails() {
        let p = DetectionParams { deriv_ms: 2.0, ..DetectionParams::rems() };
        let err = rem_derivative(&[0.0; 100], 100.0, &p).unwrap_err();
        assert!(matches!(err, DetectError::InvalidParameter { name: "deriv_ms", .. }));
    }

    #[test]
    fn both_edges_of_a_pulse_are_detected() {
        // trace starts and ends at zero so the smoothing edges stay quiet
        let mut x = vec![0.0; 2000];
        x[1000..1500].iter_mut().for_each(|v| *v = 100.0);
        let p = DetectionParams { drop_first_crossing: false, ..DetectionParams::rems() };
        let r = detect_rems(&x, 100.0, None, &p).unwrap();
        assert_eq!(r.count, 2);
        assert!(r.events[0].indices().contains(&1000), "{:?}", r.events[0]);
        assert!(r.events[1].indices().contains(&1500), "{:?}", r.events[1]);
    }
}
