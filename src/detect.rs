//! Detection result and the stages shared by every detector:
//! threshold → segmentation → density.
use crate::hypno::ExclusionMask;
use crate::rate::density;
use crate::segment::{segment, EventRun};
use crate::stats::{adaptive_threshold, supra_threshold};

/// Output of a spindle or REM detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Strictly increasing sample indices covered by the detected events.
    pub indices: Vec<usize>,
    /// The detected events.
    pub events: Vec<EventRun>,
    /// Number of events (`events.len()`).
    pub count: usize,
    /// Events per minute of valid (non-excluded) recording.
    pub density: f64,
    /// Threshold applied to the conditioned signal, `None` when no sample
    /// was available to compute it.
    pub threshold: Option<f64>,
    /// Number of samples that took part in the detection.
    pub valid_len: usize,
}

impl DetectionResult {
    /// A result with no events.
    pub fn empty(threshold: Option<f64>, valid_len: usize) -> Self {
        Self {
            indices: Vec::new(),
            events: Vec::new(),
            count: 0,
            density: 0.0,
            threshold,
            valid_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Duration of each event in milliseconds.
    pub fn durations_ms(&self, sf: f64) -> Vec<f64> {
        self.events.iter().map(|e| e.duration_ms(sf)).collect()
    }
}

/// Options of the shared stage, extracted from `DetectionParams`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EventCriteria {
    pub threshold: f64,
    pub min_dur_ms: f64,
    pub max_dur_ms: f64,
    pub drop_first_crossing: bool,
}

/// Threshold `series` under `mask`, segment and compute the density.
pub(crate) fn detect_events(series: &[f64], mask: &ExclusionMask, sf: f64, crit: EventCriteria) -> DetectionResult {
    let valid_len = mask.valid_len();
    let Some(thresh) = adaptive_threshold(series, mask, crit.threshold) else {
        return DetectionResult::empty(None, valid_len);
    };

    let mut supra = supra_threshold(series, mask, thresh);
    if crit.drop_first_crossing && !supra.is_empty() {
        supra.remove(0);
    }
    if supra.is_empty() {
        tracing::debug!(threshold = thresh, "no supra-threshold sample");
        return DetectionResult::empty(Some(thresh), valid_len);
    }

    let seg = segment(&supra, sf, crit.min_dur_ms, crit.max_dur_ms);
    let count = seg.count();
    let result = DetectionResult {
        indices: seg.indices,
        events: seg.runs,
        count,
        density: density(count, valid_len, sf),
        threshold: Some(thresh),
        valid_len,
    };
    tracing::debug!(
        threshold = thresh,
        supra = supra.len(),
        count = result.count,
        density = result.density,
        "events detected"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crit(min_dur_ms: f64, max_dur_ms: f64) -> EventCriteria {
        EventCriteria { threshold: 1.0, min_dur_ms, max_dur_ms, drop_first_crossing: false }
    }

    fn bumps() -> Vec<f64> {
        // 1000 samples of zeros with three plateaus of height 10
        let mut x = vec![0.0; 1000];
        for (start, len) in [(100, 20), (400, 60), (800, 5)] {
            x[start..start + len].iter_mut().for_each(|v| *v = 10.0);
        }
        x
    }

    #[test]
    fn plateaus_become_events() {
        let x = bumps();
        let r = detect_events(&x, &ExclusionMask::none(1000), 100.0, crit(0.0, f64::INFINITY));
        assert_eq!(r.count, 3);
        assert_eq!(r.events[1], EventRun { start: 400, stop: 460 });
        assert_eq!(r.indices.len(), 85);
        // 3 events in 10 s
        approx::assert_abs_diff_eq!(r.density, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn duration_filter_applies() {
        let x = bumps();
        // 200 ms < d < 1000 ms keeps only the 600 ms plateau
        let r = detect_events(&x, &ExclusionMask::none(1000), 100.0, crit(200.0, 1000.0));
        assert_eq!(r.count, 1);
        assert_eq!(r.durations_ms(100.0), vec![600.0]);
    }

    #[test]
    fn drop_first_crossing_shortens_first_event() {
        let x = bumps();
        let c = EventCriteria { drop_first_crossing: true, ..crit(0.0, f64::INFINITY) };
        let r = detect_events(&x, &ExclusionMask::none(1000), 100.0, c);
        assert_eq!(r.events[0], EventRun { start: 101, stop: 120 });
    }

    #[test]
    fn flat_signal_has_no_events() {
        let x = vec![1.0; 100];
        let r = detect_events(&x, &ExclusionMask::none(100), 100.0, crit(0.0, f64::INFINITY));
        assert!(r.is_empty());
        assert_eq!(r.density, 0.0);
        assert_eq!(r.threshold, Some(1.0));
    }

    #[test]
    fn fully_masked_signal_has_no_threshold() {
        let x = bumps();
        let mask = ExclusionMask::from_flags(vec![true; 1000]);
        let r = detect_events(&x, &mask, 100.0, crit(0.0, f64::INFINITY));
        assert_eq!(r, DetectionResult::empty(None, 0));
    }
}
