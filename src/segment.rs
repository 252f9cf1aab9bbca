//! Run-length segmentation of supra-threshold indices.
//!
//! A sorted index set is split into maximal runs of consecutive samples.
//! Each run lasts `len · 1000 / sf` ms; only runs with
//! `min_dur_ms < duration < max_dur_ms` (both strict) are kept, and the kept
//! runs are expanded back into dense `[start, stop)` index ranges.
use std::ops::Range;

/// A contiguous event, `[start, stop)` in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventRun {
    pub start: usize,
    pub stop: usize,
}

impl EventRun {
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    /// Duration in milliseconds at sampling rate `sf`.
    pub fn duration_ms(&self, sf: f64) -> f64 {
        self.len() as f64 * (1000.0 / sf)
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.stop
    }
}

/// Runs kept after duration filtering and their dense index expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub runs: Vec<EventRun>,
    pub indices: Vec<usize>,
}

impl Segmentation {
    /// Number of events.
    pub fn count(&self) -> usize {
        self.runs.len()
    }
}

/// Group a strictly increasing index set into maximal contiguous runs.
pub fn find_runs(indices: &[usize]) -> Vec<EventRun> {
    debug_assert!(indices.windows(2).all(|w| w[0] < w[1]), "indices must be strictly increasing");

    let mut runs = Vec::new();
    let Some((&first, rest)) = indices.split_first() else {
        return runs;
    };
    let mut current = EventRun { start: first, stop: first + 1 };
    for &i in rest {
        if i == current.stop {
            current.stop += 1;
        } else {
            runs.push(current);
            current = EventRun { start: i, stop: i + 1 };
        }
    }
    runs.push(current);
    runs
}

/// Keep runs with `min_dur_ms < duration_ms < max_dur_ms`.
pub fn filter_by_duration(runs: &[EventRun], sf: f64, min_dur_ms: f64, max_dur_ms: f64) -> Vec<EventRun> {
    runs.iter()
        .copied()
        .filter(|r| {
            let d = r.duration_ms(sf);
            d > min_dur_ms && d < max_dur_ms
        })
        .collect()
}

/// Concatenate the dense `[start, stop)` range of every run.
pub fn expand(runs: &[EventRun]) -> Vec<usize> {
    let total = runs.iter().map(EventRun::len).sum();
    let mut out = Vec::with_capacity(total);
    for r in runs {
        out.extend(r.indices());
    }
    out
}

/// Runs → duration filter → dense expansion.
pub fn segment(indices: &[usize], sf: f64, min_dur_ms: f64, max_dur_ms: f64) -> Segmentation {
    let all = find_runs(indices);
    let runs = filter_by_duration(&all, sf, min_dur_ms, max_dur_ms);
    tracing::trace!(candidates = all.len(), kept = runs.len(), "duration filter");
    let indices = expand(&runs);
    Segmentation { runs, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_split_on_gaps() {
        let runs = find_runs(&[2, 3, 4, 7, 9, 10]);
        assert_eq!(
            runs,
            vec![
                EventRun { start: 2, stop: 5 },
                EventRun { start: 7, stop: 8 },
                EventRun { start: 9, stop: 11 },
            ]
        );
        assert!(find_runs(&[]).is_empty());
    }

    #[test]
    fn duration_uses_sampling_rate() {
        let r = EventRun { start: 10, stop: 60 };
        assert_eq!(r.len(), 50);
        approx::assert_abs_diff_eq!(r.duration_ms(100.0), 500.0, epsilon = 1e-12);
    }

    #[test]
    fn duration_bounds_are_exclusive() {
        // At 100 Hz: 50 samples = 500 ms, 51 = 510 ms, 150 = 1500 ms.
        let runs = [
            EventRun { start: 0, stop: 50 },
            EventRun { start: 100, stop: 151 },
            EventRun { start: 300, stop: 450 },
            EventRun { start: 500, stop: 649 },
        ];
        let kept = filter_by_duration(&runs, 100.0, 500.0, 1500.0);
        assert_eq!(kept, vec![runs[1], runs[3]]);
    }

    #[test]
    fn expansion_is_dense_and_sorted() {
        let seg = segment(&[0, 1, 2, 10, 11, 12, 13, 20], 1000.0, 2.0, 10.0);
        // runs of 3 and 4 samples (3 ms, 4 ms) survive; the single sample does not
        assert_eq!(seg.count(), 2);
        assert_eq!(seg.indices, vec![0, 1, 2, 10, 11, 12, 13]);
    }

    #[test]
    fn nothing_survives_gives_empty() {
        let seg = segment(&[5, 6], 100.0, 500.0, 1500.0);
        assert_eq!(seg, Segmentation::default());
    }
}
