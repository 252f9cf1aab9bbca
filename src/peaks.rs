//! Local extrema detection with look-ahead confirmation (Billauer's `peakdet`).
//!
//! The scanner alternates between two states:
//!
//! - **SeekMax**: a maximum candidate `(mxpos, mx)` is confirmed once the
//!   signal drops below `mx - delta` and no sample in the next `lookahead`
//!   samples exceeds `mx`.  Both candidates are then reset to `+∞` and the
//!   scanner switches to SeekMin.
//! - **SeekMin**: symmetric; candidates reset to `-∞` on confirmation.
//!
//! Scanning starts in SeekMin and stops once fewer than `lookahead` samples
//! remain.  The first confirmed peak (of either kind) is discarded: it is
//! almost always the start of the signal rather than a true extremum.
use crate::error::{check_same_len, DetectError, Result};

/// A confirmed extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Position on the x axis (the sample index when no x axis is given).
    pub position: f64,
    pub value: f64,
}

/// Confirmed maxima and minima, each in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    pub maxima: Vec<Peak>,
    pub minima: Vec<Peak>,
}

/// Look-ahead peak detector configuration.
///
/// ```
/// use sleepdet::PeakDetector;
///
/// let mut y = vec![0.0; 501];
/// y[250] = 10.0;
/// let peaks = PeakDetector::new(200, 1.0).unwrap().detect(&y, None).unwrap();
/// assert_eq!(peaks.maxima.len(), 1);
/// assert_eq!((peaks.maxima[0].position, peaks.maxima[0].value), (250.0, 10.0));
/// assert!(peaks.minima.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    lookahead: usize,
    delta: f64,
}

impl Default for PeakDetector {
    /// `lookahead = 200`, `delta = 0`.
    fn default() -> Self {
        Self { lookahead: 200, delta: 0.0 }
    }
}

impl PeakDetector {
    /// `lookahead` must be at least 1 and `delta` non-negative.
    pub fn new(lookahead: usize, delta: f64) -> Result<Self> {
        if lookahead < 1 {
            return Err(DetectError::invalid("lookahead", "must be 1 or above"));
        }
        if !(delta >= 0.0) {
            return Err(DetectError::invalid("delta", format!("must be >= 0, got {delta}")));
        }
        Ok(Self { lookahead, delta })
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Scan `y`; positions are taken from `x` when given (same length as `y`).
    pub fn detect(&self, y: &[f64], x: Option<&[f64]>) -> Result<Peaks> {
        if let Some(x) = x {
            check_same_len("x_axis", y.len(), x.len())?;
        }
        let position = |i: usize| x.map_or(i as f64, |x| x[i]);

        let mut scanner = Scanner::new(self.delta);
        let end = y.len().saturating_sub(self.lookahead);
        for i in 0..end {
            scanner.step(y[i], position(i), &y[i..i + self.lookahead]);
        }
        Ok(scanner.finish())
    }
}

/// Convenience wrapper: `PeakDetector::new(lookahead, delta)?.detect(y, x)`.
pub fn peak_detect(y: &[f64], x: Option<&[f64]>, lookahead: usize, delta: f64) -> Result<Peaks> {
    PeakDetector::new(lookahead, delta)?.detect(y, x)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seek {
    Max,
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Max,
    Min,
}

/// Scan state: current mode, running candidates and confirmed peaks.
struct Scanner {
    delta: f64,
    seek: Seek,
    mx: f64,
    mxpos: f64,
    mn: f64,
    mnpos: f64,
    confirmed: Vec<(Kind, Peak)>,
}

impl Scanner {
    fn new(delta: f64) -> Self {
        Self {
            delta,
            seek: Seek::Min,
            mx: f64::NEG_INFINITY,
            mxpos: f64::NAN,
            mn: f64::INFINITY,
            mnpos: f64::NAN,
            confirmed: Vec::new(),
        }
    }

    /// Test the candidate of the active state against `y`, then fold `y`
    /// into the running candidates.
    fn step(&mut self, y: f64, pos: f64, ahead: &[f64]) {
        match self.seek {
            Seek::Max => {
                if self.mx.is_finite() && y < self.mx - self.delta && ahead.iter().all(|&v| v <= self.mx) {
                    self.confirmed.push((Kind::Max, Peak { position: self.mxpos, value: self.mx }));
                    self.seek = Seek::Min;
                    self.mx = f64::INFINITY;
                    self.mn = f64::INFINITY;
                }
            }
            Seek::Min => {
                if self.mn.is_finite() && y > self.mn + self.delta && ahead.iter().all(|&v| v >= self.mn) {
                    self.confirmed.push((Kind::Min, Peak { position: self.mnpos, value: self.mn }));
                    self.seek = Seek::Max;
                    self.mn = f64::NEG_INFINITY;
                    self.mx = f64::NEG_INFINITY;
                }
            }
        }

        if y > self.mx {
            self.mx = y;
            self.mxpos = pos;
        }
        if y < self.mn {
            self.mn = y;
            self.mnpos = pos;
        }
    }

    /// Split confirmed peaks by kind, dropping the first one.
    fn finish(self) -> Peaks {
        let mut peaks = Peaks::default();
        for (kind, peak) in self.confirmed.into_iter().skip(1) {
            match kind {
                Kind::Max => peaks.maxima.push(peak),
                Kind::Min => peaks.minima.push(peak),
            }
        }
        peaks
    }
}
