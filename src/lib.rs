//! # sleepdet — sleep event detection in pure Rust
//!
//! `sleepdet` finds discrete physiological events in full-night recordings:
//! sleep spindles on EEG, rapid eye movements on EOG, and generic local
//! extrema on any sequence.  Everything is batch: the whole recording is in
//! memory and every call is a pure function of its inputs.
//!
//! ## Pipeline overview
//!
//! ```text
//! samples + sf + hypnogram + DetectionParams
//!   │
//!   ├─ condition        band-pass → Hilbert | Morlet → |a(t)|        (spindles)
//!   │                   moving avg → |Δx| → moving avg               (REMs)
//!   ├─ hypno::gate      exclusion mask from sleep stages
//!   ├─ stats            mean + k·std over kept samples → supra-threshold set
//!   ├─ segment          contiguous runs, min_dur < d < max_dur, dense expansion
//!   └─ rate             events / minute of kept recording
//!        │
//!        └─→ DetectionResult { indices, events, count, density, … }
//! ```
//!
//! [`peaks`] is independent of sleep staging.
//!
//! ## Quick start
//!
//! ```
//! use sleepdet::{detect_spindles, detect_rems, peak_detect, DetectionParams};
//!
//! let sf = 100.0;
//! let eeg = vec![0.0; 6000];           // one minute at 100 Hz
//! let hypno = vec![2; 6000];           // all N2
//!
//! let spindles = detect_spindles(&eeg, sf, Some(hypno.as_slice()), &DetectionParams::spindles()).unwrap();
//! println!("{} spindles, {:.2}/min", spindles.count, spindles.density);
//!
//! let rems = detect_rems(&eeg, sf, Some(hypno.as_slice()), &DetectionParams::rems()).unwrap();
//! assert_eq!(rems.count, 0);
//!
//! let peaks = peak_detect(&eeg, None, 200, 0.0).unwrap();
//! assert!(peaks.maxima.is_empty());
//! ```
//!
//! ## Running individual steps
//!
//! ```
//! use sleepdet::{spindle_envelope, DetectionParams};
//! use sleepdet::hypno::{gate, StageRule};
//! use sleepdet::stats::{adaptive_threshold, supra_threshold};
//! use sleepdet::segment::segment;
//!
//! let sf = 100.0;
//! let eeg: Vec<f64> = (0..3000).map(|i| (i as f64 * 0.8).sin()).collect();
//! let params = DetectionParams::spindles();
//!
//! let env  = spindle_envelope(&eeg, sf, &params).unwrap();
//! let mask = gate(eeg.len(), None, StageRule::NonRem, true).unwrap();
//! if let Some(thr) = adaptive_threshold(&env.amplitude, &mask, params.threshold) {
//!     let supra = supra_threshold(&env.amplitude, &mask, thr);
//!     let seg = segment(&supra, sf, params.min_dur_ms, params.max_dur_ms);
//!     println!("{} events", seg.count());
//! }
//! ```

pub mod analytic;
pub mod config;
pub mod detect;
pub mod error;
pub mod filter;
pub mod hypno;
pub mod io;
pub mod peaks;
pub mod rate;
pub mod rem;
pub mod segment;
pub mod spindle;
pub mod stats;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `sleepdet::Foo` without having to know the internal module layout.

// config
pub use config::{AnalyticMethod, DetectionParams};

// error
pub use error::{DetectError, Result};

// detectors
pub use detect::DetectionResult;
pub use rem::{detect_rems, detect_rems_channels, rem_derivative};
pub use spindle::{detect_spindles, detect_spindles_channels, spindle_envelope};

// conditioning
pub use analytic::AnalyticSignal;

// gating / segmentation
pub use hypno::{ExclusionMask, StageRule};
pub use segment::EventRun;

// peaks
pub use peaks::{peak_detect, Peak, PeakDetector, Peaks};
