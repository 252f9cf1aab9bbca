//! Filters used to condition the raw signal before detection.
//!
//! - [`design`]: Hamming-windowed sinc band-pass FIR design.
//! - [`apply`]: Overlap-add zero-phase convolution (real and complex kernels).
//! - [`smooth`]: Moving average and lagged absolute derivative (REM path).

pub mod apply;
pub mod design;
pub mod smooth;

pub use apply::{convolve_complex_same, filter_1d};
pub use design::{auto_filter_length, design_bandpass, firwin_bandpass, hamming, high_trans_bandwidth, low_trans_bandwidth};
pub use smooth::{abs_derivative, moving_average};

/// Zero-phase band-pass of `x` to `[l_freq, h_freq]` Hz.
pub fn bandpass(x: &[f64], l_freq: f64, h_freq: f64, sfreq: f64) -> Vec<f64> {
    let h = design_bandpass(l_freq, h_freq, sfreq);
    filter_1d(x, &h)
}
