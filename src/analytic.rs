//! Analytic-signal representations of a band-limited signal.
//!
//! Two ways to obtain the complex signal `a(t)` are supported:
//!
//! - **Hilbert** ([`hilbert`]): FFT, zero the negative frequencies, double the
//!   positive ones, inverse FFT.
//! - **Morlet** ([`morlet`]): convolution with a complex Morlet wavelet of
//!   7 cycles centred on the frequency of interest.
//!
//! From `a(t)` we derive the envelope `|a(t)|`, the unwrapped phase and the
//! instantaneous frequency `diff(phase) / 2π · sf`.
//!
//! ## Even-length signals
//!
//! [`hilbert`] transforms even-length signals after dropping their last sample
//! and zero-padding the FFT back to the original length.  Odd-length signals
//! are transformed as-is.  Either way the output has `len(x)` samples and is
//! aligned with the input.
use std::f64::consts::PI;

use rustfft::{FftPlanner, num_complex::Complex};

use crate::filter;

/// Envelope, unwrapped phase and instantaneous frequency of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticSignal {
    /// `|a(t)|`
    pub amplitude: Vec<f64>,
    /// `unwrap(arg(a(t)))` in radians.
    pub phase: Vec<f64>,
    /// Instantaneous frequency in Hz; the last sample is always `0`.
    pub inst_freq: Vec<f64>,
}

impl AnalyticSignal {
    /// Derive amplitude, phase and instantaneous frequency from `z`.
    pub fn from_complex(z: &[Complex<f64>], sf: f64) -> Self {
        let amplitude = z.iter().map(|c| c.norm()).collect();
        let wrapped: Vec<f64> = z.iter().map(|c| c.arg()).collect();
        let phase = unwrap_phase(&wrapped);
        let inst_freq = instantaneous_frequency(&phase, sf);
        Self { amplitude, phase, inst_freq }
    }

    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }
}

/// Analytic signal of `x`, `len(x)` samples, with the even-length rule applied.
pub fn hilbert(x: &[f64]) -> Vec<Complex<f64>> {
    let n = x.len();
    if n % 2 == 1 {
        analytic_fft(x, n)
    } else if n == 0 {
        Vec::new()
    } else {
        analytic_fft(&x[..n - 1], n)
    }
}

/// Analytic signal computed with an `n_fft`-point FFT (`x` is zero-padded or
/// truncated to `n_fft` samples), as `scipy.signal.hilbert(x, N=n_fft)`.
pub fn analytic_fft(x: &[f64], n_fft: usize) -> Vec<Complex<f64>> {
    if n_fft == 0 {
        return Vec::new();
    }
    let mut buf: Vec<Complex<f64>> = x
        .iter()
        .map(|&re| Complex { re, im: 0.0 })
        .chain(std::iter::repeat(Complex::default()))
        .take(n_fft)
        .collect();

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    planner.plan_fft_forward(n_fft).process(&mut buf);

    // h = [1, 2, …, 2, (1 at Nyquist if N even), 0, …, 0]
    let half = n_fft / 2;
    for (k, v) in buf.iter_mut().enumerate() {
        let w = if k == 0 || (n_fft % 2 == 0 && k == half) {
            1.0
        } else if k < (n_fft + 1) / 2 {
            2.0
        } else {
            0.0
        };
        *v *= w;
    }

    planner.plan_fft_inverse(n_fft).process(&mut buf);
    let inv_scale = 1.0 / n_fft as f64;
    buf.iter_mut().for_each(|v| *v *= inv_scale);
    buf
}

/// Complex Morlet transform of `x` at `freq` Hz with `width` cycles.
///
/// `σt = width / (2π·freq)`, support `[-3.5σt, 3.5σt)` sampled every `1/sf`,
/// amplitude `1 / sqrt(σt·√π)`.  The output has `len(x)` samples.
pub fn morlet(x: &[f64], sf: f64, freq: f64, width: f64) -> Vec<Complex<f64>> {
    let kernel = morlet_kernel(sf, freq, width);
    filter::convolve_complex_same(x, &kernel)
}

/// Number of cycles of the default Morlet wavelet.
pub const MORLET_WIDTH: f64 = 7.0;

fn morlet_kernel(sf: f64, freq: f64, width: f64) -> Vec<Complex<f64>> {
    let dt = 1.0 / sf;
    let st = width / (2.0 * PI * freq);
    let a = 1.0 / (st * PI.sqrt()).sqrt();
    let t0 = -3.5 * st;
    let n = ((7.0 * st) / dt).ceil().max(1.0) as usize;

    (0..n)
        .map(|k| {
            let t = t0 + k as f64 * dt;
            let gauss = a * (-t * t / (2.0 * st * st)).exp();
            Complex::from_polar(gauss, 2.0 * PI * freq * t)
        })
        .collect()
}

/// Remove 2π jumps from a wrapped phase sequence (`np.unwrap`).
pub fn unwrap_phase(p: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(p.len());
    let Some(&first) = p.first() else {
        return out;
    };
    out.push(first);

    let mut correction = 0.0;
    for w in p.windows(2) {
        let dd = w[1] - w[0];
        let mut ddmod = (dd + PI).rem_euclid(2.0 * PI) - PI;
        if ddmod == -PI && dd > 0.0 {
            ddmod = PI;
        }
        if dd.abs() >= PI {
            correction += ddmod - dd;
        }
        out.push(w[1] + correction);
    }
    out
}

/// `diff(phase) / 2π · sf`, padded with a trailing zero.
pub fn instantaneous_frequency(phase: &[f64], sf: f64) -> Vec<f64> {
    if phase.is_empty() {
        return Vec::new();
    }
    let scale = sf / (2.0 * PI);
    phase
        .windows(2)
        .map(|w| (w[1] - w[0]) * scale)
        .chain(std::iter::once(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine(n: usize, freq: f64, sf: f64) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / sf).sin()).collect()
    }

    #[test]
    fn real_part_is_input_for_odd_length() {
        let x = sine(101, 13.0, 100.0);
        let z = hilbert(&x);
        assert_eq!(z.len(), 101);
        for (a, b) in z.iter().zip(&x) {
            assert_abs_diff_eq!(a.re, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn even_length_drops_last_sample_and_keeps_length() {
        let x = sine(100, 13.0, 100.0);
        let z = hilbert(&x);
        assert_eq!(z.len(), 100);
        for i in 0..99 {
            assert_abs_diff_eq!(z[i].re, x[i], epsilon = 1e-10);
        }
        // the dropped sample is replaced by FFT zero-padding
        assert_abs_diff_eq!(z[99].re, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn envelope_of_sine_is_flat() {
        let x = sine(1001, 13.0, 100.0);
        let a = AnalyticSignal::from_complex(&hilbert(&x), 100.0);
        for &v in &a.amplitude[100..900] {
            assert_abs_diff_eq!(v, 1.0, epsilon = 5e-2);
        }
    }

    #[test]
    fn instantaneous_frequency_tracks_tone() {
        let x = sine(1001, 13.0, 100.0);
        let a = AnalyticSignal::from_complex(&hilbert(&x), 100.0);
        assert_eq!(a.inst_freq.len(), 1001);
        assert_eq!(a.inst_freq[1000], 0.0);
        for &f in &a.inst_freq[100..900] {
            assert_abs_diff_eq!(f, 13.0, epsilon = 0.5);
        }
    }

    #[test]
    fn unwrap_removes_jumps() {
        let wrapped = [3.0, -3.0, -2.5, 3.1];
        let u = unwrap_phase(&wrapped);
        assert_abs_diff_eq!(u[1], -3.0 + 2.0 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(u[2], -2.5 + 2.0 * PI, epsilon = 1e-12);
        // -2.5 → 3.1 is a jump of 5.6 > π, corrected downwards
        assert_abs_diff_eq!(u[3], 3.1, epsilon = 1e-12);
        assert!(unwrap_phase(&[]).is_empty());
    }

    #[test]
    fn morlet_selects_its_frequency() {
        let sf = 100.0;
        let on = morlet(&sine(2001, 13.0, sf), sf, 13.0, MORLET_WIDTH);
        let off = morlet(&sine(2001, 4.0, sf), sf, 13.0, MORLET_WIDTH);
        assert_eq!(on.len(), 2001);
        let mean_abs = |z: &[Complex<f64>]| z[300..1700].iter().map(|c| c.norm()).sum::<f64>() / 1400.0;
        assert!(mean_abs(&on) > 20.0 * mean_abs(&off));
    }

    #[test]
    fn morlet_envelope_is_flat_on_tone() {
        let sf = 100.0;
        let z = morlet(&sine(2001, 13.0, sf), sf, 13.0, MORLET_WIDTH);
        let amp: Vec<f64> = z[300..1700].iter().map(|c| c.norm()).collect();
        let mean = amp.iter().sum::<f64>() / amp.len() as f64;
        for v in amp {
            assert_abs_diff_eq!(v / mean, 1.0, epsilon = 2e-2);
        }
    }
}
