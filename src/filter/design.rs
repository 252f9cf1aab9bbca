//! FIR band-pass design (Hamming-windowed sinc, `scipy.signal.firwin` style).
//!
//! For a band `[l_freq, h_freq]` Hz at sampling rate `sfreq`:
//!   • low transition bandwidth  = min(max(0.25 * l_freq, 2.0), l_freq)
//!   • high transition bandwidth = min(max(0.25 * h_freq, 2.0), sfreq/2 - h_freq)
//!   • filter length N           = ceil(3.3 / min(tb) * sfreq), rounded to odd
//!   • cutoffs at the midpoints of the two transition bands
use std::f64::consts::PI;

/// Transition bandwidth below the lower band edge.
///
/// Rule: `min(max(0.25 * l_freq, 2.0), l_freq)`
pub fn low_trans_bandwidth(l_freq: f64) -> f64 {
    (0.25 * l_freq).max(2.0).min(l_freq)
}

/// Transition bandwidth above the upper band edge.
///
/// Rule: `min(max(0.25 * h_freq, 2.0), sfreq / 2 - h_freq)`
pub fn high_trans_bandwidth(h_freq: f64, sfreq: f64) -> f64 {
    (0.25 * h_freq).max(2.0).min(sfreq / 2.0 - h_freq)
}

/// Number of FIR taps for a given transition bandwidth.
/// Returns an odd integer (required for zero-phase linear-phase FIR).
///
/// Formula: `ceil(3.3 / trans_bw * sfreq)` rounded up to odd.
pub fn auto_filter_length(trans_bw: f64, sfreq: f64) -> usize {
    let n_raw = (3.3 / trans_bw * sfreq).ceil() as usize;
    if n_raw % 2 == 0 { n_raw + 1 } else { n_raw }
}

/// Design a zero-phase band-pass FIR filter for `[l_freq, h_freq]` Hz.
///
/// Callers must ensure `0 < l_freq < h_freq < sfreq / 2`
/// (see [`DetectionParams::validate_band`](crate::DetectionParams::validate_band)).
pub fn design_bandpass(l_freq: f64, h_freq: f64, sfreq: f64) -> Vec<f64> {
    let l_tb = low_trans_bandwidth(l_freq);
    let h_tb = high_trans_bandwidth(h_freq, sfreq);
    let n = auto_filter_length(l_tb.min(h_tb), sfreq);

    firwin_bandpass(n, l_freq - l_tb / 2.0, h_freq + h_tb / 2.0, sfreq)
}

/// Band-pass FIR of `n` taps with -6 dB points at `low_hz` and `high_hz`.
///
/// The taps are scaled for unit gain at the centre of the passband.
pub fn firwin_bandpass(n: usize, low_hz: f64, high_hz: f64, sfreq: f64) -> Vec<f64> {
    assert!(n % 2 == 1, "firwin_bandpass requires odd N for linear-phase filter");
    let alpha = (n - 1) as f64 / 2.0;
    let nyq = sfreq / 2.0;
    let f1 = low_hz / nyq;
    let f2 = high_hz / nyq;

    let win = hamming(n);

    let mut h: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64 - alpha;
            // Difference of two ideal lowpass kernels; lim_{x→0} = f2 - f1.
            let band = if x == 0.0 {
                f2 - f1
            } else {
                ((PI * f2 * x).sin() - (PI * f1 * x).sin()) / (PI * x)
            };
            band * win[i]
        })
        .collect();

    let fc = 0.5 * (f1 + f2);
    let gain: f64 = h
        .iter()
        .enumerate()
        .map(|(i, &v)| v * (PI * fc * (i as f64 - alpha)).cos())
        .sum();
    h.iter_mut().for_each(|v| *v /= gain);

    h
}

/// Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Magnitude response of `h` at `freq_hz`.
    fn gain_at(h: &[f64], freq_hz: f64, sfreq: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sfreq;
        let (re, im) = h.iter().enumerate().fold((0.0, 0.0), |(re, im), (k, &v)| {
            (re + v * (w * k as f64).cos(), im - v * (w * k as f64).sin())
        });
        (re * re + im * im).sqrt()
    }

    #[test]
    fn filter_length_is_odd() {
        for (l, h) in [(12.0, 14.0), (11.0, 16.0), (0.5, 4.0)] {
            let taps = design_bandpass(l, h, 100.0);
            assert!(taps.len() % 2 == 1, "N={} is even for {l}-{h} Hz", taps.len());
        }
    }

    #[test]
    fn spindle_band_known_length_100hz() {
        // 12 Hz → tb = 3, 14 Hz → tb = 3.5: ceil(3.3 / 3 * 100) = 110 → 111.
        let h = design_bandpass(12.0, 14.0, 100.0);
        assert_eq!(h.len(), 111);
    }

    #[test]
    fn high_transition_clamped_by_nyquist() {
        approx::assert_abs_diff_eq!(high_trans_bandwidth(45.0, 100.0), 5.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(high_trans_bandwidth(48.0, 100.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn bandpass_is_symmetric() {
        let h = design_bandpass(12.0, 14.0, 256.0);
        let n = h.len();
        for i in 0..n / 2 {
            approx::assert_abs_diff_eq!(h[i], h[n - 1 - i], epsilon = 1e-12);
        }
    }

    #[test]
    fn bandpass_passes_centre_and_blocks_dc() {
        let sf = 100.0;
        let h = design_bandpass(12.0, 14.0, sf);
        approx::assert_abs_diff_eq!(gain_at(&h, 13.0, sf), 1.0, epsilon = 1e-2);
        assert!(gain_at(&h, 0.0, sf) < 1e-2, "DC gain = {}", gain_at(&h, 0.0, sf));
        assert!(gain_at(&h, 3.0, sf) < 1e-2, "3 Hz gain = {}", gain_at(&h, 3.0, sf));
        assert!(gain_at(&h, 30.0, sf) < 1e-2, "30 Hz gain = {}", gain_at(&h, 30.0, sf));
    }
}
