/// Shared synthetic recordings for the integration tests.
use std::f64::consts::PI;

pub const SF: f64 = 100.0;

#[allow(unused)]
/// Deterministic broadband-ish background: a few out-of-band sines.
pub fn background(n: usize, sf: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / sf;
            0.3 * (2.0 * PI * 1.3 * t).sin()
                + 0.2 * (2.0 * PI * 4.1 * t + 0.7).sin()
                + 0.1 * (2.0 * PI * 27.0 * t + 1.9).sin()
        })
        .collect()
}

#[allow(unused)]
/// Add a 13 Hz burst of `amp` starting at `start_s` lasting `dur_s` seconds.
pub fn add_spindle(x: &mut [f64], sf: f64, start_s: f64, dur_s: f64, amp: f64) {
    let start = (start_s * sf).round() as usize;
    let stop = ((start_s + dur_s) * sf).round() as usize;
    for (i, v) in x.iter_mut().enumerate().take(stop).skip(start) {
        *v += amp * (2.0 * PI * 13.0 * i as f64 / sf).sin();
    }
}

#[allow(unused)]
/// One minute of EEG with three 1 s spindles at 10 s, 25 s and 40 s.
pub fn spindle_recording(n: usize) -> Vec<f64> {
    let mut x = background(n, SF);
    for start in [10.0, 25.0, 40.0] {
        add_spindle(&mut x, SF, start, 1.0, 5.0);
    }
    x
}

#[allow(unused)]
/// EOG trace with square eye-position pulses: each pulse gives two
/// saccades (onset and offset).  Starts and ends at rest.
pub fn eog_recording(n: usize, pulses: &[(f64, f64)]) -> Vec<f64> {
    let mut x: Vec<f64> = (0..n)
        .map(|i| 2.0 * (2.0 * PI * 0.2 * i as f64 / SF).sin())
        .collect();
    for &(on_s, off_s) in pulses {
        let on = (on_s * SF) as usize;
        let off = (off_s * SF) as usize;
        x[on..off].iter_mut().for_each(|v| *v += 100.0);
    }
    x
}

#[allow(unused)]
/// `true` if `idx` is strictly increasing.
pub fn strictly_increasing(idx: &[usize]) -> bool {
    idx.windows(2).all(|w| w[0] < w[1])
}
