//! Box-filter smoothing and finite-difference derivative used by the REM detector.
//!
//! `moving_average` matches `np.convolve(x, ones(w) / w, 'same')` for signals
//! at least as long as the window; the output always has `len(x)` samples.
//!
//! `abs_derivative` computes `|x[n + step] - x[n]|` and zero-pads it back to
//! `len(x)`: `step / 2` zeros in front, the remaining `step - step / 2` behind.

/// Centred moving average over `window` samples.
///
/// Samples outside the signal count as zero, so the edges taper.
pub fn moving_average(x: &[f64], window: usize) -> Vec<f64> {
    let n = x.len();
    if n == 0 || window <= 1 {
        return x.to_vec();
    }

    // prefix[k] = x[0] + ... + x[k-1]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &v in x {
        acc += v;
        prefix.push(acc);
    }

    // out[k] = full[k + offset], full[j] = Σ_{i=j-w+1..=j} x[i] / w
    let offset = (window - 1) / 2;
    let inv_w = 1.0 / window as f64;
    (0..n)
        .map(|k| {
            let j = k + offset;
            let hi = (j + 1).min(n);
            let lo = (j + 1).saturating_sub(window);
            if lo >= hi { 0.0 } else { (prefix[hi] - prefix[lo]) * inv_w }
        })
        .collect()
}

/// Absolute first difference with a `step`-sample lag, padded to `len(x)`.
pub fn abs_derivative(x: &[f64], step: usize) -> Vec<f64> {
    let n = x.len();
    if step == 0 || step >= n {
        return vec![0.0; n];
    }

    let head = step / 2;
    let mut out = Vec::with_capacity(n);
    out.extend(std::iter::repeat(0.0).take(head));
    out.extend(x[step..].iter().zip(&x[..n - step]).map(|(a, b)| (a - b).abs()));
    out.resize(n, 0.0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn moving_average_matches_numpy_same_odd_window() {
        // np.convolve([1,2,3,4,5], ones(3)/3, 'same') = [1, 2, 3, 4, 3]
        let y = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        let expected = [1.0, 2.0, 3.0, 4.0, 3.0];
        for (a, b) in y.iter().zip(expected) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn moving_average_matches_numpy_same_even_window() {
        // np.convolve([1,2,3], [.5,.5], 'same') = [0.5, 1.5, 2.5]
        let y = moving_average(&[1.0, 2.0, 3.0], 2);
        let expected = [0.5, 1.5, 2.5];
        for (a, b) in y.iter().zip(expected) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn moving_average_keeps_length_when_window_exceeds_signal() {
        let y = moving_average(&[3.0, 3.0], 5);
        assert_eq!(y.len(), 2);
        // window centre covers both samples: (3 + 3) / 5
        assert_abs_diff_eq!(y[0], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn derivative_even_step_is_centred() {
        let x: Vec<f64> = (0..8).map(|i| (i * i) as f64).collect();
        let d = abs_derivative(&x, 2);
        assert_eq!(d.len(), 8);
        assert_eq!(d[0], 0.0);
        // x[2] - x[0] = 4 lands at index 1
        assert_eq!(d[1], 4.0);
        assert_eq!(d[6], (49 - 25) as f64);
        assert_eq!(d[7], 0.0);
    }

    #[test]
    fn derivative_odd_step_keeps_length() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let d = abs_derivative(&x, 3);
        assert_eq!(d, vec![0.0, 3.0, 3.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn derivative_is_absolute() {
        let d = abs_derivative(&[5.0, 4.0, 3.0, 2.0], 1);
        assert_eq!(d, vec![1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn derivative_step_longer_than_signal_is_zero() {
        assert_eq!(abs_derivative(&[1.0, 2.0, 3.0], 3), vec![0.0; 3]);
    }
}
