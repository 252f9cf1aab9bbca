//! Event density in events per minute of valid recording.

/// `count / (valid_len / sf / 60)`; exactly `0.0` when `count == 0`.
///
/// ```
/// use sleepdet::rate::density;
/// // 3 events over 6000 samples at 100 Hz (one minute)
/// assert_eq!(density(3, 6000, 100.0), 3.0);
/// assert_eq!(density(0, 0, 100.0), 0.0);
/// ```
pub fn density(count: usize, valid_len: usize, sf: f64) -> f64 {
    if count == 0 || valid_len == 0 {
        return 0.0;
    }
    count as f64 / (valid_len as f64 / sf / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_per_minute() {
        approx::assert_abs_diff_eq!(density(2, 5000, 100.0), 2.4, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(density(10, 30 * 256, 256.0), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_events_never_divide() {
        assert_eq!(density(0, 0, 100.0), 0.0);
        assert_eq!(density(0, 1234, 100.0), 0.0);
    }
}
