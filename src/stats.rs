//! Masked statistics and adaptive thresholding.
//!
//! `masked_mean_std`: mean and population std (`ddof = 0`) over the samples
//! the mask keeps; NaN samples are skipped as well, so the result equals
//! `np.nanmean` / `np.nanstd` on a NaN-masked copy.
//!
//! `adaptive_threshold`: `mean + k · std`.
//!
//! `supra_threshold`: `{ i : series[i] > threshold }` over kept samples.
use crate::hypno::ExclusionMask;

/// Mean and std (ddof = 0) of the kept samples, or `None` if none are kept.
pub fn masked_mean_std(series: &[f64], mask: &ExclusionMask) -> Option<(f64, f64)> {
    debug_assert_eq!(series.len(), mask.len());
    let kept = || mask.zip(series).filter(|&(v, ex)| !ex && !v.is_nan()).map(|(v, _)| v);

    let n = kept().count();
    if n == 0 {
        return None;
    }
    let mean = kept().sum::<f64>() / n as f64;
    let var = kept().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    Some((mean, var.sqrt()))
}

/// `mean + k · std` over the kept samples.
pub fn adaptive_threshold(series: &[f64], mask: &ExclusionMask, k: f64) -> Option<f64> {
    masked_mean_std(series, mask).map(|(mean, std)| mean + k * std)
}

/// Indices of kept samples strictly above `threshold`, in increasing order.
pub fn supra_threshold(series: &[f64], mask: &ExclusionMask, threshold: f64) -> Vec<usize> {
    mask.zip(series)
        .enumerate()
        .filter(|&(_, (v, ex))| !ex && v > threshold)
        .map(|(i, _)| i)
        .collect()
}
