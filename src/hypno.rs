//! Hypnogram gating: which samples take part in the statistics.
//!
//! Stage convention: `0` undefined / wake, `1`–`3` NREM depth, `4` REM.
//!
//! The gate produces an [`ExclusionMask`] parallel to the signal instead of
//! writing NaN into it.  Restriction is a no-op when the hypnogram holds a
//! single value throughout, which is what callers pass when no hypnogram was
//! scored.
use crate::error::{check_same_len, Result};

pub const WAKE: i32 = 0;
pub const N1: i32 = 1;
pub const N2: i32 = 2;
pub const N3: i32 = 3;
pub const REM: i32 = 4;

/// Which stages a detector keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRule {
    /// Keep NREM (1–3); drop wake/undefined and REM.  Spindle detection.
    NonRem,
    /// Keep REM only.  Eye-movement detection; only applied when the
    /// hypnogram contains at least one REM sample.
    RemOnly,
}

impl StageRule {
    fn keeps(self, stage: i32) -> bool {
        match self {
            StageRule::NonRem => stage > WAKE && stage != REM,
            StageRule::RemOnly => stage == REM,
        }
    }
}

/// Per-sample exclusion flags plus the number of samples left in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionMask {
    excluded: Vec<bool>,
    n_valid: usize,
}

impl ExclusionMask {
    /// Mask that keeps every one of `len` samples.
    pub fn none(len: usize) -> Self {
        Self { excluded: vec![false; len], n_valid: len }
    }

    /// Build from explicit flags (`true` = excluded).
    pub fn from_flags(excluded: Vec<bool>) -> Self {
        let n_valid = excluded.iter().filter(|&&e| !e).count();
        Self { excluded, n_valid }
    }

    #[inline]
    pub fn is_excluded(&self, i: usize) -> bool {
        self.excluded[i]
    }

    /// Number of samples that are not excluded.
    pub fn valid_len(&self) -> usize {
        self.n_valid
    }

    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// `true` if at least one sample is excluded.
    pub fn is_active(&self) -> bool {
        self.n_valid < self.excluded.len()
    }

    /// Iterator of `(value, excluded)` pairs over `series`.
    pub fn zip<'a>(&'a self, series: &'a [f64]) -> impl Iterator<Item = (f64, bool)> + 'a {
        series.iter().copied().zip(self.excluded.iter().copied())
    }
}

/// `true` when every label equals the first one (or there are none).
pub fn is_uniform(hypno: &[i32]) -> bool {
    hypno.windows(2).all(|w| w[0] == w[1])
}

/// Compute the exclusion mask for a signal of `n` samples.
///
/// * `hypno = None`, `restrict = false`, or a uniform hypnogram → nothing excluded.
/// * [`StageRule::RemOnly`] on a hypnogram without REM → nothing excluded.
///
/// Fails with `DimensionMismatch` if `hypno` is given with a length other than `n`.
pub fn gate(n: usize, hypno: Option<&[i32]>, rule: StageRule, restrict: bool) -> Result<ExclusionMask> {
    let Some(hypno) = hypno else {
        return Ok(ExclusionMask::none(n));
    };
    check_same_len("hypnogram", n, hypno.len())?;

    if !restrict || is_uniform(hypno) {
        return Ok(ExclusionMask::none(n));
    }
    if rule == StageRule::RemOnly && !hypno.contains(&REM) {
        return Ok(ExclusionMask::none(n));
    }

    let mask = ExclusionMask::from_flags(hypno.iter().map(|&s| !rule.keeps(s)).collect());
    tracing::trace!(?rule, excluded = n - mask.valid_len(), "hypnogram gate applied");
    Ok(mask)
}
