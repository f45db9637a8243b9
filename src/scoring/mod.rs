//! Verdict classification and deviation scoring.
//!
//! A verdict places an observed value relative to its target range with the
//! metric's better-direction deciding which side of the range is the good
//! one. Deviation measures how far outside the range the value sits, as a
//! percentage of the crossed bound.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, TargetRange, Verdict};

/// Floor for deviation denominators so a zero bound cannot blow up the
/// percentage.
const MIN_BOUND_DIVISOR: f64 = 1e-9;

/// Classify an observed value against its target range.
///
/// `Unknown` whenever the value or the range is missing or non-finite.
/// Crossing the range in the good direction is `ExceedsTarget`, in the bad
/// direction `OutsideTarget`.
pub fn classify(value: Option<f64>, range: Option<&TargetRange>, direction: Direction) -> Verdict {
    let (value, range) = match (value, range) {
        (Some(v), Some(r)) if v.is_finite() => (v, r),
        _ => return Verdict::Unknown,
    };

    if range.contains(value) {
        return Verdict::OnTarget;
    }

    let below = value < range.low;
    match direction {
        Direction::LowerIsBetter if below => Verdict::ExceedsTarget,
        Direction::LowerIsBetter => Verdict::OutsideTarget,
        Direction::HigherIsBetter if below => Verdict::OutsideTarget,
        Direction::HigherIsBetter => Verdict::ExceedsTarget,
    }
}

/// Percentage distance from whichever bound was crossed; `0` inside the
/// range or when inputs are missing.
pub fn deviation_pct(value: Option<f64>, range: Option<&TargetRange>) -> f64 {
    let (value, range) = match (value, range) {
        (Some(v), Some(r)) if v.is_finite() => (v, r),
        _ => return 0.0,
    };

    if range.contains(value) {
        0.0
    } else if value < range.low {
        (range.low - value) / range.low.max(MIN_BOUND_DIVISOR) * 100.0
    } else {
        (value - range.high) / range.high.max(MIN_BOUND_DIVISOR) * 100.0
    }
}

/// Coarse per-metric status feeding the diagnosis rule tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricStatus {
    Good,
    Avg,
    Weak,
}

impl MetricStatus {
    /// Status from a verdict and its deviation. On-target or better is GOOD;
    /// beyond the weak cutoff is WEAK; everything else, including unknown
    /// verdicts, is AVG.
    pub fn from_verdict(verdict: Verdict, deviation_pct: f64, weak_cutoff_pct: f64) -> Self {
        if verdict.is_good() {
            MetricStatus::Good
        } else if deviation_pct > weak_cutoff_pct {
            MetricStatus::Weak
        } else {
            MetricStatus::Avg
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self, MetricStatus::Weak)
    }
}
