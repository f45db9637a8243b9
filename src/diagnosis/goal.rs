//! Goal analysis: realism of a stated CPL goal against the realistic range.

use serde::{Deserialize, Serialize};

use crate::config::{GoalPolicy, RecommendedCplPolicy};
use crate::core::{GoalScenario, TargetRange};

/// Ratio cutoffs for the goal-realism advisory, relative to the peer median.
const REALISM_TOO_LOW: f64 = 0.5;
const REALISM_AMBITIOUS: f64 = 0.7;
const REALISM_REASONABLE: f64 = 1.5;
const REALISM_TOO_HIGH: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalAnalysis {
    pub scenario: GoalScenario,
    pub recommended_cpl: f64,
    pub realistic_range: TargetRange,
}

/// Classify a goal against the realistic range and propose a recommended
/// target inside it.
///
/// A goal below the low bound wants to pay less than the efficient-market
/// floor; that is optimistic, not realistic, so it classifies as aggressive
/// rather than good.
pub fn analyze_goal(goal_cpl: f64, realistic_range: &TargetRange, policy: &GoalPolicy) -> GoalAnalysis {
    let scenario = if realistic_range.contains(goal_cpl) {
        GoalScenario::InRange
    } else if goal_cpl < realistic_range.low {
        GoalScenario::TooAggressive
    } else {
        GoalScenario::Conservative
    };

    let recommended_cpl = match policy.recommended_cpl {
        RecommendedCplPolicy::Midpoint => realistic_range.midpoint(),
        RecommendedCplPolicy::NearestBound => realistic_range.clamp(goal_cpl),
    };

    GoalAnalysis {
        scenario,
        recommended_cpl,
        realistic_range: *realistic_range,
    }
}

/// Five-band realism classification of the raw goal vs. the peer median.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalRealism {
    Missing,
    TooLow,
    /// Aggressive but possibly attainable.
    Ambitious,
    Reasonable,
    TooHigh,
    WildlyHigh,
}

/// Coarse performance band of actual spend efficiency vs. a reference CPL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// Actual at or beyond 3x the reference.
    Crisis,
    /// 2-3x.
    MajorGap,
    /// 1.5-2x.
    Gap,
    /// 1.1-1.5x.
    SlightlyHigh,
    /// Within 10 percent either way.
    OnTarget,
    /// Below 0.9x.
    UnderTarget,
    Unknown,
}

impl PerformanceBand {
    fn from_ratio(ratio: Option<f64>) -> Self {
        let r = match ratio {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => return PerformanceBand::Unknown,
        };
        if r >= 3.0 {
            PerformanceBand::Crisis
        } else if r >= 2.0 {
            PerformanceBand::MajorGap
        } else if r >= 1.5 {
            PerformanceBand::Gap
        } else if r > 1.1 {
            PerformanceBand::SlightlyHigh
        } else if r >= 0.9 {
            PerformanceBand::OnTarget
        } else {
            PerformanceBand::UnderTarget
        }
    }
}

/// Compact, caller-ready advisory about CPL goal realism.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalAdvisory {
    pub realism: GoalRealism,
    pub ratio_to_median: Option<f64>,
    /// Tight recommended window: `[max(0.8*p50, p25), min(1.2*p50, p75)]`.
    pub recommended_window: TargetRange,
    pub recommended_point: f64,
    pub band_vs_goal: PerformanceBand,
    pub band_vs_recommended: PerformanceBand,
}

/// Build a goal advisory from the stated goal, the observed CPL, and the
/// peer percentiles. Missing percentiles fall back to a window around the
/// median; a missing median falls back to the vertical-wide prior of 150.
pub fn advise_goal(
    goal_cpl: Option<f64>,
    actual_cpl: Option<f64>,
    median: Option<f64>,
    p25: Option<f64>,
    p75: Option<f64>,
) -> GoalAdvisory {
    let p50 = median.filter(|m| m.is_finite() && *m > 0.0).unwrap_or(150.0);
    let p25 = p25.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(0.8 * p50);
    let p75 = p75.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(1.2 * p50);

    let recommended_window = TargetRange::new((0.8 * p50).max(p25), (1.2 * p50).min(p75));
    let recommended_point = recommended_window.clamp(p50);

    let goal = goal_cpl.filter(|g| g.is_finite() && *g > 0.0);
    let ratio_to_median = goal.map(|g| g / p50);
    let realism = match ratio_to_median {
        None => GoalRealism::Missing,
        Some(r) if r < REALISM_TOO_LOW => GoalRealism::TooLow,
        Some(r) if r < REALISM_AMBITIOUS => GoalRealism::Ambitious,
        Some(r) if r <= REALISM_REASONABLE => GoalRealism::Reasonable,
        Some(r) if r <= REALISM_TOO_HIGH => GoalRealism::TooHigh,
        Some(_) => GoalRealism::WildlyHigh,
    };

    let actual = actual_cpl.filter(|a| a.is_finite() && *a > 0.0);
    let band_vs_goal = PerformanceBand::from_ratio(match (actual, goal) {
        (Some(a), Some(g)) => Some(a / g),
        _ => None,
    });
    let band_vs_recommended = PerformanceBand::from_ratio(actual.map(|a| a / recommended_point));

    GoalAdvisory {
        realism,
        ratio_to_median,
        recommended_window,
        recommended_point,
        band_vs_goal,
        band_vs_recommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy() -> GoalPolicy {
        GoalPolicy::default()
    }

    #[test]
    fn goal_below_range_is_aggressive() {
        let range = TargetRange::new(45.0, 90.0);
        let analysis = analyze_goal(30.0, &range, &policy());
        assert_eq!(analysis.scenario, GoalScenario::TooAggressive);
    }

    #[test]
    fn goal_inside_range() {
        let range = TargetRange::new(45.0, 90.0);
        assert_eq!(
            analyze_goal(60.0, &range, &policy()).scenario,
            GoalScenario::InRange
        );
        // bounds are inclusive
        assert_eq!(
            analyze_goal(45.0, &range, &policy()).scenario,
            GoalScenario::InRange
        );
    }

    #[test]
    fn goal_above_range_is_conservative() {
        let range = TargetRange::new(45.0, 90.0);
        assert_eq!(
            analyze_goal(120.0, &range, &policy()).scenario,
            GoalScenario::Conservative
        );
    }

    #[test]
    fn midpoint_policy_recommends_center() {
        let range = TargetRange::new(40.0, 80.0);
        let analysis = analyze_goal(30.0, &range, &policy());
        assert_eq!(analysis.recommended_cpl, 60.0);
        assert!(range.contains(analysis.recommended_cpl));
    }

    #[test]
    fn nearest_bound_policy_clamps_the_goal() {
        let range = TargetRange::new(40.0, 80.0);
        let policy = GoalPolicy {
            recommended_cpl: crate::config::RecommendedCplPolicy::NearestBound,
        };
        assert_eq!(analyze_goal(30.0, &range, &policy).recommended_cpl, 40.0);
        assert_eq!(analyze_goal(100.0, &range, &policy).recommended_cpl, 80.0);
        assert_eq!(analyze_goal(55.0, &range, &policy).recommended_cpl, 55.0);
    }

    #[test]
    fn advisory_realism_bands() {
        let advise = |goal| advise_goal(Some(goal), None, Some(100.0), None, None).realism;
        assert_eq!(advise(40.0), GoalRealism::TooLow);
        assert_eq!(advise(60.0), GoalRealism::Ambitious);
        assert_eq!(advise(100.0), GoalRealism::Reasonable);
        assert_eq!(advise(200.0), GoalRealism::TooHigh);
        assert_eq!(advise(400.0), GoalRealism::WildlyHigh);
    }

    #[test]
    fn advisory_missing_goal() {
        let advisory = advise_goal(None, Some(80.0), Some(100.0), Some(70.0), Some(130.0));
        assert_eq!(advisory.realism, GoalRealism::Missing);
        assert_eq!(advisory.band_vs_goal, PerformanceBand::Unknown);
    }

    #[test]
    fn advisory_window_respects_percentiles() {
        let advisory = advise_goal(Some(90.0), None, Some(100.0), Some(85.0), Some(110.0));
        // max(0.8*100, 85) .. min(1.2*100, 110)
        assert_eq!(advisory.recommended_window, TargetRange::new(85.0, 110.0));
        assert_eq!(advisory.recommended_point, 100.0);
    }

    #[test]
    fn advisory_performance_bands() {
        let band = |actual, goal| {
            advise_goal(Some(goal), Some(actual), Some(100.0), None, None).band_vs_goal
        };
        assert_eq!(band(300.0, 100.0), PerformanceBand::Crisis);
        assert_eq!(band(250.0, 100.0), PerformanceBand::MajorGap);
        assert_eq!(band(160.0, 100.0), PerformanceBand::Gap);
        assert_eq!(band(120.0, 100.0), PerformanceBand::SlightlyHigh);
        assert_eq!(band(100.0, 100.0), PerformanceBand::OnTarget);
        assert_eq!(band(70.0, 100.0), PerformanceBand::UnderTarget);
    }

    #[test]
    fn advisory_without_any_benchmark_uses_prior() {
        let advisory = advise_goal(Some(150.0), None, None, None, None);
        assert_eq!(advisory.realism, GoalRealism::Reasonable);
        assert_eq!(advisory.recommended_point, 150.0);
    }
}
