//! Named calibration constants.
//!
//! These thresholds encode business calibration carried over from production
//! benchmark data. They are overridable through configuration but must not be
//! silently re-derived.

use serde::{Deserialize, Serialize};

/// Thresholds driving the diagnosis rule tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisThresholds {
    /// Deviation beyond this percentage marks a metric WEAK rather than AVG.
    #[serde(default = "default_weak_deviation_pct")]
    pub weak_deviation_pct: f64,

    /// Clicks required before zero leads counts as a tracking problem.
    #[serde(default = "default_tracking_min_clicks")]
    pub tracking_min_clicks: u64,

    /// Conversion rate above `multiplier * range.high` is suspiciously high.
    #[serde(default = "default_tracking_cr_multiplier")]
    pub tracking_cr_multiplier: f64,

    /// Absolute conversion-rate floor for the tracking-sanity check.
    #[serde(default = "default_tracking_cr_floor")]
    pub tracking_cr_floor: f64,

    /// Budgets below this cannot sustain a diagnosable campaign.
    #[serde(default = "default_budget_floor")]
    pub budget_floor: f64,

    /// Budgets in `[budget_floor, this)` get a budget-constrained annotation.
    #[serde(default = "default_budget_constrained_ceiling")]
    pub budget_constrained_ceiling: f64,

    /// Below this many leads the diagnosis is marked provisional.
    #[serde(default = "default_provisional_min_leads")]
    pub provisional_min_leads: u64,

    /// Below this many clicks the diagnosis is marked provisional.
    #[serde(default = "default_provisional_min_clicks")]
    pub provisional_min_clicks: u64,

    /// CPC beyond `multiplier * range.high` is the extreme outlier in the
    /// both-weak tie-break.
    #[serde(default = "default_cpc_outlier_multiplier")]
    pub cpc_outlier_multiplier: f64,

    /// CR below `multiplier * range.low` disqualifies the CPC-first path.
    #[serde(default = "default_cr_collapse_multiplier")]
    pub cr_collapse_multiplier: f64,
}

impl Default for DiagnosisThresholds {
    fn default() -> Self {
        Self {
            weak_deviation_pct: default_weak_deviation_pct(),
            tracking_min_clicks: default_tracking_min_clicks(),
            tracking_cr_multiplier: default_tracking_cr_multiplier(),
            tracking_cr_floor: default_tracking_cr_floor(),
            budget_floor: default_budget_floor(),
            budget_constrained_ceiling: default_budget_constrained_ceiling(),
            provisional_min_leads: default_provisional_min_leads(),
            provisional_min_clicks: default_provisional_min_clicks(),
            cpc_outlier_multiplier: default_cpc_outlier_multiplier(),
            cr_collapse_multiplier: default_cr_collapse_multiplier(),
        }
    }
}

impl DiagnosisThresholds {
    /// Tighter WEAK cutoff and volume gates.
    pub fn strict() -> Self {
        Self {
            weak_deviation_pct: 10.0,
            provisional_min_leads: 25,
            provisional_min_clicks: 500,
            ..Default::default()
        }
    }

    /// Default calibration.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Looser WEAK cutoff for noisy verticals.
    pub fn lenient() -> Self {
        Self {
            weak_deviation_pct: 25.0,
            provisional_min_leads: 10,
            provisional_min_clicks: 200,
            ..Default::default()
        }
    }
}

fn default_weak_deviation_pct() -> f64 {
    15.0
}
fn default_tracking_min_clicks() -> u64 {
    100
}
fn default_tracking_cr_multiplier() -> f64 {
    1.8
}
fn default_tracking_cr_floor() -> f64 {
    0.15
}
fn default_budget_floor() -> f64 {
    500.0
}
fn default_budget_constrained_ceiling() -> f64 {
    1000.0
}
fn default_provisional_min_leads() -> u64 {
    15
}
fn default_provisional_min_clicks() -> u64 {
    300
}
fn default_cpc_outlier_multiplier() -> f64 {
    1.5
}
fn default_cr_collapse_multiplier() -> f64 {
    0.5
}

/// Fallback centers and span used when percentile data is sparse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeDefaults {
    /// Center for percent metrics with no data (5% conversion rate).
    #[serde(default = "default_percent_center")]
    pub percent_center: f64,

    /// Center for cost-per-click with no data.
    #[serde(default = "default_cpc_center")]
    pub cpc_center: f64,

    /// Center for cost-per-lead with no data.
    #[serde(default = "default_cpl_center")]
    pub cpl_center: f64,

    /// Half-width of the synthesized band, as a fraction of the center.
    #[serde(default = "default_synthetic_span_ratio")]
    pub synthetic_span_ratio: f64,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            percent_center: default_percent_center(),
            cpc_center: default_cpc_center(),
            cpl_center: default_cpl_center(),
            synthetic_span_ratio: default_synthetic_span_ratio(),
        }
    }
}

fn default_percent_center() -> f64 {
    0.05
}
fn default_cpc_center() -> f64 {
    3.0
}
fn default_cpl_center() -> f64 {
    50.0
}
fn default_synthetic_span_ratio() -> f64 {
    0.15
}

/// Multipliers deriving scenario-solver slider bounds from percentiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverBoundsConfig {
    /// Budget ceiling is `max(multiple * initial_budget, floor)`.
    #[serde(default = "default_budget_max_multiple")]
    pub budget_max_multiple: f64,

    #[serde(default = "default_budget_max_floor")]
    pub budget_max_floor: f64,

    #[serde(default = "default_cpc_low_multiplier")]
    pub cpc_low_multiplier: f64,

    #[serde(default = "default_cpc_high_multiplier")]
    pub cpc_high_multiplier: f64,

    #[serde(default = "default_cr_low_multiplier")]
    pub cr_low_multiplier: f64,

    #[serde(default = "default_cr_high_multiplier")]
    pub cr_high_multiplier: f64,

    /// Conversion rate can never exceed this fraction.
    #[serde(default = "default_cr_cap")]
    pub cr_cap: f64,

    /// Fallback widening around the current value when the derived
    /// bounds collapse: `[low_mult * v, high_mult * v]`.
    #[serde(default = "default_fallback_low_multiplier")]
    pub fallback_low_multiplier: f64,

    #[serde(default = "default_fallback_high_multiplier")]
    pub fallback_high_multiplier: f64,
}

impl Default for SolverBoundsConfig {
    fn default() -> Self {
        Self {
            budget_max_multiple: default_budget_max_multiple(),
            budget_max_floor: default_budget_max_floor(),
            cpc_low_multiplier: default_cpc_low_multiplier(),
            cpc_high_multiplier: default_cpc_high_multiplier(),
            cr_low_multiplier: default_cr_low_multiplier(),
            cr_high_multiplier: default_cr_high_multiplier(),
            cr_cap: default_cr_cap(),
            fallback_low_multiplier: default_fallback_low_multiplier(),
            fallback_high_multiplier: default_fallback_high_multiplier(),
        }
    }
}

fn default_budget_max_multiple() -> f64 {
    2.0
}
fn default_budget_max_floor() -> f64 {
    10_000.0
}
fn default_cpc_low_multiplier() -> f64 {
    0.5
}
fn default_cpc_high_multiplier() -> f64 {
    1.8
}
fn default_cr_low_multiplier() -> f64 {
    0.3
}
fn default_cr_high_multiplier() -> f64 {
    2.0
}
fn default_cr_cap() -> f64 {
    1.0
}
fn default_fallback_low_multiplier() -> f64 {
    0.5
}
fn default_fallback_high_multiplier() -> f64 {
    2.0
}

/// Where inside the realistic range the recommended CPL lands.
///
/// The exact placement is a policy point, not an inferred behavior; keep it
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedCplPolicy {
    Midpoint,
    NearestBound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPolicy {
    #[serde(default = "default_recommended_cpl_policy")]
    pub recommended_cpl: RecommendedCplPolicy,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            recommended_cpl: default_recommended_cpl_policy(),
        }
    }
}

fn default_recommended_cpl_policy() -> RecommendedCplPolicy {
    RecommendedCplPolicy::Midpoint
}
