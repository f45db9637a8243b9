//! Core data model shared by every engine component.
//!
//! All values here are transient: constructed fresh per invocation, never
//! mutated after construction, never retained by the engine across calls.

use serde::{Deserialize, Serialize};

/// The campaign efficiency metrics the engine reasons about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CostPerLead,
    CostPerClick,
    ConversionRate,
}

impl MetricKind {
    /// Which direction counts as an improvement for this metric.
    pub fn direction(&self) -> Direction {
        match self {
            MetricKind::CostPerLead | MetricKind::CostPerClick => Direction::LowerIsBetter,
            MetricKind::ConversionRate => Direction::HigherIsBetter,
        }
    }

    /// Conversion rate is a fraction; the cost metrics are dollar amounts.
    pub fn is_percent(&self) -> bool {
        matches!(self, MetricKind::ConversionRate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::CostPerLead => "CPL",
            MetricKind::CostPerClick => "CPC",
            MetricKind::ConversionRate => "CR",
        }
    }
}

/// Whether a higher or lower observed value is the good outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// A `[low, high]` band considered typical for a metric.
///
/// Invariant: `0 <= low <= high`. Candidate ranges that violate it are
/// normalized (bounds swapped, low floored at zero) before use.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub low: f64,
    pub high: f64,
}

impl TargetRange {
    /// Build a range, normalizing inverted or negative bounds.
    pub fn new(low: f64, high: f64) -> Self {
        TargetRange { low, high }.normalized()
    }

    /// Enforce `0 <= low <= high` by swapping and flooring.
    pub fn normalized(self) -> Self {
        let (mut low, mut high) = if self.low > self.high {
            (self.high, self.low)
        } else {
            (self.low, self.high)
        };
        low = low.max(0.0);
        high = high.max(low);
        TargetRange { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}

/// A raw metric observation plus whatever peer benchmark statistics the
/// caller has available.
///
/// `value == None` means "no data" and must never be conflated with zero:
/// zero has a diagnostic meaning of its own (zero clicks is a no-traffic
/// signal, not a missing one).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub value: Option<f64>,
    pub median: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub target_range: Option<TargetRange>,
    pub delta_from_target: Option<f64>,
    pub peer_multiple: Option<f64>,
}

impl MetricSample {
    /// A sample carrying only an observed value.
    pub fn of(value: f64) -> Self {
        MetricSample {
            value: Some(value),
            ..Default::default()
        }
    }

    /// A sample with observed value and peer percentiles.
    pub fn with_percentiles(value: Option<f64>, median: f64, p25: f64, p75: f64) -> Self {
        MetricSample {
            value,
            median: Some(median),
            p25: Some(p25),
            p75: Some(p75),
            ..Default::default()
        }
    }

    /// Observed value, filtered to finite numbers.
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// Classification of an observed value relative to its target range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    OnTarget,
    /// Outside the range, but in the direction that counts as better.
    ExceedsTarget,
    /// Outside the range in the bad direction.
    OutsideTarget,
    /// Value or range missing.
    Unknown,
}

impl Verdict {
    /// On-target or better.
    pub fn is_good(&self) -> bool {
        matches!(self, Verdict::OnTarget | Verdict::ExceedsTarget)
    }
}

/// Caller-supplied overall pacing status against the stated goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Achieved,
    OnTrack,
    Behind,
    Unknown,
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::Unknown
    }
}

/// Classification of a user's aspirational CPL relative to the realistic
/// range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalScenario {
    /// Below the efficient-market floor; optimistic, not realistic.
    TooAggressive,
    InRange,
    /// Above the high bound; the goal leaves headroom.
    Conservative,
}

/// Everything the diagnosis engine needs for one campaign.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisInput {
    pub budget: Option<f64>,
    pub clicks: u64,
    pub leads: u64,
    pub goal_cpl: Option<f64>,
    #[serde(default)]
    pub goal_status: GoalStatus,
    /// Precomputed conversion-rate target, when the caller has one.
    pub target_cr: Option<f64>,
    /// Precomputed cost-per-click target, when the caller has one.
    pub target_cpc: Option<f64>,
    pub cpl: MetricSample,
    pub cpc: MetricSample,
    pub cr: MetricSample,
}
