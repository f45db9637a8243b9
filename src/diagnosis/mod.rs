//! The diagnosis engine: a prioritized decision tree that pinpoints the
//! root-cause bottleneck of a campaign.
//!
//! The engine is a pure function of its input: structured campaign metrics
//! and benchmark statistics in, one diagnostic outcome with supporting
//! numbers out. Priority lives in an explicit ordered rule list (see
//! [`rules`]); presentation caveats ride along as annotations that never
//! change the chosen outcome.

pub mod goal;
mod rules;


use im::Vector;
use serde::{Deserialize, Serialize};

use crate::benchmark::resolve_range;
use crate::config::EngineConfig;
use crate::core::{DiagnosisInput, GoalScenario, MetricKind, TargetRange, Verdict};
use crate::scoring::{classify, deviation_pct, MetricStatus};

pub use goal::{advise_goal, analyze_goal, GoalAdvisory, GoalAnalysis, GoalRealism, PerformanceBand};

/// The single diagnostic outcome selected for a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Zero clicks: nothing downstream is measurable.
    NoTraffic,
    /// Conversion data cannot be trusted as recorded.
    VerifyTracking,
    /// Budget below the viability floor.
    BudgetTooLow,
    /// Every metric on target and the goal is being met.
    ReadyToScale,
    /// Performance is fine; the stated goal is outside the realistic range.
    RealignGoalExpectations,
    /// Conversion rate is the bottleneck.
    FixConversionRate,
    /// Cost per click is the bottleneck.
    ReduceTrafficCost,
    /// Both levers weak; CPC is the extreme outlier, attack it first.
    FixCpcFirst,
    /// Both levers weak and comparably bad; conversion rate first.
    FixCrFirst,
    /// Mixed signals, no actionable lever yet.
    MonitorPerformance,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NoTraffic => "No traffic",
            Outcome::VerifyTracking => "Verify tracking",
            Outcome::BudgetTooLow => "Budget too low",
            Outcome::ReadyToScale => "Ready to scale",
            Outcome::RealignGoalExpectations => "Realign goal expectations",
            Outcome::FixConversionRate => "Fix conversion rate",
            Outcome::ReduceTrafficCost => "Reduce traffic cost",
            Outcome::FixCpcFirst => "Fix CPC first",
            Outcome::FixCrFirst => "Fix CR first",
            Outcome::MonitorPerformance => "Monitor performance",
        }
    }

    /// Remediation guidance attached to the outcome.
    pub fn remediation(&self) -> &'static str {
        match self {
            Outcome::NoTraffic => {
                "Expand targeting, raise budget, or check campaign eligibility"
            }
            Outcome::VerifyTracking => {
                "Audit conversion tracking before acting on efficiency metrics"
            }
            Outcome::BudgetTooLow => "Raise budget to a viable floor before optimizing",
            Outcome::ReadyToScale => "Performance supports scaling budget",
            Outcome::RealignGoalExpectations => {
                "Reset the CPL goal inside the realistic range"
            }
            Outcome::FixConversionRate => "Improve landing page and offer to lift conversion rate",
            Outcome::ReduceTrafficCost => "Tighten keywords and bids to bring CPC down",
            Outcome::FixCpcFirst => "CPC is the extreme outlier; reduce it, then revisit CR",
            Outcome::FixCrFirst => "Lift conversion rate first, then revisit CPC",
            Outcome::MonitorPerformance => "No action; keep monitoring",
        }
    }

    /// Outcomes that carry needed CR/CPC targets.
    fn is_bottleneck(&self) -> bool {
        matches!(
            self,
            Outcome::FixConversionRate
                | Outcome::ReduceTrafficCost
                | Outcome::FixCpcFirst
                | Outcome::FixCrFirst
        )
    }
}

/// Non-blocking presentation caveats. They never change the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// Too few leads or clicks for a confident read.
    Provisional,
    /// Budget viable but tight; expect constrained results.
    BudgetConstrained,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricVerdicts {
    pub cpl: Verdict,
    pub cpc: Verdict,
    pub cr: Verdict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricStatuses {
    pub cpl: MetricStatus,
    pub cpc: MetricStatus,
    pub cr: MetricStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricRanges {
    pub cpl: TargetRange,
    pub cpc: TargetRange,
    pub cr: TargetRange,
}

/// Full diagnosis result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnosis {
    pub outcome: Outcome,
    /// Name of the rule that fired, for audit trails.
    pub matched_rule: &'static str,
    pub remediation: &'static str,
    pub verdicts: MetricVerdicts,
    pub statuses: MetricStatuses,
    pub ranges: MetricRanges,
    pub goal_analysis: Option<GoalAnalysis>,
    /// Conversion rate needed to hit the goal CPL at the current CPC.
    pub needed_cr: Option<f64>,
    /// CPC needed to hit the goal CPL at the current conversion rate.
    pub needed_cpc: Option<f64>,
    /// Attached when the stated goal itself is too aggressive.
    pub secondary_note: Option<String>,
    pub annotations: Vector<Annotation>,
}

/// Deterministic, rule-based campaign diagnosis.
pub struct DiagnosisEngine {
    config: EngineConfig,
}

impl Default for DiagnosisEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DiagnosisEngine {
    pub fn new(config: EngineConfig) -> Self {
        DiagnosisEngine { config }
    }

    pub fn with_defaults() -> Self {
        DiagnosisEngine {
            config: crate::config::default_config().clone(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the ordered rule tree over one campaign snapshot.
    pub fn diagnose(&self, input: &DiagnosisInput) -> Diagnosis {
        let thresholds = &self.config.thresholds;

        let ranges = MetricRanges {
            cpl: resolve_range(&input.cpl, MetricKind::CostPerLead, &self.config.ranges),
            cpc: resolve_range(&input.cpc, MetricKind::CostPerClick, &self.config.ranges),
            cr: resolve_range(&input.cr, MetricKind::ConversionRate, &self.config.ranges),
        };

        let verdicts = MetricVerdicts {
            cpl: classify(
                input.cpl.finite_value(),
                Some(&ranges.cpl),
                MetricKind::CostPerLead.direction(),
            ),
            cpc: classify(
                input.cpc.finite_value(),
                Some(&ranges.cpc),
                MetricKind::CostPerClick.direction(),
            ),
            cr: classify(
                input.cr.finite_value(),
                Some(&ranges.cr),
                MetricKind::ConversionRate.direction(),
            ),
        };

        let weak_cutoff = thresholds.weak_deviation_pct;
        let statuses = MetricStatuses {
            cpl: MetricStatus::from_verdict(
                verdicts.cpl,
                deviation_pct(input.cpl.finite_value(), Some(&ranges.cpl)),
                weak_cutoff,
            ),
            cpc: MetricStatus::from_verdict(
                verdicts.cpc,
                deviation_pct(input.cpc.finite_value(), Some(&ranges.cpc)),
                weak_cutoff,
            ),
            cr: MetricStatus::from_verdict(
                verdicts.cr,
                deviation_pct(input.cr.finite_value(), Some(&ranges.cr)),
                weak_cutoff,
            ),
        };

        let goal_analysis = input
            .goal_cpl
            .filter(|g| g.is_finite() && *g > 0.0)
            .map(|g| analyze_goal(g, &ranges.cpl, &self.config.goal));

        let ctx = rules::RuleContext {
            input,
            thresholds,
            cpc_range: ranges.cpc,
            cr_range: ranges.cr,
            cpl_status: statuses.cpl,
            cpc_status: statuses.cpc,
            cr_status: statuses.cr,
        };

        let (matched_rule, outcome) = rules::evaluate(&ctx);
        log::debug!(
            "diagnosis: rule {} selected {:?} (statuses {:?}/{:?}/{:?})",
            matched_rule,
            outcome,
            statuses.cpl,
            statuses.cpc,
            statuses.cr
        );

        let (needed_cr, needed_cpc) = if outcome.is_bottleneck() {
            (
                needed_cr(input),
                needed_cpc(input),
            )
        } else {
            (None, None)
        };

        let secondary_note = if outcome.is_bottleneck()
            && matches!(
                goal_analysis.map(|g| g.scenario),
                Some(GoalScenario::TooAggressive)
            ) {
            Some(
                "Goal CPL sits below the realistic range; revisit it once the primary lever is fixed"
                    .to_string(),
            )
        } else {
            None
        };

        Diagnosis {
            outcome,
            matched_rule,
            remediation: outcome.remediation(),
            verdicts,
            statuses,
            ranges,
            goal_analysis,
            needed_cr,
            needed_cpc,
            secondary_note,
            annotations: annotations(input, thresholds),
        }
    }
}

/// CR needed to reach the goal CPL at the current CPC; the caller-supplied
/// target wins when present.
fn needed_cr(input: &DiagnosisInput) -> Option<f64> {
    input.target_cr.or_else(|| {
        let cpc = input.cpc.finite_value()?;
        let goal = input.goal_cpl.filter(|g| *g > 0.0)?;
        Some(cpc / goal)
    })
}

/// CPC needed to reach the goal CPL at the current conversion rate.
fn needed_cpc(input: &DiagnosisInput) -> Option<f64> {
    input.target_cpc.or_else(|| {
        let cr = input.cr.finite_value()?;
        let goal = input.goal_cpl.filter(|g| *g > 0.0)?;
        Some(goal * cr)
    })
}

fn annotations(
    input: &DiagnosisInput,
    thresholds: &crate::config::DiagnosisThresholds,
) -> Vector<Annotation> {
    let mut out = Vector::new();
    if input.leads < thresholds.provisional_min_leads
        || input.clicks < thresholds.provisional_min_clicks
    {
        out.push_back(Annotation::Provisional);
    }
    if let Some(budget) = input.budget {
        if budget >= thresholds.budget_floor && budget < thresholds.budget_constrained_ceiling {
            out.push_back(Annotation::BudgetConstrained);
        }
    }
    out
}
