//! The ordered diagnosis rule list.
//!
//! Priority order is data, not control flow: rules are evaluated
//! top-to-bottom and the first match wins. Rules 1-3 are terminal guards for
//! states where per-metric verdicts are meaningless (no traffic, broken
//! tracking, starved budget); the final rule always matches and picks the
//! performance outcome.

use crate::config::DiagnosisThresholds;
use crate::core::{DiagnosisInput, GoalStatus, TargetRange};
use crate::diagnosis::Outcome;
use crate::scoring::MetricStatus;

/// Precomputed per-metric facts the rules match against.
pub(crate) struct RuleContext<'a> {
    pub input: &'a DiagnosisInput,
    pub thresholds: &'a DiagnosisThresholds,
    pub cpc_range: TargetRange,
    pub cr_range: TargetRange,
    pub cpl_status: MetricStatus,
    pub cpc_status: MetricStatus,
    pub cr_status: MetricStatus,
}

pub(crate) struct Rule {
    pub name: &'static str,
    pub eval: fn(&RuleContext) -> Option<Outcome>,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        name: "no_traffic",
        eval: no_traffic,
    },
    Rule {
        name: "tracking_integrity",
        eval: tracking_integrity,
    },
    Rule {
        name: "budget_floor",
        eval: budget_floor,
    },
    Rule {
        name: "performance",
        eval: performance,
    },
];

/// Walk the rule list; the final rule always matches.
pub(crate) fn evaluate(ctx: &RuleContext) -> (&'static str, Outcome) {
    for rule in RULES {
        if let Some(outcome) = (rule.eval)(ctx) {
            return (rule.name, outcome);
        }
    }
    // The performance rule is total; this is unreachable but keeps the
    // walk honest if the rule list is ever reordered.
    ("fallback", Outcome::MonitorPerformance)
}

fn no_traffic(ctx: &RuleContext) -> Option<Outcome> {
    (ctx.input.clicks == 0).then_some(Outcome::NoTraffic)
}

fn tracking_integrity(ctx: &RuleContext) -> Option<Outcome> {
    let t = ctx.thresholds;
    let zero_leads_with_traffic =
        ctx.input.leads == 0 && ctx.input.clicks >= t.tracking_min_clicks;
    (zero_leads_with_traffic || cr_suspiciously_high(ctx)).then_some(Outcome::VerifyTracking)
}

/// A conversion rate far above the peer band usually means double-counted or
/// misfired conversion events, not a miracle campaign.
fn cr_suspiciously_high(ctx: &RuleContext) -> bool {
    let t = ctx.thresholds;
    let cutoff = (t.tracking_cr_multiplier * ctx.cr_range.high).max(t.tracking_cr_floor);
    matches!(ctx.input.cr.finite_value(), Some(cr) if cr > cutoff)
}

fn budget_floor(ctx: &RuleContext) -> Option<Outcome> {
    matches!(ctx.input.budget, Some(b) if b < ctx.thresholds.budget_floor)
        .then_some(Outcome::BudgetTooLow)
}

/// Terminal rule: pick the performance outcome from per-metric statuses and
/// the overall goal status.
fn performance(ctx: &RuleContext) -> Option<Outcome> {
    let any_weak =
        ctx.cpl_status.is_weak() || ctx.cpc_status.is_weak() || ctx.cr_status.is_weak();

    if !any_weak {
        return Some(match ctx.input.goal_status {
            GoalStatus::Achieved | GoalStatus::OnTrack => Outcome::ReadyToScale,
            // Performance is fine; the stated goal itself is the problem.
            _ => Outcome::RealignGoalExpectations,
        });
    }

    if ctx.input.goal_status == GoalStatus::Behind {
        let cr_weak = ctx.cr_status.is_weak();
        let cpc_weak = ctx.cpc_status.is_weak();
        return Some(if cr_weak && !cpc_weak {
            Outcome::FixConversionRate
        } else if cpc_weak && !cr_weak {
            Outcome::ReduceTrafficCost
        } else if cpc_extreme_outlier(ctx) {
            // Attacking the more extreme outlier first yields faster payback.
            Outcome::FixCpcFirst
        } else {
            // Comparably bad: conversion-rate fixes carry faster leverage.
            Outcome::FixCrFirst
        });
    }

    Some(Outcome::MonitorPerformance)
}

/// CPC is the extreme outlier only when it blows past its band while the
/// conversion rate has not collapsed below half its own floor.
fn cpc_extreme_outlier(ctx: &RuleContext) -> bool {
    let t = ctx.thresholds;
    let cpc_blown = matches!(
        ctx.input.cpc.finite_value(),
        Some(cpc) if cpc > t.cpc_outlier_multiplier * ctx.cpc_range.high
    );
    let cr_collapsed = matches!(
        ctx.input.cr.finite_value(),
        Some(cr) if cr < t.cr_collapse_multiplier * ctx.cr_range.low
    );
    cpc_blown && !cr_collapsed
}
