//! End-to-end diagnosis runs against realistic campaign snapshots.

use benchlight::{
    Annotation, DiagnosisEngine, DiagnosisInput, EngineConfig, GoalStatus, MetricSample, Outcome,
    Verdict,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A mid-budget campaign paying $125 per lead against a $45-$90 peer band,
/// with expensive clicks and a healthy conversion rate.
fn behind_campaign() -> DiagnosisInput {
    DiagnosisInput {
        budget: Some(5000.0),
        clicks: 1000,
        leads: 40,
        goal_cpl: Some(80.0),
        goal_status: GoalStatus::Behind,
        cpl: MetricSample::with_percentiles(Some(125.0), 60.0, 45.0, 90.0),
        cpc: MetricSample::with_percentiles(Some(5.0), 3.0, 2.0, 4.0),
        cr: MetricSample::with_percentiles(Some(0.04), 0.05, 0.03, 0.08),
        ..Default::default()
    }
}

#[test]
fn behind_campaign_points_at_traffic_cost() {
    init_logging();
    let engine = DiagnosisEngine::with_defaults();
    let diagnosis = engine.diagnose(&behind_campaign());

    // CPL is 39% above the band high: outside target, WEAK.
    assert_eq!(diagnosis.verdicts.cpl, Verdict::OutsideTarget);
    // CPC 25% above its band, CR comfortably inside.
    assert_eq!(diagnosis.verdicts.cpc, Verdict::OutsideTarget);
    assert_eq!(diagnosis.verdicts.cr, Verdict::OnTarget);

    // CPC is the only weak lever, so the bottleneck is traffic cost.
    assert_eq!(diagnosis.outcome, Outcome::ReduceTrafficCost);
    assert_eq!(diagnosis.matched_rule, "performance");

    // CPC needed to hit $80 CPL at a 4% conversion rate.
    let needed_cpc = diagnosis.needed_cpc.unwrap();
    assert!((needed_cpc - 3.2).abs() < 1e-9);

    // Healthy volume and budget: no caveats.
    assert!(diagnosis.annotations.is_empty());
}

#[test]
fn goal_inside_the_band_scales_when_on_track() {
    init_logging();
    let engine = DiagnosisEngine::with_defaults();
    let input = DiagnosisInput {
        goal_status: GoalStatus::OnTrack,
        cpl: MetricSample::with_percentiles(Some(60.0), 60.0, 45.0, 90.0),
        cpc: MetricSample::with_percentiles(Some(3.0), 3.0, 2.0, 4.0),
        cr: MetricSample::with_percentiles(Some(0.05), 0.05, 0.03, 0.08),
        ..behind_campaign()
    };
    let diagnosis = engine.diagnose(&input);

    assert_eq!(diagnosis.outcome, Outcome::ReadyToScale);
    let goal = diagnosis.goal_analysis.unwrap();
    assert!(goal.realistic_range.contains(goal.recommended_cpl));
    assert!(goal.realistic_range.contains(80.0));
}

#[test]
fn tight_budget_annotates_but_does_not_redirect() {
    init_logging();
    let engine = DiagnosisEngine::with_defaults();

    let baseline = engine.diagnose(&behind_campaign());
    let constrained = engine.diagnose(&DiagnosisInput {
        budget: Some(600.0),
        ..behind_campaign()
    });

    assert_eq!(constrained.outcome, baseline.outcome);
    assert!(constrained
        .annotations
        .contains(&Annotation::BudgetConstrained));
}

#[test]
fn custom_weak_cutoff_changes_the_diagnosis() {
    init_logging();
    // With a 30% cutoff, a CPC 25% over its band is merely AVG, and the
    // weak CPL alone drives the tie-break toward conversion rate.
    let config: EngineConfig = toml::from_str(
        r#"
        [thresholds]
        weak_deviation_pct = 30.0
        "#,
    )
    .unwrap();
    let engine = DiagnosisEngine::new(config);
    let diagnosis = engine.diagnose(&behind_campaign());

    assert_eq!(diagnosis.outcome, Outcome::FixCrFirst);
}

#[test]
fn no_benchmark_data_still_produces_a_diagnosis() {
    init_logging();
    let engine = DiagnosisEngine::with_defaults();
    let input = DiagnosisInput {
        budget: Some(2000.0),
        clicks: 500,
        leads: 20,
        cpl: MetricSample::of(55.0),
        cpc: MetricSample::of(3.0),
        cr: MetricSample::of(0.05),
        ..Default::default()
    };
    let diagnosis = engine.diagnose(&input);

    // Synthesized bands center on the observed values, so everything reads
    // on-target and the unknown goal status asks for a goal reset.
    assert_eq!(diagnosis.verdicts.cpl, Verdict::OnTarget);
    assert_eq!(diagnosis.outcome, Outcome::RealignGoalExpectations);
}
