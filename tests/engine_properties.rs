//! Property tests for the classification and solver invariants.

use benchlight::{
    classify, resolve_range, Direction, MetricKind, MetricSample, RangeDefaults, ScenarioAction,
    ScenarioSolver, SolverBoundsConfig, TargetRange, Verdict,
};
use proptest::prelude::*;

fn finite_nonneg() -> impl Strategy<Value = f64> {
    0.0..1e6f64
}

proptest! {
    #[test]
    fn resolve_always_returns_ordered_range(
        value in proptest::option::of(finite_nonneg()),
        median in proptest::option::of(finite_nonneg()),
        p25 in proptest::option::of(finite_nonneg()),
        p75 in proptest::option::of(finite_nonneg()),
    ) {
        let sample = MetricSample {
            value,
            median,
            p25,
            p75,
            ..Default::default()
        };
        for kind in [MetricKind::CostPerLead, MetricKind::CostPerClick, MetricKind::ConversionRate] {
            let range = resolve_range(&sample, kind, &RangeDefaults::default());
            prop_assert!(range.low >= 0.0);
            prop_assert!(range.low <= range.high);
        }
    }

    #[test]
    fn values_inside_the_range_are_on_target(
        low in finite_nonneg(),
        width in finite_nonneg(),
        frac in 0.0..=1.0f64,
    ) {
        let range = TargetRange::new(low, low + width);
        // clamp: low + frac * width can overshoot high by one ulp
        let value = (range.low + frac * (range.high - range.low)).min(range.high);
        for direction in [Direction::LowerIsBetter, Direction::HigherIsBetter] {
            prop_assert_eq!(classify(Some(value), Some(&range), direction), Verdict::OnTarget);
        }
    }

    #[test]
    fn moving_further_out_never_flips_back_to_on_target(
        low in 1.0..1e4f64,
        width in 0.0..1e4f64,
        step in 0.001..1e4f64,
        extra in 0.001..1e4f64,
    ) {
        let range = TargetRange::new(low, low + width);
        // above the high bound, the bad side for lower-is-better metrics
        let near = range.high + step;
        let far = near + extra;
        let near_verdict = classify(Some(near), Some(&range), Direction::LowerIsBetter);
        let far_verdict = classify(Some(far), Some(&range), Direction::LowerIsBetter);
        prop_assert_eq!(near_verdict, Verdict::OutsideTarget);
        prop_assert_eq!(far_verdict, Verdict::OutsideTarget);
    }

    #[test]
    fn solve_via_cr_hits_the_goal_or_misses_observably(
        budget in 500.0..20_000.0f64,
        cpc in 0.5..10.0f64,
        cr in 0.005..0.3f64,
        goal in 1.0..500.0f64,
    ) {
        let cpc_sample = MetricSample {
            value: Some(cpc),
            p25: Some(cpc * 0.8),
            p75: Some(cpc * 1.2),
            ..Default::default()
        };
        let cr_sample = MetricSample {
            value: Some(cr),
            p25: Some(cr * 0.8),
            p75: Some(cr * 1.2),
            ..Default::default()
        };
        let solver = ScenarioSolver::new(
            Some(budget),
            &cpc_sample,
            &cr_sample,
            &SolverBoundsConfig::default(),
        );

        let state = solver.transition(
            solver.initial(),
            ScenarioAction::SolveForGoalViaCr { goal_cpl: goal },
        );
        let cpl = state.derive().cpl.expect("cr stays positive");

        let bounds = solver.bounds().cr;
        let clamped = (state.cr - bounds.low).abs() < 1e-12
            || (state.cr - bounds.high).abs() < 1e-12;
        if (cpl - goal).abs() > 1e-6 * goal.max(1.0) {
            // a miss is only allowed when the solve was clamped at a bound
            prop_assert!(clamped, "cpl {} missed goal {} without clamping", cpl, goal);
        }
    }

    #[test]
    fn updates_always_land_inside_bounds(
        raw in -1e6..1e6f64,
        budget in 100.0..10_000.0f64,
    ) {
        let cpc_sample = MetricSample::with_percentiles(Some(3.0), 3.0, 2.0, 4.0);
        let cr_sample = MetricSample::with_percentiles(Some(0.05), 0.05, 0.03, 0.08);
        let solver = ScenarioSolver::new(
            Some(budget),
            &cpc_sample,
            &cr_sample,
            &SolverBoundsConfig::default(),
        );

        let state = solver.transition(
            solver.initial(),
            ScenarioAction::Update {
                field: benchlight::ScenarioField::Cpc,
                raw,
                is_percent: false,
            },
        );
        let bounds = solver.bounds().cpc;
        prop_assert!(state.cpc >= bounds.low && state.cpc <= bounds.high);
    }
}
