//! The "solve for goal" scenario calculator.
//!
//! The solver holds an initial snapshot and slider bounds; the state itself
//! is an explicit immutable value the caller owns. Every operation is a pure
//! transition `state -> state'`: invalid input returns the state unchanged,
//! out-of-bounds input clamps. A clamped solve is observable because the
//! derived CPL no longer matches the requested goal.

use serde::{Deserialize, Serialize};

use crate::config::SolverBoundsConfig;
use crate::core::{MetricSample, TargetRange};

/// The three adjustable levers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioField {
    Budget,
    Cpc,
    Cr,
}

/// Adjustable campaign levers. `cr` is a fraction, not a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioState {
    pub budget: f64,
    pub cpc: f64,
    pub cr: f64,
}

/// Values derived from a state; all division-guarded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScenarioDerived {
    pub clicks: f64,
    pub leads: f64,
    /// `None` when the conversion rate is zero.
    pub cpl: Option<f64>,
}

impl ScenarioState {
    pub fn derive(&self) -> ScenarioDerived {
        let clicks = if self.budget > 0.0 && self.cpc > 0.0 {
            self.budget / self.cpc
        } else {
            0.0
        };
        let leads = if self.cr > 0.0 && self.cpc > 0.0 {
            self.budget * self.cr / self.cpc
        } else {
            0.0
        };
        let cpl = if self.cr > 0.0 {
            Some(self.cpc / self.cr)
        } else {
            None
        };
        ScenarioDerived { clicks, leads, cpl }
    }
}

/// Transitions over a scenario state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ScenarioAction {
    /// Set one field from raw user input. `is_percent` marks a conversion
    /// rate entered as a percentage (e.g. `5` meaning 5%).
    Update {
        field: ScenarioField,
        raw: f64,
        is_percent: bool,
    },
    /// Solve for the conversion rate that reaches the goal CPL.
    SolveForGoalViaCr { goal_cpl: f64 },
    /// Solve for the CPC that reaches the goal CPL.
    SolveForGoalViaCpc { goal_cpl: f64 },
    /// Restore the initial snapshot.
    Reset,
}

/// Slider bounds derived from percentile data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SolverBounds {
    pub budget_max: f64,
    pub cpc: TargetRange,
    pub cr: TargetRange,
}

impl SolverBounds {
    /// Derive bounds from the initial state and percentile samples.
    ///
    /// CPC and CR bounds come from `p25`/`p75` scaled by the configured
    /// multipliers; when percentiles are missing or collapse, the bounds
    /// widen around the current value instead (and around the fallback
    /// center when even that is unusable).
    pub fn derive(
        initial: &ScenarioState,
        cpc_sample: &MetricSample,
        cr_sample: &MetricSample,
        config: &SolverBoundsConfig,
    ) -> Self {
        let budget_max = (config.budget_max_multiple * initial.budget).max(config.budget_max_floor);

        let cpc = percentile_bounds(
            cpc_sample,
            config.cpc_low_multiplier,
            config.cpc_high_multiplier,
            initial.cpc,
            3.0,
            None,
            config,
        );
        let cr = percentile_bounds(
            cr_sample,
            config.cr_low_multiplier,
            config.cr_high_multiplier,
            initial.cr,
            0.05,
            Some(config.cr_cap),
            config,
        );

        SolverBounds { budget_max, cpc, cr }
    }
}

fn percentile_bounds(
    sample: &MetricSample,
    low_multiplier: f64,
    high_multiplier: f64,
    current: f64,
    fallback_center: f64,
    cap: Option<f64>,
    config: &SolverBoundsConfig,
) -> TargetRange {
    let derived = match (sample.p25, sample.p75) {
        (Some(p25), Some(p75)) => {
            let low = low_multiplier * p25;
            let mut high = high_multiplier * p75;
            if let Some(cap) = cap {
                high = high.min(cap);
            }
            (low < high).then(|| TargetRange::new(low, high))
        }
        _ => None,
    };

    derived.unwrap_or_else(|| {
        let center = if current > 0.0 && current.is_finite() {
            current
        } else {
            fallback_center
        };
        let low = config.fallback_low_multiplier * center;
        let mut high = config.fallback_high_multiplier * center;
        if let Some(cap) = cap {
            high = high.min(cap);
        }
        TargetRange::new(low, high)
    })
}

/// Bidirectional scenario calculator over budget, CPC, and conversion rate.
pub struct ScenarioSolver {
    initial: ScenarioState,
    bounds: SolverBounds,
}

impl ScenarioSolver {
    /// Build a solver from current campaign values (or percentile medians
    /// where the campaign has none).
    pub fn new(
        budget: Option<f64>,
        cpc_sample: &MetricSample,
        cr_sample: &MetricSample,
        config: &SolverBoundsConfig,
    ) -> Self {
        let initial = ScenarioState {
            budget: budget.filter(|b| b.is_finite() && *b > 0.0).unwrap_or(0.0),
            cpc: cpc_sample
                .finite_value()
                .or(cpc_sample.median)
                .filter(|v| *v > 0.0)
                .unwrap_or(0.0),
            cr: cr_sample
                .finite_value()
                .or(cr_sample.median)
                .filter(|v| *v > 0.0)
                .unwrap_or(0.0),
        };
        let bounds = SolverBounds::derive(&initial, cpc_sample, cr_sample, config);
        ScenarioSolver { initial, bounds }
    }

    pub fn initial(&self) -> ScenarioState {
        self.initial
    }

    pub fn bounds(&self) -> &SolverBounds {
        &self.bounds
    }

    /// Apply one action. Invalid input is a no-op; out-of-bounds input
    /// clamps to the slider bounds.
    pub fn transition(&self, state: ScenarioState, action: ScenarioAction) -> ScenarioState {
        match action {
            ScenarioAction::Update {
                field,
                raw,
                is_percent,
            } => self.update(state, field, raw, is_percent),
            ScenarioAction::SolveForGoalViaCr { goal_cpl } => {
                if goal_cpl > 0.0 && goal_cpl.is_finite() && state.cpc > 0.0 {
                    ScenarioState {
                        cr: self.bounds.cr.clamp(state.cpc / goal_cpl),
                        ..state
                    }
                } else {
                    state
                }
            }
            ScenarioAction::SolveForGoalViaCpc { goal_cpl } => {
                if goal_cpl > 0.0 && goal_cpl.is_finite() && state.cr > 0.0 {
                    ScenarioState {
                        cpc: self.bounds.cpc.clamp(goal_cpl * state.cr),
                        ..state
                    }
                } else {
                    state
                }
            }
            ScenarioAction::Reset => self.initial,
        }
    }

    fn update(
        &self,
        state: ScenarioState,
        field: ScenarioField,
        raw: f64,
        is_percent: bool,
    ) -> ScenarioState {
        if !raw.is_finite() {
            return state;
        }
        match field {
            ScenarioField::Budget => ScenarioState {
                budget: raw.clamp(0.0, self.bounds.budget_max),
                ..state
            },
            ScenarioField::Cpc => ScenarioState {
                cpc: self.bounds.cpc.clamp(raw),
                ..state
            },
            ScenarioField::Cr => {
                let fraction = if is_percent { raw / 100.0 } else { raw };
                ScenarioState {
                    cr: self.bounds.cr.clamp(fraction),
                    ..state
                }
            }
        }
    }
}
