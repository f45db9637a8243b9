//! Churn-risk waterfall decomposition.
//!
//! Turns a baseline churn percentage plus signed point-contribution drivers
//! into an ordered list of capped spans that reconciles (within tolerance)
//! to the model's total probability. Reconciliation appends one synthetic
//! residual driver; without it the discrepancy is surfaced to the caller as
//! a data-quality signal, never silently corrected.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// How a driver moves the churn probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// The account team can move this lever.
    Controllable,
    /// Reduces churn probability.
    Protective,
    /// A property of the account, not of its management.
    Structural,
    /// Synthetic reconciliation driver.
    Residual,
}

/// One named contribution, in signed percentage points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterfallDriver {
    pub label: String,
    /// Signed percentage points (additive probability units).
    pub pp: f64,
    pub kind: DriverKind,
    #[serde(default)]
    pub explanation: String,
    /// Optional hazard-lift multiplier behind the contribution.
    pub lift_ratio: Option<f64>,
}

impl WaterfallDriver {
    pub fn new(label: impl Into<String>, pp: f64, kind: DriverKind) -> Self {
        WaterfallDriver {
            label: label.into(),
            pp,
            kind,
            explanation: String::new(),
            lift_ratio: None,
        }
    }
}

/// Decomposition request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterfallConfig {
    /// Final churn percentage the decomposition should account for.
    pub total_pct: f64,
    /// Cohort baseline, in percentage points.
    pub baseline_pp: f64,
    pub drivers: Vec<WaterfallDriver>,
    /// Cumulative values are capped to `[0, cap_to]`.
    #[serde(default = "default_cap_to")]
    pub cap_to: f64,
    pub reconcile: bool,
}

fn default_cap_to() -> f64 {
    100.0
}

/// One rendered bar: the driver plus the cumulative span it covers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaterfallSegment {
    pub label: String,
    pub pp: f64,
    pub kind: DriverKind,
    /// `[min, max]` of the cumulative values before and after this driver.
    pub span: (f64, f64),
    pub explanation: String,
    pub lift_ratio: Option<f64>,
}

/// Ordered, reconciled decomposition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Waterfall {
    pub baseline_pp: f64,
    pub total_pct: f64,
    /// Final cumulative value after all drivers (and the residual, when
    /// reconciliation ran).
    pub cumulative: f64,
    pub segments: Vector<WaterfallSegment>,
    /// Points carried by the synthetic residual driver, when one was added.
    pub residual_pp: Option<f64>,
    /// Gap left unexplained when `reconcile` was off and the drivers do not
    /// sum to the total. Callers must surface this, not hide it.
    pub unexplained_pp: Option<f64>,
    /// Set when the displayed total is capped below the model's total.
    pub clamp_note: Option<String>,
}

/// Decompose a churn total into baseline plus ordered driver spans.
pub fn decompose(config: &WaterfallConfig) -> Waterfall {
    let cap = |v: f64| v.clamp(0.0, config.cap_to);

    let mut cumulative = cap(config.baseline_pp);
    let mut segments = Vector::new();

    for driver in &config.drivers {
        let next = cap(cumulative + driver.pp);
        // Negative points always render as protective, whatever the caller
        // tagged them as.
        let kind = if driver.pp < 0.0 {
            DriverKind::Protective
        } else {
            driver.kind
        };
        segments.push_back(WaterfallSegment {
            label: driver.label.clone(),
            pp: driver.pp,
            kind,
            span: (cumulative.min(next), cumulative.max(next)),
            explanation: driver.explanation.clone(),
            lift_ratio: driver.lift_ratio,
        });
        cumulative = next;
    }

    let gap = (config.total_pct - cumulative).round();
    let mut residual_pp = None;
    let mut unexplained_pp = None;

    if gap.abs() >= 1.0 {
        if config.reconcile {
            let next = cap(cumulative + gap);
            segments.push_back(WaterfallSegment {
                label: "Unattributed".to_string(),
                pp: gap,
                kind: DriverKind::Residual,
                span: (cumulative.min(next), cumulative.max(next)),
                explanation: "Residual between attributed drivers and the model total".to_string(),
                lift_ratio: None,
            });
            cumulative = next;
            residual_pp = Some(gap);
        } else {
            unexplained_pp = Some(config.total_pct - cumulative);
        }
    }

    let clamp_note = (config.total_pct > config.cap_to).then(|| {
        format!(
            "displayed churn capped at {:.0}% (model total {:.1}%)",
            config.cap_to, config.total_pct
        )
    });

    Waterfall {
        baseline_pp: cap(config.baseline_pp),
        total_pct: config.total_pct,
        cumulative,
        segments,
        residual_pp,
        unexplained_pp,
        clamp_note,
    }
}

/// Externally supplied churn model output, as produced by the risk scoring
/// pipeline.
#[derive(Clone, Debug, Deserialize)]
pub struct ChurnDriverPayload {
    #[serde(alias = "baseline_pp")]
    pub baseline: f64,
    #[serde(default)]
    pub drivers: Vec<ChurnDriver>,
    /// Final churn probability as a fraction in `[0, 1]`.
    pub churn_prob_total: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChurnDriver {
    #[serde(alias = "label")]
    pub name: String,
    #[serde(alias = "impact")]
    pub points: f64,
    #[serde(default)]
    pub is_controllable: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, alias = "lift_x")]
    pub lift_ratio: Option<f64>,
}

impl ChurnDriverPayload {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::PayloadParse(e.to_string()))
    }

    /// Convert to a decomposition request. The probability becomes a
    /// percentage rounded to one decimal; drivers whose points round to
    /// zero are dropped.
    pub fn into_waterfall_config(self, reconcile: bool) -> WaterfallConfig {
        let total_pct = (self.churn_prob_total * 1000.0).round() / 10.0;
        let drivers = self
            .drivers
            .into_iter()
            .filter(|d| d.points.is_finite() && d.points.round() != 0.0)
            .map(|d| {
                let kind = if d.points < 0.0 {
                    DriverKind::Protective
                } else if d.is_controllable {
                    DriverKind::Controllable
                } else {
                    DriverKind::Structural
                };
                WaterfallDriver {
                    label: d.name,
                    pp: d.points,
                    kind,
                    explanation: d.explanation,
                    lift_ratio: d.lift_ratio,
                }
            })
            .collect();

        WaterfallConfig {
            total_pct,
            baseline_pp: self.baseline,
            drivers,
            cap_to: default_cap_to(),
            reconcile,
        }
    }
}
