// Export modules for library usage
pub mod benchmark;
pub mod cache;
pub mod config;
pub mod core;
pub mod diagnosis;
pub mod errors;
pub mod scenario;
pub mod scoring;
pub mod waterfall;

// Re-export commonly used types
pub use crate::core::{
    DiagnosisInput, Direction, GoalScenario, GoalStatus, MetricKind, MetricSample, TargetRange,
    Verdict,
};

pub use crate::benchmark::resolve_range;

pub use crate::scoring::{classify, deviation_pct, MetricStatus};

pub use crate::config::{
    default_config, DiagnosisThresholds, EngineConfig, GoalPolicy, RangeDefaults,
    RecommendedCplPolicy, SolverBoundsConfig,
};

pub use crate::diagnosis::{
    advise_goal, analyze_goal, Annotation, Diagnosis, DiagnosisEngine, GoalAdvisory, GoalAnalysis,
    GoalRealism, Outcome, PerformanceBand,
};

pub use crate::scenario::{
    ScenarioAction, ScenarioDerived, ScenarioField, ScenarioSolver, ScenarioState, SolverBounds,
};

pub use crate::waterfall::{
    decompose, ChurnDriver, ChurnDriverPayload, DriverKind, Waterfall, WaterfallConfig,
    WaterfallDriver, WaterfallSegment,
};

pub use crate::cache::{Clock, ResultCache, SystemClock};

pub use crate::errors::EngineError;
