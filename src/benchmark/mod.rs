//! Target-range resolution from peer percentile statistics.
//!
//! Benchmark data arrives in varying states of completeness: sometimes the
//! caller has already computed a range, sometimes only percentiles, sometimes
//! nothing but the observed value. `resolve_range` always produces a usable
//! `[low, high]` band.

use crate::config::RangeDefaults;
use crate::core::{MetricKind, MetricSample, TargetRange};

/// Derive a target range for a metric from whatever statistics are present.
///
/// Resolution order:
/// 1. A caller-precomputed `target_range` wins (normalized).
/// 2. With both `p25` and `p75`, the interquartile band is used directly.
/// 3. Otherwise a symmetric band is synthesized around the best available
///    center: the median, then the observed value, then a per-metric default.
pub fn resolve_range(
    sample: &MetricSample,
    kind: MetricKind,
    defaults: &RangeDefaults,
) -> TargetRange {
    if let Some(range) = sample.target_range {
        return range.normalized();
    }

    if let (Some(p25), Some(p75)) = (sample.p25, sample.p75) {
        return TargetRange::new(p25.max(0.0), p75.max(p25));
    }

    let center = sample
        .median
        .filter(|m| m.is_finite())
        .or(sample.finite_value())
        .unwrap_or_else(|| default_center(kind, defaults));

    let span = (center * defaults.synthetic_span_ratio).max(1e-5);
    TargetRange::new((center - span).max(0.0), center + span)
}

fn default_center(kind: MetricKind, defaults: &RangeDefaults) -> f64 {
    if kind.is_percent() {
        defaults.percent_center
    } else if kind == MetricKind::CostPerClick {
        defaults.cpc_center
    } else {
        defaults.cpl_center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> RangeDefaults {
        RangeDefaults::default()
    }

    #[test]
    fn precomputed_range_wins_over_percentiles() {
        let sample = MetricSample {
            target_range: Some(TargetRange::new(10.0, 20.0)),
            p25: Some(1.0),
            p75: Some(2.0),
            ..Default::default()
        };
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert_eq!(range, TargetRange::new(10.0, 20.0));
    }

    #[test]
    fn inverted_precomputed_range_is_normalized() {
        let sample = MetricSample {
            target_range: Some(TargetRange { low: 20.0, high: 10.0 }),
            ..Default::default()
        };
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert!(range.low <= range.high);
        assert_eq!(range.low, 10.0);
    }

    #[test]
    fn interquartile_band_used_when_present() {
        let sample = MetricSample::with_percentiles(Some(125.0), 60.0, 45.0, 90.0);
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert_eq!(range, TargetRange::new(45.0, 90.0));
    }

    #[test]
    fn inverted_percentiles_still_yield_valid_range() {
        let sample = MetricSample::with_percentiles(None, 60.0, 90.0, 45.0);
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert!(range.low <= range.high);
    }

    #[test]
    fn synthetic_band_around_median() {
        let sample = MetricSample {
            median: Some(100.0),
            ..Default::default()
        };
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert_eq!(range, TargetRange::new(85.0, 115.0));
    }

    #[test]
    fn value_is_center_when_median_missing() {
        let sample = MetricSample::of(40.0);
        let range = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert_eq!(range, TargetRange::new(34.0, 46.0));
    }

    #[test]
    fn empty_sample_falls_back_to_metric_default() {
        let sample = MetricSample::default();
        let cpl = resolve_range(&sample, MetricKind::CostPerLead, &defaults());
        assert_eq!(cpl.midpoint(), 50.0);

        let cpc = resolve_range(&sample, MetricKind::CostPerClick, &defaults());
        assert_eq!(cpc.midpoint(), 3.0);

        let cr = resolve_range(&sample, MetricKind::ConversionRate, &defaults());
        assert!((cr.midpoint() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn zero_center_still_produces_nonempty_band() {
        let sample = MetricSample {
            median: Some(0.0),
            ..Default::default()
        };
        let range = resolve_range(&sample, MetricKind::ConversionRate, &defaults());
        assert!(range.high > range.low);
    }
}
