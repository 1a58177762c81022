//! Standardise raw metrics across the eligible population.
//!
//! Each metric is normalised independently using the sample mean and sample
//! standard deviation (`n - 1` denominator) of the values present. A metric
//! whose values are all equal, or which has fewer than two values, is
//! degenerate: every region receives a z-score of zero for it.
#![forbid(unsafe_code)]

use log::warn;
use sa2_core::ZScores;
use serde::{Deserialize, Serialize};

use crate::{Metric, RegionMetrics};

/// Summary statistics for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    /// Metric described.
    pub metric: Metric,
    /// Number of values present.
    pub count: usize,
    /// Sample mean, or zero when no values are present.
    pub mean: f64,
    /// Sample standard deviation, forced to zero when degenerate.
    pub std_dev: f64,
}

impl MetricStats {
    /// Compute statistics over `values`.
    ///
    /// # Examples
    /// ```
    /// use sa2_scorer::{Metric, MetricStats};
    ///
    /// let stats = MetricStats::from_values(Metric::Stops, &[2.0, 4.0, 6.0]);
    /// assert!((stats.mean - 4.0).abs() < 1e-12);
    /// assert!((stats.std_dev - 2.0).abs() < 1e-12);
    /// assert!(!stats.is_degenerate());
    /// ```
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "sample statistics are floating-point reductions"
    )]
    #[must_use]
    pub fn from_values(metric: Metric, values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                metric,
                count,
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &value| {
                (lo.min(value), hi.max(value))
            });
        let std_dev = if count < 2 || max <= min {
            0.0
        } else {
            let squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
            let spread = (squares / (n - 1.0)).sqrt();
            if spread.is_finite() { spread } else { 0.0 }
        };
        Self {
            metric,
            count,
            mean,
            std_dev,
        }
    }

    /// Report whether the metric cannot discriminate between regions.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.std_dev <= 0.0
    }

    /// Standardise `value` against these statistics.
    #[expect(
        clippy::float_arithmetic,
        reason = "z-scores are floating-point by definition"
    )]
    #[must_use]
    pub const fn z_score(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// Statistics and per-region z-scores for a batch of regions.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalisation {
    /// One entry per metric, in column order.
    pub stats: Vec<MetricStats>,
    /// Z-scores aligned with the input regions. `None` marks a region with
    /// at least one missing metric.
    pub scores: Vec<Option<ZScores>>,
}

impl Normalisation {
    /// Metrics that could not discriminate between regions.
    #[must_use]
    pub fn degenerate_metrics(&self) -> Vec<Metric> {
        self.stats
            .iter()
            .filter(|stats| stats.is_degenerate())
            .map(|stats| stats.metric)
            .collect()
    }
}

/// Normalise every metric across `regions`.
///
/// Values missing for a region are left out of that metric's statistics
/// while the region's other values still contribute.
#[must_use]
pub fn normalise(regions: &[RegionMetrics<'_>]) -> Normalisation {
    let stats: Vec<MetricStats> = Metric::ALL
        .into_iter()
        .map(|metric| {
            let values: Vec<f64> = regions
                .iter()
                .filter_map(|region| region.metrics.value(metric))
                .collect();
            MetricStats::from_values(metric, &values)
        })
        .collect();
    for degenerate in stats.iter().filter(|stats| stats.is_degenerate()) {
        warn!(
            "Metric {} has no spread across {} values; its z-scores are zero",
            degenerate.metric, degenerate.count
        );
    }
    let scores = regions
        .iter()
        .map(|region| standardise(region, &stats))
        .collect();
    Normalisation { stats, scores }
}

fn standardise(region: &RegionMetrics<'_>, stats: &[MetricStats]) -> Option<ZScores> {
    let z = |metric: Metric| -> Option<f64> {
        let value = region.metrics.value(metric)?;
        let metric_stats = stats.iter().find(|candidate| candidate.metric == metric)?;
        Some(metric_stats.z_score(value))
    };
    Some(ZScores {
        business: z(Metric::Business)?,
        stops: z(Metric::Stops)?,
        schools: z(Metric::Schools)?,
        poi: z(Metric::Poi)?,
    })
}
