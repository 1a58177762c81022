//! Per-region raw metrics.
//!
//! Each eligible region gets four raw values: tracked businesses per 1000
//! residents, transit stops, school catchments per 1000 young residents and
//! allowlisted points of interest. Absent categories count as zero; a rate
//! that cannot be represented as a finite number is recorded as missing.
#![forbid(unsafe_code)]

use std::fmt;

use sa2_core::{
    Assignments, BusinessFact, PointOfInterestFact, RegionCode, SchoolCatchmentFact, StopFact,
};
use serde::{Deserialize, Serialize};

use crate::{EligibleRegion, ScoringConfig, ScoringError};

/// The four scored metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Tracked businesses per 1000 residents.
    #[serde(rename = "businesses_per_1000")]
    Business,
    /// Transit stops inside the region.
    #[serde(rename = "stops_count")]
    Stops,
    /// School catchments per 1000 residents aged 0 to 19.
    #[serde(rename = "catchments_per_1000_young")]
    Schools,
    /// Allowlisted points of interest inside the region.
    #[serde(rename = "poi_count")]
    Poi,
}

impl Metric {
    /// Every metric in output column order.
    pub const ALL: [Self; 4] = [Self::Business, Self::Stops, Self::Schools, Self::Poi];

    /// Column name used in the output table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "businesses_per_1000",
            Self::Stops => "stops_count",
            Self::Schools => "catchments_per_1000_young",
            Self::Poi => "poi_count",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw metric values for one region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Tracked businesses per 1000 residents.
    pub businesses_per_1000: Option<f64>,
    /// Transit stops.
    pub stops_count: u64,
    /// School catchments per 1000 young residents.
    pub catchments_per_1000_young: Option<f64>,
    /// Allowlisted points of interest.
    pub poi_count: u64,
}

impl RawMetrics {
    /// Value of `metric`, or `None` when it is missing.
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts are far below 2^53 in any realistic region"
    )]
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Business => self.businesses_per_1000,
            Metric::Stops => Some(self.stops_count as f64),
            Metric::Schools => self.catchments_per_1000_young,
            Metric::Poi => Some(self.poi_count as f64),
        }
    }

    /// Metrics with no value, in column order.
    #[must_use]
    pub fn missing(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|&metric| self.value(metric).is_none())
            .collect()
    }
}

/// Raw metrics paired with the region they describe.
#[derive(Debug, Clone, Copy)]
pub struct RegionMetrics<'r> {
    /// The scored region and its population.
    pub subject: EligibleRegion<'r>,
    /// Raw values.
    pub metrics: RawMetrics,
}

impl RegionMetrics<'_> {
    /// Code of the described region.
    #[must_use]
    pub const fn code(&self) -> &RegionCode {
        &self.subject.region.code
    }
}

/// Facts attributed to regions, grouped by kind.
#[derive(Debug, Clone, Copy)]
pub struct AttributedFacts<'a, 'f> {
    /// Business counts by region.
    pub businesses: &'a Assignments<'f, BusinessFact>,
    /// Stops by region.
    pub stops: &'a Assignments<'f, StopFact>,
    /// Catchments by region, fanned out.
    pub catchments: &'a Assignments<'f, SchoolCatchmentFact>,
    /// Points of interest by region.
    pub pois: &'a Assignments<'f, PointOfInterestFact>,
}

/// Compute raw metrics for every eligible region, preserving order.
///
/// # Errors
/// Returns [`ScoringError::ZeroPopulation`] when an eligible region has no
/// residents, and [`ScoringError::CountOverflow`] when its tracked business
/// counts do not fit in a `u64`.
pub fn aggregate<'r>(
    eligible: &[EligibleRegion<'r>],
    facts: AttributedFacts<'_, '_>,
    config: &ScoringConfig,
) -> Result<Vec<RegionMetrics<'r>>, ScoringError> {
    eligible
        .iter()
        .map(|&subject| {
            let code = &subject.region.code;
            if subject.population.total == 0 {
                return Err(ScoringError::ZeroPopulation { code: code.clone() });
            }
            let businesses = facts
                .businesses
                .facts_in(code)
                .iter()
                .filter(|fact| config.counts_industry(fact.industry))
                .try_fold(0_u64, |sum, fact| sum.checked_add(fact.count))
                .ok_or_else(|| ScoringError::CountOverflow { code: code.clone() })?;
            let catchments = count_as_u64(facts.catchments.count_in(code));
            let young = subject.population.young;
            let metrics = RawMetrics {
                businesses_per_1000: per_thousand(businesses, subject.population.total),
                stops_count: count_as_u64(facts.stops.count_in(code)),
                catchments_per_1000_young: if young == 0 {
                    Some(0.0)
                } else {
                    per_thousand(catchments, young)
                },
                poi_count: count_as_u64(
                    facts
                        .pois
                        .facts_in(code)
                        .iter()
                        .filter(|poi| config.counts_poi_group(&poi.group))
                        .count(),
                ),
            };
            Ok(RegionMetrics { subject, metrics })
        })
        .collect()
}

/// `count` per 1000 of `base`. `None` when the result is not finite.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "rates are computed in floating point from bounded counts"
)]
#[must_use]
pub fn per_thousand(count: u64, base: u64) -> Option<f64> {
    let rate = count as f64 / (base as f64 / 1000.0);
    rate.is_finite().then_some(rate)
}

fn count_as_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}
