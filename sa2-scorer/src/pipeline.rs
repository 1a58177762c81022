//! End-to-end scoring run.
//!
//! Stages run in a fixed order: zone restriction, fact attribution,
//! population filter, aggregation, normalisation, combination and ranking.
//! Normalisation is a barrier; it needs every eligible region's raw metrics
//! before any z-score can be computed.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use log::{debug, info, warn};
use sa2_core::{
    AssignmentSummary, BusinessFact, IncomeRecord, Logistic, PointOfInterestFact,
    PopulationRecord, Region, RegionCode, RegionIndex, SchoolCatchmentFact, ScoreCombiner,
    StopFact, ZScores, assign_catchments, assign_points, attribute_businesses,
};
use serde::Serialize;

use crate::{
    AttributedFacts, Metric, MetricStats, RegionMetrics, ScoreRow, ScoreTable, ScoringConfig,
    ScoringError, ZoneSummary, aggregate, ensure_unique_regions, filter_population,
    income_correlation, index_population, normalise, partition_zones, zone_summaries,
};

/// Everything a run consumes.
#[derive(Debug, Clone, Default)]
pub struct ScoringInputs {
    /// Region boundaries.
    pub regions: Vec<Region>,
    /// One population record per region.
    pub population: Vec<PopulationRecord>,
    /// Business counts attributed by region code.
    pub businesses: Vec<BusinessFact>,
    /// Transit stops.
    pub stops: Vec<StopFact>,
    /// School catchments.
    pub catchments: Vec<SchoolCatchmentFact>,
    /// Points of interest.
    pub pois: Vec<PointOfInterestFact>,
    /// Optional income context.
    pub income: Vec<IncomeRecord>,
}

/// A region left out of the ranking because a metric was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteRegion {
    /// Region code.
    pub region_code: RegionCode,
    /// Metrics with no value.
    pub missing: Vec<Metric>,
}

/// Recoverable conditions observed during a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoringDiagnostics {
    /// Attribution counts per fact kind.
    pub assignments: Vec<AssignmentSummary>,
    /// Regions excluded by the zone allowlist.
    pub out_of_zone: Vec<RegionCode>,
    /// Regions under the population threshold.
    pub below_threshold: Vec<RegionCode>,
    /// Regions without a population record.
    pub missing_population: Vec<RegionCode>,
    /// Statistics used for each metric.
    pub metric_stats: Vec<MetricStats>,
    /// Metrics whose z-scores were forced to zero.
    pub degenerate_metrics: Vec<Metric>,
    /// Eligible regions left unranked.
    pub incomplete: Vec<IncompleteRegion>,
}

/// Ranked table plus the diagnostics gathered while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringReport {
    /// Ranked regions.
    pub table: ScoreTable,
    /// Recoverable conditions.
    pub diagnostics: ScoringDiagnostics,
}

impl ScoringReport {
    /// Score distribution per zone.
    #[must_use]
    pub fn zone_summaries(&self) -> Vec<ZoneSummary> {
        zone_summaries(&self.table)
    }

    /// Correlation between score and median income, when defined.
    #[must_use]
    pub fn income_correlation(&self) -> Option<f64> {
        income_correlation(&self.table)
    }
}

/// Score regions with the logistic combiner.
///
/// # Errors
/// See [`score_regions_with`].
pub fn score_regions(
    inputs: ScoringInputs,
    config: &ScoringConfig,
) -> Result<ScoringReport, ScoringError> {
    score_regions_with(inputs, config, &Logistic)
}

/// Score regions with a caller-supplied combiner.
///
/// # Errors
/// Returns [`ScoringError`] when the configuration is invalid, when region
/// codes or population records repeat, when an eligible region has zero
/// population, or when its business counts overflow.
pub fn score_regions_with(
    inputs: ScoringInputs,
    config: &ScoringConfig,
    combiner: &dyn ScoreCombiner,
) -> Result<ScoringReport, ScoringError> {
    config.validate()?;
    let ScoringInputs {
        regions,
        population,
        businesses,
        stops,
        catchments,
        pois,
        income,
    } = inputs;
    ensure_unique_regions(&regions)?;
    let population_index = index_population(&population)?;
    let (working_set, out_of_zone) = partition_zones(regions, config);

    let index = RegionIndex::new(&working_set);
    let business_links = attribute_businesses(&index, &businesses);
    let stop_links = assign_points(&index, &stops);
    let catchment_links = assign_catchments(&index, &catchments);
    let poi_links = assign_points(&index, &pois);

    let eligibility = filter_population(&working_set, &population_index, config.min_population);
    let facts = AttributedFacts {
        businesses: &business_links,
        stops: &stop_links,
        catchments: &catchment_links,
        pois: &poi_links,
    };
    let metrics = aggregate(&eligibility.eligible, facts, config)?;
    let normalisation = normalise(&metrics);
    let incomes = index_income(&income);

    let mut rows = Vec::with_capacity(metrics.len());
    let mut incomplete = Vec::new();
    for (region, scores) in metrics.iter().zip(&normalisation.scores) {
        let Some(z) = scores else {
            incomplete.push(IncompleteRegion {
                region_code: region.code().clone(),
                missing: region.metrics.missing(),
            });
            continue;
        };
        let median_income = incomes.get(region.code()).copied().flatten();
        rows.push(build_row(region, z, median_income, combiner));
    }
    if !incomplete.is_empty() {
        warn!(
            "{} eligible regions have incomplete metrics and were not ranked",
            incomplete.len()
        );
    }

    let table = ScoreTable::new(rows);
    info!("Ranked {} regions", table.len());
    if let Some(correlation) = income_correlation(&table) {
        debug!("Score and median income correlate at {correlation:.3}");
    }

    let diagnostics = ScoringDiagnostics {
        assignments: vec![
            business_links.summary(),
            stop_links.summary(),
            catchment_links.summary(),
            poi_links.summary(),
        ],
        out_of_zone,
        below_threshold: eligibility.below_threshold,
        missing_population: eligibility.missing_population,
        degenerate_metrics: normalisation.degenerate_metrics(),
        metric_stats: normalisation.stats,
        incomplete,
    };
    Ok(ScoringReport { table, diagnostics })
}

fn index_income(records: &[IncomeRecord]) -> BTreeMap<&RegionCode, Option<f64>> {
    let mut index = BTreeMap::new();
    for record in records {
        if index.contains_key(&record.region_code) {
            warn!(
                "Ignoring repeated income record for region {}",
                record.region_code
            );
            continue;
        }
        index.insert(&record.region_code, record.median_income);
    }
    index
}

fn build_row(
    region: &RegionMetrics<'_>,
    z: &ZScores,
    median_income: Option<f64>,
    combiner: &dyn ScoreCombiner,
) -> ScoreRow {
    let subject = region.subject;
    let metrics = region.metrics;
    ScoreRow {
        region_code: subject.region.code.clone(),
        region_name: subject.region.name.clone(),
        zone_name: subject.region.zone.clone(),
        area_sqkm: subject.region.area_sqkm,
        total_population: subject.population.total,
        young_population: subject.population.young,
        median_income,
        businesses_per_1000: metrics.businesses_per_1000.unwrap_or_default(),
        stops_count: metrics.stops_count,
        catchments_per_1000_young: metrics.catchments_per_1000_young.unwrap_or_default(),
        poi_count: metrics.poi_count,
        z_business: z.business,
        z_stops: z.stops,
        z_schools: z.schools,
        z_poi: z.poi,
        score: combiner.sanitise(combiner.combine(z)),
    }
}
