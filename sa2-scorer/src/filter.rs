//! Decide which regions are scored.
//!
//! Two passes shape the working set: the optional zone allowlist removes
//! regions from the run entirely, then the population threshold splits the
//! remainder into eligible and ineligible regions.
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use sa2_core::{PopulationRecord, Region, RegionCode};

use crate::{ScoringConfig, ScoringError};

/// A region that passed the population threshold.
#[derive(Debug, Clone, Copy)]
pub struct EligibleRegion<'r> {
    /// The region itself.
    pub region: &'r Region,
    /// Its population record.
    pub population: &'r PopulationRecord,
}

/// Outcome of the population filter.
#[derive(Debug, Clone, Default)]
pub struct Eligibility<'r> {
    /// Regions at or above the threshold, in input order.
    pub eligible: Vec<EligibleRegion<'r>>,
    /// Regions below the threshold.
    pub below_threshold: Vec<RegionCode>,
    /// Regions with no population record.
    pub missing_population: Vec<RegionCode>,
}

/// Reject inputs that repeat a region code.
///
/// # Errors
/// Returns [`ScoringError::DuplicateRegion`] for the first repeated code.
pub fn ensure_unique_regions(regions: &[Region]) -> Result<(), ScoringError> {
    let mut seen = BTreeSet::new();
    for region in regions {
        if !seen.insert(&region.code) {
            return Err(ScoringError::DuplicateRegion {
                code: region.code.clone(),
            });
        }
    }
    Ok(())
}

/// Split `regions` into those inside the configured zones and the rest.
#[must_use]
pub fn partition_zones(regions: Vec<Region>, config: &ScoringConfig) -> (Vec<Region>, Vec<RegionCode>) {
    let (kept, dropped): (Vec<Region>, Vec<Region>) = regions
        .into_iter()
        .partition(|region| config.includes_zone(&region.zone));
    if !dropped.is_empty() {
        info!(
            "Zone allowlist kept {} regions and excluded {}",
            kept.len(),
            dropped.len()
        );
    }
    (kept, dropped.into_iter().map(|region| region.code).collect())
}

/// Index population records by region code.
///
/// # Errors
/// Returns [`ScoringError::DuplicatePopulationRecord`] when a code repeats.
pub fn index_population(
    records: &[PopulationRecord],
) -> Result<BTreeMap<&RegionCode, &PopulationRecord>, ScoringError> {
    let mut index = BTreeMap::new();
    for record in records {
        if index.insert(&record.region_code, record).is_some() {
            return Err(ScoringError::DuplicatePopulationRecord {
                code: record.region_code.clone(),
            });
        }
    }
    Ok(index)
}

/// Apply the population threshold to `regions`.
///
/// A region is eligible when its total population is at least
/// `min_population`.
#[must_use]
pub fn filter_population<'r>(
    regions: &'r [Region],
    population: &BTreeMap<&RegionCode, &'r PopulationRecord>,
    min_population: u64,
) -> Eligibility<'r> {
    let mut outcome = Eligibility::default();
    for region in regions {
        match population.get(&region.code).copied() {
            Some(record) if record.total >= min_population => {
                outcome.eligible.push(EligibleRegion {
                    region,
                    population: record,
                });
            }
            Some(_) => outcome.below_threshold.push(region.code.clone()),
            None => outcome.missing_population.push(region.code.clone()),
        }
    }
    info!(
        "{} of {} regions meet the population threshold of {min_population}",
        outcome.eligible.len(),
        regions.len()
    );
    if !outcome.missing_population.is_empty() {
        warn!(
            "{} regions have no population record and were skipped",
            outcome.missing_population.len()
        );
    }
    outcome
}
