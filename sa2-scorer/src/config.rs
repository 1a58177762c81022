//! Tunable parameters for a scoring run.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use sa2_core::Industry;
use serde::{Deserialize, Serialize};

use crate::ScoringError;

/// Minimum resident population for a region to be scored.
pub const DEFAULT_MIN_POPULATION: u64 = 100;

/// Point-of-interest groups counted by default.
pub const DEFAULT_POI_GROUPS: [&str; 5] = ["RECREATION", "EDUCATION", "HEALTH", "COMMUNITY", "RETAIL"];

/// Parameters controlling which regions and facts take part in a run.
///
/// # Examples
/// ```
/// use sa2_scorer::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.min_population, 100);
/// assert!(config.counts_poi_group("health"));
/// assert!(!config.counts_poi_group("TRANSPORT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Regions with fewer residents are excluded before aggregation.
    pub min_population: u64,
    /// Industries contributing to business density.
    pub industries: BTreeSet<Industry>,
    /// Point-of-interest groups counted, compared case-insensitively.
    pub poi_groups: BTreeSet<String>,
    /// SA4 zones to restrict the run to. `None` keeps every zone.
    pub zones: Option<BTreeSet<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_population: DEFAULT_MIN_POPULATION,
            industries: Industry::ALL.into_iter().collect(),
            poi_groups: DEFAULT_POI_GROUPS.into_iter().map(str::to_owned).collect(),
            zones: None,
        }
    }
}

impl ScoringConfig {
    /// Check the configuration can drive a run.
    ///
    /// # Errors
    /// Returns [`ScoringError::InvalidConfig`] when an allowlist is empty or
    /// contains a blank entry.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.industries.is_empty() {
            return Err(ScoringError::InvalidConfig {
                reason: "industry allowlist must not be empty",
            });
        }
        if self.poi_groups.is_empty() {
            return Err(ScoringError::InvalidConfig {
                reason: "point-of-interest group allowlist must not be empty",
            });
        }
        if self.poi_groups.iter().any(|group| group.trim().is_empty()) {
            return Err(ScoringError::InvalidConfig {
                reason: "point-of-interest groups must not be blank",
            });
        }
        match &self.zones {
            Some(zones) if zones.is_empty() => Err(ScoringError::InvalidConfig {
                reason: "zone allowlist must not be empty when given",
            }),
            Some(zones) if zones.iter().any(|zone| zone.trim().is_empty()) => {
                Err(ScoringError::InvalidConfig {
                    reason: "zone names must not be blank",
                })
            }
            _ => Ok(()),
        }
    }

    /// Report whether businesses in `industry` count towards density.
    #[must_use]
    pub fn counts_industry(&self, industry: Industry) -> bool {
        self.industries.contains(&industry)
    }

    /// Report whether points of interest in `group` are counted.
    #[must_use]
    pub fn counts_poi_group(&self, group: &str) -> bool {
        let wanted = group.trim();
        self.poi_groups
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(wanted))
    }

    /// Report whether regions in `zone` take part in the run.
    #[must_use]
    pub fn includes_zone(&self, zone: &str) -> bool {
        let wanted = zone.trim();
        self.zones.as_ref().is_none_or(|zones| {
            zones
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(wanted))
        })
    }
}
