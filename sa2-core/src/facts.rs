//! Facts attributed to regions: population, income, businesses, stops,
//! school catchments and points of interest.
//!
//! Point-like facts carry an optional WGS84 coordinate (`x = longitude`,
//! `y = latitude`); `None` marks a geometry that was absent or could not be
//! parsed upstream. Catchments carry an optional polygon for the same reason.

use geo::{Coord, MultiPolygon};
use thiserror::Error;

use crate::{Industry, RegionCode};

/// Bracket subtotals whose sum does not fit in a `u64`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("bracket subtotals for {subject} overflow a 64-bit count")]
pub struct BracketOverflow {
    /// Region code, or the industry label for uncoded business counts.
    pub subject: String,
}

fn checked_total<'a>(
    counts: impl IntoIterator<Item = &'a u64>,
    subject: impl FnOnce() -> String,
) -> Result<u64, BracketOverflow> {
    counts
        .into_iter()
        .try_fold(0_u64, |sum, &count| sum.checked_add(count))
        .ok_or_else(|| BracketOverflow { subject: subject() })
}

/// Resident counts for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRecord {
    /// Region the counts belong to.
    pub region_code: RegionCode,
    /// Total resident population.
    pub total: u64,
    /// Residents aged 0 to 19.
    pub young: u64,
}

impl PopulationRecord {
    /// Number of leading five-year brackets covering ages 0 to 19.
    pub const YOUNG_BRACKETS: usize = 4;

    /// Construct a record from pre-computed totals.
    pub const fn new(region_code: RegionCode, total: u64, young: u64) -> Self {
        Self {
            region_code,
            total,
            young,
        }
    }

    /// Build a record from five-year age bracket subtotals, youngest first.
    ///
    /// The first [`Self::YOUNG_BRACKETS`] entries (0-4, 5-9, 10-14, 15-19)
    /// form the young population; every bracket contributes to the total.
    ///
    /// # Examples
    /// ```
    /// use sa2_core::{PopulationRecord, RegionCode};
    ///
    /// let code = RegionCode::new("A").unwrap();
    /// let record = PopulationRecord::from_age_brackets(code, &[10, 10, 10, 10, 60]).unwrap();
    /// assert_eq!(record.young, 40);
    /// assert_eq!(record.total, 100);
    /// ```
    ///
    /// # Errors
    /// Returns [`BracketOverflow`] when the subtotals do not fit in a `u64`.
    pub fn from_age_brackets(
        region_code: RegionCode,
        brackets: &[u64],
    ) -> Result<Self, BracketOverflow> {
        let young = checked_total(brackets.iter().take(Self::YOUNG_BRACKETS), || {
            region_code.to_string()
        })?;
        let total = checked_total(brackets, || region_code.to_string())?;
        Ok(Self::new(region_code, total, young))
    }
}

/// Median income for one region. Carried through to the output only.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    /// Region the figure belongs to.
    pub region_code: RegionCode,
    /// Median personal income, when published.
    pub median_income: Option<f64>,
}

/// Business counts for one industry in one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessFact {
    /// Region the businesses are registered in, if known.
    pub region_code: Option<RegionCode>,
    /// Industry division.
    pub industry: Industry,
    /// Number of businesses.
    pub count: u64,
}

impl BusinessFact {
    /// Construct a fact from a single count.
    pub const fn new(region_code: Option<RegionCode>, industry: Industry, count: u64) -> Self {
        Self {
            region_code,
            industry,
            count,
        }
    }

    /// Collapse a revenue-bracket breakdown into a single count.
    ///
    /// # Errors
    /// Returns [`BracketOverflow`] when the brackets do not fit in a `u64`.
    pub fn from_revenue_brackets(
        region_code: Option<RegionCode>,
        industry: Industry,
        brackets: &[u64],
    ) -> Result<Self, BracketOverflow> {
        let count = checked_total(brackets, || {
            region_code
                .as_ref()
                .map_or_else(|| industry.to_string(), ToString::to_string)
        })?;
        Ok(Self::new(region_code, industry, count))
    }
}

/// A public transport stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopFact {
    /// Stop identifier from the timetable feed.
    pub id: String,
    /// Stop position.
    pub location: Option<Coord<f64>>,
}

impl StopFact {
    /// Construct a stop from its identifier and position.
    pub fn new(id: impl Into<String>, location: Option<Coord<f64>>) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// A school catchment boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolCatchmentFact {
    /// Name of the school.
    pub school_name: String,
    /// Catchment level, such as primary or secondary.
    pub school_type: String,
    /// Catchment boundary.
    pub geometry: Option<MultiPolygon<f64>>,
}

impl SchoolCatchmentFact {
    /// Construct a catchment.
    pub fn new(
        school_name: impl Into<String>,
        school_type: impl Into<String>,
        geometry: Option<MultiPolygon<f64>>,
    ) -> Self {
        Self {
            school_name: school_name.into(),
            school_type: school_type.into(),
            geometry,
        }
    }
}

/// A categorised point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterestFact {
    /// Display name.
    pub name: String,
    /// Broad group, such as `HEALTH` or `RETAIL`.
    pub group: String,
    /// Finer-grained type within the group.
    pub kind: String,
    /// Position.
    pub location: Option<Coord<f64>>,
}

impl PointOfInterestFact {
    /// Construct a point of interest.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        kind: impl Into<String>,
        location: Option<Coord<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            kind: kind.into(),
            location,
        }
    }
}
