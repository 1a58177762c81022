//! Order scored regions into the published table.
#![forbid(unsafe_code)]

use std::cmp::Ordering;

use sa2_core::RegionCode;
use serde::{Deserialize, Serialize};

/// One ranked region with its raw metrics, z-scores and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// SA2 code.
    pub region_code: RegionCode,
    /// SA2 name.
    pub region_name: String,
    /// Parent SA4 zone.
    pub zone_name: String,
    /// Land area in square kilometres.
    pub area_sqkm: f64,
    /// Resident population.
    pub total_population: u64,
    /// Residents aged 0 to 19.
    pub young_population: u64,
    /// Median personal income, when known.
    pub median_income: Option<f64>,
    /// Tracked businesses per 1000 residents.
    pub businesses_per_1000: f64,
    /// Transit stops.
    pub stops_count: u64,
    /// School catchments per 1000 young residents.
    pub catchments_per_1000_young: f64,
    /// Allowlisted points of interest.
    pub poi_count: u64,
    /// Standardised business density.
    pub z_business: f64,
    /// Standardised stop count.
    pub z_stops: f64,
    /// Standardised catchment density.
    pub z_schools: f64,
    /// Standardised point-of-interest count.
    pub z_poi: f64,
    /// Combined score in `(0, 1)`.
    pub score: f64,
}

/// Ranking order: score descending, then region code ascending.
#[must_use]
pub fn ranking_order(a: &ScoreRow, b: &ScoreRow) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.region_code.cmp(&b.region_code))
}

/// Rows in ranking order. Serialises as a plain sequence.
///
/// # Examples
/// ```
/// use sa2_scorer::ScoreTable;
///
/// let table = ScoreTable::new(Vec::new());
/// assert!(table.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    rows: Vec<ScoreRow>,
}

impl ScoreTable {
    /// Rank `rows` into a table.
    #[must_use]
    pub fn new(mut rows: Vec<ScoreRow>) -> Self {
        rows.sort_by(ranking_order);
        Self { rows }
    }

    /// Rows in ranking order.
    #[must_use]
    pub const fn rows(&self) -> &[ScoreRow] {
        self.rows.as_slice()
    }

    /// Number of ranked regions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether no region was ranked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows in ranking order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRow> {
        self.rows.iter()
    }

    /// Look up the row for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&ScoreRow> {
        self.rows.iter().find(|row| row.region_code.as_str() == code)
    }

    /// One-based rank of `code`.
    #[must_use]
    pub fn rank_of(&self, code: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.region_code.as_str() == code)
            .map(|index| index + 1)
    }

    /// Consume the table and return its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<ScoreRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ScoreTable {
    type Item = &'a ScoreRow;
    type IntoIter = std::slice::Iter<'a, ScoreRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
