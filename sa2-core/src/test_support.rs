//! Builders for small region sets used by unit and behaviour tests.
//!
//! Geometry helpers produce axis-aligned squares so expectations about
//! containment and overlap stay easy to reason about.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::{IncomeRecord, PopulationRecord, Region, RegionCode};

/// Build a region code, panicking on blank input.
///
/// # Panics
/// Panics when `raw` is blank.
pub fn code(raw: &str) -> RegionCode {
    RegionCode::new(raw).expect("test region codes are not blank")
}

/// Axis-aligned square with its lower-left corner at `(x, y)`.
pub fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    let ring = LineString::from(vec![
        Coord { x, y },
        Coord { x: x + size, y },
        Coord {
            x: x + size,
            y: y + size,
        },
        Coord { x, y: y + size },
        Coord { x, y },
    ]);
    MultiPolygon(vec![Polygon::new(ring, Vec::new())])
}

/// Region with a unit area and the given boundary.
pub fn region(raw_code: &str, zone: &str, geometry: MultiPolygon<f64>) -> Region {
    Region::new(code(raw_code), format!("Region {raw_code}"), zone, 1.0, geometry)
}

/// Population record for `raw_code`.
pub fn population(raw_code: &str, total: u64, young: u64) -> PopulationRecord {
    PopulationRecord::new(code(raw_code), total, young)
}

/// Income record for `raw_code`.
pub fn income(raw_code: &str, median_income: f64) -> IncomeRecord {
    IncomeRecord {
        region_code: code(raw_code),
        median_income: Some(median_income),
    }
}

/// Centre of the square produced by [`square`].
pub fn centre(x: f64, y: f64, size: f64) -> Coord<f64> {
    Coord {
        x: x + size / 2.0,
        y: y + size / 2.0,
    }
}
