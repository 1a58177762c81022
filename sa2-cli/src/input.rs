//! Decode the JSON input bundle into scoring inputs.
//!
//! The bundle carries already-cleaned tables. Geometries are GeoJSON values;
//! anything that does not decode to a polygon (or a point with both
//! coordinates) becomes an absent geometry so the assigner can count it.

use std::io::BufReader;

use camino::Utf8Path;
use geo::{Coord, MultiPolygon};
use geojson::GeoJson;
use log::warn;
use sa2_core::{
    BusinessFact, IncomeRecord, Industry, PointOfInterestFact, PopulationRecord, Region,
    RegionCode, SchoolCatchmentFact, StopFact,
};
use sa2_fs::open_utf8_file;
use sa2_scorer::ScoringInputs;
use serde::Deserialize;
use serde_json::Value;

use crate::CliError;

/// Raw bundle as stored on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct InputBundle {
    pub(crate) regions: Vec<RegionInput>,
    pub(crate) population: Vec<PopulationInput>,
    pub(crate) businesses: Vec<BusinessInput>,
    pub(crate) stops: Vec<StopInput>,
    pub(crate) catchments: Vec<CatchmentInput>,
    pub(crate) pois: Vec<PoiInput>,
    pub(crate) income: Vec<IncomeInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegionInput {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) zone: String,
    pub(crate) area_sqkm: f64,
    pub(crate) geometry: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PopulationInput {
    pub(crate) region_code: String,
    pub(crate) total: u64,
    pub(crate) young: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BusinessInput {
    pub(crate) region_code: Option<String>,
    pub(crate) industry: String,
    pub(crate) count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StopInput {
    pub(crate) id: String,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CatchmentInput {
    pub(crate) school_name: String,
    pub(crate) school_type: String,
    pub(crate) geometry: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PoiInput {
    pub(crate) name: String,
    pub(crate) group: String,
    pub(crate) kind: String,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IncomeInput {
    pub(crate) region_code: String,
    pub(crate) median_income: Option<f64>,
}

/// Records dropped while decoding, by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeSummary {
    pub(crate) blank_region_codes: usize,
    pub(crate) unusable_region_geometry: usize,
    pub(crate) unknown_industries: usize,
    pub(crate) orphan_records: usize,
}

impl DecodeSummary {
    fn log(&self) {
        if self.blank_region_codes > 0 || self.unusable_region_geometry > 0 {
            warn!(
                "Dropped {} regions with blank codes and {} with unusable boundaries",
                self.blank_region_codes, self.unusable_region_geometry
            );
        }
        if self.unknown_industries > 0 {
            warn!(
                "Skipped {} business records with untracked industries",
                self.unknown_industries
            );
        }
        if self.orphan_records > 0 {
            warn!(
                "Skipped {} population or income records with blank region codes",
                self.orphan_records
            );
        }
    }
}

/// Read and decode the bundle at `path`.
pub(crate) fn load_bundle(path: &Utf8Path) -> Result<InputBundle, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenBundle {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseBundle {
        path: path.to_path_buf(),
        source,
    })
}

impl InputBundle {
    /// Convert the bundle into typed inputs, counting what was dropped.
    pub(crate) fn into_inputs(self) -> (ScoringInputs, DecodeSummary) {
        let mut summary = DecodeSummary::default();
        let regions = self
            .regions
            .into_iter()
            .filter_map(|input| {
                let Ok(code) = RegionCode::new(input.code) else {
                    summary.blank_region_codes += 1;
                    return None;
                };
                let Some(geometry) = input.geometry.and_then(decode_polygon) else {
                    summary.unusable_region_geometry += 1;
                    return None;
                };
                Some(Region::new(code, input.name, input.zone, input.area_sqkm, geometry))
            })
            .collect();
        let population = self
            .population
            .into_iter()
            .filter_map(|input| {
                let code = RegionCode::new(input.region_code).ok();
                if code.is_none() {
                    summary.orphan_records += 1;
                }
                code.map(|region_code| PopulationRecord::new(region_code, input.total, input.young))
            })
            .collect();
        let businesses = self
            .businesses
            .into_iter()
            .filter_map(|input| {
                let Ok(industry) = input.industry.parse::<Industry>() else {
                    summary.unknown_industries += 1;
                    return None;
                };
                let region_code = input.region_code.and_then(|raw| RegionCode::new(raw).ok());
                Some(BusinessFact::new(region_code, industry, input.count))
            })
            .collect();
        let stops = self
            .stops
            .into_iter()
            .map(|input| StopFact::new(input.id, coordinate(input.lat, input.lon)))
            .collect();
        let catchments = self
            .catchments
            .into_iter()
            .map(|input| {
                SchoolCatchmentFact::new(
                    input.school_name,
                    input.school_type,
                    input.geometry.and_then(decode_polygon),
                )
            })
            .collect();
        let pois = self
            .pois
            .into_iter()
            .map(|input| {
                PointOfInterestFact::new(
                    input.name,
                    input.group,
                    input.kind,
                    coordinate(input.lat, input.lon),
                )
            })
            .collect();
        let income = self
            .income
            .into_iter()
            .filter_map(|input| {
                let code = RegionCode::new(input.region_code).ok();
                if code.is_none() {
                    summary.orphan_records += 1;
                }
                code.map(|region_code| IncomeRecord {
                    region_code,
                    median_income: input.median_income,
                })
            })
            .collect();
        summary.log();
        let inputs = ScoringInputs {
            regions,
            population,
            businesses,
            stops,
            catchments,
            pois,
            income,
        };
        (inputs, summary)
    }
}

/// Decode a GeoJSON `Polygon` or `MultiPolygon` value.
pub(crate) fn decode_polygon(value: Value) -> Option<MultiPolygon<f64>> {
    let GeoJson::Geometry(geometry) = GeoJson::from_json_value(value).ok()? else {
        return None;
    };
    let decoded: geo::Geometry<f64> = geometry.try_into().ok()?;
    match decoded {
        geo::Geometry::MultiPolygon(multi) => Some(multi),
        geo::Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon])),
        _ => None,
    }
}

const fn coordinate(lat: Option<f64>, lon: Option<f64>) -> Option<Coord<f64>> {
    match (lat, lon) {
        (Some(y), Some(x)) => Some(Coord { x, y }),
        _ => None,
    }
}
