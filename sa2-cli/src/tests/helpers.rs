//! Test helpers for writing input bundles to disk.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// Temporary workspace holding a bundle file.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub(super) fn write_bundle(&self, bundle: &Value) -> Utf8PathBuf {
        let path = self.path("bundle.json");
        write_utf8(&path, bundle.to_string().as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// GeoJSON polygon for the unit square with its lower-left corner at `x`.
pub(super) fn square_geometry(x: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
    })
}

/// Regions X, Y and Z on a row, where Y is under the default threshold and
/// Z has residents but no facts.
pub(super) fn three_region_bundle() -> Value {
    json!({
        "regions": [
            {"code": "X", "name": "Harbour", "zone": "Inner", "area_sqkm": 2.5, "geometry": square_geometry(0.0)},
            {"code": "Y", "name": "Islet", "zone": "Inner", "area_sqkm": 0.4, "geometry": square_geometry(2.0)},
            {"code": "Z", "name": "Fringe", "zone": "Outer", "area_sqkm": 9.0, "geometry": square_geometry(4.0)}
        ],
        "population": [
            {"region_code": "X", "total": 500, "young": 100},
            {"region_code": "Y", "total": 50, "young": 10},
            {"region_code": "Z", "total": 1000, "young": 200}
        ],
        "businesses": [
            {"region_code": "X", "industry": "Retail Trade", "count": 6},
            {"region_code": "X", "industry": "education and training", "count": 4},
            {"region_code": "X", "industry": "Mining", "count": 40}
        ],
        "stops": [
            {"id": "s1", "lat": 0.5, "lon": 0.5},
            {"id": "s2", "lat": 0.25, "lon": 0.75},
            {"id": "s3"}
        ],
        "catchments": [
            {"school_name": "Harbour Public", "school_type": "primary", "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75], [0.25, 0.25]]]
            }},
            {"school_name": "Broken", "school_type": "primary", "geometry": {"type": "Polygon", "coordinates": "oops"}}
        ],
        "pois": [
            {"name": "Pool", "group": "RECREATION", "kind": "pool", "lat": 0.5, "lon": 0.5},
            {"name": "Library", "group": "EDUCATION", "kind": "library", "lat": 0.5, "lon": 0.5},
            {"name": "Clinic", "group": "HEALTH", "kind": "clinic", "lat": 0.5, "lon": 0.5},
            {"name": "Hall", "group": "COMMUNITY", "kind": "hall", "lat": 0.5, "lon": 0.5},
            {"name": "Grocer", "group": "RETAIL", "kind": "grocer", "lat": 0.5, "lon": 0.5}
        ],
        "income": [
            {"region_code": "X", "median_income": 72000.0},
            {"region_code": "Z", "median_income": 41000.0}
        ]
    })
}
