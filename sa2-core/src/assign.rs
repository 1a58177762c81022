//! Attribute facts to the regions that contain or intersect them.
//!
//! Region envelopes are bulk loaded into an R\*-tree so each lookup only runs
//! exact polygon predicates against the few regions whose bounding boxes
//! overlap the fact.
//!
//! Points (stops, points of interest) go to a single region: the first region
//! in input order that strictly contains the point, falling back to the first
//! region whose boundary the point touches. Catchment polygons fan out to
//! every region they intersect. Facts that cannot be placed are counted in an
//! [`AssignmentSummary`] rather than reported individually.

use std::collections::BTreeMap;

use geo::{BoundingRect, Contains, Coord, Intersects, MultiPolygon, Point, Rect};
use log::{info, warn};
use rstar::{AABB, RTree, RTreeObject};

use crate::{BusinessFact, PointOfInterestFact, Region, RegionCode, SchoolCatchmentFact, StopFact};

/// Kind of fact being attributed, used to label summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FactKind {
    /// Business counts, attributed by region code.
    Business,
    /// Public transport stops.
    Stop,
    /// School catchment polygons.
    Catchment,
    /// Points of interest.
    PointOfInterest,
}

impl FactKind {
    /// Return a lowercase label for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Stop => "stop",
            Self::Catchment => "catchment",
            Self::PointOfInterest => "point of interest",
        }
    }
}

/// Outcome counts for one attribution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentSummary {
    /// Which facts were attributed.
    pub kind: FactKind,
    /// Facts offered to the assigner.
    pub total: usize,
    /// Facts attributed to at least one region.
    pub assigned: usize,
    /// Fact-to-region links produced. Exceeds `assigned` when catchments
    /// span several regions.
    pub links: usize,
    /// Facts with an absent or unusable geometry.
    pub missing_geometry: usize,
    /// Facts with a usable geometry (or code) that matched no region.
    pub unassigned: usize,
}

impl AssignmentSummary {
    const fn empty(kind: FactKind) -> Self {
        Self {
            kind,
            total: 0,
            assigned: 0,
            links: 0,
            missing_geometry: 0,
            unassigned: 0,
        }
    }

    fn log(&self) {
        info!(
            "Assigned {}/{} {} facts ({} region links)",
            self.assigned,
            self.total,
            self.kind.as_str(),
            self.links
        );
        if self.missing_geometry > 0 || self.unassigned > 0 {
            warn!(
                "Excluded {} {} facts: {} missing geometry, {} outside every region",
                self.missing_geometry + self.unassigned,
                self.kind.as_str(),
                self.missing_geometry,
                self.unassigned
            );
        }
    }
}

/// Facts grouped by the region they were attributed to.
///
/// Regions iterate in code order; facts within a region keep input order.
#[derive(Debug, Clone)]
pub struct Assignments<'f, T> {
    by_region: BTreeMap<RegionCode, Vec<&'f T>>,
    summary: AssignmentSummary,
}

impl<'f, T> Assignments<'f, T> {
    fn new(kind: FactKind) -> Self {
        Self {
            by_region: BTreeMap::new(),
            summary: AssignmentSummary::empty(kind),
        }
    }

    fn link(&mut self, code: &RegionCode, fact: &'f T) {
        self.by_region.entry(code.clone()).or_default().push(fact);
        self.summary.links += 1;
    }

    /// Facts attributed to `code`, in input order.
    pub fn facts_in(&self, code: &RegionCode) -> &[&'f T] {
        self.by_region.get(code).map_or(&[], Vec::as_slice)
    }

    /// Number of facts attributed to `code`.
    pub fn count_in(&self, code: &RegionCode) -> usize {
        self.facts_in(code).len()
    }

    /// Iterate over regions with at least one fact.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionCode, &[&'f T])> {
        self.by_region
            .iter()
            .map(|(code, facts)| (code, facts.as_slice()))
    }

    /// Counts describing the attribution pass.
    pub const fn summary(&self) -> AssignmentSummary {
        self.summary
    }
}

/// A fact positioned by a single coordinate.
pub trait PointFact {
    /// Kind reported in summaries.
    const KIND: FactKind;

    /// Position of the fact, if known.
    fn location(&self) -> Option<Coord<f64>>;
}

impl PointFact for StopFact {
    const KIND: FactKind = FactKind::Stop;

    fn location(&self) -> Option<Coord<f64>> {
        self.location
    }
}

impl PointFact for PointOfInterestFact {
    const KIND: FactKind = FactKind::PointOfInterest;

    fn location(&self) -> Option<Coord<f64>> {
        self.location
    }
}

struct RegionEnvelope {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Read-only spatial index over a region set.
///
/// # Examples
/// ```
/// use geo::{Coord, MultiPolygon, polygon};
/// use sa2_core::{Region, RegionCode, RegionIndex};
///
/// let square = MultiPolygon(vec![polygon![
///     (x: 0.0, y: 0.0),
///     (x: 1.0, y: 0.0),
///     (x: 1.0, y: 1.0),
///     (x: 0.0, y: 1.0),
/// ]]);
/// let regions = vec![Region::new(RegionCode::new("A").unwrap(), "A", "Zone", 1.0, square)];
/// let index = RegionIndex::new(&regions);
///
/// let hit = index.locate_point(Coord { x: 0.5, y: 0.5 });
/// assert_eq!(hit.map(|region| region.code.as_str()), Some("A"));
/// assert!(index.locate_point(Coord { x: 5.0, y: 5.0 }).is_none());
/// ```
pub struct RegionIndex<'r> {
    regions: &'r [Region],
    tree: RTree<RegionEnvelope>,
    codes: BTreeMap<&'r RegionCode, usize>,
}

impl<'r> RegionIndex<'r> {
    /// Build an index over `regions`. Input order decides boundary ties.
    pub fn new(regions: &'r [Region]) -> Self {
        let mut envelopes = Vec::with_capacity(regions.len());
        let mut codes = BTreeMap::new();
        for (ordinal, region) in regions.iter().enumerate() {
            codes.entry(&region.code).or_insert(ordinal);
            match polygon_envelope(&region.geometry) {
                Some(envelope) => envelopes.push(RegionEnvelope { ordinal, envelope }),
                None => warn!("Region {} has an empty boundary and cannot hold facts", region.code),
            }
        }
        Self {
            regions,
            tree: RTree::bulk_load(envelopes),
            codes,
        }
    }

    /// Number of indexed regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Report whether the index holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Look up a region by code.
    pub fn region(&self, code: &RegionCode) -> Option<&'r Region> {
        self.codes
            .get(code)
            .and_then(|&ordinal| self.regions.get(ordinal))
    }

    /// Find the region holding `coord`.
    ///
    /// Strict containment wins; a point lying only on boundaries goes to the
    /// first touching region in input order. Returns `None` for non-finite or
    /// out-of-range coordinates and for points outside every region.
    pub fn locate_point(&self, coord: Coord<f64>) -> Option<&'r Region> {
        let point = usable_point(coord)?;
        let candidates = self.candidates(&AABB::from_point([point.x(), point.y()]));
        candidates
            .iter()
            .find(|region| region.geometry.contains(&point))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|region| region.geometry.intersects(&point))
            })
            .copied()
    }

    /// Every region intersecting `polygon`, in input order.
    pub fn intersecting(&self, polygon: &MultiPolygon<f64>) -> Vec<&'r Region> {
        let Some(envelope) = polygon_envelope(polygon) else {
            return Vec::new();
        };
        self.candidates(&envelope)
            .into_iter()
            .filter(|region| region.geometry.intersects(polygon))
            .collect()
    }

    fn candidates(&self, envelope: &AABB<[f64; 2]>) -> Vec<&'r Region> {
        let mut ordinals: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(envelope)
            .map(|entry| entry.ordinal)
            .collect();
        ordinals.sort_unstable();
        ordinals
            .into_iter()
            .filter_map(|ordinal| self.regions.get(ordinal))
            .collect()
    }
}

/// Attribute point facts by containment.
pub fn assign_points<'f, T: PointFact>(
    index: &RegionIndex<'_>,
    facts: &'f [T],
) -> Assignments<'f, T> {
    let mut assignments = Assignments::new(T::KIND);
    for fact in facts {
        assignments.summary.total += 1;
        let Some(coord) = fact.location().filter(|&c| usable_point(c).is_some()) else {
            assignments.summary.missing_geometry += 1;
            continue;
        };
        match index.locate_point(coord) {
            Some(region) => {
                assignments.summary.assigned += 1;
                assignments.link(&region.code, fact);
            }
            None => assignments.summary.unassigned += 1,
        }
    }
    assignments.summary.log();
    assignments
}

/// Attribute catchments to every region they intersect.
pub fn assign_catchments<'f>(
    index: &RegionIndex<'_>,
    catchments: &'f [SchoolCatchmentFact],
) -> Assignments<'f, SchoolCatchmentFact> {
    let mut assignments = Assignments::new(FactKind::Catchment);
    for catchment in catchments {
        assignments.summary.total += 1;
        let Some(geometry) = catchment
            .geometry
            .as_ref()
            .filter(|g| polygon_envelope(g).is_some())
        else {
            assignments.summary.missing_geometry += 1;
            continue;
        };
        let regions = index.intersecting(geometry);
        if regions.is_empty() {
            assignments.summary.unassigned += 1;
            continue;
        }
        assignments.summary.assigned += 1;
        for region in regions {
            assignments.link(&region.code, catchment);
        }
    }
    assignments.summary.log();
    assignments
}

/// Attribute business facts by their region code.
///
/// Facts without a code, or whose code is not in the index, are unassigned.
pub fn attribute_businesses<'f>(
    index: &RegionIndex<'_>,
    facts: &'f [BusinessFact],
) -> Assignments<'f, BusinessFact> {
    let mut assignments = Assignments::new(FactKind::Business);
    for fact in facts {
        assignments.summary.total += 1;
        match fact.region_code.as_ref().and_then(|code| index.region(code)) {
            Some(region) => {
                assignments.summary.assigned += 1;
                assignments.link(&region.code, fact);
            }
            None => assignments.summary.unassigned += 1,
        }
    }
    assignments.summary.log();
    assignments
}

fn usable_point(coord: Coord<f64>) -> Option<Point<f64>> {
    (coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y))
    .then(|| Point::from(coord))
}

fn polygon_envelope(polygon: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon
        .bounding_rect()
        .filter(rect_is_finite)
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

fn rect_is_finite(rect: &Rect<f64>) -> bool {
    [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        .iter()
        .all(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{code, region, square};
    use crate::Industry;
    use rstest::{fixture, rstest};

    /// Two unit squares sharing the edge `x = 1`.
    #[fixture]
    fn neighbours() -> Vec<Region> {
        vec![
            region("A", "East", square(0.0, 0.0, 1.0)),
            region("B", "East", square(1.0, 0.0, 1.0)),
        ]
    }

    #[rstest]
    #[case(0.5, 0.5, Some("A"))]
    #[case(1.5, 0.5, Some("B"))]
    #[case(3.0, 3.0, None)]
    fn points_resolve_to_containing_region(
        neighbours: Vec<Region>,
        #[case] x: f64,
        #[case] y: f64,
        #[case] expected: Option<&str>,
    ) {
        let index = RegionIndex::new(&neighbours);
        let hit = index.locate_point(Coord { x, y });
        assert_eq!(hit.map(|r| r.code.as_str()), expected);
    }

    #[rstest]
    fn shared_boundary_goes_to_first_region_in_input_order(neighbours: Vec<Region>) {
        let index = RegionIndex::new(&neighbours);
        let hit = index.locate_point(Coord { x: 1.0, y: 0.5 });
        assert_eq!(hit.map(|r| r.code.as_str()), Some("A"));

        let reversed: Vec<Region> = neighbours.into_iter().rev().collect();
        let index = RegionIndex::new(&reversed);
        let hit = index.locate_point(Coord { x: 1.0, y: 0.5 });
        assert_eq!(hit.map(|r| r.code.as_str()), Some("B"));
    }

    #[rstest]
    fn catchment_spanning_two_regions_fans_out(neighbours: Vec<Region>) {
        let index = RegionIndex::new(&neighbours);
        let catchments = vec![SchoolCatchmentFact::new(
            "Harbour Public",
            "primary",
            Some(square(0.5, 0.25, 1.0)),
        )];

        let assignments = assign_catchments(&index, &catchments);

        assert_eq!(assignments.count_in(&code("A")), 1);
        assert_eq!(assignments.count_in(&code("B")), 1);
        let summary = assignments.summary();
        assert_eq!(summary.assigned, 1);
        assert_eq!(summary.links, 2);
    }

    #[rstest]
    fn stops_without_usable_geometry_are_counted(neighbours: Vec<Region>) {
        let index = RegionIndex::new(&neighbours);
        let stops = vec![
            StopFact::new("1", Some(Coord { x: 0.5, y: 0.5 })),
            StopFact::new("2", None),
            StopFact::new("3", Some(Coord { x: f64::NAN, y: 0.5 })),
            StopFact::new("4", Some(Coord { x: 200.0, y: 0.5 })),
            StopFact::new("5", Some(Coord { x: 9.0, y: 9.0 })),
        ];

        let assignments = assign_points(&index, &stops);
        let summary = assignments.summary();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.assigned, 1);
        assert_eq!(summary.missing_geometry, 3);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(assignments.count_in(&code("A")), 1);
    }

    #[rstest]
    fn businesses_are_attributed_by_code(neighbours: Vec<Region>) {
        let index = RegionIndex::new(&neighbours);
        let facts = vec![
            BusinessFact::new(Some(code("A")), Industry::RetailTrade, 4),
            BusinessFact::new(Some(code("Z")), Industry::RetailTrade, 2),
            BusinessFact::new(None, Industry::RetailTrade, 1),
        ];

        let assignments = attribute_businesses(&index, &facts);

        assert_eq!(assignments.count_in(&code("A")), 1);
        assert_eq!(assignments.summary().unassigned, 2);
    }

    #[rstest]
    fn empty_catchment_geometry_counts_as_missing(neighbours: Vec<Region>) {
        let index = RegionIndex::new(&neighbours);
        let catchments = vec![
            SchoolCatchmentFact::new("Nowhere", "primary", Some(MultiPolygon(Vec::new()))),
            SchoolCatchmentFact::new("Unknown", "primary", None),
        ];

        let summary = assign_catchments(&index, &catchments).summary();

        assert_eq!(summary.missing_geometry, 2);
        assert_eq!(summary.links, 0);
    }
}
