//! Unit coverage for the scoring stages.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use geo::Coord;
use rstest::{fixture, rstest};
use sa2_core::test_support::{centre, code, income, population, region, square};
use sa2_core::{BusinessFact, Industry, PointOfInterestFact, Region, StopFact};

use crate::{
    EligibleRegion, Metric, MetricStats, RawMetrics, RegionMetrics, ScoreRow, ScoreTable,
    ScoringConfig, ScoringError, ScoringInputs, ensure_unique_regions, filter_population,
    income_correlation, index_population, normalise, partition_zones, per_thousand,
    score_regions, zone_summaries,
};

#[expect(
    clippy::float_arithmetic,
    reason = "tolerance comparison needs a float difference"
)]
fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

fn row(raw_code: &str, zone: &str, score: f64, median_income: Option<f64>) -> ScoreRow {
    ScoreRow {
        region_code: code(raw_code),
        region_name: raw_code.to_owned(),
        zone_name: zone.to_owned(),
        area_sqkm: 1.0,
        total_population: 1000,
        young_population: 100,
        median_income,
        businesses_per_1000: 0.0,
        stops_count: 0,
        catchments_per_1000_young: 0.0,
        poi_count: 0,
        z_business: 0.0,
        z_stops: 0.0,
        z_schools: 0.0,
        z_poi: 0.0,
        score,
    }
}

#[fixture]
fn three_regions() -> Vec<Region> {
    vec![
        region("A", "North", square(0.0, 0.0, 1.0)),
        region("B", "North", square(2.0, 0.0, 1.0)),
        region("C", "South", square(4.0, 0.0, 1.0)),
    ]
}

#[rstest]
fn population_threshold_is_inclusive(three_regions: Vec<Region>) {
    let records = vec![population("A", 99, 10), population("B", 100, 10)];
    let index = index_population(&records).expect("unique records");

    let outcome = filter_population(&three_regions, &index, 100);

    let eligible: Vec<&str> = outcome
        .eligible
        .iter()
        .map(|subject| subject.region.code.as_str())
        .collect();
    assert_eq!(eligible, vec!["B"]);
    assert_eq!(outcome.below_threshold, vec![code("A")]);
    assert_eq!(outcome.missing_population, vec![code("C")]);
}

#[rstest]
fn duplicate_regions_are_fatal(mut three_regions: Vec<Region>) {
    three_regions.push(region("B", "South", square(9.0, 9.0, 1.0)));
    assert_eq!(
        ensure_unique_regions(&three_regions),
        Err(ScoringError::DuplicateRegion { code: code("B") })
    );
}

#[rstest]
fn duplicate_population_records_are_fatal() {
    let records = vec![population("A", 100, 10), population("A", 200, 20)];
    assert_eq!(
        index_population(&records).map(|index| index.len()),
        Err(ScoringError::DuplicatePopulationRecord { code: code("A") })
    );
}

#[rstest]
fn zone_allowlist_partitions_regions(three_regions: Vec<Region>) {
    let config = ScoringConfig {
        zones: Some(BTreeSet::from(["south".to_owned()])),
        ..ScoringConfig::default()
    };

    let (kept, dropped) = partition_zones(three_regions, &config);

    assert_eq!(kept.len(), 1);
    assert_eq!(dropped, vec![code("A"), code("B")]);
}

#[rstest]
#[case(20, 500, Some(40.0))]
#[case(0, 1000, Some(0.0))]
#[case(1, 0, None)]
fn per_thousand_rates(#[case] count: u64, #[case] base: u64, #[case] expected: Option<f64>) {
    let rate = per_thousand(count, base);
    match (rate, expected) {
        (Some(actual), Some(wanted)) => assert!(close(actual, wanted), "got {actual}"),
        (actual, wanted) => assert_eq!(actual, wanted),
    }
}

#[rstest]
#[case(&[])]
#[case(&[3.0])]
#[case(&[2.5, 2.5, 2.5])]
fn degenerate_metrics_have_no_spread(#[case] values: &[f64]) {
    let stats = MetricStats::from_values(Metric::Business, values);
    assert!(stats.is_degenerate());
    assert_eq!(stats.z_score(10.0).to_bits(), 0.0_f64.to_bits());
}

#[rstest]
fn equal_tenths_are_degenerate_despite_rounding() {
    let stats = MetricStats::from_values(Metric::Schools, &[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]);
    assert!(stats.is_degenerate());
}

#[rstest]
fn z_scores_use_sample_deviation() {
    let stats = MetricStats::from_values(Metric::Stops, &[0.0, 2.0]);
    assert!(close(stats.std_dev, std::f64::consts::SQRT_2));
    assert!(close(stats.z_score(2.0), std::f64::consts::FRAC_1_SQRT_2));
}

#[rstest]
#[case(ScoringConfig { industries: BTreeSet::new(), ..ScoringConfig::default() })]
#[case(ScoringConfig { poi_groups: BTreeSet::from([" ".to_owned()]), ..ScoringConfig::default() })]
#[case(ScoringConfig { zones: Some(BTreeSet::new()), ..ScoringConfig::default() })]
fn invalid_configs_are_rejected(#[case] config: ScoringConfig) {
    assert!(matches!(
        config.validate(),
        Err(ScoringError::InvalidConfig { .. })
    ));
}

#[rstest]
fn ties_break_on_region_code() {
    let table = ScoreTable::new(vec![
        row("C", "North", 0.4, None),
        row("B", "North", 0.7, None),
        row("A", "North", 0.4, None),
    ]);
    let order: Vec<&str> = table.iter().map(|r| r.region_code.as_str()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);
    assert_eq!(table.rank_of("C"), Some(3));
}

#[rstest]
fn zone_summaries_group_by_zone() {
    let table = ScoreTable::new(vec![
        row("A", "North", 0.2, None),
        row("B", "North", 0.6, None),
        row("C", "South", 0.9, None),
    ]);

    let summaries = zone_summaries(&table);

    assert_eq!(summaries.len(), 2);
    let north = summaries.first().expect("north summary");
    assert_eq!(north.zone, "North");
    assert_eq!(north.regions, 2);
    assert!(close(north.mean_score, 0.4));
    assert!(close(north.median_score, 0.4));
    assert!(close(north.min_score, 0.2));
    assert!(close(north.max_score, 0.6));
}

#[rstest]
fn income_correlation_needs_two_varying_pairs() {
    let single = ScoreTable::new(vec![row("A", "North", 0.2, Some(40_000.0))]);
    assert_eq!(income_correlation(&single), None);

    let flat = ScoreTable::new(vec![
        row("A", "North", 0.2, Some(40_000.0)),
        row("B", "North", 0.8, Some(40_000.0)),
    ]);
    assert_eq!(income_correlation(&flat), None);

    let rising = ScoreTable::new(vec![
        row("A", "North", 0.2, Some(30_000.0)),
        row("B", "North", 0.5, Some(60_000.0)),
        row("C", "North", 0.8, Some(90_000.0)),
    ]);
    let r = income_correlation(&rising).expect("defined correlation");
    assert!(close(r, 1.0), "expected perfect correlation, got {r}");
}

#[rstest]
fn single_eligible_region_scores_one_half() {
    let inputs = ScoringInputs {
        regions: vec![region("A", "North", square(0.0, 0.0, 1.0))],
        population: vec![population("A", 400, 50)],
        businesses: vec![BusinessFact::new(Some(code("A")), Industry::RetailTrade, 7)],
        stops: vec![StopFact::new("s1", Some(centre(0.0, 0.0, 1.0)))],
        ..ScoringInputs::default()
    };

    let report = score_regions(inputs, &ScoringConfig::default()).expect("scores");

    let only = report.table.get("A").expect("region A ranked");
    assert!(close(only.score, 0.5));
    assert_eq!(report.diagnostics.degenerate_metrics, Metric::ALL.to_vec());
}

#[rstest]
fn zero_population_is_fatal_without_threshold() {
    let inputs = ScoringInputs {
        regions: vec![region("A", "North", square(0.0, 0.0, 1.0))],
        population: vec![population("A", 0, 0)],
        ..ScoringInputs::default()
    };
    let config = ScoringConfig {
        min_population: 0,
        ..ScoringConfig::default()
    };

    assert_eq!(
        score_regions(inputs, &config).map(|report| report.table.len()),
        Err(ScoringError::ZeroPopulation { code: code("A") })
    );
}

#[rstest]
fn untracked_industries_and_poi_groups_are_ignored() {
    let inputs = ScoringInputs {
        regions: vec![
            region("A", "North", square(0.0, 0.0, 1.0)),
            region("B", "North", square(2.0, 0.0, 1.0)),
        ],
        population: vec![population("A", 1000, 100), population("B", 1000, 100)],
        businesses: vec![
            BusinessFact::new(Some(code("A")), Industry::RetailTrade, 4),
            BusinessFact::new(Some(code("A")), Industry::ArtsAndRecreationServices, 6),
        ],
        pois: vec![
            PointOfInterestFact::new("Clinic", "health", "clinic", Some(centre(0.0, 0.0, 1.0))),
            PointOfInterestFact::new("Depot", "TRANSPORT", "bus", Some(centre(0.0, 0.0, 1.0))),
            PointOfInterestFact::new("Lost", "HEALTH", "clinic", Some(Coord { x: 50.0, y: 50.0 })),
        ],
        ..ScoringInputs::default()
    };
    let config = ScoringConfig {
        industries: BTreeSet::from([Industry::RetailTrade]),
        ..ScoringConfig::default()
    };

    let report = score_regions(inputs, &config).expect("scores");

    let a = report.table.get("A").expect("region A ranked");
    assert!(close(a.businesses_per_1000, 4.0));
    assert_eq!(a.poi_count, 1);
    assert!(a.score > 0.5);
}

#[rstest]
fn income_is_carried_to_output() {
    let inputs = ScoringInputs {
        regions: vec![region("A", "North", square(0.0, 0.0, 1.0))],
        population: vec![population("A", 400, 50)],
        income: vec![income("A", 61_000.0), income("A", 1.0)],
        ..ScoringInputs::default()
    };

    let report = score_regions(inputs, &ScoringConfig::default()).expect("scores");

    let only = report.table.get("A").expect("region A ranked");
    assert_eq!(only.median_income, Some(61_000.0));
}

#[rstest]
fn missing_metric_is_excluded_from_statistics_and_ranking(three_regions: Vec<Region>) {
    let records = vec![
        population("A", 1000, 100),
        population("B", 1000, 100),
        population("C", 1000, 100),
    ];
    let raw = [
        RawMetrics {
            businesses_per_1000: None,
            stops_count: 2,
            catchments_per_1000_young: Some(10.0),
            poi_count: 1,
        },
        RawMetrics {
            businesses_per_1000: Some(4.0),
            stops_count: 4,
            catchments_per_1000_young: Some(20.0),
            poi_count: 3,
        },
        RawMetrics {
            businesses_per_1000: Some(8.0),
            stops_count: 6,
            catchments_per_1000_young: Some(30.0),
            poi_count: 5,
        },
    ];
    let metrics: Vec<RegionMetrics<'_>> = three_regions
        .iter()
        .zip(&records)
        .zip(raw)
        .map(|((boundary, record), values)| RegionMetrics {
            subject: EligibleRegion {
                region: boundary,
                population: record,
            },
            metrics: values,
        })
        .collect();

    let outcome = normalise(&metrics);

    let business = outcome
        .stats
        .iter()
        .find(|stats| stats.metric == Metric::Business)
        .expect("business stats");
    assert_eq!(business.count, 2);
    assert!(close(business.mean, 6.0));
    let stops = outcome
        .stats
        .iter()
        .find(|stats| stats.metric == Metric::Stops)
        .expect("stop stats");
    assert_eq!(stops.count, 3);
    assert!(close(stops.mean, 4.0));
    assert!(outcome.scores.first().expect("A scored").is_none());
    assert!(outcome.scores.get(1).expect("B scored").is_some());
    let missing = metrics.first().expect("A metrics").metrics.missing();
    assert_eq!(missing, vec![Metric::Business]);
}

#[rstest]
fn overflowing_business_counts_are_fatal() {
    let inputs = ScoringInputs {
        regions: vec![region("A", "North", square(0.0, 0.0, 1.0))],
        population: vec![population("A", 1000, 100)],
        businesses: vec![
            BusinessFact::new(Some(code("A")), Industry::RetailTrade, u64::MAX),
            BusinessFact::new(Some(code("A")), Industry::RetailTrade, 2),
        ],
        ..ScoringInputs::default()
    };

    assert_eq!(
        score_regions(inputs, &ScoringConfig::default()).map(|report| report.table.len()),
        Err(ScoringError::CountOverflow { code: code("A") })
    );
}
