//! Well-resourced scoring for SA2 regions.
//!
//! The crate turns attributed facts into a ranked [`ScoreTable`]:
//! - **Population filter** drops regions below a resident threshold and,
//!   optionally, regions outside an SA4 zone allowlist.
//! - **Aggregation** computes business density, stop count, catchment
//!   density and point-of-interest count per eligible region.
//! - **Normalisation** converts each metric into sample z-scores, zeroing
//!   metrics without spread.
//! - **Combination and ranking** squash the summed z-scores through a
//!   [`ScoreCombiner`](sa2_core::ScoreCombiner) and sort by score.
//!
//! # Examples
//!
//! ```
//! use sa2_scorer::{ScoringConfig, ScoringInputs, score_regions};
//!
//! let report = score_regions(ScoringInputs::default(), &ScoringConfig::default())
//!     .expect("empty inputs score cleanly");
//! assert!(report.table.is_empty());
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod filter;
mod metrics;
mod normalise;
mod pipeline;
mod rank;
mod summary;

pub use config::{DEFAULT_MIN_POPULATION, DEFAULT_POI_GROUPS, ScoringConfig};
pub use error::ScoringError;
pub use filter::{
    Eligibility, EligibleRegion, ensure_unique_regions, filter_population, index_population,
    partition_zones,
};
pub use metrics::{AttributedFacts, Metric, RawMetrics, RegionMetrics, aggregate, per_thousand};
pub use normalise::{MetricStats, Normalisation, normalise};
pub use pipeline::{
    IncompleteRegion, ScoringDiagnostics, ScoringInputs, ScoringReport, score_regions,
    score_regions_with,
};
pub use rank::{ScoreRow, ScoreTable, ranking_order};
pub use summary::{ZoneSummary, income_correlation, zone_summaries};

#[cfg(test)]
mod tests;
