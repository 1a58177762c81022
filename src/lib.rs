//! Facade crate for the SA2 well-resourced scoring engine.
//!
//! This crate re-exports the domain vocabulary from `sa2-core` together with
//! the scoring pipeline from `sa2-scorer`, so callers can depend on a single
//! crate.
//!
//! # Examples
//!
//! ```
//! use sa2_engine::{ScoringConfig, ScoringInputs, score_regions};
//!
//! let report = score_regions(ScoringInputs::default(), &ScoringConfig::default())
//!     .expect("empty inputs score cleanly");
//! assert!(report.diagnostics.below_threshold.is_empty());
//! ```

#![forbid(unsafe_code)]

pub use sa2_core::{
    AssignmentSummary, BracketOverflow, BusinessFact, FactKind, IncomeRecord, Industry, Logistic,
    PointOfInterestFact, PopulationRecord, Region, RegionCode, RegionCodeError, RegionIndex,
    SchoolCatchmentFact, ScoreCombiner, StopFact, UnknownIndustry, ZScores, sigmoid,
};

pub use sa2_scorer::{
    IncompleteRegion, Metric, MetricStats, ScoreRow, ScoreTable, ScoringConfig,
    ScoringDiagnostics, ScoringError, ScoringInputs, ScoringReport, ZoneSummary,
    income_correlation, score_regions, score_regions_with, zone_summaries,
};
