//! Core domain types for the SA2 well-resourced scoring engine.
//!
//! The crate models statistical areas, the facts attributed to them and the
//! spatial rules used to attribute those facts. Scoring itself lives in
//! `sa2-scorer`; this crate only exposes the shared vocabulary and the
//! [`ScoreCombiner`] seam.

#![forbid(unsafe_code)]

pub mod assign;
pub mod combiner;
pub mod facts;
pub mod industry;
pub mod region;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assign::{
    AssignmentSummary, Assignments, FactKind, PointFact, RegionIndex, assign_catchments,
    assign_points, attribute_businesses,
};
pub use combiner::{Logistic, ScoreCombiner, ZScores, sigmoid};
pub use facts::{
    BracketOverflow, BusinessFact, IncomeRecord, PointOfInterestFact, PopulationRecord, SchoolCatchmentFact,
    StopFact,
};
pub use industry::{Industry, UnknownIndustry};
pub use region::{Region, RegionCode, RegionCodeError};
