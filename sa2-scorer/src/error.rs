//! Fatal errors that abort a scoring run.
#![forbid(unsafe_code)]

use sa2_core::RegionCode;
use thiserror::Error;

/// Errors raised while validating inputs or configuration.
///
/// Recoverable conditions such as missing geometry or degenerate metrics are
/// reported through diagnostics instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoringError {
    /// An eligible region has no residents, so per-capita rates are undefined.
    #[error("region {code} has zero population but passed the population filter")]
    ZeroPopulation {
        /// Offending region.
        code: RegionCode,
    },
    /// Two input regions share a code.
    #[error("region code {code} appears more than once in the input")]
    DuplicateRegion {
        /// Repeated code.
        code: RegionCode,
    },
    /// A region has more than one population record.
    #[error("region {code} has more than one population record")]
    DuplicatePopulationRecord {
        /// Region with the repeated record.
        code: RegionCode,
    },
    /// A region's business counts add up to more than a `u64` can hold.
    #[error("business counts for region {code} overflow a 64-bit total")]
    CountOverflow {
        /// Region whose counts overflowed.
        code: RegionCode,
    },
    /// The scoring configuration is unusable.
    #[error("invalid scoring configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: &'static str,
    },
}
