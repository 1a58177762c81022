//! Turn per-metric z-scores into a single bounded score.
//!
//! The default [`Logistic`] combiner sums the four z-scores and squashes the
//! sum with a sigmoid. Alternative weightings plug in through the
//! [`ScoreCombiner`] trait.

/// Standardised values of the four metrics for one region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZScores {
    /// Tracked businesses per 1000 residents.
    pub business: f64,
    /// Public transport stops.
    pub stops: f64,
    /// Catchments per young resident.
    pub schools: f64,
    /// Points of interest.
    pub poi: f64,
}

impl ZScores {
    /// Unweighted sum of the four z-scores.
    pub fn raw_sum(&self) -> f64 {
        self.business + self.stops + self.schools + self.poi
    }
}

/// Combine z-scores into a score.
///
/// Implementations must be deterministic; the same inputs always produce the
/// same score.
///
/// # Examples
/// ```
/// use sa2_core::{Logistic, ScoreCombiner, ZScores};
///
/// let score = Logistic.combine(&ZScores::default());
/// assert!((score - 0.5).abs() < f64::EPSILON);
/// ```
pub trait ScoreCombiner: Send + Sync {
    /// Produce a score in `(0, 1)`.
    fn combine(&self, z: &ZScores) -> f64;

    /// Map a non-finite result to the neutral midpoint.
    fn sanitise(&self, score: f64) -> f64 {
        if score.is_finite() { score } else { 0.5 }
    }
}

/// Logistic of the summed z-scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logistic;

impl ScoreCombiner for Logistic {
    fn combine(&self, z: &ZScores) -> f64 {
        self.sanitise(sigmoid(z.raw_sum()))
    }
}

/// Numerically stable logistic function.
///
/// Saturating inputs are held just inside `(0, 1)` so the result never
/// reaches either bound. `NaN` propagates.
///
/// # Examples
/// ```
/// use sa2_core::sigmoid;
///
/// assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
/// assert!(sigmoid(1000.0) < 1.0);
/// assert!(sigmoid(-1000.0) > 0.0);
/// ```
pub fn sigmoid(x: f64) -> f64 {
    let value = if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    };
    value.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON / 2.0)
}
