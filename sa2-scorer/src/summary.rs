//! Aggregate views over a ranked table.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ScoreTable;

/// Score distribution within one SA4 zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// Zone name.
    pub zone: String,
    /// Ranked regions in the zone.
    pub regions: usize,
    /// Mean score.
    pub mean_score: f64,
    /// Median score.
    pub median_score: f64,
    /// Lowest score.
    pub min_score: f64,
    /// Highest score.
    pub max_score: f64,
}

/// Summarise scores per zone, ordered by zone name.
#[must_use]
pub fn zone_summaries(table: &ScoreTable) -> Vec<ZoneSummary> {
    let mut by_zone: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in table {
        by_zone.entry(row.zone_name.as_str()).or_default().push(row.score);
    }
    by_zone
        .into_iter()
        .filter_map(|(zone, mut scores)| {
            scores.sort_by(f64::total_cmp);
            let min_score = *scores.first()?;
            let max_score = *scores.last()?;
            Some(ZoneSummary {
                zone: zone.to_owned(),
                regions: scores.len(),
                mean_score: mean(&scores),
                median_score: median(&scores)?,
                min_score,
                max_score,
            })
        })
        .collect()
}

/// Pearson correlation between score and median income.
///
/// Only rows with a finite income contribute. Returns `None` with fewer than
/// two such rows or when either series has no variance.
#[expect(
    clippy::float_arithmetic,
    reason = "correlation is a floating-point reduction"
)]
#[must_use]
pub fn income_correlation(table: &ScoreTable) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = table
        .iter()
        .filter_map(|row| {
            row.median_income
                .filter(|income| income.is_finite())
                .map(|income| (income, row.score))
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let incomes: Vec<f64> = pairs.iter().map(|&(income, _)| income).collect();
    let scores: Vec<f64> = pairs.iter().map(|&(_, score)| score).collect();
    let income_mean = mean(&incomes);
    let score_mean = mean(&scores);
    let (covariance, income_var, score_var) = pairs.iter().fold(
        (0.0, 0.0, 0.0),
        |(cov, var_i, var_s), &(income, score)| {
            let di = income - income_mean;
            let ds = score - score_mean;
            (cov + di * ds, var_i + di * di, var_s + ds * ds)
        },
    );
    if income_var <= 0.0 || score_var <= 0.0 {
        return None;
    }
    let r = covariance / (income_var.sqrt() * score_var.sqrt());
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "means are floating-point reductions"
)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(sorted: &[f64]) -> Option<f64> {
    let upper = sorted.len().checked_div(2)?;
    let high = *sorted.get(upper)?;
    if !sorted.len().is_multiple_of(2) {
        return Some(high);
    }
    let low = *sorted.get(upper.checked_sub(1)?)?;
    Some(f64::midpoint(low, high))
}
