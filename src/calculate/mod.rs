//! Statistics calculation engine.
//!
//! Pure, synchronous building blocks:
//! - Aggregate math over grade samples (mean, median, extrema)
//! - Subject/module code normalization
//! - Student and group rankings

pub mod normalize;
pub mod rank;

use thiserror::Error;

use crate::models::Summary;

pub use normalize::{module_key, normalize_module_code, normalize_subject_code};
pub use rank::{rank_groups, rank_groups_from_entries, rank_students, resolve_display_name};

/// Errors raised by aggregate math.
///
/// Callers filter absent grades before aggregating, so hitting one of these
/// is a contract violation rather than a data condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Aggregate requested over an empty sample: {0}")]
    EmptySample(&'static str),
}

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Result<f64, AggregateError> {
    if xs.is_empty() {
        return Err(AggregateError::EmptySample("mean"));
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Median. Even-length samples average the two middle values.
pub fn median(xs: &[f64]) -> Result<f64, AggregateError> {
    if xs.is_empty() {
        return Err(AggregateError::EmptySample("median"));
    }

    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Smallest value.
pub fn min(xs: &[f64]) -> Result<f64, AggregateError> {
    xs.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(AggregateError::EmptySample("min"))
}

/// Largest value.
pub fn max(xs: &[f64]) -> Result<f64, AggregateError> {
    xs.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(AggregateError::EmptySample("max"))
}

/// Compute count, mean, median, min and max in one go.
pub fn summarize(xs: &[f64]) -> Result<Summary, AggregateError> {
    Ok(Summary {
        count: xs.len() as u32,
        mean: mean(xs)?,
        median: median(xs)?,
        min: min(xs)?,
        max: max(xs)?,
    })
}
