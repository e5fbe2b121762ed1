//! Per-interval data-quality checks run before the engine folds over the input.

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use super::types::IntervalRecord;

/// What to do with intervals that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataPolicy {
    /// Refuse to run; report the first offending interval.
    #[default]
    Reject,
    /// Run anyway and mark the offending intervals in the output.
    Flag,
}

/// A data-quality problem in one input interval.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("interval {index}: field `{field}` is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("interval {index}: field `{field}` must be >= 0, got {value}")]
    Negative {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("interval {index}: timestamp {timestamp} does not come after {previous}")]
    NonIncreasing {
        index: usize,
        timestamp: NaiveDateTime,
        previous: NaiveDateTime,
    },

    #[error("interval {index}: expected a {expected_secs} s step, got {actual_secs} s")]
    UnevenSpacing {
        index: usize,
        expected_secs: i64,
        actual_secs: i64,
    },
}

impl InputError {
    /// Index of the offending interval in the input sequence.
    pub fn index(&self) -> usize {
        match self {
            Self::NonFinite { index, .. }
            | Self::Negative { index, .. }
            | Self::NonIncreasing { index, .. }
            | Self::UnevenSpacing { index, .. } => *index,
        }
    }

    /// Whether the record's numeric values are unusable.
    ///
    /// Timestamp problems leave the values intact; value problems mean the
    /// interval cannot enter the energy balance.
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::NonFinite { .. } | Self::Negative { .. })
    }
}

/// Checks the numeric fields of a single record.
///
/// # Errors
///
/// Returns the first non-finite field, or the first of irradiance, load, or
/// price that is negative. Temperature may be any finite value.
pub fn check_values(index: usize, record: &IntervalRecord) -> Result<(), InputError> {
    let fields = [
        ("irradiance", record.irradiance, true),
        ("ambient_temp_c", record.ambient_temp_c, false),
        ("load_kw", record.load_kw, true),
        ("price_per_kwh", record.price_per_kwh, true),
    ];
    for (field, value, non_negative) in fields {
        if !value.is_finite() {
            return Err(InputError::NonFinite { index, field });
        }
        if non_negative && value < 0.0 {
            return Err(InputError::Negative {
                index,
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Checks that `record` follows `previous` by exactly one interval.
///
/// # Errors
///
/// Returns `NonIncreasing` if the timestamp does not advance, or
/// `UnevenSpacing` if it advances by anything other than `interval_hours`.
pub fn check_spacing(
    index: usize,
    previous: &IntervalRecord,
    record: &IntervalRecord,
    interval_hours: f64,
) -> Result<(), InputError> {
    let actual_secs = (record.timestamp - previous.timestamp).num_seconds();
    if actual_secs <= 0 {
        return Err(InputError::NonIncreasing {
            index,
            timestamp: record.timestamp,
            previous: previous.timestamp,
        });
    }
    let expected_secs = (interval_hours * 3600.0).round() as i64;
    if actual_secs != expected_secs {
        return Err(InputError::UnevenSpacing {
            index,
            expected_secs,
            actual_secs,
        });
    }
    Ok(())
}

/// Validates every record and returns all issues, at most one per interval.
///
/// Value problems take precedence over spacing problems for the same interval.
pub fn validate(records: &[IntervalRecord], interval_hours: f64) -> Vec<InputError> {
    let mut issues = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if let Err(e) = check_values(index, record) {
            issues.push(e);
            continue;
        }
        if index > 0 {
            if let Err(e) = check_spacing(index, &records[index - 1], record, interval_hours) {
                issues.push(e);
            }
        }
    }
    issues
}
