//! Row validation for interval usage files.
//!
//! A row has exactly five fields: `timestamp, durationSeconds, unit, consumptionWh,
//! generationWh`. Checks run in a fixed order (column count, timestamp, numbers,
//! duration, non-negative energy, unit) and the first failing check is reported.

use crate::error::{RowError, RowFailure};
use crate::models::Reading;
use crate::timestamp_parser::TimestampParser;

pub const EXPECTED_COLUMNS: usize = 5;

/// Validate one split and trimmed row. `row` is only used to locate failures.
pub fn validate_row(fields: &[&str], row: usize) -> Result<Reading, RowFailure> {
    check_fields(fields).map_err(|error| RowFailure::new(row, error))
}

fn check_fields(fields: &[&str]) -> Result<Reading, RowError> {
    if fields.len() != EXPECTED_COLUMNS {
        return Err(RowError::Schema {
            expected: EXPECTED_COLUMNS,
            found: fields.len(),
            columns: fields.join(" | "),
        });
    }

    let (timestamp, duration, unit, consumption, generation) =
        (fields[0], fields[1], fields[2], fields[3], fields[4]);

    let date = TimestampParser::parse_date(timestamp)
        .map_err(|_| RowError::Timestamp(timestamp.to_string()))?;

    let duration_seconds = parse_number("duration", duration)?;
    let consumption_wh = parse_number("consumption", consumption)?;
    let generation_wh = parse_number("generation", generation)?;

    if duration_seconds <= 0.0 {
        return Err(RowError::Range {
            field: "duration",
            requirement: "positive",
            value: duration_seconds,
        });
    }
    if consumption_wh < 0.0 {
        return Err(RowError::Range {
            field: "consumption",
            requirement: "non-negative",
            value: consumption_wh,
        });
    }
    if generation_wh < 0.0 {
        return Err(RowError::Range {
            field: "generation",
            requirement: "non-negative",
            value: generation_wh,
        });
    }

    if !unit.eq_ignore_ascii_case("wh") {
        return Err(RowError::Unit(unit.to_string()));
    }

    Ok(Reading {
        timestamp: timestamp.to_string(),
        date,
        duration_seconds,
        unit: unit.to_string(),
        consumption: consumption_wh,
        generation: generation_wh,
    })
}

/// Strict decimal parse; `NaN` and infinities are not numbers here.
fn parse_number(field: &'static str, raw: &str) -> Result<f64, RowError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowError::Number {
            field,
            value: raw.to_string(),
        })
}
