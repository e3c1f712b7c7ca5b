//! Single-field stat edits.
//!
//! The interactive prompt in `cli::edit` drives this; nothing here touches
//! the console so it can be tested directly.

use thiserror::Error;

use super::stats::{EMPTY_CELL, StatRow, editable_columns};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("unknown stat `{0}`")]
    UnknownStat(String),

    #[error("invalid value `{0}`, enter a number or '-'")]
    InvalidValue(String),

    #[error("no value given")]
    Empty,
}

/// Canonical column name for user input (`ld` → `Ld`).
pub fn canonical_column(input: &str) -> Option<&'static str> {
    let input = input.trim();
    editable_columns()
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(input))
}

/// Validate a proposed value and return the string to store.
///
/// `-` is kept verbatim. Otherwise the value must be an integer, or a float
/// when it contains a `.`.
pub fn normalize_value(proposed: &str) -> Result<String, EditError> {
    let proposed = proposed.trim();
    if proposed.is_empty() {
        return Err(EditError::Empty);
    }
    if proposed == EMPTY_CELL {
        return Ok(proposed.to_owned());
    }
    let invalid = || EditError::InvalidValue(proposed.to_owned());
    if proposed.contains('.') {
        let value: f64 = proposed.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        // whole floats keep their decimal point: `1.0`, not `1`
        if value.fract() == 0.0 {
            Ok(format!("{value:.1}"))
        } else {
            Ok(value.to_string())
        }
    } else {
        let value: i64 = proposed.parse().map_err(|_| invalid())?;
        Ok(value.to_string())
    }
}

/// Apply one edit to one row. Returns the previous displayed value.
pub fn apply_stat_edit(row: &mut StatRow, column: &str, proposed: &str) -> Result<String, EditError> {
    let column = canonical_column(column).ok_or_else(|| EditError::UnknownStat(column.to_owned()))?;
    let value = normalize_value(proposed)?;
    let previous = row.display(column).to_owned();
    row.set(column, value);
    Ok(previous)
}
