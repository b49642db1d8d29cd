//! Error taxonomy for reading usage files.
//!
//! Row-level problems are reported as [`RowError`] wrapped in a [`RowFailure`] that
//! locates the row. The parser folds every failure of a file into one
//! [`ParseError::Validation`] so a user can fix all bad rows in a single pass.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected {expected} columns, got {found}. Columns: {columns}")]
    Schema {
        expected: usize,
        found: usize,
        columns: String,
    },

    #[error("invalid datetime format: {0}. Expected format: YYYY-MM-DD or YYYY-MM-DDTHH:mm:ss±HH:mm")]
    Timestamp(String),

    #[error("invalid number in {field}: {value:?}")]
    Number { field: &'static str, value: String },

    #[error("{field} must be {requirement}, got: {value}")]
    Range {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("invalid unit: {0}. Expected: wh")]
    Unit(String),
}

/// Coarse classification of a [`RowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    Schema,
    Format,
    Range,
    Unit,
}

impl RowError {
    pub fn kind(&self) -> RowErrorKind {
        match self {
            RowError::Schema { .. } => RowErrorKind::Schema,
            RowError::Timestamp(_) | RowError::Number { .. } => RowErrorKind::Format,
            RowError::Range { .. } => RowErrorKind::Range,
            RowError::Unit(_) => RowErrorKind::Unit,
        }
    }
}

/// A rejected row and where it sits in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// 1-based index among data rows; the header and blank lines are not counted.
    pub row: usize,
    /// 1-based line number in the payload, when known.
    pub line: Option<usize>,
    pub error: RowError,
}

impl RowFailure {
    pub fn new(row: usize, error: RowError) -> Self {
        Self {
            row,
            line: None,
            error,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> RowErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Row {} (line {}): {}", self.row, line, self.error),
            None => write!(f, "Row {}: {}", self.row, self.error),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file is empty or contains only empty lines")]
    EmptyFile,

    #[error("no valid data found in file")]
    NoData,

    #[error("validation errors:\n{}", render_failures(.0))]
    Validation(Vec<RowFailure>),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Row failures carried by a validation error; empty for every other variant.
    pub fn failures(&self) -> &[RowFailure] {
        match self {
            ParseError::Validation(failures) => failures,
            _ => &[],
        }
    }
}

fn render_failures(failures: &[RowFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_row() {
        let err = ParseError::Validation(vec![
            RowFailure::new(2, RowError::Unit("kwh".to_string())).at_line(3),
            RowFailure::new(
                4,
                RowError::Range {
                    field: "duration",
                    requirement: "positive",
                    value: 0.0,
                },
            ),
        ]);
        let message = err.to_string();
        assert!(message.contains("Row 2 (line 3): invalid unit: kwh"));
        assert!(message.contains("Row 4: duration must be positive, got: 0"));
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(RowError::Timestamp("x".into()).kind(), RowErrorKind::Format);
        assert_eq!(
            RowError::Number {
                field: "consumption",
                value: "abc".into()
            }
            .kind(),
            RowErrorKind::Format
        );
        assert!(ParseError::NoData.failures().is_empty());
    }
}
