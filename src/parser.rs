use crate::error::{ParseError, RowFailure};
use crate::models::Reading;
use crate::validator::validate_row;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads comma-separated interval usage files.
///
/// The first non-blank line is a header and is ignored. Every later non-blank line
/// must be a valid row; a single bad row rejects the whole file, with every bad row
/// listed in the returned [`ParseError::Validation`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileParser;

impl FileParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<Reading>, ParseError> {
        let payload = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_payload(&payload)
    }

    pub fn parse_payload(&self, payload: &str) -> Result<Vec<Reading>, ParseError> {
        let lines: Vec<&str> = payload.split('\n').collect();

        let header_index = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .ok_or(ParseError::EmptyFile)?;

        let mut readings = Vec::new();
        let mut failures: Vec<RowFailure> = Vec::new();
        let mut row = 0;

        for (index, line) in lines.iter().enumerate().skip(header_index + 1) {
            if line.trim().is_empty() {
                continue;
            }
            row += 1;

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match validate_row(&fields, row) {
                Ok(reading) => readings.push(reading),
                Err(failure) => failures.push(failure.at_line(index + 1)),
            }
        }

        if !failures.is_empty() {
            warn!(
                rows = row,
                failed = failures.len(),
                "Rejecting usage file with invalid rows"
            );
            return Err(ParseError::Validation(failures));
        }

        if readings.is_empty() {
            return Err(ParseError::NoData);
        }

        debug!(readings = readings.len(), "Parsed usage file");
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowErrorKind;

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let payload = "\n\n  \nDate,Duration,Unit,Consumption,Generation\n2024-01-01,900,wh,100,0\n\n2024-01-02,900,wh,200,0\n";
        let readings = FileParser::new().parse_payload(payload).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].consumption, 200.0);
    }

    #[test]
    fn test_crlf_payload() {
        let payload = "a,b,c,d,e\r\n2024-01-01,900,wh,100,0\r\n";
        let readings = FileParser::new().parse_payload(payload).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].generation, 0.0);
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            FileParser::new().parse_payload(""),
            Err(ParseError::EmptyFile)
        ));
        assert!(matches!(
            FileParser::new().parse_payload("\n  \n\t\n"),
            Err(ParseError::EmptyFile)
        ));
    }

    #[test]
    fn test_header_only_is_no_data() {
        assert!(matches!(
            FileParser::new().parse_payload("timestamp,duration,unit,consumption,generation\n\n\n"),
            Err(ParseError::NoData)
        ));
    }

    #[test]
    fn test_row_and_line_numbers() {
        let payload = "\nheader\n2024-01-01,900,wh,100,0\n\n2024-01-02,900,kwh,100,0\n";
        let err = FileParser::new().parse_payload(payload).unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].row, 2);
        assert_eq!(failures[0].line, Some(5));
        assert_eq!(failures[0].kind(), RowErrorKind::Unit);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let payload = "header\n 2024-01-01 , 900 , Wh , 100 , 5 \n";
        let readings = FileParser::new().parse_payload(payload).unwrap();
        assert_eq!(readings[0].timestamp, "2024-01-01");
        assert_eq!(readings[0].unit, "Wh");
    }
}
