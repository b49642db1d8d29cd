//! File-level parsing: all-or-nothing acceptance and error reporting

mod common;

use common::{create_test_csv, csv};
use energy_dashboard::{FileParser, ParseError, RowErrorKind};
use tempfile::TempDir;

#[test]
fn test_one_bad_row_rejects_the_file() {
    let payload = csv(&[
        "2024-01-01,900,wh,100,0",
        "2024-01-01,900,wh,-5,0",
        "2024-01-02,900,wh,100,0",
    ]);

    let err = FileParser::new().parse_payload(&payload).unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].row, 2);
    assert_eq!(failures[0].line, Some(3));
    assert_eq!(failures[0].kind(), RowErrorKind::Range);
}

#[test]
fn test_every_bad_row_is_reported() {
    let payload = csv(&[
        "2024-01-01,900,kwh,100,0",
        "2024-01-01,900,wh,100,0",
        "2024-13-01,900,wh,100,0",
        "2024-01-02,900,wh,100",
    ]);

    let err = FileParser::new().parse_payload(&payload).unwrap_err();
    let kinds: Vec<RowErrorKind> = err.failures().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![RowErrorKind::Unit, RowErrorKind::Format, RowErrorKind::Schema]
    );

    let message = err.to_string();
    assert!(message.starts_with("validation errors:"));
    assert!(message.contains("Row 1 (line 2)"));
    assert!(message.contains("Row 4 (line 5)"));
}

#[test]
fn test_empty_and_header_only_files() {
    let parser = FileParser::new();
    assert!(matches!(parser.parse_payload(""), Err(ParseError::EmptyFile)));
    assert!(matches!(parser.parse_payload("\n  \n\n"), Err(ParseError::EmptyFile)));
    assert!(matches!(
        parser.parse_payload("timestamp,duration,unit,consumption,generation\n\n"),
        Err(ParseError::NoData)
    ));
}

#[test]
fn test_parse_file_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_csv(
        temp_dir.path(),
        "usage.csv",
        &csv(&[
            "2024-02-28T23:45:00+01:00,900,Wh,250,0",
            "2024-02-29,900,WH,250,40",
        ]),
    )
    .unwrap();

    let readings = FileParser::new().parse_file(&path).unwrap();
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].date.to_string(), "2024-02-28");
    assert_eq!(readings[1].generation, 40.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = FileParser::new()
        .parse_file(&temp_dir.path().join("missing.csv"))
        .unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
    assert!(err.failures().is_empty());
}

#[test]
fn test_out_of_range_time_keeps_the_file() {
    let payload = csv(&[
        "2024-01-01,900,wh,100,0",
        "2024-01-01T24:00:00-08:00,900,wh,100,0",
        "2024-01-02T12:00:00+25:00,900,wh,100,0",
    ]);

    let readings = FileParser::new().parse_payload(&payload).unwrap();
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[1].date.to_string(), "2024-01-01");
    assert_eq!(readings[2].date.to_string(), "2024-01-02");
}
